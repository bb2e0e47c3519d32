use async_trait::async_trait;
use connector::{error::ErrorKind, Filter, ReadOperations, Record, RecordStream, ScalarCompare, ScalarField};
use graphql_parser::query::parse_query;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use query_core::{
    bind_document, query_by_key, query_by_key_uncached, BatchError, FunctionalKey, KeyColumn, OnKey, QueryCoreConfig,
    ResolutionCache, SharedCache, VariableBindings,
};
use query_value::QueryValue;
use schema::{InputField, InputType, OutputField, OutputType, QuerySchemaBuilder, ScalarType};
use sql_query_connector::Sqlite;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts the reads reaching the database.
struct CountingReads {
    inner: Sqlite,
    reads: AtomicUsize,
}

impl CountingReads {
    async fn seeded() -> Self {
        let inner = Sqlite::new_in_memory().unwrap();

        inner
            .raw_cmd(
                r#"
                CREATE TABLE "User" (id TEXT PRIMARY KEY, name TEXT NOT NULL, team TEXT, active BOOLEAN NOT NULL);
                INSERT INTO "User" VALUES ('A', 'Ada', 'core', 1);
                INSERT INTO "User" VALUES ('C', 'Cy', 'core', 0);
                INSERT INTO "User" VALUES ('D', 'Dee', 'infra', 1);
                "#,
            )
            .await
            .unwrap();

        CountingReads {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadOperations for CountingReads {
    async fn get_records<'a>(&'a self, model: &'a str, filter: &'a Filter) -> connector::Result<RecordStream<'a>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_records(model, filter).await
    }
}

type Seen = Mutex<Vec<(String, String)>>;

fn users() -> KeyColumn {
    KeyColumn::new("User", "id")
}

fn key(id: &str) -> FunctionalKey {
    FunctionalKey::single("User", "id", id)
}

/// Records `(requested value, name of the resolved user)`.
fn request_by<'a>(field: &str, value: &str, seen: &'a Seen) -> OnKey<'a> {
    let requested = value.to_owned();

    OnKey::new(FunctionalKey::single("User", field, value), move |record: Record| {
        let name = record.get("name").and_then(QueryValue::as_string).unwrap_or_default().to_owned();
        seen.lock().push((requested, name));
    })
}

fn request<'a>(id: &str, seen: &'a Seen) -> OnKey<'a> {
    request_by("id", id, seen)
}

fn pairs(seen: Seen) -> Vec<(String, String)> {
    let mut pairs = seen.into_inner();
    pairs.sort();
    pairs
}

#[tokio::test]
async fn equal_keys_are_fetched_once_and_misses_stay_silent() {
    let conn = CountingReads::seeded().await;
    let seen = Seen::default();
    let requests = vec![request("A", &seen), request("A", &seen), request("B", &seen)];

    query_by_key_uncached(&conn, "id", &users(), requests, Filter::empty())
        .await
        .unwrap();

    assert_eq!(conn.reads(), 1);
    assert_eq!(
        pairs(seen),
        vec![("A".to_owned(), "Ada".to_owned()), ("A".to_owned(), "Ada".to_owned())]
    );
}

#[tokio::test]
async fn the_caller_filter_narrows_the_batch() {
    let conn = CountingReads::seeded().await;
    let seen = Seen::default();
    let active = ScalarField::new("User", "active").equals(true);

    query_by_key_uncached(
        &conn,
        "id",
        &users(),
        vec![request("A", &seen), request("C", &seen), request("D", &seen)],
        active,
    )
    .await
    .unwrap();

    assert_eq!(
        pairs(seen),
        vec![("A".to_owned(), "Ada".to_owned()), ("D".to_owned(), "Dee".to_owned())]
    );
}

#[tokio::test]
async fn non_unique_columns_notify_each_request_once() {
    let conn = CountingReads::seeded().await;
    let seen = Seen::default();
    query_by_key_uncached(
        &conn,
        "team",
        &KeyColumn::new("User", "team"),
        vec![request_by("team", "core", &seen), request_by("team", "infra", &seen)],
        Filter::empty(),
    )
    .await
    .unwrap();

    let seen = pairs(seen);

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], ("infra".to_owned(), "Dee".to_owned()));
}

#[tokio::test]
async fn cached_keys_do_not_reach_the_database() {
    let conn = CountingReads::seeded().await;
    let cache = SharedCache::new();

    query_by_key(&conn, "id", &users(), vec![OnKey::new(key("A"), |_| ())], Filter::empty(), &cache)
        .await
        .unwrap();

    assert_eq!(conn.reads(), 1);
    assert_eq!(cache.len(), 1);

    let seen = Seen::default();

    query_by_key(&conn, "id", &users(), vec![request("A", &seen)], Filter::empty(), &cache)
        .await
        .unwrap();

    assert_eq!(conn.reads(), 1);
    assert_eq!(pairs(seen), vec![("A".to_owned(), "Ada".to_owned())]);
}

#[tokio::test]
async fn cached_records_win_over_fresh_rows() {
    let conn = CountingReads::seeded().await;
    let cache = SharedCache::new();

    let cached = Record::new(
        vec!["id".to_owned(), "name".to_owned()].into(),
        vec![QueryValue::from("A"), QueryValue::from("Ada")],
    );
    cache.push(key("A"), cached.clone());

    conn.inner
        .raw_cmd(r#"UPDATE "User" SET name = 'Ada Lovelace' WHERE id = 'A'"#)
        .await
        .unwrap();

    let seen = Seen::default();

    query_by_key(
        &conn,
        "id",
        &users(),
        vec![request("A", &seen), request("D", &seen)],
        Filter::empty(),
        &cache,
    )
    .await
    .unwrap();

    assert_eq!(conn.reads(), 1);
    assert_eq!(
        pairs(seen),
        vec![("A".to_owned(), "Ada".to_owned()), ("D".to_owned(), "Dee".to_owned())]
    );
    assert_eq!(cache.get(&key("A")), Some(cached));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn concurrent_batches_share_one_cache() {
    let conn = CountingReads::seeded().await;
    let cache = SharedCache::new();
    let target = users();
    let (left, right) = (Seen::default(), Seen::default());

    let (a, b) = tokio::join!(
        query_by_key(
            &conn,
            "id",
            &target,
            vec![request("A", &left), request("C", &left)],
            Filter::empty(),
            &cache,
        ),
        query_by_key(
            &conn,
            "id",
            &target,
            vec![request("C", &right), request("D", &right)],
            Filter::empty(),
            &cache,
        ),
    );

    a.unwrap();
    b.unwrap();

    assert_eq!(
        pairs(left),
        vec![("A".to_owned(), "Ada".to_owned()), ("C".to_owned(), "Cy".to_owned())]
    );
    assert_eq!(
        pairs(right),
        vec![("C".to_owned(), "Cy".to_owned()), ("D".to_owned(), "Dee".to_owned())]
    );
    assert_eq!(cache.len(), 3);

    let reads = conn.reads();
    let seen = Seen::default();

    query_by_key(
        &conn,
        "id",
        &users(),
        vec![request("A", &seen), request("C", &seen), request("D", &seen)],
        Filter::empty(),
        &cache,
    )
    .await
    .unwrap();

    assert_eq!(conn.reads(), reads);
    assert_eq!(pairs(seen).len(), 3);
}

#[tokio::test]
async fn unknown_key_columns_fail_the_batch() {
    let conn = CountingReads::seeded().await;
    let seen = Seen::default();

    let err = query_by_key_uncached(
        &conn,
        "id",
        &KeyColumn::new("User", "uuid"),
        vec![request("A", &seen)],
        Filter::empty(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Connector(ref e) if matches!(e.kind, ErrorKind::ColumnDoesNotExist { .. })
    ));
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn unknown_models_fail_the_batch() {
    let conn = CountingReads::seeded().await;

    let err = query_by_key_uncached(
        &conn,
        "id",
        &KeyColumn::new("Account", "id"),
        vec![OnKey::new(FunctionalKey::single("Account", "id", 1), |_| ())],
        Filter::empty(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Connector(ref e) if matches!(e.kind, ErrorKind::TableDoesNotExist { ref table } if table == "Account")
    ));
}

#[tokio::test]
async fn bound_arguments_drive_a_batch() {
    let mut builder = QuerySchemaBuilder::new();
    let user = builder.object(
        "User",
        vec![
            OutputField::new("id", OutputType::scalar(ScalarType::ID)),
            OutputField::new("name", OutputType::scalar(ScalarType::String)),
        ],
    );
    let args = builder.input_object(
        "UsersArgs",
        vec![InputField::new("ids", InputType::list(InputType::scalar(ScalarType::ID)))],
    );
    let query = builder.object(
        "Query",
        vec![OutputField::new("users", OutputType::list(OutputType::object(user))).with_arguments(args)],
    );
    builder.root("query", query);
    let schema = builder.build().unwrap();

    let document = parse_query::<String>("query ($ids: [ID]) { users(ids: $ids) { name } }").unwrap();
    let variables = VariableBindings::new().with("ids", r#"["D", "A", "Q"]"#);
    let selection = bind_document(&schema, &document, None, &variables, &QueryCoreConfig::default()).unwrap();

    let Some(QueryValue::List(ids)) = selection.find(&["users"]).and_then(|users| users.arguments().get("ids")) else {
        panic!("expected a list of ids");
    };

    let conn = CountingReads::seeded().await;
    let seen = Seen::default();
    let requests = ids
        .iter()
        .filter_map(QueryValue::as_string)
        .map(|id| request(id, &seen))
        .collect();

    query_by_key_uncached(&conn, "id", &users(), requests, Filter::empty())
        .await
        .unwrap();

    assert_eq!(conn.reads(), 1);
    assert_eq!(
        pairs(seen),
        vec![("A".to_owned(), "Ada".to_owned()), ("D".to_owned(), "Dee".to_owned())]
    );
}

#[tokio::test]
async fn id_arguments_resolve_against_integer_keys() {
    let mut builder = QuerySchemaBuilder::new();
    let post = builder.object(
        "Post",
        vec![
            OutputField::new("id", OutputType::scalar(ScalarType::ID)),
            OutputField::new("title", OutputType::scalar(ScalarType::String)),
        ],
    );
    let args = builder.input_object(
        "PostArgs",
        vec![InputField::new("id", InputType::scalar(ScalarType::ID))],
    );
    let query = builder.object(
        "Query",
        vec![OutputField::new("post", OutputType::object(post)).with_arguments(args)],
    );
    builder.root("query", query);
    let schema = builder.build().unwrap();

    let document = parse_query::<String>("{ first: post(id: 1) { title } third: post(id: 3) { title } }").unwrap();
    let selection = bind_document(
        &schema,
        &document,
        None,
        &VariableBindings::new(),
        &QueryCoreConfig::default(),
    )
    .unwrap();

    let conn = Sqlite::new_in_memory().unwrap();
    conn.raw_cmd(
        r#"
        CREATE TABLE "Post" (id INTEGER PRIMARY KEY, title TEXT NOT NULL);
        INSERT INTO "Post" VALUES (1, 'Hello');
        INSERT INTO "Post" VALUES (2, 'Again');
        "#,
    )
    .await
    .unwrap();

    let titles = Mutex::new(Vec::new());
    let requests = ["first", "third"]
        .into_iter()
        .map(|alias| {
            let id = selection.find(&[alias]).and_then(|post| post.arguments().get("id")).cloned().unwrap();
            assert!(matches!(id, QueryValue::String(_)));

            let titles = &titles;
            OnKey::new(FunctionalKey::single("Post", "id", id), move |record: Record| {
                titles.lock().push((alias, record.get("title").cloned()));
            })
        })
        .collect();

    query_by_key_uncached(&conn, "id", &KeyColumn::new("Post", "id"), requests, Filter::empty())
        .await
        .unwrap();

    assert_eq!(titles.into_inner(), vec![("first", Some(QueryValue::from("Hello")))]);
}
