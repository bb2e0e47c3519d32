use super::{BatchError, FunctionalKey, NoopCache, ResolutionCache};
use connector::{
    error::{ConnectorError, ErrorKind},
    Filter, ReadOperations, Record, ScalarCompare, ScalarField,
};
use bigdecimal::ToPrimitive;
use futures::TryStreamExt;
use indexmap::{IndexMap, IndexSet};
use query_value::QueryValue;
use std::fmt;

/// The column a batch is matched on: `column` of `model`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyColumn {
    model: String,
    column: String,
}

impl KeyColumn {
    pub fn new(model: impl Into<String>, column: impl Into<String>) -> Self {
        KeyColumn {
            model: model.into(),
            column: column.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

/// A pending request for the record identified by `key`.
///
/// The callback runs at most once, and only if the record is found.
pub struct OnKey<'a> {
    key: FunctionalKey,
    on_new: Box<dyn FnOnce(Record) + Send + 'a>,
}

impl<'a> OnKey<'a> {
    pub fn new(key: FunctionalKey, on_new: impl FnOnce(Record) + Send + 'a) -> Self {
        OnKey {
            key,
            on_new: Box::new(on_new),
        }
    }

    pub fn key(&self) -> &FunctionalKey {
        &self.key
    }

    fn notify(self, record: Record) {
        (self.on_new)(record)
    }
}

impl fmt::Debug for OnKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnKey").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Resolves `requests` against the rows of `target.model`.
///
/// Requests found in `cache` are answered right away. The others are grouped
/// by their value for `key_field` and fetched with one query: `filter` and
/// `target.column` in the distinct values. Every request of a group sees the
/// first row carrying its value, which is pushed to the cache before the
/// callback runs. Requests without a matching row are not called back.
///
/// Rows are matched to groups through their match form, so a row that the
/// database matched by coercion (`'1'` against an integer column) still finds
/// its group.
///
/// Callbacks that already ran stay run if the backend fails halfway.
#[tracing::instrument(
    name = "query_by_key",
    skip_all,
    fields(model = target.model(), column = target.column(), requests = requests.len())
)]
pub async fn query_by_key(
    conn: &dyn ReadOperations,
    key_field: &str,
    target: &KeyColumn,
    requests: Vec<OnKey<'_>>,
    filter: Filter,
    cache: &dyn ResolutionCache,
) -> Result<(), BatchError> {
    let mut pending: IndexMap<QueryValue, Vec<OnKey<'_>>> = IndexMap::new();
    let mut keys: IndexSet<QueryValue> = IndexSet::new();
    let mut hits = 0;

    for request in requests {
        if let Some(record) = cache.get(request.key()) {
            hits += 1;
            request.notify(record);
            continue;
        }

        let value = request
            .key()
            .get(key_field)
            .cloned()
            .ok_or_else(|| BatchError::KeyFieldMissing {
                field: key_field.to_owned(),
                model: request.key().model().to_owned(),
            })?;

        pending.entry(match_form(&value)).or_default().push(request);
        keys.insert(value);
    }

    tracing::debug!(hits, missing = pending.len(), "checked resolution cache");

    if pending.is_empty() {
        return Ok(());
    }

    let filter = filter.and_also(ScalarField::new(target.model(), target.column()).is_in(keys));

    let mut records = conn.get_records(target.model(), &filter).await?;

    while let Some(record) = records.try_next().await? {
        let value = record.get(target.column()).ok_or_else(|| {
            ConnectorError::from_kind(ErrorKind::ColumnDoesNotExist {
                column: target.column().to_owned(),
            })
        })?;

        // Later rows with the same value find no group left.
        let Some(group) = pending.swap_remove(&match_form(value)) else {
            continue;
        };

        for request in group {
            cache.push(request.key().clone(), record.clone());
            request.notify(record.clone());
        }
    }

    if !pending.is_empty() {
        tracing::trace!(unresolved = pending.len(), "keys without a matching record");
    }

    Ok(())
}

/// The form a key value is grouped under.
///
/// SQLite compares with type affinity, so the row it returns may carry the
/// key in another type than the request did. Integers and their canonical
/// text, booleans, integral floats and enums collapse to one form. Text like
/// `"01"` keeps its own form: a text column would not match it against `1`.
fn match_form(value: &QueryValue) -> QueryValue {
    match value {
        QueryValue::String(s) => match s.parse::<i64>() {
            Ok(i) if i.to_string() == *s => QueryValue::Int(i),
            _ => value.clone(),
        },
        QueryValue::Enum(s) => QueryValue::String(s.clone()),
        QueryValue::Boolean(b) => QueryValue::Int(i64::from(*b)),
        QueryValue::Float(f) if f.is_integer() => f.to_i64().map(QueryValue::Int).unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

/// [`query_by_key`] without a cache.
pub async fn query_by_key_uncached(
    conn: &dyn ReadOperations,
    key_field: &str,
    target: &KeyColumn,
    requests: Vec<OnKey<'_>>,
    filter: Filter,
) -> Result<(), BatchError> {
    query_by_key(conn, key_field, target, requests, filter, &NoopCache).await
}
