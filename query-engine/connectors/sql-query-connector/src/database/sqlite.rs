use crate::{
    ast::Select,
    filter::{FilterVisitor, FilterVisitorExt},
    row::{ToColumnNames, ToQueryRow},
    visitor,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use query_connector::{Filter, ReadOperations, Record, RecordStream};
use std::{path::Path, sync::Arc};
use tokio::sync::Mutex;

/// A single SQLite connection serving reads.
pub struct Sqlite {
    conn: Mutex<rusqlite::Connection>,
}

impl Sqlite {
    pub fn new_in_memory() -> crate::Result<Self> {
        let conn = rusqlite::Connection::open_in_memory().map_err(crate::SqlError::ConnectionError)?;

        Ok(Sqlite { conn: Mutex::new(conn) })
    }

    pub fn open(file_path: impl AsRef<Path>) -> crate::Result<Self> {
        let conn = rusqlite::Connection::open(file_path).map_err(crate::SqlError::ConnectionError)?;

        Ok(Sqlite { conn: Mutex::new(conn) })
    }

    /// Runs one or more statements that return no rows, e.g. DDL or seeding.
    pub async fn raw_cmd(&self, sql: &str) -> crate::Result<()> {
        tracing::debug!(query_type = "raw_cmd", sql);
        let conn = self.conn.lock().await;
        conn.execute_batch(sql)?;

        Ok(())
    }

    async fn query(&self, select: Select) -> crate::Result<Vec<Record>> {
        let (sql, params) = visitor::Sqlite::build(select);
        tracing::debug!(query_type = "query", sql = sql.as_str(), params = params.len());

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;

        let field_names: Arc<[String]> = rows.to_column_names().into();
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(Record::new(field_names.clone(), row.to_query_row()?));
        }

        Ok(records)
    }
}

#[async_trait]
impl ReadOperations for Sqlite {
    /// The result set is read into memory under the connection lock, and the
    /// returned stream yields from that buffer. A stream that is still being
    /// consumed does not block other reads on this connection.
    #[tracing::instrument(name = "get_records", skip(self, filter))]
    async fn get_records<'a>(
        &'a self,
        model: &'a str,
        filter: &'a Filter,
    ) -> query_connector::Result<RecordStream<'a>> {
        let conditions = FilterVisitor.visit_filter(filter)?;
        let records = self.query(Select::from_table(model).so_that(conditions)).await?;

        Ok(stream::iter(records.into_iter().map(Ok)).boxed())
    }
}
