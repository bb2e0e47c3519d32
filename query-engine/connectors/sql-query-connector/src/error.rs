use query_connector::error::{ConnectorError, ErrorKind};
use query_value::ConversionFailure;
use rusqlite::types::FromSqlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlError {
    #[error("Column does not exist: {0}")]
    ColumnDoesNotExist(String),

    #[error("Table does not exist: {0}")]
    TableDoesNotExist(String),

    #[error("Error opening the database: {0}")]
    ConnectionError(rusqlite::Error),

    #[error("Database is busy")]
    Busy,

    #[error("Error querying the database: {0}")]
    QueryError(Box<dyn std::error::Error + Send + Sync>),

    #[error("The column value was different from the model: {0}")]
    ColumnReadFailure(Box<dyn std::error::Error + Send + Sync>),

    #[error("Conversion error: {0}")]
    ConversionError(String),
}

impl SqlError {
    pub(crate) fn into_connector_error(self) -> ConnectorError {
        let kind = match self {
            SqlError::ColumnDoesNotExist(column) => ErrorKind::ColumnDoesNotExist { column },
            SqlError::TableDoesNotExist(table) => ErrorKind::TableDoesNotExist { table },
            SqlError::ConnectionError(e) => ErrorKind::ConnectionError(Box::new(e)),
            SqlError::Busy => ErrorKind::ConnectionError("database is busy".into()),
            SqlError::QueryError(e) | SqlError::ColumnReadFailure(e) => ErrorKind::QueryError(e),
            SqlError::ConversionError(message) => ErrorKind::ConversionError(message),
        };

        ConnectorError::from_kind(kind)
    }
}

impl From<SqlError> for ConnectorError {
    fn from(sql_error: SqlError) -> Self {
        sql_error.into_connector_error()
    }
}

impl From<rusqlite::Error> for SqlError {
    fn from(e: rusqlite::Error) -> SqlError {
        match e {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: rusqlite::ffi::ErrorCode::DatabaseBusy,
                    ..
                },
                _,
            ) => SqlError::Busy,

            rusqlite::Error::SqliteFailure(_, Some(ref description)) if description.starts_with("no such table: ") => {
                SqlError::TableDoesNotExist(description.trim_start_matches("no such table: ").to_owned())
            }

            rusqlite::Error::SqliteFailure(_, Some(ref description)) if description.starts_with("no such column: ") => {
                SqlError::ColumnDoesNotExist(description.trim_start_matches("no such column: ").to_owned())
            }

            rusqlite::Error::FromSqlConversionFailure(_, _, e) => SqlError::ColumnReadFailure(e),

            e => SqlError::QueryError(e.into()),
        }
    }
}

impl From<FromSqlError> for SqlError {
    fn from(e: FromSqlError) -> SqlError {
        SqlError::ColumnReadFailure(e.into())
    }
}

impl From<ConversionFailure> for SqlError {
    fn from(e: ConversionFailure) -> SqlError {
        SqlError::ConversionError(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for SqlError {
    fn from(e: std::string::FromUtf8Error) -> SqlError {
        SqlError::ColumnReadFailure(e.into())
    }
}
