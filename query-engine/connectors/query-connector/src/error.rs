use thiserror::Error;

#[derive(Debug, Error)]
#[error("{}", kind)]
pub struct ConnectorError {
    /// The error information for internal use.
    pub kind: ErrorKind,
}

impl ConnectorError {
    pub fn from_kind(kind: ErrorKind) -> Self {
        ConnectorError { kind }
    }

    /// Errors caused by the database being unavailable or busy, as opposed to
    /// errors caused by the query itself.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectionError(_))
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("Column '{}' does not exist.", column)]
    ColumnDoesNotExist { column: String },

    #[error("Table '{}' does not exist.", table)]
    TableDoesNotExist { table: String },

    #[error("Error creating a database connection. ({})", _0)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Error querying the database: {}", _0)]
    QueryError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Conversion error: {0}")]
    ConversionError(String),
}
