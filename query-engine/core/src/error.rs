use crate::{BatchError, BindingError};
use connector::error::ConnectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error binding the query document: {0}")]
    BindingError(BindingError),

    #[error("Error resolving a batch of keys: {0}")]
    BatchError(BatchError),

    #[error("Error in connector: {0}")]
    ConnectorError(ConnectorError),

    #[error("{0}")]
    ConfigurationError(String),
}

impl CoreError {
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::ConnectorError(err) => err.is_transient(),
            CoreError::BatchError(BatchError::Connector(err)) => err.is_transient(),
            _ => false,
        }
    }
}

impl From<BindingError> for CoreError {
    fn from(e: BindingError) -> CoreError {
        CoreError::BindingError(e)
    }
}

impl From<BatchError> for CoreError {
    fn from(e: BatchError) -> CoreError {
        CoreError::BatchError(e)
    }
}

impl From<ConnectorError> for CoreError {
    fn from(e: ConnectorError) -> CoreError {
        CoreError::ConnectorError(e)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> CoreError {
        CoreError::ConfigurationError(format!("Invalid configuration: {e}"))
    }
}
