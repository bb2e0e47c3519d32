use connector::error::ConnectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    /// A request's key carries no value for the field the batch is keyed by.
    #[error("Key of model `{model}` has no value for field `{field}`.")]
    KeyFieldMissing { field: String, model: String },

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}
