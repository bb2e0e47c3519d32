use crate::{Filter, Record};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Rows produced by a read, yielded one at a time.
pub type RecordStream<'a> = BoxStream<'a, crate::Result<Record>>;

#[async_trait]
pub trait ReadOperations: Send + Sync {
    /// Gets all records of `model` matching `filter`, with every column
    /// selected.
    ///
    /// The stream is the only handle on the result; dropping it releases
    /// whatever the connector holds for the read.
    async fn get_records<'a>(&'a self, model: &'a str, filter: &'a Filter) -> crate::Result<RecordStream<'a>>;
}
