#![deny(rust_2018_idioms, unsafe_code)]

pub mod batch;
pub mod config;
pub mod error;
pub mod query_document;

pub use batch::*;
pub use config::QueryCoreConfig;
pub use error::*;
pub use query_document::*;

pub type CoreResult<T> = Result<T, CoreError>;
