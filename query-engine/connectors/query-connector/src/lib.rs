#![deny(rust_2018_idioms, unsafe_code)]

pub mod error;
pub mod filter;

mod interface;
mod record;

pub use filter::*;
pub use interface::*;
pub use record::*;

pub type Result<T> = std::result::Result<T, error::ConnectorError>;
