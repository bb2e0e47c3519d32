#![deny(rust_2018_idioms, unsafe_code)]

mod ast;
mod database;
mod error;
mod filter;
mod row;
mod value;
mod visitor;

pub use database::Sqlite;
pub use error::SqlError;

type Result<T> = std::result::Result<T, error::SqlError>;
