mod sqlite;

pub use sqlite::Sqlite;
