use query_value::QueryValue;
use rusqlite::{types::ValueRef, Row as SqliteRow, Rows as SqliteRows};

pub(crate) trait ToQueryRow {
    /// Conversion from a SQLite row to owned values, in column order.
    fn to_query_row(&self) -> crate::Result<Vec<QueryValue>>;
}

impl ToQueryRow for SqliteRow<'_> {
    fn to_query_row(&self) -> crate::Result<Vec<QueryValue>> {
        let statement = self.as_ref();
        let mut row = Vec::with_capacity(statement.column_count());

        for (i, column) in statement.columns().iter().enumerate() {
            let value = match self.get_ref(i)? {
                ValueRef::Null => QueryValue::Null,
                ValueRef::Integer(i) => match column.decl_type().map(str::to_ascii_uppercase).as_deref() {
                    Some("BOOLEAN") => QueryValue::Boolean(i != 0),
                    _ => QueryValue::Int(i),
                },
                ValueRef::Real(f) => QueryValue::try_from(f)?,
                ValueRef::Text(bytes) => QueryValue::String(String::from_utf8(bytes.to_vec())?),
                ValueRef::Blob(bytes) => QueryValue::Bytes(bytes.to_vec()),
            };

            row.push(value);
        }

        Ok(row)
    }
}

pub(crate) trait ToColumnNames {
    fn to_column_names(&self) -> Vec<String>;
}

impl ToColumnNames for SqliteRows<'_> {
    fn to_column_names(&self) -> Vec<String> {
        match self.as_ref() {
            Some(statement) => statement.column_names().into_iter().map(String::from).collect(),
            None => Vec::new(),
        }
    }
}

