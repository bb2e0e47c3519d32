use query_value::QueryValue;
use std::sync::Arc;

/// One row read from a model, in column order.
///
/// Column names are shared between every record of the same result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    field_names: Arc<[String]>,
    values: Vec<QueryValue>,
}

impl Record {
    pub fn new(field_names: Arc<[String]>, values: Vec<QueryValue>) -> Self {
        debug_assert_eq!(field_names.len(), values.len());
        Record { field_names, values }
    }

    pub fn get(&self, column: &str) -> Option<&QueryValue> {
        let index = self.field_names.iter().position(|name| name == column)?;
        self.values.get(index)
    }
}
