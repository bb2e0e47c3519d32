use query_value::QueryValue;
use std::fmt;

/// Identifies a record of a model by the values of one or more of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionalKey {
    model: String,
    values: Vec<(String, QueryValue)>,
}

impl FunctionalKey {
    pub fn new(model: impl Into<String>, values: Vec<(String, QueryValue)>) -> Self {
        FunctionalKey {
            model: model.into(),
            values,
        }
    }

    /// A key made of a single field.
    pub fn single(model: impl Into<String>, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::new(model, vec![(field.into(), value.into())])
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn get(&self, field: &str) -> Option<&QueryValue> {
        self.values.iter().find(|(name, _)| name == field).map(|(_, value)| value)
    }

    pub fn values(&self) -> &[(String, QueryValue)] {
        &self.values
    }
}

impl fmt::Display for FunctionalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.model)?;

        for (i, (field, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{field}: {value}")?;
        }

        f.write_str(")")
    }
}
