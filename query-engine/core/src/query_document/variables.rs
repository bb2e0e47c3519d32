use super::{encode_literal, BindingError};
use graphql_parser::query::VariableDefinition;
use std::collections::HashMap;

/// Variable values of one query execution, keyed by bare name (without `$`).
///
/// Values are literal JSON text and are copied into compiled arguments
/// verbatim; producing well-formed literals is up to whoever binds them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableBindings {
    values: HashMap<String, String>,
}

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the JSON members of a GraphQL request's `variables` object.
    /// `null` stands for no variables at all.
    pub fn from_json(variables: &serde_json::Value) -> Result<Self, BindingError> {
        match variables {
            serde_json::Value::Null => Ok(Self::new()),
            serde_json::Value::Object(members) => Ok(members
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect()),
            other => Err(BindingError::InvalidVariables(json_kind(other).to_owned())),
        }
    }

    pub fn with(mut self, name: impl Into<String>, literal: impl Into<String>) -> Self {
        self.insert(name, literal);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, literal: impl Into<String>) {
        self.values.insert(name.into(), literal.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Binds the declared default of every variable the caller left unbound.
    pub fn apply_defaults(&mut self, definitions: &[VariableDefinition<'_, String>]) {
        for definition in definitions {
            if self.contains(&definition.name) {
                continue;
            }

            if let Some(literal) = definition.default_value.as_ref().and_then(encode_literal) {
                tracing::trace!(variable = definition.name.as_str(), literal = literal.as_str(), "binding variable default");
                self.values.insert(definition.name.clone(), literal);
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for VariableBindings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        VariableBindings {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
