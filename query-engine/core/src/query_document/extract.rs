use graphql_parser::query::{Field, OperationDefinition, SelectionSet, Value, VariableDefinition};
use schema::constants::operations;

/// The operation type keyword, with the `{ ... }` shorthand being a query.
pub fn operation_type(operation: &OperationDefinition<'_, String>) -> &'static str {
    match operation {
        OperationDefinition::SelectionSet(_) | OperationDefinition::Query(_) => operations::QUERY,
        OperationDefinition::Mutation(_) => operations::MUTATION,
        OperationDefinition::Subscription(_) => operations::SUBSCRIPTION,
    }
}

pub fn operation_name<'d>(operation: &'d OperationDefinition<'_, String>) -> Option<&'d str> {
    match operation {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(q) => q.name.as_deref(),
        OperationDefinition::Mutation(m) => m.name.as_deref(),
        OperationDefinition::Subscription(s) => s.name.as_deref(),
    }
}

pub fn operation_selection_set<'d, 'a>(operation: &'d OperationDefinition<'a, String>) -> &'d SelectionSet<'a, String> {
    match operation {
        OperationDefinition::SelectionSet(s) => s,
        OperationDefinition::Query(q) => &q.selection_set,
        OperationDefinition::Mutation(m) => &m.selection_set,
        OperationDefinition::Subscription(s) => &s.selection_set,
    }
}

pub fn variable_definitions<'d, 'a>(operation: &'d OperationDefinition<'a, String>) -> &'d [VariableDefinition<'a, String>] {
    match operation {
        OperationDefinition::SelectionSet(_) => &[],
        OperationDefinition::Query(q) => &q.variable_definitions,
        OperationDefinition::Mutation(m) => &m.variable_definitions,
        OperationDefinition::Subscription(s) => &s.variable_definitions,
    }
}

/// The name a field is exposed under: its alias, else its declared name.
pub fn effective_name<'d>(field: &'d Field<'_, String>) -> &'d str {
    field.alias.as_deref().unwrap_or(field.name.as_str())
}

/// JSON text of a constant value of any shape, e.g. a variable default.
///
/// Returns `None` if a variable or a non-finite float occurs anywhere inside
/// the value.
pub fn encode_literal(value: &Value<'_, String>) -> Option<String> {
    constant_to_json(value).map(|json| json.to_string())
}

fn constant_to_json(value: &Value<'_, String>) -> Option<serde_json::Value> {
    let json = match value {
        Value::Variable(_) => return None,
        Value::Int(n) => serde_json::Value::from(n.as_i64()?),
        Value::Float(f) => serde_json::Value::Number(serde_json::Number::from_f64(*f)?),
        Value::String(s) | Value::Enum(s) => serde_json::Value::String(s.clone()),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::List(items) => serde_json::Value::Array(items.iter().map(constant_to_json).collect::<Option<_>>()?),
        Value::Object(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(name, value)| Some((name.clone(), constant_to_json(value)?)))
                .collect::<Option<_>>()?,
        ),
    };

    Some(json)
}
