use super::ArgumentDecodeError;
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use query_value::{decode_bytes, QueryValue};
use schema::{InputObjectTypeId, InputType, QuerySchema, ScalarType};
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// Typed arguments of one field, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentRecord {
    values: IndexMap<String, QueryValue>,
}

impl ArgumentRecord {
    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_pairs(self) -> Vec<(String, QueryValue)> {
        self.values.into_iter().collect()
    }
}

/// Decodes a compiled argument buffer against the argument shape of a field.
pub fn decode_arguments(
    buffer: &str,
    shape: InputObjectTypeId,
    schema: &QuerySchema,
) -> Result<ArgumentRecord, ArgumentDecodeError> {
    let json: JsonValue = serde_json::from_str(buffer).map_err(|source| ArgumentDecodeError::MalformedJson {
        buffer: buffer.to_owned(),
        source,
    })?;

    let JsonValue::Object(members) = json else {
        return Err(ArgumentDecodeError::InvalidValue {
            path: String::new(),
            expected: schema.input_object(shape).name().to_owned(),
            found: describe(&json),
        });
    };

    let values = decode_members(members, shape, schema, None)?;

    Ok(ArgumentRecord {
        values: values.into_iter().collect(),
    })
}

fn decode_members(
    members: serde_json::Map<String, JsonValue>,
    shape: InputObjectTypeId,
    schema: &QuerySchema,
    parent: Option<&str>,
) -> Result<Vec<(String, QueryValue)>, ArgumentDecodeError> {
    let input = schema.input_object(shape);
    let mut values = Vec::with_capacity(members.len());

    for (name, value) in members {
        let path = match parent {
            Some(parent) => format!("{parent}.{name}"),
            None => name.clone(),
        };

        let field = input
            .find_field(&name)
            .ok_or_else(|| ArgumentDecodeError::UnknownArgument {
                argument: path.clone(),
                type_name: input.name().to_owned(),
            })?;

        let value = decode_value(value, field.field_type(), schema, &path)?;
        values.push((name, value));
    }

    Ok(values)
}

fn decode_value(
    value: JsonValue,
    typ: &InputType,
    schema: &QuerySchema,
    path: &str,
) -> Result<QueryValue, ArgumentDecodeError> {
    match (typ, value) {
        (_, JsonValue::Null) => Ok(QueryValue::Null),

        (InputType::List(inner), JsonValue::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| decode_value(item, inner, schema, &format!("{path}.{i}")))
            .collect::<Result<Vec<_>, _>>()
            .map(QueryValue::List),

        // A single value is accepted where a list is expected.
        (InputType::List(inner), single) => Ok(QueryValue::List(vec![decode_value(single, inner, schema, path)?])),

        (InputType::Object(id), JsonValue::Object(members)) => {
            decode_members(members, *id, schema, Some(path)).map(QueryValue::Object)
        }

        (InputType::Enum(enum_type), JsonValue::String(s)) if enum_type.contains(&s) => Ok(QueryValue::Enum(s)),

        (InputType::Enum(enum_type), other) => Err(invalid(path, enum_type.name(), &other)),

        (InputType::Scalar(scalar), value) => decode_scalar(value, scalar, path),

        (InputType::Object(id), other) => Err(invalid(path, schema.input_object(*id).name(), &other)),
    }
}

fn decode_scalar(value: JsonValue, scalar: &ScalarType, path: &str) -> Result<QueryValue, ArgumentDecodeError> {
    match (scalar, value) {
        (ScalarType::String, JsonValue::String(s)) => Ok(QueryValue::String(s)),
        (ScalarType::ID, JsonValue::String(s)) => Ok(QueryValue::String(s)),
        (ScalarType::ID, JsonValue::Number(n)) if n.is_i64() => Ok(QueryValue::String(n.to_string())),
        (ScalarType::Boolean, JsonValue::Bool(b)) => Ok(QueryValue::Boolean(b)),
        (ScalarType::Int, JsonValue::Number(n)) if n.is_i64() => Ok(QueryValue::from(n.as_i64())),

        // Ints are valid floats.
        (ScalarType::Float, JsonValue::Number(n)) => BigDecimal::from_str(&n.to_string())
            .map(|dec| QueryValue::Float(dec.normalized()))
            .map_err(|_| invalid(path, "Float", &JsonValue::Number(n))),

        (ScalarType::Json, value) => Ok(QueryValue::String(value.to_string())),

        (ScalarType::Bytes, JsonValue::String(s)) => {
            decode_bytes(&s).map(QueryValue::Bytes).map_err(|_| ArgumentDecodeError::InvalidValue {
                path: path.to_owned(),
                expected: "base64 encoded Bytes".to_owned(),
                found: "a string".to_owned(),
            })
        }

        (scalar, other) => Err(invalid(path, &scalar.to_string(), &other)),
    }
}

fn invalid(path: &str, expected: &str, found: &JsonValue) -> ArgumentDecodeError {
    ArgumentDecodeError::InvalidValue {
        path: path.to_owned(),
        expected: expected.to_owned(),
        found: describe(found),
    }
}

fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_) | JsonValue::Null => value.to_string(),
        JsonValue::Array(_) => String::from("a list"),
        JsonValue::Object(_) => String::from("an object"),
    }
}
