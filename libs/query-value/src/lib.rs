mod error;

use base64::{Engine, engine::general_purpose::STANDARD};
use bigdecimal::{BigDecimal, FromPrimitive};
use std::fmt;

pub use error::ConversionFailure;
pub type QueryValueResult<T> = std::result::Result<T, ConversionFailure>;
pub type QueryListValue = Vec<QueryValue>;

/// A value as it travels between argument records, lookup keys and database rows.
///
/// Floats are kept as normalized decimals so that every value is `Eq + Hash`
/// and can be used to group pending lookups.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum QueryValue {
    String(String),
    Boolean(bool),
    Enum(String),
    Int(i64),
    List(QueryListValue),

    /// A collection of key-value pairs constituting an object. Order is preserved.
    Object(Vec<(String, QueryValue)>),

    Null,
    Float(BigDecimal),
    Bytes(Vec<u8>),
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_bytes(s: &str) -> QueryValueResult<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|_| ConversionFailure::new("base64 encoded bytes", "QueryValue::Bytes"))
}

impl QueryValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryValue::String(_) => "String",
            QueryValue::Boolean(_) => "Boolean",
            QueryValue::Enum(_) => "Enum",
            QueryValue::Int(_) => "Int",
            QueryValue::List(_) => "List",
            QueryValue::Object(_) => "Object",
            QueryValue::Null => "Null",
            QueryValue::Float(_) => "Float",
            QueryValue::Bytes(_) => "Bytes",
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryValue::String(x) => x.fmt(f),
            QueryValue::Float(x) => x.fmt(f),
            QueryValue::Boolean(x) => x.fmt(f),
            QueryValue::Enum(x) => x.fmt(f),
            QueryValue::Int(x) => x.fmt(f),
            QueryValue::Null => "null".fmt(f),
            QueryValue::List(x) => {
                let joined = x.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                write!(f, "[{joined}]")
            }
            QueryValue::Bytes(b) => encode_bytes(b).fmt(f),
            QueryValue::Object(pairs) => {
                let joined = pairs
                    .iter()
                    .map(|(key, value)| format!(r#""{key}": {value}"#))
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "{{ {joined} }}")
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::from(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl TryFrom<f64> for QueryValue {
    type Error = ConversionFailure;

    fn try_from(f: f64) -> QueryValueResult<QueryValue> {
        BigDecimal::from_f64(f)
            .map(|dec| QueryValue::Float(dec.normalized()))
            .ok_or_else(|| ConversionFailure::new("f64", "Decimal"))
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Boolean(b)
    }
}

impl From<i32> for QueryValue {
    fn from(i: i32) -> Self {
        QueryValue::Int(i64::from(i))
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Int(i)
    }
}

impl From<Vec<u8>> for QueryValue {
    fn from(bytes: Vec<u8>) -> Self {
        QueryValue::Bytes(bytes)
    }
}

impl From<QueryListValue> for QueryValue {
    fn from(s: QueryListValue) -> Self {
        QueryValue::List(s)
    }
}

impl<T> From<Option<T>> for QueryValue
where
    T: Into<QueryValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => value.into(),
            None => QueryValue::Null,
        }
    }
}
