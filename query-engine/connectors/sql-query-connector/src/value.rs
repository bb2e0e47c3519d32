use crate::error::SqlError;
use query_value::QueryValue;
use rusqlite::types::Value;

/// Converts a filter value into a statement parameter.
pub(crate) fn to_sql_value(value: &QueryValue) -> crate::Result<Value> {
    let value = match value {
        QueryValue::String(s) | QueryValue::Enum(s) => Value::Text(s.clone()),
        QueryValue::Boolean(b) => Value::Integer(i64::from(*b)),
        QueryValue::Int(i) => Value::Integer(*i),
        QueryValue::Float(d) => {
            let f = d
                .to_string()
                .parse::<f64>()
                .map_err(|_| SqlError::ConversionError(format!("Decimal `{d}` does not fit a REAL")))?;

            Value::Real(f)
        }
        QueryValue::Bytes(bytes) => Value::Blob(bytes.clone()),
        QueryValue::Null => Value::Null,
        QueryValue::List(_) | QueryValue::Object(_) => {
            return Err(SqlError::ConversionError(format!(
                "A {} cannot be used as a column value",
                value.type_name()
            )));
        }
    };

    Ok(value)
}
