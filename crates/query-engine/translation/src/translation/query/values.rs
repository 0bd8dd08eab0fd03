//! Handle the translation of literal values.

use query_engine_sql::sql;

use super::super::error::ValidationError;

/// Convert a JSON literal into a query parameter. Only scalars can be bound.
pub fn translate_json_value(value: &serde_json::Value) -> Result<sql::string::Param, ValidationError> {
    match value {
        serde_json::Value::Null => Ok(sql::string::Param::Null),
        serde_json::Value::Bool(b) => Ok(sql::string::Param::Bool(*b)),
        serde_json::Value::Number(num) => match num.as_i64() {
            Some(int) => Ok(sql::string::Param::Int(int)),
            None => num
                .as_f64()
                .map(sql::string::Param::Float)
                .ok_or_else(|| ValidationError::UnsupportedValue(value.to_string())),
        },
        serde_json::Value::String(s) => Ok(sql::string::Param::String(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(ValidationError::UnsupportedValue(value.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(translate_json_value(&json!(null)), Ok(sql::string::Param::Null));
        assert_eq!(translate_json_value(&json!(true)), Ok(sql::string::Param::Bool(true)));
        assert_eq!(translate_json_value(&json!(-3)), Ok(sql::string::Param::Int(-3)));
        assert_eq!(translate_json_value(&json!(1.5)), Ok(sql::string::Param::Float(1.5)));
        assert_eq!(
            translate_json_value(&json!("x")),
            Ok(sql::string::Param::String("x".to_string()))
        );
    }

    #[test]
    fn u64_beyond_i64_becomes_float() {
        assert_eq!(
            translate_json_value(&json!(u64::MAX)),
            Ok(sql::string::Param::Float(18_446_744_073_709_552_000.0))
        );
    }

    #[test]
    fn arrays_and_objects_are_rejected() {
        assert_eq!(
            translate_json_value(&json!([1])),
            Err(ValidationError::UnsupportedValue("[1]".to_string()))
        );
        assert_eq!(
            translate_json_value(&json!({"a": 1})),
            Err(ValidationError::UnsupportedValue("{\"a\":1}".to_string()))
        );
    }
}
