use rusqlite::types::Value;

use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Convert positional arguments for binding.
#[must_use]
pub fn convert_params(args: &[RowValues]) -> Vec<Value> {
    args.iter().map(row_value_to_sqlite_value).collect()
}

/// Parameters for a statement that was never bound: every placeholder reads as NULL.
#[must_use]
pub(crate) fn unbound_params(parameter_count: usize) -> Vec<Value> {
    vec![Value::Null; parameter_count]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn argument_conveniences_map_to_storage_classes() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
            .and_then(|d| d.and_hms_milli_opt(13, 5, 9, 250))
            .unwrap();
        let converted = convert_params(&[
            RowValues::Bool(true),
            RowValues::Timestamp(ts),
            RowValues::JSON(serde_json::json!({"k": 1})),
        ]);
        assert_eq!(
            converted,
            vec![
                Value::Integer(1),
                Value::Text("2024-02-29 13:05:09.250".into()),
                Value::Text(r#"{"k":1}"#.into()),
            ]
        );
    }
}
