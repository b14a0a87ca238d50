pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

/// Flatten nested objects into `(dotted.path, value)` pairs.
///
/// Arrays of objects are indexed (`breakdown.0.label`); scalars are kept as is.
pub fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(prefix, key), val, out);
            }
        }
        Value::Array(arr) if arr.iter().any(|v| v.is_object()) => {
            for (i, val) in arr.iter().enumerate() {
                flatten(&join(prefix, &i.to_string()), val, out);
            }
        }
        _ => out.push((prefix.to_string(), format_scalar(value))),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Render a leaf value without JSON quoting.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "purchase": { "tax": "5000", "loan": "75000" },
            "metrics": { "dscr": "infinite" }
        });
        let mut rows = Vec::new();
        flatten("", &value, &mut rows);
        assert_eq!(
            rows,
            vec![
                ("purchase.tax".to_string(), "5000".to_string()),
                ("purchase.loan".to_string(), "75000".to_string()),
                ("metrics.dscr".to_string(), "infinite".to_string()),
            ]
        );
    }

    #[test]
    fn test_flatten_indexes_object_arrays() {
        let value = json!({ "breakdown": [{ "label": "Rent", "amount": "800" }] });
        let mut rows = Vec::new();
        flatten("", &value, &mut rows);
        assert_eq!(rows[0], ("breakdown.0.label".to_string(), "Rent".to_string()));
    }
}
