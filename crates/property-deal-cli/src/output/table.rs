use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(rows)) => {
                print_rows_table(rows);
                print_envelope_notes(map);
            }
            Some(result) => {
                print_field_table(result);
                print_envelope_notes(map);
            }
            None => print_field_table(value),
        },
        Value::Array(rows) => print_rows_table(rows),
        _ => println!("{value}"),
    }
}

fn print_field_table(value: &Value) {
    println!("{}", field_table(value));
}

/// Two-column Field/Value table over the flattened object.
fn field_table(value: &Value) -> Table {
    let mut fields = Vec::new();
    flatten("", value, &mut fields);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key, val]);
    }
    Table::from(builder)
}

/// One row per object, headed by the first object's keys.
fn print_rows_table(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", format_scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_table_lists_dotted_paths() {
        let value = json!({
            "purchase": { "tax": "10100", "upfront_cash": "57500" },
            "long_term": { "metrics": { "dscr": "infinite" } }
        });
        let rendered = field_table(&value).to_string();
        assert!(rendered.contains("Field"));
        assert!(rendered.contains("purchase.upfront_cash"));
        assert!(rendered.contains("57500"));
        assert!(rendered.contains("long_term.metrics.dscr"));
        assert!(rendered.contains("infinite"));
    }
}
