use serde_json::Value;
use std::io;

use super::{flatten, format_scalar};

/// Write output as CSV to stdout.
///
/// Row arrays (such as the regime summary) keep their own column names;
/// anything else becomes a `field,value` listing of the flattened result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let written = match body {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => write_fields(&mut wtr, body),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {e}");
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([format_scalar(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, body: &Value) -> csv::Result<()> {
    let mut fields = Vec::new();
    flatten("", body, &mut fields);

    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key, val])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_rows_keep_column_contract() {
        let rows = json!([
            { "Scenario": "Long-term let", "Monthly cashflow": "220.5", "Annual cashflow": "2646", "Cash-on-cash (%)": "8.17" },
            { "Scenario": "Short-term let", "Monthly cashflow": "-10", "Annual cashflow": "-120", "Cash-on-cash (%)": "-0.37" }
        ]);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(&mut wtr, rows.as_array().unwrap()).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Scenario,Monthly cashflow,Annual cashflow,Cash-on-cash (%)")
        );
        assert_eq!(lines.next(), Some("Long-term let,220.5,2646,8.17"));
        assert_eq!(lines.next(), Some("Short-term let,-10,-120,-0.37"));
    }

    #[test]
    fn test_fields_listing() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_fields(&mut wtr, &json!({ "tax": "5000" })).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(text, "field,value\ntax,5000\n");
    }
}
