use serde_json::Value;

use super::format_scalar;

/// Headline fields, in priority order, for single-value output.
const PRIORITY_KEYS: [&str; 4] = ["tax", "monthly_payment", "upfront_cash", "cash_on_cash_pct"];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{line}");
    }
}

/// Row results (the regime summary, scenario cases) give one
/// `label: monthly cashflow` line per row; other results give the first
/// priority field present, falling back to the first field of the result.
fn minimal_lines(value: &Value) -> Vec<String> {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let rows = match result {
        Value::Array(rows) => Some(rows),
        Value::Object(map) => map.get("summary").and_then(Value::as_array),
        _ => None,
    };
    if let Some(rows) = rows {
        return rows
            .iter()
            .map(|row| {
                let label = row
                    .as_object()
                    .and_then(|m| m.values().next())
                    .map(format_scalar)
                    .unwrap_or_default();
                let cashflow = row
                    .get("Monthly cashflow")
                    .map(format_scalar)
                    .unwrap_or_default();
                format!("{label}: {cashflow}")
            })
            .collect();
    }

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return vec![format_scalar(val)];
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return vec![format!("{key}: {}", format_scalar(val))];
        }
    }

    vec![format_scalar(result)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_one_line_per_regime() {
        let value = json!({
            "result": [
                { "Scenario": "Long-term let", "Monthly cashflow": "220.5", "Annual cashflow": "2646", "Cash-on-cash (%)": "8.17" },
                { "Scenario": "Short-term let", "Monthly cashflow": "-10", "Annual cashflow": "-120", "Cash-on-cash (%)": "-0.37" }
            ],
            "warnings": []
        });
        assert_eq!(
            minimal_lines(&value),
            vec!["Long-term let: 220.5", "Short-term let: -10"]
        );
    }

    #[test]
    fn test_full_appraisal_uses_embedded_summary() {
        let value = json!({
            "result": {
                "purchase": { "tax": "5000" },
                "summary": [
                    { "Scenario": "Long-term let", "Monthly cashflow": "100" },
                    { "Scenario": "Short-term let", "Monthly cashflow": "300" }
                ]
            }
        });
        assert_eq!(minimal_lines(&value).len(), 2);
    }

    #[test]
    fn test_priority_key_wins() {
        let value = json!({ "result": { "price": "250000", "tax": "15000" } });
        assert_eq!(minimal_lines(&value), vec!["15000"]);
    }
}
