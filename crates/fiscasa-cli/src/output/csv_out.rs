use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// The first list of rows in the result (schedule obligations, months of a
/// balance) becomes the CSV body; otherwise the result is written as
/// field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match find_rows(result) {
        Some(rows) => write_rows(&mut wtr, rows),
        None => write_fields(&mut wtr, result),
    }

    let _ = wtr.flush();
}

fn find_rows(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            Some(items.as_slice())
        }
        Value::Object(map) => map.values().find_map(find_rows),
        _ => None,
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let _ = wtr.write_record(["field", "value"]);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        other => {
            let _ = wtr.write_record(["value", &format_csv_value(other)]);
        }
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
