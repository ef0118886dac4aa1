use serde_json::Value;

/// Headline figure of each command, in priority order. Dotted keys reach
/// into nested objects.
const PRIORITY_KEYS: [&str; 10] = [
    "net",
    "total_net",
    "totals.net",
    "annual",
    "schedule.total_to_pay",
    "total_to_pay",
    "plan.due_this_cycle",
    "annual_tax_total",
    "paid",
    "added",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(val) = PRIORITY_KEYS
        .iter()
        .filter_map(|key| lookup(result, key))
        .find(|v| !v.is_null())
    {
        println!("{}", format_minimal(val));
        return;
    }

    match result.as_object().and_then(|m| m.iter().next()) {
        Some((key, val)) => println!("{}: {}", key, format_minimal(val)),
        None => println!("{}", format_minimal(result)),
    }
}

fn lookup<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |v, part| v.as_object()?.get(part))
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
