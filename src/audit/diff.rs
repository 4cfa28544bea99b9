//! Human-readable diffs for audit entries

use serde_json::{Map, Value};

const MAX_STRING_CHARS: usize = 50;

/// Describe the top-level field changes between two JSON values
///
/// `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(b), Value::Object(a)) => object_changes(b, a),
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn object_changes(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<String> {
    let mut changes = Vec::new();
    for (key, old) in before {
        match after.get(key) {
            Some(new) if new != old => {
                changes.push(format!("{}: {} -> {}", key, format_value(old), format_value(new)))
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(old))),
        }
    }
    for (key, new) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(new)));
        }
    }
    changes
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
