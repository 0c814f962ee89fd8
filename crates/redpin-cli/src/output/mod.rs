use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;

pub mod table;

/// Serialize `value` in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Raw => serde_json::to_string(value)?,
        OutputFormat::Table => tabulate(serde_json::to_value(value)?),
    };
    Ok(rendered)
}

pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Table layout for a response value.
///
/// Responses wrapping one list (`{"locations": [...]}`) show the list. A list
/// of objects becomes one row per object; any other object becomes a
/// two-column field listing. Nested objects such as a fingerprint's
/// measurement are flattened into dotted columns.
fn tabulate(value: Value) -> String {
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.values().all(Value::is_array) => {
            map.values_mut().next().map(Value::take).unwrap_or_default()
        }
        other => other,
    };

    match value {
        Value::Array(items) if items.is_empty() => String::from("(no rows)"),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let records: Vec<Vec<(String, String)>> = items
                .iter()
                .filter_map(Value::as_object)
                .map(flatten)
                .collect();
            record_table(&records)
        }
        Value::Array(items) => {
            let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
            table::render_table(&["value"], &rows)
        }
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = flatten(&map)
                .into_iter()
                .map(|(field, value)| vec![field, value])
                .collect();
            table::render_table(&["field", "value"], &rows)
        }
        scalar => table::render_table(&["value"], &[vec![cell(&scalar)]]),
    }
}

fn record_table(records: &[Vec<(String, String)>]) -> String {
    let mut headers: Vec<&str> = Vec::new();
    for (field, _) in records.iter().flatten() {
        if !headers.contains(&field.as_str()) {
            headers.push(field);
        }
    }
    // Identity column leads.
    headers.sort_by_key(|header| (*header != "id", *header));

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|header| {
                    record
                        .iter()
                        .find(|(field, _)| field == header)
                        .map_or_else(|| String::from("-"), |(_, value)| value.clone())
                })
                .collect()
        })
        .collect();
    table::render_table(&headers, &rows)
}

fn flatten(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    flatten_into("", map, &mut fields);
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, fields: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let field = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => flatten_into(&field, inner, fields),
            other => fields.push((field, cell(other))),
        }
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(s) => s.clone(),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_number) => items
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(","),
        // Readings and similar lists only show their size.
        Value::Array(items) => format!("[{}]", items.len()),
        other => other.to_string(),
    }
}
