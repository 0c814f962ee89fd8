use std::io::Read;

use anyhow::Context;

/// Read a JSON document from a file path, or from stdin when `input` is `-`.
pub fn read_json(input: &str) -> anyhow::Result<serde_json::Value> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    };
    parse_json(&text).with_context(|| format!("{input} does not hold valid JSON"))
}

fn parse_json(text: &str) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(text)?)
}

/// Read a JSON array of payloads.
pub fn read_json_array(input: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    match read_json(input)? {
        serde_json::Value::Array(items) => Ok(items),
        _ => anyhow::bail!("{input} must hold a JSON array of payloads"),
    }
}
