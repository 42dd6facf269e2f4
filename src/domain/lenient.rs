//! Tolerant decoding for fields whose JSON type varies between upstream
//! deployments (numbers sent as strings, flags sent as `"1"`, `false` in place
//! of an empty list).

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Integer id given either as a JSON number or as a numeric string.
pub fn id_of(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("order id {n} is not an integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("order id {s:?} is not an integer")),
        other => Err(format!("invalid order id: {other}")),
    }
}

/// Monetary amount given either as a decimal string or as a JSON number.
pub fn amount_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Free text. Numbers and booleans are rendered; other values are dropped.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    id_of(&Value::deserialize(deserializer)?).map_err(de::Error::custom)
}

/// Boolean-ish flag. `null`, absent and unrecognised values become `None`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "si" | "sí" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// List of URLs. Anything that is not an array (including `false`, which some
/// CMS field plugins emit for an empty gallery) becomes `None`; non-string
/// entries are dropped.
pub fn url_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

pub fn amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(amount_of(&Value::deserialize(deserializer)?))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(&Value::deserialize(deserializer)?))
}
