//! Field-level helpers shared by the dialect mappers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

use crate::models::Record;

/// Flat tier label paired with its packaged counterpart.
pub const TIER_VOCABULARY: [(&str, &str); 3] = [("基础", "基石"), ("进阶", "专精"), ("精通", "大师")];

/// Separators accepted between the two domains of a profession.
const DOMAIN_SEPARATORS: [&str; 4] = ["&", "和", "，", ","];

/// Mints a synthetic identifier: the decimal form of a random 128-bit UUID.
pub fn mint_id() -> String {
    Uuid::new_v4().as_u128().to_string()
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Renders a scalar as display text. Strings come out raw, `null` as empty,
/// anything else as compact JSON.
pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn get_text(record: &Record, key: &str) -> String {
    record.get(key).map(text).unwrap_or_default()
}

/// Like [`get_value_or`], but rendered as text.
pub fn get_text_or(record: &Record, key: &str, default: &str) -> String {
    record
        .get(key)
        .map(text)
        .unwrap_or_else(|| default.to_string())
}

/// The field if present (even when empty), else `default`.
pub fn get_value_or(record: &Record, key: &str, default: &str) -> Value {
    record
        .get(key)
        .cloned()
        .unwrap_or_else(|| Value::String(default.to_string()))
}

/// 整数转换：整数、整数值的浮点数（如 `11.0`）以及数字字符串
///
/// Integer coercion for fields that must be numeric on the packaged side.
pub fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
                .map(|n| n as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Digit-only strings become integers; everything else passes through.
pub fn digits_to_int(value: &Value) -> Value {
    match value {
        Value::String(text) if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

/// Splits a profession's domain string into its two domains.
///
/// `奥秘&利刃`, `奥秘和利刃`, `奥秘，利刃` and `奥秘 + 利刃` all give
/// `("奥秘", "利刃")`. Missing parts are empty.
pub fn split_domains(raw: &str) -> (String, String) {
    let mut normalized = raw.to_string();
    for separator in DOMAIN_SEPARATORS {
        normalized = normalized.replace(separator, "+");
    }
    let normalized = normalized.replace(' ', "");

    let mut parts = normalized.split('+');
    let first = parts.next().unwrap_or_default().to_string();
    let second = parts.next().unwrap_or_default().to_string();
    (first, second)
}

pub fn tier_to_packaged(label: &str) -> String {
    TIER_VOCABULARY
        .iter()
        .fold(label.to_string(), |acc, (flat, packaged)| {
            acc.replace(flat, packaged)
        })
}

pub fn tier_to_flat(label: &str) -> String {
    TIER_VOCABULARY
        .iter()
        .fold(label.to_string(), |acc, (flat, packaged)| {
            acc.replace(packaged, flat)
        })
}

/// `null` reads as an empty string; other non-string values are still rejected.
pub fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts ids written either as strings or as bare numbers.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text(&value))
}
