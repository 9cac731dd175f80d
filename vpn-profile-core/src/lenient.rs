//! Tolerant decoders for hand-edited and older store files.
//!
//! Older generations wrote numbers where strings are expected today. A
//! damaged value costs only itself: bad list entries are skipped, bad fields
//! take their own default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Render any JSON scalar as text; `null` becomes empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

/// Like [`string`], but keeps `null`/missing as `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        other => Ok(Some(value_to_string(other))),
    }
}

/// A day count written either as an integer or as a numeric string.
///
/// Unreadable counts decode as `None` so the owning struct can substitute
/// the default for that one field.
pub fn opt_day_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(day_count_from_value(&Value::deserialize(deserializer)?))
}

fn day_count_from_value(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(number) => number.as_u64().and_then(|days| u32::try_from(days).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warn!(value = %value, "unreadable day count, using default");
    }
    parsed
}

/// Decode a list element by element, skipping (and logging) the elements
/// that do not decode. A non-array value yields an empty list.
pub fn lossy_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(vec_from_value(Some(&value)))
}

/// Borrowed-value form of [`lossy_vec`].
pub fn vec_from_value<T>(value: Option<&Value>) -> Vec<T>
where
    T: DeserializeOwned,
{
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(
                value = %other,
                target_type = std::any::type_name::<T>(),
                "expected a list, using an empty one"
            );
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(
                    error = %err,
                    index,
                    target_type = std::any::type_name::<T>(),
                    "skipping unreadable list entry"
                );
                None
            }
        })
        .collect()
}

/// Decode `T`, falling back to `T::default()` when the value has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_or_default(Some(&value)))
}

/// Decode an optional borrowed value, falling back to `T::default()`.
pub fn from_value_or_default<T>(value: Option<&Value>) -> T
where
    T: DeserializeOwned + Default,
{
    match value {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
            warn!(
                error = %err,
                target_type = std::any::type_name::<T>(),
                "unreadable value, using defaults"
            );
            T::default()
        }),
    }
}

/// Text of a JSON value the way older files meant it: strings verbatim,
/// scalars formatted, `null` empty.
pub fn value_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Non-empty text of an optional JSON value.
pub fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value
        .cloned()
        .map(value_to_string)
        .filter(|text| !text.is_empty())
}
