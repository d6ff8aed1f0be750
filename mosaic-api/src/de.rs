//! Lenient field decoders for loosely typed documents.
//!
//! Documents come from hand-written JSON and remote payloads, so scalar
//! fields accept the obvious neighbouring representation (`"12"` for `12`,
//! `3` for `"3"`) and `null` always means "use the default".

use serde::Deserialize;
use serde::de::{Deserializer, Error};
use serde_json::Value;

pub(crate) fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => Ok(n.as_f64().unwrap_or(0.0) as f32),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

pub(crate) fn lenient_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f32(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    })
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a string, got {other}"))),
    }
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            _ => Err(D::Error::custom(format!("expected a boolean, got {s:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

/// Treat an explicit `null` like an absent key for collection fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `dynamic-height` defaults to `true` when absent, so it needs its own
/// default fn alongside the lenient decoder.
pub(crate) fn default_true() -> bool {
    true
}

/// Like [`lenient_bool`], but `null` means `true`.
pub(crate) fn lenient_bool_or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(true),
        Some(value) => lenient_bool(value).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient_f32")]
        number: f32,
        #[serde(default, deserialize_with = "lenient_string")]
        text: String,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_usize")]
        count: usize,
    }

    #[test]
    fn test_coerces_neighbouring_types() {
        let decoded: Lenient = serde_json::from_str(
            r#"{"number": "4.5", "text": 12, "flag": "yes", "count": "3"}"#,
        )
        .unwrap();
        assert_eq!(decoded.number, 4.5);
        assert_eq!(decoded.text, "12");
        assert!(decoded.flag);
        assert_eq!(decoded.count, 3);
    }

    #[test]
    fn test_nulls_take_defaults() {
        let decoded: Lenient =
            serde_json::from_str(r#"{"number": null, "text": null, "flag": null}"#).unwrap();
        assert_eq!(decoded.number, 0.0);
        assert_eq!(decoded.text, "");
        assert!(!decoded.flag);
        assert_eq!(decoded.count, 0);
    }

    #[test]
    fn test_rejects_structured_values_for_scalars() {
        let result: Result<Lenient, _> = serde_json::from_str(r#"{"number": {"a": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let decoded: Lenient = serde_json::from_str(r#"{"count": -2}"#).unwrap();
        assert_eq!(decoded.count, 0);
    }
}
