//! Lenient serde helpers for server payloads
//!
//! The card API is loose about scalar types: ids arrive as numbers or strings,
//! descriptive fields ("length", "weight", "card_number") may be numeric, and
//! quantities occasionally come back as numeric strings.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Scalar that is either a JSON string or a JSON number, kept as text.
struct TextOrNumber(String);

impl<'de> Deserialize<'de> for TextOrNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = TextOrNumber;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(TextOrNumber(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(TextOrNumber(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(TextOrNumber(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(TextOrNumber(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(TextOrNumber(value.to_string()))
            }
        }

        deserializer.deserialize_any(TextVisitor)
    }
}

/// Deserialize a required string-or-number into `String`
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(|t| t.0)
}

/// Deserialize an optional string-or-number; null and "" become `None`
pub fn option_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|t| t.0).filter(|s| !s.is_empty()))
}

/// Deserialize an optional value parsed from text; null and "" become `None`
///
/// Anything else must parse, so unknown values still fail loudly.
pub fn option_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match option_text(deserializer)? {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Deserialize a quantity that may be sent as a number or a numeric string;
/// null counts as zero
pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(TextOrNumber(raw)) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("invalid quantity: {raw}"))),
    }
}
