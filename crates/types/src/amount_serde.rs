//! Serde adapters for wide integers
//!
//! TOML integers are signed 64-bit, so u128 amounts are written as decimal
//! strings. Reading accepts either a string or a plain integer.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

/// `#[serde(with = "decimal_u128")]`
pub mod decimal_u128 {
    use super::*;

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalU128Visitor)
    }
}

/// `#[serde(with = "decimal_u256")]`
pub mod decimal_u256 {
    use super::*;
    use ascent_math::U256;

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: String = serde::Deserialize::deserialize(deserializer)?;
        U256::from_str_radix(text.trim(), 10).map_err(de::Error::custom)
    }
}

struct DecimalU128Visitor;

impl<'de> Visitor<'de> for DecimalU128Visitor {
    type Value = u128;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
        Ok(u128::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<u128, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u128, E> {
        u128::try_from(value).map_err(|_| E::custom(format!("negative amount: {}", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
        let digits: String = value.chars().filter(|c| *c != '_').collect();
        digits
            .parse::<u128>()
            .map_err(|e| E::custom(format!("invalid amount '{}': {}", value, e)))
    }
}
