//! Custom serde helpers for Coinone's loosely typed JSON.
//!
//! Coinone returns the same field as a decimal string, a bare number, an empty
//! string or `null` depending on endpoint and account state. These modules
//! absorb those variations at the edge.

use std::fmt;

use serde::{Deserialize, Deserializer, de};

/// Deserialize a decimal that may be missing, `null`, `""`, a string or a number.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use rust_decimal::Decimal;
/// use coinone_api_client::types::serde_helpers::maybe_decimal;
///
/// #[derive(Deserialize, Debug)]
/// struct Balance {
///     #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
///     average_price: Option<Decimal>,
/// }
///
/// let balance: Balance = serde_json::from_str(r#"{"average_price":""}"#).unwrap();
/// assert!(balance.average_price.is_none());
///
/// let balance: Balance = serde_json::from_str(r#"{"average_price":"51000000.5"}"#).unwrap();
/// assert_eq!(balance.average_price.unwrap().to_string(), "51000000.5");
/// ```
pub mod maybe_decimal {
    use super::*;
    use rust_decimal::Decimal;

    /// Deserialize an optional decimal from any of the shapes Coinone uses.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MaybeDecimalVisitor;

        impl<'de> de::Visitor<'de> for MaybeDecimalVisitor {
            type Value = Option<Decimal>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal string, a number, an empty string or null")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let v = v.trim();
                if v.is_empty() {
                    return Ok(None);
                }
                v.parse().map(Some).map_err(de::Error::custom)
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_str(&v)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Some(Decimal::from(v)))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Some(Decimal::from(v)))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Decimal::try_from(v).map(Some).map_err(de::Error::custom)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }
        }

        deserializer.deserialize_any(MaybeDecimalVisitor)
    }
}

/// Helper for empty strings that should be deserialized as None.
///
/// Secondary addresses (memo, destination tag) come back as `""` when unset.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use coinone_api_client::types::serde_helpers::empty_string_as_none;
///
/// #[derive(Deserialize, Debug)]
/// struct Address {
///     #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
///     secondary_address: Option<String>,
/// }
///
/// let address: Address = serde_json::from_str(r#"{"secondary_address":""}"#).unwrap();
/// assert!(address.secondary_address.is_none());
/// ```
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, returning None if empty or blank.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.trim().is_empty()))
    }
}

/// `skip_serializing_if` predicate for optional strings that must not be sent blank.
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}
