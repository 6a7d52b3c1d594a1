//! Configuration tables managed by the admin service.
//!
//! Each table is a zero-sized marker implementing [`ConfigTable`], which ties
//! together the remote table name, its cache key, its sort order and the
//! record / form / input types used by the generic service.

pub mod multipliers;
pub mod operators;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Debug;

use crate::cache::CacheKey;
use crate::store::OrderBy;

pub use multipliers::{Multiplier, MultiplierForm, MultiplierInput, Multipliers};
pub use operators::{Operator, OperatorForm, OperatorInput, Operators};

/// A remote table editable through the admin service.
pub trait ConfigTable: Send + Sync + 'static {
    /// Remote table name.
    const TABLE: &'static str;
    /// Key of the cached full read.
    const CACHE_KEY: CacheKey;
    /// Ordering applied to every full read.
    const ORDERING: &'static [OrderBy];
    /// Lowercase noun used in notices ("multiplier").
    const NOUN: &'static str;
    /// Capitalized noun used in notices and titles ("Multiplier").
    const TITLE: &'static str;

    /// A stored row.
    type Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static;
    /// The editable fields, already coerced.
    type Form: Serialize + Default + Clone + Debug + PartialEq + Send + Sync + 'static;
    /// Raw form input as submitted, before numeric coercion.
    type Input: DeserializeOwned + Send + 'static;

    fn record_id(record: &Self::Record) -> &str;

    /// Prefill the edit form from an existing row.
    fn form_from_record(record: &Self::Record) -> Self::Form;

    /// Apply the default-substitution rules to raw input.
    fn form_from_input(input: Self::Input) -> Self::Form;
}

/// Substituted for a missing, non-numeric or non-positive multiplier value.
pub const DEFAULT_MULTIPLIER_VALUE: f64 = 1.0;

/// Substituted for a missing, non-numeric or negative order index.
pub const DEFAULT_ORDER_INDEX: u32 = 0;

/// A numeric form field, submitted either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    /// Booleans, objects, arrays and null. Never numeric.
    Other(serde_json::Value),
}

impl NumericInput {
    /// The finite decimal this input denotes, if any. Text is trimmed first.
    pub fn to_decimal(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(n) => *n,
            NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
            NumericInput::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        NumericInput::Number(n)
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

/// Multiplier value rule: anything that is not a positive decimal becomes 1.
pub fn coerce_multiplier_value(input: Option<&NumericInput>) -> f64 {
    input
        .and_then(NumericInput::to_decimal)
        .filter(|v| *v > 0.0)
        .unwrap_or(DEFAULT_MULTIPLIER_VALUE)
}

/// Order index rule: fractions truncate, anything negative or non-numeric becomes 0.
pub fn coerce_order_index(input: Option<&NumericInput>) -> u32 {
    input
        .and_then(NumericInput::to_decimal)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u32)
        .unwrap_or(DEFAULT_ORDER_INDEX)
}

/// Nullable boolean columns read as `false` when null.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Identifiers may be text (uuid) or integer (serial) depending on the table.
pub(crate) fn string_or_number_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!("invalid row id: {}", other))),
    }
}

/// Stored order indexes go through the same rule as form input, so legacy
/// null or negative values read as 0.
pub(crate) fn lenient_order_index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_order_index(Option::<NumericInput>::deserialize(deserializer)?.as_ref()))
}

/// Numeric columns may arrive as strings from some PostgREST setups.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumericInput::deserialize(deserializer)?
        .to_decimal()
        .ok_or_else(|| D::Error::custom("expected a decimal number"))
}
