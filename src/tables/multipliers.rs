//! `multiplier_configs`: named score multipliers (e.g. "Event 1.5x").

use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::store::OrderBy;
use crate::tables::{coerce_multiplier_value, lenient_decimal, null_as_false, string_or_number_id, ConfigTable, NumericInput};

/// Marker for the multiplier table.
#[derive(Debug, Clone, Copy)]
pub struct Multipliers;

/// A stored multiplier row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multiplier {
    #[serde(deserialize_with = "string_or_number_id")]
    pub id: String,
    pub name: String,
    /// Strictly positive factor.
    #[serde(deserialize_with = "lenient_decimal")]
    pub value: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_active: bool,
}

/// Editable multiplier fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierForm {
    pub name: String,
    pub value: f64,
    pub description: String,
    pub is_active: bool,
}

impl Default for MultiplierForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: 1.0,
            description: String::new(),
            is_active: true,
        }
    }
}

/// Multiplier form as submitted. Missing fields take the empty-form defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MultiplierInput {
    pub name: String,
    pub value: Option<NumericInput>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl ConfigTable for Multipliers {
    const TABLE: &'static str = "multiplier_configs";
    const CACHE_KEY: CacheKey = CacheKey("admin-multipliers");
    const ORDERING: &'static [OrderBy] = &[OrderBy::asc("value")];
    const NOUN: &'static str = "multiplier";
    const TITLE: &'static str = "Multiplier";

    type Record = Multiplier;
    type Form = MultiplierForm;
    type Input = MultiplierInput;

    fn record_id(record: &Multiplier) -> &str {
        &record.id
    }

    fn form_from_record(record: &Multiplier) -> MultiplierForm {
        MultiplierForm {
            name: record.name.clone(),
            value: record.value,
            description: record.description.clone().unwrap_or_default(),
            is_active: record.is_active,
        }
    }

    fn form_from_input(input: MultiplierInput) -> MultiplierForm {
        MultiplierForm {
            name: input.name,
            value: coerce_multiplier_value(input.value.as_ref()),
            description: input.description.unwrap_or_default(),
            is_active: input.is_active.unwrap_or(true),
        }
    }
}
