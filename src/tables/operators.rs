//! `operator_configs`: entries of the operator dropdown, ordered by index.

use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::store::OrderBy;
use crate::tables::{coerce_order_index, lenient_order_index, null_as_false, string_or_number_id, ConfigTable, NumericInput};

/// Marker for the operator table.
#[derive(Debug, Clone, Copy)]
pub struct Operators;

/// A stored operator row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    #[serde(deserialize_with = "string_or_number_id")]
    pub id: String,
    pub name: String,
    /// Sort key. Not unique; ties break by name.
    #[serde(default, deserialize_with = "lenient_order_index")]
    pub order_index: u32,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_active: bool,
}

/// Editable operator fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorForm {
    pub name: String,
    pub order_index: u32,
    pub is_active: bool,
}

impl Default for OperatorForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            order_index: 0,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OperatorInput {
    pub name: String,
    pub order_index: Option<NumericInput>,
    pub is_active: Option<bool>,
}

impl ConfigTable for Operators {
    const TABLE: &'static str = "operator_configs";
    const CACHE_KEY: CacheKey = CacheKey("admin-operators");
    const ORDERING: &'static [OrderBy] = &[OrderBy::asc("order_index"), OrderBy::asc("name")];
    const NOUN: &'static str = "operator";
    const TITLE: &'static str = "Operator";

    type Record = Operator;
    type Form = OperatorForm;
    type Input = OperatorInput;

    fn record_id(record: &Operator) -> &str {
        &record.id
    }

    fn form_from_record(record: &Operator) -> OperatorForm {
        OperatorForm {
            name: record.name.clone(),
            order_index: record.order_index,
            is_active: record.is_active,
        }
    }

    fn form_from_input(input: OperatorInput) -> OperatorForm {
        OperatorForm {
            name: input.name,
            order_index: coerce_order_index(input.order_index.as_ref()),
            is_active: input.is_active.unwrap_or(true),
        }
    }
}
