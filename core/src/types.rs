//! Payload DTOs for the checkout API.
//!
//! # Design
//! The order form is the backend's aggregate and is treated as opaque: only
//! `orderFormId` is typed, every other field is carried through untouched.
//! Simulation requests are fully typed because callers build them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The backend's cart/checkout aggregate. No field is required, so any JSON
/// object the backend answers with is passed through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderForm {
    #[serde(rename = "orderFormId", default, skip_serializing_if = "Option::is_none")]
    pub order_form_id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OrderForm {
    pub fn id(&self) -> Option<&str> {
        self.order_form_id.as_deref()
    }

    /// Top-level field lookup, e.g. `items` or `marketingData`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn items(&self) -> &[Value] {
        self.get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A decoded success body with its status and headers preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub data: T,
}

/// Item quantity as the backend accepts it: any JSON number or a string.
/// Neither form is range-checked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Quantity {
    Number(Number),
    Text(String),
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Quantity::Number(value.into())
    }
}

impl From<Number> for Quantity {
    fn from(value: Number) -> Self {
        Quantity::Number(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationItem {
    pub id: String,
    pub quantity: Quantity,
    pub seller: String,
}

impl SimulationItem {
    pub fn new(id: impl Into<String>, quantity: impl Into<Quantity>, seller: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quantity: quantity.into(),
            seller: seller.into(),
        }
    }
}

/// Stateless pricing/shipping estimate request. Item order is preserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub country: String,
    pub items: Vec<SimulationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_checked_in: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_tables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_data: Option<BTreeMap<String, String>>,
}

impl SimulationRequest {
    pub fn new(country: impl Into<String>, items: Vec<SimulationItem>) -> Self {
        Self {
            country: country.into(),
            items,
            postal_code: None,
            is_checked_in: None,
            price_tables: None,
            marketing_data: None,
        }
    }
}
