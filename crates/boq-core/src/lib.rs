#![deny(warnings)]

//! Core domain models for bill-of-quantities editing.
//!
//! This crate defines the serializable types shared by the recalculation
//! engine and its drivers, with validation helpers for data loaded from
//! outside (works catalogs, line items).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Opaque identifier of a selectable source item, e.g. "W1".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        SourceId(s.to_string())
    }
}

/// A selectable upstream entity, typically a unit of work from the works library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    /// Identifier, unique within a catalog.
    pub id: SourceId,
    /// Display name; not used by the engine.
    #[serde(default)]
    pub name: String,
    /// Unit of measure, e.g. "m3"; not used by the engine.
    #[serde(default)]
    pub unit: String,
    /// Nominal quantity for one unit of the item (>= 0).
    #[serde(alias = "baseQuantity")]
    pub base_quantity: f64,
}

impl SourceItem {
    /// Item with only the fields the engine reads.
    pub fn new(id: &str, base_quantity: f64) -> Self {
        Self {
            id: SourceId::from(id),
            name: String::new(),
            unit: String::new(),
            base_quantity,
        }
    }
}

/// Editing state for one derived-quantity calculation.
///
/// Coefficients are kept exactly as entered; `None` means the field is empty.
/// Defaulting to 1 happens in the engine, not here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoefficientInputs {
    /// Chosen source item, if any.
    #[serde(default)]
    pub selected_source: Option<SourceId>,
    /// Consumption per unit of the parent work.
    #[serde(default)]
    pub consumption_coefficient: Option<f64>,
    /// Unit conversion multiplier.
    #[serde(default)]
    pub conversion_coefficient: Option<f64>,
}

impl CoefficientInputs {
    /// Inputs with a source selected and both coefficients empty.
    pub fn selecting(id: &str) -> Self {
        Self {
            selected_source: Some(SourceId::from(id)),
            ..Default::default()
        }
    }

    pub fn with_coefficients(mut self, consumption: Option<f64>, conversion: Option<f64>) -> Self {
        self.consumption_coefficient = consumption;
        self.conversion_coefficient = conversion;
        self
    }
}

/// One bill-of-quantities line: the record the derived quantity is bound into.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description shown in the BOQ.
    #[serde(default)]
    pub description: String,
    /// Quantity; `None` until entered or derived.
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Price per unit of quantity (>= 0).
    #[serde(default)]
    pub unit_rate: Decimal,
}

/// User input events that drive an editing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A source item was picked; an empty id clears the selection.
    SelectSource { id: String },
    /// The consumption coefficient field was edited.
    SetConsumption {
        #[serde(default)]
        value: Option<f64>,
    },
    /// The conversion coefficient field was edited.
    SetConversion {
        #[serde(default)]
        value: Option<f64>,
    },
}

/// Validation errors for externally supplied data.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Quantities must be non-negative.
    #[error("negative quantity is invalid")]
    NegativeQuantity,
    /// Source ids must not be blank.
    #[error("source id must not be empty")]
    EmptyId,
    /// The same id appears twice in one catalog.
    #[error("duplicate source id: {0}")]
    DuplicateSource(String),
    /// Unit rate must be non-negative.
    #[error("negative unit rate is invalid")]
    NegativeRate,
}

fn validate_quantity(q: f64) -> Result<(), ValidationError> {
    if !q.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if q < 0.0 {
        return Err(ValidationError::NegativeQuantity);
    }
    Ok(())
}

/// Validate a single source item. A zero base quantity is allowed.
pub fn validate_source_item(item: &SourceItem) -> Result<(), ValidationError> {
    if item.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    validate_quantity(item.base_quantity)
}

/// Validate a catalog of source items, including id uniqueness.
pub fn validate_catalog(items: &[SourceItem]) -> Result<(), ValidationError> {
    let mut ids: BTreeSet<&SourceId> = BTreeSet::new();
    for item in items {
        validate_source_item(item)?;
        if !ids.insert(&item.id) {
            return Err(ValidationError::DuplicateSource(item.id.0.clone()));
        }
    }
    Ok(())
}

/// Validate a line item before it is priced.
pub fn validate_line_item(line: &LineItem) -> Result<(), ValidationError> {
    if line.unit_rate < Decimal::ZERO {
        return Err(ValidationError::NegativeRate);
    }
    if let Some(q) = line.quantity {
        validate_quantity(q)?;
    }
    Ok(())
}
