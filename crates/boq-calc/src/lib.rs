#![deny(warnings)]

//! Derived-quantity recalculation for BOQ line items.
//!
//! This crate keeps a line's quantity in step with the selected work and its
//! two coefficients:
//! - Source lookup over an externally supplied works list
//! - Coefficient defaulting and the recalculation itself
//! - A synchronous controller wired to form callbacks, and a per-line session
//! - Pricing of finished lines with decimal money

use boq_core::{CoefficientInputs, LineItem, SessionEvent, SourceId, SourceItem};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors produced when pricing lines.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    /// Quantity is NaN or infinite.
    #[error("non-finite quantity: {0}")]
    NonFinite(f64),
    /// Finite quantity beyond the decimal range.
    #[error("quantity out of decimal range: {0}")]
    OutOfRange(f64),
    /// Product or sum exceeded the decimal range.
    #[error("decimal overflow")]
    Overflow,
    /// Unit rate must be non-negative.
    #[error("negative unit rate: {0}")]
    NegativeRate(Decimal),
}

/// Read-only lookup of selectable source items.
///
/// Implementations never cache; the caller hands in the current list on every
/// call. An empty id resolves to `None`.
pub trait SourceRegistry {
    fn find(&self, id: &str) -> Option<&SourceItem>;
}

impl SourceRegistry for [SourceItem] {
    fn find(&self, id: &str) -> Option<&SourceItem> {
        if id.is_empty() {
            return None;
        }
        self.iter().find(|item| item.id.as_str() == id)
    }
}

impl SourceRegistry for Vec<SourceItem> {
    fn find(&self, id: &str) -> Option<&SourceItem> {
        self.as_slice().find(id)
    }
}

impl SourceRegistry for BTreeMap<SourceId, SourceItem> {
    fn find(&self, id: &str) -> Option<&SourceItem> {
        if id.is_empty() {
            return None;
        }
        self.get(&SourceId::from(id))
    }
}

/// Multiplier used when a coefficient is unset or unusable.
pub const DEFAULT_COEFFICIENT: f64 = 1.0;

/// Coerce a raw coefficient to the value used in the product.
///
/// Empty, zero, NaN and infinite inputs all become [`DEFAULT_COEFFICIENT`]:
/// an unset multiplier must never zero out (or poison) a quantity.
///
/// Example:
/// assert_eq!(effective_coefficient(None), 1.0);
/// assert_eq!(effective_coefficient(Some(0.0)), 1.0);
/// assert_eq!(effective_coefficient(Some(1.5)), 1.5);
pub fn effective_coefficient(raw: Option<f64>) -> f64 {
    match raw {
        Some(c) if c.is_finite() && c != 0.0 => c,
        _ => DEFAULT_COEFFICIENT,
    }
}

/// Whether a base quantity may drive a recalculation (non-zero and finite).
pub fn has_usable_base(base_quantity: f64) -> bool {
    base_quantity.is_finite() && base_quantity != 0.0
}

/// Derived quantity = base × consumption × conversion, with defaulted coefficients.
///
/// Total over its inputs; returns 0 when `base_quantity` is 0. Callers gate on
/// [`has_usable_base`] before writing the result anywhere.
///
/// Example:
/// assert_eq!(recalculate(10.0, Some(2.0), Some(1.5)), 30.0);
pub fn recalculate(base_quantity: f64, consumption: Option<f64>, conversion: Option<f64>) -> f64 {
    base_quantity * effective_coefficient(consumption) * effective_coefficient(conversion)
}

/// Outbound effect of the controller on the surrounding form.
pub trait FormBinding {
    fn set_derived_quantity(&mut self, value: f64);
}

/// The consumer-visible quantity field of one line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DerivedQuantity {
    value: Option<f64>,
}

impl DerivedQuantity {
    /// Field pre-filled with a user-entered value.
    pub fn with_value(value: f64) -> Self {
        Self { value: Some(value) }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl FormBinding for DerivedQuantity {
    fn set_derived_quantity(&mut self, value: f64) {
        self.value = Some(value);
    }
}

/// Controller state. Recomputation never suspends, so `Recomputing` is only
/// observable from inside a [`FormBinding`] callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Recomputing,
}

/// Why a trigger left the derived quantity untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Coefficient edited with no source selected.
    NoSelection,
    /// Selected id is not in the registry.
    UnknownSource,
    /// Source found but its base quantity is zero or not finite.
    UnusableBase,
    /// The product overflowed to infinity.
    NonFiniteResult,
}

/// Result of one trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncOutcome {
    Recomputed(f64),
    Skipped(SkipReason),
}

impl SyncOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            SyncOutcome::Recomputed(v) => Some(*v),
            SyncOutcome::Skipped(_) => None,
        }
    }
}

/// Runs the recalculation in response to form events and writes the result back.
///
/// Both entry points take the current field values explicitly; the controller
/// holds no form state of its own.
#[derive(Debug, Default)]
pub struct SyncController {
    state: SyncState,
    writes: u64,
}

impl SyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Number of successful writes to the derived field so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// The source selection changed to `id`.
    pub fn on_source_selection_changed<R, F>(
        &mut self,
        registry: &R,
        id: &str,
        inputs: &CoefficientInputs,
        form: &mut F,
    ) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
        F: FormBinding + ?Sized,
    {
        self.recompute(registry, id, inputs, form)
    }

    /// Either coefficient changed; `inputs` carries the current values.
    pub fn on_coefficient_changed<R, F>(
        &mut self,
        registry: &R,
        inputs: &CoefficientInputs,
        form: &mut F,
    ) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
        F: FormBinding + ?Sized,
    {
        match inputs.selected_source.as_ref() {
            Some(id) => self.recompute(registry, id.as_str(), inputs, form),
            None => {
                trace!("coefficient changed with no source selected");
                SyncOutcome::Skipped(SkipReason::NoSelection)
            }
        }
    }

    fn recompute<R, F>(
        &mut self,
        registry: &R,
        id: &str,
        inputs: &CoefficientInputs,
        form: &mut F,
    ) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
        F: FormBinding + ?Sized,
    {
        let Some(item) = registry.find(id) else {
            trace!(source = id, "unknown source, quantity left unchanged");
            return SyncOutcome::Skipped(SkipReason::UnknownSource);
        };
        if !has_usable_base(item.base_quantity) {
            trace!(
                source = id,
                base = item.base_quantity,
                "unusable base quantity, quantity left unchanged"
            );
            return SyncOutcome::Skipped(SkipReason::UnusableBase);
        }
        self.state = SyncState::Recomputing;
        let value = recalculate(
            item.base_quantity,
            inputs.consumption_coefficient,
            inputs.conversion_coefficient,
        );
        if !value.is_finite() {
            self.state = SyncState::Idle;
            trace!(source = id, value, "non-finite product, quantity left unchanged");
            return SyncOutcome::Skipped(SkipReason::NonFiniteResult);
        }
        form.set_derived_quantity(value);
        self.writes += 1;
        self.state = SyncState::Idle;
        debug!(
            source = id,
            base = item.base_quantity,
            consumption = effective_coefficient(inputs.consumption_coefficient),
            conversion = effective_coefficient(inputs.conversion_coefficient),
            value,
            "derived quantity updated"
        );
        SyncOutcome::Recomputed(value)
    }
}

/// Editing state of one BOQ line: inputs, the derived field, and its controller.
#[derive(Debug, Default)]
pub struct EditSession {
    inputs: CoefficientInputs,
    quantity: DerivedQuantity,
    controller: SyncController,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for a line that already carries a quantity.
    pub fn with_quantity(quantity: f64) -> Self {
        Self {
            quantity: DerivedQuantity::with_value(quantity),
            ..Default::default()
        }
    }

    pub fn inputs(&self) -> &CoefficientInputs {
        &self.inputs
    }

    pub fn quantity(&self) -> Option<f64> {
        self.quantity.value()
    }

    pub fn writes(&self) -> u64 {
        self.controller.writes()
    }

    /// Pick a source item. An empty id clears the selection.
    pub fn select_source<R>(&mut self, registry: &R, id: &str) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
    {
        self.inputs.selected_source = if id.is_empty() {
            None
        } else {
            Some(SourceId::from(id))
        };
        self.controller
            .on_source_selection_changed(registry, id, &self.inputs, &mut self.quantity)
    }

    pub fn set_consumption<R>(&mut self, registry: &R, value: Option<f64>) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
    {
        self.inputs.consumption_coefficient = value;
        self.controller
            .on_coefficient_changed(registry, &self.inputs, &mut self.quantity)
    }

    pub fn set_conversion<R>(&mut self, registry: &R, value: Option<f64>) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
    {
        self.inputs.conversion_coefficient = value;
        self.controller
            .on_coefficient_changed(registry, &self.inputs, &mut self.quantity)
    }

    pub fn apply<R>(&mut self, registry: &R, event: &SessionEvent) -> SyncOutcome
    where
        R: SourceRegistry + ?Sized,
    {
        match event {
            SessionEvent::SelectSource { id } => self.select_source(registry, id),
            SessionEvent::SetConsumption { value } => self.set_consumption(registry, *value),
            SessionEvent::SetConversion { value } => self.set_conversion(registry, *value),
        }
    }

    /// Apply events in order; later events supersede earlier ones.
    pub fn replay<'a, R, I>(&mut self, registry: &R, events: I) -> Vec<SyncOutcome>
    where
        R: SourceRegistry + ?Sized,
        I: IntoIterator<Item = &'a SessionEvent>,
    {
        events
            .into_iter()
            .map(|event| self.apply(registry, event))
            .collect()
    }

    /// Snapshot the session as a priced BOQ line.
    pub fn to_line_item(&self, description: &str, unit_rate: Decimal) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity: self.quantity(),
            unit_rate,
        }
    }
}

/// Direct entry into the quantity field; the next recompute may overwrite it.
impl FormBinding for EditSession {
    fn set_derived_quantity(&mut self, value: f64) {
        self.quantity.set_derived_quantity(value);
    }
}

/// Cost of one line: quantity × unit rate, rounded to `dp` places (midpoint away from zero).
///
/// Example:
/// let t = line_total(15.0, Decimal::new(250, 2), 2).unwrap();
/// assert_eq!(t, Decimal::new(3750, 2));
pub fn line_total(quantity: f64, unit_rate: Decimal, dp: u32) -> Result<Decimal, CalcError> {
    if unit_rate < Decimal::ZERO {
        return Err(CalcError::NegativeRate(unit_rate));
    }
    if !quantity.is_finite() {
        return Err(CalcError::NonFinite(quantity));
    }
    let q = Decimal::from_f64(quantity).ok_or(CalcError::OutOfRange(quantity))?;
    let total = q.checked_mul(unit_rate).ok_or(CalcError::Overflow)?;
    Ok(total.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

/// Sum of line totals. Lines without a quantity contribute zero.
pub fn boq_total(lines: &[LineItem], dp: u32) -> Result<Decimal, CalcError> {
    let mut total = Decimal::ZERO;
    for line in lines {
        if let Some(q) = line.quantity {
            let cost = line_total(q, line.unit_rate, dp)?;
            total = total.checked_add(cost).ok_or(CalcError::Overflow)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn works() -> Vec<SourceItem> {
        vec![
            SourceItem::new("W1", 10.0),
            SourceItem::new("W0", 0.0),
            SourceItem::new("W3", 4.0),
        ]
    }

    /// Form double that records every write.
    #[derive(Default)]
    struct RecordingForm {
        writes: Vec<f64>,
    }

    impl FormBinding for RecordingForm {
        fn set_derived_quantity(&mut self, value: f64) {
            self.writes.push(value);
        }
    }

    #[test]
    fn coefficient_defaulting() {
        assert_eq!(effective_coefficient(None), 1.0);
        assert_eq!(effective_coefficient(Some(0.0)), 1.0);
        assert_eq!(effective_coefficient(Some(-0.0)), 1.0);
        assert_eq!(effective_coefficient(Some(f64::NAN)), 1.0);
        assert_eq!(effective_coefficient(Some(f64::INFINITY)), 1.0);
        assert_eq!(effective_coefficient(Some(1.5)), 1.5);
        assert_eq!(effective_coefficient(Some(-2.0)), -2.0);
    }

    #[test]
    fn recalculate_basic() {
        assert_eq!(recalculate(10.0, None, None), 10.0);
        assert_eq!(recalculate(10.0, Some(2.0), Some(1.5)), 30.0);
        assert_eq!(recalculate(10.0, Some(0.0), Some(1.5)), 15.0);
        assert_eq!(recalculate(0.0, Some(2.0), Some(3.0)), 0.0);
        assert!(!recalculate(10.0, Some(f64::NAN), None).is_nan());
    }

    #[test]
    fn registry_lookup() {
        let items = works();
        assert_eq!(items.find("W3").map(|i| i.base_quantity), Some(4.0));
        assert!(items.find("nope").is_none());
        assert!(items.find("").is_none());
        assert!(items.as_slice().find("W1").is_some());

        let map: BTreeMap<SourceId, SourceItem> =
            items.iter().map(|i| (i.id.clone(), i.clone())).collect();
        assert_eq!(map.find("W1").map(|i| i.base_quantity), Some(10.0));
        assert!(map.find("").is_none());
    }

    #[test]
    fn controller_writes_once_per_recompute() {
        let items = works();
        let mut ctl = SyncController::new();
        let mut form = RecordingForm::default();
        let inputs = CoefficientInputs::selecting("W1").with_coefficients(Some(2.0), None);

        let out = ctl.on_source_selection_changed(&items, "W1", &inputs, &mut form);
        assert_eq!(out, SyncOutcome::Recomputed(20.0));
        assert_eq!(form.writes, vec![20.0]);
        assert_eq!(ctl.writes(), 1);
        assert_eq!(ctl.state(), SyncState::Idle);

        let out = ctl.on_source_selection_changed(&items, "ZZZ", &inputs, &mut form);
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::UnknownSource));
        let out = ctl.on_source_selection_changed(&items, "W0", &inputs, &mut form);
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::UnusableBase));
        assert_eq!(form.writes.len(), 1);
    }

    #[test]
    fn coefficient_change_without_selection_is_noop() {
        let items = works();
        let mut ctl = SyncController::new();
        let mut field = DerivedQuantity::with_value(7.0);
        let inputs = CoefficientInputs::default().with_coefficients(Some(3.0), Some(2.0));
        let out = ctl.on_coefficient_changed(&items, &inputs, &mut field);
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::NoSelection));
        assert_eq!(field.value(), Some(7.0));
        assert_eq!(ctl.writes(), 0);
    }

    #[test]
    fn example_scenarios() {
        let items = vec![SourceItem::new("W1", 10.0)];
        let mut s = EditSession::new();

        // 1. unset coefficients
        assert_eq!(s.select_source(&items, "W1"), SyncOutcome::Recomputed(10.0));
        assert_eq!(s.quantity(), Some(10.0));

        // 2. both coefficients set
        s.set_consumption(&items, Some(2.0));
        s.set_conversion(&items, Some(1.5));
        assert_eq!(s.quantity(), Some(30.0));

        // 3. zero consumption is treated as 1
        s.set_consumption(&items, Some(0.0));
        assert_eq!(s.quantity(), Some(15.0));

        // 4. unknown id leaves the quantity alone
        let out = s.select_source(&items, "ZZZ");
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::UnknownSource));
        assert_eq!(s.quantity(), Some(15.0));
        assert_eq!(s.inputs().selected_source, Some(SourceId::from("ZZZ")));
    }

    #[test]
    fn empty_id_clears_selection() {
        let items = works();
        let mut s = EditSession::new();
        s.select_source(&items, "W3");
        assert_eq!(s.quantity(), Some(4.0));
        let out = s.select_source(&items, "");
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::UnknownSource));
        assert!(s.inputs().selected_source.is_none());
        let out = s.set_consumption(&items, Some(5.0));
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::NoSelection));
        assert_eq!(s.quantity(), Some(4.0));
    }

    #[test]
    fn zero_base_keeps_user_quantity() {
        let items = works();
        let mut s = EditSession::with_quantity(42.0);
        s.select_source(&items, "W0");
        s.set_consumption(&items, Some(3.0));
        s.set_conversion(&items, Some(2.0));
        assert_eq!(s.quantity(), Some(42.0));
        assert_eq!(s.writes(), 0);
    }

    #[test]
    fn replay_matches_manual_calls() {
        let items = works();
        let events = vec![
            SessionEvent::SelectSource { id: "W1".to_string() },
            SessionEvent::SetConsumption { value: Some(2.0) },
            SessionEvent::SetConversion { value: Some(1.5) },
            SessionEvent::SelectSource { id: "W3".to_string() },
        ];
        let mut s = EditSession::new();
        let outcomes = s.replay(&items, &events);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[3], SyncOutcome::Recomputed(12.0));
        assert_eq!(s.quantity(), Some(12.0));
        assert_eq!(s.writes(), 4);
    }

    #[test]
    fn test_line_total() {
        let t = line_total(15.0, Decimal::new(250, 2), 2).unwrap();
        assert_eq!(t, Decimal::new(3750, 2));
        let t = line_total(1.0, Decimal::new(1005, 3), 2).unwrap();
        assert_eq!(t, Decimal::new(101, 2));
        assert_eq!(
            line_total(1.0, Decimal::new(-1, 0), 2),
            Err(CalcError::NegativeRate(Decimal::new(-1, 0)))
        );
        assert!(matches!(
            line_total(f64::NAN, Decimal::ONE, 2),
            Err(CalcError::NonFinite(_))
        ));
    }

    #[test]
    fn line_total_reports_decimal_limits() {
        assert_eq!(
            line_total(1e28, Decimal::new(100, 0), 2),
            Err(CalcError::Overflow)
        );
        assert_eq!(
            line_total(1e30, Decimal::ONE, 2),
            Err(CalcError::OutOfRange(1e30))
        );
        assert!(matches!(
            line_total(f64::INFINITY, Decimal::ONE, 2),
            Err(CalcError::NonFinite(_))
        ));
        let big = |q| LineItem {
            description: "Bulk fill".to_string(),
            quantity: Some(q),
            unit_rate: Decimal::ONE,
        };
        assert_eq!(boq_total(&[big(5e28), big(5e28)], 0), Err(CalcError::Overflow));
        assert!(boq_total(&[big(5e28)], 0).is_ok());
    }

    #[test]
    fn overflowing_product_keeps_prior_quantity() {
        let items = vec![SourceItem::new("W1", 1e300)];
        let mut s = EditSession::with_quantity(3.0);
        let out = s.select_source(&items, "W1");
        assert_eq!(out, SyncOutcome::Recomputed(1e300));
        let out = s.set_consumption(&items, Some(1e10));
        assert_eq!(out, SyncOutcome::Skipped(SkipReason::NonFiniteResult));
        assert_eq!(s.quantity(), Some(1e300));
        assert_eq!(s.writes(), 1);
    }

    #[test]
    fn manual_entry_is_superseded_by_recompute() {
        let items = vec![SourceItem::new("W1", 10.0)];
        let mut s = EditSession::new();
        s.set_derived_quantity(7.5);
        assert_eq!(s.quantity(), Some(7.5));
        assert_eq!(s.writes(), 0);
        s.select_source(&items, "W1");
        assert_eq!(s.quantity(), Some(10.0));
    }

    #[test]
    fn boq_total_skips_empty_lines() {
        let items = vec![SourceItem::new("W1", 10.0)];
        let mut s = EditSession::new();
        s.select_source(&items, "W1");
        s.set_conversion(&items, Some(1.5));
        let lines = vec![
            s.to_line_item("Concrete", Decimal::new(200, 2)),
            LineItem {
                description: "Pending".to_string(),
                quantity: None,
                unit_rate: Decimal::new(999, 0),
            },
        ];
        assert_eq!(boq_total(&lines, 2).unwrap(), Decimal::new(3000, 2));
    }

    proptest! {
        #[test]
        fn defaults_preserve_base(b in 0.001f64..1_000_000.0) {
            prop_assert_eq!(recalculate(b, None, None), b);
        }

        #[test]
        fn multiplicative(b in 0.0f64..100_000.0, c1 in 0.0f64..100.0, c2 in 0.0f64..100.0) {
            let e1 = if c1 == 0.0 { 1.0 } else { c1 };
            let e2 = if c2 == 0.0 { 1.0 } else { c2 };
            prop_assert_eq!(recalculate(b, Some(c1), Some(c2)), b * e1 * e2);
        }

        #[test]
        fn coefficient_change_idempotent(b in 0.001f64..10_000.0, c1 in 0.0f64..10.0, c2 in 0.0f64..10.0) {
            let items = vec![SourceItem::new("W", b)];
            let inputs = CoefficientInputs::selecting("W").with_coefficients(Some(c1), Some(c2));
            let mut ctl = SyncController::new();
            let mut once = DerivedQuantity::default();
            ctl.on_coefficient_changed(&items, &inputs, &mut once);
            let mut twice = DerivedQuantity::default();
            ctl.on_coefficient_changed(&items, &inputs, &mut twice);
            ctl.on_coefficient_changed(&items, &inputs, &mut twice);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn unknown_source_is_noop(prior in proptest::option::of(0.0f64..1_000.0), id in "[a-z]{1,8}") {
            let items = vec![SourceItem::new("W1", 10.0)];
            let mut field = DerivedQuantity { value: prior };
            let mut ctl = SyncController::new();
            let inputs = CoefficientInputs::selecting(&id);
            ctl.on_source_selection_changed(&items, &id, &inputs, &mut field);
            prop_assert_eq!(field.value(), prior);
        }

        #[test]
        fn zero_base_never_overwrites(prior in 0.0f64..1_000.0, c1 in proptest::option::of(-10.0f64..10.0), c2 in proptest::option::of(-10.0f64..10.0)) {
            let items = vec![SourceItem::new("Z", 0.0)];
            let mut s = EditSession::with_quantity(prior);
            s.select_source(&items, "Z");
            s.set_consumption(&items, c1);
            s.set_conversion(&items, c2);
            prop_assert_eq!(s.quantity(), Some(prior));
        }

        #[test]
        fn derived_value_always_finite(b in proptest::num::f64::ANY, c1 in proptest::option::of(proptest::num::f64::ANY), c2 in proptest::option::of(proptest::num::f64::ANY)) {
            let items = vec![SourceItem::new("W", b)];
            let inputs = CoefficientInputs::selecting("W").with_coefficients(c1, c2);
            let mut ctl = SyncController::new();
            let mut field = DerivedQuantity::default();
            let out = ctl.on_coefficient_changed(&items, &inputs, &mut field);
            match field.value() {
                Some(v) => {
                    prop_assert!(v.is_finite());
                    prop_assert_eq!(out, SyncOutcome::Recomputed(v));
                }
                None => prop_assert!(matches!(out, SyncOutcome::Skipped(_))),
            }
            prop_assert_eq!(ctl.state(), SyncState::Idle);
        }
    }
}
