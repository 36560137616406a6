//! Price analysis and calculations

use rust_decimal::Decimal;

use crate::shared::types::{Alert, AlertKind, Observation};
use crate::shared::utils::calculate_percentage_change;

/// Compares a current observation against a reference
pub struct PriceAnalyzer {
    percent_threshold: Decimal,
}

impl PriceAnalyzer {
    pub fn new(percent_threshold: Decimal) -> Self {
        Self { percent_threshold }
    }

    /// `None` when the reference price is zero.
    pub fn calculate_price_change(&self, reference: &Observation, current: &Observation) -> Option<Decimal> {
        calculate_percentage_change(reference.price, current.price)
    }

    /// Strict on both sides: a change equal to the threshold is neutral.
    pub fn classify(&self, change_percent: Decimal) -> AlertKind {
        if change_percent > self.percent_threshold {
            AlertKind::Risen
        } else if change_percent < -self.percent_threshold {
            AlertKind::Fallen
        } else {
            AlertKind::Neutral
        }
    }

    pub fn compare(&self, reference: &Observation, current: &Observation) -> Option<Alert> {
        let change_percent = self.calculate_price_change(reference, current)?;
        Some(Alert {
            kind: self.classify(change_percent),
            change_percent,
            price: current.price,
        })
    }
}
