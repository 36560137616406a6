//! Common types used across the application

use rust_decimal::Decimal;
use std::fmt;
use std::time::Instant;

/// One price snapshot with the feed's 24h change metrics
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub price: Decimal,
    pub absolute_change: Decimal,
    pub percent_change: Decimal,
    pub timestamp: Instant,
}

impl Observation {
    pub fn new(price: Decimal, absolute_change: Decimal, percent_change: Decimal, timestamp: Instant) -> Self {
        Self {
            price,
            absolute_change,
            percent_change,
            timestamp,
        }
    }
}

/// Direction of an interval comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Risen,
    Fallen,
    Neutral,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Risen => write!(f, "risen"),
            AlertKind::Fallen => write!(f, "fallen"),
            AlertKind::Neutral => write!(f, "neutral"),
        }
    }
}

/// Emitted once per interval boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    /// Signed change against the reference, in percent.
    pub change_percent: Decimal,
    pub price: Decimal,
}

impl Alert {
    pub fn magnitude(&self) -> Decimal {
        self.change_percent.abs()
    }
}
