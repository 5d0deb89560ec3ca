//! Indicator plugin contract.
//!
//! This module provides the types every admitted indicator is handled through:
//! - `SlotType`: the strategy slot an instance is built for
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `Indicator`: the trait a plugin instance implements

use crate::domain::ohlcv::Bar;
use chrono::NaiveDateTime;
use std::fmt;

/// Role an indicator instance plays in a strategy. Plugins are admitted with
/// [`SlotType::NotDefined`] since no role is assigned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotType {
    #[default]
    NotDefined,
    Open,
    OpenFilter,
    Close,
    CloseFilter,
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotType::NotDefined => write!(f, "NotDefined"),
            SlotType::Open => write!(f, "Open"),
            SlotType::OpenFilter => write!(f, "OpenFilter"),
            SlotType::Close => write!(f, "Close"),
            SlotType::CloseFilter => write!(f, "CloseFilter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub time: NaiveDateTime,
    pub valid: bool,
    pub value: f64,
}

pub trait Indicator {
    /// Declared name. Unique among admitted and built-in indicators.
    fn name(&self) -> &str;

    fn slot(&self) -> SlotType;

    /// One point per input bar, in the same order.
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<IndicatorPoint>, String>;
}

impl fmt::Debug for dyn Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indicator")
            .field("name", &self.name())
            .field("slot", &self.slot())
            .finish()
    }
}
