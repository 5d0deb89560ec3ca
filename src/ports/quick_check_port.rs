//! Fast-validation port trait.

use crate::domain::indicator::Indicator;

/// Exercises a freshly built indicator against a small scripted workload.
pub trait QuickCheck {
    /// `Err` carries the failure reason, surfaced verbatim to the user.
    fn quick_check(&self, indicator: &dyn Indicator) -> Result<(), String>;
}
