//! Price column order inference.
//!
//! The first and last columns are always open and close. The middle pair is
//! either (high, low) or (low, high); the first row where the two differ
//! decides which.

use crate::domain::error::FormatError;
use crate::domain::grammar::PriceLayout;
use crate::domain::number::parse_decimal;
use crate::domain::row_shape::ShapedLine;

/// Tolerance for floating round-trip noise between the middle columns.
pub const PRICE_EPSILON: f64 = 1e-6;

pub fn infer_price_layout(lines: &[ShapedLine<'_>]) -> Result<PriceLayout, FormatError> {
    for line in lines {
        let (Some(second), Some(third)) =
            (parse_decimal(line.prices[1]), parse_decimal(line.prices[2]))
        else {
            continue;
        };

        if second > third + PRICE_EPSILON {
            return Ok(PriceLayout::OpenHighLowClose);
        }
        if third > second + PRICE_EPSILON {
            return Ok(PriceLayout::OpenLowHighClose);
        }
    }
    Err(FormatError::PriceOrderUndetermined)
}
