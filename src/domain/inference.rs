//! Format inference: text in, [`Grammar`] out.

use crate::domain::date_order::infer_date_order;
use crate::domain::error::FormatError;
use crate::domain::grammar::{DecimalSeparator, Grammar};
use crate::domain::number::fractional_separator;
use crate::domain::price_order::infer_price_layout;
use crate::domain::row_shape::{RowShape, ShapedLine};
use tracing::debug;

/// Infers the grammar of `text`, falling back to a dot when no price carries
/// a fractional part.
pub fn infer(text: &str) -> Result<Grammar, FormatError> {
    infer_with_default(text, DecimalSeparator::default())
}

pub fn infer_with_default(
    text: &str,
    default_separator: DecimalSeparator,
) -> Result<Grammar, FormatError> {
    let lines: Vec<ShapedLine> = RowShape::get().scan(text).collect();
    debug!(rows = lines.len(), "shaped rows found");

    let dates: Vec<[u32; 3]> = lines.iter().map(|line| line.date).collect();
    let date_order = infer_date_order(&dates)?;
    let price_layout = infer_price_layout(&lines)?;
    let decimal_separator = infer_decimal_separator(&lines).unwrap_or(default_separator);

    let grammar = Grammar {
        date_order,
        price_layout,
        decimal_separator,
    };
    debug!(%grammar, "grammar inferred");
    Ok(grammar)
}

fn infer_decimal_separator(lines: &[ShapedLine<'_>]) -> Option<DecimalSeparator> {
    lines
        .iter()
        .flat_map(|line| line.prices.iter())
        .find_map(|token| fractional_separator(token))
}
