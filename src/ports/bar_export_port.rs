//! Parsed bar export port trait.

use crate::domain::error::QuantgateError;
use crate::domain::ohlcv::Bar;
use std::path::Path;

/// Port for writing parsed bars in a normalised layout.
pub trait BarExportPort {
    fn write(&self, bars: &[Bar], output_path: &Path) -> Result<(), QuantgateError>;
}
