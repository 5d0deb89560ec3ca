//! CSV export of parsed bars.

use crate::domain::error::QuantgateError;
use crate::domain::ohlcv::Bar;
use crate::ports::bar_export_port::BarExportPort;
use std::path::Path;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HEADER: [&str; 6] = ["time", "open", "high", "low", "close", "volume"];

/// Writes bars as `time,open,high,low,close,volume` with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn export_error(e: csv::Error) -> QuantgateError {
    QuantgateError::Export {
        reason: format!("CSV write error: {}", e),
    }
}

impl BarExportPort for CsvAdapter {
    fn write(&self, bars: &[Bar], output_path: &Path) -> Result<(), QuantgateError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| QuantgateError::Export {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;

        wtr.write_record(HEADER).map_err(export_error)?;
        for bar in bars {
            wtr.write_record([
                bar.time.format(TIME_FORMAT).to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])
            .map_err(export_error)?;
        }

        wtr.flush().map_err(|e| QuantgateError::Export {
            reason: format!("failed to flush {}: {}", output_path.display(), e),
        })
    }
}
