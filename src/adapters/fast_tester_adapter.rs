//! Scripted quick check for freshly built indicators.

use crate::domain::indicator::Indicator;
use crate::domain::ohlcv::Bar;
use crate::ports::quick_check_port::QuickCheck;
use chrono::{Duration, NaiveDate};

pub const DEFAULT_WORKLOAD_BARS: usize = 200;
pub const MIN_WORKLOAD_BARS: usize = 10;

/// Runs an indicator over a deterministic synthetic series and checks the
/// shape of what comes back.
#[derive(Debug, Clone)]
pub struct FastTester {
    bars: Vec<Bar>,
}

impl FastTester {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bars: scripted_bars(bar_count.max(MIN_WORKLOAD_BARS)),
        }
    }

    pub fn workload(&self) -> &[Bar] {
        &self.bars
    }
}

impl Default for FastTester {
    fn default() -> Self {
        Self::new(DEFAULT_WORKLOAD_BARS)
    }
}

impl QuickCheck for FastTester {
    fn quick_check(&self, indicator: &dyn Indicator) -> Result<(), String> {
        let name = indicator.name();
        if name.trim().is_empty() {
            return Err("the indicator name is empty".to_string());
        }

        let points = indicator
            .calculate(&self.bars)
            .map_err(|e| format!("'{name}' failed to calculate: {e}"))?;

        if points.len() != self.bars.len() {
            return Err(format!(
                "'{name}' returned {} points for {} bars",
                points.len(),
                self.bars.len()
            ));
        }

        for (i, (point, bar)) in points.iter().zip(&self.bars).enumerate() {
            if point.time != bar.time {
                return Err(format!(
                    "'{name}' point {i} is stamped {} but its bar is {}",
                    point.time, bar.time
                ));
            }
            if point.valid && !point.value.is_finite() {
                return Err(format!("'{name}' point {i} is not a finite number"));
            }
        }
        Ok(())
    }
}

/// Hourly bars oscillating around 1.1 with a slow upward drift.
fn scripted_bars(count: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (0..count)
        .map(|i| {
            let x = i as f64;
            let open = 1.1 + 0.01 * (x / 7.0).sin() + 0.0001 * x;
            let close = open + 0.002 * (x / 3.0).cos();
            Bar {
                time: start + Duration::hours(i as i64),
                open,
                high: open.max(close) + 0.001,
                low: open.min(close) - 0.001,
                close,
                volume: 100 + (i % 17) as i64 * 10,
            }
        })
        .collect()
}
