//! Declarative indicator compiler.
//!
//! Compiles INI sources of the form
//!
//! ```ini
//! [indicator]
//! name = Smoothed Close
//! type = SmoothedClose
//! method = sma
//! source = close
//! period = 14
//! constructor = slot
//! ```
//!
//! into a [`PluginUnit`] holding one indicator type. `method` is `sma` or
//! `momentum`; `source` is one of `open`, `high`, `low`, `close`, `typical`,
//! `median` (default `close`); `constructor = default` produces a type
//! without a slot constructor.

use crate::domain::indicator::{Indicator, IndicatorPoint, SlotType};
use crate::domain::ohlcv::Bar;
use crate::ports::compiler_port::{Compiler, ConstructError, IndicatorFactory, PluginUnit};
use configparser::ini::Ini;

/// Longest lookback a compiled indicator may be constructed with.
pub const MAX_LOOKBACK: usize = 500;

const SECTION: &str = "indicator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Sma,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Open,
    High,
    Low,
    Close,
    Typical,
    Median,
}

impl PriceSource {
    fn value(self, bar: &Bar) -> f64 {
        match self {
            PriceSource::Open => bar.open,
            PriceSource::High => bar.high,
            PriceSource::Low => bar.low,
            PriceSource::Close => bar.close,
            PriceSource::Typical => bar.typical_price(),
            PriceSource::Median => bar.median_price(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IniCompiler;

impl IniCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for IniCompiler {
    fn compile(&self, source: &str) -> Result<Box<dyn PluginUnit>, Vec<String>> {
        let mut ini = Ini::new();
        ini.read(source.to_string()).map_err(|e| vec![e])?;

        if !ini.sections().iter().any(|s| s == SECTION) {
            return Err(vec![format!("missing section [{SECTION}]")]);
        }

        let mut diagnostics = Vec::new();
        let get = |key: &str| {
            ini.get(SECTION, key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let name = get("name");
        if name.is_none() {
            diagnostics.push("missing key 'name'".to_string());
        }

        let method = match get("method").as_deref() {
            Some("sma") => Some(Method::Sma),
            Some("momentum") => Some(Method::Momentum),
            Some(other) => {
                diagnostics.push(format!(
                    "unknown method '{other}' (expected sma or momentum)"
                ));
                None
            }
            None => {
                diagnostics.push("missing key 'method'".to_string());
                None
            }
        };

        let source = match get("source").as_deref() {
            None | Some("close") => Some(PriceSource::Close),
            Some("open") => Some(PriceSource::Open),
            Some("high") => Some(PriceSource::High),
            Some("low") => Some(PriceSource::Low),
            Some("typical") => Some(PriceSource::Typical),
            Some("median") => Some(PriceSource::Median),
            Some(other) => {
                diagnostics.push(format!("unknown price source '{other}'"));
                None
            }
        };

        let period = match get("period") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(p) if p > 0 => Some(p),
                _ => {
                    diagnostics.push(format!("period must be a positive integer, got '{raw}'"));
                    None
                }
            },
            None => {
                diagnostics.push("missing key 'period'".to_string());
                None
            }
        };

        let slot_constructor = match get("constructor").as_deref() {
            None | Some("slot") => true,
            Some("default") => false,
            Some(other) => {
                diagnostics.push(format!(
                    "unknown constructor '{other}' (expected slot or default)"
                ));
                false
            }
        };

        match (name, method, source, period) {
            (Some(name), Some(method), Some(source), Some(period)) if diagnostics.is_empty() => {
                let type_name = get("type").unwrap_or_else(|| {
                    name.chars().filter(|c| c.is_alphanumeric()).collect()
                });
                Ok(Box::new(IniUnit {
                    indicator_type: IniIndicatorType {
                        type_name,
                        name,
                        method,
                        source,
                        period,
                        slot_constructor,
                    },
                }))
            }
            _ => Err(diagnostics),
        }
    }
}

struct IniUnit {
    indicator_type: IniIndicatorType,
}

impl PluginUnit for IniUnit {
    fn indicator_types(&self) -> Vec<&dyn IndicatorFactory> {
        vec![&self.indicator_type as &dyn IndicatorFactory]
    }
}

#[derive(Debug, Clone)]
struct IniIndicatorType {
    type_name: String,
    name: String,
    method: Method,
    source: PriceSource,
    period: usize,
    slot_constructor: bool,
}

impl IndicatorFactory for IniIndicatorType {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn has_slot_constructor(&self) -> bool {
        self.slot_constructor
    }

    fn construct(&self, slot: SlotType) -> Result<Box<dyn Indicator>, ConstructError> {
        if self.period > MAX_LOOKBACK {
            return Err(
                ConstructError::new(format!("cannot construct '{}'", self.type_name)).with_cause(
                    format!(
                        "period {} exceeds the maximum lookback of {MAX_LOOKBACK}",
                        self.period
                    ),
                ),
            );
        }
        Ok(Box::new(ConfiguredIndicator {
            name: self.name.clone(),
            slot,
            method: self.method,
            source: self.source,
            period: self.period,
        }))
    }
}

/// An indicator built from a declarative source.
#[derive(Debug, Clone)]
pub struct ConfiguredIndicator {
    name: String,
    slot: SlotType,
    method: Method,
    source: PriceSource,
    period: usize,
}

impl Indicator for ConfiguredIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    fn slot(&self) -> SlotType {
        self.slot
    }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<IndicatorPoint>, String> {
        let prices: Vec<f64> = bars.iter().map(|bar| self.source.value(bar)).collect();
        let period = self.period;

        let points = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let (valid, value) = match self.method {
                    Method::Sma if i + 1 >= period => {
                        let window = &prices[i + 1 - period..=i];
                        (true, window.iter().sum::<f64>() / period as f64)
                    }
                    Method::Momentum if i >= period => (true, prices[i] - prices[i - period]),
                    _ => (false, 0.0),
                };
                IndicatorPoint {
                    time: bar.time,
                    valid,
                    value,
                }
            })
            .collect();
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn compile(source: &str) -> Result<Box<dyn PluginUnit>, Vec<String>> {
        IniCompiler::new().compile(source)
    }

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                time: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn build(source: &str) -> Box<dyn Indicator> {
        let unit = compile(source).unwrap();
        let types = unit.indicator_types();
        types[0].construct(SlotType::NotDefined).unwrap()
    }

    const SMA_SOURCE: &str = "[indicator]\nname = Smoothed Close\nmethod = sma\nperiod = 3\n";

    #[test]
    fn compiles_minimal_source() {
        let unit = compile(SMA_SOURCE).unwrap();
        let types = unit.indicator_types();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].type_name(), "SmoothedClose");
        assert!(types[0].has_slot_constructor());
    }

    #[test]
    fn explicit_type_name_is_kept() {
        let unit = compile(&format!("{SMA_SOURCE}type = MySma\n")).unwrap();
        assert_eq!(unit.indicator_types()[0].type_name(), "MySma");
    }

    #[test]
    fn reports_every_problem() {
        let diagnostics = compile("[indicator]\nmethod = ema\nperiod = -2\n")
            .err()
            .unwrap();
        assert_eq!(
            diagnostics,
            vec![
                "missing key 'name'".to_string(),
                "unknown method 'ema' (expected sma or momentum)".to_string(),
                "period must be a positive integer, got '-2'".to_string(),
            ]
        );
    }

    #[test]
    fn missing_section_is_a_diagnostic() {
        let diagnostics = compile("[other]\nname = x\n").err().unwrap();
        assert_eq!(diagnostics, vec!["missing section [indicator]".to_string()]);
    }

    #[test]
    fn default_constructor_has_no_slot_constructor() {
        let unit = compile(&format!("{SMA_SOURCE}constructor = default\n")).unwrap();
        assert!(!unit.indicator_types()[0].has_slot_constructor());
    }

    #[test]
    fn oversized_period_fails_at_construction() {
        let unit = compile("[indicator]\nname = Slow\nmethod = sma\nperiod = 900\n").unwrap();
        let err = unit.indicator_types()[0]
            .construct(SlotType::NotDefined)
            .err()
            .unwrap();
        assert_eq!(err.message, "cannot construct 'Slow'");
        assert_eq!(
            err.cause.as_deref(),
            Some("period 900 exceeds the maximum lookback of 500")
        );
    }

    #[test]
    fn constructed_indicator_keeps_slot() {
        let unit = compile(SMA_SOURCE).unwrap();
        let indicator = unit.indicator_types()[0]
            .construct(SlotType::OpenFilter)
            .unwrap();
        assert_eq!(indicator.slot(), SlotType::OpenFilter);
        assert_eq!(indicator.name(), "Smoothed Close");
    }

    #[test]
    fn sma_warmup_and_values() {
        let indicator = build(SMA_SOURCE);
        let points = indicator
            .calculate(&make_bars(&[1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        assert_eq!(points.len(), 4);
        assert!(!points[0].valid);
        assert!(!points[1].valid);
        assert!(points[2].valid);
        assert_relative_eq!(points[2].value, 2.0);
        assert_relative_eq!(points[3].value, 3.0);
    }

    #[test]
    fn momentum_on_typical_price() {
        let indicator =
            build("[indicator]\nname = Mom\nmethod = momentum\nsource = typical\nperiod = 2\n");
        let points = indicator
            .calculate(&make_bars(&[10.0, 11.0, 13.0]))
            .unwrap();
        assert!(!points[1].valid);
        assert!(points[2].valid);
        assert_relative_eq!(points[2].value, 3.0);
    }
}
