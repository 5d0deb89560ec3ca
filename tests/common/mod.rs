#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use quantgate::domain::indicator::{Indicator, IndicatorPoint, SlotType};
pub use quantgate::domain::ohlcv::Bar;
use quantgate::ports::compiler_port::{Compiler, ConstructError, IndicatorFactory, PluginUnit};
use quantgate::ports::quick_check_port::QuickCheck;
use std::cell::Cell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// Stage counters shared between a stub and the test that owns it.
#[derive(Debug, Default)]
pub struct Counters {
    pub compiled: Cell<usize>,
    pub constructed: Cell<usize>,
    pub checked: Cell<usize>,
}

impl Counters {
    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

#[derive(Debug, Clone)]
pub enum StubBehaviour {
    FailCompile(Vec<String>),
    NoTypes,
    NoSlotConstructor,
    ConstructFails,
    ConstructPanics,
    Builds(String),
}

pub struct StubCompiler {
    behaviour: StubBehaviour,
    counters: Rc<Counters>,
}

impl StubCompiler {
    pub fn new(behaviour: StubBehaviour) -> (Self, Rc<Counters>) {
        let counters = Rc::new(Counters::default());
        (
            Self {
                behaviour,
                counters: Rc::clone(&counters),
            },
            counters,
        )
    }

    pub fn building(name: &str) -> (Self, Rc<Counters>) {
        Self::new(StubBehaviour::Builds(name.to_string()))
    }
}

impl Compiler for StubCompiler {
    fn compile(&self, _source: &str) -> Result<Box<dyn PluginUnit>, Vec<String>> {
        Counters::bump(&self.counters.compiled);
        if let StubBehaviour::FailCompile(diagnostics) = &self.behaviour {
            return Err(diagnostics.clone());
        }
        Ok(Box::new(StubUnit {
            factory: StubFactory {
                behaviour: self.behaviour.clone(),
                counters: Rc::clone(&self.counters),
            },
        }))
    }
}

struct StubUnit {
    factory: StubFactory,
}

impl PluginUnit for StubUnit {
    fn indicator_types(&self) -> Vec<&dyn IndicatorFactory> {
        match self.factory.behaviour {
            StubBehaviour::NoTypes => vec![],
            _ => vec![&self.factory as &dyn IndicatorFactory],
        }
    }
}

struct StubFactory {
    behaviour: StubBehaviour,
    counters: Rc<Counters>,
}

impl IndicatorFactory for StubFactory {
    fn type_name(&self) -> &str {
        "StubIndicator"
    }

    fn has_slot_constructor(&self) -> bool {
        !matches!(self.behaviour, StubBehaviour::NoSlotConstructor)
    }

    fn construct(&self, slot: SlotType) -> Result<Box<dyn Indicator>, ConstructError> {
        Counters::bump(&self.counters.constructed);
        match &self.behaviour {
            StubBehaviour::ConstructFails => Err(ConstructError::new("constructor rejected the slot")
                .with_cause("lookback too long")),
            StubBehaviour::ConstructPanics => panic!("constructor exploded"),
            StubBehaviour::Builds(name) => Ok(Box::new(StubIndicator {
                name: name.clone(),
                slot,
            })),
            _ => Err(ConstructError::new("not constructible")),
        }
    }
}

/// Echoes the close price as a valid point for every bar.
pub struct StubIndicator {
    pub name: String,
    pub slot: SlotType,
}

impl Indicator for StubIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    fn slot(&self) -> SlotType {
        self.slot
    }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<IndicatorPoint>, String> {
        Ok(bars
            .iter()
            .map(|bar| IndicatorPoint {
                time: bar.time,
                valid: true,
                value: bar.close,
            })
            .collect())
    }
}

/// Quick check that records its calls and optionally rejects everything.
pub struct CountingQuickCheck {
    reject_with: Option<String>,
    counters: Rc<Counters>,
}

impl CountingQuickCheck {
    pub fn passing(counters: &Rc<Counters>) -> Self {
        Self {
            reject_with: None,
            counters: Rc::clone(counters),
        }
    }

    pub fn rejecting(counters: &Rc<Counters>, reason: &str) -> Self {
        Self {
            reject_with: Some(reason.to_string()),
            counters: Rc::clone(counters),
        }
    }
}

impl QuickCheck for CountingQuickCheck {
    fn quick_check(&self, _indicator: &dyn Indicator) -> Result<(), String> {
        Counters::bump(&self.counters.checked);
        match &self.reject_with {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// Daily bars starting at `start`, open/high/low/close strictly distinct.
pub fn generate_bars(start: NaiveDateTime, count: usize, start_price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let open = start_price + i as f64 * 0.001;
            Bar {
                time: start + Duration::days(i as i64),
                open,
                high: open + 0.005,
                low: open - 0.004,
                close: open + 0.002,
                volume: 100 + i as i64,
            }
        })
        .collect()
}

/// Renders bars as text lines. `date_fmt` is a chrono format for the date,
/// `sep` the column separator, and `comma` switches the decimal separator.
pub fn render_bars(bars: &[Bar], date_fmt: &str, sep: &str, comma: bool) -> String {
    let price = |v: f64| {
        let s = format!("{v:.4}");
        if comma { s.replace('.', ",") } else { s }
    };
    bars.iter()
        .map(|bar| {
            format!(
                "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}\n",
                bar.time.format(date_fmt),
                bar.time.format("%H:%M"),
                price(bar.open),
                price(bar.high),
                price(bar.low),
                price(bar.close),
                bar.volume
            )
        })
        .collect()
}

pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

pub const SMA_SOURCE: &str = "[indicator]\nname = Smoothed Close\nmethod = sma\nperiod = 5\n";
pub const MOMENTUM_SOURCE: &str =
    "[indicator]\nname = Close Momentum\nmethod = momentum\nsource = close\nperiod = 3\n";
