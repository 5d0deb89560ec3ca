//! Plugin compiler port traits.
//!
//! A [`Compiler`] turns source text into a [`PluginUnit`]. Instead of being
//! searched by reflection, a unit lists the indicator types it defines, each
//! as an [`IndicatorFactory`] that knows whether it offers a slot constructor.

use crate::domain::indicator::{Indicator, SlotType};

/// Failure raised by a plugin's constructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConstructError {
    pub message: String,
    pub cause: Option<String>,
}

impl ConstructError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// One indicator type defined by a compiled unit.
pub trait IndicatorFactory {
    fn type_name(&self) -> &str;

    /// Whether the type offers a public constructor taking only a slot.
    fn has_slot_constructor(&self) -> bool;

    fn construct(&self, slot: SlotType) -> Result<Box<dyn Indicator>, ConstructError>;
}

/// A compiled, loadable unit.
pub trait PluginUnit {
    /// Indicator types the unit defines, in declaration order.
    fn indicator_types(&self) -> Vec<&dyn IndicatorFactory>;
}

pub trait Compiler {
    /// Compiles `source`; on failure returns every diagnostic reported.
    fn compile(&self, source: &str) -> Result<Box<dyn PluginUnit>, Vec<String>>;
}
