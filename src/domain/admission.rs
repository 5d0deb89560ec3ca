//! Plugin admission pipeline.
//!
//! Each attempt runs `read -> compile -> discover -> instantiate -> name check
//! -> quick check -> register` and stops at the first failing stage with a
//! single [`AdmissionError`]. Only a fully successful attempt touches the
//! registry. Failures are returned, never raised, so a batch of sources can be
//! attempted independently.

use crate::domain::error::AdmissionError;
use crate::domain::indicator::{Indicator, SlotType};
use crate::domain::registry::PluginRegistry;
use crate::ports::compiler_port::Compiler;
use crate::ports::quick_check_port::QuickCheck;
use std::any::Any;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct AdmissionPipeline {
    compiler: Box<dyn Compiler>,
    tester: Box<dyn QuickCheck>,
    builtin_names: BTreeSet<String>,
    registry: PluginRegistry,
}

impl AdmissionPipeline {
    /// `builtin_names` are reserved: no plugin may declare one of them.
    pub fn new<I, S>(
        compiler: Box<dyn Compiler>,
        tester: Box<dyn QuickCheck>,
        builtin_names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            compiler,
            tester,
            builtin_names: builtin_names.into_iter().map(Into::into).collect(),
            registry: PluginRegistry::new(),
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> PluginRegistry {
        self.registry
    }

    /// Reads, compiles, validates and registers the plugin source at `path`.
    pub fn admit(&mut self, path: &Path) -> Result<(), AdmissionError> {
        let file = display_name(path);
        let source = read_source(path, &file)?;
        self.admit_source(&file, &source)
    }

    /// Runs the pipeline on already loaded source text. `file` is the display
    /// name used in messages.
    pub fn admit_source(&mut self, file: &str, source: &str) -> Result<(), AdmissionError> {
        let unit = self
            .compiler
            .compile(source)
            .map_err(|diagnostics| AdmissionError::CompilationFailed {
                file: file.to_string(),
                diagnostics,
            })?;
        debug!(file, "compiled");

        let indicator = {
            let types = unit.indicator_types();
            let factory = types.first().ok_or_else(|| AdmissionError::NoSuitableConstructor {
                file: file.to_string(),
                reason: "the unit defines no indicator type".to_string(),
            })?;
            if !factory.has_slot_constructor() {
                return Err(AdmissionError::NoSuitableConstructor {
                    file: file.to_string(),
                    reason: format!(
                        "type '{}' has no public constructor taking a slot type",
                        factory.type_name()
                    ),
                });
            }

            match panic::catch_unwind(AssertUnwindSafe(|| factory.construct(SlotType::NotDefined))) {
                Ok(Ok(indicator)) => indicator,
                Ok(Err(e)) => {
                    return Err(AdmissionError::InstantiationFailed {
                        file: file.to_string(),
                        message: e.message,
                        cause: e.cause,
                    });
                }
                Err(payload) => {
                    return Err(AdmissionError::InstantiationFailed {
                        file: file.to_string(),
                        message: format!("constructor of '{}' panicked", factory.type_name()),
                        cause: panic_message(payload.as_ref()),
                    });
                }
            }
        };
        debug!(file, name = indicator.name(), "instantiated");

        self.check_name(file, indicator.as_ref())?;
        self.validate(file, indicator.as_ref())?;

        info!(file, name = indicator.name(), "indicator admitted");
        self.registry.push(indicator);
        Ok(())
    }

    /// Attempts every path in turn; one failure never stops the rest.
    pub fn admit_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<Result<(), AdmissionError>> {
        paths
            .iter()
            .map(|path| {
                let result = self.admit(path.as_ref());
                if let Err(e) = &result {
                    warn!(file = e.file(), kind = ?e.kind(), "admission failed");
                }
                result
            })
            .collect()
    }

    fn check_name(&self, file: &str, indicator: &dyn Indicator) -> Result<(), AdmissionError> {
        let name = indicator.name();
        if self.registry.contains(name) || self.builtin_names.contains(name) {
            return Err(AdmissionError::DuplicateName {
                file: file.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn validate(&self, file: &str, indicator: &dyn Indicator) -> Result<(), AdmissionError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.tester.quick_check(indicator)));
        let reason = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(reason)) => reason,
            Err(payload) => format!(
                "quick check panicked: {}",
                panic_message(payload.as_ref()).unwrap_or_else(|| "unknown cause".to_string())
            ),
        };
        Err(AdmissionError::ValidationFailed {
            file: file.to_string(),
            reason,
        })
    }
}

/// File name of `path`, so messages never reveal where the file lives.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<unnamed source>".to_string())
}

fn read_source(path: &Path, file: &str) -> Result<String, AdmissionError> {
    fs::read_to_string(path).map_err(|e| AdmissionError::SourceUnreadable {
        file: file.to_string(),
        reason: match e.kind() {
            ErrorKind::NotFound => "the source file does not exist".to_string(),
            kind => format!("cannot read the file ({kind})"),
        },
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}
