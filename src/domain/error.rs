//! Domain error types.

/// Failures of format inference and row parsing. Each variant is terminal for
/// the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("date format not recognized: {reason}")]
    FormatUndetermined { reason: String },

    #[error("could not determine the price columns order")]
    PriceOrderUndetermined,

    #[error("no data rows matched the inferred format")]
    NoMatchingRows,
}

/// Machine-checkable kind of an [`AdmissionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionErrorKind {
    SourceUnreadable,
    CompilationFailed,
    NoSuitableConstructor,
    InstantiationFailed,
    DuplicateName,
    ValidationFailed,
}

/// A failed plugin admission. The message always starts with `ERROR:` and
/// names the source by file name only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("ERROR: {reason}: {file}")]
    SourceUnreadable { file: String, reason: String },

    #[error(
        "ERROR: indicator compilation failed in file [{file}]{}",
        indented_lines(.diagnostics)
    )]
    CompilationFailed {
        file: String,
        diagnostics: Vec<String>,
    },

    #[error("ERROR: cannot find an appropriate constructor for [{file}]: {reason}")]
    NoSuitableConstructor { file: String, reason: String },

    #[error(
        "ERROR: [{file}] {message}{}",
        indented_lines(.cause.as_slice())
    )]
    InstantiationFailed {
        file: String,
        message: String,
        cause: Option<String>,
    },

    #[error("ERROR: the name '{name}' found in [{file}] is already in use")]
    DuplicateName { file: String, name: String },

    #[error("ERROR: [{file}] {reason}")]
    ValidationFailed { file: String, reason: String },
}

fn indented_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("\n\t{line}")).collect()
}

impl AdmissionError {
    pub fn kind(&self) -> AdmissionErrorKind {
        match self {
            AdmissionError::SourceUnreadable { .. } => AdmissionErrorKind::SourceUnreadable,
            AdmissionError::CompilationFailed { .. } => AdmissionErrorKind::CompilationFailed,
            AdmissionError::NoSuitableConstructor { .. } => {
                AdmissionErrorKind::NoSuitableConstructor
            }
            AdmissionError::InstantiationFailed { .. } => AdmissionErrorKind::InstantiationFailed,
            AdmissionError::DuplicateName { .. } => AdmissionErrorKind::DuplicateName,
            AdmissionError::ValidationFailed { .. } => AdmissionErrorKind::ValidationFailed,
        }
    }

    /// Display name of the offending source file.
    pub fn file(&self) -> &str {
        match self {
            AdmissionError::SourceUnreadable { file, .. }
            | AdmissionError::CompilationFailed { file, .. }
            | AdmissionError::NoSuitableConstructor { file, .. }
            | AdmissionError::InstantiationFailed { file, .. }
            | AdmissionError::DuplicateName { file, .. }
            | AdmissionError::ValidationFailed { file, .. } => file,
        }
    }
}

/// Top-level error type for quantgate.
#[derive(Debug, thiserror::Error)]
pub enum QuantgateError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantgateError> for std::process::ExitCode {
    fn from(err: &QuantgateError) -> Self {
        let code: u8 = match err {
            QuantgateError::Io(_) => 1,
            QuantgateError::ConfigParse { .. } | QuantgateError::ConfigInvalid { .. } => 2,
            QuantgateError::Format(_) => 3,
            QuantgateError::Admission(_) => 4,
            QuantgateError::Export { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
