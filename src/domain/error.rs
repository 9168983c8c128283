//! Domain error types.

/// A parse error with position information for indicator expressions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for klinecalc.
#[derive(Debug, thiserror::Error)]
pub enum KlineError {
    #[error("invalid parameter for {indicator}: {param} must be positive, got {value}")]
    InvalidParameter {
        indicator: String,
        param: &'static str,
        value: usize,
    },

    #[error("empty input: indicator {indicator} needs at least one bar")]
    EmptyInput { indicator: String },

    #[error(transparent)]
    IndicatorParse(#[from] ParseError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&KlineError> for std::process::ExitCode {
    fn from(err: &KlineError) -> Self {
        let code: u8 = match err {
            KlineError::Io(_) => 1,
            KlineError::ConfigParse { .. }
            | KlineError::ConfigMissing { .. }
            | KlineError::ConfigInvalid { .. } => 2,
            KlineError::IndicatorParse(_)
            | KlineError::InvalidParameter { .. }
            | KlineError::EmptyInput { .. } => 4,
            KlineError::NoData { .. } | KlineError::Data { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
