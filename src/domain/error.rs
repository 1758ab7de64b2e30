//! Domain error types.
//!
//! The rule engine itself never fails: unsupported tiers and not-applicable
//! account types are answered with `None`, `0.0` or `false`. Errors only arise
//! at the edges, while loading account configuration and ledgers.

/// Top-level error type for propfirm.
#[derive(Debug, thiserror::Error)]
pub enum PropfirmError {
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

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error("{firm} has no rules for a {size:.0} account")]
    UnsupportedTier { firm: String, size: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PropfirmError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        PropfirmError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        PropfirmError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&PropfirmError> for std::process::ExitCode {
    fn from(err: &PropfirmError) -> Self {
        let code: u8 = match err {
            PropfirmError::Io(_) => 1,
            PropfirmError::ConfigParse { .. }
            | PropfirmError::ConfigMissing { .. }
            | PropfirmError::ConfigInvalid { .. } => 2,
            PropfirmError::Ledger { .. } => 3,
            PropfirmError::UnsupportedTier { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
