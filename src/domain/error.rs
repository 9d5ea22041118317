//! Domain error types.

/// Top-level error type for spotscout.
#[derive(Debug, thiserror::Error)]
pub enum SpotscoutError {
    #[error("provider error: {reason}")]
    Provider { reason: String },

    #[error("insufficient data: have {points} points, need {minimum}")]
    InsufficientData { points: usize, minimum: usize },

    #[error("malformed ledger record: {reason}")]
    MalformedRecord { reason: String },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

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

    #[error("unknown asset: {id}")]
    UnknownAsset { id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SpotscoutError> for std::process::ExitCode {
    fn from(err: &SpotscoutError) -> Self {
        let code: u8 = match err {
            SpotscoutError::Io(_) => 1,
            SpotscoutError::ConfigParse { .. }
            | SpotscoutError::ConfigMissing { .. }
            | SpotscoutError::ConfigInvalid { .. } => 2,
            SpotscoutError::Provider { .. } => 3,
            SpotscoutError::Ledger { .. } | SpotscoutError::MalformedRecord { .. } => 4,
            SpotscoutError::InsufficientData { .. } | SpotscoutError::UnknownAsset { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
