use thiserror::Error;

/// Failures surfaced by the location resolver and the forecast fetcher.
///
/// The flattener never produces one of these; missing fields degrade to defaults.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Rejected locally, before any request was sent.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("city not found: {city}")]
    NotFound { city: String },

    /// Network failure, timeout, or a non-success HTTP status (including auth failures).
    #[error("transport error while {context}: {reason}")]
    Transport { context: String, reason: String },

    #[error("malformed response from {context}: {reason}")]
    MalformedResponse { context: String, reason: String },
}

impl ForecastError {
    pub(crate) fn transport(context: &str, reason: impl ToString) -> Self {
        Self::Transport {
            context: context.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(context: &str, reason: impl ToString) -> Self {
        Self::MalformedResponse {
            context: context.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine platform config directory")]
    NoConfigDir,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
