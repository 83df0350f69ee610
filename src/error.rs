// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration errors. Any of these aborts the run before harvesting starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("language threshold must be between 0.0 and 1.0, got {0}")]
    ThresholdOutOfRange(f64),

    #[error(
        "language filter requested but no scoring backend is usable \
         (statistical detector does not support `{language}` and no dictionary was loaded)"
    )]
    NoClassifierBackend { language: String },

    #[error("unsupported target language `{0}` (expected one of: hun, deu, eng)")]
    UnknownLanguage(String),

    #[error("no usernames found in {0}")]
    NoIdentities(String),

    #[error("invalid time bound `{0}` (use epoch seconds, YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)")]
    InvalidTimeBound(String),

    #[error("missing {0} (set it in the environment or .env)")]
    MissingCredential(&'static str),

    #[error("config path {0} does not exist")]
    MissingConfigFile(PathBuf),
}
