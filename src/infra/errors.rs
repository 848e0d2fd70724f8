// src/infra/errors.rs — Error types for wxdraft

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WxDraftError>;

#[derive(Error, Debug)]
pub enum WxDraftError {
    // Startup / construction (fatal, not retried)
    #[error("Configuration error: {0}")]
    Config(String),

    // Generation
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    #[error("model returned empty markdown")]
    EmptyOutput,

    // Publish
    #[error("WeChat authentication failed: {code} {message}")]
    Auth { code: i64, message: String },

    #[error("WeChat {step} failed: {code} {message}")]
    Platform {
        step: &'static str,
        code: i64,
        message: String,
    },

    #[error("WeChat {step} request failed: {source}")]
    Http {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Caller errors
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Session '{id}' not found or expired")]
    SessionNotFound { id: String },

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WxDraftError {
    /// Unknown or expired session: the caller must restart the whole flow.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WxDraftError::SessionNotFound { .. })
    }

    /// Rejected before any external call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, WxDraftError::Validation(_))
    }

    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WxDraftError::File {
            path: path.into(),
            source,
        }
    }
}
