//! Errors raised while talking to the plan backend

/// Failure of a single backend request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected status {status} from {path}")]
    Status { path: String, status: u16 },
    #[error("Response from {path} has no data envelope")]
    MissingEnvelope { path: String },
    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Path of the request that failed
    pub fn path(&self) -> &str {
        match self {
            ApiError::Transport { path, .. }
            | ApiError::Status { path, .. }
            | ApiError::MissingEnvelope { path }
            | ApiError::Decode { path, .. } => path,
        }
    }

    /// Short machine-readable reason, used in structured logs
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "transport",
            ApiError::Status { .. } => "status",
            ApiError::MissingEnvelope { .. } => "missing_envelope",
            ApiError::Decode { .. } => "decode",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
