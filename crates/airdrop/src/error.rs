//! Error types for the airdrop service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Airdrop request errors. Every variant is scoped to a single request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirdropError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Airdrop cooldown active. Please wait {remaining_hours:.1} more hours.")]
    CooldownActive { remaining_hours: f64 },

    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("Failed to mint tokens: {0}")]
    SubprocessFailure(String),

    #[error("Airdrop request timed out. Please try again.")]
    SubprocessTimeout,

    #[error("Could not extract transaction signature from output")]
    SignatureNotFound,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AirdropError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AirdropError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AirdropError::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
            AirdropError::SubprocessTimeout => StatusCode::GATEWAY_TIMEOUT,
            AirdropError::ConfigurationMissing(_)
            | AirdropError::InvalidConfig(_)
            | AirdropError::SubprocessFailure(_)
            | AirdropError::SignatureNotFound
            | AirdropError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code, also used as the metrics label
    pub fn code(&self) -> &'static str {
        match self {
            AirdropError::InvalidInput(_) => "INVALID_INPUT",
            AirdropError::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            AirdropError::ConfigurationMissing(_) => "CONFIGURATION_MISSING",
            AirdropError::SubprocessFailure(_) => "SUBPROCESS_FAILURE",
            AirdropError::SubprocessTimeout => "SUBPROCESS_TIMEOUT",
            AirdropError::SignatureNotFound => "SIGNATURE_NOT_FOUND",
            AirdropError::InvalidConfig(_) => "INVALID_CONFIG",
            AirdropError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AirdropError {
    fn into_response(self) -> Response {
        // `detail` is what the web client reads
        let body = Json(json!({
            "error": self.code(),
            "detail": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));

        (self.status_code(), body).into_response()
    }
}

pub type AirdropResult<T> = Result<T, AirdropError>;
