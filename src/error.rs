use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::StoreError;
use crate::provider::ProviderError;

/// Errors surfaced to the HTTP caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather API unavailable")]
    ProviderUnavailable { source: ProviderError },
    #[error("Failed to fetch weather data")]
    ProviderFetchFailed { source: ProviderError },
    #[error("Weather data not found")]
    NotFound { id: String },
    #[error("Internal server error")]
    Internal {
        #[from]
        source: StoreError,
    },
}

impl From<ProviderError> for AppError {
    fn from(source: ProviderError) -> Self {
        match source {
            ProviderError::Unavailable { .. } => AppError::ProviderUnavailable { source },
            ProviderError::FetchFailed { .. } | ProviderError::InvalidPayload { .. } => {
                AppError::ProviderFetchFailed { source }
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ProviderFetchFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every failed response, `{"detail": "..."}`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ProviderUnavailable { source } | AppError::ProviderFetchFailed { source } => {
                warn!("Weather provider call failed: {source}");
            }
            AppError::NotFound { id } => log::debug!("No weather record with id {id}"),
            AppError::Internal { source } => {
                error!("Error encountered while processing request: {source}");
            }
        }
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
