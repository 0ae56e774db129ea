use std::panic::AssertUnwindSafe;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use futures::FutureExt;

use super::helpers::{ApiResponse, error_chain_fmt};
use crate::domain::ValidationError;

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed.")]
    ValidationError(#[from] ValidationError),
    #[error("{0}")]
    ProviderUnavailable(&'static str),
    #[error(transparent)]
    UnexpectedError(anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::ProviderUnavailable(_) | ApiError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::ValidationError(e) => {
                ApiResponse::invalid(self.to_string(), e.errors.clone())
            }
            ApiError::ProviderUnavailable(message) => ApiResponse::failure(*message),
            ApiError::UnexpectedError(_) => {
                ApiResponse::failure("Something went wrong. Please try again later.")
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string())
}

/// Turns a panicking handler into the generic 500 envelope instead of a
/// dropped connection.
pub async fn catch_panics(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let request = req.request().clone();

    match AssertUnwindSafe(next.call(req)).catch_unwind().await {
        Ok(outcome) => outcome.map(ServiceResponse::map_into_left_body),
        Err(payload) => {
            let error = ApiError::UnexpectedError(anyhow::anyhow!(
                "Request handler panicked: {}",
                panic_message(payload.as_ref())
            ));
            tracing::error!(
                error.cause_chain = ?error,
                error.message = %error,
                "Unexpected failure while handling a request."
            );
            Ok(ServiceResponse::new(request, error.error_response()).map_into_right_body())
        }
    }
}
