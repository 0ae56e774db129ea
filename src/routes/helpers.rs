use std::error::Error;

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError};
use serde::Serialize;

use crate::domain::FieldError;

pub fn error_chain_fmt(e: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

/// The `{success, message, errors?}` body every API endpoint answers with.
#[derive(Serialize, Debug)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub fn invalid(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Some(errors),
        }
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error.message = %err, "Rejected a malformed request body.");
    let response = HttpResponse::BadRequest().json(ApiResponse::failure("Invalid request body."));
    actix_web::error::InternalError::from_response(err, response).into()
}

pub async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Not found."))
}
