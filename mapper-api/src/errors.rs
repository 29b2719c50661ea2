use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::StatusCode,
    web, HttpRequest, HttpResponse,
};
use thiserror::Error;

use crate::models::MessageResponse;
use crate::state::AppState;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Minecraft log is empty/invalid.")]
    InvalidLog,

    #[error("Too many submissions, please wait before trying again.")]
    RateLimited,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<prometheus::Error> for ApiError {
    fn from(e: prometheus::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageResponse {
            message: self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidLog => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body errors on `/submit` (malformed JSON, `data` of the wrong type) are reported the same
/// way as an empty log.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    if let Some(state) = req.app_data::<web::Data<AppState>>() {
        state.metrics.rejected_submissions_total.inc();
    }
    tracing::debug!(error = %err, "Rejected unreadable submission body");
    ApiError::InvalidLog.into()
}
