use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use awsx_core::error::{AwsxError, ErrorCode};

/// HTTP face of [`AwsxError`].
#[derive(Debug)]
pub struct HttpError(pub AwsxError);

impl From<AwsxError> for HttpError {
    fn from(e: AwsxError) -> Self {
        Self(e)
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::BadRequest | ErrorCode::InvalidPolicy => StatusCode::BAD_REQUEST,
            ErrorCode::Engine | ErrorCode::ResolutionFailed => StatusCode::BAD_GATEWAY,
            ErrorCode::DuplicateRegistration | ErrorCode::Config | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code().as_str(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({
            "code": self.0.code().as_str(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
