use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::{AppError, ErrorResponse, ErrorSeverity};
use ulid::Ulid;

/// ハンドラが返すエラー
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    include_details: bool,
}

impl ApiError {
    pub fn new(error: AppError, include_details: bool) -> Self {
        Self {
            error,
            include_details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Ulid::new().to_string();
        let metadata = self.error.metadata();
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match metadata.severity {
            ErrorSeverity::Info => {
                tracing::info!(%request_id, code = metadata.code, error = %self.error, "request rejected")
            }
            ErrorSeverity::Warning => {
                tracing::warn!(%request_id, code = metadata.code, error = %self.error, "request rejected")
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => tracing::error!(
                %request_id,
                code = metadata.code,
                severity = ?metadata.severity,
                retryable = metadata.retryable,
                error = %self.error,
                "request failed"
            ),
        }

        let body = ErrorResponse::from_app_error(&self.error, request_id.clone(), self.include_details);
        let mut response = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }
        response
    }
}
