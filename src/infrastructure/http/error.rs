//! HTTP Error Handling
//!
//! 错误只通过状态码表达，响应体为空

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::ApplicationError;

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求体无法解码。与下游故障一样返回 500
    MalformedBody(String),
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::MalformedBody(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Cannot decode request body");
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Bad request");
            }
            ApiError::Unprocessable(msg) => {
                tracing::debug!(status = status.as_u16(), error = %msg, "Unprocessable request");
            }
            ApiError::Internal(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Internal server error");
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Service unavailable");
            }
        }

        status.into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::UnsupportedRequestType(_) => ApiError::Unprocessable(e.to_string()),
            ApplicationError::InvalidTimezone(_) => ApiError::BadRequest(e.to_string()),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::QueueUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_status_mapping() {
        let cases = [
            (
                ApplicationError::UnsupportedRequestType("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApplicationError::InvalidTimezone("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApplicationError::RepositoryError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::QueueUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApplicationError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_error_response_has_empty_body_status() {
        let response = ApiError::MalformedBody("eof".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
