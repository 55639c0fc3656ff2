use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use websignin_core::{ErrorCategory, ProviderError};

/// A provider error on its way out of an RPC handler
#[derive(Debug)]
pub struct RpcError(pub ProviderError);

impl From<ProviderError> for RpcError {
    fn from(err: ProviderError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    category: &'a str,
    message: String,
}

impl RpcError {
    pub fn status_code(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Validation | ErrorCategory::Protocol | ErrorCategory::Serialization => {
                StatusCode::BAD_REQUEST
            }
            ErrorCategory::Unsupported => StatusCode::NOT_IMPLEMENTED,
            ErrorCategory::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCategory::ExternalTool => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.0.category().to_string();
        if status.is_server_error() {
            tracing::error!(category = %category, error = %self.0, "RPC failed");
        } else {
            tracing::warn!(category = %category, error = %self.0, "RPC rejected");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                category: &category,
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
