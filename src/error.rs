use crate::yaya::YayaError;
use axum::{
    body::{Bytes, Full},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::any::Any;

pub const GENERIC_ERROR: &str = "Something went wrong!";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: YayaError,
    },
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn upstream(context: &'static str, source: YayaError) -> Self {
        AppError::Upstream { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Logs server-side failures and builds the JSON body.
    fn into_body(self) -> (StatusCode, Value) {
        let status = self.status_code();
        let body = match self {
            AppError::Upstream { context, source } => {
                tracing::error!(error = %source, details = %source.details(), "{}", context);
                json!({
                    "error": context,
                    "details": source.details(),
                })
            }
            AppError::BadRequest(msg) | AppError::NotFound(msg) => json!({ "error": msg }),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                json!({ "error": GENERIC_ERROR })
            }
        };
        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_body();
        (status, Json(body)).into_response()
    }
}

/// Panic hook for `CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    let (status, body) = AppError::Internal(format!("handler panicked: {}", detail)).into_body();

    let mut response = Response::new(Full::from(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_error_forwards_details() {
        let err = AppError::upstream(
            "Failed to fetch transactions",
            YayaError::Status {
                status: 401,
                body: json!({ "message": "invalid signature" }),
            },
        );
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to fetch transactions");
        assert_eq!(body["details"]["message"], "invalid signature");
    }

    #[tokio::test]
    async fn test_upstream_error_without_body_uses_message() {
        let err = AppError::upstream(
            "Failed to search transactions",
            YayaError::InvalidResponse("expected object".to_string()),
        );
        let body = body_json(err.into_response()).await;

        assert_eq!(body["error"], "Failed to search transactions");
        assert_eq!(
            body["details"],
            "Invalid response from YaYa API: expected object"
        );
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], GENERIC_ERROR);
    }

    #[tokio::test]
    async fn test_client_errors() {
        let response = AppError::NotFound("Not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");

        let response = AppError::BadRequest("bad page".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_panic_handler_returns_generic_body() {
        let response = handle_panic(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": GENERIC_ERROR }));
    }
}
