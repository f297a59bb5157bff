use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// One error taxonomy for both pipeline stages: the Analyzer and the
/// Validator surface blocked responses and unparseable model output the
/// same way.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Response blocked by the provider safety filter: {reason}")]
    Blocked { reason: String, details: String },

    #[error("Model returned output that could not be parsed")]
    MalformedModelOutput { details: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("PDF export error: {0}")]
    Pdf(String),

    #[error("Internal error: {0}")]
    #[allow(dead_code)]
    Internal(String),
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Blocked { details, .. } => {
                tracing::warn!(details = %details, "Response blocked by safety filter");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    self.to_string(),
                    Some(details.clone()),
                )
            }
            AppError::MalformedModelOutput { details } => {
                tracing::error!(details = %details, "Unparseable model output");
                (StatusCode::BAD_GATEWAY, self.to_string(), Some(details.clone()))
            }
            AppError::Llm(msg) => {
                tracing::error!(error = %msg, "LLM error");
                (
                    StatusCode::BAD_GATEWAY,
                    "The analysis service is unavailable".to_string(),
                    None,
                )
            }
            AppError::Pdf(msg) => {
                tracing::error!(error = %msg, "PDF export error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16(),
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }
        if let Some(trace_id) = get_trace_id() {
            body["trace_id"] = json!(trace_id);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
