use axum::Json;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::report::pdf::{self, PDF_FILENAME};
use crate::telemetry::metrics::PDF_EXPORT_BYTES;

const DEFAULT_TITLE: &str = "Relatório de Análise de Risco";

#[derive(Debug, Deserialize)]
pub struct PdfBody {
    pub title: Option<String>,
    pub markdown: String,
}

pub async fn export_pdf(Json(body): Json<PdfBody>) -> AppResult<impl IntoResponse> {
    if body.markdown.trim().is_empty() {
        return Err(AppError::Validation("markdown must not be empty".into()));
    }

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let bytes = pdf::render(title, &body.markdown);
    PDF_EXPORT_BYTES.record(bytes.len() as f64, &[]);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    let disposition = format!("attachment; filename=\"{PDF_FILENAME}\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Pdf(format!("invalid disposition header: {e}")))?,
    );

    Ok((headers, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_deserialize() {
        let body: PdfBody = serde_json::from_str(
            r####"{"title": "Relatório", "markdown": "### Detailed Analysis\nBody."}"####,
        )
        .unwrap();
        assert_eq!(body.title.as_deref(), Some("Relatório"));
        assert!(body.markdown.contains("Detailed Analysis"));
    }

    #[test]
    fn test_body_title_optional() {
        let body: PdfBody = serde_json::from_str(r#"{"markdown": "text"}"#).unwrap();
        assert!(body.title.is_none());
    }

    #[tokio::test]
    async fn test_export_rejects_empty_markdown() {
        let result = export_pdf(Json(PdfBody {
            title: None,
            markdown: "   ".to_string(),
        }))
        .await;
        assert!(matches!(result.err(), Some(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_export_sets_pdf_headers() {
        let response = export_pdf(Json(PdfBody {
            title: Some("Relatório".to_string()),
            markdown: "### Detailed Analysis\nConteúdo.".to_string(),
        }))
        .await
        .unwrap()
        .into_response();

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains(PDF_FILENAME));
    }
}
