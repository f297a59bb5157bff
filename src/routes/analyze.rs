use axum::{Json, extract::State};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::llm::ContentPart;
use crate::pipeline::analyze::AnalysisRequest;
use crate::pipeline::run_analysis;
use crate::report::ScamReport;

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub text: Option<String>,
    pub image: Option<MediaAttachment>,
    pub audio: Option<MediaAttachment>,
}

#[derive(Debug, Deserialize)]
pub struct MediaAttachment {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

fn media_part(kind: &str, attachment: &MediaAttachment) -> Result<ContentPart, AppError> {
    let data = BASE64
        .decode(attachment.data.as_bytes())
        .map_err(|_| AppError::Validation(format!("{kind} data must be valid base64")))?;
    if data.is_empty() {
        return Err(AppError::Validation(format!("{kind} data must not be empty")));
    }
    Ok(ContentPart::InlineData {
        mime_type: attachment.mime_type.clone(),
        data,
    })
}

fn build_request(body: &AnalyzeBody) -> Result<AnalysisRequest, AppError> {
    let mut request = AnalysisRequest::default();

    if let Some(text) = body.text.as_deref() {
        let text = text.trim();
        if !text.is_empty() {
            request.parts.push(ContentPart::Text(text.to_string()));
        }
    }
    if let Some(image) = &body.image {
        request.parts.push(media_part("image", image)?);
    }
    if let Some(audio) = &body.audio {
        request.parts.push(media_part("audio", audio)?);
    }

    if request.is_empty() {
        return Err(AppError::Validation(
            "provide text, an image or an audio clip to analyze".into(),
        ));
    }

    Ok(request)
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> AppResult<Json<ScamReport>> {
    let request = build_request(&body)?;
    let report = run_analysis(&state.llm_client, &state.config, &request).await?;
    Ok(Json(report))
}
