use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{ContentPart, GenerateRequest, GenerateResponse, Provider};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Harm categories the safety filter is configured for, one threshold each.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    block_threshold: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, block_threshold: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            block_threshold: block_threshold.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_body(&self, req: &GenerateRequest) -> GeminiRequest {
        let parts = req
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => Part {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                ContentPart::InlineData { mime_type, data } => Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: mime_type.clone(),
                        data: BASE64.encode(data),
                    }),
                },
            })
            .collect();

        GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: self.block_threshold.clone(),
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens,
                response_mime_type: req.response_mime_type.clone(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    safety_settings: Vec<SafetySetting>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: &'static str,
    threshold: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{}/models/{}:generateContent", self.base_url, req.model);
        let body = self.build_body(req);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<GeminiError>(&error_body) {
                return Err(anyhow::anyhow!(
                    "Gemini API error ({}): {}",
                    status,
                    err.error.message
                ));
            }
            return Err(anyhow::anyhow!(
                "Gemini API error ({}): {}",
                status,
                error_body
            ));
        }

        let resp: GeminiResponse = response.json().await?;

        let block_reason = resp
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .or_else(|| {
                resp.candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .filter(|reason| *reason == "SAFETY" || *reason == "PROHIBITED_CONTENT")
                    .map(str::to_string)
            });

        let content = resp
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let finish_reason = resp
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_default();

        let (input_tokens, output_tokens) = match &resp.usage_metadata {
            Some(usage) => (usage.prompt_token_count, usage.candidates_token_count),
            None => (0, 0),
        };

        Ok(GenerateResponse {
            content,
            model: resp.model_version.unwrap_or_else(|| req.model.clone()),
            input_tokens,
            output_tokens,
            cost_usd: 0.0,
            finish_reason,
            block_reason,
        })
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_parts(parts: Vec<ContentPart>) -> GenerateRequest {
        GenerateRequest {
            model: "gemini-1.5-flash-latest".to_string(),
            parts,
            temperature: 0.3,
            max_tokens: 2048,
            response_mime_type: Some("application/json".to_string()),
            stage: "analyze".to_string(),
        }
    }

    #[test]
    fn test_body_carries_all_safety_categories() {
        let provider = GeminiProvider::new("key", "BLOCK_MEDIUM_AND_ABOVE");
        let body = provider.build_body(&request_with_parts(vec![ContentPart::Text(
            "suspicious".to_string(),
        )]));

        let value = serde_json::to_value(&body).unwrap();
        let settings = value["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        for setting in settings {
            assert_eq!(setting["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
        }
        let categories: Vec<_> = settings.iter().map(|s| s["category"].clone()).collect();
        assert!(categories.contains(&serde_json::json!("HARM_CATEGORY_DANGEROUS_CONTENT")));
    }

    #[test]
    fn test_body_encodes_inline_media_as_base64() {
        let provider = GeminiProvider::new("key", "BLOCK_MEDIUM_AND_ABOVE");
        let body = provider.build_body(&request_with_parts(vec![
            ContentPart::Text("what is this image?".to_string()),
            ContentPart::InlineData {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
        ]));

        let value = serde_json::to_value(&body).unwrap();
        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "what is this image?");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], BASE64.encode([1, 2, 3]));
    }

    #[test]
    fn test_body_constrains_response_mime_type() {
        let provider = GeminiProvider::new("key", "BLOCK_ONLY_HIGH");
        let body =
            provider.build_body(&request_with_parts(vec![ContentPart::Text("x".to_string())]));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_blocked_response_deserializes() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let resp: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.candidates.is_empty());
        assert_eq!(
            resp.prompt_feedback.and_then(|f| f.block_reason).as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_full_response_deserializes() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{\"risco\": \"Alto\"}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 7},
            "modelVersion": "gemini-1.5-flash-002"
        }"#;
        let resp: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.candidates.len(), 1);
        let usage = resp.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 12);
        assert_eq!(usage.candidates_token_count, 7);
        assert_eq!(resp.model_version.as_deref(), Some("gemini-1.5-flash-002"));
    }
}
