pub mod client;
pub mod gemini;
pub mod pricing;

pub use client::LlmClient;

/// One ordered piece of user-supplied content. Media parts carry raw bytes;
/// the provider encodes them for the wire.
#[derive(Debug, Clone)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub parts: Vec<ContentPart>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Constrains the model output MIME type (e.g. "application/json").
    pub response_mime_type: Option<String>,
    pub stage: String,
}

impl GenerateRequest {
    /// Concatenated text parts, used for span events. Media parts are
    /// summarized by MIME type instead of raw bytes.
    pub fn prompt_preview(&self) -> String {
        self.parts
            .iter()
            .map(|p| match p {
                ContentPart::Text(text) => text.clone(),
                ContentPart::InlineData { mime_type, data } => {
                    format!("[{} ({} bytes)]", mime_type, data.len())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
    pub finish_reason: String,
    /// Set when the provider withheld the response (safety filter). The
    /// content is empty in that case.
    pub block_reason: Option<String>,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_preview_mixes_text_and_media() {
        let req = GenerateRequest {
            model: "gemini-1.5-flash-latest".to_string(),
            parts: vec![
                ContentPart::Text("analyze this".to_string()),
                ContentPart::InlineData {
                    mime_type: "image/png".to_string(),
                    data: vec![0u8; 16],
                },
            ],
            temperature: 0.3,
            max_tokens: 1024,
            response_mime_type: None,
            stage: "test".to_string(),
        };
        let preview = req.prompt_preview();
        assert!(preview.contains("analyze this"));
        assert!(preview.contains("[image/png (16 bytes)]"));
        assert!(!preview.contains('\0'));
    }
}
