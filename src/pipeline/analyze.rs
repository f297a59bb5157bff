use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::llm::{ContentPart, GenerateRequest, LlmClient};

/// Coarse risk label assigned by the model. The wire labels are the
/// product's Portuguese tokens; anything unrecognized degrades to
/// `Unknown` instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl RiskLevel {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "baixo" | "low" => Self::Low,
            "médio" | "medio" | "medium" => Self::Medium,
            "alto" | "high" => Self::High,
            _ => Self::Unknown,
        }
    }

    /// Display label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixo",
            Self::Medium => "Médio",
            Self::High => "Alto",
            Self::Unknown => "Indeterminado",
        }
    }

    /// Banner color for the presentation layer. Unknown maps to the
    /// neutral gray.
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#28A745",
            Self::Medium => "#FFC700",
            Self::High => "#FF4B4B",
            Self::Unknown => "#6c757d",
        }
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// User-supplied content for one analysis: ordered parts, built fresh per
/// submission and discarded once the Analyzer call returns.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub parts: Vec<ContentPart>,
}

impl AnalysisRequest {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "analise", default)]
    pub narrative: String,
    #[serde(rename = "risco", default)]
    pub risk_level: RiskLevel,
    #[serde(rename = "fontes", default)]
    pub sources: Vec<String>,
    #[serde(skip)]
    pub input_tokens: u32,
    #[serde(skip)]
    pub output_tokens: u32,
    #[serde(skip)]
    pub cost_usd: f64,
}

fn analyzer_prompt() -> String {
    "You are a cybersecurity expert specialized in online scams targeting Brazilian \
     users. Examine the content supplied after these instructions; it may include \
     text, an image or an audio recording.\n\
     Return ONLY a JSON object, with no text before or after it, using exactly this \
     structure:\n\
     {\n  \
       \"analise\": \"a detailed technical analysis of the possible risks, identifying \
     phishing patterns, malware, social engineering and similar threats\",\n  \
       \"risco\": \"Baixo\", \"Médio\" or \"Alto\",\n  \
       \"fontes\": [\"source_url_1\", \"source_url_2\"]\n\
     }\n\
     Ground the analysis in current, reputable references so the information stays \
     up to date.\n\
     Content to analyze:"
        .to_string()
}

#[tracing::instrument(
    name = "pipeline_stage analyze",
    skip(llm_client, request),
    fields(
        pipeline.stage = "analyze",
        analysis.risk_level,
        analysis.sources_count,
    )
)]
pub async fn analyze(
    llm_client: &LlmClient,
    model: &str,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    let mut parts = vec![ContentPart::Text(analyzer_prompt())];
    parts.extend(request.parts.iter().cloned());

    let resp = llm_client
        .generate(&GenerateRequest {
            model: model.to_string(),
            parts,
            temperature: 0.3,
            max_tokens: 2048,
            response_mime_type: Some("application/json".to_string()),
            stage: "analyze".to_string(),
        })
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    if let Some(reason) = resp.block_reason {
        return Err(AppError::Blocked {
            reason,
            details: resp.finish_reason,
        });
    }

    let analysis = parse_analysis_response(
        &resp.content,
        resp.input_tokens,
        resp.output_tokens,
        resp.cost_usd,
    )?;

    let span = tracing::Span::current();
    span.record("analysis.risk_level", analysis.risk_level.label());
    span.record("analysis.sources_count", analysis.sources.len());

    Ok(analysis)
}

fn parse_analysis_response(
    content: &str,
    input_tokens: u32,
    output_tokens: u32,
    cost_usd: f64,
) -> Result<AnalysisResult, AppError> {
    let json_str = extract_json(content);

    match serde_json::from_str::<AnalysisResult>(&json_str) {
        Ok(mut analysis) => {
            analysis.input_tokens = input_tokens;
            analysis.output_tokens = output_tokens;
            analysis.cost_usd = cost_usd;
            Ok(analysis)
        }
        Err(_) => Err(AppError::MalformedModelOutput {
            details: content.chars().take(500).collect(),
        }),
    }
}

pub(crate) fn extract_json(content: &str) -> String {
    if let Some(start) = content.find("```json")
        && let Some(end) = content[start + 7..].find("```")
    {
        return content[start + 7..start + 7 + end].trim().to_string();
    }
    if let Some(start) = content.find("```")
        && let Some(end) = content[start + 3..].find("```")
    {
        let inner = content[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }
    if let Some(start) = content.find('{')
        && let Some(end) = content.rfind('}')
    {
        return content[start..=end].to_string();
    }
    content.to_string()
}
