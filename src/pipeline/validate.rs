use crate::error::AppError;
use crate::llm::{ContentPart, GenerateRequest, LlmClient};
use crate::report::sections::{
    HEADING_DETAILED_ANALYSIS, HEADING_RECOMMENDATIONS, HEADING_SOURCES,
};

use super::analyze::AnalysisResult;

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub markdown: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
}

/// The section split downstream depends on these exact heading tokens, so
/// the prompt spells them out verbatim. The sources section is only
/// requested when there are sources to list.
pub(crate) fn build_prompt(analysis: &AnalysisResult) -> String {
    let analysis_json = serde_json::to_string_pretty(analysis).unwrap_or_default();

    let mut prompt = format!(
        "You are a cybersecurity communication specialist. A junior analyst produced \
         the following risk assessment JSON:\n\
         ---\n{analysis_json}\n---\n\
         Write the final response for a non-technical user. It must be clear, direct \
         and useful. Do NOT add a verdict headline; start directly with the analysis.\n\
         Format the response in Markdown using EXACTLY these section headings:\n\
         1. A section \"### {HEADING_DETAILED_ANALYSIS}\".\n\
         2. A section \"### {HEADING_RECOMMENDATIONS}\" as a numbered list.\n"
    );

    if analysis.sources.is_empty() {
        prompt.push_str("Do not include a sources section.\n");
    } else {
        prompt.push_str(&format!(
            "3. A section \"### {HEADING_SOURCES}\" listing the URLs, one per line.\n"
        ));
    }

    prompt
}

#[tracing::instrument(
    name = "pipeline_stage validate",
    skip(llm_client, analysis),
    fields(
        pipeline.stage = "validate",
        report.chars,
    )
)]
pub async fn validate(
    llm_client: &LlmClient,
    model: &str,
    analysis: &AnalysisResult,
) -> Result<ValidationResult, AppError> {
    let resp = llm_client
        .generate(&GenerateRequest {
            model: model.to_string(),
            parts: vec![ContentPart::Text(build_prompt(analysis))],
            temperature: 0.3,
            max_tokens: 4096,
            response_mime_type: None,
            stage: "validate".to_string(),
        })
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    if let Some(reason) = resp.block_reason {
        return Err(AppError::Blocked {
            reason,
            details: resp.finish_reason,
        });
    }

    let markdown = resp.content.trim().to_string();
    if markdown.is_empty() {
        return Err(AppError::MalformedModelOutput {
            details: format!("empty validator response (finish: {})", resp.finish_reason),
        });
    }

    tracing::Span::current().record("report.chars", markdown.len());

    Ok(ValidationResult {
        markdown,
        input_tokens: resp.input_tokens,
        output_tokens: resp.output_tokens,
        cost_usd: resp.cost_usd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze::RiskLevel;

    fn analysis_with_sources(sources: Vec<String>) -> AnalysisResult {
        AnalysisResult {
            narrative: "Mensagem com padrão clássico de premiação falsa.".to_string(),
            risk_level: RiskLevel::High,
            sources,
            input_tokens: 120,
            output_tokens: 80,
            cost_usd: 0.001,
        }
    }

    #[test]
    fn test_prompt_embeds_analysis_json() {
        let prompt = build_prompt(&analysis_with_sources(vec![]));
        assert!(prompt.contains("premiação falsa"));
        assert!(prompt.contains("\"risco\""));
        // usage accounting is internal and must not leak into the prompt
        assert!(!prompt.contains("input_tokens"));
    }

    #[test]
    fn test_prompt_requests_mandatory_headings() {
        let prompt = build_prompt(&analysis_with_sources(vec![]));
        assert!(prompt.contains("### Detailed Analysis"));
        assert!(prompt.contains("### Security Recommendations"));
    }

    #[test]
    fn test_prompt_omits_sources_heading_when_empty() {
        let prompt = build_prompt(&analysis_with_sources(vec![]));
        assert!(!prompt.contains("### Sources Consulted"));
        assert!(prompt.contains("Do not include a sources section."));
    }

    #[test]
    fn test_prompt_requests_sources_heading_when_present() {
        let prompt =
            build_prompt(&analysis_with_sources(vec!["https://cert.br".to_string()]));
        assert!(prompt.contains("### Sources Consulted"));
        assert!(!prompt.contains("Do not include a sources section."));
    }
}
