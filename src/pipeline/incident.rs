use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{ContentPart, GenerateRequest, LlmClient};

/// Fixed subject line the generated statement must open with, so victims
/// can paste it straight into a police report or a bank dispute.
pub const INCIDENT_SUBJECT: &str = "Assunto: Relato de Ocorrência de Estelionato Virtual";

#[derive(Debug, Clone, Deserialize)]
pub struct IncidentDetails {
    pub scam_type: String,
    pub loss: String,
    pub description: String,
}

impl IncidentDetails {
    pub fn is_complete(&self) -> bool {
        !self.scam_type.trim().is_empty()
            && !self.loss.trim().is_empty()
            && !self.description.trim().is_empty()
    }
}

pub(crate) fn build_prompt(details: &IncidentDetails) -> String {
    format!(
        "Act as an assistant to a scam victim in Brazil. Based on the information \
         below, write a formal and clear statement in Brazilian Portuguese, suitable \
         for a police report (boletim de ocorrência) or for contacting the victim's \
         bank. Organize the text in clear paragraphs.\n\n\
         - Scam type: {}\n\
         - Loss: {}\n\
         - Description of the facts: {}\n\n\
         The text must be objective, reporting the facts chronologically and \
         precisely, so the authority or the bank manager can understand exactly what \
         happened. Start with \"{INCIDENT_SUBJECT}\" and end with a placeholder for \
         the victim's name and the date.",
        details.scam_type.trim(),
        details.loss.trim(),
        details.description.trim(),
    )
}

#[tracing::instrument(
    name = "pipeline_stage incident_report",
    skip(llm_client, details),
    fields(pipeline.stage = "incident_report")
)]
pub async fn write_incident_report(
    llm_client: &LlmClient,
    config: &Config,
    details: &IncidentDetails,
) -> Result<String, AppError> {
    let resp = llm_client
        .generate(&GenerateRequest {
            model: config.analyzer_model.clone(),
            parts: vec![ContentPart::Text(build_prompt(details))],
            temperature: config.default_temperature,
            max_tokens: config.default_max_tokens,
            response_mime_type: None,
            stage: "incident_report".to_string(),
        })
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    if let Some(reason) = resp.block_reason {
        return Err(AppError::Blocked {
            reason,
            details: resp.finish_reason,
        });
    }

    let report = resp.content.trim().to_string();
    if report.is_empty() {
        return Err(AppError::MalformedModelOutput {
            details: format!("empty incident report (finish: {})", resp.finish_reason),
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> IncidentDetails {
        IncidentDetails {
            scam_type: "Pix para loja falsa".to_string(),
            loss: "R$ 500,00".to_string(),
            description: "Paguei um anúncio e a loja sumiu.".to_string(),
        }
    }

    #[test]
    fn test_prompt_includes_all_fields_and_subject() {
        let prompt = build_prompt(&details());
        assert!(prompt.contains("Pix para loja falsa"));
        assert!(prompt.contains("R$ 500,00"));
        assert!(prompt.contains("a loja sumiu"));
        assert!(prompt.contains(INCIDENT_SUBJECT));
    }

    #[test]
    fn test_is_complete_rejects_blank_fields() {
        let mut d = details();
        assert!(d.is_complete());
        d.loss = "   ".to_string();
        assert!(!d.is_complete());
    }
}
