pub mod pdf;
pub mod sections;

use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::analyze::{AnalysisResult, RiskLevel};
use crate::pipeline::validate::ValidationResult;

use sections::ReportSections;

/// Final assembled assessment returned to the caller. Everything the
/// presentation needs is precomputed here: banner color, parsed sections
/// and the raw Markdown for PDF export.
#[derive(Debug, Clone, Serialize)]
pub struct ScamReport {
    pub id: Uuid,
    pub risk_level: RiskLevel,
    pub risk_label: String,
    pub risk_color: String,
    pub narrative: String,
    pub markdown: String,
    pub detailed_analysis: Option<String>,
    pub recommendations: Vec<String>,
    pub sources: Vec<String>,
    pub total_tokens: u32,
    pub total_cost_usd: f64,
    pub generation_duration_ms: u64,
    pub trace_id: String,
}

pub struct ReportParams<'a> {
    pub analysis: &'a AnalysisResult,
    pub validation: &'a ValidationResult,
    pub duration: Duration,
    pub trace_id: String,
}

#[tracing::instrument(
    name = "pipeline_stage assemble",
    skip(params),
    fields(
        pipeline.stage = "assemble",
        report.risk_level,
        report.recommendations_count,
    )
)]
pub fn assemble(params: ReportParams<'_>) -> ScamReport {
    let sections = ReportSections::parse(&params.validation.markdown);

    let total_tokens = params.analysis.input_tokens
        + params.analysis.output_tokens
        + params.validation.input_tokens
        + params.validation.output_tokens;

    let risk_level = params.analysis.risk_level;
    let recommendations = sections.security_recommendations();

    let span = tracing::Span::current();
    span.record("report.risk_level", risk_level.label());
    span.record("report.recommendations_count", recommendations.len());

    ScamReport {
        id: Uuid::new_v4(),
        risk_level,
        risk_label: risk_level.label().to_string(),
        risk_color: risk_level.color().to_string(),
        narrative: params.analysis.narrative.clone(),
        markdown: params.validation.markdown.clone(),
        detailed_analysis: sections.detailed_analysis().map(str::to_string),
        recommendations,
        sources: params.analysis.sources.clone(),
        total_tokens,
        total_cost_usd: params.analysis.cost_usd + params.validation.cost_usd,
        generation_duration_ms: params.duration.as_millis() as u64,
        trace_id: params.trace_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_populates_all_fields() {
        let analysis = AnalysisResult {
            narrative: "Padrão clássico de premiação falsa.".to_string(),
            risk_level: RiskLevel::High,
            sources: vec!["https://cert.br".to_string()],
            input_tokens: 500,
            output_tokens: 200,
            cost_usd: 0.01,
        };
        let validation = ValidationResult {
            markdown: "### Detailed Analysis\nFake prize message.\n\n\
                       ### Security Recommendations\n1. Do not click.\n2. Block sender.\n\n\
                       ### Sources Consulted\nhttps://cert.br\n"
                .to_string(),
            input_tokens: 800,
            output_tokens: 400,
            cost_usd: 0.02,
        };

        let report = assemble(ReportParams {
            analysis: &analysis,
            validation: &validation,
            duration: Duration::from_millis(5400),
            trace_id: "abc123trace".to_string(),
        });

        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.risk_label, "Alto");
        assert_eq!(report.risk_color, "#FF4B4B");
        assert_eq!(
            report.detailed_analysis.as_deref(),
            Some("Fake prize message.")
        );
        assert_eq!(report.recommendations, vec!["Do not click.", "Block sender."]);
        assert_eq!(report.sources, vec!["https://cert.br"]);
        assert_eq!(report.total_tokens, 500 + 200 + 800 + 400);
        assert!((report.total_cost_usd - 0.03).abs() < 1e-9);
        assert_eq!(report.generation_duration_ms, 5400);
        assert_eq!(report.trace_id, "abc123trace");
    }

    #[test]
    fn test_assemble_with_unknown_risk_uses_neutral_color() {
        let analysis = AnalysisResult {
            narrative: String::new(),
            risk_level: RiskLevel::Unknown,
            sources: vec![],
            input_tokens: 0,
            output_tokens: 0,
            cost_usd: 0.0,
        };
        let validation = ValidationResult {
            markdown: "no headings here".to_string(),
            input_tokens: 0,
            output_tokens: 0,
            cost_usd: 0.0,
        };

        let report = assemble(ReportParams {
            analysis: &analysis,
            validation: &validation,
            duration: Duration::ZERO,
            trace_id: String::new(),
        });

        assert_eq!(report.risk_color, "#6c757d");
        assert_eq!(report.risk_label, "Indeterminado");
        assert!(report.detailed_analysis.is_none());
        assert!(report.recommendations.is_empty());
    }
}
