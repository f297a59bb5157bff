use opentelemetry::KeyValue;
use opentelemetry::trace::TraceContextExt;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::LlmClient;
use crate::report::{ReportParams, ScamReport, assemble};
use crate::telemetry::metrics::{ANALYSIS_DURATION, ANALYSIS_RISK_COUNT};

use super::analyze::{self, AnalysisRequest};
use super::validate;

/// Runs the two-stage assessment: Analyzer first, Validator second. Any
/// Analyzer failure aborts before the Validator is ever called.
#[tracing::instrument(
    name = "pipeline scam_analysis",
    skip(llm_client, config, request),
    fields(
        analysis.parts_count = request.parts.len(),
        analysis.risk_level,
        analysis.duration_ms,
    )
)]
pub async fn run_analysis(
    llm_client: &LlmClient,
    config: &Config,
    request: &AnalysisRequest,
) -> Result<ScamReport, AppError> {
    let start = std::time::Instant::now();

    let span = tracing::Span::current();
    let context = span.context();
    let otel_span = context.span();
    let trace_id = otel_span.span_context().trace_id().to_string();

    // Stage 1: structured risk assessment (fast model)
    let analysis = analyze::analyze(llm_client, &config.analyzer_model, request).await?;

    // Stage 2: human-readable report (capable model)
    let validation = validate::validate(llm_client, &config.validator_model, &analysis).await?;

    let duration = start.elapsed();
    let report = assemble(ReportParams {
        analysis: &analysis,
        validation: &validation,
        duration,
        trace_id,
    });

    ANALYSIS_DURATION.record(duration.as_secs_f64(), &[]);
    ANALYSIS_RISK_COUNT.add(
        1,
        &[KeyValue::new("analysis.risk_level", report.risk_label.clone())],
    );

    span.record("analysis.risk_level", report.risk_label.as_str());
    span.record("analysis.duration_ms", report.generation_duration_ms);

    Ok(report)
}
