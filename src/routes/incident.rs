use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline::incident::{IncidentDetails, write_incident_report};

#[derive(Debug, Serialize)]
pub struct IncidentResponse {
    pub report: String,
}

pub async fn incident_report(
    State(state): State<AppState>,
    Json(details): Json<IncidentDetails>,
) -> AppResult<Json<IncidentResponse>> {
    if !details.is_complete() {
        return Err(AppError::Validation(
            "Por favor, preencha todos os campos para gerar o relato.".into(),
        ));
    }

    let report = write_incident_report(&state.llm_client, &state.config, &details).await?;

    Ok(Json(IncidentResponse { report }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_deserialize() {
        let details: IncidentDetails = serde_json::from_str(
            r#"{"scam_type": "WhatsApp clonado", "loss": "R$ 200,00", "description": "Pediram dinheiro aos meus contatos."}"#,
        )
        .unwrap();
        assert!(details.is_complete());
    }

    #[test]
    fn test_blank_field_detected() {
        let details: IncidentDetails = serde_json::from_str(
            r#"{"scam_type": "", "loss": "R$ 200,00", "description": "x"}"#,
        )
        .unwrap();
        assert!(!details.is_complete());
    }
}
