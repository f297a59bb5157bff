use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::password::generate_password;

#[derive(Debug, Deserialize)]
pub struct PasswordBody {
    pub phrase: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordResponse {
    pub password: String,
}

pub async fn password(Json(body): Json<PasswordBody>) -> AppResult<Json<PasswordResponse>> {
    let password = generate_password(&body.phrase)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(PasswordResponse { password }))
}
