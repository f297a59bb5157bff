use axum::Json;

use crate::guide::{GuideContent, guide_content};

pub async fn guide() -> Json<GuideContent> {
    Json(guide_content())
}
