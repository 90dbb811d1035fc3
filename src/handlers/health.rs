// src/handlers/health.rs

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::{common::i18n::Message, middleware::i18n::Locale};

// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

// Fallback para qualquer rota desconhecida
pub async fn not_found(locale: Locale) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": Message::EndpointNotFound.text(locale.lang()),
        })),
    )
}
