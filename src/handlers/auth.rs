// src/handlers/auth.rs

use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::ValidationIssue,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{LoginResponse, LoginUserPayload},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = LoginResponse),
        (status = 400, description = "username e password obrigatórios"),
        (status = 401, description = "INVALID_USERNAME, INVALID_PASSWORD ou INACTIVE_ACCOUNT")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<LoginUserPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // Body ausente, quebrado ou com campos em branco: tudo vira "credenciais obrigatórias"
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("corpo de login rejeitado: {}", rejection.body_text());
        AppError::from(ValidationIssue::CredentialsRequired).to_api_error(&locale)
    })?;
    payload.validate().map_err(|_| {
        AppError::from(ValidationIssue::CredentialsRequired).to_api_error(&locale)
    })?;

    let response = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %payload.username, "falha no login: {}", e);
            e.to_api_error(&locale)
        })?;

    Ok(Json(response))
}
