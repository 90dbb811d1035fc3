// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Guardião das rotas de módulo. O token é o placeholder devolvido pelo login,
// então só a presença do Bearer é exigida (e só com REQUIRE_TOKEN ligado).
pub async fn token_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !app_state.config.require_token {
        return Ok(next.run(request).await);
    }

    match bearer {
        Ok(TypedHeader(auth)) if !auth.token().trim().is_empty() => Ok(next.run(request).await),
        _ => {
            tracing::warn!(path = %request.uri().path(), "requisição sem token bloqueada");
            Err(AppError::InvalidToken.to_api_error(&locale))
        }
    }
}
