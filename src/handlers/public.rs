// src/handlers/public.rs
//
// Leituras abertas da landing page: lista inteira, sem paginação nem token.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::dynamic::query_params,
    middleware::i18n::Locale,
    models::{
        envelope::PublicListResponse,
        module::ModuleName,
        query::{split_list, IncludeQuery},
    },
};

async fn list_public(
    app_state: &AppState,
    locale: &Locale,
    module: &str,
    includes: &[String],
) -> Result<Json<PublicListResponse>, ApiError> {
    let module = ModuleName::verbatim(module).map_err(|e| e.to_api_error(locale))?;
    let data = app_state
        .query_service
        .all(&module, includes)
        .await
        .map_err(|e| e.to_api_error(locale))?;
    Ok(Json(PublicListResponse::new(data)))
}

// GET /api/pengurus
#[utoipa::path(
    get,
    path = "/api/pengurus",
    tag = "Public",
    params(IncludeQuery),
    responses((status = 200, description = "Pengurus (com jabatan/divisi/gereja se include=m_gen)", body = PublicListResponse))
)]
pub async fn list_pengurus(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = query_params(query).map_err(|e| e.to_api_error(&locale))?;
    let includes = split_list(query.include.as_deref());
    list_public(&app_state, &locale, "pengurus", &includes).await
}

// GET /api/berita
#[utoipa::path(
    get,
    path = "/api/berita",
    tag = "Public",
    responses((status = 200, description = "Notícias", body = PublicListResponse))
)]
pub async fn list_berita(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    list_public(&app_state, &locale, "berita", &[]).await
}

// GET /api/galery
#[utoipa::path(
    get,
    path = "/api/galery",
    tag = "Public",
    responses((status = 200, description = "Galeria", body = PublicListResponse))
)]
pub async fn list_galery(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    list_public(&app_state, &locale, "galery", &[]).await
}
