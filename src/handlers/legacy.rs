// src/handlers/legacy.rs
//
// Rotas antigas `/api/{module}`: o nome do módulo é usado como veio (sem tirar
// `m_`/`t_`) e a listagem só pagina, sem filtros.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{
    common::{error::ApiError, i18n::Message},
    config::AppState,
    handlers::dynamic::{path_params, query_params, require_object},
    middleware::i18n::Locale,
    models::{
        envelope::{ListResponse, RecordResponse},
        module::ModuleName,
        query::{ListQuery, QueryOptions},
    },
};

// Só page/limit contam aqui
fn paging_only(query: &ListQuery, default_limit: usize) -> QueryOptions {
    let parsed = QueryOptions::from_query(query, &[], default_limit);
    QueryOptions {
        page: parsed.page,
        limit: parsed.limit,
        ..QueryOptions::unfiltered(default_limit)
    }
}

// GET /api/{module}
#[utoipa::path(
    get,
    path = "/api/{module}",
    tag = "Legacy",
    params(
        ("module" = String, Path, description = "Nome do módulo, sem normalização"),
        ("page" = Option<String>, Query, description = "Página (1..)"),
        ("limit" = Option<String>, Query, description = "Itens por página")
    ),
    responses((status = 200, description = "Lista paginada", body = ListResponse)),
    security(("api_token" = []))
)]
pub async fn list_module(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let module = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let query = query_params(query).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::verbatim(&module).map_err(|e| e.to_api_error(&locale))?;
    let options = paging_only(&query, app_state.config.default_page_size);

    let page = app_state
        .query_service
        .list(&module, &options)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ListResponse::new(&module, page)))
}

// GET /api/{module}/{id}
#[utoipa::path(
    get,
    path = "/api/{module}/{id}",
    tag = "Legacy",
    params(
        ("module" = String, Path, description = "Nome do módulo, sem normalização"),
        ("id" = String, Path, description = "ID do registro")
    ),
    responses(
        (status = 200, description = "Registro encontrado", body = RecordResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn get_module_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::verbatim(&module).map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .query_service
        .get(&module, &id, &[])
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(RecordResponse::new(&module, record)))
}

// POST /api/{module}
#[utoipa::path(
    post,
    path = "/api/{module}",
    tag = "Legacy",
    params(("module" = String, Path, description = "Nome do módulo, sem normalização")),
    request_body(content = Object, description = "Campos do registro"),
    responses(
        (status = 201, description = "Registro criado", body = RecordResponse),
        (status = 400, description = "Body vazio ou inválido")
    ),
    security(("api_token" = []))
)]
pub async fn create_module_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let module = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::verbatim(&module).map_err(|e| e.to_api_error(&locale))?;
    let payload = require_object(body).map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .record_service
        .create(&module, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = Message::Created.text(locale.lang());
    Ok((
        StatusCode::CREATED,
        Json(RecordResponse::with_message(&module, message, record)),
    ))
}

// PUT /api/{module}/{id}
#[utoipa::path(
    put,
    path = "/api/{module}/{id}",
    tag = "Legacy",
    params(
        ("module" = String, Path, description = "Nome do módulo, sem normalização"),
        ("id" = String, Path, description = "ID do registro")
    ),
    request_body(content = Object, description = "Campos a atualizar"),
    responses(
        (status = 200, description = "Registro atualizado", body = RecordResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn update_module_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::verbatim(&module).map_err(|e| e.to_api_error(&locale))?;
    let payload = require_object(body).map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .record_service
        .update(&module, &id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = Message::Updated.text(locale.lang());
    Ok(Json(RecordResponse::with_message(&module, message, record)))
}

// DELETE /api/{module}/{id}
#[utoipa::path(
    delete,
    path = "/api/{module}/{id}",
    tag = "Legacy",
    params(
        ("module" = String, Path, description = "Nome do módulo, sem normalização"),
        ("id" = String, Path, description = "ID do registro")
    ),
    responses(
        (status = 200, description = "Registro removido", body = RecordResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn delete_module_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::verbatim(&module).map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .record_service
        .delete(&module, &id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = Message::Deleted.text(locale.lang());
    Ok(Json(RecordResponse::with_message(&module, message, record)))
}
