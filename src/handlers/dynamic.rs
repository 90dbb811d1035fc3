// src/handlers/dynamic.rs

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
    common::{
        error::{ApiError, AppError},
        i18n::{Message, ValidationIssue},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        envelope::{ListResponse, RecordResponse},
        module::ModuleName,
        query::{split_list, IncludeQuery, ListQuery, QueryOptions},
        record::Record,
    },
};

/// O corpo de create/update precisa ser um objeto JSON com pelo menos um campo.
pub fn require_object(body: Result<Json<Value>, JsonRejection>) -> Result<Record, AppError> {
    let Json(value) = body.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => ValidationIssue::EmptyBody,
        other => ValidationIssue::MalformedBody(other.body_text()),
    })?;

    match value {
        Value::Object(map) if map.is_empty() => Err(ValidationIssue::EmptyBody.into()),
        Value::Object(map) => Ok(map),
        other => Err(ValidationIssue::MalformedBody(format!(
            "esperado um objeto JSON, recebido {}",
            json_kind(&other)
        ))
        .into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Path e query rejeitados pelo axum saem no mesmo envelope `{status:"error"}`
pub fn path_params<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| ValidationIssue::InvalidParameters(rejection.body_text()).into())
}

pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ValidationIssue::InvalidParameters(rejection.body_text()).into())
}

// GET /api/dynamic/{module}
#[utoipa::path(
    get,
    path = "/api/dynamic/{module}",
    tag = "Dynamic",
    params(
        ("module" = String, Path, description = "Módulo (ex: m_gen, t_angpao)"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Lista paginada", body = ListResponse),
        (status = 400, description = "Nome de módulo inválido")
    ),
    security(("api_token" = []))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let module = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let query = query_params(query).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::from_path(&module).map_err(|e| e.to_api_error(&locale))?;
    let options = QueryOptions::from_query(
        &query,
        &app_state.config.sortable_columns,
        app_state.config.default_page_size,
    );

    let page = app_state
        .query_service
        .list(&module, &options)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ListResponse::new(&module, page)))
}

// GET /api/dynamic/{module}/{id}
#[utoipa::path(
    get,
    path = "/api/dynamic/{module}/{id}",
    tag = "Dynamic",
    params(
        ("module" = String, Path, description = "Módulo"),
        ("id" = String, Path, description = "ID do registro"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Registro encontrado", body = RecordResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn get_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let query = query_params(query).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::from_path(&module).map_err(|e| e.to_api_error(&locale))?;
    let includes = split_list(query.include.as_deref());

    let record = app_state
        .query_service
        .get(&module, &id, &includes)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(RecordResponse::new(&module, record)))
}

async fn create(
    app_state: &AppState,
    locale: &Locale,
    module: &str,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    let module = ModuleName::from_path(module).map_err(|e| e.to_api_error(locale))?;
    let payload = require_object(body).map_err(|e| e.to_api_error(locale))?;

    let record = app_state
        .record_service
        .create(&module, payload)
        .await
        .map_err(|e| e.to_api_error(locale))?;

    tracing::info!(module = %module, "registro criado");
    let message = Message::Created.text(locale.lang());
    Ok((
        StatusCode::CREATED,
        Json(RecordResponse::with_message(&module, message, record)),
    ))
}

async fn update(
    app_state: &AppState,
    locale: &Locale,
    module: &str,
    id: &str,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecordResponse>, ApiError> {
    let module = ModuleName::from_path(module).map_err(|e| e.to_api_error(locale))?;
    let payload = require_object(body).map_err(|e| e.to_api_error(locale))?;

    let record = app_state
        .record_service
        .update(&module, id, payload)
        .await
        .map_err(|e| e.to_api_error(locale))?;

    let message = Message::Updated.text(locale.lang());
    Ok(Json(RecordResponse::with_message(&module, message, record)))
}

// POST /api/dynamic/{module}
#[utoipa::path(
    post,
    path = "/api/dynamic/{module}",
    tag = "Dynamic",
    params(("module" = String, Path, description = "Módulo")),
    request_body(content = Object, description = "Campos do registro"),
    responses(
        (status = 201, description = "Registro criado", body = RecordResponse),
        (status = 400, description = "Body vazio ou inválido")
    ),
    security(("api_token" = []))
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let module = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    create(&app_state, &locale, &module, body).await
}

// POST /api/dynamic/{module}/with-details
// Mesmo comportamento do create: as linhas de detalhe vêm embutidas no corpo.
#[utoipa::path(
    post,
    path = "/api/dynamic/{module}/with-details",
    tag = "Dynamic",
    params(("module" = String, Path, description = "Módulo de cabeçalho (ex: t_angpao)")),
    request_body(content = Object, description = "Cabeçalho com as linhas de detalhe embutidas"),
    responses(
        (status = 201, description = "Registro criado", body = RecordResponse),
        (status = 400, description = "Body vazio ou inválido")
    ),
    security(("api_token" = []))
)]
pub async fn create_record_with_details(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let module = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    create(&app_state, &locale, &module, body).await
}

// PUT /api/dynamic/{module}/{id}
#[utoipa::path(
    put,
    path = "/api/dynamic/{module}/{id}",
    tag = "Dynamic",
    params(
        ("module" = String, Path, description = "Módulo"),
        ("id" = String, Path, description = "ID do registro")
    ),
    request_body(content = Object, description = "Campos a atualizar (merge raso)"),
    responses(
        (status = 200, description = "Registro atualizado", body = RecordResponse),
        (status = 400, description = "Body vazio ou inválido"),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn update_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    update(&app_state, &locale, &module, &id, body).await
}

// PUT /api/dynamic/{module}/with-details/{id}
#[utoipa::path(
    put,
    path = "/api/dynamic/{module}/with-details/{id}",
    tag = "Dynamic",
    params(
        ("module" = String, Path, description = "Módulo de cabeçalho"),
        ("id" = String, Path, description = "ID do registro")
    ),
    request_body(content = Object, description = "Cabeçalho com as linhas de detalhe embutidas"),
    responses(
        (status = 200, description = "Registro atualizado", body = RecordResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn update_record_with_details(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    update(&app_state, &locale, &module, &id, body).await
}

// DELETE /api/dynamic/{module}/{id}
#[utoipa::path(
    delete,
    path = "/api/dynamic/{module}/{id}",
    tag = "Dynamic",
    params(
        ("module" = String, Path, description = "Módulo"),
        ("id" = String, Path, description = "ID do registro")
    ),
    responses(
        (status = 200, description = "Registro removido", body = RecordResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn delete_record(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::from_path(&module).map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .record_service
        .delete(&module, &id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!(module = %module, id = %id, "registro removido");
    let message = Message::Deleted.text(locale.lang());
    Ok(Json(RecordResponse::with_message(&module, message, record)))
}
