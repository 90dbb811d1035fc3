// src/handlers/ledger.rs

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::dynamic::path_params,
    middleware::i18n::Locale,
    models::{ledger::BalanceResponse, module::ModuleName},
};

// GET /api/dynamic/{module}/{id}/balance
#[utoipa::path(
    get,
    path = "/api/dynamic/{module}/{id}/balance",
    tag = "Dynamic",
    params(
        ("module" = String, Path, description = "Módulo de cabeçalho (ex: t_deposit, t_angpao)"),
        ("id" = String, Path, description = "ID do cabeçalho")
    ),
    responses(
        (status = 200, description = "Resumo de saldo", body = BalanceResponse),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    locale: Locale,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, id) = path_params(path).map_err(|e| e.to_api_error(&locale))?;
    let module = ModuleName::from_path(&module).map_err(|e| e.to_api_error(&locale))?;

    let summary = app_state
        .ledger_service
        .balance(&module, &id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(BalanceResponse {
        status: "success",
        module: module.to_string(),
        id,
        data: summary,
    }))
}
