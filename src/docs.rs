// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health_check,

        // --- Auth ---
        handlers::auth::login,

        // --- Dynamic ---
        handlers::dynamic::list_records,
        handlers::dynamic::get_record,
        handlers::dynamic::create_record,
        handlers::dynamic::create_record_with_details,
        handlers::dynamic::update_record,
        handlers::dynamic::update_record_with_details,
        handlers::dynamic::delete_record,
        handlers::ledger::get_balance,

        // --- Legacy ---
        handlers::legacy::list_module,
        handlers::legacy::get_module_record,
        handlers::legacy::create_module_record,
        handlers::legacy::update_module_record,
        handlers::legacy::delete_module_record,

        // --- Public ---
        handlers::public::list_pengurus,
        handlers::public::list_berita,
        handlers::public::list_galery,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginUserPayload,
            models::auth::LoginResponse,

            // --- Envelopes ---
            models::envelope::ListResponse,
            models::envelope::RecordResponse,
            models::envelope::PublicListResponse,
            models::query::Pagination,

            // --- Ledger ---
            models::ledger::EntryKind,
            models::ledger::DepositStatus,
            models::ledger::BalanceSummary,
            models::ledger::BalanceResponse,
        )
    ),
    tags(
        (name = "Health", description = "Estado do servidor"),
        (name = "Auth", description = "Login do painel"),
        (name = "Dynamic", description = "CRUD genérico de módulos (m_gen, t_angpao...)"),
        (name = "Legacy", description = "Rotas antigas /api/{module}, sem normalização do nome"),
        (name = "Public", description = "Leituras abertas da landing page")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_token",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
