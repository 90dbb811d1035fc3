// src/router.rs

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::get,
    routing::post,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, Config},
    docs::ApiDoc,
    handlers,
    middleware::auth::token_guard,
};

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // CRUD genérico: `/api/dynamic/m_gen`, `/api/dynamic/t_angpao/with-details`...
    let dynamic_routes = Router::new()
        .route(
            "/{module}",
            get(handlers::dynamic::list_records).post(handlers::dynamic::create_record),
        )
        .route(
            "/{module}/with-details",
            get(handlers::dynamic::list_records)
                .post(handlers::dynamic::create_record_with_details),
        )
        .route(
            "/{module}/with-details/{id}",
            get(handlers::dynamic::get_record).put(handlers::dynamic::update_record_with_details),
        )
        .route(
            "/{module}/{id}",
            get(handlers::dynamic::get_record)
                .put(handlers::dynamic::update_record)
                .delete(handlers::dynamic::delete_record),
        )
        .route("/{module}/{id}/balance", get(handlers::ledger::get_balance))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            token_guard,
        ));

    // Leituras da landing page (sem token)
    let public_routes = Router::new()
        .route("/api/pengurus", get(handlers::public::list_pengurus))
        .route("/api/berita", get(handlers::public::list_berita))
        .route("/api/galery", get(handlers::public::list_galery));

    // Rotas antigas sem normalização do nome do módulo
    let legacy_routes = Router::new()
        .route(
            "/api/{module}",
            get(handlers::legacy::list_module).post(handlers::legacy::create_module_record),
        )
        .route(
            "/api/{module}/{id}",
            get(handlers::legacy::get_module_record)
                .put(handlers::legacy::update_module_record)
                .delete(handlers::legacy::delete_module_record),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            token_guard,
        ));

    let cors = cors_layer(&app_state.config);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api/dynamic", dynamic_routes)
        .merge(public_routes)
        .merge(legacy_routes)
        .fallback(handlers::health::not_found)
        .layer(cors)
        .with_state(app_state)
}
