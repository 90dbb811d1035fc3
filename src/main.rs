//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use panti_backend::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    tracing::info!(
        backend = ?config.store_backend,
        data_dir = %config.data_dir.display(),
        auth_module = %config.auth_module,
        require_token = config.require_token,
        "⚙️ Configuração carregada"
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let app_state = AppState::new(config).await?;
    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
