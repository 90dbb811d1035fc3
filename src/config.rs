// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::{
    db::{FileRecordStore, PgRecordStore, RecordStore},
    services::{AuthService, LedgerService, QueryService, RecordService, RelationRegistry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Postgres,
}

// Configuração lida do ambiente (.env via dotenvy)
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub auth_module: String,
    pub static_token: String,
    pub require_token: bool,
    pub hash_passwords: bool,
    pub sortable_columns: Vec<String>,
    pub default_page_size: usize,
    /// Vazio ou `*` = qualquer origem
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("./data"),
            store_backend: StoreBackend::File,
            database_url: None,
            auth_module: "user_default".to_string(),
            static_token: "dev-token".to_string(),
            require_token: false,
            hash_passwords: true,
            sortable_columns: ["createdAt", "updatedAt", "name", "value1", "group", "status"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            default_page_size: 10,
            cors_origins: Vec::new(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{} inválido: '{}'", name, other),
        },
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().with_context(|| format!("PORT inválida: '{}'", raw))?,
            Err(_) => defaults.port,
        };

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("postgres") => StoreBackend::Postgres,
            Ok("file") | Err(_) => StoreBackend::File,
            Ok(other) => anyhow::bail!("STORE_BACKEND deve ser 'file' ou 'postgres', recebido '{}'", other),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL deve ser definida quando STORE_BACKEND=postgres");
        }

        let default_page_size = match env::var("DEFAULT_PAGE_SIZE") {
            Ok(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .with_context(|| format!("DEFAULT_PAGE_SIZE inválido: '{}'", raw))?,
            Err(_) => defaults.default_page_size,
        };

        Ok(Self {
            port,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            store_backend,
            database_url,
            auth_module: env::var("AUTH_MODULE").unwrap_or(defaults.auth_module),
            static_token: env::var("STATIC_TOKEN").unwrap_or(defaults.static_token),
            require_token: env_flag("REQUIRE_TOKEN", defaults.require_token)?,
            hash_passwords: env_flag("HASH_PASSWORDS", defaults.hash_passwords)?,
            sortable_columns: env::var("SORTABLE_COLUMNS")
                .map(|raw| crate::models::query::split_list(Some(raw.as_str())))
                .unwrap_or(defaults.sortable_columns),
            default_page_size,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| crate::models::query::split_list(Some(raw.as_str())))
                .unwrap_or(defaults.cors_origins),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub query_service: QueryService,
    pub record_service: RecordService,
    pub auth_service: AuthService,
    pub ledger_service: LedgerService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match config.store_backend {
            StoreBackend::File => Arc::new(
                FileRecordStore::new(config.data_dir.clone())
                    .await
                    .context("Falha ao preparar o diretório de dados")?,
            ),
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;
                Arc::new(PgRecordStore::connect(url).await?)
            }
        };

        // O módulo de usuários precisa existir para o login
        store
            .initialize_module(&config.auth_module)
            .await
            .context("Falha ao inicializar o módulo de usuários")?;

        Ok(Self::with_store(config, store))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let query_service = QueryService::new(store.clone(), RelationRegistry::with_defaults());
        let record_service =
            RecordService::new(store.clone(), &config.auth_module, config.hash_passwords);
        let auth_service = AuthService::new(store.clone(), &config.auth_module, &config.static_token);
        let ledger_service = LedgerService::new(store);

        Self {
            config: Arc::new(config),
            query_service,
            record_service,
            auth_service,
            ledger_service,
        }
    }
}
