// src/db/pg_store.rs

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::record::{merge_update, new_record, record_id, Record},
};

// Backend de "banco de documentos": todos os módulos na tabela
// `dynamic_records`, o registro inteiro em `data` (JSONB).
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conecta e roda as migrações embutidas (`migrations/`).
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!().run(&pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Self::new(pool))
    }
}

fn into_record(Json(value): Json<Value>) -> Option<Record> {
    match value {
        Value::Object(record) => Some(record),
        _ => None,
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get_all(&self, module: &str) -> Result<Vec<Record>, AppError> {
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT data FROM dynamic_records WHERE module = $1 ORDER BY seq ASC",
        )
        .bind(module)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(into_record).collect())
    }

    async fn get_by_id(&self, module: &str, id: &str) -> Result<Option<Record>, AppError> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT data FROM dynamic_records WHERE module = $1 AND id = $2",
        )
        .bind(module)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(into_record))
    }

    async fn create(&self, module: &str, payload: Record) -> Result<Record, AppError> {
        let record = new_record(payload);
        let id = record_id(&record).unwrap_or_default().to_string();

        sqlx::query("INSERT INTO dynamic_records (module, id, data) VALUES ($1, $2, $3)")
            .bind(module)
            .bind(&id)
            .bind(Json(Value::Object(record.clone())))
            .execute(&self.pool)
            .await?;

        Ok(record)
    }

    async fn update(
        &self,
        module: &str,
        id: &str,
        payload: Record,
    ) -> Result<Option<Record>, AppError> {
        // FOR UPDATE serializa atualizações concorrentes do mesmo registro
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT data FROM dynamic_records WHERE module = $1 AND id = $2 FOR UPDATE",
        )
        .bind(module)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .and_then(into_record);

        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = merge_update(&existing, payload);
        sqlx::query("UPDATE dynamic_records SET data = $3 WHERE module = $1 AND id = $2")
            .bind(module)
            .bind(id)
            .bind(Json(Value::Object(merged.clone())))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(merged))
    }

    async fn delete(&self, module: &str, id: &str) -> Result<Option<Record>, AppError> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            "DELETE FROM dynamic_records WHERE module = $1 AND id = $2 RETURNING data",
        )
        .bind(module)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(into_record))
    }

    // A tabela é compartilhada; não existe nada a criar por módulo.
    async fn initialize_module(&self, _module: &str) -> Result<(), AppError> {
        Ok(())
    }
}
