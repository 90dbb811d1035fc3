// src/db/record_store.rs

use async_trait::async_trait;

use crate::{common::error::AppError, models::record::Record};

/// Persistência de módulos schema-less. Implementado por arquivo JSON
/// (`FileRecordStore`) e por Postgres JSONB (`PgRecordStore`).
///
/// `Ok(None)` em `get_by_id`/`update`/`delete` significa "id não existe";
/// quem chama decide se isso vira 404.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Todos os registros do módulo, em ordem de inserção. Módulo desconhecido = vazio.
    async fn get_all(&self, module: &str) -> Result<Vec<Record>, AppError>;

    async fn get_by_id(&self, module: &str, id: &str) -> Result<Option<Record>, AppError>;

    /// Gera id + createdAt/updatedAt, grava e devolve o registro novo.
    async fn create(&self, module: &str, payload: Record) -> Result<Record, AppError>;

    /// Merge raso; `id` e `createdAt` nunca mudam, `updatedAt` sempre avança.
    async fn update(
        &self,
        module: &str,
        id: &str,
        payload: Record,
    ) -> Result<Option<Record>, AppError>;

    /// Remove e devolve o registro removido.
    async fn delete(&self, module: &str, id: &str) -> Result<Option<Record>, AppError>;

    /// Garante que o módulo existe (vazio) no armazenamento.
    async fn initialize_module(&self, module: &str) -> Result<(), AppError>;
}
