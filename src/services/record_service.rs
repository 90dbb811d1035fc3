// src/services/record_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::{module::ModuleName, record::Record},
    services::auth::{check_user_fields, hash_password_field},
};

// Escrita genérica (create/update/delete) com as regras do módulo de usuários.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    user_module: String,
    hash_passwords: bool,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, user_module: &str, hash_passwords: bool) -> Self {
        Self {
            store,
            user_module: user_module.to_string(),
            hash_passwords,
        }
    }

    async fn prepare(&self, module: &ModuleName, mut payload: Record) -> Result<Record, AppError> {
        if module.as_str() == self.user_module {
            check_user_fields(&payload)?;
            if self.hash_passwords {
                hash_password_field(&mut payload).await?;
            }
        }
        Ok(payload)
    }

    pub async fn create(&self, module: &ModuleName, payload: Record) -> Result<Record, AppError> {
        let payload = self.prepare(module, payload).await?;
        self.store.create(module.as_str(), payload).await
    }

    pub async fn update(
        &self,
        module: &ModuleName,
        id: &str,
        payload: Record,
    ) -> Result<Record, AppError> {
        let payload = self.prepare(module, payload).await?;
        self.store
            .update(module.as_str(), id, payload)
            .await?
            .ok_or_else(|| AppError::NotFound { id: id.to_string() })
    }

    pub async fn delete(&self, module: &ModuleName, id: &str) -> Result<Record, AppError> {
        self.store
            .delete(module.as_str(), id)
            .await?
            .ok_or_else(|| AppError::NotFound { id: id.to_string() })
    }
}
