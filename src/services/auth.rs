// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use serde_json::Value;
use validator::Validate;

use crate::{
    common::{error::AppError, i18n::ValidationIssue},
    db::RecordStore,
    models::{
        auth::{LoginResponse, UserAccountFields},
        record::{is_active_status, Record, STATUS_FIELD},
    },
};

const USERNAME_FIELD: &str = "username";
const PASSWORD_FIELD: &str = "password";

// Login contra o módulo de usuários do próprio store. O token é um
// placeholder fixo: o cliente só verifica que ele existe.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn RecordStore>,
    user_module: String,
    token: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn RecordStore>, user_module: &str, token: &str) -> Self {
        Self {
            store,
            user_module: user_module.to_string(),
            token: token.to_string(),
        }
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<LoginResponse, AppError> {
        let users = self.store.get_all(&self.user_module).await?;
        let mut user = users
            .into_iter()
            .find(|u| u.get(USERNAME_FIELD).and_then(Value::as_str) == Some(username))
            .ok_or(AppError::InvalidCredentials)?;

        let stored = user
            .get(PASSWORD_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if !verify_password(password, &stored).await? {
            return Err(AppError::InvalidPassword);
        }

        if !is_active_status(user.get(STATUS_FIELD)) {
            return Err(AppError::InactiveAccount);
        }

        user.remove(PASSWORD_FIELD);
        tracing::info!(username, "🔑 login efetuado");

        Ok(LoginResponse {
            status: "success",
            token: self.token.clone(),
            user,
        })
    }
}

/// Regras do módulo de usuários: `name`/`username` enviados não podem estar em branco.
pub fn check_user_fields(payload: &Record) -> Result<(), AppError> {
    let fields: UserAccountFields = serde_json::from_value(Value::Object(payload.clone()))
        .map_err(|e| ValidationIssue::MalformedBody(e.to_string()))?;

    fields.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::from(ValidationIssue::BlankField(field))
    })
}

pub fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60 && value.starts_with("$2")
}

/// Troca a senha em texto puro do payload pelo hash bcrypt.
/// Um valor que já é hash é mantido como está.
pub async fn hash_password_field(payload: &mut Record) -> Result<(), AppError> {
    let Some(Value::String(plain)) = payload.get(PASSWORD_FIELD) else {
        return Ok(());
    };
    if is_bcrypt_hash(plain) {
        return Ok(());
    }

    let plain = plain.clone();
    // bcrypt é CPU-bound: roda fora do executor
    let hashed = tokio::task::spawn_blocking(move || hash(&plain, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

    payload.insert(PASSWORD_FIELD.to_string(), Value::String(hashed));
    Ok(())
}

// Hash bcrypt é verificado com bcrypt; qualquer outro valor armazenado é
// senha legada em texto puro e é comparado diretamente.
async fn verify_password(candidate: &str, stored: &str) -> Result<bool, AppError> {
    if !is_bcrypt_hash(stored) {
        return Ok(!stored.is_empty() && candidate == stored);
    }

    let candidate = candidate.to_owned();
    let stored = stored.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&candidate, &stored))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FileRecordStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn obj(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn service_with_users(users: &[Value]) -> (TempDir, AuthService) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileRecordStore::new(dir.path()).await.unwrap());
        for user in users {
            store.create("user_default", obj(user.clone())).await.unwrap();
        }
        (dir, AuthService::new(store, "user_default", "dev-token"))
    }

    #[tokio::test]
    async fn login_strips_password_and_returns_token() {
        let (_dir, auth) = service_with_users(&[json!({
            "username": "admin", "password": "rahasia", "status": true, "name": "Admin"
        })])
        .await;

        let response = auth.login_user("admin", "rahasia").await.unwrap();
        assert_eq!(response.token, "dev-token");
        assert_eq!(response.user["name"], json!("Admin"));
        assert!(!response.user.contains_key("password"));
    }

    #[tokio::test]
    async fn login_failures_are_distinguished() {
        let (_dir, auth) = service_with_users(&[
            json!({ "username": "aktif", "password": "pw", "status": "true" }),
            json!({ "username": "nonaktif", "password": "pw", "status": false }),
        ])
        .await;

        assert!(matches!(auth.login_user("siapa", "pw").await, Err(AppError::InvalidCredentials)));
        assert!(matches!(auth.login_user("aktif", "salah").await, Err(AppError::InvalidPassword)));
        assert!(matches!(auth.login_user("nonaktif", "pw").await, Err(AppError::InactiveAccount)));
        assert!(auth.login_user("aktif", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn hashed_passwords_verify() {
        let mut payload = obj(json!({ "username": "budi", "password": "rahasia", "status": 1 }));
        hash_password_field(&mut payload).await.unwrap();
        let stored = payload["password"].as_str().unwrap().to_string();
        assert!(is_bcrypt_hash(&stored));

        // hash existente não é re-hasheado
        hash_password_field(&mut payload).await.unwrap();
        assert_eq!(payload["password"].as_str().unwrap(), stored);

        let (_dir, auth) = service_with_users(&[Value::Object(payload)]).await;
        assert!(auth.login_user("budi", "rahasia").await.is_ok());
        assert!(matches!(auth.login_user("budi", "salah").await, Err(AppError::InvalidPassword)));
    }

    #[test]
    fn blank_user_fields_are_rejected() {
        assert!(check_user_fields(&obj(json!({ "name": "Budi" }))).is_ok());
        assert!(check_user_fields(&obj(json!({ "other": 1 }))).is_ok());

        let err = check_user_fields(&obj(json!({ "username": "   " }))).unwrap_err();
        assert!(matches!(
            err,
            AppError::ValidationError(ValidationIssue::BlankField(ref f)) if f == "username"
        ));
    }
}
