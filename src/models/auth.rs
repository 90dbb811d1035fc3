// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::record::Record;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "admin")]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "admin123")]
    pub password: String,
}

// Resposta do login: token fixo + usuário sem a senha
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "dev-token")]
    pub token: String,
    #[schema(value_type = Object)]
    pub user: Record,
}

// Campos do módulo de usuários que não podem ficar em branco quando enviados
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserAccountFields {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "not_blank"))]
    pub username: Option<String>,
}
