// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::{Lang, ValidationIssue};
use crate::middleware::i18n::Locale;

// Erro interno da aplicação. Cada camada (store, serviços) devolve `AppError`;
// só o handler decide o idioma e converte em `ApiError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação: {0}")]
    ValidationError(ValidationIssue),

    #[error("Item com ID {id} não encontrado")]
    NotFound { id: String },

    #[error("Usuário não encontrado")]
    InvalidCredentials,

    #[error("Senha incorreta")]
    InvalidPassword,

    #[error("Conta inativa")]
    InactiveAccount,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de armazenamento: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<ValidationIssue> for AppError {
    fn from(issue: ValidationIssue) -> Self {
        AppError::ValidationError(issue)
    }
}

// O erro que vai para o cliente: `{status: "error", message, errorCode?}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error_code: Option<&'static str>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials
            | AppError::InvalidPassword
            | AppError::InactiveAccount
            | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Código estável que o frontend usa para escolher a mensagem do login
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            AppError::InvalidCredentials => Some("INVALID_USERNAME"),
            AppError::InvalidPassword => Some("INVALID_PASSWORD"),
            AppError::InactiveAccount => Some("INACTIVE_ACCOUNT"),
            AppError::InvalidToken => Some("INVALID_TOKEN"),
            _ => None,
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let lang = locale.lang();
        let message = match (self, lang) {
            (AppError::ValidationError(issue), _) => issue.text(lang),
            (AppError::NotFound { id }, Lang::Id) => format!("Item dengan ID {} tidak ditemukan", id),
            (AppError::NotFound { id }, Lang::En) => format!("Item with ID {} not found", id),
            (AppError::InvalidCredentials, _) => "Invalid credentials".to_string(),
            (AppError::InvalidPassword, Lang::Id) => "Password salah".to_string(),
            (AppError::InvalidPassword, Lang::En) => "Wrong password".to_string(),
            (AppError::InactiveAccount, Lang::Id) => {
                "Akun Anda nonaktif, hubungi administrator".to_string()
            }
            (AppError::InactiveAccount, Lang::En) => {
                "Your account is inactive, contact an administrator".to_string()
            }
            (AppError::InvalidToken, Lang::Id) => "Token tidak valid atau tidak ada".to_string(),
            (AppError::InvalidToken, Lang::En) => "Missing or invalid token".to_string(),

            // Storage, Database, Bcrypt, Internal: o detalhe fica no log, não na resposta.
            (e, lang) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                match lang {
                    Lang::Id => "Terjadi kesalahan pada server".to_string(),
                    Lang::En => "An unexpected error occurred".to_string(),
                }
            }
        };

        ApiError {
            status: self.status_code(),
            message,
            error_code: self.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.error_code {
            Some(code) => json!({ "status": "error", "message": self.message, "errorCode": code }),
            None => json!({ "status": "error", "message": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
