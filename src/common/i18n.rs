// src/common/i18n.rs

use std::fmt;

// Idiomas suportados pelas mensagens da API. O painel é usado em Indonésio,
// então `Id` é o padrão quando o cliente não manda Accept-Language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Id,
    En,
}

impl Lang {
    // "en" -> En, "id"/"in" ou qualquer outro -> Id
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "en" => Lang::En,
            _ => Lang::Id,
        }
    }
}

// Mensagens de sucesso devolvidas junto com o registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Created,
    Updated,
    Deleted,
    EndpointNotFound,
}

impl Message {
    pub fn text(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Message::Created, Lang::Id) => "Item berhasil dibuat",
            (Message::Created, Lang::En) => "Item created successfully",
            (Message::Updated, Lang::Id) => "Item berhasil diperbarui",
            (Message::Updated, Lang::En) => "Item updated successfully",
            (Message::Deleted, Lang::Id) => "Item berhasil dihapus",
            (Message::Deleted, Lang::En) => "Item deleted successfully",
            (Message::EndpointNotFound, Lang::Id) => "Endpoint tidak ditemukan",
            (Message::EndpointNotFound, Lang::En) => "Endpoint not found",
        }
    }
}

// O que exatamente estava errado na requisição (vira HTTP 400)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyBody,
    MalformedBody(String),
    /// Path ou query string que o axum não conseguiu extrair
    InvalidParameters(String),
    InvalidModuleName(String),
    CredentialsRequired,
    BlankField(String),
}

impl ValidationIssue {
    pub fn text(&self, lang: Lang) -> String {
        match (self, lang) {
            (ValidationIssue::EmptyBody, Lang::Id) => "Body tidak boleh kosong".to_string(),
            (ValidationIssue::EmptyBody, Lang::En) => "Request body must not be empty".to_string(),
            (ValidationIssue::MalformedBody(detail), Lang::Id) => {
                format!("Body tidak valid: {}", detail)
            }
            (ValidationIssue::MalformedBody(detail), Lang::En) => {
                format!("Invalid request body: {}", detail)
            }
            (ValidationIssue::InvalidParameters(detail), Lang::Id) => {
                format!("Parameter tidak valid: {}", detail)
            }
            (ValidationIssue::InvalidParameters(detail), Lang::En) => {
                format!("Invalid request parameters: {}", detail)
            }
            (ValidationIssue::InvalidModuleName(name), Lang::Id) => {
                format!("Nama modul tidak valid: '{}'", name)
            }
            (ValidationIssue::InvalidModuleName(name), Lang::En) => {
                format!("Invalid module name: '{}'", name)
            }
            (ValidationIssue::CredentialsRequired, Lang::Id) => {
                "username dan password wajib diisi".to_string()
            }
            (ValidationIssue::CredentialsRequired, Lang::En) => {
                "username and password required".to_string()
            }
            (ValidationIssue::BlankField(field), Lang::Id) => {
                format!("Field '{}' tidak boleh kosong", field)
            }
            (ValidationIssue::BlankField(field), Lang::En) => {
                format!("Field '{}' must not be empty", field)
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text(Lang::En))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_languages_fall_back_to_indonesian() {
        assert_eq!(Lang::from_tag("EN"), Lang::En);
        assert_eq!(Lang::from_tag("id"), Lang::Id);
        assert_eq!(Lang::from_tag("pt"), Lang::Id);
    }

    #[test]
    fn blank_field_message_names_the_field() {
        let issue = ValidationIssue::BlankField("username".into());
        assert_eq!(issue.text(Lang::Id), "Field 'username' tidak boleh kosong");
        assert_eq!(issue.to_string(), "Field 'username' must not be empty");
    }
}
