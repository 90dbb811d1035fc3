// src/models/module.rs

use std::fmt;

use crate::common::{error::AppError, i18n::ValidationIssue};

const WITH_DETAILS_SEGMENT: &str = "with-details";

/// Nome canônico de um módulo (coleção). `m_gen`, `M_GEN` e
/// `m_gen/with-details` resolvem todos para `gen`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Resolve um caminho dinâmico (`m_gen`, `t_angpao/with-details`) para o módulo.
    pub fn from_path(path: &str) -> Result<Self, AppError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let last = match segments.as_slice() {
            [] => return Err(ValidationIssue::InvalidModuleName(path.to_string()).into()),
            [.., previous, last] if *last == WITH_DETAILS_SEGMENT => *previous,
            [.., last] => *last,
        };

        let lowered = last.to_ascii_lowercase();
        let stripped = lowered
            .strip_prefix("m_")
            .or_else(|| lowered.strip_prefix("t_"))
            .unwrap_or(&lowered);

        Self::checked(stripped, path)
    }

    /// Nome usado como está (rotas legadas `/api/{module}`), sem remover prefixo.
    pub fn verbatim(name: &str) -> Result<Self, AppError> {
        Self::checked(&name.to_ascii_lowercase(), name)
    }

    // O nome vira nome de arquivo: só [a-z0-9_-]
    fn checked(name: &str, original: &str) -> Result<Self, AppError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !valid {
            return Err(ValidationIssue::InvalidModuleName(original.to_string()).into());
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> String {
        ModuleName::from_path(path).unwrap().to_string()
    }

    #[test]
    fn strips_prefixes_and_with_details() {
        assert_eq!(resolve("m_gen"), "gen");
        assert_eq!(resolve("t_angpao"), "angpao");
        assert_eq!(resolve("berita"), "berita");
        assert_eq!(resolve("m_role/with-details"), "role");
        assert_eq!(resolve("dynamic/t_angpao/with-details"), "angpao");
        assert_eq!(resolve("M_Gen"), "gen");
        assert_eq!(resolve("user_default"), "user_default");
    }

    #[test]
    fn only_one_prefix_is_removed() {
        assert_eq!(resolve("m_t_deposit"), "t_deposit");
    }

    #[test]
    fn lone_with_details_is_its_own_name() {
        assert_eq!(resolve("with-details"), "with-details");
    }

    #[test]
    fn rejects_unsafe_names() {
        assert!(ModuleName::from_path("..").is_err());
        assert!(ModuleName::from_path("").is_err());
        assert!(ModuleName::from_path("m_").is_err());
        assert!(ModuleName::verbatim("a.b").is_err());
    }

    #[test]
    fn verbatim_keeps_prefix() {
        assert_eq!(ModuleName::verbatim("m_gen").unwrap().as_str(), "m_gen");
    }
}
