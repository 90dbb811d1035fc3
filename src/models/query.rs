// src/models/query.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::record::Record;

pub const DEFAULT_PAGE: usize = 1;

// Query string crua da listagem. Tudo é String porque o frontend manda
// valores "sujos" (page=abc, limit=, status=active) e a gente não quer 400 por isso.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Texto buscado (case-insensitive, substring)
    pub search: Option<String>,
    /// Campos onde buscar, separados por vírgula
    pub searchfield: Option<String>,
    /// 1/true/active ou 0/false/inactive
    pub filter_column_status: Option<String>,
    pub filter_column_status_id: Option<String>,
    pub filter_column_group: Option<String>,
    pub filter_column_key1: Option<String>,
    /// Relações a embutir, separadas por vírgula (ex: `m_gen,m_penghuni`)
    pub include: Option<String>,
    /// `"coluna asc|desc"`
    pub sort: Option<String>,
    /// Forma usada pelo painel (`"name DESC"`); `sort` tem prioridade
    pub order_by_raw: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncludeQuery {
    pub include: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub descending: bool,
}

impl SortSpec {
    /// "name desc" -> SortSpec. A coluna precisa estar na allow-list.
    pub fn parse(raw: &str, allowed: &[String]) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let column = parts.next()?;
        let descending = parts
            .next()
            .map(|dir| dir.eq_ignore_ascii_case("desc"))
            .unwrap_or(false);

        if !allowed.iter().any(|c| c == column) {
            tracing::warn!(column, "coluna de ordenação fora da allow-list, ignorada");
            return None;
        }

        Some(Self {
            column: column.to_string(),
            descending,
        })
    }
}

/// Opções de listagem já interpretadas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub status: Option<bool>,
    pub group: Option<String>,
    pub key1: Option<String>,
    pub include: Vec<String>,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub limit: usize,
}

impl QueryOptions {
    pub fn unfiltered(default_limit: usize) -> Self {
        Self {
            search: None,
            search_fields: Vec::new(),
            status: None,
            group: None,
            key1: None,
            include: Vec::new(),
            sort: None,
            page: DEFAULT_PAGE,
            limit: default_limit.max(1),
        }
    }

    pub fn from_query(query: &ListQuery, sortable: &[String], default_limit: usize) -> Self {
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let status = query
            .filter_column_status
            .as_deref()
            .or(query.filter_column_status_id.as_deref())
            .and_then(parse_status_filter);

        Self {
            search,
            search_fields: split_list(query.searchfield.as_deref()),
            status,
            group: non_empty(query.filter_column_group.as_deref()),
            key1: non_empty(query.filter_column_key1.as_deref()),
            include: split_list(query.include.as_deref()),
            sort: query
                .sort
                .as_deref()
                .or(query.order_by_raw.as_deref())
                .and_then(|raw| SortSpec::parse(raw, sortable)),
            page: parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(query.limit.as_deref()).unwrap_or(default_limit.max(1)),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_string)
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok()).filter(|n| *n >= 1)
}

/// "1" / "true" / "active" -> true, "0" / "false" / "inactive" -> false, resto -> sem filtro
pub fn parse_status_filter(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "active" => Some(true),
        "0" | "false" | "inactive" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub data: Vec<Record>,
    pub pagination: Pagination,
}
