// src/models/envelope.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    module::ModuleName,
    query::{Page, Pagination},
    record::Record,
};

// Envelopes de resposta que o painel espera (`status: "success"` + dados)

#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "gen")]
    pub module: String,
    pub total: usize,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Record>,
    pub pagination: Pagination,
}

impl ListResponse {
    pub fn new(module: &ModuleName, page: Page) -> Self {
        Self {
            status: "success",
            module: module.to_string(),
            total: page.pagination.total,
            data: page.data,
            pagination: page.pagination,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Item berhasil dibuat")]
    pub message: Option<&'static str>,
    #[schema(value_type = Object)]
    pub data: Record,
}

impl RecordResponse {
    pub fn new(module: &ModuleName, data: Record) -> Self {
        Self {
            status: "success",
            module: module.to_string(),
            message: None,
            data,
        }
    }

    pub fn with_message(module: &ModuleName, message: &'static str, data: Record) -> Self {
        Self {
            message: Some(message),
            ..Self::new(module, data)
        }
    }
}

// Listas públicas da landing page (sem paginação)
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicListResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Record>,
}

impl PublicListResponse {
    pub fn new(data: Vec<Record>) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}
