// src/models/ledger.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Credit,
    Debit,
}

// Uma linha de detalhe do depósito/angpao já classificada
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub kind: Option<EntryKind>,
    pub amount: Decimal,
}

// Os rótulos são os mesmos que o painel grava em `status` do depósito
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum DepositStatus {
    #[serde(rename = "Belum Lunas")]
    Unsettled,
    #[serde(rename = "Deposit Dipinjam")]
    Borrowed,
    #[serde(rename = "Lunas")]
    Settled,
    #[serde(rename = "Saldo Melebihi jumlah Deposit")]
    ExceedsDeposit,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    #[schema(value_type = f64)]
    pub opening_balance: Decimal,
    #[schema(value_type = f64)]
    pub total_credit: Decimal,
    #[schema(value_type = f64)]
    pub total_debit: Decimal,
    #[schema(value_type = f64)]
    pub final_balance: Decimal,
    pub status: DepositStatus,
    pub entries: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub module: String,
    pub id: String,
    pub data: BalanceSummary,
}
