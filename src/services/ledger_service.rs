// src/services/ledger_service.rs

use std::{collections::HashMap, str::FromStr, sync::Arc};

use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::{
        ledger::{BalanceSummary, DepositStatus, EntryKind, LedgerEntry},
        module::ModuleName,
        record::{id_value, record_id, Record},
    },
};

const GEN_MODULE: &str = "gen";
const AMOUNT_FIELD: &str = "balance";
const LABEL_FIELD: &str = "value1";
const EMBEDDED_TYPE_FIELD: &str = "m_gen";
const TYPE_ID_FIELD: &str = "jenis_transaksi_id";

/// Classifica o rótulo do tipo de transação. Palavras de débito têm prioridade
/// ("Pinjaman Deposit" é débito).
pub fn classify_label(label: &str) -> Option<EntryKind> {
    let label = label.to_lowercase();
    let has = |word: &str| label.contains(word);

    if has("pinjaman") || has("debit") || has("tarik") || has("penarikan") {
        Some(EntryKind::Debit)
    } else if has("setoran") || has("kredit") || has("deposit") {
        Some(EntryKind::Credit)
    } else {
        None
    }
}

/// Valor numérico ou string numérica; o resto conta como zero.
pub fn parse_amount(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or_default(),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

pub fn summarize(entries: &[LedgerEntry]) -> BalanceSummary {
    let opening_balance = entries.first().map(|e| e.amount).unwrap_or_default();
    let total_of = |kind: EntryKind| -> Decimal {
        entries
            .iter()
            .filter(|e| e.kind == Some(kind))
            .map(|e| e.amount)
            .sum()
    };
    let total_credit = total_of(EntryKind::Credit);
    let total_debit = total_of(EntryKind::Debit);
    let final_balance = total_credit - total_debit;

    let status = if entries.is_empty() || final_balance.is_zero() {
        DepositStatus::Unsettled
    } else if final_balance < opening_balance {
        DepositStatus::Borrowed
    } else if final_balance == opening_balance {
        DepositStatus::Settled
    } else {
        DepositStatus::ExceedsDeposit
    };

    BalanceSummary {
        opening_balance,
        total_credit,
        total_debit,
        final_balance,
        status,
        entries: entries.len(),
    }
}

// Linhas de detalhe ficam embutidas no cabeçalho: `t_<módulo>_d` e `t_<módulo>_ds`
fn detail_rows<'a>(record: &'a Record, module: &ModuleName) -> Vec<&'a Record> {
    [format!("t_{}_d", module), format!("t_{}_ds", module)]
        .iter()
        .filter_map(|field| record.get(field).and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .collect()
}

#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn RecordStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn balance(&self, module: &ModuleName, id: &str) -> Result<BalanceSummary, AppError> {
        let record = self
            .store
            .get_by_id(module.as_str(), id)
            .await?
            .ok_or_else(|| AppError::NotFound { id: id.to_string() })?;

        let rows = detail_rows(&record, module);

        // Só carrega `gen` se alguma linha não trouxer o tipo embutido
        let needs_lookup = rows.iter().any(|row| embedded_label(row).is_none());
        let types: HashMap<String, Record> = if needs_lookup {
            self.store
                .get_all(GEN_MODULE)
                .await?
                .into_iter()
                .filter_map(|row| Some((record_id(&row)?.to_string(), row)))
                .collect()
        } else {
            HashMap::new()
        };

        let entries: Vec<LedgerEntry> = rows
            .iter()
            .map(|row| {
                let label = embedded_label(row).or_else(|| {
                    let type_id = row.get(TYPE_ID_FIELD).and_then(id_value)?;
                    types.get(&type_id)?.get(LABEL_FIELD)?.as_str()
                });
                LedgerEntry {
                    kind: label.and_then(classify_label),
                    amount: parse_amount(row.get(AMOUNT_FIELD)),
                }
            })
            .collect();

        Ok(summarize(&entries))
    }
}

fn embedded_label(row: &Record) -> Option<&str> {
    row.get(EMBEDDED_TYPE_FIELD)?.get(LABEL_FIELD)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FileRecordStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn entry(kind: Option<EntryKind>, amount: i64) -> LedgerEntry {
        LedgerEntry {
            kind,
            amount: Decimal::from(amount),
        }
    }

    #[test]
    fn debit_keywords_win() {
        assert_eq!(classify_label("Pinjaman Deposit"), Some(EntryKind::Debit));
        assert_eq!(classify_label("Penarikan"), Some(EntryKind::Debit));
        assert_eq!(classify_label("Setoran Awal"), Some(EntryKind::Credit));
        assert_eq!(classify_label("DEPOSIT"), Some(EntryKind::Credit));
        assert_eq!(classify_label("Lain-lain"), None);
    }

    #[test]
    fn amounts_parse_leniently() {
        assert_eq!(parse_amount(Some(&json!(1500000))), Decimal::from(1500000));
        assert_eq!(parse_amount(Some(&json!("250.50"))), Decimal::new(25050, 2));
        assert_eq!(parse_amount(Some(&json!("abc"))), Decimal::ZERO);
        assert_eq!(parse_amount(None), Decimal::ZERO);
    }

    #[test]
    fn status_follows_final_against_opening() {
        let credit = Some(EntryKind::Credit);
        let debit = Some(EntryKind::Debit);

        assert_eq!(summarize(&[]).status, DepositStatus::Unsettled);
        assert_eq!(summarize(&[entry(credit, 1000)]).status, DepositStatus::Settled);
        assert_eq!(
            summarize(&[entry(credit, 1000), entry(debit, 300)]).status,
            DepositStatus::Borrowed
        );
        assert_eq!(
            summarize(&[entry(credit, 1000), entry(credit, 500)]).status,
            DepositStatus::ExceedsDeposit
        );
        assert_eq!(
            summarize(&[entry(credit, 1000), entry(debit, 1000)]).status,
            DepositStatus::Unsettled
        );

        let summary = summarize(&[entry(credit, 1000), entry(debit, 300), entry(None, 99)]);
        assert_eq!(summary.final_balance, Decimal::from(700));
        assert_eq!(summary.opening_balance, Decimal::from(1000));
        assert_eq!(summary.entries, 3);
    }

    #[tokio::test]
    async fn balance_resolves_labels_from_gen() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileRecordStore::new(dir.path()).await.unwrap());

        let setoran = store
            .create("gen", json!({ "value1": "Setoran Deposit" }).as_object().unwrap().clone())
            .await
            .unwrap();
        let deposit = store
            .create(
                "deposit",
                json!({
                    "m_penghuni_id": "p1",
                    "t_deposit_d": [
                        { "jenis_transaksi_id": record_id(&setoran).unwrap(), "balance": 5000000 }
                    ],
                    "t_deposit_ds": [
                        { "m_gen": { "value1": "Pinjaman Deposit" }, "balance": "1000000" }
                    ]
                })
                .as_object()
                .unwrap()
                .clone(),
            )
            .await
            .unwrap();

        let service = LedgerService::new(store);
        let module = ModuleName::from_path("t_deposit").unwrap();
        let summary = service.balance(&module, record_id(&deposit).unwrap()).await.unwrap();

        assert_eq!(summary.total_credit, Decimal::from(5000000));
        assert_eq!(summary.total_debit, Decimal::from(1000000));
        assert_eq!(summary.status, DepositStatus::Borrowed);
    }
}
