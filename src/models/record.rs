// src/models/record.rs

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

// Um registro não tem schema: é só um objeto JSON com id e timestamps.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";
pub const STATUS_FIELD: &str = "status";

// Campos que só o store escreve
fn is_managed_field(key: &str) -> bool {
    matches!(key, ID_FIELD | CREATED_AT_FIELD | UPDATED_AT_FIELD)
}

pub fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Próximo `updatedAt`, sempre estritamente maior que o anterior
/// (mesmo se duas atualizações caírem no mesmo milissegundo).
pub fn next_timestamp(previous: Option<&str>) -> String {
    let now = Utc::now().trunc_subsecs(3);
    let previous = previous
        .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
        .map(|p| p.with_timezone(&Utc));

    match previous {
        Some(prev) if now <= prev => format_timestamp(prev + Duration::milliseconds(1)),
        _ => format_timestamp(now),
    }
}

/// Monta um registro novo: id gerado + payload + createdAt/updatedAt.
/// `id`, `createdAt` e `updatedAt` vindos do cliente são descartados.
pub fn new_record(payload: Record) -> Record {
    let now = format_timestamp(Utc::now());
    let mut record = Record::new();
    record.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
    for (key, value) in payload {
        if !is_managed_field(&key) {
            record.insert(key, value);
        }
    }
    record.insert(CREATED_AT_FIELD.to_string(), Value::String(now.clone()));
    record.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));
    record
}

/// Merge raso do payload sobre o registro existente.
pub fn merge_update(existing: &Record, payload: Record) -> Record {
    let mut merged = existing.clone();
    for (key, value) in payload {
        if !is_managed_field(&key) {
            merged.insert(key, value);
        }
    }
    let previous = existing.get(UPDATED_AT_FIELD).and_then(Value::as_str);
    merged.insert(
        UPDATED_AT_FIELD.to_string(),
        Value::String(next_timestamp(previous)),
    );
    merged
}

/// Coerção do campo `status`: `true`, `1`, `"true"` (qualquer caixa) ou `"1"`.
pub fn is_active_status(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true") || s == "1",
        _ => false,
    }
}

/// Texto de um valor escalar (string, número, booleano). Objetos e arrays não contam.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Valor de chave estrangeira utilizável como id (string não vazia ou número)
pub fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
