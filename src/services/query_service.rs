// src/services/query_service.rs

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::{
        module::ModuleName,
        query::{Page, Pagination, QueryOptions, SortSpec},
        record::{id_value, is_active_status, record_id, scalar_text, Record, STATUS_FIELD},
    },
    services::relations::{Relation, RelationRegistry},
};

const GROUP_FIELD: &str = "group";
const KEY1_FIELD: &str = "key1";

// Camada de leitura: filtra, ordena, pagina e embute relações.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn RecordStore>,
    relations: Arc<RelationRegistry>,
}

impl QueryService {
    pub fn new(store: Arc<dyn RecordStore>, relations: RelationRegistry) -> Self {
        Self {
            store,
            relations: Arc::new(relations),
        }
    }

    pub async fn list(&self, module: &ModuleName, options: &QueryOptions) -> Result<Page, AppError> {
        let items = self.store.get_all(module.as_str()).await?;

        let mut filtered: Vec<Record> = items.into_iter().filter(|r| matches(r, options)).collect();
        if let Some(sort) = &options.sort {
            sort_records(&mut filtered, sort);
        }

        let total = filtered.len();
        tracing::debug!(module = %module, total, "listagem filtrada");

        let slice: Vec<Record> = filtered
            .into_iter()
            .skip(options.offset())
            .take(options.limit)
            .collect();
        let data = self.enrich(module, slice, &options.include).await;

        Ok(Page {
            data,
            pagination: Pagination::new(options.page, options.limit, total),
        })
    }

    /// Lista completa (sem filtro nem paginação), usada pelas rotas públicas.
    pub async fn all(&self, module: &ModuleName, includes: &[String]) -> Result<Vec<Record>, AppError> {
        let items = self.store.get_all(module.as_str()).await?;
        Ok(self.enrich(module, items, includes).await)
    }

    pub async fn get(
        &self,
        module: &ModuleName,
        id: &str,
        includes: &[String],
    ) -> Result<Record, AppError> {
        let record = self
            .store
            .get_by_id(module.as_str(), id)
            .await?
            .ok_or_else(|| AppError::NotFound { id: id.to_string() })?;

        let mut enriched = self.enrich(module, vec![record], includes).await;
        enriched
            .pop()
            .ok_or_else(|| AppError::NotFound { id: id.to_string() })
    }

    /// Embute os registros relacionados. Cada módulo alvo é lido uma vez;
    /// relação que não resolve simplesmente não aparece no registro.
    pub async fn enrich(
        &self,
        module: &ModuleName,
        records: Vec<Record>,
        includes: &[String],
    ) -> Vec<Record> {
        let relations = self.relations.resolve(includes);
        if relations.is_empty() || records.is_empty() {
            return records;
        }
        tracing::debug!(module = %module, relations = relations.len(), "embutindo relações");

        let mut targets: HashMap<&str, HashMap<String, Record>> = HashMap::new();
        for relation in &relations {
            let target = relation.target_module.as_str();
            if targets.contains_key(target) {
                continue;
            }
            let rows = match self.store.get_all(target).await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(related = target, "falha ao carregar módulo relacionado: {}", e);
                    Vec::new()
                }
            };
            let index = rows
                .into_iter()
                .filter_map(|row| {
                    let id = record_id(&row)?.to_string();
                    Some((id, row))
                })
                .collect();
            targets.insert(target, index);
        }

        records
            .into_iter()
            .map(|record| embed_relations(record, &relations, &targets))
            .collect()
    }
}

// As chaves estrangeiras são lidas do registro original: um campo embutido
// (ex: `kategori`) não pode esconder a chave de outra relação.
fn embed_relations(
    mut record: Record,
    relations: &[&Relation],
    targets: &HashMap<&str, HashMap<String, Record>>,
) -> Record {
    let embeds: Vec<(String, Record)> = relations
        .iter()
        .filter_map(|relation| {
            let index = targets.get(relation.target_module.as_str())?;
            let related = relation
                .foreign_keys
                .iter()
                .filter_map(|key| record.get(key).and_then(id_value))
                .find_map(|id| index.get(&id).cloned())?;
            Some((relation.embed_as.clone(), related))
        })
        .collect();

    for (field, related) in embeds {
        record.insert(field, Value::Object(related));
    }
    record
}

/// Todos os filtros combinados com AND; a ordem de aplicação não importa.
pub fn matches(record: &Record, options: &QueryOptions) -> bool {
    matches_search(record, options.search.as_deref(), &options.search_fields)
        && options
            .status
            .is_none_or(|wanted| is_active_status(record.get(STATUS_FIELD)) == wanted)
        && matches_exact(record, GROUP_FIELD, options.group.as_deref())
        && matches_exact(record, KEY1_FIELD, options.key1.as_deref())
}

// `term` já vem em minúsculas
fn matches_search(record: &Record, term: Option<&str>, fields: &[String]) -> bool {
    let Some(term) = term else {
        return true;
    };
    let hit = |value: &Value| {
        scalar_text(value).is_some_and(|text| text.to_lowercase().contains(term))
    };

    if fields.is_empty() {
        record.values().any(hit)
    } else {
        fields.iter().filter_map(|f| record.get(f)).any(hit)
    }
}

fn matches_exact(record: &Record, field: &str, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => record.get(field).and_then(Value::as_str) == Some(wanted),
    }
}

// Ordena por uma coluna: ausentes/null primeiro, depois bool, número, texto.
pub fn sort_records(records: &mut [Record], sort: &SortSpec) {
    records.sort_by(|a, b| {
        let ordering = compare_values(a.get(&sort.column), b.get(&sort.column));
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.to_lowercase().cmp(&y.to_lowercase()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FileRecordStore;
    use crate::models::query::ListQuery;
    use serde_json::json;
    use tempfile::TempDir;

    fn obj(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn options(pairs: &[(&str, &str)]) -> QueryOptions {
        let map: serde_json::Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        let query: ListQuery = serde_json::from_value(Value::Object(map)).unwrap();
        QueryOptions::from_query(&query, &["value1".to_string(), "order".to_string()], 10)
    }

    fn sample() -> Vec<Record> {
        vec![
            obj(json!({ "id": "1", "group": "agama", "value1": "Kristen", "status": true })),
            obj(json!({ "id": "2", "group": "agama", "value1": "Katolik", "status": "false" })),
            obj(json!({ "id": "3", "group": "jabatan", "value1": "Ketua", "status": 1, "key1": "K" })),
            obj(json!({ "id": "4", "group": "agama", "value1": "Islam", "note": { "nested": "kristen" } })),
        ]
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(record_id).collect()
    }

    fn apply(opts: &QueryOptions) -> Vec<Record> {
        sample().into_iter().filter(|r| matches(r, opts)).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring_on_scalars() {
        assert_eq!(ids(&apply(&options(&[("search", "KRIS")]))), vec!["1"]);
        // restringe a campos
        assert!(apply(&options(&[("search", "agama"), ("searchfield", "value1")])).is_empty());
        assert_eq!(apply(&options(&[("search", "agama"), ("searchfield", "group,value1")])).len(), 3);
    }

    #[test]
    fn status_group_and_key1_filters() {
        assert_eq!(ids(&apply(&options(&[("filter_column_status", "true")]))), vec!["1", "3"]);
        assert_eq!(ids(&apply(&options(&[("filter_column_status", "inactive")]))), vec!["2", "4"]);
        assert_eq!(ids(&apply(&options(&[("filter_column_group", "agama")]))), vec!["1", "2", "4"]);
        assert_eq!(ids(&apply(&options(&[("filter_column_key1", "K")]))), vec!["3"]);
    }

    #[test]
    fn filters_commute() {
        let both = options(&[("search", "k"), ("filter_column_status", "1")]);
        let search_then_status: Vec<Record> = apply(&options(&[("search", "k")]))
            .into_iter()
            .filter(|r| matches(r, &options(&[("filter_column_status", "1")])))
            .collect();
        let status_then_search: Vec<Record> = apply(&options(&[("filter_column_status", "1")]))
            .into_iter()
            .filter(|r| matches(r, &options(&[("search", "k")])))
            .collect();

        assert_eq!(ids(&search_then_status), ids(&status_then_search));
        assert_eq!(ids(&search_then_status), ids(&apply(&both)));
    }

    #[test]
    fn sorting_by_allowed_column() {
        let mut records = sample();
        sort_records(&mut records, &SortSpec { column: "value1".into(), descending: false });
        assert_eq!(ids(&records), vec!["4", "2", "3", "1"]);

        sort_records(&mut records, &SortSpec { column: "value1".into(), descending: true });
        assert_eq!(ids(&records), vec!["1", "3", "2", "4"]);
    }

    async fn service_with(records: &[(&str, Value)]) -> (TempDir, QueryService, Arc<FileRecordStore>) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileRecordStore::new(dir.path()).await.unwrap());
        for (module, payload) in records {
            store.create(module, obj(payload.clone())).await.unwrap();
        }
        let service = QueryService::new(store.clone(), RelationRegistry::with_defaults());
        (dir, service, store)
    }

    #[tokio::test]
    async fn pagination_reports_filtered_total() {
        let rows: Vec<(&str, Value)> = (0..23).map(|n| ("gen", json!({ "n": n, "group": "x" }))).collect();
        let (_dir, service, _) = service_with(&rows).await;
        let module = ModuleName::from_path("m_gen").unwrap();

        let page = service
            .list(&module, &options(&[("page", "3"), ("limit", "10")]))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.pagination.total, 23);
        assert_eq!(page.pagination.total_pages, 3);

        let beyond = service
            .list(&module, &options(&[("page", "9"), ("limit", "10")]))
            .await
            .unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.pagination.total, 23);
    }

    #[tokio::test]
    async fn include_embeds_related_records() {
        let (_dir, service, store) = service_with(&[]).await;
        let jabatan = store.create("gen", obj(json!({ "group": "jabatan", "value1": "Ketua" }))).await.unwrap();
        let penghuni = store.create("penghuni", obj(json!({ "name": "Oma Lina" }))).await.unwrap();
        store
            .create(
                "pengurus",
                obj(json!({
                    "name": "Budi",
                    "jabatan_id": record_id(&jabatan).unwrap(),
                    "divisi_id": "missing",
                    "m_penghuni_id": record_id(&penghuni).unwrap(),
                })),
            )
            .await
            .unwrap();

        let module = ModuleName::from_path("pengurus").unwrap();
        let page = service
            .list(&module, &options(&[("include", "m_gen,m_penghuni,unknown")]))
            .await
            .unwrap();
        let row = &page.data[0];

        assert_eq!(row["jabatan"]["value1"], json!("Ketua"));
        assert_eq!(row["m_penghuni"]["name"], json!("Oma Lina"));
        assert!(!row.contains_key("divisi"));
        assert!(!row.contains_key("unknown"));
    }

    #[tokio::test]
    async fn fallback_chain_embeds_first_resolvable_key() {
        let (_dir, service, store) = service_with(&[]).await;
        let jenis = store.create("gen", obj(json!({ "value1": "Setoran Deposit" }))).await.unwrap();
        let detail = store
            .create(
                "deposit_d",
                obj(json!({ "status_id": "nope", "jenis_transaksi_id": record_id(&jenis).unwrap() })),
            )
            .await
            .unwrap();

        let module = ModuleName::from_path("t_deposit_d").unwrap();
        let fetched = service
            .get(&module, record_id(&detail).unwrap(), &["m_gen".to_string()])
            .await
            .unwrap();
        assert_eq!(fetched["m_gen"]["value1"], json!("Setoran Deposit"));
    }

    #[tokio::test]
    async fn embedded_field_does_not_hide_fallback_key() {
        let (_dir, service, store) = service_with(&[]).await;
        let panti = store.create("gen", obj(json!({ "value1": "Panti" }))).await.unwrap();
        let donatur = store.create("gen", obj(json!({ "value1": "Donatur" }))).await.unwrap();
        let row = store
            .create(
                "laporan",
                obj(json!({
                    "kategori_id": record_id(&panti).unwrap(),
                    "kategori": record_id(&donatur).unwrap(),
                })),
            )
            .await
            .unwrap();

        let module = ModuleName::from_path("t_laporan").unwrap();
        let fetched = service
            .get(&module, record_id(&row).unwrap(), &["m_gen".to_string()])
            .await
            .unwrap();
        assert_eq!(fetched["kategori"]["value1"], json!("Panti"));
        assert_eq!(fetched["m_gen"]["value1"], json!("Donatur"));
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_dir, service, _) = service_with(&[]).await;
        let module = ModuleName::from_path("m_gen").unwrap();
        let err = service.get(&module, "nope", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
