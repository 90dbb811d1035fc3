// src/db/file_store.rs

use std::{
    collections::HashMap,
    io::{self, ErrorKind},
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::{fs, sync::Mutex as AsyncMutex};

use crate::{
    common::error::AppError,
    db::RecordStore,
    models::record::{merge_update, new_record, record_id, Record},
};

const LEGACY_EXPORT: &str = "module.exports";

// Um arquivo `<módulo>.json` por módulo, no formato `{"items": [...]}`.
// Escritas no mesmo módulo passam por um mutex próprio do módulo (fila de
// escritor único) e trocam o arquivo com rename, então leitores nunca veem
// um arquivo pela metade.
pub struct FileRecordStore {
    data_dir: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FileRecordStore {
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        tracing::info!("📁 Diretório de dados: {}", data_dir.display());

        Ok(Self {
            data_dir,
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    fn module_path(&self, module: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", module))
    }

    // Arquivos antigos eram `<módulo>.js`
    fn legacy_path(&self, module: &str) -> PathBuf {
        self.data_dir.join(format!("{}.js", module))
    }

    fn write_lock(&self, module: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Só o mapa segura a entrada: nenhuma escrita em andamento ou na fila.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(module.to_string()).or_default().clone()
    }

    // Arquivo ausente = módulo vazio. Erro de I/O ou conteúdo ilegível sobe como erro.
    async fn load_module(&self, module: &str) -> Result<Vec<Record>, AppError> {
        let content = match fs::read_to_string(self.module_path(module)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                match fs::read_to_string(self.legacy_path(module)).await {
                    Ok(content) => content,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                    Err(e) => return Err(AppError::Storage(e)),
                }
            }
            Err(e) => return Err(AppError::Storage(e)),
        };

        parse_module_file(&content).ok_or_else(|| {
            AppError::Storage(io::Error::new(
                ErrorKind::InvalidData,
                format!("conteúdo do módulo '{}' não é JSON válido", module),
            ))
        })
    }

    // Falha de leitura nunca derruba uma listagem: loga e trata como módulo vazio.
    async fn read_module(&self, module: &str) -> Vec<Record> {
        match self.load_module(module).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(module, "módulo ilegível, tratado como vazio: {}", e);
                Vec::new()
            }
        }
    }

    // Escrita sobre um arquivo ilegível apagaria os registros que ainda estão nele.
    async fn load_for_write(&self, module: &str) -> Result<Vec<Record>, AppError> {
        self.load_module(module).await.map_err(|e| {
            tracing::error!(module, "🔥 Escrita recusada, arquivo do módulo ilegível: {}", e);
            e
        })
    }

    async fn write_module(&self, module: &str, items: &[Record]) -> Result<(), AppError> {
        let path = self.module_path(module);
        let tmp_path = self.data_dir.join(format!(".{}.json.tmp", module));
        let content = serde_json::to_string_pretty(&json!({ "items": items }))?;

        let result = async {
            fs::write(&tmp_path, content).await?;
            fs::rename(&tmp_path, &path).await
        }
        .await;

        result.map_err(|e| {
            tracing::error!(module, "🔥 Falha ao gravar módulo: {}", e);
            AppError::Storage(e)
        })
    }
}

/// Aceita JSON puro ou o formato antigo `module.exports = {...};`.
fn parse_module_file(content: &str) -> Option<Vec<Record>> {
    let document: Value = match serde_json::from_str(content) {
        Ok(document) => document,
        Err(_) => serde_json::from_str(strip_commonjs_export(content)?).ok()?,
    };
    Some(items_of(document))
}

fn strip_commonjs_export(content: &str) -> Option<&str> {
    let start = content.find(LEGACY_EXPORT)? + LEGACY_EXPORT.len();
    let body = content[start..].trim_start().strip_prefix('=')?.trim();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    (body.starts_with('{') && body.ends_with('}')).then_some(body)
}

fn items_of(document: Value) -> Vec<Record> {
    match document {
        Value::Object(mut root) => match root.remove("items") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn position_of(items: &[Record], id: &str) -> Option<usize> {
    items.iter().position(|item| record_id(item) == Some(id))
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn get_all(&self, module: &str) -> Result<Vec<Record>, AppError> {
        Ok(self.read_module(module).await)
    }

    async fn get_by_id(&self, module: &str, id: &str) -> Result<Option<Record>, AppError> {
        let items = self.read_module(module).await;
        Ok(items.into_iter().find(|item| record_id(item) == Some(id)))
    }

    async fn create(&self, module: &str, payload: Record) -> Result<Record, AppError> {
        let lock = self.write_lock(module);
        let _guard = lock.lock().await;

        let mut items = self.load_for_write(module).await?;
        let record = new_record(payload);
        items.push(record.clone());
        self.write_module(module, &items).await?;

        tracing::debug!(module, id = record_id(&record), "registro criado");
        Ok(record)
    }

    async fn update(
        &self,
        module: &str,
        id: &str,
        payload: Record,
    ) -> Result<Option<Record>, AppError> {
        let lock = self.write_lock(module);
        let _guard = lock.lock().await;

        let mut items = self.load_for_write(module).await?;
        let Some(index) = position_of(&items, id) else {
            return Ok(None);
        };

        let updated = merge_update(&items[index], payload);
        items[index] = updated.clone();
        self.write_module(module, &items).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, module: &str, id: &str) -> Result<Option<Record>, AppError> {
        let lock = self.write_lock(module);
        let _guard = lock.lock().await;

        let mut items = self.load_for_write(module).await?;
        let Some(index) = position_of(&items, id) else {
            return Ok(None);
        };

        let deleted = items.remove(index);
        self.write_module(module, &items).await?;
        Ok(Some(deleted))
    }

    async fn initialize_module(&self, module: &str) -> Result<(), AppError> {
        let lock = self.write_lock(module);
        let _guard = lock.lock().await;

        let exists = fs::try_exists(self.module_path(module)).await?
            || fs::try_exists(self.legacy_path(module)).await?;
        if !exists {
            self.write_module(module, &[]).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn obj(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn store() -> (TempDir, FileRecordStore) {
        let dir = TempDir::new().unwrap();
        let store = FileRecordStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn unknown_module_is_empty() {
        let (_dir, store) = store().await;
        assert!(store.get_all("nada").await.unwrap().is_empty());
        assert!(store.get_by_id("nada", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_then_fetch_round_trip() {
        let (_dir, store) = store().await;
        let created = store.create("gen", obj(json!({ "a": 1, "b": "x" }))).await.unwrap();
        let id = record_id(&created).unwrap().to_string();

        let fetched = store.get_by_id("gen", &id).await.unwrap().unwrap();
        assert_eq!(fetched["a"], json!(1));
        assert_eq!(fetched["b"], json!("x"));
        assert!(fetched.contains_key("createdAt"));
        assert!(fetched.contains_key("updatedAt"));
    }

    #[tokio::test]
    async fn file_layout_is_items_document() {
        let (dir, store) = store().await;
        store.create("berita", obj(json!({ "title": "Halo" }))).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("berita.json")).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["items"][0]["title"], json!("Halo"));
        assert!(raw.contains('\n'), "pretty-printed");
    }

    #[tokio::test]
    async fn insertion_order_is_kept() {
        let (_dir, store) = store().await;
        for n in 0..5 {
            store.create("gen", obj(json!({ "n": n }))).await.unwrap();
        }
        let all = store.get_all("gen").await.unwrap();
        let ns: Vec<i64> = all.iter().map(|r| r["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_return_none() {
        let (_dir, store) = store().await;
        assert!(store.update("gen", "missing", obj(json!({ "a": 1 }))).await.unwrap().is_none());
        assert!(store.delete("gen", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let (_dir, store) = store().await;
        let created = store.create("gen", obj(json!({ "a": 1 }))).await.unwrap();
        let id = record_id(&created).unwrap().to_string();

        let deleted = store.delete("gen", &id).await.unwrap().unwrap();
        assert_eq!(record_id(&deleted), Some(id.as_str()));
        assert!(store.get_by_id("gen", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reads_legacy_commonjs_file() {
        let (dir, store) = store().await;
        std::fs::write(
            dir.path().join("pengurus.js"),
            "module.exports = {\n  \"items\": [{ \"id\": \"p1\", \"name\": \"Budi\" }]\n};\n",
        )
        .unwrap();

        let item = store.get_by_id("pengurus", "p1").await.unwrap().unwrap();
        assert_eq!(item["name"], json!("Budi"));
    }

    #[tokio::test]
    async fn corrupted_file_reads_as_empty() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join("gen.json"), "{ not json").unwrap();
        assert!(store.get_all("gen").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_refuse_to_overwrite_corrupted_file() {
        let (dir, store) = store().await;
        let path = dir.path().join("gen.json");
        std::fs::write(&path, "{ \"items\": [{ \"id\": \"a\" }").unwrap();

        assert!(matches!(
            store.create("gen", obj(json!({ "n": 1 }))).await,
            Err(AppError::Storage(_))
        ));
        assert!(store.update("gen", "a", obj(json!({ "n": 2 }))).await.is_err());
        assert!(store.delete("gen", "a").await.is_err());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{ \"items\": [{ \"id\": \"a\" }");
    }

    #[tokio::test]
    async fn idle_write_locks_are_dropped() {
        let (_dir, store) = store().await;
        for n in 0..10 {
            store.create(&format!("mod{}", n), obj(json!({ "n": n }))).await.unwrap();
        }
        assert_eq!(store.write_locks.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_creates_are_not_lost() {
        let (_dir, store) = store().await;
        let store = Arc::new(store);

        let tasks: Vec<_> = (0..20)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move { store.create("gen", obj(json!({ "n": n }))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.get_all("gen").await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn initialize_module_creates_empty_file_once() {
        let (dir, store) = store().await;
        store.initialize_module("galery").await.unwrap();
        assert!(dir.path().join("galery.json").exists());

        store.create("galery", obj(json!({ "src": "a.png" }))).await.unwrap();
        store.initialize_module("galery").await.unwrap();
        assert_eq!(store.get_all("galery").await.unwrap().len(), 1);
    }

    #[test]
    fn commonjs_prefix_is_stripped() {
        assert_eq!(strip_commonjs_export("module.exports = {\"items\":[]};"), Some("{\"items\":[]}"));
        assert_eq!(strip_commonjs_export("exports.x = 1"), None);
    }
}
