pub mod record_store;
pub use record_store::RecordStore;
pub mod file_store;
pub use file_store::FileRecordStore;
pub mod pg_store;
pub use pg_store::PgRecordStore;
