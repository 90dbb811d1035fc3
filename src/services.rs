pub mod auth;
pub use auth::AuthService;
pub mod relations;
pub use relations::{Relation, RelationRegistry};
pub mod query_service;
pub use query_service::QueryService;
pub mod record_service;
pub use record_service::RecordService;
pub mod ledger_service;
pub use ledger_service::LedgerService;
