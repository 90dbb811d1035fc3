pub mod auth;
pub mod envelope;
pub mod ledger;
pub mod module;
pub mod query;
pub mod record;
