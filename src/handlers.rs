// src/handlers.rs

pub mod auth;
pub mod dynamic;
pub mod health;
pub mod ledger;
pub mod legacy;
pub mod public;
