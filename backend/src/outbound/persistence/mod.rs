//! PostgreSQL persistence adapters.

mod diesel_email_repository;
pub mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_email_repository::DieselEmailRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
