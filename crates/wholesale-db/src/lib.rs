//! Wholesale DB: SurrealDB connection management, schema migrations and
//! the repository implementations backing the local mirror.
//!
//! This crate provides:
//! - Opening the mirror ([`open_mirror`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - One repository per mirror table, bundled as [`SurrealMirror`]

mod connection;
mod error;
mod mirror;
mod schema;

pub mod repository;

pub use connection::{DbConfig, open_mirror};
pub use error::DbError;
pub use mirror::SurrealMirror;
pub use schema::{run_migrations, schema_v1};
