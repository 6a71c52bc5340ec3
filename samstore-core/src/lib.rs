//! # SamStore Core
//!
//! Catalog logic and persistence for the SamStore backend.
//!
//! - [`catalog`]: storage-independent rules (category/product type trees,
//!   sibling ordering, attribute binding, read-side aggregation)
//! - [`database`]: repository ports plus PostgreSQL and in-memory adapters
//! - [`application`]: the unit of work handed to services
//! - [`services`]: validation and orchestration used by the HTTP layer
//!
//! ## Feature Flags
//!
//! - `test-utils`: exposes the in-memory store to downstream tests
//! - `postgres-tests`: compiles the integration tests that need a live
//!   PostgreSQL reachable through `DATABASE_URL`

pub mod application;
pub mod catalog;
pub mod database;
pub mod error;
pub mod services;

pub use error::{CatalogError, Result, ValidationError};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
