//! Database layer
//!
//! This module provides database access for the blogstore data-access layer.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration. A trait-based
//! abstraction (`DatabasePool`) lets the repositories work with either
//! backend without knowing the specific driver.
//!
//! # Usage
//!
//! ```ignore
//! use blogstore::config::DatabaseConfig;
//! use blogstore::db::{create_pool, migrations};
//! use blogstore::db::repositories::SqlxArticleRepository;
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! let articles = SqlxArticleRepository::new(pool.clone());
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
