//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the claims analytics
//! system using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories are stateless and
//! run their statements on a caller-supplied `&mut PgConnection`, so several
//! of them compose inside one transaction. [`adapters::PgClaimsStore`] and
//! [`adapters::PgClaimsUnitOfWork`] implement the domain ports on top of them.
//!
//! # Provider Aggregates
//!
//! The running per-provider total is maintained with a single
//! `INSERT ... ON CONFLICT DO UPDATE` statement. Under READ COMMITTED the
//! conflicting row is locked and the increment is re-applied to the latest
//! committed value, so concurrent claims never lose an update.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PgClaimsStore, MIGRATOR};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! MIGRATOR.run(&pool).await?;
//! let store = PgClaimsStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{PgClaimsStore, PgClaimsUnitOfWork};

/// Embedded schema migrations, applied at start-up and by the test harness
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
