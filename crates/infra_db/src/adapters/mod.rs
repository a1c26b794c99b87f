//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain records and database row types
//! - Uses the repository layer for database operations
//! - Converts `DatabaseError` into `PortError`

pub mod claims;

pub use claims::{PgClaimsStore, PgClaimsUnitOfWork};
