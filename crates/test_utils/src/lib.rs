//! Shared test support for the claims workspace
//!
//! Fixtures and builders produce claim payloads with known net fees,
//! `generators` supplies proptest strategies over the same shapes, and
//! `database` starts a migrated PostgreSQL container for the ignored
//! integration suite.

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
