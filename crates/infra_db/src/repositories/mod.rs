//! Repository implementations for claims persistence
//!
//! Repositories encapsulate SQL statements and map between database rows
//! and domain records.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Stateless unit structs; every method takes `&mut PgConnection`
//! - Runtime-checked queries (`sqlx::query_as` with `FromRow` rows)
//! - Composable inside one transaction owned by the caller

pub mod claims;
pub mod claim_lines;
pub mod provider_aggregates;
pub mod outbox;

pub use claims::ClaimRepository;
pub use claim_lines::ClaimLineRepository;
pub use provider_aggregates::ProviderAggregateRepository;
pub use outbox::OutboxRepository;
