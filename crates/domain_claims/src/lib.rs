//! Claims Processing Domain
//!
//! This crate turns an inbound dental/medical claim into persisted records
//! and keeps a running net-fee total per provider.
//!
//! # Processing Flow
//!
//! ```text
//! ClaimSubmission
//!   -> validate lines (procedure code, provider NPI)
//!   -> convert amounts to integer cents, compute net fee per line
//!   -> persist claim + lines
//!   -> add one delta per provider to its running aggregate
//!   -> write the claim.processed outbox row
//! ```
//!
//! All writes for one claim go through a single [`ports::ClaimsUnitOfWork`]
//! and become visible together on commit, or not at all.

pub mod claim;
pub mod validation;
pub mod builder;
pub mod outbox;
pub mod ports;
pub mod service;
pub mod error;

pub use claim::{
    ClaimLineInput, ClaimLineRecord, ClaimRecord, ClaimSubmission, LineAmounts,
    ProviderNetFeeAggregate,
};
pub use validation::{FieldValidator, Pattern, Rule};
pub use builder::{BuiltClaim, ClaimAggregateBuilder, ProviderDeltas};
pub use outbox::{OutboxEvent, OutboxStatus, CLAIM_PROCESSED_EVENT};
pub use ports::{ClaimsStore, ClaimsUnitOfWork};
pub use service::ClaimService;
pub use error::ClaimError;
