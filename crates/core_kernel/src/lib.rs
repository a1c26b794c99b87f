//! Core Kernel - Foundational types and utilities for the claims analytics system
//!
//! This crate provides the fundamental building blocks used across all other crates:
//! - Exact conversion of currency-formatted strings into integer cents
//! - ISO-8601 timestamp parsing for inbound service dates
//! - Strongly-typed identifiers
//! - The unified error type returned by every port adapter

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{to_minor_units, Cents, MoneyError, CURRENCY_SYMBOL};
pub use temporal::{parse_timestamp, TemporalError};
pub use identifiers::{ClaimId, IdParseError, OutboxEventId};
pub use ports::{DomainPort, PortError};
