//! Request handlers

pub mod claims;
pub mod providers;
pub mod health;
