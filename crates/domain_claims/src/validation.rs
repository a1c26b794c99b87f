//! Claim line field validation rules
//!
//! Every rule exposes a single `check` operation. A [`FieldValidator`] applies
//! an ordered list of rules to one named field and stops at the first failure.
//!
//! # Predefined Validators
//!
//! ## submitted_procedure
//! - Must start with `D` (case-sensitive)
//!
//! ## provider_npi
//! - Must be exactly 10 ASCII digits

use crate::error::ClaimError;

/// Closed set of patterns a field value can be matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Value begins with the given prefix; the remainder is unconstrained
    StartsWith(&'static str),
    /// Value is exactly `n` ASCII digits and nothing else
    ExactDigits(usize),
}

impl Pattern {
    /// Returns true if the whole value matches the pattern
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::StartsWith(prefix) => value.starts_with(prefix),
            Pattern::ExactDigits(n) => {
                value.len() == *n && value.bytes().all(|b| b.is_ascii_digit())
            }
        }
    }
}

/// A single validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must match the pattern, otherwise fail with `message`
    Pattern {
        pattern: Pattern,
        message: &'static str,
    },
    /// Value must not be blank
    Required,
}

impl Rule {
    /// Checks a value, returning the failure reason on mismatch
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Rule::Pattern { pattern, message } => {
                if pattern.matches(value) {
                    Ok(())
                } else {
                    Err((*message).to_string())
                }
            }
            Rule::Required => {
                if value.trim().is_empty() {
                    Err("value is required".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// An ordered list of rules for one named field
#[derive(Debug, Clone)]
pub struct FieldValidator {
    field: &'static str,
    rules: Vec<Rule>,
}

impl FieldValidator {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Appends a rule; rules run in insertion order
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Runs the rules in order and reports the first failure
    pub fn validate(&self, value: &str) -> Result<(), ClaimError> {
        for rule in &self.rules {
            rule.check(value).map_err(|reason| ClaimError::ValidationFailed {
                field: self.field,
                reason: match rule {
                    Rule::Required => format!("{} is required", self.field),
                    Rule::Pattern { .. } => reason,
                },
            })?;
        }
        Ok(())
    }
}

/// Validator for `submitted_procedure` (CDT codes start with `D`)
pub fn submitted_procedure_validator() -> FieldValidator {
    FieldValidator::new("submitted_procedure").rule(Rule::Pattern {
        pattern: Pattern::StartsWith("D"),
        message: "submitted_procedure must start with 'D'",
    })
}

/// Validator for `provider_npi` (National Provider Identifier)
pub fn provider_npi_validator() -> FieldValidator {
    FieldValidator::new("provider_npi").rule(Rule::Pattern {
        pattern: Pattern::ExactDigits(10),
        message: "provider_npi must be a 10 digit number",
    })
}
