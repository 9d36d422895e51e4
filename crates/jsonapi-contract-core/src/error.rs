//! # Error Types — Contract Failure Taxonomy
//!
//! Defines the error types reported by the response contract checks. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Malformed input (a body that is not JSON) is kept apart from contract
//!   violations so a failing test tells you which side is broken.
//! - Contract violations carry the clause they break, the JSON pointer of
//!   the offending member, and a human-readable message.
//! - Caller misuse (an expected self link never filled in) names the fix.

use std::fmt;

use thiserror::Error;

use crate::clause::Clause;

/// Top-level error type for response contract checks.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The response body could not be parsed as JSON.
    #[error("The response should be JSON. {0}")]
    NotJson(String),

    /// The normalized response is valid JSON but not an object.
    #[error("the response must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type of the value that was found instead.
        found: &'static str,
    },

    /// The document breaks the response contract.
    #[error("contract violation: {0}")]
    Violation(#[from] Violation),

    /// The test case asked for a check it never parameterized.
    #[error("{0}")]
    CallerMisuse(String),

    /// The error catalog has no canonical title for the expected status.
    #[error("error catalog has no title for status {0}")]
    UnknownStatus(u16),
}

impl ContractError {
    /// Build a [`ContractError::Violation`].
    pub fn violation(
        clause: Clause,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Violation(Violation {
            clause,
            pointer: pointer.into(),
            message: message.into(),
        })
    }

    /// Returns the violated clause if this is a contract violation.
    pub fn clause(&self) -> Option<Clause> {
        match self {
            Self::Violation(v) => Some(v.clause),
            _ => None,
        }
    }

    /// Returns true if the document was readable but broke the contract.
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }
}

/// A single contract violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The clause of the document contract that was broken.
    pub clause: Clause,
    /// JSON Pointer to the offending member. Empty for the document root.
    pub pointer: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.pointer.is_empty() {
            "(root)"
        } else {
            self.pointer.as_str()
        };
        write!(f, "{at}: {} {}", self.message, self.clause.reference())
    }
}

impl std::error::Error for Violation {}

/// Error loading a configuration file or an error catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {reason}")]
    Read {
        /// Path of the file.
        path: String,
        /// Underlying IO failure.
        reason: String,
    },

    /// The text could not be parsed.
    #[error("invalid {format} in {origin}: {reason}")]
    Parse {
        /// Where the text came from (a path, or "input").
        origin: String,
        /// "YAML" or "JSON".
        format: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A catalog key is not an HTTP status code.
    #[error("invalid status code '{key}' in error catalog: {reason}")]
    InvalidStatus {
        /// The key as written.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}
