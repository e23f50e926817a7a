//! Unified error type for domain operations.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DomainError {
    /// Validation failed (e.g., required field missing or empty)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} at {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    /// Parse error (malformed document)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            key: key.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
