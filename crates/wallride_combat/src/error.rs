//! Error types for the firing system

use thiserror::Error;

/// Combat errors
#[derive(Debug, Error)]
pub enum CombatError {
    /// Invalid weapon configuration
    #[error("Invalid weapon configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;
