//! Error types for the automaton engine

use thiserror::Error;

/// Errors that can occur while configuring or inspecting a simulation
///
/// Geometric degeneracies met while stepping (collinear triangles, coincident
/// sites, population collapse) are recovered in place and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A structural triangulation invariant does not hold
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Requested site index does not exist in the current generation
    #[error("site not found: {0}")]
    SiteNotFound(usize),
}

/// Result type alias for automaton operations
pub type Result<T> = std::result::Result<T, AutomatonError>;
