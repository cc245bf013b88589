//! # Error Types
//!
//! This module defines the error type shared by every part of the solver. Invalid
//! problem instances and invalid options are rejected before the generational loop
//! starts, so the loop itself only fails on conditions that indicate a broken
//! invariant (for example an empty population).
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use ttp_qga::error::{Result, SolverError};
//!
//! fn checked_capacity(capacity: f64) -> Result<f64> {
//!     if capacity <= 0.0 {
//!         return Err(SolverError::InvalidInstance(
//!             "Capacity must be positive".to_string(),
//!         ));
//!     }
//!     Ok(capacity)
//! }
//!
//! assert!(checked_capacity(10.0).is_ok());
//! assert!(checked_capacity(0.0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use ttp_qga::error::{OptionExt, SolverError};
//!
//! fn best_score(scores: &[f64]) -> ttp_qga::error::Result<f64> {
//!     scores
//!         .iter()
//!         .copied()
//!         .reduce(f64::max)
//!         .ok_or_else_solver(|| SolverError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[1.0, 3.0, 2.0]).unwrap(), 3.0);
//! assert!(best_score(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while building or running the solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The problem instance violates one of its structural invariants.
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A strategy was requested by a name that its family does not know.
    #[error("Strategy not found: no {family} strategy named '{name}'")]
    StrategyNotFound {
        /// The operator family that was searched.
        family: &'static str,
        /// The name that was requested.
        name: String,
    },

    /// Error that occurs when a fitness calculation fails.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when an evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),
}

/// A specialized Result type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, SolverError>` using a closure to
    /// generate the error.
    fn ok_or_else_solver<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SolverError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_solver<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SolverError,
    {
        self.ok_or_else(err_fn)
    }
}
