//! Error types for the Property Projection Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! The projection core itself never fails; these errors come from loading
//! rule sets and from validating requests before the core is invoked.

use thiserror::Error;

/// The main error type for the Property Projection Engine.
///
/// # Example
///
/// ```
/// use property_projection::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tax.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tax.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rule set parsed but its contents are inconsistent.
    #[error("Invalid rule set: {message}")]
    InvalidRuleSet {
        /// A description of the inconsistency.
        message: String,
    },

    /// A request field failed pre-validation.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
