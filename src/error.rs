//! Error types for lanesim kernels and the driver.
//!
//! The simulated vector unit itself never fails: instructions are total over a
//! fixed width. Errors only surface at the kernel boundary, where caller-owned
//! slices and workload sizes are checked before any instruction is issued, and
//! in the driver configuration.

use std::fmt;

/// Errors that can occur when running a kernel or configuring a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanesimError {
    /// Input validation error (slice lengths, workload size, exponents).
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
    /// Invalid run configuration.
    ConfigError {
        /// The configuration parameter that was rejected.
        parameter: String,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for LanesimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanesimError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            LanesimError::ConfigError { parameter, message } => {
                write!(f, "Invalid configuration for `{}`: {}", parameter, message)
            }
        }
    }
}

impl std::error::Error for LanesimError {}

/// Result type alias for lanesim operations.
pub type Result<T> = std::result::Result<T, LanesimError>;

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> LanesimError {
    LanesimError::ValidationError {
        message: message.into(),
    }
}

/// Creates a configuration error.
pub fn config_error(parameter: impl Into<String>, message: impl Into<String>) -> LanesimError {
    LanesimError::ConfigError {
        parameter: parameter.into(),
        message: message.into(),
    }
}

/// Checks that `slice` can hold the `n` logical elements of a workload.
pub(crate) fn ensure_len<T>(name: &str, slice: &[T], n: usize) -> Result<()> {
    if slice.len() < n {
        return Err(validation_error(format!(
            "`{name}` holds {} elements but the workload size is {n}",
            slice.len()
        )));
    }
    Ok(())
}
