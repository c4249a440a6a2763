//! Error types for the top-K operator
//!
//! Setup problems surface as [`KernelError::Configuration`] and are fatal for
//! the operator instance. Compute-time problems are either broken caller
//! contracts (wrong output shape, non-contiguous buffers) or a dynamic K that
//! outgrew the group under [`crate::PreconditionPolicy::Reject`].

use thiserror::Error;

/// Error type for top-K kernel operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Invalid operator configuration, detected at setup
    #[error("invalid configuration for '{parameter}': {reason}")]
    Configuration { parameter: String, reason: String },

    /// Effective K larger than the number of elements in a group
    #[error("precondition violated: effective k {effective_k} exceeds group size {dim}")]
    PreconditionViolation { effective_k: usize, dim: usize },

    /// Dimension mismatch between operands
    #[error("{operation}: dimension mismatch - expected {expected:?}, got {actual:?}. {context}")]
    DimensionMismatch {
        operation: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
        context: String,
    },

    /// Empty input not allowed
    #[error("{operation}: empty input not allowed for parameter '{parameter}'")]
    EmptyInput { operation: String, parameter: String },

    /// Generic operation error with context
    #[error("{operation}: {message}")]
    OperationError { operation: String, message: String },
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

impl KernelError {
    /// Create a configuration error
    pub fn configuration(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        KernelError::Configuration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a precondition violation for a K that does not fit its group
    pub fn precondition_violation(effective_k: usize, dim: usize) -> Self {
        KernelError::PreconditionViolation { effective_k, dim }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(
        operation: impl Into<String>,
        expected: Vec<usize>,
        actual: Vec<usize>,
        context: impl Into<String>,
    ) -> Self {
        KernelError::DimensionMismatch {
            operation: operation.into(),
            expected,
            actual,
            context: context.into(),
        }
    }

    /// Create an empty input error
    pub fn empty_input(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        KernelError::EmptyInput {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }

    /// Create a generic operation error
    pub fn operation_error(operation: impl Into<String>, message: impl Into<String>) -> Self {
        KernelError::OperationError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while validating the configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, KernelError::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = KernelError::configuration("top_k", "top k must not be less than 1");

        let msg = format!("{}", err);
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("'top_k'"));
        assert!(msg.contains("must not be less than 1"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_precondition_violation_display() {
        let err = KernelError::precondition_violation(1000, 4);

        let msg = format!("{}", err);
        assert!(msg.contains("effective k 1000"));
        assert!(msg.contains("group size 4"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = KernelError::dimension_mismatch(
            "arg_top_k_forward",
            vec![2, 1, 1, 1000],
            vec![2, 1, 1, 4],
            "Output tensor must be reshaped first",
        );

        let msg = format!("{}", err);
        assert!(msg.contains("arg_top_k_forward"));
        assert!(msg.contains("dimension mismatch"));
        assert!(msg.contains("[2, 1, 1, 1000]"));
        assert!(msg.contains("[2, 1, 1, 4]"));
    }

    #[test]
    fn test_empty_input_display() {
        let err = KernelError::empty_input("select_top_k", "scores");

        let msg = format!("{}", err);
        assert!(msg.contains("select_top_k"));
        assert!(msg.contains("empty input"));
        assert!(msg.contains("scores"));
    }

    #[test]
    fn test_operation_error_display() {
        let err = KernelError::operation_error("select_top_k", "scores are not contiguous");
        assert_eq!(err.to_string(), "select_top_k: scores are not contiguous");
    }
}
