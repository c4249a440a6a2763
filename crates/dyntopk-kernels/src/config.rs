//! Operator configuration
//!
//! [`ArgTopKConfig`] carries the three classic argmax-layer parameters
//! (`out_max_val`, `top_k`, `axis`) plus the policy applied when the
//! dynamically derived K outgrows a group.

/// What to do when the effective K exceeds the number of elements in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PreconditionPolicy {
    /// Fail the compute call with [`crate::KernelError::PreconditionViolation`].
    #[default]
    Reject,
    /// Shrink K to the group size, in the output shape and in the selection.
    Clamp,
}

/// Configuration fixed at setup time.
///
/// # Examples
///
/// ```
/// use dyntopk_kernels::{ArgTopKConfig, PreconditionPolicy};
///
/// let config = ArgTopKConfig::default()
///     .with_top_k(5)
///     .with_axis(-1)
///     .with_out_max_val(true)
///     .with_precondition(PreconditionPolicy::Clamp);
///
/// assert_eq!(config.top_k, 5);
/// assert_eq!(config.axis, Some(-1));
/// assert!(config.out_max_val);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArgTopKConfig {
    /// Emit the selected values (and, in flatten mode, their indices)
    pub out_max_val: bool,
    /// Requested K, validated against the grouping dimension at setup
    pub top_k: usize,
    /// Grouping axis; negative values count from the last axis. `None`
    /// flattens everything but the leading dimension.
    pub axis: Option<isize>,
    /// Behaviour when the dynamic K does not fit a group
    pub precondition: PreconditionPolicy,
}

impl Default for ArgTopKConfig {
    fn default() -> Self {
        Self {
            out_max_val: false,
            top_k: 1,
            axis: None,
            precondition: PreconditionPolicy::Reject,
        }
    }
}

impl ArgTopKConfig {
    /// Set the requested K
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Group along `axis` instead of flattening
    pub fn with_axis(mut self, axis: isize) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Group by flattening all non-leading dimensions
    pub fn flattened(mut self) -> Self {
        self.axis = None;
        self
    }

    /// Emit values in addition to (flatten mode) or instead of (axis mode) indices
    pub fn with_out_max_val(mut self, out_max_val: bool) -> Self {
        self.out_max_val = out_max_val;
        self
    }

    /// Set the oversized-K policy
    pub fn with_precondition(mut self, precondition: PreconditionPolicy) -> Self {
        self.precondition = precondition;
        self
    }
}
