//! The adaptive top-K operator
//!
//! [`ArgTopKLayer`] strings the pieces together in the order a host drives
//! them: `setup` once, then `reshape` (shape resolution, output resize) and
//! `forward` (selection) per invocation. The resolved K is returned from
//! `reshape` and handed back to `forward`; the layer itself never changes
//! after setup.
//!
//! # Examples
//!
//! ```
//! use dyntopk_core::DenseND;
//! use dyntopk_kernels::{ArgTopKConfig, ArgTopKLayer, PreconditionPolicy};
//!
//! let scores = DenseND::from_vec(vec![0.9, 0.2, 0.8, 0.6], &[1, 1, 1, 4]).unwrap();
//! let noobject = DenseND::from_vec(vec![0.1, 0.7, 0.3, 0.4], &[1, 1, 1, 4]).unwrap();
//!
//! let config = ArgTopKConfig::default()
//!     .with_axis(-1)
//!     .with_precondition(PreconditionPolicy::Clamp);
//! let layer = ArgTopKLayer::setup(config, scores.shape()).unwrap();
//!
//! let mut top = DenseND::zeros(&[1]);
//! let resolution = layer.reshape(&scores, &noobject, &mut top).unwrap();
//! assert_eq!(resolution.dynamic_k, 1000);
//! assert_eq!(top.shape(), &[1, 1, 1, 4]);
//!
//! layer.forward(&scores, &resolution, &mut top).unwrap();
//! assert_eq!(top.as_slice().unwrap(), &[0.0, 2.0, 3.0, 1.0]);
//! ```

use crate::config::ArgTopKConfig;
use crate::error::{KernelError, KernelResult};
use crate::resolver::{resolve_shape, Grouping, Resolution};
use crate::selector::select_top_k;
use dyntopk_core::{canonical_axis_index, count_from, DenseND};
use scirs2_core::numeric::Float;

/// Minimum number of scanned elements before `forward` ranks groups in parallel.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_ELEMENTS: usize = 1 << 16;

/// Static facts about the operator that host integrations need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorCapabilities {
    /// The output shape depends on input *values*, not only input shapes.
    pub value_dependent_shape: bool,
    /// Gradients flow through the operator.
    pub differentiable: bool,
}

/// Adaptive top-K selection operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgTopKLayer {
    config: ArgTopKConfig,
    grouping: Grouping,
}

impl ArgTopKLayer {
    /// Validate `config` against the scores shape and build the operator.
    ///
    /// # Errors
    ///
    /// `KernelError::Configuration` when
    /// - `top_k` is 0
    /// - the scores tensor has no axes
    /// - the axis lies outside the scores' axes
    /// - in flatten mode, `top_k` exceeds the per-instance volume
    ///
    /// `top_k` is not checked against the axis size in axis mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_kernels::{ArgTopKConfig, ArgTopKLayer};
    ///
    /// let shape = [2, 1, 1, 4];
    /// assert!(ArgTopKLayer::setup(ArgTopKConfig::default().with_top_k(0), &shape).is_err());
    /// assert!(ArgTopKLayer::setup(ArgTopKConfig::default().with_axis(5), &shape).is_err());
    /// assert!(ArgTopKLayer::setup(ArgTopKConfig::default().with_top_k(5), &shape).is_err());
    /// assert!(ArgTopKLayer::setup(ArgTopKConfig::default().with_top_k(5).with_axis(3), &shape).is_ok());
    /// ```
    pub fn setup(config: ArgTopKConfig, scores_shape: &[usize]) -> KernelResult<Self> {
        if config.top_k < 1 {
            return Err(KernelError::configuration(
                "top_k",
                "top k must not be less than 1",
            ));
        }
        if scores_shape.is_empty() {
            return Err(KernelError::configuration(
                "scores",
                "scores tensor must have at least one axis",
            ));
        }

        let grouping = match config.axis {
            Some(axis) => {
                let axis = canonical_axis_index(axis, scores_shape.len())
                    .map_err(|e| KernelError::configuration("axis", e.to_string()))?;
                Grouping::Axis(axis)
            }
            None => {
                let per_instance = count_from(scores_shape, 1);
                if config.top_k > per_instance {
                    return Err(KernelError::configuration(
                        "top_k",
                        format!(
                            "top_k {} must be less than or equal to the dimension of the \
                             flattened scores per instance ({})",
                            config.top_k, per_instance
                        ),
                    ));
                }
                Grouping::Flatten
            }
        };

        tracing::debug!(
            top_k = config.top_k,
            ?grouping,
            out_max_val = config.out_max_val,
            precondition = ?config.precondition,
            "arg top-k layer set up"
        );

        Ok(Self { config, grouping })
    }

    /// The configuration this layer was set up with
    pub fn config(&self) -> &ArgTopKConfig {
        &self.config
    }

    /// Canonical grouping derived at setup
    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    /// The output shape depends on values, and no gradient is propagated.
    pub fn capabilities(&self) -> OperatorCapabilities {
        OperatorCapabilities {
            value_dependent_shape: true,
            differentiable: false,
        }
    }

    /// Resolve K and the output shape without touching any output tensor.
    ///
    /// `scores` doubles as the object-score tensor.
    pub fn resolve<T>(&self, scores: &DenseND<T>, noobject: &DenseND<T>) -> KernelResult<Resolution>
    where
        T: Float,
    {
        resolve_shape(
            scores.shape(),
            scores,
            noobject,
            self.grouping,
            self.config.out_max_val,
            self.config.precondition,
        )
    }

    /// Resolve K and resize `top` to the output shape.
    pub fn reshape<T>(
        &self,
        scores: &DenseND<T>,
        noobject: &DenseND<T>,
        top: &mut DenseND<T>,
    ) -> KernelResult<Resolution>
    where
        T: Float,
    {
        let resolution = self.resolve(scores, noobject)?;
        top.resize(&resolution.output_shape);
        Ok(resolution)
    }

    /// Write the top-K selection of `scores` into `top`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `top` does not have `resolution.output_shape`
    /// - `PreconditionViolation` if K exceeds the group size (only reachable
    ///   under [`crate::PreconditionPolicy::Reject`])
    pub fn forward<T>(
        &self,
        scores: &DenseND<T>,
        resolution: &Resolution,
        top: &mut DenseND<T>,
    ) -> KernelResult<()>
    where
        T: Float + Send + Sync,
    {
        if top.shape() != resolution.output_shape.as_slice() {
            return Err(KernelError::dimension_mismatch(
                "arg_top_k_forward",
                resolution.output_shape.clone(),
                top.shape_vec(),
                "output tensor must be reshaped before forward",
            ));
        }

        let scores_data = scores.as_slice().ok_or_else(|| {
            KernelError::operation_error("arg_top_k_forward", "scores are not contiguous")
        })?;
        let top_data = top.as_slice_mut().ok_or_else(|| {
            KernelError::operation_error("arg_top_k_forward", "output is not contiguous")
        })?;

        let k = resolution.effective_k;
        tracing::trace!(k, shape = ?scores.shape(), "arg top-k forward");

        #[cfg(feature = "parallel")]
        {
            if scores_data.len() >= PARALLEL_MIN_ELEMENTS {
                return crate::selector::select_top_k_parallel(
                    scores_data,
                    scores.shape(),
                    self.grouping,
                    self.config.out_max_val,
                    k,
                    top_data,
                );
            }
        }

        select_top_k(
            scores_data,
            scores.shape(),
            self.grouping,
            self.config.out_max_val,
            k,
            top_data,
        )
    }

    /// Gradient stop: nothing is propagated to the inputs.
    pub fn backward(&self, propagate_down: &[bool]) {
        if propagate_down.iter().any(|&p| p) {
            tracing::trace!("arg top-k is not differentiable; gradient not propagated");
        }
    }
}

/// One-shot setup, resolve and forward.
///
/// # Examples
///
/// ```
/// use dyntopk_core::DenseND;
/// use dyntopk_kernels::{arg_top_k, ArgTopKConfig, PreconditionPolicy};
///
/// let scores = DenseND::from_vec(vec![0.1, 0.9, 0.3, 0.7, 0.5], &[1, 5]).unwrap();
/// let noobject = DenseND::from_vec(vec![0.0; 5], &[1, 5]).unwrap();
/// let config = ArgTopKConfig::default()
///     .with_out_max_val(true)
///     .with_precondition(PreconditionPolicy::Clamp);
///
/// let top = arg_top_k(config, &scores, &noobject).unwrap();
/// assert_eq!(top.shape(), &[1, 2, 5]);
/// assert_eq!(&top.as_slice().unwrap()[..5], &[1.0, 3.0, 4.0, 2.0, 0.0]);
/// ```
pub fn arg_top_k<T>(
    config: ArgTopKConfig,
    scores: &DenseND<T>,
    noobject: &DenseND<T>,
) -> KernelResult<DenseND<T>>
where
    T: Float + Send + Sync,
{
    let layer = ArgTopKLayer::setup(config, scores.shape())?;
    let mut top = DenseND::zeros(&[0]);
    let resolution = layer.reshape(scores, noobject, &mut top)?;
    layer.forward(scores, &resolution, &mut top)?;
    Ok(top)
}
