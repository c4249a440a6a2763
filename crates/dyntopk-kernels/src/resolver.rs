//! Shape resolution: dynamic K and output shape
//!
//! The operator's output shape depends on tensor *contents*: K is the number
//! of positions where an object score beats the matching no-object score,
//! floored at [`MIN_DYNAMIC_K`]. Everything here is a pure function of its
//! inputs; the resolved K travels to the selector inside a [`Resolution`]
//! instead of living on the operator.

use crate::config::PreconditionPolicy;
use crate::error::{KernelError, KernelResult};
use dyntopk_core::{count_from, Axis, DenseND};
use scirs2_core::numeric::Float;

/// Lower bound on the dynamic K.
pub const MIN_DYNAMIC_K: usize = 1000;

/// How elements are grouped for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Grouping {
    /// One group per coordinate of every axis except this one
    Axis(Axis),
    /// One group per leading (batch) index, over all remaining dimensions
    Flatten,
}

/// Result of one shape-resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// Positions where the object score exceeded the no-object score
    pub object_count: usize,
    /// `max(object_count, MIN_DYNAMIC_K)`
    pub dynamic_k: usize,
    /// K used for the output shape and the selection. Equal to `dynamic_k`
    /// unless [`PreconditionPolicy::Clamp`] shrank it to the group size.
    pub effective_k: usize,
    /// Shape the output tensor must have
    pub output_shape: Vec<usize>,
}

/// Count positions `p < extent` where `object[p] > noobject[p]`.
///
/// NaN on either side never counts.
///
/// # Errors
///
/// Returns an error if either buffer holds fewer than `extent` values.
///
/// # Examples
///
/// ```
/// use dyntopk_kernels::count_objects;
///
/// let object = [0.9, 0.2, 0.8, 0.6];
/// let noobject = [0.1, 0.7, 0.3, 0.4];
/// assert_eq!(count_objects(&object, &noobject, 4).unwrap(), 3);
/// assert_eq!(count_objects(&object, &noobject, 2).unwrap(), 1);
/// ```
pub fn count_objects<T>(object: &[T], noobject: &[T], extent: usize) -> KernelResult<usize>
where
    T: Float,
{
    if object.len() < extent || noobject.len() < extent {
        return Err(KernelError::dimension_mismatch(
            "count_objects",
            vec![extent],
            vec![object.len(), noobject.len()],
            "object and no-object buffers must cover the comparison extent",
        ));
    }

    Ok(object[..extent]
        .iter()
        .zip(&noobject[..extent])
        .filter(|(obj, noobj)| obj > noobj)
        .count())
}

/// Floor an object count at [`MIN_DYNAMIC_K`].
///
/// ```
/// use dyntopk_kernels::{dynamic_k, MIN_DYNAMIC_K};
///
/// assert_eq!(dynamic_k(3), MIN_DYNAMIC_K);
/// assert_eq!(dynamic_k(4096), 4096);
/// ```
pub fn dynamic_k(object_count: usize) -> usize {
    object_count.max(MIN_DYNAMIC_K)
}

/// Number of elements in one group.
pub fn group_size(scores_shape: &[usize], grouping: Grouping) -> usize {
    match grouping {
        Grouping::Axis(axis) => scores_shape.get(axis).copied().unwrap_or(1),
        Grouping::Flatten => count_from(scores_shape, 1),
    }
}

/// Output shape for a given K.
///
/// Axis mode copies the input shape and replaces the grouping axis by `k`.
/// Flatten mode produces `[batch, 2 | 1, k]`, padded with trailing ones up to
/// the input rank.
///
/// # Examples
///
/// ```
/// use dyntopk_kernels::{output_shape, Grouping};
///
/// assert_eq!(output_shape(&[2, 1, 1, 4], Grouping::Axis(3), false, 1000), vec![2, 1, 1, 1000]);
/// assert_eq!(output_shape(&[1, 5], Grouping::Flatten, true, 3), vec![1, 2, 3]);
/// assert_eq!(output_shape(&[1, 5], Grouping::Flatten, false, 3), vec![1, 1, 3]);
/// ```
pub fn output_shape(
    scores_shape: &[usize],
    grouping: Grouping,
    out_max_val: bool,
    k: usize,
) -> Vec<usize> {
    match grouping {
        Grouping::Axis(axis) => {
            let mut shape = scores_shape.to_vec();
            if let Some(dim) = shape.get_mut(axis) {
                *dim = k;
            }
            shape
        }
        Grouping::Flatten => {
            let mut shape = vec![1; scores_shape.len().max(3)];
            shape[0] = scores_shape.first().copied().unwrap_or(1);
            if out_max_val {
                shape[1] = 2;
            }
            shape[2] = k;
            shape
        }
    }
}

/// Resolve the dynamic K and the output shape for one invocation.
///
/// The comparison extent is the last-axis size of `noobject`; the leading
/// `extent` values of both flat buffers are compared.
///
/// # Errors
///
/// - `DimensionMismatch` for a rank-0 no-object tensor, buffers shorter than
///   the extent, or an axis outside the scores' rank
/// - `OperationError` for non-contiguous comparison tensors
pub fn resolve_shape<T>(
    scores_shape: &[usize],
    object: &DenseND<T>,
    noobject: &DenseND<T>,
    grouping: Grouping,
    out_max_val: bool,
    policy: PreconditionPolicy,
) -> KernelResult<Resolution>
where
    T: Float,
{
    if let Grouping::Axis(axis) = grouping {
        if axis >= scores_shape.len() {
            return Err(KernelError::dimension_mismatch(
                "resolve_shape",
                vec![axis + 1],
                vec![scores_shape.len()],
                "scores tensor has fewer axes than the configured grouping axis",
            ));
        }
    }

    let extent = noobject.shape().last().copied().ok_or_else(|| {
        KernelError::dimension_mismatch(
            "resolve_shape",
            vec![1],
            vec![0],
            "no-object tensor needs at least one axis to define the comparison extent",
        )
    })?;

    let object_data = object.as_slice().ok_or_else(|| {
        KernelError::operation_error("resolve_shape", "object scores are not contiguous")
    })?;
    let noobject_data = noobject.as_slice().ok_or_else(|| {
        KernelError::operation_error("resolve_shape", "no-object scores are not contiguous")
    })?;

    let object_count = count_objects(object_data, noobject_data, extent)?;
    let dynamic_k = dynamic_k(object_count);
    let dim = group_size(scores_shape, grouping);

    let effective_k = match policy {
        PreconditionPolicy::Clamp if dynamic_k > dim => {
            tracing::warn!(dynamic_k, dim, "clamping top-k to group size");
            dim
        }
        _ => dynamic_k,
    };

    let output_shape = output_shape(scores_shape, grouping, out_max_val, effective_k);

    tracing::debug!(
        object_count,
        dynamic_k,
        effective_k,
        ?output_shape,
        "resolved top-k shape"
    );

    Ok(Resolution {
        object_count,
        dynamic_k,
        effective_k,
        output_shape,
    })
}
