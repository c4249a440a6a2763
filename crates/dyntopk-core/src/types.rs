//! Shape and axis helpers shared by the dyntopk crates.
//!
//! This module defines the small vocabulary used to reason about tensor
//! layouts without touching tensor data:
//!
//! - Type aliases for tensor dimensions ([`Axis`], [`Rank`], [`Shape`])
//! - Axis canonicalisation ([`canonical_axis_index`]) accepting negative axes
//! - Element counts over axis ranges ([`count_range`], [`count_from`])
//! - Row-major stride tables ([`row_major_strides`])
//!
//! # Examples
//!
//! ```
//! use dyntopk_core::{canonical_axis_index, count_from, row_major_strides};
//!
//! let shape = [2, 3, 4];
//! assert_eq!(canonical_axis_index(-1, shape.len()).unwrap(), 2);
//! assert_eq!(count_from(&shape, 1), 12);
//! assert_eq!(row_major_strides(&shape).as_slice(), &[12, 4, 1]);
//! ```

use smallvec::SmallVec;

// Re-export the actual DenseND implementation
pub use crate::dense::DenseND;

/// Type alias for tensor axis index.
///
/// Zero-indexed (0 is the leading, usually batch, axis).
pub type Axis = usize;

/// Type alias for tensor rank (number of dimensions).
pub type Rank = usize;

/// Shape type using SmallVec to avoid heap allocation for common cases.
///
/// Score tensors in detection pipelines rarely exceed four dimensions, so six
/// inline slots cover everything the operator sees in practice.
///
/// # Examples
///
/// ```
/// use dyntopk_core::Shape;
///
/// let shape: Shape = Shape::from_slice(&[2, 1, 1, 4]);
/// assert_eq!(shape.len(), 4);
/// assert!(!shape.spilled());
/// ```
pub type Shape = SmallVec<[usize; 6]>;

/// Map a possibly negative axis onto `0..rank`.
///
/// Negative values count from the last axis, so `-1` addresses `rank - 1`.
///
/// # Errors
///
/// Returns an error when the axis falls outside `-rank..rank`.
///
/// # Examples
///
/// ```
/// use dyntopk_core::canonical_axis_index;
///
/// assert_eq!(canonical_axis_index(1, 4).unwrap(), 1);
/// assert_eq!(canonical_axis_index(-4, 4).unwrap(), 0);
/// assert!(canonical_axis_index(4, 4).is_err());
/// assert!(canonical_axis_index(-5, 4).is_err());
/// ```
pub fn canonical_axis_index(axis: isize, rank: Rank) -> anyhow::Result<Axis> {
    let signed_rank = rank as isize;
    if axis < -signed_rank || axis >= signed_rank {
        anyhow::bail!(
            "axis {} out of range for a tensor with {} axes (valid range {}..{})",
            axis,
            rank,
            -signed_rank,
            signed_rank
        );
    }
    if axis < 0 {
        Ok((axis + signed_rank) as Axis)
    } else {
        Ok(axis as Axis)
    }
}

/// Number of elements spanned by axes `start..end`.
///
/// An empty range counts as a single element.
pub fn count_range(shape: &[usize], start: Axis, end: Axis) -> usize {
    let end = end.min(shape.len());
    if start >= end {
        return 1;
    }
    shape[start..end].iter().product()
}

/// Number of elements spanned by axes `start..` (the per-instance volume when
/// `start` is 1).
pub fn count_from(shape: &[usize], start: Axis) -> usize {
    count_range(shape, start, shape.len())
}

/// Row-major (C-contiguous) strides, in elements, for `shape`.
pub fn row_major_strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = SmallVec::from_elem(1, shape.len());
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_axis_positive_and_negative() {
        assert_eq!(canonical_axis_index(0, 3).unwrap(), 0);
        assert_eq!(canonical_axis_index(2, 3).unwrap(), 2);
        assert_eq!(canonical_axis_index(-1, 3).unwrap(), 2);
        assert_eq!(canonical_axis_index(-3, 3).unwrap(), 0);
    }

    #[test]
    fn test_canonical_axis_out_of_range() {
        let err = canonical_axis_index(3, 3).unwrap_err();
        assert!(err.to_string().contains("axis 3 out of range"));
        assert!(canonical_axis_index(-4, 3).is_err());
        assert!(canonical_axis_index(0, 0).is_err());
    }

    #[test]
    fn test_count_range() {
        let shape = [2, 3, 4, 5];
        assert_eq!(count_range(&shape, 0, 4), 120);
        assert_eq!(count_range(&shape, 1, 3), 12);
        assert_eq!(count_range(&shape, 2, 2), 1);
        assert_eq!(count_range(&shape, 3, 10), 5);
    }

    #[test]
    fn test_count_from() {
        let shape = [2, 1, 1, 4];
        assert_eq!(count_from(&shape, 0), 8);
        assert_eq!(count_from(&shape, 1), 4);
        assert_eq!(count_from(&shape, 4), 1);
    }

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
        assert_eq!(row_major_strides(&[7]).as_slice(), &[1]);
        assert!(row_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_strides_match_count_from() {
        let shape = [3, 5, 2, 6];
        let strides = row_major_strides(&shape);
        for axis in 0..shape.len() {
            assert_eq!(strides[axis], count_from(&shape, axis + 1));
        }
    }
}
