//! Strided, axis-aware top-K selection
//!
//! A score tensor is split into `num` independent groups of `dim` elements.
//! Group `i` gathers element `j` from the flat offset
//!
//! ```text
//! (i / axis_dist * dim + j) * axis_dist + i % axis_dist
//! ```
//!
//! where `axis_dist` is the volume of the axes after the grouping axis (1 in
//! flatten mode). The same formula with `dim` replaced by K addresses the
//! output, so the grouping axis can sit anywhere in the shape.
//!
//! Within a group only the first K entries are ordered (partial ordering via
//! `select_nth_unstable_by` followed by a sort of the head).
//!
//! # Output layouts
//!
//! | Grouping | `out_max_val` | Written per `(i, j)` |
//! |----------|---------------|----------------------|
//! | axis     | true          | value at the strided output address |
//! | axis     | false         | index at the strided output address |
//! | flatten  | true          | index at `2*i*k + j`, value at `2*i*k + k + j` |
//! | flatten  | false         | index at `i*k + j` |

use crate::error::{KernelError, KernelResult};
use crate::resolver::Grouping;
use dyntopk_core::count_from;
use scirs2_core::numeric::{Float, NumCast};
use std::cmp::Ordering;

/// Group geometry of a score tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLayout {
    /// Elements per group
    pub dim: usize,
    /// Flat distance between consecutive elements of one group
    pub axis_dist: usize,
    /// Number of groups
    pub num: usize,
}

impl GroupLayout {
    /// Derive the group geometry from a row-major shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_kernels::{GroupLayout, Grouping};
    ///
    /// let layout = GroupLayout::new(&[2, 3, 4], Grouping::Axis(1));
    /// assert_eq!((layout.dim, layout.axis_dist, layout.num), (3, 4, 8));
    ///
    /// let layout = GroupLayout::new(&[2, 3, 4], Grouping::Flatten);
    /// assert_eq!((layout.dim, layout.axis_dist, layout.num), (12, 1, 2));
    /// ```
    pub fn new(shape: &[usize], grouping: Grouping) -> Self {
        let (dim, axis_dist) = match grouping {
            Grouping::Axis(axis) => (
                shape.get(axis).copied().unwrap_or(1),
                count_from(shape, axis + 1),
            ),
            Grouping::Flatten => (count_from(shape, 1), 1),
        };
        let total: usize = shape.iter().product();
        let num = if dim == 0 { 0 } else { total / dim };
        Self {
            dim,
            axis_dist,
            num,
        }
    }

    /// Flat input offset of element `j` of group `i`.
    #[inline]
    pub fn input_offset(&self, i: usize, j: usize) -> usize {
        (i / self.axis_dist * self.dim + j) * self.axis_dist + i % self.axis_dist
    }

    /// Flat output offset of rank `j` of group `i` when the grouping axis has
    /// been resized to `k`.
    #[inline]
    pub fn output_offset(&self, i: usize, j: usize, k: usize) -> usize {
        (i / self.axis_dist * k + j) * self.axis_dist + i % self.axis_dist
    }
}

/// Which values land in the output, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// Axis mode, values only
    AxisValues,
    /// Axis mode, indices only
    AxisIndices,
    /// Flatten mode, an index plane followed by a value plane per group
    FlattenIndicesAndValues,
    /// Flatten mode, indices only
    FlattenIndices,
}

impl EmitMode {
    /// Pick the layout for a grouping and `out_max_val` flag
    pub fn new(grouping: Grouping, out_max_val: bool) -> Self {
        match (grouping, out_max_val) {
            (Grouping::Axis(_), true) => EmitMode::AxisValues,
            (Grouping::Axis(_), false) => EmitMode::AxisIndices,
            (Grouping::Flatten, true) => EmitMode::FlattenIndicesAndValues,
            (Grouping::Flatten, false) => EmitMode::FlattenIndices,
        }
    }

    /// Output elements written per group for a given K
    pub fn outputs_per_group(&self, k: usize) -> usize {
        match self {
            EmitMode::FlattenIndicesAndValues => 2 * k,
            _ => k,
        }
    }
}

/// Descending order on `(value, index)`; NaN ranks last, ties go to the lower index.
fn descending<T: Float>(a: &(T, usize), b: &(T, usize)) -> Ordering {
    match (a.0.is_nan(), b.0.is_nan()) {
        (false, false) => b
            .0
            .partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1)),
        (true, true) => a.1.cmp(&b.1),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Order the `k` largest entries to the front of `entries`, descending.
///
/// Entries past `k` are left in unspecified order. `k` larger than the slice
/// orders the whole slice.
///
/// # Examples
///
/// ```
/// use dyntopk_kernels::partial_top_k;
///
/// let mut entries = vec![(5.0, 0), (2.0, 1), (9.0, 2), (1.0, 3)];
/// partial_top_k(&mut entries, 2);
/// assert_eq!(&entries[..2], &[(9.0, 2), (5.0, 0)]);
/// ```
pub fn partial_top_k<T: Float>(entries: &mut [(T, usize)], k: usize) {
    let k = k.min(entries.len());
    if k == 0 {
        return;
    }
    if k < entries.len() {
        entries.select_nth_unstable_by(k - 1, descending);
    }
    entries[..k].sort_unstable_by(descending);
}

/// Gather group `i` into `scratch` as `(value, position-in-group)` pairs.
fn gather<T: Float>(scores: &[T], layout: &GroupLayout, i: usize, scratch: &mut Vec<(T, usize)>) {
    scratch.clear();
    scratch.extend((0..layout.dim).map(|j| (scores[layout.input_offset(i, j)], j)));
}

fn index_value<T: Float>(index: usize) -> KernelResult<T> {
    <T as NumCast>::from(index).ok_or_else(|| {
        KernelError::operation_error(
            "select_top_k",
            format!("index {} is not representable in the output element type", index),
        )
    })
}

/// Write one ranked group into the output buffer.
fn scatter<T: Float>(
    ranked: &[(T, usize)],
    layout: &GroupLayout,
    mode: EmitMode,
    i: usize,
    k: usize,
    output: &mut [T],
) -> KernelResult<()> {
    for (j, &(value, index)) in ranked.iter().take(k).enumerate() {
        match mode {
            EmitMode::AxisValues => output[layout.output_offset(i, j, k)] = value,
            EmitMode::AxisIndices | EmitMode::FlattenIndices => {
                output[layout.output_offset(i, j, k)] = index_value(index)?
            }
            EmitMode::FlattenIndicesAndValues => {
                output[2 * i * k + j] = index_value(index)?;
                output[2 * i * k + k + j] = value;
            }
        }
    }
    Ok(())
}

/// Validate buffers against the layout and return it.
fn check_operands<T>(
    scores: &[T],
    shape: &[usize],
    grouping: Grouping,
    mode: EmitMode,
    k: usize,
    output: &[T],
) -> KernelResult<GroupLayout> {
    let total: usize = shape.iter().product();
    if scores.len() != total {
        return Err(KernelError::dimension_mismatch(
            "select_top_k",
            vec![total],
            vec![scores.len()],
            "scores buffer length must match its shape",
        ));
    }
    if total == 0 {
        return Err(KernelError::empty_input("select_top_k", "scores"));
    }

    let layout = GroupLayout::new(shape, grouping);
    if k > layout.dim {
        return Err(KernelError::precondition_violation(k, layout.dim));
    }

    let expected = layout.num * mode.outputs_per_group(k);
    if output.len() != expected {
        return Err(KernelError::dimension_mismatch(
            "select_top_k",
            vec![expected],
            vec![output.len()],
            "output buffer length must match the resolved output shape",
        ));
    }
    Ok(layout)
}

/// Select the top `k` entries of every group and write them to `output`.
///
/// # Arguments
///
/// * `scores` - Row-major score buffer
/// * `shape` - Shape of `scores`
/// * `grouping` - Axis or flatten grouping
/// * `out_max_val` - Emit values (see the module-level layout table)
/// * `k` - Effective K for this invocation
/// * `output` - Pre-shaped output buffer, fully overwritten
///
/// # Errors
///
/// - `PreconditionViolation` if `k` exceeds the group size
/// - `DimensionMismatch` if either buffer disagrees with the layout
/// - `EmptyInput` for a zero-sized score tensor
///
/// # Complexity
///
/// Time: O(num * (dim + k log k)) expected
/// Space: O(dim) scratch
///
/// # Examples
///
/// ```
/// use dyntopk_kernels::{select_top_k, Grouping};
///
/// let scores = [0.1, 0.9, 0.3, 0.7, 0.5];
/// let mut out = vec![0.0; 6];
/// select_top_k(&scores, &[1, 5], Grouping::Flatten, true, 3, &mut out).unwrap();
/// assert_eq!(out, vec![1.0, 3.0, 4.0, 0.9, 0.7, 0.5]);
/// ```
pub fn select_top_k<T>(
    scores: &[T],
    shape: &[usize],
    grouping: Grouping,
    out_max_val: bool,
    k: usize,
    output: &mut [T],
) -> KernelResult<()>
where
    T: Float,
{
    let mode = EmitMode::new(grouping, out_max_val);
    let layout = check_operands(scores, shape, grouping, mode, k, output)?;

    let mut scratch = Vec::with_capacity(layout.dim);
    for i in 0..layout.num {
        gather(scores, &layout, i, &mut scratch);
        partial_top_k(&mut scratch, k);
        scatter(&scratch, &layout, mode, i, k, output)?;
    }
    Ok(())
}

/// Parallel variant of [`select_top_k`].
///
/// Groups are ranked concurrently; the ranked heads are then written to the
/// output serially since axis-mode groups interleave in memory. Produces the
/// same output as the serial version.
///
/// # Examples
///
/// ```
/// use dyntopk_kernels::{select_top_k_parallel, Grouping};
///
/// let scores = [5.0, 2.0, 9.0, 1.0];
/// let mut out = vec![0.0; 2];
/// select_top_k_parallel(&scores, &[1, 4], Grouping::Axis(1), false, 2, &mut out).unwrap();
/// assert_eq!(out, vec![2.0, 0.0]);
/// ```
#[cfg(feature = "parallel")]
pub fn select_top_k_parallel<T>(
    scores: &[T],
    shape: &[usize],
    grouping: Grouping,
    out_max_val: bool,
    k: usize,
    output: &mut [T],
) -> KernelResult<()>
where
    T: Float + Send + Sync,
{
    use scirs2_core::parallel_ops::*;

    let mode = EmitMode::new(grouping, out_max_val);
    let layout = check_operands(scores, shape, grouping, mode, k, output)?;

    let ranked: Vec<Vec<(T, usize)>> = (0..layout.num)
        .into_par_iter()
        .map(|i| {
            let mut scratch = Vec::with_capacity(layout.dim);
            gather(scores, &layout, i, &mut scratch);
            partial_top_k(&mut scratch, k);
            scratch.truncate(k);
            scratch
        })
        .collect();

    for (i, head) in ranked.iter().enumerate() {
        scatter(head, &layout, mode, i, k, output)?;
    }
    Ok(())
}
