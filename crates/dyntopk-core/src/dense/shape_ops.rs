//! Flat-buffer access and host-side reshaping
//!
//! Kernels address tensors through flat row-major offsets, so this module
//! exposes the contiguous buffer together with the per-axis volume helpers
//! they need.

use super::types::DenseND;
use crate::types::{count_from, count_range, row_major_strides, Axis, Shape};
use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Borrow the elements as a flat row-major slice.
    ///
    /// Returns `None` when the tensor is not in standard layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![5.0, 2.0, 9.0, 1.0], &[1, 4]).unwrap();
    /// assert_eq!(tensor.as_slice(), Some(&[5.0, 2.0, 9.0, 1.0][..]));
    /// ```
    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Mutable counterpart of [`DenseND::as_slice`].
    pub fn as_slice_mut(&mut self) -> Option<&mut [T]> {
        self.data.as_slice_mut()
    }

    /// Size of one axis, or `None` if the axis does not exist.
    pub fn dim(&self, axis: Axis) -> Option<usize> {
        self.shape().get(axis).copied()
    }

    /// Number of elements spanned by axes `start..`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_core::DenseND;
    ///
    /// let tensor = DenseND::<f32>::zeros(&[2, 3, 4]);
    /// assert_eq!(tensor.count_from(0), 24);
    /// assert_eq!(tensor.count_from(1), 12);
    /// assert_eq!(tensor.count_from(3), 1);
    /// ```
    pub fn count_from(&self, start: Axis) -> usize {
        count_from(self.shape(), start)
    }

    /// Number of elements spanned by axes `start..end`.
    pub fn count_range(&self, start: Axis, end: Axis) -> usize {
        count_range(self.shape(), start, end)
    }

    /// Row-major strides of this tensor's shape, in elements.
    pub fn row_major_strides(&self) -> Shape {
        row_major_strides(self.shape())
    }

    /// Reallocate the tensor to `shape`, zero-filled.
    ///
    /// Existing contents are discarded unless the shape is unchanged, in
    /// which case the buffer is kept as is. Callers that fully overwrite the
    /// tensor afterwards (operator outputs) rely on this.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_core::DenseND;
    ///
    /// let mut top = DenseND::<f64>::zeros(&[1]);
    /// top.resize(&[2, 1, 1, 1000]);
    /// assert_eq!(top.shape(), &[2, 1, 1, 1000]);
    /// assert_eq!(top.len(), 2000);
    /// ```
    pub fn resize(&mut self, shape: &[usize]) {
        if self.shape() == shape && self.is_contiguous() {
            return;
        }
        self.data = Array::zeros(IxDyn(shape));
    }
}
