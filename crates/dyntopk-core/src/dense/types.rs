//! Dense tensor type definition and basic operations
//!
//! This module defines the core `DenseND<T>` type and provides creation and
//! accessor methods. Layout helpers live in `shape_ops`.

use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::numeric::Num;

/// Dense N-dimensional tensor backed by scirs2_core's ndarray
///
/// Score tensors, comparison tensors and operator outputs are all `DenseND`.
/// Storage is C-contiguous (row-major) unless the caller builds the tensor
/// from a permuted array, in which case the flat-buffer accessors return
/// `None`.
///
/// # Type Parameters
///
/// * `T` - The element type (typically `f32` or `f64`)
///
/// # Examples
///
/// ```
/// use dyntopk_core::dense::DenseND;
///
/// let tensor = DenseND::<f64>::zeros(&[2, 1, 1, 4]);
/// assert_eq!(tensor.shape(), &[2, 1, 1, 4]);
/// assert_eq!(tensor.rank(), 4);
/// ```
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "T: serde::Serialize")))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct DenseND<T> {
    /// Underlying ndarray storage (via scirs2_core)
    pub(crate) data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Create a tensor from an existing ndarray
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::{Array, IxDyn};
    /// use dyntopk_core::dense::DenseND;
    ///
    /// let arr = Array::<f64, _>::zeros(IxDyn(&[2, 3]));
    /// let tensor = DenseND::from_array(arr);
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// ```
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from a vector with given shape
    ///
    /// # Arguments
    ///
    /// * `vec` - Flattened data in row-major order
    /// * `shape` - Target shape
    ///
    /// # Errors
    ///
    /// Fails when the element count does not match the shape volume.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_core::dense::DenseND;
    ///
    /// let data = vec![0.1, 0.9, 0.3, 0.7, 0.5];
    /// let tensor = DenseND::from_vec(data, &[1, 5]).unwrap();
    /// assert_eq!(tensor.shape(), &[1, 5]);
    ///
    /// assert!(DenseND::from_vec(vec![1.0, 2.0], &[3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "Shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            );
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)?;
        Ok(Self { data: array })
    }

    /// Create a tensor of zeros
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// Create a tensor filled with a specific value
    ///
    /// # Examples
    ///
    /// ```
    /// use dyntopk_core::dense::DenseND;
    ///
    /// let tensor = DenseND::from_elem(&[2, 3], -1.0);
    /// assert_eq!(tensor[&[1, 2]], -1.0);
    /// ```
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// Get the rank (number of dimensions) of this tensor
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// Get the shape of this tensor
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Get the total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor is empty (has zero elements)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the tensor is stored in standard row-major order.
    pub fn is_contiguous(&self) -> bool {
        self.data.is_standard_layout()
    }

    /// Get a copy of the shape as a vector.
    pub fn shape_vec(&self) -> Vec<usize> {
        self.shape().to_vec()
    }

    /// Get an immutable reference to the underlying ndarray
    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    /// Consume the tensor and return its elements in row-major order.
    pub fn into_vec(self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}
