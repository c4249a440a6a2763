//! Property-based tests for shape and axis helpers

use super::*;
use proptest::prelude::*;

/// Strategy to generate small tensor shapes (rank 1-5, dims 1-6)
fn small_shape() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..7, 1..6)
}

proptest! {
    /// Every in-range signed axis maps to a valid, unique canonical axis
    #[test]
    fn test_canonical_axis_roundtrip(rank in 1usize..8) {
        for axis in 0..rank {
            let positive = canonical_axis_index(axis as isize, rank).unwrap();
            let negative = canonical_axis_index(axis as isize - rank as isize, rank).unwrap();
            prop_assert_eq!(positive, axis);
            prop_assert_eq!(negative, axis);
        }
        prop_assert!(canonical_axis_index(rank as isize, rank).is_err());
        prop_assert!(canonical_axis_index(-(rank as isize) - 1, rank).is_err());
    }

    /// Splitting the shape at any axis factors the total volume
    #[test]
    fn test_count_split(shape in small_shape()) {
        let total: usize = shape.iter().product();
        for axis in 0..=shape.len() {
            prop_assert_eq!(count_range(&shape, 0, axis) * count_from(&shape, axis), total);
        }
    }

    /// Flat offsets computed from strides visit every element exactly once
    #[test]
    fn test_strides_enumerate_buffer(shape in small_shape()) {
        let total: usize = shape.iter().product();
        let data: Vec<f64> = (0..total).map(|x| x as f64).collect();
        let tensor = DenseND::from_vec(data, &shape).unwrap();
        let strides = tensor.row_major_strides();

        let mut index = vec![0usize; shape.len()];
        for flat in 0..total {
            let offset: usize = index.iter().zip(strides.iter()).map(|(i, s)| i * s).sum();
            prop_assert_eq!(offset, flat);
            prop_assert_eq!(tensor[index.as_slice()], flat as f64);

            // advance the multi-index in row-major order
            for axis in (0..shape.len()).rev() {
                index[axis] += 1;
                if index[axis] < shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
    }

    /// Resizing always yields a zero-filled contiguous buffer of the new volume
    #[test]
    fn test_resize_volume(from in small_shape(), to in small_shape()) {
        let mut tensor = DenseND::<f32>::from_elem(&from, 3.0);
        tensor.resize(&to);
        let expected: usize = to.iter().product();
        prop_assert_eq!(tensor.shape(), to.as_slice());
        prop_assert_eq!(tensor.as_slice().map(|s| s.len()), Some(expected));
        if from != to {
            prop_assert!(tensor.as_slice().unwrap().iter().all(|&v| v == 0.0));
        }
    }
}
