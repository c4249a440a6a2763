//! # dyntopk-core
//!
//! Dense tensor storage and layout helpers for the dyntopk operator.
//!
//! This crate provides the building blocks the selection kernel reads and
//! writes through:
//!
//! - **Dense tensor representation** ([`DenseND`]) over a row-major buffer
//! - **Axis canonicalisation** ([`canonical_axis_index`]) with negative axes
//! - **Volume helpers** ([`count_from`], [`count_range`]) used for strided
//!   group addressing
//! - **Host-side reshaping** ([`DenseND::resize`]) for operator outputs
//!
//! ## Memory Layout
//!
//! Tensors are C-contiguous (row-major). Kernels operate on the flat buffer
//! returned by [`DenseND::as_slice`], which is `None` for tensors built from
//! permuted arrays.
//!
//! ## Quick Start
//!
//! ```
//! use dyntopk_core::DenseND;
//!
//! let scores = DenseND::from_vec(vec![0.1, 0.9, 0.3, 0.7], &[1, 1, 1, 4]).unwrap();
//! assert_eq!(scores.rank(), 4);
//! assert_eq!(scores.count_from(1), 4);
//! assert_eq!(scores[&[0, 0, 0, 1]], 0.9);
//! ```
//!
//! ## Error Handling
//!
//! Construction and axis lookups return `anyhow::Result`:
//!
//! ```
//! use dyntopk_core::{canonical_axis_index, DenseND};
//!
//! assert!(DenseND::from_vec(vec![1.0_f64; 3], &[2, 2]).is_err());
//! assert!(canonical_axis_index(5, 4).is_err());
//! ```
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support

#![deny(warnings)]

pub mod dense;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use types::{
    canonical_axis_index, count_from, count_range, row_major_strides, Axis, DenseND, Rank, Shape,
};
