//! # dyntopk - Adaptive Top-K Selection
//!
//! This is the **meta crate** that re-exports the dyntopk components.
//!
//! ## Quick Start
//!
//! ```
//! use dyntopk::prelude::*;
//!
//! let scores = DenseND::from_vec(vec![5.0, 2.0, 9.0, 1.0], &[1, 4]).unwrap();
//! let noobject = DenseND::from_vec(vec![0.0; 4], &[1, 4]).unwrap();
//!
//! let config = ArgTopKConfig::default()
//!     .with_axis(1)
//!     .with_precondition(PreconditionPolicy::Clamp);
//! let top = arg_top_k(config, &scores, &noobject).unwrap();
//!
//! // indices, best first
//! assert_eq!(top.as_slice().unwrap(), &[2.0, 0.0, 1.0, 3.0]);
//! ```
//!
//! ## Components
//!
//! ### Core Tensor Types ([`core`])
//!
//! Dense row-major tensors, axis canonicalisation, per-axis volumes.
//!
//! ```
//! use dyntopk::core::DenseND;
//!
//! let tensor = DenseND::<f64>::zeros(&[2, 1, 1, 4]);
//! assert_eq!(tensor.count_from(1), 4);
//! ```
//!
//! ### Selection Kernels ([`kernels`])
//!
//! Shape resolution with a value-dependent K, strided partial top-K
//! selection, and the [`ArgTopKLayer`](kernels::ArgTopKLayer) operator.
//!
//! ```
//! use dyntopk::kernels::{select_top_k, Grouping};
//!
//! let mut out = vec![0.0; 6];
//! select_top_k(&[0.1, 0.9, 0.3, 0.7, 0.5], &[1, 5], Grouping::Flatten, true, 3, &mut out).unwrap();
//! assert_eq!(out, vec![1.0, 3.0, 4.0, 0.9, 0.7, 0.5]);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): Rank groups concurrently for large inputs
//! - `serde`: Serialize tensors, configurations and resolutions

#![deny(warnings)]

// Re-export all components
pub use dyntopk_core as core;
pub use dyntopk_kernels as kernels;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use dyntopk::prelude::*;
    //!
    //! let layer = ArgTopKLayer::setup(ArgTopKConfig::default(), &[1, 8]).unwrap();
    //! assert!(layer.capabilities().value_dependent_shape);
    //! ```

    // Core types
    pub use crate::core::DenseND;

    // Operator
    pub use crate::kernels::{
        arg_top_k, ArgTopKConfig, ArgTopKLayer, Grouping, KernelError, KernelResult,
        PreconditionPolicy, Resolution,
    };
}
