//! # dyntopk-kernels
//!
//! Adaptive top-K selection over dense tensors.
//!
//! The operator returns, for every group of values along a chosen axis (or
//! over the flattened per-instance features), the K largest values and/or
//! their positions. K is not fixed: it is recomputed on every call as the
//! number of positions where an object score beats a no-object score,
//! floored at [`MIN_DYNAMIC_K`].
//!
//! **Key Features:**
//! - **Shape resolution** ([`resolve_shape`]) - dynamic K and output shape
//! - **Strided selection** ([`select_top_k`]) - any grouping axis, any rank
//! - **Partial ordering** ([`partial_top_k`]) - only the head of each group is sorted
//! - **Operator facade** ([`ArgTopKLayer`]) - setup / reshape / forward / backward
//! - **Explicit precondition policy** ([`PreconditionPolicy`]) - reject or clamp an
//!   oversized K
//!
//! ## Quick Start
//!
//! ```rust
//! use dyntopk_core::DenseND;
//! use dyntopk_kernels::{ArgTopKConfig, ArgTopKLayer, PreconditionPolicy};
//!
//! let scores = DenseND::from_vec(vec![0.1, 0.9, 0.3, 0.7, 0.5], &[1, 5]).unwrap();
//! let noobject = DenseND::from_vec(vec![0.2; 5], &[1, 5]).unwrap();
//!
//! let config = ArgTopKConfig::default()
//!     .with_out_max_val(true)
//!     .with_precondition(PreconditionPolicy::Clamp);
//! let layer = ArgTopKLayer::setup(config, scores.shape()).unwrap();
//!
//! let mut top = DenseND::zeros(&[1]);
//! let resolution = layer.reshape(&scores, &noobject, &mut top).unwrap();
//! layer.forward(&scores, &resolution, &mut top).unwrap();
//!
//! // index plane, then value plane
//! assert_eq!(top.shape(), &[1, 2, 5]);
//! assert_eq!(&top.as_slice().unwrap()[5..8], &[0.9, 0.7, 0.5]);
//! ```
//!
//! ## Value-dependent shapes
//!
//! The output shape depends on the *contents* of the comparison tensor, so
//! hosts must not infer it statically. [`ArgTopKLayer::capabilities`]
//! reports this, and that the operator stops gradient flow.
//!
//! ## Features
//!
//! - `parallel` (default) - rank groups concurrently for large inputs
//! - `serde` - serialize configurations and resolutions

#![deny(warnings)]

pub mod config;
pub mod error;
pub mod layer;
pub mod resolver;
pub mod selector;


// Re-exports
pub use config::{ArgTopKConfig, PreconditionPolicy};
pub use error::{KernelError, KernelResult};
pub use layer::{arg_top_k, ArgTopKLayer, OperatorCapabilities};
pub use resolver::{
    count_objects, dynamic_k, group_size, output_shape, resolve_shape, Grouping, Resolution,
    MIN_DYNAMIC_K,
};
pub use selector::{partial_top_k, select_top_k, EmitMode, GroupLayout};

#[cfg(feature = "parallel")]
pub use selector::select_top_k_parallel;
