//! Dense tensor implementation and operations
//!
//! The type definition lives in `types`; flat-buffer access and reshaping in
//! `shape_ops`.

// Core type definition
pub mod types;

mod shape_ops;

// Supporting modules
pub mod densend_traits;

// Re-export the main type
pub use types::DenseND;
