//! Channel-major feature-map tensor
//!
//! Split into focused submodules:
//! - [`types`]: the `Tensor` struct, shape accessors, channel views
//! - `creation`: constructors
//! - `indexing`: element access
//! - `manipulation`: padding and filling

pub mod types;

mod creation;
mod indexing;
mod manipulation;

pub use types::Tensor;
