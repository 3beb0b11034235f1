//! # inferso-core
//!
//! Core feature-map tensor type for the Inferso inference engine.
//!
//! Feature maps flowing between operators are rank-3 `f32` tensors in
//! **channel-major** order: axis 0 indexes channels, axis 1 rows, axis 2
//! columns. This crate provides:
//!
//! - [`Tensor`]: owned channel-major storage with value semantics
//! - Creation helpers: zero-filled, constant-filled, from flat data, random
//! - Zero-copy per-channel 2D views for spatial kernels
//! - Spatial manipulation: border padding with a constant fill
//!
//! ## Quick Start
//!
//! ```
//! use inferso_core::Tensor;
//!
//! // A 3-channel 4x4 feature map, zero-filled
//! let map = Tensor::new(3, 4, 4);
//! assert_eq!(map.shape(), (3, 4, 4));
//! assert_eq!(map.channel(0).dim(), (4, 4));
//!
//! // Pad the spatial borders by one cell on every side
//! let padded = map.pad([1, 1, 1, 1], 0.0);
//! assert_eq!(padded.shape(), (3, 6, 6));
//! ```
//!
//! ## Design
//!
//! `Tensor` wraps an `ndarray::Array3<f32>`; cloning deep-copies the
//! storage. The `(0, 0, 0)` tensor doubles as the *empty* placeholder that
//! operators use to request lazy output allocation.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Tensor`]

#![deny(warnings)]

pub mod tensor;

pub use tensor::Tensor;
