//! # inferso-nn
//!
//! Neural-network operators over channel-major feature maps.
//!
//! A model is a sequence of [`Layer`] values, each materialized from a
//! parsed graph node ([`RuntimeOperator`]) by a factory looked up in a
//! [`LayerRegistry`]. The shipped operators are 2D convolution with a
//! Winograd fast path ([`ConvolutionLayer`]), max pooling
//! ([`MaxPoolingLayer`]), rectified linear activation ([`ReluLayer`]) and
//! nearest-neighbor upsampling ([`UpsampleLayer`]).
//!
//! Failures split into two tiers. Conditions a caller can hit at runtime
//! with well-formed layers (empty batches, weights not yet loaded, a zero
//! stride) come back as [`ForwardError`] or [`MaterializeError`] values;
//! violations of invariants that construction already guaranteed panic,
//! because they are bugs in the graph or the loader rather than inputs to
//! recover from.
//!
//! ## Quick Start
//!
//! ```
//! use inferso_core::Tensor;
//! use inferso_nn::{
//!     LayerRegistry, RuntimeAttribute, RuntimeOperator, RuntimeParameter,
//! };
//!
//! let op = RuntimeOperator::new("conv1", "nn.Conv2d")
//!     .with_param("in_channels", RuntimeParameter::Int(1))
//!     .with_param("out_channels", RuntimeParameter::Int(1))
//!     .with_param("kernel_size", RuntimeParameter::IntArray(vec![3, 3]))
//!     .with_param("stride", RuntimeParameter::IntArray(vec![1, 1]))
//!     .with_param("padding", RuntimeParameter::IntArray(vec![0, 0]))
//!     .with_param("groups", RuntimeParameter::Int(1))
//!     .with_param("bias", RuntimeParameter::Bool(false))
//!     .with_attribute("weight", RuntimeAttribute::new(vec![1, 1, 3, 3], vec![1.0; 9]));
//!
//! let registry = LayerRegistry::with_builtins();
//! let conv = registry.materialize(&op).unwrap();
//!
//! let inputs = vec![Tensor::ones((1, 4, 4))];
//! let mut outputs = vec![Tensor::default()];
//! conv.forward(&inputs, &mut outputs).unwrap();
//! assert!(outputs[0].iter().all(|&v| v == 9.0));
//! ```
//!
//! ## Features
//!
//! - `parallel` (default) - Batch and output-channel parallelism using rayon
//! - `serde` - Serialization for runtime descriptions and tensors

#![deny(warnings)]

pub mod error;
pub mod layer;
pub mod layers;
pub mod registry;
pub mod runtime;

pub use error::{ForwardError, MaterializeError};
pub use layer::Layer;
pub use layers::{ConvolutionLayer, MaxPoolingLayer, ReluLayer, UpsampleLayer};
pub use registry::{LayerFactory, LayerRegistry};
pub use runtime::{RuntimeAttribute, RuntimeOperator, RuntimeParameter};
