//! # Inferso
//!
//! A CNN inference engine over channel-major `f32` feature maps, built
//! around layer execution: parsed graph nodes are materialized into
//! layers through an explicit registry, and each layer runs over batches
//! of tensors with a Winograd fast path for 3x3 stride-1 convolution.
//!
//! This is the meta crate that re-exports all Inferso components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use inferso::prelude::*;
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
//! ## Components
//!
//! ### Tensors ([`core`])
//!
//! The channel-major rank-3 feature map and its creation, indexing and
//! padding operations.
//!
//! ```
//! use inferso::core::Tensor;
//!
//! let map = Tensor::ones((1, 4, 4));
//! let padded = map.pad([1, 1, 1, 1], 0.0);
//! assert_eq!(padded.shape(), (1, 6, 6));
//! ```
//!
//! ### Numeric Kernels ([`kernels`])
//!
//! Winograd F(2,3) transforms and the im2col unfolding, free of operator
//! state.
//!
//! ```
//! use inferso::kernels::{transform_kernel, winograd_f23};
//!
//! let u = transform_kernel(&[[1.0; 3]; 3]);
//! let out = winograd_f23(&u, &[[1.0; 4]; 4]);
//! assert_eq!(out, [[9.0, 9.0], [9.0, 9.0]]);
//! ```
//!
//! ### Layers and the Registry ([`nn`])
//!
//! The [`nn::Layer`] trait, the shipped operators, runtime node
//! descriptions and the name-to-factory registry.
//!
//! ```
//! use inferso::nn::{LayerRegistry, RuntimeOperator};
//!
//! let registry = LayerRegistry::with_builtins();
//! let relu = registry
//!     .materialize(&RuntimeOperator::new("relu1", "nn.ReLU"))
//!     .unwrap();
//! assert_eq!(relu.layer_type(), "nn.ReLU");
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): Batch and output-channel parallelism using rayon
//! - `serde`: Serialization for tensors and runtime descriptions

#![deny(warnings)]

// Re-export all components
pub use inferso_core as core;
pub use inferso_kernels as kernels;
pub use inferso_nn as nn;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use inferso::prelude::*;
    //!
    //! let registry = LayerRegistry::with_builtins();
    //! assert!(registry.contains("nn.Conv2d"));
    //! ```

    // Core types
    pub use crate::core::Tensor;

    // Kernels
    pub use crate::kernels::{conv_output_dims, transform_kernel, winograd_f23};

    // Layers and registry
    pub use crate::nn::{
        ConvolutionLayer, ForwardError, Layer, LayerRegistry, MaterializeError, MaxPoolingLayer,
        ReluLayer, RuntimeAttribute, RuntimeOperator, RuntimeParameter, UpsampleLayer,
    };
}
