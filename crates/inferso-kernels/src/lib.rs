//! # inferso-kernels
//!
//! Pure numeric kernels for convolution forward passes.
//!
//! The convolution operator dispatches between two strategies; the
//! arithmetic for both lives here, free of operator state:
//!
//! - **Winograd F(2,3)** ([`winograd`]): the fixed transform matrices and
//!   fused per-tile evaluation for 3x3 kernels at stride 1. Each 4x4
//!   input tile yields a 2x2 output tile with 16 multiplications instead
//!   of 36.
//! - **im2col** ([`im2col`]): unfolding of receptive fields into a matrix
//!   whose columns are output positions, plus the matching kernel
//!   flattening, so grouped convolution becomes a matrix product.
//!
//! Geometry validation that callers can get wrong (stride, kernel extent)
//! is reported through [`KernelError`]; shape preconditions that operator
//! code establishes before calling are enforced with assertions, as in
//! the per-tile functions.
//!
//! ## Quick Start
//!
//! ```
//! use inferso_kernels::{transform_kernel, winograd_f23};
//!
//! let kernel = [[1.0f32; 3]; 3];
//! let tile = [[1.0f32; 4]; 4];
//!
//! // Transform the kernel once, reuse it for every tile
//! let u = transform_kernel(&kernel);
//! let out = winograd_f23(&u, &tile);
//!
//! // An all-ones 3x3 kernel over an all-ones tile sums 9 cells
//! assert_eq!(out, [[9.0, 9.0], [9.0, 9.0]]);
//! ```

#![deny(warnings)]

pub mod error;
pub mod im2col;
pub mod winograd;

pub use error::{KernelError, KernelResult};
pub use im2col::{conv_output_dims, flatten_kernels, im2col};
pub use winograd::{
    transform_input, transform_kernel, transform_kernel_plane, transform_output, winograd_f23,
};
