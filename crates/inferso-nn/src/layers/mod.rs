//! Built-in layer implementations

pub mod convolution;
pub mod max_pooling;
pub mod relu;
pub mod upsample;

pub use convolution::ConvolutionLayer;
pub use max_pooling::MaxPoolingLayer;
pub use relu::ReluLayer;
pub use upsample::UpsampleLayer;
