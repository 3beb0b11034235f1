//! Error taxonomies for the operator layer
//!
//! Two recoverable tiers live here. [`ForwardError`] is the status a
//! forward pass returns for expected failure modes (unloaded weights,
//! malformed batches); [`MaterializeError`] reports missing or mistyped
//! graph fields during operator construction, one variant per field.
//!
//! Internal invariants that correct construction guarantees (shape
//! consistency, positive output extents, tile alignment) are *not*
//! errors; they panic.

use thiserror::Error;

/// Status of a forward pass that could not run.
///
/// Every variant is a caller-recoverable condition; forward passes never
/// panic for these. Success is `Ok(())`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwardError {
    /// The input batch, or an individual input tensor, is empty.
    #[error("input batch is empty")]
    InputEmpty,

    /// Input and output batches have different lengths.
    #[error("input batch has {inputs} tensors but output batch has {outputs}")]
    SizeMismatch { inputs: usize, outputs: usize },

    /// The operator has no weights loaded.
    #[error("no weights are loaded")]
    MissingWeight,

    /// Bias count does not match the output channel count.
    #[error("bias count {bias} does not match output channel count {kernels}")]
    BiasMismatch { bias: usize, kernels: usize },

    /// A stride component is zero.
    #[error("stride components must be at least 1, got ({h}, {w})")]
    InvalidStride { h: usize, w: usize },
}

/// A graph field that materialization could not resolve.
///
/// Absent and mistyped fields report the same variant: the parser hands
/// over typed maps, so either way the operator cannot be built from them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    /// No factory is registered under this operator type name.
    #[error("no factory is registered for operator type `{0}`")]
    UnknownOperator(String),

    #[error("parameter `in_channels` is missing or not an integer")]
    MissingInChannels,

    #[error("parameter `out_channels` is missing or not an integer")]
    MissingOutChannels,

    #[error("parameter `padding` is missing or not an integer array")]
    MissingPadding,

    #[error("parameter `bias` is missing or not a boolean")]
    MissingUseBias,

    #[error("parameter `stride` is missing or not an integer array")]
    MissingStride,

    #[error("parameter `kernel_size` is missing or not an integer array")]
    MissingKernelSize,

    #[error("parameter `groups` is missing or not an integer")]
    MissingGroups,

    #[error("attribute `weight` is missing or empty")]
    MissingWeightAttribute,

    #[error("attribute `bias` is missing or does not match the declared output channels")]
    MissingBiasAttribute,

    #[error("parameter `scale_factor` is missing or not a float array")]
    MissingScale,

    #[error("parameter `mode` is missing or not a string")]
    MissingResizeMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_error_messages() {
        let err = ForwardError::SizeMismatch {
            inputs: 3,
            outputs: 2,
        };
        assert_eq!(
            err.to_string(),
            "input batch has 3 tensors but output batch has 2"
        );

        let err = ForwardError::BiasMismatch {
            bias: 1,
            kernels: 4,
        };
        assert!(err.to_string().contains("bias count 1"));
        assert!(err.to_string().contains("output channel count 4"));
    }

    #[test]
    fn test_materialize_error_names_the_field() {
        assert!(MaterializeError::MissingInChannels
            .to_string()
            .contains("in_channels"));
        assert!(MaterializeError::MissingKernelSize
            .to_string()
            .contains("kernel_size"));
        assert!(MaterializeError::MissingScale
            .to_string()
            .contains("scale_factor"));
    }

    #[test]
    fn test_unknown_operator_carries_the_name() {
        let err = MaterializeError::UnknownOperator("nn.Sigmoid".into());
        assert!(err.to_string().contains("nn.Sigmoid"));
    }

    #[test]
    fn test_errors_are_comparable() {
        // Callers match on exact codes
        assert_eq!(ForwardError::InputEmpty, ForwardError::InputEmpty);
        assert_ne!(
            ForwardError::InputEmpty,
            ForwardError::MissingWeight
        );
        assert_eq!(
            MaterializeError::MissingGroups,
            MaterializeError::MissingGroups
        );
    }
}
