//! The layer abstraction shared by all operators

use inferso_core::Tensor;
use tracing::warn;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::ForwardError;

/// A computation node operating on batches of tensors.
///
/// Implementations receive one input tensor and one output tensor per batch
/// element. Recoverable problems (empty batches, missing weights, invalid
/// strides) are reported through [`ForwardError`]; violations of invariants
/// that construction already guaranteed panic instead.
///
/// # Examples
///
/// ```
/// use inferso_core::Tensor;
/// use inferso_nn::{ForwardError, Layer};
///
/// struct Identity;
///
/// impl Layer for Identity {
///     fn name(&self) -> &str {
///         "id"
///     }
///
///     fn layer_type(&self) -> &str {
///         "nn.Identity"
///     }
///
///     fn forward(&self, inputs: &[Tensor], outputs: &mut [Tensor]) -> Result<(), ForwardError> {
///         for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
///             *output = input.clone();
///         }
///         Ok(())
///     }
/// }
///
/// let layer = Identity;
/// let inputs = vec![Tensor::ones((1, 2, 2))];
/// let mut outputs = vec![Tensor::default()];
/// layer.forward(&inputs, &mut outputs).unwrap();
/// assert_eq!(outputs[0], inputs[0]);
/// ```
pub trait Layer: Send + Sync {
    /// Instance name of this layer, e.g. `conv1`.
    fn name(&self) -> &str;

    /// Operator type name of this layer, e.g. `nn.Conv2d`.
    fn layer_type(&self) -> &str;

    /// Run the layer over a batch.
    ///
    /// `inputs` and `outputs` are parallel slices; element `i` of `outputs`
    /// receives the result for element `i` of `inputs`. Layers may allocate
    /// an output tensor in place when the provided one is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`ForwardError`] describing the first recoverable problem
    /// found. The output batch is left unspecified on error.
    fn forward(&self, inputs: &[Tensor], outputs: &mut [Tensor]) -> Result<(), ForwardError>;
}

impl std::fmt::Debug for dyn Layer + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name())
            .field("layer_type", &self.layer_type())
            .finish()
    }
}

/// Batch-level validation shared by every layer: the input batch must be
/// non-empty and the output batch must match it in length.
pub(crate) fn check_batch(
    layer: &str,
    inputs: &[Tensor],
    outputs: &[Tensor],
) -> Result<(), ForwardError> {
    if inputs.is_empty() {
        warn!(layer, "forward called with an empty input batch");
        return Err(ForwardError::InputEmpty);
    }
    if inputs.len() != outputs.len() {
        warn!(
            layer,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "input and output batch sizes differ"
        );
        return Err(ForwardError::SizeMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    Ok(())
}

/// Element-level validation: every tensor in the batch must hold data.
/// Runs after the layer's own parameter checks so that missing weights and
/// invalid strides are reported first.
pub(crate) fn check_inputs_nonempty(layer: &str, inputs: &[Tensor]) -> Result<(), ForwardError> {
    if inputs.iter().any(Tensor::is_empty) {
        warn!(layer, "forward called with an empty tensor in the batch");
        return Err(ForwardError::InputEmpty);
    }
    Ok(())
}

/// Ensure an output slot holds a tensor of the given shape.
///
/// An empty slot is allocated in place; a pre-allocated slot must already
/// match, anything else is a graph-construction bug and panics.
pub(crate) fn prepare_output(layer: &str, output: &mut Tensor, shape: (usize, usize, usize)) {
    if output.is_empty() {
        let (channels, rows, cols) = shape;
        *output = Tensor::new(channels, rows, cols);
    } else {
        assert_eq!(
            output.shape(),
            shape,
            "layer {layer}: output tensor was pre-allocated with the wrong shape"
        );
    }
}

/// Apply `apply` to every (input, output) pair of the batch, in parallel when
/// the `parallel` feature is enabled.
///
/// Callers must have validated the batch first; `apply` is infallible.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_batch<F>(inputs: &[Tensor], outputs: &mut [Tensor], apply: F)
where
    F: Fn(&Tensor, &mut Tensor) + Send + Sync,
{
    inputs
        .par_iter()
        .zip(outputs.par_iter_mut())
        .for_each(|(input, output)| apply(input, output));
}

/// Apply `apply` to every (input, output) pair of the batch, in parallel when
/// the `parallel` feature is enabled.
///
/// Callers must have validated the batch first; `apply` is infallible.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_batch<F>(inputs: &[Tensor], outputs: &mut [Tensor], apply: F)
where
    F: Fn(&Tensor, &mut Tensor) + Send + Sync,
{
    for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
        apply(input, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_batch_rejects_empty_batch() {
        let result = check_batch("test", &[], &[]);
        assert_eq!(result, Err(ForwardError::InputEmpty));
    }

    #[test]
    fn test_check_batch_rejects_length_mismatch() {
        let inputs = vec![Tensor::ones((1, 2, 2)); 3];
        let outputs = vec![Tensor::default(); 2];
        let result = check_batch("test", &inputs, &outputs);
        assert_eq!(
            result,
            Err(ForwardError::SizeMismatch {
                inputs: 3,
                outputs: 2
            })
        );
    }

    #[test]
    fn test_check_batch_accepts_matching_batches() {
        let inputs = vec![Tensor::ones((1, 2, 2)); 2];
        let outputs = vec![Tensor::default(); 2];
        assert!(check_batch("test", &inputs, &outputs).is_ok());
    }

    #[test]
    fn test_check_inputs_nonempty_flags_empty_element() {
        let inputs = vec![Tensor::ones((1, 2, 2)), Tensor::default()];
        let result = check_inputs_nonempty("test", &inputs);
        assert_eq!(result, Err(ForwardError::InputEmpty));
    }

    #[test]
    fn test_check_inputs_nonempty_accepts_filled_batch() {
        let inputs = vec![Tensor::ones((1, 2, 2)); 4];
        assert!(check_inputs_nonempty("test", &inputs).is_ok());
    }

    #[test]
    fn test_prepare_output_allocates_empty_slot() {
        let mut output = Tensor::default();
        prepare_output("test", &mut output, (2, 3, 4));
        assert_eq!(output.shape(), (2, 3, 4));
        assert!(output.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_prepare_output_keeps_matching_slot() {
        let mut output = Tensor::from_elem((1, 2, 2), 5.0);
        prepare_output("test", &mut output, (1, 2, 2));
        // Existing storage is reused, not zeroed
        assert_eq!(output.get(0, 0, 0), Some(5.0));
    }

    #[test]
    #[should_panic(expected = "wrong shape")]
    fn test_prepare_output_rejects_mismatched_slot() {
        let mut output = Tensor::new(1, 2, 2);
        prepare_output("test", &mut output, (1, 3, 3));
    }

    #[test]
    fn test_for_each_batch_visits_every_pair() {
        let inputs: Vec<Tensor> = (1..=4)
            .map(|i| Tensor::from_elem((1, 2, 2), i as f32))
            .collect();
        let mut outputs = vec![Tensor::default(); 4];

        for_each_batch(&inputs, &mut outputs, |input, output| {
            let mut doubled = input.clone();
            doubled.as_array_mut().mapv_inplace(|v| v * 2.0);
            *output = doubled;
        });

        for (i, output) in outputs.iter().enumerate() {
            assert_eq!(output.get(0, 0, 0), Some((i as f32 + 1.0) * 2.0));
        }
    }
}
