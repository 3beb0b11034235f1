//! Rectified linear activation

use inferso_core::Tensor;

use crate::error::{ForwardError, MaterializeError};
use crate::layer::{check_batch, check_inputs_nonempty, for_each_batch, prepare_output, Layer};
use crate::runtime::RuntimeOperator;

/// Element-wise `max(x, 0)` with unchanged shape.
///
/// # Examples
///
/// ```
/// use inferso_core::Tensor;
/// use inferso_nn::{Layer, ReluLayer};
///
/// let relu = ReluLayer::new();
/// let inputs = vec![Tensor::from_vec(vec![-1.0, 0.0, 2.5, -0.5], (1, 2, 2)).unwrap()];
/// let mut outputs = vec![Tensor::default()];
/// relu.forward(&inputs, &mut outputs).unwrap();
///
/// assert_eq!(outputs[0].get(0, 0, 0), Some(0.0));
/// assert_eq!(outputs[0].get(0, 1, 0), Some(2.5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReluLayer {
    name: String,
}

impl ReluLayer {
    /// Create an unnamed activation layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the instance name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn activate_one(&self, input: &Tensor, output: &mut Tensor) {
        prepare_output(&self.name, output, input.shape());
        output
            .as_array_mut()
            .zip_mut_with(input.as_array(), |out, &value| *out = value.max(0.0));
    }

    /// Build an activation layer from a parsed graph node.
    ///
    /// The activation has no parameters or attributes; materialization
    /// only adopts the instance name.
    pub fn from_runtime(op: &RuntimeOperator) -> Result<Self, MaterializeError> {
        Ok(Self::new().with_name(op.name.as_str()))
    }

    /// Registry factory wrapper around [`ReluLayer::from_runtime`].
    pub fn materialize(op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
        Ok(Box::new(Self::from_runtime(op)?))
    }
}

impl Layer for ReluLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn layer_type(&self) -> &str {
        "nn.ReLU"
    }

    fn forward(&self, inputs: &[Tensor], outputs: &mut [Tensor]) -> Result<(), ForwardError> {
        check_batch(&self.name, inputs, outputs)?;
        check_inputs_nonempty(&self.name, inputs)?;

        for_each_batch(inputs, outputs, |input, output| {
            self.activate_one(input, output)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_negatives_and_keeps_positives() {
        let relu = ReluLayer::new();
        let inputs =
            vec![Tensor::from_vec(vec![-3.0, -0.0, 0.0, 1.5, 7.0, -0.1], (1, 2, 3)).unwrap()];
        let mut outputs = vec![Tensor::default()];
        relu.forward(&inputs, &mut outputs).unwrap();

        let values: Vec<f32> = outputs[0].iter().copied().collect();
        assert_eq!(values, vec![0.0, 0.0, 0.0, 1.5, 7.0, 0.0]);
    }

    #[test]
    fn test_preserves_shape() {
        let relu = ReluLayer::new();
        let inputs = vec![Tensor::random_uniform((3, 5, 7), -1.0, 1.0)];
        let mut outputs = vec![Tensor::default()];
        relu.forward(&inputs, &mut outputs).unwrap();
        assert_eq!(outputs[0].shape(), (3, 5, 7));
    }

    #[test]
    fn test_is_idempotent() {
        let relu = ReluLayer::new();
        let inputs = vec![Tensor::random_uniform((2, 4, 4), -2.0, 2.0)];
        let mut once = vec![Tensor::default()];
        relu.forward(&inputs, &mut once).unwrap();

        let mut twice = vec![Tensor::default()];
        relu.forward(&once, &mut twice).unwrap();
        assert_eq!(once[0], twice[0]);
    }

    #[test]
    fn test_preallocated_output_is_overwritten() {
        let relu = ReluLayer::new();
        let inputs = vec![Tensor::from_elem((1, 2, 2), -4.0)];
        let mut outputs = vec![Tensor::from_elem((1, 2, 2), 9.0)];
        relu.forward(&inputs, &mut outputs).unwrap();
        assert!(outputs[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_forward_reports_batch_errors() {
        let relu = ReluLayer::new();
        assert_eq!(relu.forward(&[], &mut []), Err(ForwardError::InputEmpty));

        let inputs = vec![Tensor::ones((1, 1, 1)); 2];
        let mut outputs = vec![Tensor::default(); 3];
        assert_eq!(
            relu.forward(&inputs, &mut outputs),
            Err(ForwardError::SizeMismatch {
                inputs: 2,
                outputs: 3
            })
        );
    }

    #[test]
    fn test_from_runtime_adopts_the_name() {
        let op = RuntimeOperator::new("relu3", "nn.ReLU");
        let relu = ReluLayer::from_runtime(&op).unwrap();
        assert_eq!(relu.name(), "relu3");
        assert_eq!(relu.layer_type(), "nn.ReLU");
    }
}
