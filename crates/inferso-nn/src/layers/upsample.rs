//! Nearest-neighbor spatial upsampling

use inferso_core::Tensor;

use crate::error::{ForwardError, MaterializeError};
use crate::layer::{check_batch, check_inputs_nonempty, for_each_batch, prepare_output, Layer};
use crate::runtime::RuntimeOperator;

/// Nearest-neighbor upsampling by integer factors.
///
/// Each input cell is replicated into a `scale_h x scale_w` block of the
/// output; the channel count is unchanged.
///
/// # Examples
///
/// ```
/// use inferso_core::Tensor;
/// use inferso_nn::{Layer, UpsampleLayer};
///
/// let up = UpsampleLayer::new((2, 2));
/// let inputs = vec![Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (1, 2, 2)).unwrap()];
/// let mut outputs = vec![Tensor::default()];
/// up.forward(&inputs, &mut outputs).unwrap();
///
/// assert_eq!(outputs[0].shape(), (1, 4, 4));
/// assert_eq!(outputs[0].get(0, 1, 1), Some(1.0));
/// assert_eq!(outputs[0].get(0, 3, 2), Some(3.0));
/// ```
#[derive(Debug, Clone)]
pub struct UpsampleLayer {
    name: String,
    scale: (usize, usize),
}

impl UpsampleLayer {
    /// Create an upsampling layer with `(vertical, horizontal)` factors.
    ///
    /// # Panics
    ///
    /// Panics if either factor is zero.
    pub fn new(scale: (usize, usize)) -> Self {
        assert!(
            scale.0 > 0 && scale.1 > 0,
            "scale factors must be at least 1, got {scale:?}"
        );
        Self {
            name: String::new(),
            scale,
        }
    }

    /// Set the instance name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn upsample_one(&self, input: &Tensor, output: &mut Tensor) {
        let (channels, rows, cols) = input.shape();
        let (scale_h, scale_w) = self.scale;
        prepare_output(
            &self.name,
            output,
            (channels, rows * scale_h, cols * scale_w),
        );

        for channel in 0..channels {
            let src = input.channel(channel);
            let mut dst = output.channel_mut(channel);
            for r in 0..rows {
                for c in 0..cols {
                    let value = src[[r, c]];
                    for i in 0..scale_h {
                        for j in 0..scale_w {
                            dst[[r * scale_h + i, c * scale_w + j]] = value;
                        }
                    }
                }
            }
        }
    }

    /// Build an upsampling layer from a parsed graph node.
    ///
    /// Expects a two-element float array `scale_factor` and the string
    /// parameter `mode`. Fractional factors are truncated toward zero, the
    /// way the graph format's integer semantics define them.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterializeError`] when either field is missing or
    /// mistyped.
    ///
    /// # Panics
    ///
    /// Panics on a mode other than `nearest`, a `scale_factor` that is not
    /// a pair, or factors that truncate below 1.
    pub fn from_runtime(op: &RuntimeOperator) -> Result<Self, MaterializeError> {
        let scale = op
            .float_array_param("scale_factor")
            .ok_or(MaterializeError::MissingScale)?;
        let mode = op.str_param("mode").ok_or(MaterializeError::MissingResizeMode)?;

        assert_eq!(
            mode, "nearest",
            "layer {}: unsupported resize mode `{mode}`",
            op.name
        );
        assert_eq!(
            scale.len(),
            2,
            "scale_factor must be a (vertical, horizontal) pair, got {scale:?}"
        );

        let scale_h = scale[0] as usize;
        let scale_w = scale[1] as usize;
        assert!(
            scale_h > 0 && scale_w > 0,
            "scale factors must truncate to at least 1, got {scale:?}"
        );

        Ok(Self::new((scale_h, scale_w)).with_name(op.name.as_str()))
    }

    /// Registry factory wrapper around [`UpsampleLayer::from_runtime`].
    pub fn materialize(op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
        Ok(Box::new(Self::from_runtime(op)?))
    }
}

impl Layer for UpsampleLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn layer_type(&self) -> &str {
        "nn.Upsample"
    }

    fn forward(&self, inputs: &[Tensor], outputs: &mut [Tensor]) -> Result<(), ForwardError> {
        check_batch(&self.name, inputs, outputs)?;
        check_inputs_nonempty(&self.name, inputs)?;

        for_each_batch(inputs, outputs, |input, output| {
            self.upsample_one(input, output)
        });
        Ok(())
    }
}
