//! 2D max pooling

use inferso_core::Tensor;
use inferso_kernels::conv_output_dims;
use tracing::warn;

use crate::error::{ForwardError, MaterializeError};
use crate::layer::{check_batch, check_inputs_nonempty, for_each_batch, prepare_output, Layer};
use crate::runtime::RuntimeOperator;

/// Sliding-window maximum over each channel plane.
///
/// The output extent follows the convolution formula over the padded
/// input. Padding cells never win a window: each window takes the maximum
/// over its intersection with the real input, so a window that lies
/// entirely in the padding yields `f32::MIN`.
///
/// # Examples
///
/// ```
/// use inferso_core::Tensor;
/// use inferso_nn::{Layer, MaxPoolingLayer};
///
/// let pool = MaxPoolingLayer::new((2, 2), (0, 0), (2, 2));
/// let inputs = vec![Tensor::from_vec(
///     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
///     (1, 4, 4),
/// )
/// .unwrap()];
/// let mut outputs = vec![Tensor::default()];
/// pool.forward(&inputs, &mut outputs).unwrap();
///
/// assert_eq!(outputs[0].shape(), (1, 2, 2));
/// assert_eq!(outputs[0].get(0, 0, 0), Some(6.0));
/// assert_eq!(outputs[0].get(0, 1, 1), Some(16.0));
/// ```
#[derive(Debug, Clone)]
pub struct MaxPoolingLayer {
    name: String,
    kernel: (usize, usize),
    padding: (usize, usize),
    stride: (usize, usize),
}

impl MaxPoolingLayer {
    /// Create a pooling layer.
    ///
    /// # Arguments
    ///
    /// * `kernel` - Window extent `(height, width)`
    /// * `padding` - Virtual padding `(vertical, horizontal)` on both sides
    /// * `stride` - Step `(vertical, horizontal)`
    ///
    /// # Panics
    ///
    /// Panics on a zero window extent. A zero stride is left for
    /// [`MaxPoolingLayer::forward`] to report as recoverable.
    pub fn new(kernel: (usize, usize), padding: (usize, usize), stride: (usize, usize)) -> Self {
        assert!(
            kernel.0 > 0 && kernel.1 > 0,
            "pooling window must be positive, got {kernel:?}"
        );
        Self {
            name: String::new(),
            kernel,
            padding,
            stride,
        }
    }

    /// Set the instance name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn pool_one(&self, input: &Tensor, output: &mut Tensor) {
        let (channels, rows, cols) = input.shape();
        let (pad_h, pad_w) = self.padding;
        let (kernel_h, kernel_w) = self.kernel;
        let (stride_h, stride_w) = self.stride;
        let (output_h, output_w) = conv_output_dims(
            (rows + 2 * pad_h, cols + 2 * pad_w),
            self.kernel,
            self.stride,
        )
        .unwrap_or_else(|err| panic!("layer {}: pooling geometry rejected: {err}", self.name));

        prepare_output(&self.name, output, (channels, output_h, output_w));

        for channel in 0..channels {
            let plane = input.channel(channel);
            let mut out_plane = output.channel_mut(channel);
            for pr in 0..output_h {
                for pc in 0..output_w {
                    // Window in padded coordinates, clamped to the input
                    let r0 = pr * stride_h;
                    let c0 = pc * stride_w;
                    let r_lo = r0.saturating_sub(pad_h);
                    let r_hi = (r0 + kernel_h).saturating_sub(pad_h).min(rows);
                    let c_lo = c0.saturating_sub(pad_w);
                    let c_hi = (c0 + kernel_w).saturating_sub(pad_w).min(cols);

                    let mut best = f32::MIN;
                    for r in r_lo..r_hi {
                        for c in c_lo..c_hi {
                            best = best.max(plane[[r, c]]);
                        }
                    }
                    out_plane[[pr, pc]] = best;
                }
            }
        }
    }

    /// Build a pooling layer from a parsed graph node.
    ///
    /// Expects the two-element integer arrays `kernel_size`, `stride` and
    /// `padding`.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterializeError`] naming the first missing or mistyped
    /// field.
    ///
    /// # Panics
    ///
    /// Panics on arrays of the wrong length or negative values.
    pub fn from_runtime(op: &RuntimeOperator) -> Result<Self, MaterializeError> {
        let kernel_size = op
            .int_array_param("kernel_size")
            .ok_or(MaterializeError::MissingKernelSize)?;
        let stride = op
            .int_array_param("stride")
            .ok_or(MaterializeError::MissingStride)?;
        let padding = op
            .int_array_param("padding")
            .ok_or(MaterializeError::MissingPadding)?;

        assert!(
            kernel_size.len() == 2 && kernel_size.iter().all(|&v| v > 0),
            "kernel_size must be a positive (height, width) pair, got {kernel_size:?}"
        );
        assert!(
            stride.len() == 2 && stride.iter().all(|&v| v >= 0),
            "stride must be a non-negative (height, width) pair, got {stride:?}"
        );
        assert!(
            padding.len() == 2 && padding.iter().all(|&v| v >= 0),
            "padding must be a non-negative (height, width) pair, got {padding:?}"
        );

        Ok(Self::new(
            (kernel_size[0] as usize, kernel_size[1] as usize),
            (padding[0] as usize, padding[1] as usize),
            (stride[0] as usize, stride[1] as usize),
        )
        .with_name(op.name.as_str()))
    }

    /// Registry factory wrapper around [`MaxPoolingLayer::from_runtime`].
    pub fn materialize(op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
        Ok(Box::new(Self::from_runtime(op)?))
    }
}

impl Layer for MaxPoolingLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn layer_type(&self) -> &str {
        "nn.MaxPool2d"
    }

    fn forward(&self, inputs: &[Tensor], outputs: &mut [Tensor]) -> Result<(), ForwardError> {
        check_batch(&self.name, inputs, outputs)?;

        let (stride_h, stride_w) = self.stride;
        if stride_h == 0 || stride_w == 0 {
            warn!(
                layer = self.name.as_str(),
                "stride must be at least 1 in both directions"
            );
            return Err(ForwardError::InvalidStride {
                h: stride_h,
                w: stride_w,
            });
        }
        check_inputs_nonempty(&self.name, inputs)?;

        for_each_batch(inputs, outputs, |input, output| {
            self.pool_one(input, output)
        });
        Ok(())
    }
}
