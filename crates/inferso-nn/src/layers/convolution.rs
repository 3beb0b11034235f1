//! Grouped 2D convolution with a Winograd fast path
//!
//! Every batch element takes one of two execution paths:
//!
//! - the ungrouped 3x3 stride-1 case runs through the Winograd F(2,3)
//!   transforms, trading the 9 multiplies per output cell for 4;
//! - everything else lowers each channel group to an im2col unfolding
//!   followed by one matrix product per output channel.
//!
//! Both paths zero-pad by the layer's padding first, add the per-channel
//! bias last, and produce bit-for-bit identical shapes, so which path ran
//! is unobservable apart from floating-point rounding.

use inferso_core::Tensor;
use inferso_kernels::{
    conv_output_dims, flatten_kernels, im2col, transform_kernel_plane, winograd_f23,
};
use ndarray::Array2;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ForwardError, MaterializeError};
use crate::layer::{check_batch, check_inputs_nonempty, for_each_batch, prepare_output, Layer};
use crate::runtime::RuntimeOperator;

/// A 2D convolution over channel-major feature maps.
///
/// Weights are stored as one kernel tensor per output channel, each of
/// shape `(in_channels / groups, kernel_h, kernel_w)`; the bias is one
/// scalar tensor per output channel. A freshly constructed layer has no
/// weights loaded; [`ConvolutionLayer::forward`] reports
/// [`ForwardError::MissingWeight`] until [`ConvolutionLayer::set_weights`]
/// has run.
///
/// # Examples
///
/// ```
/// use inferso_core::Tensor;
/// use inferso_nn::{ConvolutionLayer, Layer};
///
/// let mut conv = ConvolutionLayer::new(1, 1, (3, 3), (0, 0), (1, 1), 1, false);
/// conv.set_weights(&[1.0; 9]);
///
/// let inputs = vec![Tensor::ones((1, 4, 4))];
/// let mut outputs = vec![Tensor::default()];
/// conv.forward(&inputs, &mut outputs).unwrap();
///
/// // Each output cell sums a full 3x3 window of ones
/// assert_eq!(outputs[0].shape(), (1, 2, 2));
/// assert!(outputs[0].iter().all(|&v| v == 9.0));
/// ```
#[derive(Debug, Clone)]
pub struct ConvolutionLayer {
    name: String,
    in_channels: usize,
    out_channels: usize,
    kernel: (usize, usize),
    padding: (usize, usize),
    stride: (usize, usize),
    groups: usize,
    use_bias: bool,
    /// One kernel per output channel, `(in_channels / groups, kh, kw)` each
    weights: Vec<Tensor>,
    /// One `(1, 1, 1)` scalar per output channel when `use_bias`
    bias: Vec<Tensor>,
}

impl ConvolutionLayer {
    /// Create a convolution layer with the given geometry and no weights.
    ///
    /// # Arguments
    ///
    /// * `in_channels` - Channels each input tensor must have
    /// * `out_channels` - Channels each output tensor will have
    /// * `kernel` - Kernel extent `(height, width)`
    /// * `padding` - Zero padding `(vertical, horizontal)`, applied to both
    ///   sides of each axis
    /// * `stride` - Step `(vertical, horizontal)`
    /// * `groups` - Channel groups; both channel counts must divide evenly
    /// * `use_bias` - Whether forward adds a per-channel bias
    ///
    /// # Panics
    ///
    /// Panics on zero channel counts, a zero kernel extent, zero groups, or
    /// channel counts not divisible by `groups`. A zero stride is left for
    /// [`ConvolutionLayer::forward`] to report as recoverable.
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel: (usize, usize),
        padding: (usize, usize),
        stride: (usize, usize),
        groups: usize,
        use_bias: bool,
    ) -> Self {
        assert!(
            in_channels > 0 && out_channels > 0,
            "channel counts must be positive, got ({in_channels}, {out_channels})"
        );
        assert!(
            kernel.0 > 0 && kernel.1 > 0,
            "kernel extent must be positive, got {kernel:?}"
        );
        assert!(groups > 0, "groups must be positive");
        assert!(
            in_channels % groups == 0,
            "{in_channels} input channels cannot split into {groups} groups"
        );
        assert!(
            out_channels % groups == 0,
            "{out_channels} output channels cannot split into {groups} groups"
        );

        Self {
            name: String::new(),
            in_channels,
            out_channels,
            kernel,
            padding,
            stride,
            groups,
            use_bias,
            weights: Vec::new(),
            bias: Vec::new(),
        }
    }

    /// Set the instance name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load kernel weights from a flat slice.
    ///
    /// Values are consumed kernel by kernel in storage order: output
    /// channel outermost, then the kernel's `(channel, row, column)` axes.
    ///
    /// # Panics
    ///
    /// Panics if the value count does not match the declared geometry.
    pub fn set_weights(&mut self, values: &[f32]) {
        let (kernel_h, kernel_w) = self.kernel;
        let group_channels = self.in_channels / self.groups;
        let kernel_len = group_channels * kernel_h * kernel_w;
        assert_eq!(
            values.len(),
            self.out_channels * kernel_len,
            "expected {} weight values for {} kernels of shape ({}, {}, {})",
            self.out_channels * kernel_len,
            self.out_channels,
            group_channels,
            kernel_h,
            kernel_w
        );

        self.weights = values
            .chunks_exact(kernel_len)
            .map(|chunk| Tensor::from_slice(chunk, (group_channels, kernel_h, kernel_w)))
            .collect();
    }

    /// Load per-channel bias values.
    ///
    /// The count is checked at forward time, not here, so a mismatched
    /// loader surfaces as [`ForwardError::BiasMismatch`] instead of a
    /// panic.
    pub fn set_bias(&mut self, values: &[f32]) {
        self.bias = values
            .iter()
            .map(|&value| Tensor::from_elem((1, 1, 1), value))
            .collect();
    }

    /// The fast path covers exactly the ungrouped 3x3 stride-1 case.
    fn uses_winograd(&self) -> bool {
        self.kernel == (3, 3) && self.stride == (1, 1) && self.groups == 1
    }

    fn bias_value(&self, channel: usize) -> f32 {
        if self.use_bias {
            self.bias
                .get(channel)
                .and_then(Tensor::first)
                .copied()
                .unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Loaded weights must match the declared geometry exactly; anything
    /// else is a loader bug, not a runtime condition.
    fn assert_weight_geometry(&self) {
        let (kernel_h, kernel_w) = self.kernel;
        let group_channels = self.in_channels / self.groups;
        assert_eq!(
            self.weights.len(),
            self.out_channels,
            "layer {}: {} kernels loaded for {} output channels",
            self.name,
            self.weights.len(),
            self.out_channels
        );
        for (k, kernel) in self.weights.iter().enumerate() {
            assert_eq!(
                kernel.shape(),
                (group_channels, kernel_h, kernel_w),
                "layer {}: kernel {} does not match the declared geometry",
                self.name,
                k
            );
        }
    }

    /// Winograd F(2,3) path for ungrouped 3x3 stride-1 convolution.
    ///
    /// The conv-padded input is padded again at the bottom and right to a
    /// multiple of 4 so every 4x4 tile read stays in bounds; an extent that
    /// is already a multiple still gains one full tile. The tile grid then
    /// covers an `(aligned - 2)` output plane of which the top-left
    /// `(output_h, output_w)` window is the real result.
    pub(crate) fn forward_winograd(&self, input: &Tensor, output: &mut Tensor) {
        let (channels, rows, cols) = input.shape();
        assert_eq!(
            channels, self.in_channels,
            "layer {}: input has {} channels, expected {}",
            self.name, channels, self.in_channels
        );

        let (pad_h, pad_w) = self.padding;
        let conv_h = rows + 2 * pad_h;
        let conv_w = cols + 2 * pad_w;
        let (output_h, output_w) = conv_output_dims((conv_h, conv_w), self.kernel, self.stride)
            .unwrap_or_else(|err| {
                panic!("layer {}: convolution geometry rejected: {err}", self.name)
            });

        let extra_h = 4 - conv_h % 4;
        let extra_w = 4 - conv_w % 4;
        let tile_h = conv_h + extra_h;
        let tile_w = conv_w + extra_w;
        let padded = input.pad([pad_h, pad_h + extra_h, pad_w, pad_w + extra_w], 0.0);
        debug_assert_eq!(padded.shape(), (channels, tile_h, tile_w));

        prepare_output(&self.name, output, (self.out_channels, output_h, output_w));

        // Tile-grid output plane; the real output is its top-left window
        let grid_h = tile_h - 2;
        let grid_w = tile_w - 2;

        let evaluate = |oc: usize| -> Array2<f32> {
            let kernel = &self.weights[oc];
            let mut acc = Array2::<f32>::zeros((grid_h, grid_w));

            for ic in 0..channels {
                // One kernel transform per (oc, ic) pair, shared by every tile
                let u = transform_kernel_plane(&kernel.channel(ic));
                let plane = padded.channel(ic);

                let mut r = 0;
                while r + 4 <= tile_h {
                    let mut c = 0;
                    while c + 4 <= tile_w {
                        debug_assert!(r + 2 <= grid_h && c + 2 <= grid_w);
                        let mut d = [[0.0f32; 4]; 4];
                        for (i, d_row) in d.iter_mut().enumerate() {
                            for (j, cell) in d_row.iter_mut().enumerate() {
                                *cell = plane[[r + i, c + j]];
                            }
                        }

                        let y = winograd_f23(&u, &d);
                        acc[[r, c]] += y[0][0];
                        acc[[r, c + 1]] += y[0][1];
                        acc[[r + 1, c]] += y[1][0];
                        acc[[r + 1, c + 1]] += y[1][1];
                        c += 2;
                    }
                    r += 2;
                }
            }
            acc
        };

        #[cfg(feature = "parallel")]
        let planes: Vec<Array2<f32>> = (0..self.out_channels)
            .into_par_iter()
            .map(evaluate)
            .collect();
        #[cfg(not(feature = "parallel"))]
        let planes: Vec<Array2<f32>> = (0..self.out_channels).map(evaluate).collect();

        for (oc, acc) in planes.iter().enumerate() {
            let bias = self.bias_value(oc);
            let mut out_plane = output.channel_mut(oc);
            for r in 0..output_h {
                for c in 0..output_w {
                    out_plane[[r, c]] = acc[[r, c]] + bias;
                }
            }
        }
    }

    /// Generic path: per channel group, unfold the input with im2col and
    /// take one weight-row by column-matrix product per output channel.
    pub(crate) fn forward_im2col(&self, input: &Tensor, output: &mut Tensor) {
        let (channels, rows, cols) = input.shape();
        assert_eq!(
            channels, self.in_channels,
            "layer {}: input has {} channels, expected {}",
            self.name, channels, self.in_channels
        );

        let (pad_h, pad_w) = self.padding;
        let padded = input.pad([pad_h, pad_h, pad_w, pad_w], 0.0);
        let (output_h, output_w) = conv_output_dims(
            (rows + 2 * pad_h, cols + 2 * pad_w),
            self.kernel,
            self.stride,
        )
        .unwrap_or_else(|err| {
            panic!("layer {}: convolution geometry rejected: {err}", self.name)
        });

        prepare_output(&self.name, output, (self.out_channels, output_h, output_w));

        let group_in = self.in_channels / self.groups;
        let group_out = self.out_channels / self.groups;

        for g in 0..self.groups {
            let columns = im2col(
                &padded.as_array().view(),
                g * group_in..(g + 1) * group_in,
                self.kernel,
                self.stride,
                (output_h, output_w),
            );
            let kernels: Vec<_> = self.weights[g * group_out..(g + 1) * group_out]
                .iter()
                .map(|kernel| kernel.as_array().view())
                .collect();
            let weight_rows = flatten_kernels(&kernels);

            let evaluate = |k: usize| (k, weight_rows.row(k).dot(&columns));

            #[cfg(feature = "parallel")]
            let results: Vec<_> = (0..group_out).into_par_iter().map(evaluate).collect();
            #[cfg(not(feature = "parallel"))]
            let results: Vec<_> = (0..group_out).map(evaluate).collect();

            for (k, values) in results {
                let oc = g * group_out + k;
                let bias = self.bias_value(oc);
                let mut plane = output.channel_mut(oc);
                // Flat position p is output cell (p % output_h, p / output_h)
                for (p, &value) in values.iter().enumerate() {
                    plane[[p % output_h, p / output_h]] = value + bias;
                }
            }
        }
    }

    /// Build a convolution layer from a parsed graph node.
    ///
    /// Expects the integer parameters `in_channels`, `out_channels` and
    /// `groups`, the integer pairs `padding`, `stride` and `kernel_size`,
    /// the boolean `bias`, a `weight` attribute, and a `bias` attribute
    /// when `bias` is true.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterializeError`] naming the first missing or mistyped
    /// field; an absent key and a key of the wrong type are reported the
    /// same way.
    ///
    /// # Panics
    ///
    /// Fields that are present and well-typed but structurally impossible
    /// (negative counts, pairs of the wrong length, a weight blob that
    /// disagrees with the geometry) panic.
    pub fn from_runtime(op: &RuntimeOperator) -> Result<Self, MaterializeError> {
        let in_channels = op
            .int_param("in_channels")
            .ok_or(MaterializeError::MissingInChannels)?;
        let out_channels = op
            .int_param("out_channels")
            .ok_or(MaterializeError::MissingOutChannels)?;
        let padding = op
            .int_array_param("padding")
            .ok_or(MaterializeError::MissingPadding)?;
        let use_bias = op.bool_param("bias").ok_or(MaterializeError::MissingUseBias)?;
        let stride = op
            .int_array_param("stride")
            .ok_or(MaterializeError::MissingStride)?;
        let kernel_size = op
            .int_array_param("kernel_size")
            .ok_or(MaterializeError::MissingKernelSize)?;
        let groups = op.int_param("groups").ok_or(MaterializeError::MissingGroups)?;

        assert!(
            in_channels > 0 && out_channels > 0,
            "channel counts must be positive, got ({in_channels}, {out_channels})"
        );
        assert!(groups > 0, "groups must be positive, got {groups}");
        assert!(
            padding.len() == 2 && padding.iter().all(|&v| v >= 0),
            "padding must be a non-negative (height, width) pair, got {padding:?}"
        );
        assert!(
            stride.len() == 2 && stride.iter().all(|&v| v >= 0),
            "stride must be a non-negative (height, width) pair, got {stride:?}"
        );
        assert!(
            kernel_size.len() == 2 && kernel_size.iter().all(|&v| v > 0),
            "kernel_size must be a positive (height, width) pair, got {kernel_size:?}"
        );

        let mut layer = Self::new(
            in_channels as usize,
            out_channels as usize,
            (kernel_size[0] as usize, kernel_size[1] as usize),
            (padding[0] as usize, padding[1] as usize),
            (stride[0] as usize, stride[1] as usize),
            groups as usize,
            use_bias,
        )
        .with_name(op.name.as_str());

        if use_bias {
            let bias = op
                .attribute("bias")
                .ok_or(MaterializeError::MissingBiasAttribute)?;
            if bias.data.len() != layer.out_channels
                || bias.shape.first() != Some(&layer.out_channels)
            {
                warn!(
                    layer = op.name.as_str(),
                    "bias attribute does not describe one value per output channel"
                );
                return Err(MaterializeError::MissingBiasAttribute);
            }
            layer.set_bias(&bias.data);
        }

        let weight = op
            .attribute("weight")
            .ok_or(MaterializeError::MissingWeightAttribute)?;
        if weight.data.is_empty() {
            warn!(layer = op.name.as_str(), "weight attribute is empty");
            return Err(MaterializeError::MissingWeightAttribute);
        }
        layer.set_weights(&weight.data);

        Ok(layer)
    }

    /// Registry factory wrapper around [`ConvolutionLayer::from_runtime`].
    pub fn materialize(op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
        Ok(Box::new(Self::from_runtime(op)?))
    }
}

impl Layer for ConvolutionLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn layer_type(&self) -> &str {
        "nn.Conv2d"
    }

    fn forward(&self, inputs: &[Tensor], outputs: &mut [Tensor]) -> Result<(), ForwardError> {
        check_batch(&self.name, inputs, outputs)?;

        if self.weights.is_empty() {
            warn!(
                layer = self.name.as_str(),
                "forward called before weights were loaded"
            );
            return Err(ForwardError::MissingWeight);
        }
        if self.use_bias && self.bias.len() != self.weights.len() {
            warn!(
                layer = self.name.as_str(),
                bias = self.bias.len(),
                kernels = self.weights.len(),
                "bias count does not match kernel count"
            );
            return Err(ForwardError::BiasMismatch {
                bias: self.bias.len(),
                kernels: self.weights.len(),
            });
        }
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
        self.assert_weight_geometry();
        check_inputs_nonempty(&self.name, inputs)?;

        if self.uses_winograd() {
            debug!(
                layer = self.name.as_str(),
                "3x3 stride-1 convolution dispatched to the Winograd path"
            );
            for_each_batch(inputs, outputs, |input, output| {
                self.forward_winograd(input, output)
            });
        } else {
            for_each_batch(inputs, outputs, |input, output| {
                self.forward_im2col(input, output)
            });
        }
        Ok(())
    }
}
