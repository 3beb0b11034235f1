//! im2col unfolding for grouped convolution as a matrix product
//!
//! The generic convolution path lowers each group to one GEMM:
//!
//! - [`im2col`] unfolds the receptive fields of one channel group into a
//!   matrix with one column per output position.
//! - [`flatten_kernels`] lays the group's kernels out as matrix rows with
//!   the same element order, so `weight_row . im2col_column` is exactly
//!   the convolution sum at that position.
//!
//! Both sides flatten each receptive-field plane column-major (kernel
//! column outer, kernel row inner) and block rows by channel; output
//! positions are enumerated column-major as well, so a flat result index
//! `p` lands at output row `p % output_h`, column `p / output_h`.

use std::ops::Range;

use ndarray::{Array2, ArrayView3, Axis};

use crate::error::{KernelError, KernelResult};

/// Output spatial dimensions of a valid convolution over an already
/// padded input: `(dim - kernel) / stride + 1` per axis.
///
/// # Arguments
///
/// * `input` - Padded input extent `(rows, cols)`
/// * `kernel` - Kernel extent `(height, width)`
/// * `stride` - Step `(vertical, horizontal)`
///
/// # Errors
///
/// Zero stride, zero kernel extent, or a kernel exceeding the input
/// extent cannot produce any output position.
///
/// # Examples
///
/// ```
/// use inferso_kernels::conv_output_dims;
///
/// assert_eq!(conv_output_dims((4, 4), (3, 3), (1, 1)).unwrap(), (2, 2));
/// // 8x8 padded by 1 on each side, kernel 3, stride 2
/// assert_eq!(conv_output_dims((10, 10), (3, 3), (2, 2)).unwrap(), (4, 4));
/// assert!(conv_output_dims((4, 4), (5, 5), (1, 1)).is_err());
/// assert!(conv_output_dims((4, 4), (3, 3), (0, 1)).is_err());
/// ```
pub fn conv_output_dims(
    input: (usize, usize),
    kernel: (usize, usize),
    stride: (usize, usize),
) -> KernelResult<(usize, usize)> {
    let (input_h, input_w) = input;
    let (kernel_h, kernel_w) = kernel;
    let (stride_h, stride_w) = stride;

    if stride_h == 0 || stride_w == 0 {
        return Err(KernelError::invalid_geometry(
            "conv_output_dims",
            format!("stride must be at least 1, got ({stride_h}, {stride_w})"),
        ));
    }
    if kernel_h == 0 || kernel_w == 0 {
        return Err(KernelError::invalid_geometry(
            "conv_output_dims",
            format!("kernel extent must be at least 1, got ({kernel_h}, {kernel_w})"),
        ));
    }
    if kernel_h > input_h || kernel_w > input_w {
        return Err(KernelError::dimension_mismatch(
            "conv_output_dims",
            vec![kernel_h, kernel_w],
            vec![input_h, input_w],
            "Kernel cannot exceed the input extent",
        ));
    }

    Ok((
        (input_h - kernel_h) / stride_h + 1,
        (input_w - kernel_w) / stride_w + 1,
    ))
}

/// Unfold one channel group's receptive fields into a matrix.
///
/// The result has `channels.len() * kernel_h * kernel_w` rows (blocked by
/// channel) and `output_h * output_w` columns. Column `p` holds the
/// receptive field of output position `(p % output_h, p / output_h)`;
/// within a channel block, element `kc * kernel_h + kr` is the input cell
/// at kernel offset `(kr, kc)`.
///
/// # Arguments
///
/// * `input` - The padded input, channel-major `(channels, rows, cols)`
/// * `channels` - Channel index range of this group
/// * `kernel` - Kernel extent `(height, width)`
/// * `stride` - Step `(vertical, horizontal)`
/// * `output` - Output extent `(height, width)` from [`conv_output_dims`]
///
/// # Panics
///
/// Panics if the channel range or the receptive-field extent exceeds the
/// input; callers validate geometry before unfolding.
///
/// # Examples
///
/// ```
/// use inferso_kernels::im2col;
/// use ndarray::arr3;
///
/// let input = arr3(&[[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]]);
/// let mat = im2col(&input.view(), 0..1, (2, 2), (1, 1), (2, 2));
///
/// assert_eq!(mat.dim(), (4, 4));
/// // Column 0 is the field at output (0, 0), column-slices stacked
/// assert_eq!(mat.column(0).to_vec(), vec![1.0, 4.0, 2.0, 5.0]);
/// // Output position (row 0, col 1) lives in column 1 * output_h + 0
/// assert_eq!(mat.column(2).to_vec(), vec![2.0, 5.0, 3.0, 6.0]);
/// ```
pub fn im2col(
    input: &ArrayView3<'_, f32>,
    channels: Range<usize>,
    kernel: (usize, usize),
    stride: (usize, usize),
    output: (usize, usize),
) -> Array2<f32> {
    let (kernel_h, kernel_w) = kernel;
    let (stride_h, stride_w) = stride;
    let (output_h, output_w) = output;
    let (input_c, input_h, input_w) = input.dim();

    assert!(
        !channels.is_empty() && channels.end <= input_c,
        "channel range {:?} out of bounds for {} input channels",
        channels,
        input_c
    );
    assert!(
        (output_h - 1) * stride_h + kernel_h <= input_h
            && (output_w - 1) * stride_w + kernel_w <= input_w,
        "receptive fields exceed the input extent {:?}",
        (input_h, input_w)
    );

    let row_len = kernel_h * kernel_w;
    let group_channels = channels.len();
    let col_len = output_h * output_w;
    let mut mat = Array2::<f32>::zeros((group_channels * row_len, col_len));

    for (ci, c) in channels.enumerate() {
        let plane = input.index_axis(Axis(0), c);
        let base = ci * row_len;
        // Output positions column-major: horizontal outer, vertical inner
        for pc in 0..output_w {
            let w0 = pc * stride_w;
            for pr in 0..output_h {
                let r0 = pr * stride_h;
                let col = pc * output_h + pr;
                for kc in 0..kernel_w {
                    // One column-slice of the receptive field
                    for kr in 0..kernel_h {
                        mat[[base + kc * kernel_h + kr, col]] = plane[[r0 + kr, w0 + kc]];
                    }
                }
            }
        }
    }
    mat
}

/// Lay out a group's kernels as the rows of a weight matrix.
///
/// Row `k` is kernel `k` with its channel planes concatenated; each plane
/// is flattened column-major (kernel column outer, kernel row inner) to
/// match the [`im2col`] column layout.
///
/// # Panics
///
/// Panics if `kernels` is empty or the kernels disagree in shape.
///
/// # Examples
///
/// ```
/// use inferso_kernels::flatten_kernels;
/// use ndarray::arr3;
///
/// let kernel = arr3(&[[[1.0, 2.0], [3.0, 4.0]]]);
/// let mat = flatten_kernels(&[kernel.view()]);
/// assert_eq!(mat.dim(), (1, 4));
/// assert_eq!(mat.row(0).to_vec(), vec![1.0, 3.0, 2.0, 4.0]);
/// ```
pub fn flatten_kernels(kernels: &[ArrayView3<'_, f32>]) -> Array2<f32> {
    assert!(!kernels.is_empty(), "kernel group must not be empty");
    let (channels, kernel_h, kernel_w) = kernels[0].dim();
    let row_len = kernel_h * kernel_w;

    let mut mat = Array2::<f32>::zeros((kernels.len(), channels * row_len));
    for (row, kernel) in kernels.iter().enumerate() {
        assert_eq!(
            kernel.dim(),
            (channels, kernel_h, kernel_w),
            "kernel {} disagrees with the group shape",
            row
        );
        for c in 0..channels {
            let plane = kernel.index_axis(Axis(0), c);
            let base = c * row_len;
            for kc in 0..kernel_w {
                for kr in 0..kernel_h {
                    mat[[row, base + kc * kernel_h + kr]] = plane[[kr, kc]];
                }
            }
        }
    }
    mat
}
