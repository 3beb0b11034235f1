//! Core tensor type definition

use ndarray::{Array3, ArrayView2, ArrayViewMut2, Axis};

/// A rank-3 `f32` feature map in channel-major order.
///
/// The logical shape is `(channels, rows, cols)`: axis 0 indexes channels
/// and each channel is a contiguous `rows x cols` spatial plane. This is
/// the runtime currency of the inference engine; every operator consumes
/// and produces batches of these.
///
/// Cloning deep-copies the storage. Equality compares shapes and every
/// element.
///
/// # Examples
///
/// ```
/// use inferso_core::Tensor;
///
/// let map = Tensor::new(2, 3, 4);
/// assert_eq!(map.channels(), 2);
/// assert_eq!(map.rows(), 3);
/// assert_eq!(map.cols(), 4);
/// assert_eq!(map.len(), 24);
/// assert!(!map.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tensor {
    /// Underlying ndarray storage
    pub(crate) data: Array3<f32>,
}

impl Tensor {
    /// Return the shape as `(channels, rows, cols)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::new(3, 224, 224);
    /// assert_eq!(map.shape(), (3, 224, 224));
    /// ```
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of channels (axis 0).
    pub fn channels(&self) -> usize {
        self.data.dim().0
    }

    /// Number of spatial rows (axis 1).
    pub fn rows(&self) -> usize {
        self.data.dim().1
    }

    /// Number of spatial columns (axis 2).
    pub fn cols(&self) -> usize {
        self.data.dim().2
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if any dimension is zero.
    ///
    /// The default `(0, 0, 0)` tensor is empty; operators treat an empty
    /// output slot as a request for lazy allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// assert!(Tensor::default().is_empty());
    /// assert!(!Tensor::new(1, 1, 1).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        let (channels, rows, cols) = self.shape();
        channels == 0 || rows == 0 || cols == 0
    }

    /// Zero-copy view of one channel's `rows x cols` plane.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::from_elem((2, 3, 3), 1.5);
    /// let plane = map.channel(1);
    /// assert_eq!(plane.dim(), (3, 3));
    /// assert_eq!(plane[[0, 0]], 1.5);
    /// ```
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), channel)
    }

    /// Mutable zero-copy view of one channel's plane.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn channel_mut(&mut self, channel: usize) -> ArrayViewMut2<'_, f32> {
        self.data.index_axis_mut(Axis(0), channel)
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array3<f32> {
        &self.data
    }

    /// Mutably borrow the underlying array.
    pub fn as_array_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    /// Iterate over all elements in storage order (channel, row, column).
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.data.iter()
    }

    /// Mutably iterate over all elements in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.data.iter_mut()
    }
}

impl Default for Tensor {
    /// The empty `(0, 0, 0)` tensor.
    fn default() -> Self {
        Self {
            data: Array3::zeros((0, 0, 0)),
        }
    }
}
