//! Tensor creation functions

use ndarray::Array3;
use rand::Rng;

use super::types::Tensor;

impl Tensor {
    /// Create a zero-filled tensor with the given dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::new(3, 8, 8);
    /// assert_eq!(map.shape(), (3, 8, 8));
    /// assert!(map.iter().all(|&v| v == 0.0));
    /// ```
    pub fn new(channels: usize, rows: usize, cols: usize) -> Self {
        Self {
            data: Array3::zeros((channels, rows, cols)),
        }
    }

    /// Create a zero-filled tensor from a shape tuple.
    pub fn zeros(shape: (usize, usize, usize)) -> Self {
        Self {
            data: Array3::zeros(shape),
        }
    }

    /// Create a tensor filled with a constant value.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::from_elem((1, 2, 2), 4.0);
    /// assert!(map.iter().all(|&v| v == 4.0));
    /// ```
    pub fn from_elem(shape: (usize, usize, usize), value: f32) -> Self {
        Self {
            data: Array3::from_elem(shape, value),
        }
    }

    /// Create a one-filled tensor.
    pub fn ones(shape: (usize, usize, usize)) -> Self {
        Self::from_elem(shape, 1.0)
    }

    /// Create a tensor from flat data in storage order (channel, row,
    /// column).
    ///
    /// # Errors
    ///
    /// Returns an error if `data.len()` does not match the shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (1, 2, 2)).unwrap();
    /// assert_eq!(map.channel(0)[[0, 1]], 2.0);
    /// assert_eq!(map.channel(0)[[1, 0]], 3.0);
    ///
    /// assert!(Tensor::from_vec(vec![1.0], (1, 2, 2)).is_err());
    /// ```
    pub fn from_vec(data: Vec<f32>, shape: (usize, usize, usize)) -> anyhow::Result<Self> {
        let (channels, rows, cols) = shape;
        anyhow::ensure!(
            data.len() == channels * rows * cols,
            "data length {} does not match shape ({}, {}, {})",
            data.len(),
            channels,
            rows,
            cols
        );
        let data = Array3::from_shape_vec(shape, data)?;
        Ok(Self { data })
    }

    /// Create a tensor from a slice in storage order.
    ///
    /// Infallible companion to [`Tensor::from_vec`] for call sites whose
    /// length is already validated.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` does not match the shape.
    pub fn from_slice(values: &[f32], shape: (usize, usize, usize)) -> Self {
        let (channels, rows, cols) = shape;
        assert_eq!(
            values.len(),
            channels * rows * cols,
            "value count {} does not match shape ({}, {}, {})",
            values.len(),
            channels,
            rows,
            cols
        );
        let mut data = Array3::zeros(shape);
        for (dst, src) in data.iter_mut().zip(values) {
            *dst = *src;
        }
        Self { data }
    }

    /// Wrap an existing `ndarray` array.
    pub fn from_array3(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Create a tensor with elements drawn uniformly from `[low, high)`.
    ///
    /// # Panics
    ///
    /// Panics if `low >= high`.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::random_uniform((2, 4, 4), -1.0, 1.0);
    /// assert!(map.iter().all(|&v| (-1.0..1.0).contains(&v)));
    /// ```
    pub fn random_uniform(shape: (usize, usize, usize), low: f32, high: f32) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            data: Array3::from_shape_fn(shape, |_| rng.gen_range(low..high)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let map = Tensor::new(2, 3, 3);
        assert!(map.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_elem() {
        let map = Tensor::from_elem((1, 2, 3), -2.5);
        assert_eq!(map.shape(), (1, 2, 3));
        assert!(map.iter().all(|&v| v == -2.5));
    }

    #[test]
    fn test_from_vec_storage_order() {
        // Two channels of 2x2: the first four values fill channel 0
        let map = Tensor::from_vec((1..=8).map(|v| v as f32).collect(), (2, 2, 2)).unwrap();
        assert_eq!(map.channel(0)[[0, 0]], 1.0);
        assert_eq!(map.channel(0)[[1, 1]], 4.0);
        assert_eq!(map.channel(1)[[0, 0]], 5.0);
        assert_eq!(map.channel(1)[[1, 1]], 8.0);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let result = Tensor::from_vec(vec![1.0, 2.0], (1, 2, 2));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_slice_matches_from_vec() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let a = Tensor::from_slice(&values, (1, 2, 3));
        let b = Tensor::from_vec(values.to_vec(), (1, 2, 3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "value count")]
    fn test_from_slice_length_mismatch_panics() {
        let _ = Tensor::from_slice(&[1.0, 2.0], (1, 2, 2));
    }

    #[test]
    fn test_random_uniform_in_range() {
        let map = Tensor::random_uniform((2, 8, 8), 3.0, 4.0);
        assert!(map.iter().all(|&v| (3.0..4.0).contains(&v)));
    }

    #[test]
    fn test_ones() {
        let map = Tensor::ones((1, 2, 2));
        assert!(map.iter().all(|&v| v == 1.0));
    }
}
