//! Spatial manipulation: padding and filling

use ndarray::{s, Array3};

use super::types::Tensor;

impl Tensor {
    /// Return a copy padded on the spatial borders with a constant value.
    ///
    /// `padding` is `[top, bottom, left, right]` in cells; the channel
    /// count is unchanged. Convolution uses this for its zero-padding and
    /// for aligning inputs to the Winograd tile grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::from_elem((1, 2, 2), 1.0);
    /// let padded = map.pad([1, 1, 1, 1], 0.0);
    /// assert_eq!(padded.shape(), (1, 4, 4));
    /// // Border is the fill value, the interior is the original
    /// assert_eq!(padded.channel(0)[[0, 0]], 0.0);
    /// assert_eq!(padded.channel(0)[[1, 1]], 1.0);
    /// ```
    pub fn pad(&self, padding: [usize; 4], value: f32) -> Tensor {
        let [top, bottom, left, right] = padding;
        if top == 0 && bottom == 0 && left == 0 && right == 0 {
            return self.clone();
        }

        let (channels, rows, cols) = self.shape();
        let mut data = Array3::from_elem((channels, rows + top + bottom, cols + left + right), value);
        data.slice_mut(s![.., top..top + rows, left..left + cols])
            .assign(&self.data);
        Tensor { data }
    }

    /// Overwrite every element with `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let mut bias = Tensor::new(1, 1, 1);
    /// bias.fill(0.25);
    /// assert_eq!(bias.first(), Some(&0.25));
    /// ```
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_shape() {
        let map = Tensor::new(2, 3, 4);
        let padded = map.pad([1, 2, 3, 4], 0.0);
        assert_eq!(padded.shape(), (2, 6, 11));
    }

    #[test]
    fn test_pad_zero_amounts_is_identity() {
        let map = Tensor::random_uniform((2, 3, 3), -1.0, 1.0);
        let padded = map.pad([0, 0, 0, 0], 7.0);
        assert_eq!(padded, map);
    }

    #[test]
    fn test_pad_centers_original_values() {
        let map = Tensor::from_vec((1..=4).map(|v| v as f32).collect(), (1, 2, 2)).unwrap();
        let padded = map.pad([1, 1, 1, 1], 0.0);

        assert_eq!(padded.shape(), (1, 4, 4));
        assert_eq!(padded.channel(0)[[1, 1]], 1.0);
        assert_eq!(padded.channel(0)[[1, 2]], 2.0);
        assert_eq!(padded.channel(0)[[2, 1]], 3.0);
        assert_eq!(padded.channel(0)[[2, 2]], 4.0);

        // Every border cell is the fill value
        for r in 0..4 {
            for c in 0..4 {
                if r == 0 || r == 3 || c == 0 || c == 3 {
                    assert_eq!(padded.channel(0)[[r, c]], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_pad_asymmetric() {
        let map = Tensor::from_elem((1, 1, 1), 5.0);
        let padded = map.pad([0, 2, 1, 0], -1.0);
        assert_eq!(padded.shape(), (1, 3, 2));
        assert_eq!(padded.channel(0)[[0, 1]], 5.0);
        assert_eq!(padded.channel(0)[[0, 0]], -1.0);
        assert_eq!(padded.channel(0)[[2, 1]], -1.0);
    }

    #[test]
    fn test_pad_fill_value() {
        let map = Tensor::new(1, 2, 2);
        let padded = map.pad([1, 0, 0, 0], 9.0);
        assert_eq!(padded.channel(0)[[0, 0]], 9.0);
        assert_eq!(padded.channel(0)[[0, 1]], 9.0);
    }

    #[test]
    fn test_fill() {
        let mut map = Tensor::new(2, 2, 2);
        map.fill(3.0);
        assert!(map.iter().all(|&v| v == 3.0));
    }
}
