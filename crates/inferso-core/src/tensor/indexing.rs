//! Element access

use std::ops::{Index, IndexMut};

use super::types::Tensor;

impl Tensor {
    /// Bounds-checked element read at `(channel, row, col)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let map = Tensor::from_elem((1, 2, 2), 6.0);
    /// assert_eq!(map.get(0, 1, 1), Some(6.0));
    /// assert_eq!(map.get(0, 2, 0), None);
    /// ```
    pub fn get(&self, channel: usize, row: usize, col: usize) -> Option<f32> {
        self.data.get([channel, row, col]).copied()
    }

    /// Bounds-checked mutable element access.
    pub fn get_mut(&mut self, channel: usize, row: usize, col: usize) -> Option<&mut f32> {
        self.data.get_mut([channel, row, col])
    }

    /// First element in storage order, if any.
    ///
    /// Operators use this to read 1x1x1 scalar tensors such as per-channel
    /// bias values.
    ///
    /// # Examples
    ///
    /// ```
    /// use inferso_core::Tensor;
    ///
    /// let bias = Tensor::from_elem((1, 1, 1), 0.5);
    /// assert_eq!(bias.first(), Some(&0.5));
    /// assert_eq!(Tensor::default().first(), None);
    /// ```
    pub fn first(&self) -> Option<&f32> {
        self.data.iter().next()
    }
}

impl Index<[usize; 3]> for Tensor {
    type Output = f32;

    /// Panicking element read at `[channel, row, col]`.
    fn index(&self, index: [usize; 3]) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<[usize; 3]> for Tensor {
    fn index_mut(&mut self, index: [usize; 3]) -> &mut f32 {
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_in_bounds() {
        let mut map = Tensor::new(1, 2, 2);
        map[[0, 0, 1]] = 2.0;
        assert_eq!(map.get(0, 0, 1), Some(2.0));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let map = Tensor::new(1, 2, 2);
        assert_eq!(map.get(1, 0, 0), None);
        assert_eq!(map.get(0, 2, 0), None);
        assert_eq!(map.get(0, 0, 2), None);
    }

    #[test]
    fn test_get_mut() {
        let mut map = Tensor::new(1, 1, 1);
        *map.get_mut(0, 0, 0).unwrap() = 5.0;
        assert_eq!(map.get(0, 0, 0), Some(5.0));
    }

    #[test]
    fn test_index_sugar() {
        let mut map = Tensor::new(2, 2, 2);
        map[[1, 1, 0]] = -1.0;
        assert_eq!(map[[1, 1, 0]], -1.0);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let map = Tensor::new(1, 1, 1);
        let _ = map[[0, 0, 1]];
    }

    #[test]
    fn test_first() {
        let map = Tensor::from_vec(vec![3.0, 4.0], (1, 1, 2)).unwrap();
        assert_eq!(map.first(), Some(&3.0));
    }

    #[test]
    fn test_first_empty() {
        assert_eq!(Tensor::default().first(), None);
    }
}
