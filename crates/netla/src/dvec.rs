use core::fmt::Debug;
use core::ops::{Index, IndexMut};

/// Element types a [`DVec`] can hold: `f64` for real data, `i32` for
/// LAPACK `INTEGER` arrays (pivots, eigenvector supports).
pub trait Element: Copy + Default + PartialEq + Debug + 'static {}

impl Element for f64 {}
impl Element for i32 {}

/// Heap-allocated vector.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DVec<T = f64> {
    data: Vec<T>,
}

impl<T: Element> DVec<T> {
    /// Create from raw data.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a zero (default-filled) vector of given length.
    pub fn zeros(n: usize) -> Self {
        Self { data: vec![T::default(); n] }
    }

    /// Create from a function.
    pub fn from_fn(n: usize, f: impl Fn(usize) -> T) -> Self {
        Self { data: (0..n).map(f).collect() }
    }

    /// Create from a slice.
    pub fn from_slice(s: &[T]) -> Self {
        Self { data: s.to_vec() }
    }

    #[inline]
    pub fn len(&self) -> usize { self.data.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    #[inline]
    pub fn as_slice(&self) -> &[T] { &self.data }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] { &mut self.data }

    #[inline]
    pub fn into_vec(self) -> Vec<T> { self.data }

    /// Resize to `n` elements. Existing elements are kept, new ones are
    /// default-filled.
    pub fn resize(&mut self, n: usize) {
        self.data.resize(n, T::default());
    }

    /// Iterator over elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl DVec<f64> {
    /// Dot product.
    pub fn dot(&self, other: &DVec<f64>) -> f64 {
        assert_eq!(self.len(), other.len(), "DVec dot: length mismatch");
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Max absolute value.
    pub fn amax(&self) -> f64 {
        self.data.iter().fold(0.0, |m, x| m.max(x.abs()))
    }
}

impl<T: Element> From<Vec<T>> for DVec<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Element> Index<usize> for DVec<T> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &T { &self.data[i] }
}

impl<T: Element> IndexMut<usize> for DVec<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T { &mut self.data[i] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product() {
        let a = DVec::from_slice(&[1.0, 2.0, 3.0]);
        let b = DVec::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn norm() {
        let v = DVec::from_slice(&[3.0, 4.0]);
        assert!((v.norm() - 5.0).abs() < 1e-10);
        assert_eq!(DVec::from_slice(&[-7.0, 2.0]).amax(), 7.0);
    }

    #[test]
    fn resize_keeps_prefix() {
        let mut v: DVec<i32> = DVec::from_slice(&[3, 1, 2]);
        v.resize(5);
        assert_eq!(v.as_slice(), &[3, 1, 2, 0, 0]);
        v.resize(2);
        assert_eq!(v.as_slice(), &[3, 1]);
    }
}
