use crate::DVec;
use core::ops::{Index, IndexMut, Mul};

/// Heap-allocated column-major `f64` matrix.
///
/// Element (row, col) is stored at `data[col * nrows + row]`, which is the
/// layout LAPACK expects with a leading dimension of `max(1, nrows)`.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DMat {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl DMat {
    /// Create from raw column-major data.
    pub fn from_raw(nrows: usize, ncols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), nrows * ncols, "DMat: data length mismatch");
        Self { data, nrows, ncols }
    }

    /// Create from row-major data, the order matrices are usually written in.
    pub fn from_row_slice(nrows: usize, ncols: usize, rows: &[f64]) -> Self {
        assert_eq!(rows.len(), nrows * ncols, "DMat: data length mismatch");
        Self::from_fn(nrows, ncols, |i, j| rows[i * ncols + j])
    }

    /// Create from a function.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Zero matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self { data: vec![0.0; nrows * ncols], nrows, ncols }
    }

    /// Identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    #[inline]
    pub fn nrows(&self) -> usize { self.nrows }

    #[inline]
    pub fn ncols(&self) -> usize { self.ncols }

    /// Column stride handed to LAPACK; never zero, even for empty matrices.
    #[inline]
    pub fn leading_dim(&self) -> usize { self.nrows.max(1) }

    #[inline]
    pub fn is_square(&self) -> bool { self.nrows == self.ncols }

    /// Element access (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * self.nrows + row]
    }

    /// Set element.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[col * self.nrows + row] = val;
    }

    /// Raw column-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] { &self.data }

    /// Mutable raw column-major data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] { &mut self.data }

    /// Column slice.
    pub fn col(&self, j: usize) -> &[f64] {
        let start = j * self.nrows;
        &self.data[start..start + self.nrows]
    }

    /// Extract column as DVec.
    pub fn col_vec(&self, j: usize) -> DVec {
        DVec::from_slice(self.col(j))
    }

    /// Resize the underlying storage to `nrows * ncols` elements.
    ///
    /// The column-major prefix is kept: with an unchanged row count,
    /// shrinking drops trailing columns and growing appends zero columns.
    pub fn resize(&mut self, nrows: usize, ncols: usize) {
        self.data.resize(nrows * ncols, 0.0);
        self.nrows = nrows;
        self.ncols = ncols;
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self.get(j, i))
    }

    /// Matrix-vector product: y = A * x.
    pub fn mul_vec(&self, x: &DVec) -> DVec {
        assert_eq!(self.ncols, x.len(), "DMat mul_vec: dimension mismatch");
        let mut y = DVec::zeros(self.nrows);
        for j in 0..self.ncols {
            let xj = x[j];
            for (i, a) in self.col(j).iter().enumerate() {
                y[i] += a * xj;
            }
        }
        y
    }

    /// Matrix-matrix product: C = A * B.
    pub fn mul_mat(&self, rhs: &DMat) -> DMat {
        assert_eq!(self.ncols, rhs.nrows, "DMat mul_mat: dimension mismatch");
        let mut c = DMat::zeros(self.nrows, rhs.ncols);
        for j in 0..rhs.ncols {
            for k in 0..self.ncols {
                let b_kj = rhs.get(k, j);
                for i in 0..self.nrows {
                    c.data[j * c.nrows + i] += self.get(i, k) * b_kj;
                }
            }
        }
        c
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl Index<(usize, usize)> for DMat {
    type Output = f64;
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[col * self.nrows + row]
    }
}

impl IndexMut<(usize, usize)> for DMat {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[col * self.nrows + row]
    }
}

impl Mul<&DVec> for &DMat {
    type Output = DVec;
    fn mul(self, rhs: &DVec) -> DVec { self.mul_vec(rhs) }
}

impl Mul for &DMat {
    type Output = DMat;
    fn mul(self, rhs: &DMat) -> DMat { self.mul_mat(rhs) }
}
