//! LU factorization with partial pivoting and the solves built on it.

use crate::backend::{default_backend, Backend};
use crate::error::{check_info, lapack_int, LapackError, Result};
use crate::{DMat, DVec};
use tracing::{debug, warn};

/// Whether [`dgetrs`] solves `A X = B` or `Aᵀ X = B`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transpose {
    #[default]
    No,
    Yes,
}

impl Transpose {
    /// LAPACK's `TRANS` character.
    pub fn as_char(self) -> u8 {
        match self {
            Self::No => b'N',
            Self::Yes => b'T',
        }
    }
}

impl From<bool> for Transpose {
    fn from(transpose: bool) -> Self {
        if transpose { Self::Yes } else { Self::No }
    }
}

/// LU-factor the `m`×`n` matrix `a` in place: `A = P L U`.
///
/// On return the strict lower triangle of `a` holds `L` (unit diagonal not
/// stored) and the upper triangle holds `U`. When given, `ipiv` is resized to
/// `min(m, n)` and receives the 1-based row interchanges: row `i` was swapped
/// with row `ipiv[i]`.
///
/// Returns LAPACK's `info`: `0`, or `k > 0` when `U(k, k)` is exactly zero.
/// The factorization is complete in that case but `U` is singular.
pub fn dgetrf(a: &mut DMat, ipiv: Option<&mut DVec<i32>>) -> Result<i32> {
    dgetrf_with(default_backend(), a, ipiv)
}

/// [`dgetrf`] on an explicit backend.
pub fn dgetrf_with(
    backend: &dyn Backend,
    a: &mut DMat,
    ipiv: Option<&mut DVec<i32>>,
) -> Result<i32> {
    let (m, n) = (a.nrows(), a.ncols());
    let (mi, ni, lda) = (lapack_int(m)?, lapack_int(n)?, lapack_int(a.leading_dim())?);

    let mut scratch = DVec::default();
    let ipiv = ipiv.unwrap_or(&mut scratch);
    ipiv.resize(m.min(n));

    debug!(backend = backend.name(), m, n, "dgetrf");
    let info = backend.dgetrf(mi, ni, a.as_mut_slice(), lda, ipiv.as_mut_slice());
    let info = check_info("dgetrf", info)?;
    if info > 0 {
        warn!(info, "dgetrf: factor U is exactly singular");
    }
    Ok(info)
}

/// Solve `A X = B` (or `Aᵀ X = B`) with the factors from [`dgetrf`].
///
/// `a` and `ipiv` must come from a successful [`dgetrf`] of a square matrix.
/// `b` holds the right-hand sides as columns and is overwritten with the
/// solution.
pub fn dgetrs(trans: Transpose, a: &DMat, ipiv: &DVec<i32>, b: &mut DMat) -> Result<()> {
    dgetrs_with(default_backend(), trans, a, ipiv, b)
}

/// [`dgetrs`] on an explicit backend.
pub fn dgetrs_with(
    backend: &dyn Backend,
    trans: Transpose,
    a: &DMat,
    ipiv: &DVec<i32>,
    b: &mut DMat,
) -> Result<()> {
    let n = square(a)?;
    if b.nrows() != n {
        return Err(LapackError::DimensionMismatch {
            what: "right-hand side rows",
            expected: n,
            got: b.nrows(),
        });
    }
    if ipiv.len() != n {
        return Err(LapackError::DimensionMismatch {
            what: "pivot count",
            expected: n,
            got: ipiv.len(),
        });
    }
    for (index, &value) in ipiv.iter().enumerate() {
        if value < 1 || value as usize > n {
            return Err(LapackError::InvalidPivot { index, value });
        }
    }

    let (ni, nrhs) = (lapack_int(n)?, lapack_int(b.ncols())?);
    let (lda, ldb) = (lapack_int(a.leading_dim())?, lapack_int(b.leading_dim())?);
    debug!(backend = backend.name(), n, nrhs, ?trans, "dgetrs");
    let info =
        backend.dgetrs(trans, ni, nrhs, a.as_slice(), lda, ipiv.as_slice(), b.as_mut_slice(), ldb);
    check_info("dgetrs", info)?;
    Ok(())
}

/// Solve the square system `A X = B` by LU factorization.
///
/// On return `a` holds the factors, `ipiv` (resized to `n`) the pivots and,
/// when the returned `info` is `0`, `b` the solution. A positive `info`
/// means `U(info, info)` is exactly zero and no solution was computed.
pub fn dgesv(a: &mut DMat, ipiv: Option<&mut DVec<i32>>, b: &mut DMat) -> Result<i32> {
    dgesv_with(default_backend(), a, ipiv, b)
}

/// [`dgesv`] on an explicit backend.
pub fn dgesv_with(
    backend: &dyn Backend,
    a: &mut DMat,
    ipiv: Option<&mut DVec<i32>>,
    b: &mut DMat,
) -> Result<i32> {
    let n = square(a)?;
    if b.nrows() != n {
        return Err(LapackError::DimensionMismatch {
            what: "right-hand side rows",
            expected: n,
            got: b.nrows(),
        });
    }

    let mut scratch = DVec::default();
    let ipiv = ipiv.unwrap_or(&mut scratch);
    ipiv.resize(n);

    let (ni, nrhs) = (lapack_int(n)?, lapack_int(b.ncols())?);
    let (lda, ldb) = (lapack_int(a.leading_dim())?, lapack_int(b.leading_dim())?);
    debug!(backend = backend.name(), n, nrhs, "dgesv");
    let info =
        backend.dgesv(ni, nrhs, a.as_mut_slice(), lda, ipiv.as_mut_slice(), b.as_mut_slice(), ldb);
    let info = check_info("dgesv", info)?;
    if info > 0 {
        warn!(info, "dgesv: matrix is exactly singular, no solution computed");
    }
    Ok(info)
}

pub(crate) fn square(a: &DMat) -> Result<usize> {
    if a.is_square() {
        Ok(a.nrows())
    } else {
        Err(LapackError::NonSquare { rows: a.nrows(), cols: a.ncols() })
    }
}
