//! Symmetric eigendecomposition (`dsyevr`).

use crate::backend::{default_backend, Backend, SyevrCall, SyevrRange};
use crate::error::{check_info, lapack_int, LapackError, Result};
use crate::lu::square;
use crate::{DMat, DVec};
use tracing::{debug, warn};

/// Which eigenvalues [`dsyevr`] computes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyevWhich {
    /// Every eigenvalue.
    #[default]
    All,
    /// Eigenvalues in the half-open interval `(vl, vu]`. `estimate` is an
    /// upper bound on how many there are, between `1` and `n`.
    Interval { vl: f64, vu: f64, estimate: usize },
    /// The `il`-th through `iu`-th smallest eigenvalues, 1-based, inclusive.
    Select { il: usize, iu: usize },
}

/// Selected eigenvalues and eigenvectors of the symmetric matrix `a`.
///
/// Only the upper triangle of `a` is referenced. Every output is optional and
/// resized to the number `m` of eigenvalues found: `values` to `m`
/// (ascending), `vectors` to `n`×`m` (orthonormal columns) and `support` to
/// `2m`, where entries `2k` and `2k + 1` are the 1-based first and last
/// nonzero rows of eigenvector `k`.
///
/// `abstol` is the absolute error tolerance handed to LAPACK; `0.0` selects
/// its default.
pub fn dsyevr(
    a: &DMat,
    which: SyevWhich,
    abstol: f64,
    values: Option<&mut DVec>,
    vectors: Option<&mut DMat>,
    support: Option<&mut DVec<i32>>,
) -> Result<()> {
    dsyevr_with(default_backend(), a, which, abstol, values, vectors, support)
}

/// [`dsyevr`] on an explicit backend.
pub fn dsyevr_with(
    backend: &dyn Backend,
    a: &DMat,
    which: SyevWhich,
    abstol: f64,
    values: Option<&mut DVec>,
    vectors: Option<&mut DMat>,
    support: Option<&mut DVec<i32>>,
) -> Result<()> {
    let n = square(a)?;
    let (range, capacity) = match which {
        SyevWhich::All => (SyevrRange::All, n),
        SyevWhich::Interval { vl, vu, estimate } => {
            if estimate < 1 || estimate > n {
                return Err(LapackError::InvalidInput(format!(
                    "estimated number of eigenvalues must be between 1 and {n}, got {estimate}"
                )));
            }
            // The count is unknown until the call returns.
            (SyevrRange::Value { vl, vu }, n)
        }
        SyevWhich::Select { il, iu } => {
            // An empty matrix selects the empty range `il = 1, iu = 0`.
            let empty = n == 0 && il == 1 && iu == 0;
            if iu < il && !empty {
                return Err(LapackError::InvalidInput(format!(
                    "upper eigenvalue index {iu} is below lower index {il}"
                )));
            }
            let range = SyevrRange::Index { il: lapack_int(il)?, iu: lapack_int(iu)? };
            (range, (iu + 1).saturating_sub(il).min(n))
        }
    };

    let wantz = vectors.is_some() || support.is_some();
    let ld = a.leading_dim();
    let (ni, lda) = (lapack_int(n)?, lapack_int(ld)?);

    let mut work = a.as_slice().to_vec();
    let mut m = 0;
    let mut w = vec![0.0; n];
    let mut z = if wantz { vec![0.0; ld * capacity.max(1)] } else { Vec::new() };
    let mut isuppz = vec![0; 2 * n.max(1)];

    debug!(backend = backend.name(), n, ?which, wantz, "dsyevr");
    let info = backend.dsyevr(SyevrCall {
        range,
        n: ni,
        a: work.as_mut_slice(),
        lda,
        abstol,
        m: &mut m,
        w: w.as_mut_slice(),
        z: if wantz { Some(z.as_mut_slice()) } else { None },
        ldz: lda,
        isuppz: isuppz.as_mut_slice(),
    });
    if check_info("dsyevr", info)? > 0 {
        warn!(info, "dsyevr: internal error");
        return Err(LapackError::Failed { routine: "dsyevr", info });
    }

    let m = m.max(0) as usize;
    debug!(m, "dsyevr found eigenvalues");
    if let Some(values) = values {
        w.truncate(m);
        *values = DVec::from_vec(w);
    }
    if let Some(vectors) = vectors {
        z.resize(ld * capacity.max(1), 0.0);
        let mut out = DMat::from_raw(n, capacity, z[..n * capacity].to_vec());
        out.resize(n, m);
        *vectors = out;
    }
    if let Some(support) = support {
        isuppz.truncate(2 * m);
        *support = DVec::from_vec(isuppz);
    }
    Ok(())
}
