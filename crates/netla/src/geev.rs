//! General (nonsymmetric) eigendecomposition: `dgeev` and `dgeevx`.
//!
//! Real eigenvalues come with real eigenvectors. A complex conjugate pair
//! occupies two consecutive slots, the one with positive imaginary part
//! first, and its eigenvector `v = re + i·im` is stored as the column pair
//! `(re, im)`; the second eigenvalue's vector is the conjugate. Every
//! eigenvector is scaled to unit Euclidean norm with its largest component
//! real.

use crate::backend::{default_backend, Backend, GeevCall, GeevxCall, Sense};
use crate::error::{check_info, lapack_int, Result};
use crate::lu::square;
use crate::{DMat, DVec};
use tracing::{debug, warn};

/// Balancing applied by [`dgeevx`] before computing eigenvalues.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Balance {
    #[default]
    None,
    /// Permute to isolate eigenvalues where possible.
    Permute,
    /// Diagonally scale to make row and column norms comparable.
    Scale,
    /// Permute, then scale.
    Both,
}

impl Balance {
    /// LAPACK's `BALANC` character.
    pub fn as_char(self) -> u8 {
        match self {
            Self::None => b'N',
            Self::Permute => b'P',
            Self::Scale => b'S',
            Self::Both => b'B',
        }
    }

    pub fn permutes(self) -> bool {
        matches!(self, Self::Permute | Self::Both)
    }

    pub fn scales(self) -> bool {
        matches!(self, Self::Scale | Self::Both)
    }
}

/// Eigenvalues and, optionally, left/right eigenvectors of the square matrix
/// `a`, which is not modified.
///
/// Requested value vectors are resized to `n` and vector matrices to `n`×`n`.
/// Left eigenvectors satisfy `uᴴ A = λ uᴴ`, right ones `A v = λ v`.
///
/// Returns LAPACK's `info`: `0`, or `i > 0` when the QR algorithm failed;
/// eigenvalues `i+1..n` (1-based) have then converged and no eigenvectors
/// were computed.
pub fn dgeev(
    a: &DMat,
    values_real: Option<&mut DVec>,
    values_imag: Option<&mut DVec>,
    vectors_left: Option<&mut DMat>,
    vectors_right: Option<&mut DMat>,
) -> Result<i32> {
    dgeev_with(default_backend(), a, values_real, values_imag, vectors_left, vectors_right)
}

/// [`dgeev`] on an explicit backend.
pub fn dgeev_with(
    backend: &dyn Backend,
    a: &DMat,
    values_real: Option<&mut DVec>,
    values_imag: Option<&mut DVec>,
    vectors_left: Option<&mut DMat>,
    vectors_right: Option<&mut DMat>,
) -> Result<i32> {
    let n = square(a)?;
    let ld = a.leading_dim();
    let (ni, lda) = (lapack_int(n)?, lapack_int(ld)?);

    let mut work = a.as_slice().to_vec();
    let (mut wr, mut wi) = (vec![0.0; n], vec![0.0; n]);
    let mut vl = vectors_left.is_some().then(|| vec![0.0; ld * n]);
    let mut vr = vectors_right.is_some().then(|| vec![0.0; ld * n]);

    debug!(backend = backend.name(), n, left = vl.is_some(), right = vr.is_some(), "dgeev");
    let info = backend.dgeev(GeevCall {
        n: ni,
        a: work.as_mut_slice(),
        lda,
        wr: wr.as_mut_slice(),
        wi: wi.as_mut_slice(),
        vl: vl.as_deref_mut(),
        ldvl: lda,
        vr: vr.as_deref_mut(),
        ldvr: lda,
    });
    let info = check_info("dgeev", info)?;
    if info > 0 {
        warn!(info, "dgeev: QR algorithm failed to compute all eigenvalues");
    }

    store_values(values_real, wr);
    store_values(values_imag, wi);
    store_vectors(vectors_left, vl, n);
    store_vectors(vectors_right, vr, n);
    Ok(info)
}

/// Optional outputs of [`dgeevx`]. Unset fields are not computed, except
/// that requesting `rconde` makes both eigenvector sets be computed
/// internally.
#[derive(Debug, Default)]
pub struct GeevxOutputs<'a> {
    pub values_real: Option<&'a mut DVec>,
    pub values_imag: Option<&'a mut DVec>,
    pub vectors_left: Option<&'a mut DMat>,
    pub vectors_right: Option<&'a mut DMat>,
    /// Permutation and scaling applied by balancing: entry `j` is the 1-based
    /// index row/column `j` was interchanged with when `j` lies outside
    /// `ilo..=ihi`, and the scaling factor of `j` otherwise.
    pub scale: Option<&'a mut DVec>,
    /// Reciprocal condition numbers of the eigenvalues.
    pub rconde: Option<&'a mut DVec>,
    /// Reciprocal condition numbers of the right eigenvectors.
    pub rcondv: Option<&'a mut DVec>,
}

/// Scalar results of [`dgeevx`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeevxReport {
    /// 1-based: after balancing, `A(i, j) = 0` when `i > j` and
    /// `j < ilo` or `i > ihi`.
    pub ilo: i32,
    pub ihi: i32,
    /// One-norm of the balanced matrix.
    pub abnrm: f64,
    /// LAPACK's `info`, as for [`dgeev`].
    pub info: i32,
}

/// [`dgeev`] with balancing and reciprocal condition numbers.
pub fn dgeevx(balance: Balance, a: &DMat, outputs: GeevxOutputs<'_>) -> Result<GeevxReport> {
    dgeevx_with(default_backend(), balance, a, outputs)
}

/// [`dgeevx`] on an explicit backend.
pub fn dgeevx_with(
    backend: &dyn Backend,
    balance: Balance,
    a: &DMat,
    outputs: GeevxOutputs<'_>,
) -> Result<GeevxReport> {
    let n = square(a)?;
    let ld = a.leading_dim();
    let (ni, lda) = (lapack_int(n)?, lapack_int(ld)?);

    let sense = Sense::from_flags(outputs.rconde.is_some(), outputs.rcondv.is_some());
    let want_left = outputs.vectors_left.is_some() || sense.eigenvalues();
    let want_right = outputs.vectors_right.is_some() || sense.eigenvalues();

    let mut work = a.as_slice().to_vec();
    let (mut wr, mut wi) = (vec![0.0; n], vec![0.0; n]);
    let mut vl = want_left.then(|| vec![0.0; ld * n]);
    let mut vr = want_right.then(|| vec![0.0; ld * n]);
    let mut scale = vec![0.0; n];
    let (mut rconde, mut rcondv) = (vec![0.0; n], vec![0.0; n]);
    let mut report = GeevxReport::default();

    debug!(backend = backend.name(), n, ?balance, ?sense, "dgeevx");
    let info = backend.dgeevx(GeevxCall {
        balance,
        sense,
        geev: GeevCall {
            n: ni,
            a: work.as_mut_slice(),
            lda,
            wr: wr.as_mut_slice(),
            wi: wi.as_mut_slice(),
            vl: vl.as_deref_mut(),
            ldvl: lda,
            vr: vr.as_deref_mut(),
            ldvr: lda,
        },
        ilo: &mut report.ilo,
        ihi: &mut report.ihi,
        scale: scale.as_mut_slice(),
        abnrm: &mut report.abnrm,
        rconde: rconde.as_mut_slice(),
        rcondv: rcondv.as_mut_slice(),
    });
    report.info = check_info("dgeevx", info)?;
    if report.info > 0 {
        warn!(info = report.info, "dgeevx: QR algorithm failed to compute all eigenvalues");
    }

    let GeevxOutputs {
        values_real,
        values_imag,
        vectors_left,
        vectors_right,
        scale: scale_out,
        rconde: rconde_out,
        rcondv: rcondv_out,
    } = outputs;
    store_values(values_real, wr);
    store_values(values_imag, wi);
    store_vectors(vectors_left, vl, n);
    store_vectors(vectors_right, vr, n);
    store_values(scale_out, scale);
    store_values(rconde_out, rconde);
    store_values(rcondv_out, rcondv);
    Ok(report)
}

fn store_values(out: Option<&mut DVec>, values: Vec<f64>) {
    if let Some(out) = out {
        *out = DVec::from_vec(values);
    }
}

fn store_vectors(out: Option<&mut DMat>, data: Option<Vec<f64>>, n: usize) {
    if let (Some(out), Some(mut data)) = (out, data) {
        data.truncate(n * n);
        *out = DMat::from_raw(n, n, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::backends;
    use crate::error::LapackError;

    /// Check `A v = λ v` for every eigenpair, with complex pairs expanded.
    /// `conj` checks `Aᵀ v = λ̄ v` instead, the defining property of left
    /// eigenvectors.
    fn assert_eigenpairs(a: &DMat, wr: &DVec, wi: &DVec, v: &DMat, conj: bool) {
        let n = a.nrows();
        let a = if conj { a.transpose() } else { a.clone() };
        let mut j = 0;
        while j < n {
            if wi[j] == 0.0 {
                let x = v.col_vec(j);
                let ax = &a * &x;
                for i in 0..n {
                    assert!((ax[i] - wr[j] * x[i]).abs() < 1e-9);
                }
                assert!((x.norm() - 1.0).abs() < 1e-10);
                j += 1;
            } else {
                assert!(wi[j] > 0.0 && wi[j + 1] == -wi[j]);
                let b = if conj { -wi[j] } else { wi[j] };
                let (re, im) = (v.col_vec(j), v.col_vec(j + 1));
                let (are, aim) = (&a * &re, &a * &im);
                for i in 0..n {
                    assert!((are[i] - (wr[j] * re[i] - b * im[i])).abs() < 1e-9);
                    assert!((aim[i] - (b * re[i] + wr[j] * im[i])).abs() < 1e-9);
                }
                let norm = (re.dot(&re) + im.dot(&im)).sqrt();
                assert!((norm - 1.0).abs() < 1e-10);
                j += 2;
            }
        }
    }

    fn mixed() -> DMat {
        // Eigenvalues 1 ± 2i and 3.
        DMat::from_row_slice(3, 3, &[1.0, 2.0, 0.5, -2.0, 1.0, 0.25, 0.0, 0.0, 3.0])
    }

    #[test]
    fn real_spectrum() {
        for backend in backends() {
            let a = DMat::from_row_slice(2, 2, &[4.0, 1.0, 2.0, 3.0]);
            let (mut wr, mut wi, mut vr) = (DVec::default(), DVec::default(), DMat::default());
            let info =
                dgeev_with(backend, &a, Some(&mut wr), Some(&mut wi), None, Some(&mut vr)).unwrap();
            assert_eq!(info, 0);
            assert!(wi.iter().all(|&x| x == 0.0));
            let mut values = wr.clone().into_vec();
            values.sort_by(f64::total_cmp);
            assert!((values[0] - 2.0).abs() < 1e-12);
            assert!((values[1] - 5.0).abs() < 1e-12);
            assert_eigenpairs(&a, &wr, &wi, &vr, false);
        }
    }

    #[test]
    fn complex_pairs_left_and_right() {
        for backend in backends() {
            let a = mixed();
            let (mut wr, mut wi) = (DVec::default(), DVec::default());
            let (mut vl, mut vr) = (DMat::default(), DMat::default());
            let info = dgeev_with(
                backend,
                &a,
                Some(&mut wr),
                Some(&mut wi),
                Some(&mut vl),
                Some(&mut vr),
            )
            .unwrap();
            assert_eq!(info, 0);
            assert_eq!(wi.iter().filter(|&&x| x != 0.0).count(), 2);
            assert_eigenpairs(&a, &wr, &wi, &vr, false);
            assert_eigenpairs(&a, &wr, &wi, &vl, true);
            // The input is left alone.
            assert_eq!(a, mixed());
        }
    }

    #[test]
    fn values_only() {
        for backend in backends() {
            let mut wi = DVec::default();
            dgeev_with(backend, &mixed(), None, Some(&mut wi), None, None).unwrap();
            let mut im = wi.into_vec();
            im.sort_by(f64::total_cmp);
            assert!((im[0] + 2.0).abs() < 1e-12);
            assert!(im[1].abs() < 1e-12);
            assert!((im[2] - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn symmetric_eigenvalues_are_well_conditioned() {
        for backend in backends() {
            let a = DMat::from_row_slice(3, 3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
            let (mut rconde, mut rcondv) = (DVec::default(), DVec::default());
            let mut wr = DVec::default();
            let report = dgeevx_with(
                backend,
                Balance::None,
                &a,
                GeevxOutputs {
                    values_real: Some(&mut wr),
                    rconde: Some(&mut rconde),
                    rcondv: Some(&mut rcondv),
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(report.info, 0);
            assert_eq!((report.ilo, report.ihi), (1, 3));
            assert!((report.abnrm - 4.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((rconde[j] - 1.0).abs() < 1e-10);
                assert!(rcondv[j] > 0.0);
            }
        }
    }

    #[test]
    fn separation_of_diagonal_spectrum() {
        for backend in backends() {
            let d = [1.0, 2.0, 4.0];
            let a = DMat::from_fn(3, 3, |i, j| if i == j { d[i] } else { 0.0 });
            let (mut wr, mut rcondv) = (DVec::default(), DVec::default());
            dgeevx_with(
                backend,
                Balance::None,
                &a,
                GeevxOutputs {
                    values_real: Some(&mut wr),
                    rcondv: Some(&mut rcondv),
                    ..Default::default()
                },
            )
            .unwrap();
            for j in 0..3 {
                let sep = d
                    .iter()
                    .filter(|&&x| (x - wr[j]).abs() > 1e-9)
                    .map(|x| (x - wr[j]).abs())
                    .fold(f64::INFINITY, f64::min);
                assert!((rcondv[j] - sep).abs() < 1e-10, "{}", backend.name());
            }
        }
    }

    #[test]
    fn permuting_isolates_triangular_matrix() {
        for backend in backends() {
            let a = DMat::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 0.0, 6.0]);
            let (mut wr, mut scale) = (DVec::default(), DVec::default());
            let report = dgeevx_with(
                backend,
                Balance::Permute,
                &a,
                GeevxOutputs {
                    values_real: Some(&mut wr),
                    scale: Some(&mut scale),
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(report.ilo, report.ihi);
            assert!((report.abnrm - 14.0).abs() < 1e-12);
            assert_eq!(scale.len(), 3);
            let mut values = wr.into_vec();
            values.sort_by(f64::total_cmp);
            for (got, want) in values.iter().zip([1.0, 4.0, 6.0]) {
                assert!((got - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn scaling_shrinks_norm_and_keeps_eigenvectors() {
        for backend in backends() {
            let a = DMat::from_row_slice(2, 2, &[1.0, 1e4, 1e-4, 1.0]);
            let (mut wr, mut wi, mut vr) = (DVec::default(), DVec::default(), DMat::default());
            let report = dgeevx_with(
                backend,
                Balance::Both,
                &a,
                GeevxOutputs {
                    values_real: Some(&mut wr),
                    values_imag: Some(&mut wi),
                    vectors_right: Some(&mut vr),
                    ..Default::default()
                },
            )
            .unwrap();
            assert!(report.abnrm < 100.0);
            let mut values = wr.clone().into_vec();
            values.sort_by(f64::total_cmp);
            assert!(values[0].abs() < 1e-9);
            assert!((values[1] - 2.0).abs() < 1e-9);
            assert_eigenpairs(&a, &wr, &wi, &vr, false);
        }
    }

    #[test]
    fn non_square_is_rejected() {
        let a = DMat::zeros(2, 3);
        assert_eq!(
            dgeevx(Balance::Both, &a, GeevxOutputs::default()),
            Err(LapackError::NonSquare { rows: 2, cols: 3 })
        );
        assert!(dgeev(&a, None, None, None, None).is_err());
    }

    #[test]
    fn balance_characters() {
        assert_eq!(Balance::None.as_char(), b'N');
        assert_eq!(Balance::Permute.as_char(), b'P');
        assert_eq!(Balance::Scale.as_char(), b'S');
        assert_eq!(Balance::Both.as_char(), b'B');
        assert!(Balance::Both.permutes() && Balance::Both.scales());
        assert!(!Balance::Scale.permutes());
    }
}
