//! End-to-end tests of the public API across every compiled backend.

use netla::{
    backends, dgeev_with, dgeevx_with, dgesv_with, dgetrf_with, dgetrs_with, dsyevr_with, Balance,
    DMat, DVec, GeevxOutputs, LapackError, SyevWhich, Transpose,
};

/// Laplacian of a 5-cycle plus a diagonal shift; symmetric with a repeated
/// eigenvalue pair.
fn cycle_laplacian() -> DMat {
    let n = 5;
    DMat::from_fn(n, n, |i, j| {
        if i == j {
            2.5
        } else if (i + 1) % n == j || (j + 1) % n == i {
            -1.0
        } else {
            0.0
        }
    })
}

fn nonsymmetric() -> DMat {
    DMat::from_row_slice(
        4,
        4,
        &[
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
            -1.0, 2.0, 0.5, 1.0,
        ],
    )
}

fn sorted(v: &DVec) -> Vec<f64> {
    let mut v = v.as_slice().to_vec();
    v.sort_by(f64::total_cmp);
    v
}

#[test]
fn factor_once_solve_many() -> Result<(), LapackError> {
    for backend in backends() {
        let a = cycle_laplacian();
        let mut lu = a.clone();
        let mut ipiv = DVec::default();
        assert_eq!(dgetrf_with(backend, &mut lu, Some(&mut ipiv))?, 0);

        for k in 0..3 {
            let b = DMat::from_fn(5, 1, |i, _| (i * k) as f64 - 1.0);
            for trans in [Transpose::No, Transpose::Yes] {
                let mut x = b.clone();
                dgetrs_with(backend, trans, &lu, &ipiv, &mut x)?;
                let m = if trans == Transpose::Yes { a.transpose() } else { a.clone() };
                let r = m.mul_mat(&x);
                for i in 0..5 {
                    assert!((r[(i, 0)] - b[(i, 0)]).abs() < 1e-10);
                }
            }
        }

        let mut a2 = a.clone();
        let mut x = DMat::identity(5);
        assert_eq!(dgesv_with(backend, &mut a2, None, &mut x)?, 0);
        let id = a.mul_mat(&x);
        for i in 0..5 {
            for j in 0..5 {
                let want = if i == j { 1.0 } else { 0.0 };
                assert!((id[(i, j)] - want).abs() < 1e-10);
            }
        }
    }
    Ok(())
}

#[test]
fn symmetric_and_general_solvers_agree() -> Result<(), LapackError> {
    for backend in backends() {
        let a = cycle_laplacian();
        let mut sym = DVec::default();
        dsyevr_with(backend, &a, SyevWhich::All, 0.0, Some(&mut sym), None, None)?;

        let (mut wr, mut wi) = (DVec::default(), DVec::default());
        assert_eq!(dgeev_with(backend, &a, Some(&mut wr), Some(&mut wi), None, None)?, 0);
        assert!(wi.iter().all(|x| x.abs() < 1e-12));
        for (x, y) in sym.iter().zip(sorted(&wr)) {
            assert!((x - y).abs() < 1e-10);
        }

        // Cycle Laplacian spectrum: 2.5 - 2 cos(2πk/5).
        let mut expected: Vec<f64> = (0..5)
            .map(|k| 2.5 - 2.0 * (2.0 * std::f64::consts::PI * k as f64 / 5.0).cos())
            .collect();
        expected.sort_by(f64::total_cmp);
        for (x, y) in sym.iter().zip(&expected) {
            assert!((x - y).abs() < 1e-10);
        }
    }
    Ok(())
}

#[test]
fn balancing_preserves_spectrum() -> Result<(), LapackError> {
    for backend in backends() {
        let a = nonsymmetric();
        let (mut wr0, mut wi0) = (DVec::default(), DVec::default());
        dgeev_with(backend, &a, Some(&mut wr0), Some(&mut wi0), None, None)?;

        for balance in [Balance::None, Balance::Permute, Balance::Scale, Balance::Both] {
            let (mut wr, mut wi, mut scale, mut rconde, mut rcondv) = Default::default();
            let report = dgeevx_with(
                backend,
                balance,
                &a,
                GeevxOutputs {
                    values_real: Some(&mut wr),
                    values_imag: Some(&mut wi),
                    scale: Some(&mut scale),
                    rconde: Some(&mut rconde),
                    rcondv: Some(&mut rcondv),
                    ..Default::default()
                },
            )?;
            assert_eq!(report.info, 0);
            assert!(1 <= report.ilo && report.ilo <= report.ihi + 1 && report.ihi <= 4);
            assert!(report.abnrm > 0.0);
            assert_eq!(scale.len(), 4);
            for (x, y) in sorted(&wr).iter().zip(sorted(&wr0)) {
                assert!((x - y).abs() < 1e-9);
            }
            for (x, y) in sorted(&wi).iter().zip(sorted(&wi0)) {
                assert!((x - y).abs() < 1e-9);
            }
            for j in 0..4 {
                assert!(rconde[j] > 0.0 && rconde[j] <= 1.0 + 1e-12);
                assert!(rcondv[j] >= 0.0);
            }
        }
    }
    Ok(())
}

#[test]
fn errors_are_reported() {
    let rect = DMat::zeros(3, 2);
    let mut b = DMat::zeros(3, 1);
    for backend in backends() {
        let mut a = rect.clone();
        let err = dgesv_with(backend, &mut a, None, &mut b).unwrap_err();
        assert_eq!(err.to_string(), "matrix must be square, got 3x2");
    }
}
