//! Reciprocal condition numbers for `dgeevx` (the quantities `DTRSNA`
//! reports), computed from the eigenvectors of the balanced matrix.

use faer::{c64, Mat};

/// The eigenvector of slot `j` as a complex vector. `v` holds LAPACK-packed
/// vectors of an `n`×`n` problem.
fn complex_vector(n: usize, wi: &[f64], v: &[f64], j: usize) -> Vec<c64> {
    if wi[j] == 0.0 {
        return v[j * n..(j + 1) * n].iter().map(|&x| c64::new(x, 0.0)).collect();
    }
    let (re, im, sign) = if wi[j] > 0.0 {
        (&v[j * n..(j + 1) * n], &v[(j + 1) * n..(j + 2) * n], 1.0)
    } else {
        (&v[(j - 1) * n..j * n], &v[j * n..(j + 1) * n], -1.0)
    };
    re.iter().zip(im).map(|(&a, &b)| c64::new(a, sign * b)).collect()
}

fn dot(x: &[c64], y: &[c64]) -> c64 {
    x.iter().zip(y).map(|(a, b)| a.conj() * b).sum()
}

fn norm(x: &[c64]) -> f64 {
    x.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// `rconde[j] = |yⱼᴴ xⱼ| / (‖xⱼ‖ ‖yⱼ‖)` with `x`/`y` the right/left vectors.
pub(super) fn eigenvalue_conditions(
    n: usize,
    wi: &[f64],
    left: &[f64],
    right: &[f64],
    rconde: &mut [f64],
) {
    for j in 0..n {
        let x = complex_vector(n, wi, right, j);
        let y = complex_vector(n, wi, left, j);
        let denom = norm(&x) * norm(&y);
        rconde[j] = if denom > 0.0 { dot(&y, &x).norm() / denom } else { 0.0 };
    }
}

/// `rcondv[j]` is the separation of eigenvalue `λⱼ` from the rest of the
/// spectrum: the smallest singular value of `Q₂ᴴ H Q₂ - λⱼ I`, where
/// `[xⱼ/‖xⱼ‖, Q₂]` is unitary.
pub(super) fn eigenvector_conditions(
    n: usize,
    h: &[f64],
    wr: &[f64],
    wi: &[f64],
    right: &[f64],
    rcondv: &mut [f64],
) {
    if n == 1 {
        rcondv[0] = h[0].abs();
        return;
    }
    let mut j = 0;
    while j < n {
        let lambda = c64::new(wr[j], wi[j]);
        let mut x = complex_vector(n, wi, right, j);
        let nx = norm(&x);
        if nx == 0.0 {
            rcondv[j] = 0.0;
            j += 1;
            continue;
        }
        x.iter_mut().for_each(|z| *z /= nx);

        let q2 = complement(n, &x);
        let hq: Vec<Vec<c64>> = q2
            .iter()
            .map(|q| {
                (0..n)
                    .map(|r| (0..n).map(|c| q[c] * h[c * n + r]).sum::<c64>())
                    .collect()
            })
            .collect();
        let m = n - 1;
        let t = Mat::<c64>::from_fn(m, m, |a, b| {
            let e = dot(&q2[a], &hq[b]);
            if a == b { e - lambda } else { e }
        });
        let sep = t
            .singular_values()
            .ok()
            .and_then(|s| s.last().copied())
            .unwrap_or(0.0);

        rcondv[j] = sep;
        if wi[j] != 0.0 && j + 1 < n {
            rcondv[j + 1] = sep;
            j += 2;
        } else {
            j += 1;
        }
    }
}

/// An orthonormal basis of the orthogonal complement of the unit vector
/// `x`, built by Gram-Schmidt over the standard basis.
fn complement(n: usize, x: &[c64]) -> Vec<Vec<c64>> {
    let mut basis: Vec<Vec<c64>> = vec![x.to_vec()];
    for i in 0..n {
        if basis.len() == n {
            break;
        }
        let mut v = vec![c64::new(0.0, 0.0); n];
        v[i] = c64::new(1.0, 0.0);
        for _ in 0..2 {
            for q in &basis {
                let p = dot(q, &v);
                v.iter_mut().zip(q).for_each(|(vi, qi)| *vi -= p * qi);
            }
        }
        let nv = norm(&v);
        if nv > 1e-6 {
            v.iter_mut().for_each(|z| *z /= nv);
            basis.push(v);
        }
    }
    basis.remove(0);
    basis
}
