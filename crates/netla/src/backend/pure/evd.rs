//! Nonsymmetric eigendecomposition in LAPACK's output layout.

use faer::diag::Diag;
use faer::dyn_stack::{MemBuffer, MemStack};
use faer::linalg::evd::{evd_real, evd_scratch, EvdError};
use faer::{MatMut, MatRef, Par};

use super::compute;

/// Eigenvalues and (optionally) eigenvectors of a dense `n`×`n` matrix.
///
/// Complex conjugate pairs occupy consecutive slots, the one with positive
/// imaginary part first; the matching vectors are stored as a real column
/// followed by an imaginary column.
pub(super) struct RealEvd {
    pub wr: Vec<f64>,
    pub wi: Vec<f64>,
    pub vl: Option<Vec<f64>>,
    pub vr: Option<Vec<f64>>,
}

/// Copy a strided `n`×`n` block into a dense stride-`n` buffer.
pub(super) fn dense_copy(a: &[f64], n: usize, lda: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n * n);
    for j in 0..n {
        out.extend_from_slice(&a[j * lda..j * lda + n]);
    }
    out
}

pub(super) fn real_evd(
    a: &[f64],
    n: usize,
    left: bool,
    right: bool,
) -> Result<RealEvd, EvdError> {
    let mut s_re = Diag::<f64>::zeros(n);
    let mut s_im = Diag::<f64>::zeros(n);
    let mut vl = left.then(|| vec![0.0; n * n]);
    let mut vr = right.then(|| vec![0.0; n * n]);

    let params = Default::default();
    let mut mem = MemBuffer::new(evd_scratch::<f64>(
        n,
        compute(left),
        compute(right),
        Par::Seq,
        params,
    ));
    evd_real(
        MatRef::from_column_major_slice(a, n, n),
        s_re.as_mut(),
        s_im.as_mut(),
        vl.as_deref_mut().map(|v| MatMut::from_column_major_slice_mut(v, n, n)),
        vr.as_deref_mut().map(|v| MatMut::from_column_major_slice_mut(v, n, n)),
        Par::Seq,
        MemStack::new(&mut mem),
        params,
    )?;

    let wr: Vec<f64> = s_re.column_vector().iter().copied().collect();
    let mut wi: Vec<f64> = s_im.column_vector().iter().copied().collect();

    let mut j = 0;
    while j < n {
        if wi[j] == 0.0 || j + 1 == n {
            j += 1;
            continue;
        }
        if wi[j] < 0.0 {
            wi[j] = -wi[j];
            wi[j + 1] = -wi[j + 1];
            for v in [vl.as_deref_mut(), vr.as_deref_mut()].into_iter().flatten() {
                v[(j + 1) * n..(j + 2) * n].iter_mut().for_each(|x| *x = -*x);
            }
        }
        j += 2;
    }

    Ok(RealEvd { wr, wi, vl, vr })
}

/// Scale every eigenvector to unit Euclidean norm. Complex vectors are
/// additionally rotated so their component of largest modulus is real.
pub(super) fn normalize(n: usize, wi: &[f64], v: &mut [f64]) {
    let mut j = 0;
    while j < n {
        if wi[j] == 0.0 {
            let col = &mut v[j * n..(j + 1) * n];
            let norm = col.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                col.iter_mut().for_each(|x| *x /= norm);
            }
            j += 1;
            continue;
        }

        let (re, im) = v[j * n..(j + 2) * n].split_at_mut(n);
        let norm = re.iter().chain(im.iter()).map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            re.iter_mut().chain(im.iter_mut()).for_each(|x| *x /= norm);
        }
        let k = (0..n)
            .max_by(|&p, &q| {
                let mp = re[p] * re[p] + im[p] * im[p];
                let mq = re[q] * re[q] + im[q] * im[q];
                mp.total_cmp(&mq)
            })
            .unwrap_or(0);
        let r = re[k].hypot(im[k]);
        if r > 0.0 {
            let (cs, sn) = (re[k] / r, im[k] / r);
            for (x, y) in re.iter_mut().zip(im.iter_mut()) {
                let (a, b) = (*x, *y);
                *x = cs * a + sn * b;
                *y = cs * b - sn * a;
            }
            im[k] = 0.0;
        }
        j += 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_pair_is_ordered() {
        // [[0, -1], [1, 0]] has eigenvalues ±i.
        let a = [0.0, 1.0, -1.0, 0.0];
        let out = real_evd(&a, 2, false, true).unwrap();
        assert!(out.wr.iter().all(|x| x.abs() < 1e-12));
        assert!((out.wi[0] - 1.0).abs() < 1e-12);
        assert!((out.wi[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_complex_vector_has_real_peak() {
        let a = [0.0, 1.0, -1.0, 0.0];
        let mut out = real_evd(&a, 2, false, true).unwrap();
        let v = out.vr.as_mut().unwrap();
        normalize(2, &out.wi, v);
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        // One imaginary component was zeroed by the rotation.
        assert!(v[2] == 0.0 || v[3] == 0.0);
    }

    #[test]
    fn non_finite_input_fails() {
        let a = [f64::NAN, 0.0, 0.0, 1.0];
        assert!(real_evd(&a, 2, false, false).is_err());
    }
}
