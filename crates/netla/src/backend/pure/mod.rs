//! Pure-Rust backend delegating the numerics to faer.
//!
//! Results are laid out exactly as LAPACK lays them out, and arguments are
//! checked in LAPACK's order so negative `info` values match the reference
//! implementation.

mod balance;
mod cond;
mod evd;

use super::{Backend, GeevCall, GeevxCall, SyevrCall, SyevrRange};
use crate::Transpose;
use faer::diag::Diag;
use faer::dyn_stack::{MemBuffer, MemStack};
use faer::linalg::evd::{self_adjoint_evd, self_adjoint_evd_scratch, ComputeEigenvectors};
use faer::linalg::lu::partial_pivoting::factor::{lu_in_place, lu_in_place_scratch};
use faer::linalg::triangular_solve;
use faer::{MatMut, MatRef, Par};
use tracing::{debug, trace};

/// Runs every routine on faer; no native library required.
#[derive(Copy, Clone, Debug, Default)]
pub struct FaerBackend;

#[inline]
fn compute(flag: bool) -> ComputeEigenvectors {
    if flag { ComputeEigenvectors::Yes } else { ComputeEigenvectors::No }
}

/// Apply the row interchanges recorded in `ipiv` to the `n`×`nrhs` matrix `b`,
/// forward (as `DLASWP` with `INCX = 1`) or backward.
fn swap_rows(b: &mut [f64], ldb: usize, nrhs: usize, ipiv: &[i32], forward: bool) {
    let mut apply = |i: usize| {
        let p = ipiv[i] as usize - 1;
        if p != i {
            for c in 0..nrhs {
                b.swap(c * ldb + i, c * ldb + p);
            }
        }
    };
    if forward {
        (0..ipiv.len()).for_each(&mut apply);
    } else {
        (0..ipiv.len()).rev().for_each(&mut apply);
    }
}

/// Unblocked right-looking LU, as `DGETF2`. A zero pivot column is left
/// unscaled, so the factors stay finite past a singular step.
fn getf2(m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [i32]) -> i32 {
    let mut info = 0;
    for j in 0..m.min(n) {
        let col = j * lda;
        let mut p = j;
        for i in j + 1..m {
            if a[col + i].abs() > a[col + p].abs() {
                p = i;
            }
        }
        ipiv[j] = (p + 1) as i32;

        let pivot = a[col + p];
        if pivot != 0.0 {
            if p != j {
                for c in 0..n {
                    a.swap(c * lda + j, c * lda + p);
                }
            }
            for i in j + 1..m {
                a[col + i] /= pivot;
            }
        } else if info == 0 {
            info = (j + 1) as i32;
        }

        for c in j + 1..n {
            let u = a[c * lda + j];
            if u != 0.0 {
                for i in j + 1..m {
                    a[c * lda + i] -= a[col + i] * u;
                }
            }
        }
    }
    info
}

/// Copy an `n`-column, `n`-row block from a dense stride-`n` buffer into a
/// strided output.
fn copy_out(src: &[f64], n: usize, cols: usize, dst: &mut [f64], ld: usize) {
    for j in 0..cols {
        dst[j * ld..j * ld + n].copy_from_slice(&src[j * n..j * n + n]);
    }
}

impl Backend for FaerBackend {
    fn name(&self) -> &'static str {
        "faer"
    }

    fn dgetrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32]) -> i32 {
        if m < 0 {
            return -1;
        }
        if n < 0 {
            return -2;
        }
        if lda < m.max(1) {
            return -4;
        }
        let (m, n, lda) = (m as usize, n as usize, lda as usize);
        let k = m.min(n);
        if k == 0 {
            return 0;
        }

        let original: Vec<f64> =
            (0..n).flat_map(|j| a[j * lda..j * lda + m].iter().copied()).collect();
        let mut perm = vec![0usize; m];
        let mut perm_inv = vec![0usize; m];
        {
            let lu = MatMut::from_column_major_slice_with_stride_mut(&mut *a, m, n, lda);
            let params = Default::default();
            let mut mem = MemBuffer::new(lu_in_place_scratch::<usize, f64>(m, n, Par::Seq, params));
            lu_in_place(lu, &mut perm, &mut perm_inv, Par::Seq, MemStack::new(&mut mem), params);
        }

        // faer builds `perm` by applying one transposition per column to the
        // identity; replaying it recovers LAPACK's interchange sequence.
        let mut pos: Vec<usize> = (0..m).collect();
        let mut row_at: Vec<usize> = (0..m).collect();
        for i in 0..k {
            let j = pos[perm[i]];
            ipiv[i] = (j + 1) as i32;
            if j != i {
                let (ri, rj) = (row_at[i], row_at[j]);
                row_at.swap(i, j);
                pos[ri] = j;
                pos[rj] = i;
            }
        }

        match (0..k).find(|&i| a[i * lda + i] == 0.0) {
            // faer divides by a zero pivot; redo the elimination without it.
            Some(_) => {
                for j in 0..n {
                    a[j * lda..j * lda + m].copy_from_slice(&original[j * m..j * m + m]);
                }
                getf2(m, n, a, lda, ipiv)
            }
            None => 0,
        }
    }

    fn dgetrs(
        &self,
        trans: Transpose,
        n: i32,
        nrhs: i32,
        a: &[f64],
        lda: i32,
        ipiv: &[i32],
        b: &mut [f64],
        ldb: i32,
    ) -> i32 {
        if n < 0 {
            return -2;
        }
        if nrhs < 0 {
            return -3;
        }
        if lda < n.max(1) {
            return -5;
        }
        if ldb < n.max(1) {
            return -8;
        }
        let (n, nrhs, lda, ldb) = (n as usize, nrhs as usize, lda as usize, ldb as usize);
        if n == 0 || nrhs == 0 {
            return 0;
        }
        let ipiv = &ipiv[..n];
        let lu = MatRef::from_column_major_slice_with_stride(a, n, n, lda);

        match trans {
            Transpose::No => {
                swap_rows(b, ldb, nrhs, ipiv, true);
                let mut rhs = MatMut::from_column_major_slice_with_stride_mut(&mut *b, n, nrhs, ldb);
                triangular_solve::solve_unit_lower_triangular_in_place(lu, rhs.as_mut(), Par::Seq);
                triangular_solve::solve_upper_triangular_in_place(lu, rhs.as_mut(), Par::Seq);
            }
            Transpose::Yes => {
                {
                    let mut rhs =
                        MatMut::from_column_major_slice_with_stride_mut(&mut *b, n, nrhs, ldb);
                    triangular_solve::solve_lower_triangular_in_place(
                        lu.transpose(),
                        rhs.as_mut(),
                        Par::Seq,
                    );
                    triangular_solve::solve_unit_upper_triangular_in_place(
                        lu.transpose(),
                        rhs.as_mut(),
                        Par::Seq,
                    );
                }
                swap_rows(b, ldb, nrhs, ipiv, false);
            }
        }
        0
    }

    fn dgesv(
        &self,
        n: i32,
        nrhs: i32,
        a: &mut [f64],
        lda: i32,
        ipiv: &mut [i32],
        b: &mut [f64],
        ldb: i32,
    ) -> i32 {
        if n < 0 {
            return -1;
        }
        if nrhs < 0 {
            return -2;
        }
        if lda < n.max(1) {
            return -4;
        }
        if ldb < n.max(1) {
            return -7;
        }
        let info = self.dgetrf(n, n, a, lda, ipiv);
        if info != 0 {
            return info;
        }
        self.dgetrs(Transpose::No, n, nrhs, a, lda, ipiv, b, ldb)
    }

    fn dsyevr(&self, call: SyevrCall<'_>) -> i32 {
        let SyevrCall { range, n, a, lda, abstol: _, m, w, z, ldz, isuppz } = call;
        let wantz = z.is_some();
        if n < 0 {
            return -4;
        }
        if lda < n.max(1) {
            return -6;
        }
        match range {
            SyevrRange::Value { vl, vu } if n > 0 && vu <= vl => return -8,
            SyevrRange::Index { il, iu } => {
                if il < 1 || il > n.max(1) {
                    return -9;
                }
                if iu < n.min(il) || iu > n {
                    return -10;
                }
            }
            _ => {}
        }
        if ldz < 1 || (wantz && ldz < n) {
            return -15;
        }

        *m = 0;
        let (n, lda, ldz) = (n as usize, lda as usize, ldz as usize);
        if n == 0 {
            return 0;
        }

        // faer reads the lower triangle; the transpose's lower triangle is
        // the upper triangle LAPACK is told to use.
        let upper = MatRef::from_column_major_slice_with_stride(&*a, n, n, lda).transpose();
        let mut s = Diag::<f64>::zeros(n);
        let mut u = if wantz { vec![0.0; n * n] } else { Vec::new() };
        let params = Default::default();
        let mut mem = MemBuffer::new(self_adjoint_evd_scratch::<f64>(
            n,
            compute(wantz),
            Par::Seq,
            params,
        ));
        let res = self_adjoint_evd(
            upper,
            s.as_mut(),
            if wantz { Some(MatMut::from_column_major_slice_mut(&mut u, n, n)) } else { None },
            Par::Seq,
            MemStack::new(&mut mem),
            params,
        );
        if res.is_err() {
            debug!(n, "self-adjoint evd did not converge");
            return n as i32;
        }
        let values: Vec<f64> = s.column_vector().iter().copied().collect();

        let selected: Vec<usize> = match range {
            SyevrRange::All => (0..n).collect(),
            SyevrRange::Value { vl, vu } => {
                (0..n).filter(|&i| values[i] > vl && values[i] <= vu).collect()
            }
            SyevrRange::Index { il, iu } => (il as usize - 1..iu as usize).collect(),
        };
        trace!(n, found = selected.len(), "dsyevr selection");

        *m = selected.len() as i32;
        for (k, &i) in selected.iter().enumerate() {
            w[k] = values[i];
        }
        if let Some(z) = z {
            for (k, &i) in selected.iter().enumerate() {
                let col = &u[i * n..(i + 1) * n];
                z[k * ldz..k * ldz + n].copy_from_slice(col);
                let first = col.iter().position(|&x| x != 0.0).map_or(0, |p| p + 1);
                let last = col.iter().rposition(|&x| x != 0.0).map_or(0, |p| p + 1);
                if let Some(pair) = isuppz.get_mut(2 * k..2 * k + 2) {
                    pair[0] = first as i32;
                    pair[1] = last as i32;
                }
            }
        }
        0
    }

    fn dgeev(&self, call: GeevCall<'_>) -> i32 {
        let GeevCall { n, a, lda, wr, wi, vl, ldvl, vr, ldvr } = call;
        if n < 0 {
            return -3;
        }
        if lda < n.max(1) {
            return -5;
        }
        if ldvl < 1 || (vl.is_some() && ldvl < n) {
            return -9;
        }
        if ldvr < 1 || (vr.is_some() && ldvr < n) {
            return -11;
        }
        let n = n as usize;
        if n == 0 {
            return 0;
        }

        let dense = evd::dense_copy(a, n, lda as usize);
        let Ok(mut out) = evd::real_evd(&dense, n, vl.is_some(), vr.is_some()) else {
            wr[..n].fill(0.0);
            wi[..n].fill(0.0);
            return n as i32;
        };
        wr[..n].copy_from_slice(&out.wr);
        wi[..n].copy_from_slice(&out.wi);
        if let (Some(dst), Some(src)) = (vl, out.vl.as_mut()) {
            evd::normalize(n, &out.wi, src);
            copy_out(src, n, n, dst, ldvl as usize);
        }
        if let (Some(dst), Some(src)) = (vr, out.vr.as_mut()) {
            evd::normalize(n, &out.wi, src);
            copy_out(src, n, n, dst, ldvr as usize);
        }
        0
    }

    fn dgeevx(&self, call: GeevxCall<'_>) -> i32 {
        let GeevxCall { balance, sense, geev, ilo, ihi, scale, abnrm, rconde, rcondv } = call;
        let GeevCall { n, a, lda, wr, wi, vl, ldvl, vr, ldvr } = geev;
        if sense.eigenvalues() && !(vl.is_some() && vr.is_some()) {
            return -4;
        }
        if n < 0 {
            return -5;
        }
        if lda < n.max(1) {
            return -7;
        }
        if ldvl < 1 || (vl.is_some() && ldvl < n) {
            return -11;
        }
        if ldvr < 1 || (vr.is_some() && ldvr < n) {
            return -13;
        }
        let n = n as usize;
        if n == 0 {
            *ilo = 1;
            *ihi = 0;
            *abnrm = 0.0;
            return 0;
        }

        let mut h = evd::dense_copy(a, n, lda as usize);
        let bal = balance::gebal(balance, n, &mut h);
        *ilo = bal.ilo as i32 + 1;
        *ihi = bal.ihi as i32 + 1;
        scale[..n].copy_from_slice(&bal.scale);
        *abnrm = (0..n)
            .map(|j| h[j * n..(j + 1) * n].iter().map(|x| x.abs()).sum::<f64>())
            .fold(0.0, f64::max);
        debug!(n, ilo = *ilo, ihi = *ihi, abnrm = *abnrm, "balanced");

        let need_left = vl.is_some() || sense.eigenvalues();
        let need_right = vr.is_some() || sense != super::Sense::None;
        let Ok(mut out) = evd::real_evd(&h, n, need_left, need_right) else {
            wr[..n].fill(0.0);
            wi[..n].fill(0.0);
            return n as i32;
        };
        wr[..n].copy_from_slice(&out.wr);
        wi[..n].copy_from_slice(&out.wi);

        if sense.eigenvalues() {
            if let (Some(left), Some(right)) = (out.vl.as_deref(), out.vr.as_deref()) {
                cond::eigenvalue_conditions(n, &out.wi, left, right, &mut rconde[..n]);
            }
        }
        if sense.eigenvectors() {
            if let Some(right) = out.vr.as_deref() {
                cond::eigenvector_conditions(n, &h, &out.wr, &out.wi, right, &mut rcondv[..n]);
            }
        }

        if let (Some(dst), Some(src)) = (vl, out.vl.as_mut()) {
            balance::gebak(balance, &bal, n, src, balance::Side::Left);
            evd::normalize(n, &out.wi, src);
            copy_out(src, n, n, dst, ldvl as usize);
        }
        if let (Some(dst), Some(src)) = (vr, out.vr.as_mut()) {
            balance::gebak(balance, &bal, n, src, balance::Side::Right);
            evd::normalize(n, &out.wi, src);
            copy_out(src, n, n, dst, ldvr as usize);
        }
        0
    }
}
