//! Safe wrappers around a system LAPACK.

use super::ffi;
use super::{Backend, GeevCall, GeevxCall, SyevrCall, SyevrRange};
use crate::Transpose;
use core::ffi::c_char;
use tracing::debug;

/// Forwards every routine to the linked Fortran LAPACK.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeBackend;

const UPLO_UPPER: c_char = b'U' as c_char;

#[inline]
fn job(flag: bool) -> c_char {
    (if flag { b'V' } else { b'N' }) as c_char
}

/// LAPACK dereferences array arguments even when they are not referenced,
/// so empty slices are replaced by a one-element scratch cell.
#[inline]
fn ptr_or<T>(s: &mut [T], cell: &mut T) -> *mut T {
    if s.is_empty() { cell as *mut T } else { s.as_mut_ptr() }
}

/// Size reported by a workspace query (`lwork = -1`).
#[inline]
fn queried(size: f64) -> usize {
    (size as usize).max(1)
}

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "system-lapack"
    }

    fn dgetrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32]) -> i32 {
        let mut info = 0;
        let (mut a0, mut p0) = (0.0, 0);
        unsafe {
            ffi::dgetrf_(&m, &n, ptr_or(a, &mut a0), &lda, ptr_or(ipiv, &mut p0), &mut info);
        }
        info
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
        let mut info = 0;
        let trans = trans.as_char() as c_char;
        let (a0, p0, mut b0) = ([0.0], [0], 0.0);
        let a = if a.is_empty() { &a0[..] } else { a };
        let ipiv = if ipiv.is_empty() { &p0[..] } else { ipiv };
        unsafe {
            ffi::dgetrs_(
                &trans,
                &n,
                &nrhs,
                a.as_ptr(),
                &lda,
                ipiv.as_ptr(),
                ptr_or(b, &mut b0),
                &ldb,
                &mut info,
            );
        }
        info
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
        let mut info = 0;
        let (mut a0, mut p0, mut b0) = (0.0, 0, 0.0);
        unsafe {
            ffi::dgesv_(
                &n,
                &nrhs,
                ptr_or(a, &mut a0),
                &lda,
                ptr_or(ipiv, &mut p0),
                ptr_or(b, &mut b0),
                &ldb,
                &mut info,
            );
        }
        info
    }

    fn dsyevr(&self, call: SyevrCall<'_>) -> i32 {
        let SyevrCall { range, n, a, lda, abstol, m, w, z, ldz, isuppz } = call;
        let jobz = job(z.is_some());
        let range_c = range.as_char() as c_char;
        let (vl, vu, il, iu) = match range {
            SyevrRange::All => (0.0, 0.0, 0, 0),
            SyevrRange::Value { vl, vu } => (vl, vu, 0, 0),
            SyevrRange::Index { il, iu } => (0.0, 0.0, il, iu),
        };

        let (mut a0, mut w0, mut z0, mut s0) = (0.0, 0.0, 0.0, 0);
        let a = ptr_or(a, &mut a0);
        let w = ptr_or(w, &mut w0);
        let z = match z {
            Some(z) => ptr_or(z, &mut z0),
            None => &mut z0 as *mut f64,
        };
        let isuppz = ptr_or(isuppz, &mut s0);
        let m: *mut i32 = m;

        let mut info = 0;
        let mut work_size = 0.0;
        let mut iwork_size = 0;
        let query = -1;
        unsafe {
            ffi::dsyevr_(
                &jobz, &range_c, &UPLO_UPPER, &n, a, &lda, &vl, &vu, &il, &iu, &abstol, m, w, z,
                &ldz, isuppz, &mut work_size, &query, &mut iwork_size, &query, &mut info,
            );
        }
        if info != 0 {
            return info;
        }

        let lwork = queried(work_size);
        let liwork = (iwork_size as usize).max(1);
        debug!(n, lwork, liwork, "dsyevr workspace");
        let mut work = vec![0.0; lwork];
        let mut iwork = vec![0; liwork];
        let (lwork, liwork) = (lwork as i32, liwork as i32);
        unsafe {
            ffi::dsyevr_(
                &jobz, &range_c, &UPLO_UPPER, &n, a, &lda, &vl, &vu, &il, &iu, &abstol, m, w, z,
                &ldz, isuppz, work.as_mut_ptr(), &lwork, iwork.as_mut_ptr(), &liwork, &mut info,
            );
        }
        info
    }

    fn dgeev(&self, call: GeevCall<'_>) -> i32 {
        let GeevCall { n, a, lda, wr, wi, vl, ldvl, vr, ldvr } = call;
        let jobvl = job(vl.is_some());
        let jobvr = job(vr.is_some());

        let (mut a0, mut wr0, mut wi0, mut vl0, mut vr0) = (0.0, 0.0, 0.0, 0.0, 0.0);
        let a = ptr_or(a, &mut a0);
        let wr = ptr_or(wr, &mut wr0);
        let wi = ptr_or(wi, &mut wi0);
        let vl = match vl {
            Some(v) => ptr_or(v, &mut vl0),
            None => &mut vl0 as *mut f64,
        };
        let vr = match vr {
            Some(v) => ptr_or(v, &mut vr0),
            None => &mut vr0 as *mut f64,
        };

        let mut info = 0;
        let mut work_size = 0.0;
        let query = -1;
        unsafe {
            ffi::dgeev_(
                &jobvl, &jobvr, &n, a, &lda, wr, wi, vl, &ldvl, vr, &ldvr, &mut work_size, &query,
                &mut info,
            );
        }
        if info != 0 {
            return info;
        }

        let lwork = queried(work_size);
        debug!(n, lwork, "dgeev workspace");
        let mut work = vec![0.0; lwork];
        let lwork = lwork as i32;
        unsafe {
            ffi::dgeev_(
                &jobvl, &jobvr, &n, a, &lda, wr, wi, vl, &ldvl, vr, &ldvr, work.as_mut_ptr(),
                &lwork, &mut info,
            );
        }
        info
    }

    fn dgeevx(&self, call: GeevxCall<'_>) -> i32 {
        let GeevxCall { balance, sense, geev, ilo, ihi, scale, abnrm, rconde, rcondv } = call;
        let GeevCall { n, a, lda, wr, wi, vl, ldvl, vr, ldvr } = geev;
        let balanc = balance.as_char() as c_char;
        let sense_c = sense.as_char() as c_char;
        let jobvl = job(vl.is_some());
        let jobvr = job(vr.is_some());

        let (mut a0, mut wr0, mut wi0, mut vl0, mut vr0) = (0.0, 0.0, 0.0, 0.0, 0.0);
        let (mut s0, mut e0, mut v0) = (0.0, 0.0, 0.0);
        let a = ptr_or(a, &mut a0);
        let wr = ptr_or(wr, &mut wr0);
        let wi = ptr_or(wi, &mut wi0);
        let vl = match vl {
            Some(v) => ptr_or(v, &mut vl0),
            None => &mut vl0 as *mut f64,
        };
        let vr = match vr {
            Some(v) => ptr_or(v, &mut vr0),
            None => &mut vr0 as *mut f64,
        };
        let scale = ptr_or(scale, &mut s0);
        let rconde = ptr_or(rconde, &mut e0);
        let rcondv = ptr_or(rcondv, &mut v0);
        let (ilo, ihi): (*mut i32, *mut i32) = (ilo, ihi);
        let abnrm: *mut f64 = abnrm;
        let mut iwork = vec![0; (2 * n.max(1) as usize).saturating_sub(2).max(1)];

        let mut info = 0;
        let mut work_size = 0.0;
        let query = -1;
        unsafe {
            ffi::dgeevx_(
                &balanc, &jobvl, &jobvr, &sense_c, &n, a, &lda, wr, wi, vl, &ldvl, vr, &ldvr, ilo,
                ihi, scale, abnrm, rconde, rcondv, &mut work_size, &query, iwork.as_mut_ptr(),
                &mut info,
            );
        }
        if info != 0 {
            return info;
        }

        let lwork = queried(work_size);
        debug!(n, lwork, "dgeevx workspace");
        let mut work = vec![0.0; lwork];
        let lwork = lwork as i32;
        unsafe {
            ffi::dgeevx_(
                &balanc, &jobvl, &jobvr, &sense_c, &n, a, &lda, wr, wi, vl, &ldvl, vr, &ldvr, ilo,
                ihi, scale, abnrm, rconde, rcondv, work.as_mut_ptr(), &lwork, iwork.as_mut_ptr(),
                &mut info,
            );
        }
        info
    }
}
