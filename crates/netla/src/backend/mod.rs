//! The seam between the container adapter and the library doing the numerics.
//!
//! [`Backend`] methods follow LAPACK's raw calling convention: column-major
//! slices with explicit leading dimensions, 1-based pivot and support
//! indices, and an `info` status as the return value (`0` success, `-i` when
//! argument `i` is invalid, `> 0` routine specific failure).

#[cfg(feature = "faer")]
mod pure;
#[cfg(feature = "system-lapack")]
mod ffi;
#[cfg(feature = "system-lapack")]
mod native;

#[cfg(feature = "faer")]
pub use self::pure::FaerBackend;
#[cfg(feature = "system-lapack")]
pub use self::native::NativeBackend;

#[cfg(not(any(feature = "faer", feature = "system-lapack")))]
compile_error!("netla needs a backend: enable the `faer` or `system-lapack` feature");

use crate::{Balance, Transpose};

/// Eigenvalue selection for `dsyevr` (`RANGE`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SyevrRange {
    /// `'A'`: all eigenvalues.
    All,
    /// `'V'`: eigenvalues in the half-open interval `(vl, vu]`.
    Value { vl: f64, vu: f64 },
    /// `'I'`: the `il`-th through `iu`-th eigenvalues, 1-based.
    Index { il: i32, iu: i32 },
}

impl SyevrRange {
    pub fn as_char(&self) -> u8 {
        match self {
            Self::All => b'A',
            Self::Value { .. } => b'V',
            Self::Index { .. } => b'I',
        }
    }
}

/// Which reciprocal condition numbers `dgeevx` computes (`SENSE`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sense {
    None,
    Eigenvalues,
    Eigenvectors,
    Both,
}

impl Sense {
    pub fn from_flags(eigenvalues: bool, eigenvectors: bool) -> Self {
        match (eigenvalues, eigenvectors) {
            (false, false) => Self::None,
            (true, false) => Self::Eigenvalues,
            (false, true) => Self::Eigenvectors,
            (true, true) => Self::Both,
        }
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::None => b'N',
            Self::Eigenvalues => b'E',
            Self::Eigenvectors => b'V',
            Self::Both => b'B',
        }
    }

    pub fn eigenvalues(self) -> bool {
        matches!(self, Self::Eigenvalues | Self::Both)
    }

    pub fn eigenvectors(self) -> bool {
        matches!(self, Self::Eigenvectors | Self::Both)
    }
}

/// Arguments of `DSYEVR` with `UPLO = 'U'`. `JOBZ` is `'V'` iff `z` is set.
pub struct SyevrCall<'a> {
    pub range: SyevrRange,
    pub n: i32,
    /// Destroyed on exit.
    pub a: &'a mut [f64],
    pub lda: i32,
    pub abstol: f64,
    /// Number of eigenvalues found.
    pub m: &'a mut i32,
    pub w: &'a mut [f64],
    pub z: Option<&'a mut [f64]>,
    pub ldz: i32,
    pub isuppz: &'a mut [i32],
}

/// Arguments of `DGEEV`. `JOBVL`/`JOBVR` are `'V'` iff `vl`/`vr` are set.
pub struct GeevCall<'a> {
    pub n: i32,
    /// Destroyed on exit.
    pub a: &'a mut [f64],
    pub lda: i32,
    pub wr: &'a mut [f64],
    pub wi: &'a mut [f64],
    pub vl: Option<&'a mut [f64]>,
    pub ldvl: i32,
    pub vr: Option<&'a mut [f64]>,
    pub ldvr: i32,
}

/// Arguments of `DGEEVX`.
pub struct GeevxCall<'a> {
    pub balance: Balance,
    pub sense: Sense,
    pub geev: GeevCall<'a>,
    pub ilo: &'a mut i32,
    pub ihi: &'a mut i32,
    pub scale: &'a mut [f64],
    pub abnrm: &'a mut f64,
    pub rconde: &'a mut [f64],
    pub rcondv: &'a mut [f64],
}

/// A provider of the wrapped LAPACK routines.
pub trait Backend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// LU factorization with partial pivoting of the `m`×`n` matrix `a`.
    fn dgetrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32]) -> i32;

    /// Solve with the factors produced by [`Backend::dgetrf`].
    #[allow(clippy::too_many_arguments)]
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
    ) -> i32;

    /// Factor `a` and solve `a x = b` in place.
    #[allow(clippy::too_many_arguments)]
    fn dgesv(
        &self,
        n: i32,
        nrhs: i32,
        a: &mut [f64],
        lda: i32,
        ipiv: &mut [i32],
        b: &mut [f64],
        ldb: i32,
    ) -> i32;

    fn dsyevr(&self, call: SyevrCall<'_>) -> i32;

    fn dgeev(&self, call: GeevCall<'_>) -> i32;

    fn dgeevx(&self, call: GeevxCall<'_>) -> i32;
}

/// The backend used by the operations without an explicit backend argument.
///
/// This is the system LAPACK when the `system-lapack` feature is enabled and
/// faer otherwise.
#[cfg(feature = "system-lapack")]
pub fn default_backend() -> &'static dyn Backend {
    &NativeBackend
}

/// The backend used by the operations without an explicit backend argument.
///
/// This is the system LAPACK when the `system-lapack` feature is enabled and
/// faer otherwise.
#[cfg(all(feature = "faer", not(feature = "system-lapack")))]
pub fn default_backend() -> &'static dyn Backend {
    &FaerBackend
}

/// Every backend compiled into this build.
pub fn backends() -> Vec<&'static dyn Backend> {
    let mut all: Vec<&'static dyn Backend> = Vec::new();
    #[cfg(feature = "faer")]
    all.push(&FaerBackend);
    #[cfg(feature = "system-lapack")]
    all.push(&NativeBackend);
    all
}
