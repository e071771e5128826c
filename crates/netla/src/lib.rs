//! Dense LAPACK routines over the crate's own vector and matrix types.
//!
//! A small, curated subset of LAPACK: LU factorization and solves
//! ([`dgetrf`], [`dgetrs`], [`dgesv`]), symmetric eigendecomposition
//! ([`dsyevr`]) and general eigendecomposition with optional balancing and
//! condition numbers ([`dgeev`], [`dgeevx`]).
//!
//! Matrices are column-major [`DMat`]s; pivot and support indices are
//! 1-based `DVec<i32>`s, exactly as LAPACK reports them. Routines pass
//! LAPACK's `info` through: negative values become
//! [`LapackError::InvalidArgument`], positive values are returned to the
//! caller after a `tracing` warning.
//!
//! The numerics run on a [`Backend`]: pure-Rust `faer` by default, or the
//! system LAPACK with the `system-lapack` feature. Every routine has a
//! `*_with` form taking the backend explicitly.

mod dvec;
mod dmat;
mod error;
mod lu;
mod eigen;
mod geev;
pub mod backend;

pub use dvec::{DVec, Element};
pub use dmat::DMat;
pub use error::{LapackError, Result};
pub use lu::{dgesv, dgesv_with, dgetrf, dgetrf_with, dgetrs, dgetrs_with, Transpose};
pub use eigen::{dsyevr, dsyevr_with, SyevWhich};
pub use geev::{dgeev, dgeev_with, dgeevx, dgeevx_with, Balance, GeevxOutputs, GeevxReport};
pub use backend::{backends, default_backend, Backend};
