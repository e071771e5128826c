//! Error types for netla.

use std::fmt;

/// Errors reported by the LAPACK adapter.
///
/// Negative LAPACK `info` values are passed through unchanged as
/// [`LapackError::InvalidArgument`]; positive values surface as
/// [`LapackError::Failed`] only for routines without an `info` output.
#[derive(Debug, Clone, PartialEq)]
pub enum LapackError {
    /// The routine needs a square matrix.
    NonSquare { rows: usize, cols: usize },
    /// An input or output container has the wrong size.
    DimensionMismatch { what: &'static str, expected: usize, got: usize },
    /// A pivot index lies outside `1..=n`.
    InvalidPivot { index: usize, value: i32 },
    /// A parameter was rejected before calling out.
    InvalidInput(String),
    /// A dimension does not fit LAPACK's 32-bit `INTEGER`.
    TooLarge(usize),
    /// LAPACK rejected its `index`-th argument (`info == -index`).
    InvalidArgument { routine: &'static str, index: i32 },
    /// LAPACK reported an algorithmic failure (`info > 0`).
    Failed { routine: &'static str, info: i32 },
}

impl fmt::Display for LapackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonSquare { rows, cols } => {
                write!(f, "matrix must be square, got {rows}x{cols}")
            }
            Self::DimensionMismatch { what, expected, got } => {
                write!(f, "{what}: expected {expected}, got {got}")
            }
            Self::InvalidPivot { index, value } => {
                write!(f, "pivot {index} is out of range: {value}")
            }
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::TooLarge(n) => write!(f, "dimension {n} exceeds the LAPACK integer range"),
            Self::InvalidArgument { routine, index } => {
                write!(f, "{routine}: invalid argument #{index}")
            }
            Self::Failed { routine, info } => write!(f, "{routine} failed with info = {info}"),
        }
    }
}

impl std::error::Error for LapackError {}

pub type Result<T> = core::result::Result<T, LapackError>;

/// Convert a container dimension to a LAPACK `INTEGER`.
pub(crate) fn lapack_int(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| LapackError::TooLarge(n))
}

/// Map a negative `info` to [`LapackError::InvalidArgument`], passing any
/// other value through.
pub(crate) fn check_info(routine: &'static str, info: i32) -> Result<i32> {
    if info < 0 {
        Err(LapackError::InvalidArgument { routine, index: -info })
    } else {
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_info_is_argument_index() {
        assert_eq!(
            check_info("dgetrf", -4),
            Err(LapackError::InvalidArgument { routine: "dgetrf", index: 4 })
        );
        assert_eq!(check_info("dgetrf", 3), Ok(3));
    }

    #[test]
    fn display() {
        let e = LapackError::NonSquare { rows: 2, cols: 3 };
        assert_eq!(e.to_string(), "matrix must be square, got 2x3");
        let e = LapackError::Failed { routine: "dsyevr", info: 2 };
        assert_eq!(e.to_string(), "dsyevr failed with info = 2");
    }

    #[test]
    fn oversized_dimension() {
        assert_eq!(lapack_int(7), Ok(7));
        assert!(matches!(lapack_int(usize::MAX), Err(LapackError::TooLarge(_))));
    }
}
