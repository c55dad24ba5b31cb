// The internal crate hands back small, `no_std`-friendly error types. This
// crate wraps each of them in its own `ErrorKind` variant (plus a couple of
// kinds that can only arise here, like worker failures).
//
// We keep `ErrorKind` private so that we're free to reshuffle the payloads.
// Callers that need to branch on the failure use `Error::class()`.

use kdpair_nostd_internal::{BinEdgeError, EmptyInputError, Incompatibility, ShapeError};

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// A coarse, public description of what went wrong
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// malformed input arrays
    Shape,
    /// the point sets have different numbers of spatial dimensions
    DimensionMismatch,
    /// the point sets disagree about periodicity (or the box size)
    PeriodicityMismatch,
    /// an index was requested over zero points
    EmptyInput,
    /// a worker panicked or the worker pool couldn't be built
    Worker,
    /// invalid bin edges
    BinEdge,
    /// an invalid runtime parameter
    Parameter,
}

/// The underlying internal error type
#[derive(Debug)]
enum ErrorKind {
    BinEdge(BinEdgeError),
    DimensionMismatch(DimensionMismatchError),
    EmptyInput(EmptyInputError),
    Parameter(ParameterError),
    PeriodicityMismatch(PeriodicityMismatchError),
    Shape(ShapeError),
    Worker(WorkerError),
}

// define constructor methods for Error
impl Error {
    /// produce an error indicating that the point sets have different numbers
    /// of spatial dimensions
    pub(crate) fn dimension_mismatch(dims_a: usize, dims_b: usize) -> Self {
        Error {
            kind: ErrorKind::DimensionMismatch(DimensionMismatchError { dims_a, dims_b }),
        }
    }

    /// produce an error indicating that a runtime parameter is invalid
    pub(crate) fn parameter(name: &'static str, value: f64, requirement: &'static str) -> Self {
        Error {
            kind: ErrorKind::Parameter(ParameterError {
                name,
                value,
                requirement,
            }),
        }
    }

    /// produce an error indicating that the point sets can't be paired due to
    /// their periodicity
    pub(crate) fn periodicity_mismatch() -> Self {
        Error {
            kind: ErrorKind::PeriodicityMismatch(PeriodicityMismatchError),
        }
    }

    /// produce an error indicating that the thread pool couldn't be built
    pub(crate) fn worker_pool(cause: rayon::ThreadPoolBuildError) -> Self {
        Error {
            kind: ErrorKind::Worker(WorkerError {
                cause: WorkerCause::Pool(cause),
            }),
        }
    }

    /// produce an error indicating that a worker panicked while processing a
    /// unit of work
    pub(crate) fn worker_panic(unit: usize, message: String) -> Self {
        Error {
            kind: ErrorKind::Worker(WorkerError {
                cause: WorkerCause::Panic(WorkerPanic { unit, message }),
            }),
        }
    }

    /// describes the category of the error
    pub fn class(&self) -> ErrorClass {
        match self.kind {
            ErrorKind::BinEdge(_) => ErrorClass::BinEdge,
            ErrorKind::DimensionMismatch(_) => ErrorClass::DimensionMismatch,
            ErrorKind::EmptyInput(_) => ErrorClass::EmptyInput,
            ErrorKind::Parameter(_) => ErrorClass::Parameter,
            ErrorKind::PeriodicityMismatch(_) => ErrorClass::PeriodicityMismatch,
            ErrorKind::Shape(_) => ErrorClass::Shape,
            ErrorKind::Worker(_) => ErrorClass::Worker,
        }
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Error {
            kind: ErrorKind::Shape(err),
        }
    }
}

impl From<BinEdgeError> for Error {
    fn from(err: BinEdgeError) -> Self {
        Error {
            kind: ErrorKind::BinEdge(err),
        }
    }
}

impl From<EmptyInputError> for Error {
    fn from(err: EmptyInputError) -> Self {
        Error {
            kind: ErrorKind::EmptyInput(err),
        }
    }
}

impl From<Incompatibility> for Error {
    fn from(err: Incompatibility) -> Self {
        match err {
            Incompatibility::Dimension { dims_a, dims_b } => {
                Error::dimension_mismatch(dims_a, dims_b)
            }
            Incompatibility::Periodicity => Error::periodicity_mismatch(),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ErrorKind::Worker(ref err) => Some(err.cause()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.kind, f)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::BinEdge(ref err) => write!(f, "invalid bin edges: {err}"),
            ErrorKind::DimensionMismatch(ref err) => core::fmt::Display::fmt(err, f),
            ErrorKind::EmptyInput(ref err) => core::fmt::Display::fmt(err, f),
            ErrorKind::Parameter(ref err) => core::fmt::Display::fmt(err, f),
            ErrorKind::PeriodicityMismatch(ref err) => core::fmt::Display::fmt(err, f),
            ErrorKind::Shape(ref err) => write!(f, "malformed point set: {err}"),
            ErrorKind::Worker(ref err) => core::fmt::Display::fmt(err, f),
        }
    }
}

/// An error that occurs when the point sets have different numbers of
/// spatial dimensions
#[derive(Clone, Debug)]
struct DimensionMismatchError {
    dims_a: usize,
    dims_b: usize,
}

impl std::error::Error for DimensionMismatchError {}

impl core::fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "the first point set has {} spatial dimensions while the second has {}",
            self.dims_a, self.dims_b
        )
    }
}

/// An error that occurs when a runtime parameter holds an invalid value
#[derive(Clone, Debug)]
struct ParameterError {
    name: &'static str,
    value: f64,
    requirement: &'static str,
}

impl std::error::Error for ParameterError {}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let ParameterError {
            name,
            value,
            requirement,
        } = self;
        write!(f, "{name} has a value of {value}. It must be {requirement}")
    }
}

/// An error that occurs when only one point set is periodic (or both are
/// periodic with different box sizes)
#[derive(Clone, Debug)]
struct PeriodicityMismatchError;

impl std::error::Error for PeriodicityMismatchError {}

impl core::fmt::Display for PeriodicityMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "the point sets must either both be non-periodic or share a box size"
        )
    }
}

/// An error that occurs when the worker pool fails
#[derive(Debug)]
struct WorkerError {
    cause: WorkerCause,
}

#[derive(Debug)]
enum WorkerCause {
    Pool(rayon::ThreadPoolBuildError),
    Panic(WorkerPanic),
}

impl WorkerError {
    fn cause(&self) -> &(dyn std::error::Error + 'static) {
        match self.cause {
            WorkerCause::Pool(ref err) => err,
            WorkerCause::Panic(ref err) => err,
        }
    }
}

impl std::error::Error for WorkerError {}

impl core::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.cause {
            WorkerCause::Pool(_) => write!(f, "unable to build the worker pool"),
            WorkerCause::Panic(ref err) => {
                write!(f, "a worker panicked while processing unit {}", err.unit)
            }
        }
    }
}

/// The payload of a panic that occurred in a worker
#[derive(Clone, Debug)]
struct WorkerPanic {
    unit: usize,
    message: String,
}

impl std::error::Error for WorkerPanic {}

impl core::fmt::Display for WorkerPanic {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "panicked with: {}", self.message)
    }
}
