//! Types used across headmat

/// A point in three dimensional space
pub type Point = [f64; 3];

/// Identifier of a mesh inside a [Geometry](crate::geometry::Geometry)
pub type MeshId = usize;

/// Identifier of a domain inside a [Geometry](crate::geometry::Geometry)
pub type DomainId = usize;

/// The fundamental solution constant 1/(4 pi)
pub const K: f64 = 1.0 / (4.0 * std::f64::consts::PI);

/// Error
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A source mesh crosses more than one domain
    #[error("source mesh {0} is not contained in a single domain")]
    OverlappingSourceMesh(String),
    /// A factorization met a singular or negligible pivot
    #[error("factorization failed at pivot {pivot} (value {value:e})")]
    FactorizationFailed {
        /// Index of the offending pivot
        pivot: usize,
        /// Value of the offending pivot
        value: f64,
    },
    /// The dense linear algebra backend failed
    #[error(transparent)]
    LinearAlgebra(rlst::RlstError),
    /// A numerical capability is not available
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Operands have incompatible shapes
    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// Expected shape
        expected: [usize; 2],
        /// Shape that was found
        found: [usize; 2],
    },
    /// A mesh is malformed
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// No domain with the given name or containing the given point
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
    /// Input or output failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Malformed persisted data
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
