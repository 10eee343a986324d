use thiserror::Error;

/// Top-level error type for the geocore primitives kernel.
#[derive(Debug, Error)]
pub enum GeocoreError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Errors raised by degenerate geometric constructions.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised by the low-level numeric routines.
#[derive(Debug, Error)]
pub enum NumericError {
    #[error("singular linear system (|det| = {det:e})")]
    SingularSystem { det: f64 },

    #[error("component index {index} out of range for {target}")]
    IndexOutOfRange { target: &'static str, index: usize },
}

/// Convenience type alias for results using [`GeocoreError`].
pub type Result<T> = std::result::Result<T, GeocoreError>;
