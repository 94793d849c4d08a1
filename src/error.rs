use thiserror::Error;

/// Top-level error type for circle clipping.
#[derive(Debug, Error)]
pub enum CirclipError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors related to input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },
}

/// Errors raised while assembling the clipped boundary.
///
/// These indicate an internal-consistency fault (malformed parts or a
/// predicate bug), never a degenerate but valid input.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("no unvisited segment end around crossing at ({x}, {y}) with {remaining} ends left")]
    RotationExhausted { x: f64, y: f64, remaining: usize },
}

/// Convenience type alias for results using [`CirclipError`].
pub type Result<T> = std::result::Result<T, CirclipError>;
