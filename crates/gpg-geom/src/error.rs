use thiserror::Error;

/// Geometry-layer failures. These map onto the "Geometry warnings" kind of
/// the error taxonomy (non-fatal by default — callers decide whether to
/// warn-and-skip or propagate).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeomError {
    #[error("line has fewer than two points")]
    TooFewPoints,
    #[error("line is degenerate (zero length)")]
    ZeroLength,
    #[error("dividing line endpoints do not both lie on the boundary")]
    DivideEndpointsNotOnBoundary,
    #[error("divide_area could not resolve a left subarea")]
    DivAreaLeft,
    #[error("divide_area could not resolve a right subarea")]
    DivAreaRight,
    #[error("spline resolution search failed to bracket the target point count")]
    SplineBracketFailed,
}
