use thiserror::Error;

/// Fatal failures of the interpolation engine. Per `spec.md` §9 ("Signal
/// handling and exit"), the engine never calls `exit`; it returns
/// `Err(FatalError)` and leaves the decision of what to do (and with what
/// exit code) to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FatalError {
    #[error("chain {0}: {1}")]
    Link(usize, #[source] gpg_link::LinkError),
    #[error("time grid has no keyframes")]
    EmptyTimeGrid,
}

/// Non-fatal conditions the interpolator skips past, per `spec.md` §7
/// "Interpolation warnings" / "Geometry warnings". Accumulated by the
/// caller rather than interrupting the run.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    LinkTypeMixed { chain_id: usize },
    SegmentCountMismatch { chain_id: usize, key: usize, expected: usize, found: usize },
    SegmentDegenerate { chain_id: usize, key: usize, segment: usize },
    OrientationMismatch { chain_id: usize, key: usize },
    DivideAreaFailed { chain_id: usize, itween: usize, side: &'static str },
    HoleOutsideBoundary { chain_id: usize, itween: usize },
    ZeroLinesFromPipe { chain_id: usize, itween: usize },
    MultipleLinesFromPipe { chain_id: usize, itween: usize, count: usize },
    UnreachableDivideBranch { chain_id: usize, key: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::LinkTypeMixed { chain_id } => {
                write!(f, "chain {chain_id}: mixed member types across keyframes, skipped")
            }
            Diagnostic::SegmentCountMismatch { chain_id, key, expected, found } => write!(
                f,
                "chain {chain_id} key {key}: segment count mismatch (expected {expected}, found {found})"
            ),
            Diagnostic::SegmentDegenerate { chain_id, key, segment } => {
                write!(f, "chain {chain_id} key {key} segment {segment}: degenerate (<2 points)")
            }
            Diagnostic::OrientationMismatch { chain_id, key } => {
                write!(f, "chain {chain_id} key {key}: traversal direction disagreed with representative, reversed")
            }
            Diagnostic::DivideAreaFailed { chain_id, itween, side } => {
                write!(f, "chain {chain_id} tween {itween}: divide_area failed on {side} side")
            }
            Diagnostic::HoleOutsideBoundary { chain_id, itween } => {
                write!(f, "chain {chain_id} tween {itween}: hole outside boundary, skipped")
            }
            Diagnostic::ZeroLinesFromPipe { chain_id, itween } => {
                write!(f, "chain {chain_id} tween {itween}: resample pipe produced zero lines, skipped")
            }
            Diagnostic::MultipleLinesFromPipe { chain_id, itween, count } => write!(
                f,
                "chain {chain_id} tween {itween}: resample pipe produced {count} lines, keeping the first"
            ),
            Diagnostic::UnreachableDivideBranch { chain_id, key } => write!(
                f,
                "chain {chain_id} key {key}: hit the unsegmented-divide branch (spec.md open question), skipped"
            ),
        }
    }
}
