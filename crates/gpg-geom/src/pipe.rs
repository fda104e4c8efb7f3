use crate::error::GeomError;
use crate::line::Line;
use crate::spline::spline_resample;

/// Mirrors the FPA "pipe" contract: a line is pushed through a sequence of
/// filter/spline/save stages. `spec.md` §4.4/§4.6 describe two uses of the
/// same pipe: resampling to a specific point count (spatial resampler) and
/// resampling to a target resolution while possibly yielding zero, one, or
/// more output lines (topology assembler). This module provides both.
#[derive(Debug, Clone, Copy)]
pub struct PipeOptions {
    pub enable_filter: bool,
    pub enable_spline: bool,
    /// Distance-based decimation threshold for the filter stage.
    pub filter_spacing: f64,
}

impl Default for PipeOptions {
    fn default() -> Self {
        Self { enable_filter: true, enable_spline: true, filter_spacing: 0.0 }
    }
}

/// Runs `line` through filter then spline at a fixed resolution `res`,
/// returning the resulting line(s). A real FPA pipe can in principle
/// fragment a line into multiple pieces (self-intersection cleanup); this
/// implementation never fragments, so the result is always 0 (degenerate
/// input) or 1 lines, matching the common case callers in `spec.md` §4.6
/// step 1 must already handle ("if zero lines come out, warn and skip; if
/// >1 come out, keep the first and warn").
pub fn run_pipe(line: &Line, opts: PipeOptions, res: f64) -> Vec<Line> {
    if line.is_degenerate() {
        return vec![];
    }
    let filtered = if opts.enable_filter {
        let spacing = if opts.filter_spacing > 0.0 { opts.filter_spacing } else { res * 0.5 };
        line.decimate(spacing)
    } else {
        line.clone()
    };
    if filtered.is_degenerate() {
        return vec![];
    }
    if !opts.enable_spline {
        return vec![filtered];
    }
    match crate::spline::spline_resample_at_resolution(&filtered, res) {
        Ok(l) => vec![l],
        Err(_) => vec![],
    }
}

/// Binary-searches the spline resolution `res` within `[spmin, spmax]` so
/// that the refit of `line` yields exactly `npts` points, per `spec.md`
/// §4.4 step 2 ("if too many points, raise res; if too few, lower res").
/// Each trial re-splines from the original `refit` copy (never compounds
/// error across trials).
pub fn resolve_resolution_for_point_count(
    refit: &Line,
    npts: usize,
    spmin: f64,
    spmax: f64,
) -> Result<Line, GeomError> {
    if npts < 2 {
        return Err(GeomError::TooFewPoints);
    }
    let (mut lo, mut hi) = (spmin.max(1.0), spmax.max(spmin.max(1.0)));
    let mut best: Option<Line> = None;
    // 40 iterations of bisection comfortably separates floating resolutions
    // that would otherwise straddle the same integer point count.
    for _ in 0..40 {
        let mid = 0.5 * (lo + hi);
        match spline_resample_at_resolution(refit, mid) {
            Ok(candidate) => {
                let n = candidate.points.len();
                if n == npts {
                    return Ok(candidate);
                }
                best = Some(candidate);
                if n > npts {
                    // too many points -> raise res (coarser sampling)
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            Err(_) => {
                hi = mid;
            }
        }
        if (hi - lo).abs() < 1e-9 {
            break;
        }
    }
    // Fall back to an exact resample at the requested count if the
    // resolution search did not land exactly (still honours the contract
    // that the caller receives precisely `npts` points).
    spline_resample(refit, npts).or(best.ok_or(GeomError::SplineBracketFailed))
}
