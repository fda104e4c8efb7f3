//! Area-link interpolation engine (`spec.md` §2 component 1, §4).
//!
//! Turns a sequence of keyframe `PolygonFrame`s plus the user-drawn
//! `LinkChain`s connecting them into a full tween sequence: one
//! `PolygonFrame` per entry in the output `TimeGrid`. The pipeline mirrors
//! `interp_area.c`'s stage order:
//!
//! 1. [`builder`] — resolve each chain into an `AlLink`/`AlKey` set.
//! 2. [`merge_split`] — flag chains that merge into or split out of
//!    another chain's member at an interior keyframe.
//! 3. [`segment`] — group chains tracing the same physical line under one
//!    representative and cut it into link-node-bounded segments.
//! 4. [`resample`] — bring every active key of a representative to the
//!    same point count.
//! 5. [`tween`] — linearly blend corresponding indices across each active
//!    interval to produce one line per tween frame.
//! 6. [`topology`] — reassemble tweened lines into full `PolygonFrame`s,
//!    attaching holes and divides back to their boundary.

pub mod alink;
pub mod builder;
pub mod error;
pub mod frame;
pub mod merge_split;
pub mod resample;
pub mod segment;
pub mod topology;
pub mod tween;

pub use alink::{AlKey, AlLink};
pub use error::{Diagnostic, FatalError};
pub use frame::{Area, CalRecord, PolygonFrame, Spot, Subarea, TimeGrid};

use gpg_link::LinkChain;

/// Progress callback contract matching `spec.md` §5's `interp_progress(dfld,
/// done, total)`: called once per tween frame produced, after the frame is
/// fully assembled.
pub trait ProgressSink {
    fn report(&mut self, done: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn report(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

/// Output of a full interpolation run: the tween sequence plus every
/// non-fatal diagnostic collected along the way.
pub struct InterpolationResult {
    pub frames: Vec<PolygonFrame>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the full area-link interpolation pipeline over `chains` and their
/// keyframe `source_frames`, producing `grid.num_tween` tween frames at
/// the given output `resolution`.
///
/// Mirrors `interp_area()`: a single fatal error (an empty time grid, or a
/// chain lookup that cannot be recovered from) aborts the whole run;
/// everything else downgrades to a `Diagnostic` and the run continues.
pub fn interp_area(
    chains: &[LinkChain],
    source_frames: &[frame::PolygonFrame],
    grid: &TimeGrid,
    resolution: f64,
    mut progress: impl ProgressSink,
) -> Result<InterpolationResult, FatalError> {
    if grid.num_tween == 0 || grid.key_mplus.is_empty() {
        return Err(FatalError::EmptyTimeGrid);
    }

    let mut diagnostics = Vec::new();

    let mut links = builder::build_links(chains, source_frames, &mut diagnostics)?;
    merge_split::detect_merges_and_splits(&mut links);
    segment::segment_links(&mut links, &mut diagnostics);
    resample::resample_links(&mut links, &mut diagnostics);

    let mut frames = Vec::with_capacity(grid.num_tween);
    for itween in 0..grid.num_tween {
        let frame = topology::assemble_frame(&links, grid, itween, resolution, &mut diagnostics);
        frames.push(frame);
        progress.report(itween + 1, grid.num_tween);
    }

    Ok(InterpolationResult { frames, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_geom::{Line, Point};
    use gpg_link::{KeyNode, MemberType};

    fn square(offset: f64) -> Line {
        Line::closed(vec![
            Point::new(offset, offset),
            Point::new(offset + 10.0, offset),
            Point::new(offset + 10.0, offset + 10.0),
            Point::new(offset, offset + 10.0),
        ])
    }

    #[test]
    fn single_key_boundary_replicates_across_grid() {
        let mut chain = LinkChain::new(0, 1, 0, 0);
        chain.keys[0] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });

        let source = vec![frame::PolygonFrame {
            mplus: 0,
            areas: vec![frame::Area { boundary: Some(square(0.0)), ..Default::default() }],
        }];
        let grid = TimeGrid { key_mplus: vec![0], dtween: 60, num_tween: 3 };

        let mut ticks = 0;
        let result = interp_area(&[chain], &source, &grid, 2.0, |_done: usize, _total: usize| ticks += 1).unwrap();

        assert_eq!(result.frames.len(), 3);
        assert_eq!(ticks, 3);
        for frame in &result.frames {
            assert_eq!(frame.areas.len(), 1);
        }
    }

    #[test]
    fn two_key_boundary_tweens_linearly() {
        let mut chain = LinkChain::new(0, 2, 0, 0);
        chain.keys[0] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });
        chain.keys[1] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });

        let source = vec![
            frame::PolygonFrame { mplus: 0, areas: vec![frame::Area { boundary: Some(square(0.0)), ..Default::default() }] },
            frame::PolygonFrame { mplus: 60, areas: vec![frame::Area { boundary: Some(square(20.0)), ..Default::default() }] },
        ];
        let grid = TimeGrid { key_mplus: vec![0, 60], dtween: 60, num_tween: 2 };

        let result = interp_area(&[chain], &source, &grid, 2.0, |_: usize, _: usize| {}).unwrap();
        assert_eq!(result.frames.len(), 2);
        assert_eq!(result.frames[0].areas.len(), 1);
        assert_eq!(result.frames[1].areas.len(), 1);
    }

    #[test]
    fn empty_grid_is_fatal() {
        let grid = TimeGrid { key_mplus: vec![], dtween: 0, num_tween: 0 };
        let err = interp_area(&[], &[], &grid, 1.0, |_: usize, _: usize| {});
        assert!(matches!(err, Err(FatalError::EmptyTimeGrid)));
    }
}
