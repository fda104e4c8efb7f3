//! S1: a single keyframe with one boundary and no links — the
//! interpolator must replicate the boundary verbatim across the whole
//! tween sequence, per `spec.md` §4.5's "static member" edge case.

use gpg_geom::{Line, Point};
use gpg_interp::frame::{Area, PolygonFrame, TimeGrid};
use gpg_interp::interp_area;
use gpg_link::{KeyNode, LinkChain, MemberType};

fn square() -> Line {
    Line::closed(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ])
}

#[test]
fn single_keyframe_boundary_replicates_across_all_tween_frames() {
    let mut chain = LinkChain::new(0, 1, 0, 0);
    chain.keys[0] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });

    let source = vec![PolygonFrame { mplus: 0, areas: vec![Area { boundary: Some(square()), ..Default::default() }] }];
    let grid = TimeGrid { key_mplus: vec![0], dtween: 30, num_tween: 4 };

    let result = interp_area(&[chain], &source, &grid, 1.5, |_: usize, _: usize| {}).unwrap();

    assert_eq!(result.frames.len(), 4);
    assert!(result.diagnostics.is_empty());
    for frame in &result.frames {
        assert_eq!(frame.areas.len(), 1);
        assert!(frame.areas[0].boundary.is_some());
    }
}
