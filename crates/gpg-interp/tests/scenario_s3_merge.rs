//! S3: two boundary chains active over keys 0..1 vanish at key 2, exactly
//! where a third chain emerges and persists through key 3 — the merged
//! member's own keyframe. The output sequence must show two areas while
//! both source chains are alive and collapse to one area once the merge
//! keyframe is reached, with no fatal error along the way.

use gpg_geom::{Line, Point};
use gpg_interp::frame::{Area, PolygonFrame, TimeGrid};
use gpg_interp::interp_area;
use gpg_link::{KeyNode, LinkChain, MemberType};

fn square(offset: f64) -> Line {
    Line::closed(vec![
        Point::new(offset, 0.0),
        Point::new(offset + 2.0, 0.0),
        Point::new(offset + 2.0, 2.0),
        Point::new(offset, 2.0),
    ])
}

fn merged_rect() -> Line {
    Line::closed(vec![Point::new(-1.0, -1.0), Point::new(6.0, -1.0), Point::new(6.0, 3.0), Point::new(-1.0, 3.0)])
}

#[test]
fn two_chains_merge_into_one_at_the_shared_keyframe() {
    let mut chain_a = LinkChain::new(0, 4, 0, 0);
    chain_a.keys[0] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });
    chain_a.keys[1] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });

    let mut chain_b = LinkChain::new(1, 4, 0, 0);
    chain_b.keys[0] = Some(KeyNode { iarea: 1, mtype: MemberType::Bound, imem: 0, lpos: Point::new(5.0, 0.0) });
    chain_b.keys[1] = Some(KeyNode { iarea: 1, mtype: MemberType::Bound, imem: 0, lpos: Point::new(5.0, 0.0) });

    let mut chain_m = LinkChain::new(2, 4, 0, 0);
    chain_m.keys[2] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(2.5, 0.0) });
    chain_m.keys[3] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(2.5, 0.0) });

    let source = vec![
        PolygonFrame {
            mplus: 0,
            areas: vec![
                Area { boundary: Some(square(0.0)), ..Default::default() },
                Area { boundary: Some(square(5.0)), ..Default::default() },
            ],
        },
        PolygonFrame {
            mplus: 30,
            areas: vec![
                Area { boundary: Some(square(0.0)), ..Default::default() },
                Area { boundary: Some(square(5.0)), ..Default::default() },
            ],
        },
        PolygonFrame { mplus: 60, areas: vec![Area { boundary: Some(merged_rect()), ..Default::default() }] },
        PolygonFrame { mplus: 90, areas: vec![Area { boundary: Some(merged_rect()), ..Default::default() }] },
    ];
    let grid = TimeGrid { key_mplus: vec![0, 30, 60, 90], dtween: 30, num_tween: 4 };

    let result = interp_area(&[chain_a, chain_b, chain_m], &source, &grid, 1.0, |_: usize, _: usize| {}).unwrap();

    assert_eq!(result.frames.len(), 4);
    assert_eq!(result.frames[0].areas.len(), 2, "both source members still alive at key 0");
    assert_eq!(result.frames[1].areas.len(), 2, "both source members still alive at key 1");
    assert_eq!(result.frames[2].areas.len(), 1, "merged member replaces both sources at key 2");
    assert_eq!(result.frames[3].areas.len(), 1, "merged member persists through key 3");
}
