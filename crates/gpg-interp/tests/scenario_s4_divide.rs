//! S4: a static boundary with one divide chain running corner to corner —
//! every tween frame must carry the divide back into the assembled area,
//! with a fresh subarea stamped in for the split.

use gpg_geom::{Line, Point};
use gpg_interp::frame::{Area, PolygonFrame, Subarea, TimeGrid};
use gpg_interp::interp_area;
use gpg_link::{KeyNode, LinkChain, MemberType};

fn square() -> Line {
    Line::closed(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)])
}

fn diagonal() -> Line {
    Line::open(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)])
}

#[test]
fn divide_chain_splits_the_boundary_every_frame() {
    let mut chain_bound = LinkChain::new(0, 1, 0, 0);
    chain_bound.keys[0] = Some(KeyNode { iarea: 0, mtype: MemberType::Bound, imem: 0, lpos: Point::new(0.0, 0.0) });

    let mut chain_div = LinkChain::new(1, 1, 0, 0);
    chain_div.keys[0] = Some(KeyNode { iarea: 0, mtype: MemberType::Div, imem: 0, lpos: Point::new(5.0, 5.0) });

    let source = vec![PolygonFrame {
        mplus: 0,
        areas: vec![Area {
            boundary: Some(square()),
            divides: vec![diagonal()],
            subareas: vec![
                Subarea { category: "cloud".into(), value: "CLD".into(), label: String::new(), cal: Default::default() },
                Subarea { category: "cloud".into(), value: "CLR".into(), label: String::new(), cal: Default::default() },
            ],
            subids: vec![1],
            ..Default::default()
        }],
    }];
    let grid = TimeGrid { key_mplus: vec![0], dtween: 30, num_tween: 3 };

    let result = interp_area(&[chain_bound, chain_div], &source, &grid, 1.0, |_: usize, _: usize| {}).unwrap();

    assert_eq!(result.frames.len(), 3);
    for frame in &result.frames {
        assert_eq!(frame.areas.len(), 1);
        let area = &frame.areas[0];
        assert_eq!(area.divides.len(), 1, "divide carried into every tween frame");
        assert_eq!(area.subareas.len(), 2, "left and right subareas stamped in for the split");
        assert_eq!(area.subids, vec![1]);
        assert_eq!(area.subareas[0].value, "CLD", "left side keeps the area's base attributes");
        assert_eq!(area.subareas[1].value, "CLR", "right side carries the divide's stamped attributes");
    }
}
