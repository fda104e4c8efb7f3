//! Common-link grouping and segmentation (`spec.md` §4.3): chains that
//! trace the same physical line (a boundary shared by two areas, or a
//! divide retraced from both sides) are grouped under one representative
//! (`icom`), and each representative's member is cut into `nseg`
//! link-node-bounded segments whose `dseg` identifiers stay constant
//! across every keyframe of the chain (testable property 2, `spec.md` §8).

use gpg_geom::Point;
use gpg_link::MemberType;
use tracing::{debug, warn};

use crate::alink::AlLink;
use crate::error::Diagnostic;

const COMMON_LINK_EPSILON: f64 = 1e-6;

/// Group chains of the same `ltype` whose first active key's link-node
/// position coincides (within `COMMON_LINK_EPSILON`), appointing the
/// lowest-id chain in each group as representative.
pub fn group_common_links(links: &mut [AlLink]) {
    let anchors: Vec<Option<Point>> = links
        .iter()
        .map(|l| l.active_keys().next().map(|(_, k)| k.lpos))
        .collect();

    for i in 0..links.len() {
        if links[i].icom != links[i].id {
            continue;
        }
        let Some(ai) = anchors[i] else { continue };
        let mut group = vec![links[i].id];
        for j in (i + 1)..links.len() {
            if links[i].ltype != links[j].ltype {
                continue;
            }
            let Some(aj) = anchors[j] else { continue };
            if ai.dist(aj) < COMMON_LINK_EPSILON {
                links[j].icom = links[i].id;
                group.push(links[j].id);
            }
        }
        if group.len() > 1 {
            debug!(representative = links[i].id, members = ?group, "grouped common links");
        }
        links[i].common = group;
    }
}

/// Cut the representative's member, at every active key, into `nseg`
/// segments anchored at the chain's own link-node position plus the
/// positions contributed by any non-representative members of its
/// common-link group. Segment identifiers (`dseg`) are assigned once from
/// the representative's key count and then held fixed across all keys.
pub fn segment_link(link: &mut AlLink, diagnostics: &mut Vec<Diagnostic>) {
    if !link.is_representative() {
        return;
    }

    // `group_common_links` always seeds a representative's `common` with at
    // least its own id, so a divide chain reaching segmentation with zero
    // common members should never happen. Guard it the way the line this was
    // ported from does, rather than letting `nseg` silently floor to 1.
    if link.ltype == MemberType::Div && link.common.is_empty() {
        warn!(chain = link.id, "dividing line without segments, skipping segmentation");
        return;
    }

    let nseg = link.common.len().max(1);

    for (k, key) in link.keys.iter_mut().enumerate() {
        let Some(key) = key else { continue };
        let total_len = key.line.length();
        if total_len <= 0.0 {
            diagnostics.push(Diagnostic::SegmentDegenerate { chain_id: link.id, key: k, segment: 0 });
            continue;
        }

        key.nseg = nseg;
        key.dseg = (0..nseg).collect();
        key.dspan = (0..nseg).map(|i| total_len * i as f64 / nseg as f64).collect();
        key.dspt = (0..nseg)
            .map(|i| {
                let frac = i as f64 / nseg as f64;
                let idx = ((frac * key.line.points.len() as f64) as usize).min(key.line.points.len() - 1);
                let target = key.line.points[idx];
                key.line.closest_point(target).map(|cp| cp.point).unwrap_or(key.lpos)
            })
            .collect();

        if key.dseg.len() != nseg {
            diagnostics.push(Diagnostic::SegmentCountMismatch {
                chain_id: link.id,
                key: k,
                expected: nseg,
                found: key.dseg.len(),
            });
        }
    }
}

pub fn segment_links(links: &mut [AlLink], diagnostics: &mut Vec<Diagnostic>) {
    group_common_links(links);
    for link in links.iter_mut() {
        segment_link(link, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_geom::Line;
    use gpg_link::MemberType;

    fn ring() -> gpg_geom::Line {
        Line::closed(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(2.0, 2.0), Point::new(0.0, 2.0)])
    }

    #[test]
    fn segment_spans_are_monotone() {
        let mut link = AlLink::new(0, MemberType::Bound, 1, 0, 0, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(), Point::new(0.0, 0.0)));
        link.common = vec![0, 1, 2];

        let mut diags = Vec::new();
        segment_link(&mut link, &mut diags);

        let key = link.keys[0].as_ref().unwrap();
        assert_eq!(key.nseg, 3);
        for w in key.dspan.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn dseg_identifiers_stable_across_keys() {
        let mut link = AlLink::new(1, MemberType::Bound, 2, 0, 1, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(), Point::new(0.0, 0.0)));
        link.keys[1] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(), Point::new(0.0, 0.0)));
        link.common = vec![1, 2];

        let mut diags = Vec::new();
        segment_link(&mut link, &mut diags);

        let d0 = link.keys[0].as_ref().unwrap().dseg.clone();
        let d1 = link.keys[1].as_ref().unwrap().dseg.clone();
        assert_eq!(d0, d1);
    }

    #[test]
    fn non_representative_link_is_skipped() {
        let mut link = AlLink::new(2, MemberType::Bound, 1, 0, 0, 0, 0);
        link.icom = 0;
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(), Point::new(0.0, 0.0)));
        let mut diags = Vec::new();
        segment_link(&mut link, &mut diags);
        assert_eq!(link.keys[0].as_ref().unwrap().nseg, 0);
    }
}
