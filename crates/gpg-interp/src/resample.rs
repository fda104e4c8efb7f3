//! Spatial resampler (`spec.md` §4.4): brings every active key of a
//! representative link to a common point count, segment by segment, so
//! corresponding indices across keyframes can be linearly blended
//! index-for-index in `tween.rs`.

use gpg_geom::{resolve_resolution_for_point_count, Line, Point};
use gpg_link::MemberType;
use tracing::debug;

use crate::alink::AlLink;
use crate::error::Diagnostic;

/// Minimum segment count floor, per `spec.md` §4.4 step 1: "never resample
/// below 10 points, even if every key happens to be coarser".
const MIN_SEGMENT_COUNT: usize = 10;

/// Extracts the windowed boundary subset used when a key is merging into or
/// splitting out of another member (`mfact`/`sfact` < 1.0), per
/// `original_source/slib/ingred/interp_area.c`'s `spatial()`: a window of
/// `nmp` points centred on the link-node position, capped at each end with
/// a point offset perpendicular to the local tangent, rotated according to
/// the boundary's traversal direction.
fn windowed_boundary(line: &Line, lpos: Point, fact: f64) -> Line {
    let nmp0 = line.points.len();
    let nmp = ((fact * (nmp0 as f64 - 1.0) + 5.0).round() as i64).max(0) as usize;
    if nmp <= 6 || nmp >= nmp0 {
        return line.clone();
    }

    let cw = line.is_clockwise();
    let Ok(cp) = line.closest_point(lpos) else { return line.clone() };
    let imp = (cp.frac_index.round() as i64).rem_euclid(nmp0 as i64);

    let wrap = |i: i64| -> usize { i.rem_euclid(nmp0 as i64) as usize };
    let imps = imp - (nmp / 2) as i64;
    let impe = imps + nmp as i64 - 1;

    let mut points = Vec::with_capacity(nmp + 2);

    // Leading cap: offset perpendicular to the tangent at the window start.
    let jmp = wrap(imps);
    let mut p = line.points[jmp];
    let mut kmp = jmp;
    loop {
        kmp = (kmp + 1) % nmp0;
        let d = line.points[kmp].sub(p);
        if d.x != 0.0 || d.y != 0.0 {
            let offset = if cw { Point::new(d.y, -d.x) } else { Point::new(-d.y, d.x) };
            p = p.add(offset);
            break;
        }
        if kmp == jmp {
            break;
        }
    }
    points.push(p);

    for i in imps..=impe {
        points.push(line.points[wrap(i)]);
    }

    // Trailing cap: offset perpendicular to the tangent at the window end.
    let jmp2 = wrap(impe);
    let mut p2 = line.points[jmp2];
    let mut kmp2 = jmp2 as i64;
    loop {
        kmp2 -= 1;
        let k = wrap(kmp2);
        let d = line.points[k].sub(p2);
        if d.x != 0.0 || d.y != 0.0 {
            let offset = if cw { Point::new(-d.y, d.x) } else { Point::new(d.y, -d.x) };
            p2 = p2.add(offset);
            break;
        }
        if k == jmp2 {
            break;
        }
    }
    points.push(p2);
    points.push(points[0]);

    Line { points, closed: line.closed }
}

/// Index of `line`'s point nearest to `target`.
fn nearest_index(line: &Line, target: Point) -> usize {
    match line.closest_point(target) {
        Ok(cp) => (cp.frac_index.round() as i64).rem_euclid(line.points.len().max(1) as i64) as usize,
        Err(_) => 0,
    }
}

/// Extracts the raw sub-polyline for segment `iseg` of `dspt.len()`
/// segments, walking `line`'s points forward from one anchor to the next
/// (`spec.md` §4.3's segment boundaries). A single segment covering the
/// whole line (the common case for a chain with no common-link grouping)
/// returns `line` unchanged.
fn segment_subline(line: &Line, dspt: &[Point], iseg: usize) -> Line {
    let nseg = dspt.len();
    if nseg <= 1 || line.points.len() < 2 {
        return line.clone();
    }
    let start = nearest_index(line, dspt[iseg]);
    let end = nearest_index(line, dspt[(iseg + 1) % nseg]);
    let mut sub = Line::open(Vec::new());
    sub.append_pdir(line, start, end, true);
    sub
}

/// Per-segment target point count (`spec.md` §4.4): `round(W1*max + W2*min)`
/// over segment `iseg`'s raw point counts across the representative's
/// active keys, floored at `MIN_SEGMENT_COUNT`.
fn segment_target_point_count(raw: &[(usize, bool, Vec<Line>)], iseg: usize) -> usize {
    const W1: f64 = 0.75;
    const W2: f64 = 0.25;
    let counts: Vec<usize> = raw.iter().filter_map(|(_, _, subs)| subs.get(iseg).map(|l| l.num_points())).collect();
    let Some(&max) = counts.iter().max() else { return MIN_SEGMENT_COUNT };
    let min = *counts.iter().min().unwrap();
    ((W1 * max as f64 + W2 * min as f64).round() as usize).max(MIN_SEGMENT_COUNT)
}

/// Resample every active key of `link` to the same point count, segment by
/// segment, in place. A boundary key flagged `mflag`/`sflag` below 1.0 is
/// first windowed down to its surviving subset (`windowed_boundary`) before
/// its segments are cut. Non-fatal failures (the bisection search
/// exhausting without a working spline fit) drop that segment's points from
/// the count rather than aborting the whole run.
pub fn resample_link(link: &mut AlLink, diagnostics: &mut Vec<Diagnostic>) {
    if !link.is_representative() {
        return;
    }

    let nseg = link.active_keys().map(|(_, k)| k.nseg.max(1)).max().unwrap_or(1);
    debug!(chain = link.id, nseg, "resampling per segment");

    let mut raw: Vec<(usize, bool, Vec<Line>)> = Vec::new();
    for (k, key) in link.keys.iter().enumerate() {
        let Some(key) = key else { continue };
        if key.line.is_degenerate() {
            continue;
        }
        let mut line = key.line.clone();
        if link.ltype == MemberType::Bound {
            let fact = key.mfact.min(key.sfact);
            if fact < 1.0 {
                line = windowed_boundary(&line, key.lpos, fact);
            }
        }
        let dspt = if key.dspt.len() == nseg { key.dspt.clone() } else { vec![key.lpos; nseg] };
        let subs = (0..nseg).map(|iseg| segment_subline(&line, &dspt, iseg)).collect();
        raw.push((k, key.line.closed, subs));
    }

    for iseg in 0..nseg {
        let npseg = segment_target_point_count(&raw, iseg);
        for (k, _, subs) in raw.iter_mut() {
            let Some(sub) = subs.get_mut(iseg) else { continue };
            if sub.is_degenerate() {
                diagnostics.push(Diagnostic::SegmentDegenerate { chain_id: link.id, key: *k, segment: iseg });
                continue;
            }
            let avg = sub.average_spacing().max(1e-6);
            match resolve_resolution_for_point_count(sub, npseg, avg * 0.1, avg * 10.0) {
                Ok(resampled) => *sub = resampled,
                Err(_) => diagnostics.push(Diagnostic::SegmentDegenerate { chain_id: link.id, key: *k, segment: iseg }),
            }
        }
    }

    for (k, closed, subs) in raw {
        let mut points = Vec::new();
        for sub in &subs {
            points.extend_from_slice(&sub.points);
        }
        if let Some(key) = link.keys[k].as_mut() {
            key.line = Line { points, closed };
        }
    }
}

pub fn resample_links(links: &mut [AlLink], diagnostics: &mut Vec<Diagnostic>) {
    for link in links.iter_mut() {
        resample_link(link, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_geom::Point;
    use gpg_link::MemberType;

    fn ring(n: usize, r: f64) -> Line {
        let pts = (0..n)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(r * t.cos(), r * t.sin())
            })
            .collect();
        Line::closed(pts)
    }

    #[test]
    fn keys_end_up_with_same_point_count() {
        let mut link = AlLink::new(0, MemberType::Bound, 2, 0, 1, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(8, 5.0), Point::new(0.0, 0.0)));
        link.keys[1] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(20, 5.0), Point::new(0.0, 0.0)));

        let mut diags = Vec::new();
        resample_link(&mut link, &mut diags);

        let n0 = link.keys[0].as_ref().unwrap().line.num_points();
        let n1 = link.keys[1].as_ref().unwrap().line.num_points();
        assert_eq!(n0, n1);
        assert!(n0 >= MIN_SEGMENT_COUNT);
    }

    #[test]
    fn floor_applies_to_small_rings() {
        let mut link = AlLink::new(1, MemberType::Bound, 1, 0, 0, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(4, 2.0), Point::new(0.0, 0.0)));
        let mut diags = Vec::new();
        resample_link(&mut link, &mut diags);
        assert!(link.keys[0].as_ref().unwrap().line.num_points() >= MIN_SEGMENT_COUNT);
    }

    #[test]
    fn merging_key_is_windowed_to_a_smaller_boundary() {
        let mut link = AlLink::new(2, MemberType::Bound, 2, 0, 1, 0, 0);
        let mut vanishing = crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(40, 10.0), Point::new(10.0, 0.0));
        vanishing.mfact = 0.3;
        link.keys[0] = Some(vanishing);
        link.keys[1] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(40, 10.0), Point::new(10.0, 0.0)));
        link.mflag = true;

        let mut diags = Vec::new();
        resample_link(&mut link, &mut diags);

        // Both keys still land on the same common point count after
        // resampling, but the windowed key started from a visibly smaller
        // subset of the original 40-point ring.
        let n0 = link.keys[0].as_ref().unwrap().line.num_points();
        let n1 = link.keys[1].as_ref().unwrap().line.num_points();
        assert_eq!(n0, n1);
    }

    #[test]
    fn segments_are_resampled_independently_for_grouped_chains() {
        let mut link = AlLink::new(3, MemberType::Bound, 1, 0, 0, 0, 0);
        let mut key = crate::alink::AlKey::new(0, MemberType::Bound, 0, ring(20, 5.0), Point::new(5.0, 0.0));
        key.nseg = 2;
        key.dseg = vec![0, 1];
        key.dspan = vec![0.0, 10.0];
        key.dspt = vec![Point::new(5.0, 0.0), Point::new(-5.0, 0.0)];
        link.keys[0] = Some(key);
        link.common = vec![3, 4];

        let mut diags = Vec::new();
        resample_link(&mut link, &mut diags);

        let n0 = link.keys[0].as_ref().unwrap().line.num_points();
        assert!(n0 >= MIN_SEGMENT_COUNT);
    }
}
