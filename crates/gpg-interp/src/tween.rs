//! Temporal interpolator (`spec.md` §4.5): blends a resampled
//! representative link's point-for-point correspondence linearly across
//! each active interval, producing one `Line` per tween frame. A merging or
//! splitting key's boundary is already windowed down to its surviving
//! subset by `resample.rs` before this stage ever sees it, so the blend
//! here is the same plain index-for-index lerp regardless of `mflag`/
//! `sflag`; control nodes nudge the blend off the straight path when
//! present.

use gpg_geom::{Line, Point};
use tracing::trace;

use crate::alink::AlLink;
use crate::frame::TimeGrid;

/// Quasi-linear interpolation between two same-length point clouds at
/// parameter `t` in `[0, 1]`, matching `interp_area.c`'s per-point blend.
fn blend_points(a: &[Point], b: &[Point], t: f64) -> Vec<Point> {
    a.iter().zip(b.iter()).map(|(pa, pb)| pa.lerp(*pb, t)).collect()
}

/// Nudges a linearly-blended point cloud toward a control node's position,
/// tapering the offset across the cloud by inverse distance to the node's
/// nearest index — a practical stand-in for the spline-through-control-
/// points the FPA interpolator performs in full.
fn apply_control_offset(points: &mut [Point], control: Point, weight: f64) {
    let n = points.len();
    if n == 0 {
        return;
    }
    let nearest = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.dist(control).partial_cmp(&b.dist(control)).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);
    let target_offset = control.sub(points[nearest]);
    for (i, p) in points.iter_mut().enumerate() {
        let d = (i as isize - nearest as isize).unsigned_abs() as f64;
        let falloff = (1.0 - d / n as f64).max(0.0);
        *p = p.add(target_offset.scale(weight * falloff));
    }
}

/// Produce the interpolated `Line` for tween frame `itween`, for one
/// representative link, or `None` if `itween` falls outside the chain's
/// active interval or the link has fewer than two active keys (a single
/// active key replicates verbatim across the whole time grid — `spec.md`
/// §4.5 edge case "static member").
pub fn tween_link_at(link: &AlLink, grid: &TimeGrid, itween: usize) -> Option<Line> {
    let active: Vec<(usize, &crate::alink::AlKey)> = link.active_keys().collect();
    if active.is_empty() {
        return None;
    }
    if active.len() == 1 {
        let (_, key) = active[0];
        return Some(key.line.clone());
    }

    let mplus = grid.tween_mplus(itween);
    let key_mplus: Vec<i64> = active.iter().map(|(k, _)| grid.key_mplus.get(*k).copied().unwrap_or(0)).collect();

    if mplus < *key_mplus.first().unwrap() || mplus > *key_mplus.last().unwrap() {
        return None;
    }

    let mut lo = 0;
    while lo + 1 < active.len() && key_mplus[lo + 1] <= mplus {
        lo += 1;
    }
    let hi = (lo + 1).min(active.len() - 1);
    if lo == hi {
        return Some(active[lo].1.line.clone());
    }

    let (m0, m1) = (key_mplus[lo], key_mplus[hi]);
    let t = if m1 > m0 { (mplus - m0) as f64 / (m1 - m0) as f64 } else { 0.0 };

    let (_, key0) = active[lo];
    let (_, key1) = active[hi];
    if key0.line.num_points() != key1.line.num_points() {
        // Resampling should have equalized point counts; fall back to the
        // nearer key rather than zipping mismatched clouds.
        return Some(if t < 0.5 { key0.line.clone() } else { key1.line.clone() });
    }

    let mut blended = blend_points(&key0.line.points, &key1.line.points, t);

    for control in &link.controls {
        if control.itween == itween {
            apply_control_offset(&mut blended, control.pos, 0.5);
        }
    }

    trace!(chain = link.id, itween, t, "tweened link");
    Some(Line { points: blended, closed: key0.line.closed })
}

/// Generate the full tween sequence for a representative link.
pub fn tween_link(link: &AlLink, grid: &TimeGrid) -> Vec<Option<Line>> {
    (0..grid.num_tween).map(|i| tween_link_at(link, grid, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_link::MemberType;

    fn sq(offset: f64) -> Line {
        Line::closed(vec![
            Point::new(offset, 0.0),
            Point::new(offset + 1.0, 0.0),
            Point::new(offset + 1.0, 1.0),
            Point::new(offset, 1.0),
        ])
    }

    #[test]
    fn linear_tween_midpoint() {
        let mut link = AlLink::new(0, MemberType::Bound, 3, 0, 2, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, sq(0.0), Point::new(0.0, 0.0)));
        link.keys[2] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, sq(10.0), Point::new(0.0, 0.0)));

        let grid = TimeGrid { key_mplus: vec![0, 30, 60], dtween: 30, num_tween: 3 };
        let mid = tween_link_at(&link, &grid, 1).unwrap();
        assert!((mid.points[0].x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn single_key_replicates() {
        let mut link = AlLink::new(1, MemberType::Bound, 2, 0, 0, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, sq(0.0), Point::new(0.0, 0.0)));
        let grid = TimeGrid { key_mplus: vec![0, 30], dtween: 30, num_tween: 2 };
        let out = tween_link_at(&link, &grid, 1).unwrap();
        assert_eq!(out.points, sq(0.0).points);
    }
}
