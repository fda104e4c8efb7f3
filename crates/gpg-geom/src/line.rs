use crate::error::GeomError;
use crate::point::Point;

/// A polyline: an ordered list of points, either open (a dividing line) or
/// closed (a boundary or a hole). Mirrors the FPA `LINE` contract used
/// throughout `interp_area.c`: `closed` lines are implicitly cyclic (the
/// segment from the last point back to the first exists) but the first
/// point is not physically duplicated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Result of a closest-point query, matching `line_closest_point`'s
/// contract: the index of the segment the projection falls on, the
/// projected point itself, and the fractional "arc index" used by the
/// merge/split windowing in `spec.md` §11.5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub index: usize,
    pub point: Point,
    pub frac_index: f64,
    pub distance: f64,
}

impl Line {
    pub fn open(points: Vec<Point>) -> Self {
        Self { points, closed: false }
    }

    pub fn closed(points: Vec<Point>) -> Self {
        Self { points, closed: true }
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Total arc length, including the closing segment for closed lines.
    pub fn length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for w in self.points.windows(2) {
            total += w[0].dist(w[1]);
        }
        if self.closed {
            total += self.points[self.points.len() - 1].dist(self.points[0]);
        }
        total
    }

    /// Average spacing between consecutive raw points — used to seed the
    /// spline `res` parameter per `spec.md` §4.4 step 1.
    pub fn average_spacing(&self) -> f64 {
        let n = if self.closed { self.points.len() } else { self.points.len().saturating_sub(1) };
        if n == 0 {
            return 0.0;
        }
        self.length() / n as f64
    }

    /// Signed area via the shoelace formula. Positive for counter-clockwise
    /// point order, negative for clockwise, under a standard right-handed
    /// (x right, y up) coordinate system.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }

    /// `true` if the outer boundary is traversed clockwise — `cw` in
    /// `spec.md` §4.1.
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn reversed(&self) -> Line {
        let mut l = self.clone();
        l.reverse();
        l
    }

    /// Rotates a closed line's point array so that `index` becomes point 0,
    /// preserving traversal order. No-op for open lines or out-of-range
    /// indices.
    pub fn rotate_to_start(&mut self, index: usize) {
        if !self.closed || self.points.is_empty() || index >= self.points.len() {
            return;
        }
        self.points.rotate_left(index);
    }

    /// Returns the index of (and projected position on) the segment of
    /// this line closest to `target`. For closed lines the wraparound
    /// segment (last → first) is considered. Mirrors `line_closest_point`.
    pub fn closest_point(&self, target: Point) -> Result<ClosestPoint, GeomError> {
        if self.points.len() < 2 {
            return Err(GeomError::TooFewPoints);
        }
        let n = self.points.len();
        let segs = if self.closed { n } else { n - 1 };
        let mut best: Option<ClosestPoint> = None;
        for i in 0..segs {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let ab = b.sub(a);
            let len2 = ab.x * ab.x + ab.y * ab.y;
            let t = if len2 <= f64::EPSILON {
                0.0
            } else {
                (((target.x - a.x) * ab.x + (target.y - a.y) * ab.y) / len2).clamp(0.0, 1.0)
            };
            let proj = a.lerp(b, t);
            let d = target.dist(proj);
            let candidate = ClosestPoint {
                index: i,
                point: proj,
                frac_index: i as f64 + t,
                distance: d,
            };
            if best.is_none_or(|c| d < c.distance) {
                best = Some(candidate);
            }
        }
        best.ok_or(GeomError::TooFewPoints)
    }

    /// Point-in-polygon test (ray casting, even-odd rule) for closed
    /// lines. Used by `hole_inside_area` and for anchoring resample
    /// rotation to "top of map".
    pub fn contains_point(&self, p: Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            let intersects = (pi.y > p.y) != (pj.y > p.y)
                && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if intersects {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::default();
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }

    /// Distance-based decimation ("filter" stage of the resample pipe):
    /// keeps a point only if it is at least `min_spacing` away from the
    /// last kept point. The final/first point of a closed line is always
    /// retained to keep the polygon anchored.
    pub fn decimate(&self, min_spacing: f64) -> Line {
        if self.points.len() < 3 || min_spacing <= 0.0 {
            return self.clone();
        }
        let mut kept = vec![self.points[0]];
        for &p in &self.points[1..] {
            if p.dist(*kept.last().unwrap()) >= min_spacing {
                kept.push(p);
            }
        }
        if self.closed && kept.len() > 1 && kept.last().unwrap().dist(kept[0]) < min_spacing {
            kept.pop();
        }
        Line { points: kept, closed: self.closed }
    }

    /// Appends points `[from..=to]` of `other` (wrapping for closed lines)
    /// onto `self`, optionally walking the points in reverse. Mirrors
    /// `append_line_pdir`.
    pub fn append_pdir(&mut self, other: &Line, from: usize, to: usize, forward: bool) {
        let n = other.points.len();
        if n == 0 {
            return;
        }
        if forward {
            let mut i = from;
            loop {
                self.points.push(other.points[i % n]);
                if i == to {
                    break;
                }
                i += 1;
                if i > to && !other.closed {
                    break;
                }
            }
        } else {
            let mut i = from;
            loop {
                self.points.push(other.points[i % n]);
                if i == to {
                    break;
                }
                if i == 0 {
                    if !other.closed {
                        break;
                    }
                    i = n - 1;
                } else {
                    i -= 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_ccw_by_default_construction() {
        let l = Line::closed(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        assert!(!l.is_clockwise());
        assert!(l.signed_area() > 0.0);
    }

    #[test]
    fn reversed_triangle_is_cw() {
        let mut l = Line::closed(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        l.reverse();
        assert!(l.is_clockwise());
    }

    #[test]
    fn closest_point_on_segment() {
        let l = Line::open(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        let cp = l.closest_point(Point::new(4.0, 3.0)).unwrap();
        assert!((cp.point.x - 4.0).abs() < 1e-9);
        assert!((cp.point.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn contains_point_basic_square() {
        let l = Line::closed(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        assert!(l.contains_point(Point::new(5.0, 5.0)));
        assert!(!l.contains_point(Point::new(15.0, 5.0)));
    }

    #[test]
    fn decimate_drops_close_points() {
        let l = Line::open(vec![
            Point::new(0.0, 0.0),
            Point::new(0.1, 0.0),
            Point::new(0.2, 0.0),
            Point::new(5.0, 0.0),
        ]);
        let d = l.decimate(1.0);
        assert_eq!(d.points.len(), 2);
    }
}
