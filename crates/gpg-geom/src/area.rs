use crate::error::GeomError;
use crate::line::Line;
use crate::point::Point;

fn nearest_vertex(line: &Line, p: Point) -> usize {
    line.points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.dist(p).partial_cmp(&b.dist(p)).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn arc_points(line: &Line, from: usize, to: usize) -> Vec<Point> {
    let n = line.points.len();
    let mut v = Vec::new();
    if n == 0 {
        return v;
    }
    let mut i = from;
    loop {
        v.push(line.points[i]);
        if i == to {
            break;
        }
        i = (i + 1) % n;
    }
    v
}

/// Splits a closed `boundary` into two subareas using a dividing line whose
/// endpoints lie on (or nearest to) the boundary. Mirrors the FPA
/// `divide_area(area, subarea, divl)` contract at the geometric level: the
/// two returned polygons share the divide as a common edge and together
/// cover the original boundary's interior.
///
/// Returns `DivAreaLeft`/`DivAreaRight` only when the divide degenerates to
/// a single boundary point on one side (the caller, per `spec.md` §4.6,
/// then re-stamps the surviving subarea and calls `reset_area_subids`).
pub fn divide_area(boundary: &Line, divide: &Line) -> Result<(Line, Line), GeomError> {
    if divide.points.len() < 2 {
        return Err(GeomError::TooFewPoints);
    }
    if boundary.points.len() < 3 {
        return Err(GeomError::TooFewPoints);
    }
    let i0 = nearest_vertex(boundary, divide.points[0]);
    let i1 = nearest_vertex(boundary, *divide.points.last().unwrap());
    if i0 == i1 {
        return Err(GeomError::DivideEndpointsNotOnBoundary);
    }

    let arc_a = arc_points(boundary, i0, i1);
    let arc_b = arc_points(boundary, i1, i0);

    let mut poly_a = arc_a;
    if divide.points.len() > 2 {
        let mut rev = divide.points.clone();
        rev.reverse();
        poly_a.extend_from_slice(&rev[1..rev.len() - 1]);
    }
    if poly_a.len() < 3 {
        return Err(GeomError::DivAreaLeft);
    }

    let mut poly_b = arc_b;
    if divide.points.len() > 2 {
        poly_b.extend_from_slice(&divide.points[1..divide.points.len() - 1]);
    }
    if poly_b.len() < 3 {
        return Err(GeomError::DivAreaRight);
    }

    Ok((Line::closed(poly_a), Line::closed(poly_b)))
}

/// `true` if `hole` lies inside `boundary` (centroid-based point-in-polygon
/// test, matching the semantic contract `hole_inside_area` gives callers:
/// a cheap inside/outside answer, not a full non-crossing proof against
/// divides).
pub fn hole_inside_area(boundary: &Line, hole: &Line) -> bool {
    if hole.points.is_empty() {
        return false;
    }
    boundary.contains_point(hole.centroid())
}
