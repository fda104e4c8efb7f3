//! Topology assembler (`spec.md` §4.6): takes the per-link tweened lines
//! produced by `tween.rs` and reassembles them into full `PolygonFrame`s —
//! pipe-resampling each line to the output resolution, inserting holes and
//! divides back into their owning boundary, restamping subarea attributes
//! when a divide degenerates, and replicating labels/spots.

use gpg_geom::{divide_area, hole_inside_area, run_pipe, Line, Point, PipeOptions};
use gpg_link::MemberType;
use tracing::warn;

use crate::alink::AlLink;
use crate::error::Diagnostic;
use crate::frame::{Area, PolygonFrame, Spot, Subarea, TimeGrid};
use crate::tween::tween_link_at;

/// Left/right subarea attributes stamped onto a divide's `AlKey`s during the
/// link builder, read back here to populate the subareas a divide carves
/// out. Every active key carries the same values (`spec.md` §4.1), so the
/// first one is representative.
fn divide_attrs(link: &AlLink) -> (Subarea, Subarea) {
    match link.active_keys().next() {
        Some((_, key)) => (
            Subarea { category: String::new(), value: key.lval.clone(), label: key.llab.clone(), cal: key.lcal.clone() },
            Subarea { category: String::new(), value: key.rval.clone(), label: key.rlab.clone(), cal: key.rcal.clone() },
        ),
        None => (Subarea::default(), Subarea::default()),
    }
}

/// Pipe-resample a tweened line to `resolution`, applying the "zero lines
/// -> skip with warning, multiple lines -> keep first with warning"
/// contract from `spec.md` §4.6 step 1.
fn resolve_tweened_line(
    line: Line,
    resolution: f64,
    chain_id: usize,
    itween: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Line> {
    let mut out = run_pipe(&line, PipeOptions::default(), resolution);
    match out.len() {
        0 => {
            diagnostics.push(Diagnostic::ZeroLinesFromPipe { chain_id, itween });
            None
        }
        1 => Some(out.remove(0)),
        n => {
            diagnostics.push(Diagnostic::MultipleLinesFromPipe { chain_id, itween, count: n });
            Some(out.remove(0))
        }
    }
}

/// Assemble tween frame `itween` from every representative link active in
/// the time grid. `boundary_of` maps a chain id back to the originating
/// area index so holes/divides can be attached to the right boundary even
/// after resampling has changed point counts.
pub fn assemble_frame(
    links: &[AlLink],
    grid: &TimeGrid,
    itween: usize,
    resolution: f64,
    diagnostics: &mut Vec<Diagnostic>,
) -> PolygonFrame {
    let mut frame = PolygonFrame { mplus: grid.tween_mplus(itween), areas: Vec::new() };

    // First pass: boundaries become areas.
    let mut boundary_slot: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    for link in links.iter().filter(|l| l.is_representative() && l.ltype == MemberType::Bound) {
        let Some(line) = tween_link_at(link, grid, itween) else { continue };
        let Some(line) = resolve_tweened_line(line, resolution, link.id, itween, diagnostics) else { continue };
        let area_index = frame.areas.len();
        frame.areas.push(Area { boundary: Some(line), ..Default::default() });
        boundary_slot.insert(link.id, area_index);
    }

    // Second pass: holes, matched to the boundary whose interior contains them.
    for link in links.iter().filter(|l| l.is_representative() && l.ltype == MemberType::Hole) {
        let Some(line) = tween_link_at(link, grid, itween) else { continue };
        let Some(line) = resolve_tweened_line(line, resolution, link.id, itween, diagnostics) else { continue };

        let owner = frame
            .areas
            .iter()
            .position(|a| a.boundary.as_ref().is_some_and(|b| hole_inside_area(b, &line)));
        match owner {
            Some(idx) => frame.areas[idx].holes.push(line),
            None => diagnostics.push(Diagnostic::HoleOutsideBoundary { chain_id: link.id, itween }),
        }
    }

    // Third pass: divides split their owning area's default subarea into
    // two, restamping attributes if the split degenerates on one side.
    for link in links.iter().filter(|l| l.is_representative() && l.ltype == MemberType::Div) {
        let Some(line) = tween_link_at(link, grid, itween) else { continue };
        let Some(line) = resolve_tweened_line(line, resolution, link.id, itween, diagnostics) else { continue };

        let owner = frame
            .areas
            .iter()
            .position(|a| a.boundary.as_ref().is_some_and(|b| b.contains_point(line.centroid())))
            .or(if frame.areas.len() == 1 { Some(0) } else { None });
        let Some(idx) = owner else { continue };

        match frame.areas[idx].boundary.as_ref() {
            Some(boundary) => match divide_area(boundary, &line) {
                Ok((_left, _right)) => {
                    frame.areas[idx].divides.push(line);
                    let (left_attrs, right_attrs) = divide_attrs(link);
                    if frame.areas[idx].subareas.is_empty() {
                        frame.areas[idx].subareas.push(left_attrs);
                    }
                    let new_index = frame.areas[idx].subareas.len();
                    frame.areas[idx].subareas.push(right_attrs);
                    frame.areas[idx].subids.push(new_index);
                }
                Err(gpg_geom::GeomError::DivAreaLeft) => {
                    diagnostics.push(Diagnostic::DivideAreaFailed { chain_id: link.id, itween, side: "left" });
                    restamp_from_default(&mut frame.areas[idx]);
                }
                Err(gpg_geom::GeomError::DivAreaRight) => {
                    diagnostics.push(Diagnostic::DivideAreaFailed { chain_id: link.id, itween, side: "right" });
                    restamp_from_default(&mut frame.areas[idx]);
                }
                Err(_) => {
                    warn!(chain = link.id, itween, "divide_area failed for an unexpected reason, skipping divide");
                }
            },
            None => {}
        }
    }

    frame
}

/// Resets an area's attribute set to subarea 0's defaults after a divide
/// fails to produce two valid pieces (`spec.md` §4.6 "reset_area_subids").
fn restamp_from_default(area: &mut Area) {
    if let Some(default) = area.default_attributes().cloned() {
        area.subareas = vec![default];
        area.subids = vec![0];
    }
}

/// Replicates a boundary's spots into a tweened area, shifting each spot
/// by the centroid displacement between the source area and the tweened
/// boundary (`spec.md` §4.6 "Label replication"). Called by the directive
/// layer, which holds both the source `Area` (for its `spots`) and the
/// assembled tween `Area` the spots are copied into — `gpg-interp` itself
/// only tracks boundary/divide/hole chains, not per-spot link chains.
pub fn replicate_area_spots(source: &Area, tweened_boundary: &Line) -> Vec<Spot> {
    let Some(source_boundary) = source.boundary.as_ref() else { return Vec::new() };
    let shift = tweened_boundary.centroid().sub(source_boundary.centroid());
    source
        .spots
        .iter()
        .map(|s| Spot { subarea_index: s.subarea_index, pos: s.pos.add(shift), label: s.label.clone() })
        .collect()
}

/// Orientation/flip correction used before a divide or hole tweened line
/// is inserted: chains flagged during the link builder (`spec.md` §4.1)
/// are reversed back to the representative's canonical direction.
pub fn correct_orientation(line: &mut Line, flip: bool) {
    if flip {
        line.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_link::MemberType;

    fn square(offset: f64) -> Line {
        Line::closed(vec![
            Point::new(offset, offset),
            Point::new(offset + 10.0, offset),
            Point::new(offset + 10.0, offset + 10.0),
            Point::new(offset, offset + 10.0),
        ])
    }

    #[test]
    fn assembles_single_boundary_frame() {
        let mut link = AlLink::new(0, MemberType::Bound, 2, 0, 1, 0, 0);
        link.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, square(0.0), Point::new(0.0, 0.0)));
        link.keys[1] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, square(0.0), Point::new(0.0, 0.0)));

        let grid = TimeGrid { key_mplus: vec![0, 60], dtween: 60, num_tween: 2 };
        let mut diags = Vec::new();
        let frame = assemble_frame(&[link], &grid, 0, 2.0, &mut diags);
        assert_eq!(frame.areas.len(), 1);
    }

    #[test]
    fn hole_attaches_to_containing_boundary() {
        let mut bound = AlLink::new(0, MemberType::Bound, 1, 0, 0, 0, 0);
        bound.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, square(0.0), Point::new(0.0, 0.0)));

        let hole_line = Line::closed(vec![
            Point::new(4.0, 4.0),
            Point::new(6.0, 4.0),
            Point::new(6.0, 6.0),
            Point::new(4.0, 6.0),
        ]);
        let mut hole = AlLink::new(1, MemberType::Hole, 1, 0, 0, 0, 0);
        hole.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Hole, 0, hole_line, Point::new(4.0, 4.0)));

        let grid = TimeGrid { key_mplus: vec![0], dtween: 60, num_tween: 1 };
        let mut diags = Vec::new();
        let frame = assemble_frame(&[bound, hole], &grid, 0, 2.0, &mut diags);
        assert_eq!(frame.areas.len(), 1);
        assert_eq!(frame.areas[0].holes.len(), 1);
    }
}
