//! The drawing-directive handlers (`spec.md` §4.9, `gra_process.c`'s
//! `do_box`/`do_ellipse`/`do_text`/`do_lines`/`do_images`/
//! `set_group_begin`/`set_presentation`): each takes the already-dissected
//! kv map, applies any local presentation overrides (`spec.md` §3
//! "certain directives honour locally-parsed presentation overrides
//! before invoking their action"), and calls the matching
//! [`gpg_backend::GraphicsBackend`] entry point on `ctx.backend`.
//!
//! Directives requiring live field data (`@areas`, `@contours`,
//! `@sample_field`, …) are out of scope except `@areas`, handled in
//! `engine.rs` alongside the loop stack's active-feature tracking.

use std::collections::HashMap;

use gpg_backend::{EllipseSpec, GroupEdge, Justify};
use gpg_geom::{Line, Point};

use crate::context::Context;
use crate::error::EngineError;

fn num(map: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    map.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn flag(map: &HashMap<String, String>, key: &str, default: bool) -> bool {
    map.get(key).map(|v| v == "true" || v == "1" || v == "yes").unwrap_or(default)
}

/// Applies every `key=value` pair in `map` to a scratch copy of the
/// process-wide presentation, leaving `ctx.presentation` untouched
/// (`@box`/`@ellipse`/`@text`/… take *local* overrides, `@presentation`
/// is the only directive that mutates the persistent one).
fn local_presentation(ctx: &Context, map: &HashMap<String, String>) -> gpg_backend::Presentation {
    let mut pres = ctx.presentation.clone();
    for (k, v) in map {
        pres.apply_override(k, v);
    }
    pres
}

/// Parses a whitespace-separated `"x1,y1 x2,y2 x3,y3"` point list, the
/// textual form `@lines`/`@box`-adjacent directives pass for an explicit
/// point set.
fn parse_points(text: &str) -> Vec<Point> {
    text.split_whitespace()
        .filter_map(|pair| {
            let (x, y) = pair.split_once(',')?;
            Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .collect()
}

/// `@presentation { outline=…; fill=…; line_width=…; … }` — `set_presentation`
/// in the original: mutates the process-wide current presentation that
/// every later directive inherits until overridden again.
pub fn handle_presentation(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    for (k, v) in map {
        ctx.presentation.apply_override(k, v);
    }
    Ok(())
}

/// `@gpgen_group_begin { name=… }` / `@gpgen_group_end { }`.
pub fn handle_group_begin(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let name = map.get("name").cloned().unwrap_or_default();
    ctx.backend.write_group(GroupEdge::Start, &name)?;
    Ok(())
}

pub fn handle_group_end(ctx: &mut Context) -> Result<(), EngineError> {
    ctx.backend.write_group(GroupEdge::End, "")?;
    Ok(())
}

/// `@box { x=…; y=…; width=…; height=… }`.
pub fn handle_box(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let pres = local_presentation(ctx, map);
    let (x, y, w, h) = (num(map, "x", 0.0), num(map, "y", 0.0), num(map, "width", 0.0), num(map, "height", 0.0));
    ctx.backend.write_box(x, y, w, h, &pres)?;
    Ok(())
}

/// `@ellipse { x=…; y=…; width=…; height=…; sangle=…; eangle=…; closed=…;
/// rotation=…; outline_draw=…; fill_draw=… }`. Degenerate ellipses
/// (`spec.md` §7 "Geometry warnings") are reported and skipped, not
/// propagated as a fatal error.
pub fn handle_ellipse(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let pres = local_presentation(ctx, map);
    let spec = EllipseSpec {
        centre: Point::new(num(map, "x", 0.0), num(map, "y", 0.0)),
        width: num(map, "width", 0.0),
        height: num(map, "height", 0.0),
        start_angle: num(map, "sangle", 0.0),
        end_angle: num(map, "eangle", 0.0),
        closed: flag(map, "closed", true),
        rotation: num(map, "rotation", 0.0),
        do_outline: flag(map, "outline_draw", pres.outline_first),
        do_fill: flag(map, "fill_draw", pres.fill_colour != "none"),
    };
    if spec.is_degenerate() {
        ctx.warn(format!("degenerate ellipse ({}x{}) skipped", spec.width, spec.height));
        return Ok(());
    }
    if let Some(warning) = ctx.backend.write_ellipse(&spec, &pres)? {
        ctx.warn(warning.to_string());
    }
    Ok(())
}

/// `@draw_line { x0=…; y0=…; x1=…; y1=… }` (underline primitive).
pub fn handle_underline(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let pres = local_presentation(ctx, map);
    ctx.backend.write_underline(num(map, "x0", 0.0), num(map, "y0", 0.0), num(map, "x1", 0.0), num(map, "y1", 0.0), &pres)?;
    Ok(())
}

/// `@text { string=…; x=…; y=…; size=…; justify=…; rotation=… }`.
pub fn handle_text(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let pres = local_presentation(ctx, map);
    let text = map.get("string").cloned().unwrap_or_default();
    let text = ctx.expand_value(&text);
    ctx.backend.write_text(
        &text,
        num(map, "x", 0.0),
        num(map, "y", 0.0),
        num(map, "size", pres.text_size),
        pres.justify,
        num(map, "rotation", 0.0),
        flag(map, "outline_draw", pres.outline_first),
        &pres,
    )?;
    Ok(())
}

/// `@lines { line=…; closed=… }` — a polyline set (`spec.md` §4.9
/// "polyline set"). `line` may repeat; the dissected body keeps every
/// occurrence as a bare (keyless) entry, so this reads the raw entries
/// directly rather than the collapsed `key -> value` map.
pub fn handle_lines(ctx: &mut Context, map: &HashMap<String, String>, bare_values: &[String]) -> Result<(), EngineError> {
    let pres = local_presentation(ctx, map);
    let closed = flag(map, "closed", false);
    let lines: Vec<Line> = bare_values
        .iter()
        .map(|raw| parse_points(raw))
        .filter(|pts| pts.len() >= 2)
        .map(|pts| if closed { Line::closed(pts) } else { Line::open(pts) })
        .collect();
    if lines.is_empty() {
        ctx.warn("@lines produced no usable line (fewer than 2 points)".to_string());
        return Ok(());
    }
    ctx.backend.write_lines(&lines, &pres)?;
    Ok(())
}

/// `@images { file=…; x=…; y=…; width=…; height=… }` (`do_images`).
pub fn handle_images(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let path = map.get("file").cloned().unwrap_or_default();
    let path = ctx.expand_value(&path);
    ctx.backend.write_image(&path, num(map, "x", 0.0), num(map, "y", 0.0), num(map, "width", 0.0), num(map, "height", 0.0))?;
    Ok(())
}

/// `@label { symbol=…; x=…; y=…; scale=…; rotation=… }` — labels in the
/// original attach a symbol-library glyph at a point (`do_label`); text
/// labels without a `symbol` key fall back to `write_text`.
pub fn handle_label(ctx: &mut Context, map: &HashMap<String, String>) -> Result<(), EngineError> {
    let pres = local_presentation(ctx, map);
    let (x, y) = (num(map, "x", 0.0), num(map, "y", 0.0));
    if let Some(symbol) = map.get("symbol") {
        let symbol = ctx.expand_value(symbol);
        ctx.backend.write_symbol(&symbol, x, y, num(map, "scale", 1.0), num(map, "rotation", 0.0), &pres)?;
        return Ok(());
    }
    let text = map.get("text").or_else(|| map.get("string")).cloned().unwrap_or_default();
    let text = ctx.expand_value(&text);
    ctx.backend.write_text(&text, x, y, num(map, "size", pres.text_size), pres.justify, num(map, "rotation", 0.0), false, &pres)?;
    Ok(())
}
