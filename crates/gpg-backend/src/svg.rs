//! SVG back end (`spec.md` §4.9 SVGMet). SVG's origin is top-left, so
//! every y-coordinate is mirrored against the page height (`spec.md` §3
//! "Coordinate spaces").

use std::fmt::Write as _;

use gpg_geom::Line;

use crate::error::{BackendError, BackendWarning};
use crate::presentation::{Justify, Presentation};
use crate::{EllipseSpec, GraphicsBackend, GroupEdge, SymbolSize};

pub struct SvgBackend {
    buf: String,
    height: f64,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self { buf: String::new(), height: 792.0 }
    }
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.buf
    }

    fn my(&self, y: f64) -> f64 {
        self.height - y
    }

    fn path_d(&self, line: &Line) -> String {
        let mut d = String::new();
        if let Some(first) = line.points.first() {
            let _ = write!(d, "M {:.3} {:.3}", first.x, self.my(first.y));
            for p in &line.points[1..] {
                let _ = write!(d, " L {:.3} {:.3}", p.x, self.my(p.y));
            }
            if line.closed {
                d.push_str(" Z");
            }
        }
        d
    }

    /// Converts an ellipse's start/end angle pair into SVG arc flags
    /// (`spec.md` §4.9 "Ellipse"): `(rx, ry, x-axis-rotation, large-arc,
    /// sweep, ex, ey)`.
    fn arc_params(&self, spec: &EllipseSpec) -> (f64, f64, f64, Point, Point, bool, bool) {
        let rx = spec.width / 2.0;
        let ry = spec.height / 2.0;
        let sa = spec.start_angle.to_radians();
        let ea = spec.end_angle.to_radians();
        let start = gpg_geom::Point::new(spec.centre.x + rx * sa.cos(), spec.centre.y + ry * sa.sin());
        let end = gpg_geom::Point::new(spec.centre.x + rx * ea.cos(), spec.centre.y + ry * ea.sin());
        let sweep_deg = (spec.end_angle - spec.start_angle).rem_euclid(360.0);
        let large_arc = sweep_deg > 180.0;
        // CCW in spec's convention becomes CW sweep on screen because of
        // the Y-flip the SVG coordinate space applies.
        let sweep = true;
        (rx, ry, start, end, sweep_deg, large_arc, sweep)
    }
}

use gpg_geom::Point;

impl GraphicsBackend for SvgBackend {
    fn initialize_display(&mut self) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        Ok(())
    }

    fn initialize_size(&mut self, width: f64, height: f64) -> Result<(), BackendError> {
        self.height = height;
        let _ = writeln!(self.buf, "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width:.0} {height:.0}\">");
        Ok(())
    }

    fn close_file(&mut self) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "</svg>");
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "<!-- {text} -->");
        Ok(())
    }

    fn write_group(&mut self, edge: GroupEdge, name: &str) -> Result<(), BackendError> {
        match edge {
            GroupEdge::Start => {
                let _ = writeln!(self.buf, "<g id=\"{name}\">");
            }
            GroupEdge::End => {
                let _ = writeln!(self.buf, "</g>");
            }
        }
        Ok(())
    }

    fn write_bitmap(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError> {
        let _ = writeln!(
            self.buf,
            "<image href=\"{path}\" x=\"{:.3}\" y=\"{:.3}\" width=\"{width:.3}\" height=\"{height:.3}\"/>",
            x,
            self.my(y) - height
        );
        Ok(())
    }

    fn write_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError> {
        self.write_bitmap(path, x, y, width, height)
    }

    fn write_box(&mut self, x: f64, y: f64, width: f64, height: f64, pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(
            self.buf,
            "<rect x=\"{x:.3}\" y=\"{:.3}\" width=\"{width:.3}\" height=\"{height:.3}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            self.my(y) - height,
            pres.fill_colour,
            pres.outline_colour,
            pres.line_width
        );
        Ok(())
    }

    fn write_ellipse(&mut self, spec: &EllipseSpec, pres: &Presentation) -> Result<Option<BackendWarning>, BackendError> {
        if spec.is_degenerate() {
            return Ok(Some(BackendWarning::DegenerateEllipse { width: spec.width, height: spec.height }));
        }
        let fill = if spec.do_fill { pres.fill_colour.as_str() } else { "none" };
        let stroke = if spec.do_outline { pres.outline_colour.as_str() } else { "none" };
        if spec.is_full() {
            let _ = writeln!(
                self.buf,
                "<ellipse cx=\"{:.3}\" cy=\"{:.3}\" rx=\"{:.3}\" ry=\"{:.3}\" transform=\"rotate({:.3} {:.3} {:.3})\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{}\"/>",
                spec.centre.x, self.my(spec.centre.y), spec.width / 2.0, spec.height / 2.0,
                spec.rotation, spec.centre.x, self.my(spec.centre.y), pres.line_width
            );
        } else {
            let (rx, ry, start, end, _sweep_deg, large_arc, sweep) = self.arc_params(spec);
            let close = if spec.closed { format!(" L {:.3} {:.3} Z", spec.centre.x, self.my(spec.centre.y)) } else { String::new() };
            let _ = writeln!(
                self.buf,
                "<path d=\"M {:.3} {:.3} A {rx:.3} {ry:.3} {:.3} {} {} {:.3} {:.3}{close}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{}\"/>",
                start.x, self.my(start.y), spec.rotation,
                large_arc as u8, sweep as u8,
                end.x, self.my(end.y), pres.line_width
            );
        }
        Ok(None)
    }

    fn write_underline(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(
            self.buf,
            "<line x1=\"{x0:.3}\" y1=\"{:.3}\" x2=\"{x1:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            self.my(y0), self.my(y1), pres.outline_colour, pres.line_width
        );
        Ok(())
    }

    fn write_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size: f64,
        justify: Justify,
        rotation: f64,
        do_outline: bool,
        pres: &Presentation,
    ) -> Result<(), BackendError> {
        let anchor = match justify {
            Justify::Left => "start",
            Justify::Centre => "middle",
            Justify::Right => "end",
        };
        let paint = if do_outline {
            format!("fill=\"none\" stroke=\"{}\"", pres.outline_colour)
        } else {
            format!("fill=\"{}\"", pres.outline_colour)
        };
        let _ = writeln!(
            self.buf,
            "<text x=\"{x:.3}\" y=\"{:.3}\" font-family=\"{}\" font-size=\"{size:.2}\" text-anchor=\"{anchor}\" transform=\"rotate({rotation:.3} {x:.3} {:.3})\" {paint}>{}</text>",
            self.my(y), pres.font, self.my(y), escape_xml(text)
        );
        Ok(())
    }

    fn write_lines(&mut self, lines: &[Line], pres: &Presentation) -> Result<(), BackendError> {
        for line in lines {
            if line.is_degenerate() {
                continue;
            }
            let _ = writeln!(self.buf, "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>", self.path_d(line), pres.outline_colour, pres.line_width);
        }
        Ok(())
    }

    fn write_outlines(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        let stroke = if do_outline { pres.outline_colour.as_str() } else { "none" };
        let fill = if do_fill { pres.interior_fill_colour.as_str() } else { "none" };
        for line in lines {
            if line.is_degenerate() {
                continue;
            }
            let _ = writeln!(self.buf, "<path d=\"{}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{}\"/>", self.path_d(line), pres.line_width);
        }
        Ok(())
    }

    fn write_boundaries(&mut self, boundary: &Line, holes: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        if boundary.is_degenerate() {
            return Ok(());
        }
        let mut d = self.path_d(boundary);
        for hole in holes {
            if hole.is_degenerate() {
                continue;
            }
            d.push(' ');
            d.push_str(&self.path_d(hole));
        }
        let stroke = if do_outline { pres.outline_colour.as_str() } else { "none" };
        let fill = if do_fill { pres.fill_colour.as_str() } else { "none" };
        let _ = writeln!(self.buf, "<path d=\"{d}\" fill-rule=\"evenodd\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{}\"/>", pres.line_width);
        Ok(())
    }

    fn write_features(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        self.write_outlines(lines, do_outline, do_fill, pres)
    }

    fn write_symbol(&mut self, file: &str, x: f64, y: f64, scale: f64, rotation: f64, _pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(
            self.buf,
            "<g transform=\"translate({x:.3} {:.3}) rotate({rotation:.3}) scale({scale:.4})\"><!-- symbol {file} --></g>",
            self.my(y)
        );
        Ok(())
    }

    fn graphics_symbol_size(&self, _file: &str, scale: f64) -> Result<SymbolSize, BackendError> {
        Ok(SymbolSize { width: 10.0 * scale, height: 10.0 * scale, cx: 5.0 * scale, cy: 5.0 * scale })
    }

    fn write_outline_mask(&mut self, line: &Line, on: bool) -> Result<(), BackendError> {
        if on {
            let _ = writeln!(self.buf, "<clipPath id=\"mask\"><path d=\"{}\"/></clipPath>", self.path_d(line));
            let _ = writeln!(self.buf, "<g clip-path=\"url(#mask)\">");
        } else {
            let _ = writeln!(self.buf, "</g>");
        }
        Ok(())
    }

    fn write_boundary_mask(&mut self, boundary: &Line, on: bool) -> Result<(), BackendError> {
        self.write_outline_mask(boundary, on)
    }

    fn render_output(&self) -> String {
        self.buf.clone()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
