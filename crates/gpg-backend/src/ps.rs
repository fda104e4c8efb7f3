//! PostScript back end (`spec.md` §4.9 PSMet). Emits a restartable stream
//! of PostScript operators into an in-memory buffer; `gpg-engine` owns
//! actually flushing the buffer to the file `@file_name` opened.

use std::fmt::Write as _;

use gpg_geom::Line;

use crate::error::{BackendError, BackendWarning};
use crate::presentation::{Justify, Presentation};
use crate::{EllipseSpec, GraphicsBackend, GroupEdge, SymbolSize};

pub struct PsBackend {
    buf: String,
    width: f64,
    height: f64,
}

impl Default for PsBackend {
    fn default() -> Self {
        Self { buf: String::new(), width: 612.0, height: 792.0 }
    }
}

impl PsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.buf
    }

    fn emit_path(&mut self, line: &Line) {
        if line.points.is_empty() {
            return;
        }
        let first = line.points[0];
        let _ = writeln!(self.buf, "newpath");
        let _ = writeln!(self.buf, "{:.3} {:.3} moveto", first.x, first.y);
        for p in &line.points[1..] {
            let _ = writeln!(self.buf, "{:.3} {:.3} lineto", p.x, p.y);
        }
        if line.closed {
            let _ = writeln!(self.buf, "closepath");
        }
    }

    fn apply_stroke(&mut self, pres: &Presentation) {
        let _ = writeln!(self.buf, "{:.2} setlinewidth", pres.line_width);
        let _ = writeln!(self.buf, "({}) findcolor setrgbcolor", pres.outline_colour);
        let _ = writeln!(self.buf, "stroke");
    }

    fn apply_fill(&mut self, colour: &str) {
        let _ = writeln!(self.buf, "gsave ({colour}) findcolor setrgbcolor fill grestore");
    }
}

impl GraphicsBackend for PsBackend {
    fn initialize_display(&mut self) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "%!PS-Adobe-3.0");
        Ok(())
    }

    fn initialize_size(&mut self, width: f64, height: f64) -> Result<(), BackendError> {
        self.width = width;
        self.height = height;
        let _ = writeln!(self.buf, "%%BoundingBox: 0 0 {width:.0} {height:.0}");
        Ok(())
    }

    fn close_file(&mut self) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "showpage");
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> Result<(), BackendError> {
        for line in text.lines() {
            let _ = writeln!(self.buf, "% {line}");
        }
        Ok(())
    }

    fn write_group(&mut self, edge: GroupEdge, name: &str) -> Result<(), BackendError> {
        match edge {
            GroupEdge::Start => {
                let _ = writeln!(self.buf, "% begin group {name}");
            }
            GroupEdge::End => {
                let _ = writeln!(self.buf, "% end group {name}");
            }
        }
        Ok(())
    }

    fn write_bitmap(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "% bitmap {path} at {x:.2} {y:.2} size {width:.2}x{height:.2}");
        Ok(())
    }

    fn write_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError> {
        self.write_bitmap(path, x, y, width, height)
    }

    fn write_box(&mut self, x: f64, y: f64, width: f64, height: f64, pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "newpath");
        let _ = writeln!(self.buf, "{x:.3} {y:.3} moveto");
        let _ = writeln!(self.buf, "{:.3} 0 rlineto", width);
        let _ = writeln!(self.buf, "0 {:.3} rlineto", height);
        let _ = writeln!(self.buf, "{:.3} 0 rlineto", -width);
        let _ = writeln!(self.buf, "closepath");
        if pres.fill_colour != "none" {
            self.apply_fill(&pres.fill_colour);
        }
        self.apply_stroke(pres);
        Ok(())
    }

    fn write_ellipse(&mut self, spec: &EllipseSpec, pres: &Presentation) -> Result<Option<BackendWarning>, BackendError> {
        if spec.is_degenerate() {
            return Ok(Some(BackendWarning::DegenerateEllipse { width: spec.width, height: spec.height }));
        }
        let (sa, ea) = if spec.is_full() { (0.0, 360.0) } else { (spec.start_angle, spec.end_angle) };
        let _ = writeln!(self.buf, "gsave");
        let _ = writeln!(self.buf, "{:.3} {:.3} translate", spec.centre.x, spec.centre.y);
        let _ = writeln!(self.buf, "{:.3} rotate", spec.rotation);
        let _ = writeln!(self.buf, "1 {:.6} scale", spec.height / spec.width);
        let _ = writeln!(self.buf, "newpath");
        let _ = writeln!(self.buf, "0 0 {:.3} {:.3} {:.3} arc", spec.width / 2.0, sa, ea);
        if spec.closed {
            let _ = writeln!(self.buf, "closepath");
        }
        if spec.do_fill {
            let _ = writeln!(self.buf, "gsave ({}) findcolor setrgbcolor fill grestore", pres.fill_colour);
        }
        if spec.do_outline {
            let _ = writeln!(self.buf, "{:.2} setlinewidth ({}) findcolor setrgbcolor stroke", pres.line_width, pres.outline_colour);
        }
        let _ = writeln!(self.buf, "grestore");
        Ok(None)
    }

    fn write_underline(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "newpath {x0:.3} {y0:.3} moveto {x1:.3} {y1:.3} lineto");
        self.apply_stroke(pres);
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
        let _ = writeln!(self.buf, "gsave");
        let _ = writeln!(self.buf, "{x:.3} {y:.3} translate {rotation:.3} rotate");
        let _ = writeln!(self.buf, "/{} findfont {size:.2} scalefont setfont", pres.font);
        let anchor = match justify {
            Justify::Left => "0",
            Justify::Centre => "dup stringwidth pop 2 div neg",
            Justify::Right => "dup stringwidth pop neg",
        };
        let _ = writeln!(self.buf, "({text}) {anchor} 0 moveto");
        if do_outline {
            let _ = writeln!(self.buf, "({text}) true charpath ({}) findcolor setrgbcolor stroke", pres.outline_colour);
        } else {
            let _ = writeln!(self.buf, "({text}) show");
        }
        let _ = writeln!(self.buf, "grestore");
        Ok(())
    }

    fn write_lines(&mut self, lines: &[Line], pres: &Presentation) -> Result<(), BackendError> {
        for line in lines {
            if line.is_degenerate() {
                continue;
            }
            self.emit_path(line);
            self.apply_stroke(pres);
        }
        Ok(())
    }

    fn write_outlines(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        for line in lines {
            if line.is_degenerate() {
                continue;
            }
            self.emit_path(line);
            if do_fill {
                self.apply_fill(&pres.interior_fill_colour);
            }
            if do_outline {
                self.apply_stroke(pres);
            }
        }
        Ok(())
    }

    fn write_boundaries(&mut self, boundary: &Line, holes: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        if boundary.is_degenerate() {
            return Ok(());
        }
        let _ = writeln!(self.buf, "newpath");
        self.emit_path(boundary);
        for hole in holes {
            if hole.is_degenerate() {
                continue;
            }
            self.emit_path(hole);
        }
        let _ = writeln!(self.buf, "eofill");
        if do_fill {
            self.apply_fill(&pres.fill_colour);
        }
        if do_outline {
            self.apply_stroke(pres);
        }
        Ok(())
    }

    fn write_features(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        self.write_outlines(lines, do_outline, do_fill, pres)
    }

    fn write_symbol(&mut self, file: &str, x: f64, y: f64, scale: f64, rotation: f64, _pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "gsave {x:.3} {y:.3} translate {rotation:.3} rotate {scale:.4} dup scale");
        let _ = writeln!(self.buf, "% include symbol {file}");
        let _ = writeln!(self.buf, "grestore");
        Ok(())
    }

    fn graphics_symbol_size(&self, _file: &str, scale: f64) -> Result<SymbolSize, BackendError> {
        Ok(SymbolSize { width: 10.0 * scale, height: 10.0 * scale, cx: 5.0 * scale, cy: 5.0 * scale })
    }

    fn write_outline_mask(&mut self, line: &Line, on: bool) -> Result<(), BackendError> {
        if on {
            let _ = writeln!(self.buf, "gsave");
            self.emit_path(line);
            let _ = writeln!(self.buf, "clip");
        } else {
            let _ = writeln!(self.buf, "grestore");
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

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_geom::Point;

    #[test]
    fn box_emits_moveto_and_stroke() {
        let mut b = PsBackend::new();
        b.initialize_display().unwrap();
        b.write_box(1.0, 2.0, 3.0, 4.0, &Presentation::default()).unwrap();
        assert!(b.output().contains("moveto"));
        assert!(b.output().contains("stroke"));
    }

    #[test]
    fn degenerate_ellipse_warns_without_output() {
        let mut b = PsBackend::new();
        let spec = EllipseSpec {
            centre: Point::new(0.0, 0.0),
            width: 0.0,
            height: 5.0,
            start_angle: 0.0,
            end_angle: 0.0,
            closed: true,
            rotation: 0.0,
            do_outline: true,
            do_fill: false,
        };
        let warning = b.write_ellipse(&spec, &Presentation::default()).unwrap();
        assert!(matches!(warning, Some(BackendWarning::DegenerateEllipse { .. })));
    }
}
