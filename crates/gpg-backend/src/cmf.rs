//! Corel metafile back end (`spec.md` §4.9 CorMet), grounded on
//! `write_cormet_*` in `gra_io.c`: a line-oriented textual metafile with
//! `@m`/`@l` move/line, `@r` rectangle, `@e` ellipse, `@t` text, angles
//! expressed in deci-degrees (tenths of a degree).

use std::fmt::Write as _;

use gpg_geom::Line;

use crate::error::{BackendError, BackendWarning};
use crate::presentation::{Justify, Presentation};
use crate::{EllipseSpec, GraphicsBackend, GroupEdge, SymbolSize};

const CMF_VERSION: u32 = 101;

pub struct CmfBackend {
    buf: String,
}

impl Default for CmfBackend {
    fn default() -> Self {
        Self { buf: String::new() }
    }
}

impl CmfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.buf
    }

    fn emit_polyline(&mut self, line: &Line) {
        if line.points.len() < 2 {
            return;
        }
        let first = line.points[0];
        let _ = writeln!(self.buf, "@m {:.0} {:.0}", first.x, first.y);
        for p in &line.points[1..] {
            let _ = writeln!(self.buf, "@l {:.0} {:.0}", p.x, p.y);
        }
        if line.closed {
            let _ = writeln!(self.buf, "@l {:.0} {:.0}", first.x, first.y);
        }
    }
}

impl GraphicsBackend for CmfBackend {
    fn initialize_display(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn initialize_size(&mut self, width: f64, height: f64) -> Result<(), BackendError> {
        let _ = writeln!(
            self.buf,
            "@CorelMF {CMF_VERSION} {:.0} {:.0} {:.0} {:.0}",
            -(width / 2.0),
            height / 2.0,
            width / 2.0,
            -(height / 2.0)
        );
        Ok(())
    }

    fn close_file(&mut self) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "@EOF");
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> Result<(), BackendError> {
        for line in text.lines() {
            let _ = writeln!(self.buf, "; {line}");
        }
        Ok(())
    }

    fn write_group(&mut self, edge: GroupEdge, name: &str) -> Result<(), BackendError> {
        match edge {
            GroupEdge::Start => {
                let _ = writeln!(self.buf, "; begin group {name}");
            }
            GroupEdge::End => {
                let _ = writeln!(self.buf, "; end group {name}");
            }
        }
        Ok(())
    }

    fn write_bitmap(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "@b \"{path}\" {x:.0} {y:.0} {width:.0} {height:.0}");
        Ok(())
    }

    fn write_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError> {
        self.write_bitmap(path, x, y, width, height)
    }

    fn write_box(&mut self, x: f64, y: f64, width: f64, height: f64, pres: &Presentation) -> Result<(), BackendError> {
        let outline = if pres.outline_colour == "none" { "@xO".to_string() } else { format!("@O \"{}\"", pres.outline_colour) };
        let fill = if pres.fill_colour == "none" { "@xF".to_string() } else { format!("@F \"{}\"", pres.fill_colour) };
        let _ = writeln!(self.buf, "{outline}");
        let _ = writeln!(self.buf, "{fill}");
        let _ = writeln!(self.buf, "@r {x:.0} {y:.0} {width:.0} {height:.0} 0 0");
        Ok(())
    }

    fn write_ellipse(&mut self, spec: &EllipseSpec, pres: &Presentation) -> Result<Option<BackendWarning>, BackendError> {
        if spec.is_degenerate() {
            return Ok(Some(BackendWarning::DegenerateEllipse { width: spec.width, height: spec.height }));
        }
        if spec.do_outline {
            let _ = writeln!(self.buf, "@O \"{}\"", pres.outline_colour);
        } else {
            let _ = writeln!(self.buf, "@xO");
        }
        if spec.do_fill {
            let _ = writeln!(self.buf, "@F \"{}\"", pres.fill_colour);
        } else {
            let _ = writeln!(self.buf, "@xF");
        }
        if spec.is_full() {
            let _ = writeln!(
                self.buf,
                "@e {:.0} {:.0} {:.0} {:.0} 0 0 0 {:.0}",
                spec.centre.x, spec.centre.y, spec.width, spec.height, spec.rotation * 10.0
            );
        } else {
            let closed_flag = u8::from(spec.closed);
            let _ = writeln!(
                self.buf,
                "@e {:.0} {:.0} {:.0} {:.0} {:.0} {:.0} {closed_flag} {:.0}",
                spec.centre.x, spec.centre.y, spec.width, spec.height,
                spec.start_angle * 10.0, spec.end_angle * 10.0, spec.rotation * 10.0
            );
        }
        Ok(None)
    }

    fn write_underline(&mut self, x0: f64, y0: f64, x1: f64, _y1: f64, _pres: &Presentation) -> Result<(), BackendError> {
        let width = x1 - x0;
        let _ = writeln!(self.buf, "@r {x0:.0} {y0:.0} {width:.0} 0 0 0");
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
        if text.is_empty() {
            return Ok(());
        }
        let outline = if do_outline { format!("@O \"{}\"", pres.outline_colour) } else { "@xO".to_string() };
        let _ = writeln!(self.buf, "{outline}");
        let _ = writeln!(self.buf, "@Ft \"{}\"", pres.font);
        if pres.outline_first {
            let _ = writeln!(self.buf, "@FO 0");
        }
        let jflag = match justify {
            Justify::Left => 1,
            Justify::Centre => 2,
            Justify::Right => 3,
        };
        let _ = writeln!(
            self.buf,
            "@t {x:.0} {y:.0} {size:.0} {:.0} {jflag} {:.2} {:.2} {:.2} \"{text}\"",
            rotation * 10.0, pres.char_space, pres.word_space, pres.line_space
        );
        if pres.outline_first {
            let _ = writeln!(self.buf, "@FO 1");
        }
        Ok(())
    }

    fn write_lines(&mut self, lines: &[Line], pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "@O \"{}\"", pres.outline_colour);
        for line in lines {
            if line.is_degenerate() {
                continue;
            }
            self.emit_polyline(line);
        }
        Ok(())
    }

    fn write_outlines(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        let outline = if do_outline { format!("@O \"{}\"", pres.outline_colour) } else { "@xO".to_string() };
        let fill = if do_fill { format!("@F \"{}\"", pres.interior_fill_colour) } else { "@xF".to_string() };
        let _ = writeln!(self.buf, "{outline}");
        let _ = writeln!(self.buf, "{fill}");
        for line in lines {
            if line.is_degenerate() {
                continue;
            }
            self.emit_polyline(line);
        }
        Ok(())
    }

    fn write_boundaries(&mut self, boundary: &Line, holes: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        if boundary.is_degenerate() {
            return Ok(());
        }
        let outline = if do_outline { format!("@O \"{}\"", pres.outline_colour) } else { "@xO".to_string() };
        let fill = if do_fill { format!("@F \"{}\"", pres.fill_colour) } else { "@xF".to_string() };
        let _ = writeln!(self.buf, "{outline}");
        let _ = writeln!(self.buf, "{fill}");
        self.emit_polyline(boundary);
        for hole in holes {
            if hole.is_degenerate() {
                continue;
            }
            self.emit_polyline(hole);
        }
        Ok(())
    }

    fn write_features(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError> {
        self.write_outlines(lines, do_outline, do_fill, pres)
    }

    fn write_symbol(&mut self, file: &str, x: f64, y: f64, scale: f64, rotation: f64, _pres: &Presentation) -> Result<(), BackendError> {
        let _ = writeln!(self.buf, "@s \"{file}\" {x:.0} {y:.0} {scale:.4} {:.0}", rotation * 10.0);
        Ok(())
    }

    fn graphics_symbol_size(&self, _file: &str, scale: f64) -> Result<SymbolSize, BackendError> {
        Ok(SymbolSize { width: 10.0 * scale, height: 10.0 * scale, cx: 5.0 * scale, cy: 5.0 * scale })
    }

    fn write_outline_mask(&mut self, line: &Line, on: bool) -> Result<(), BackendError> {
        if on {
            let _ = writeln!(self.buf, "@clip begin");
            self.emit_polyline(line);
        } else {
            let _ = writeln!(self.buf, "@clip end");
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
