//! Fixed-pitch text-grid back end (`spec.md` §4.9 "TexMet"), grounded on
//! `write_texmet_text`/`close_texmet_file` in `gra_io.c`: a `Tnx×Tny`
//! character buffer, initially space-filled, with text written in place
//! at integer column/row and out-of-range positions clamped with a
//! warning. Graphics-only operations (box, ellipse, lines, symbols) are
//! no-ops — this back end is text-only (`spec.md` §4.9).

use gpg_geom::Line;

use crate::error::{BackendError, BackendWarning};
use crate::presentation::{Justify, Presentation};
use crate::{EllipseSpec, GraphicsBackend, GroupEdge, SymbolSize};

pub struct TexMetBackend {
    columns: usize,
    rows: usize,
    grid: Vec<char>,
}

impl Default for TexMetBackend {
    fn default() -> Self {
        Self { columns: 0, rows: 0, grid: Vec::new() }
    }
}

impl TexMetBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row-by-row rendering of the character buffer (`close_texmet_file`).
    pub fn output(&self) -> String {
        let mut out = String::with_capacity(self.columns * self.rows + self.rows);
        for row in 0..self.rows {
            let start = row * self.columns;
            out.extend(&self.grid[start..start + self.columns]);
            out.push('\n');
        }
        out
    }
}

impl GraphicsBackend for TexMetBackend {
    fn initialize_display(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn initialize_size(&mut self, width: f64, height: f64) -> Result<(), BackendError> {
        self.columns = width.round().max(0.0) as usize;
        self.rows = height.round().max(0.0) as usize;
        self.grid = vec![' '; self.columns * self.rows];
        Ok(())
    }

    fn close_file(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_comment(&mut self, _text: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_group(&mut self, _edge: GroupEdge, _name: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_bitmap(&mut self, _path: &str, _x: f64, _y: f64, _width: f64, _height: f64) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_image(&mut self, _path: &str, _x: f64, _y: f64, _width: f64, _height: f64) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_box(&mut self, _x: f64, _y: f64, _width: f64, _height: f64, _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_ellipse(&mut self, _spec: &EllipseSpec, _pres: &Presentation) -> Result<Option<BackendWarning>, BackendError> {
        Ok(None)
    }

    fn write_underline(&mut self, _x0: f64, _y0: f64, _x1: f64, _y1: f64, _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        _size: f64,
        justify: Justify,
        _rotation: f64,
        _do_outline: bool,
        _pres: &Presentation,
    ) -> Result<(), BackendError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(BackendError::NoOpenFile);
        }
        let text = text.trim_end_matches('\n');
        if text.is_empty() {
            return Ok(());
        }

        let requested_x = x.round() as i64;
        let requested_y = y.round() as i64;
        let row = requested_y.clamp(1, self.rows as i64) as usize;

        let mut chars: Vec<char> = text.chars().collect();
        if chars.len() > self.columns {
            chars.truncate(self.columns);
        }
        let len = chars.len() as i64;

        let nx = requested_x.clamp(1, self.columns as i64);
        let start_col = match justify {
            Justify::Left => nx.min(self.columns as i64 - len + 1).max(1),
            Justify::Centre => (nx - len / 2).max(1).min(self.columns as i64 - len + 1).max(1),
            Justify::Right => (nx - len + 1).max(1),
        };

        let row_start = (row - 1) * self.columns;
        let col_start = (start_col - 1) as usize;
        for (i, ch) in chars.into_iter().enumerate() {
            if col_start + i >= self.columns {
                break;
            }
            self.grid[row_start + col_start + i] = ch;
        }
        Ok(())
    }

    fn write_lines(&mut self, _lines: &[Line], _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_outlines(&mut self, _lines: &[Line], _do_outline: bool, _do_fill: bool, _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_boundaries(&mut self, _boundary: &Line, _holes: &[Line], _do_outline: bool, _do_fill: bool, _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_features(&mut self, _lines: &[Line], _do_outline: bool, _do_fill: bool, _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_symbol(&mut self, _file: &str, _x: f64, _y: f64, _scale: f64, _rotation: f64, _pres: &Presentation) -> Result<(), BackendError> {
        Ok(())
    }

    fn graphics_symbol_size(&self, _file: &str, _scale: f64) -> Result<SymbolSize, BackendError> {
        Ok(SymbolSize { width: 1.0, height: 1.0, cx: 0.5, cy: 0.5 })
    }

    fn write_outline_mask(&mut self, _line: &Line, _on: bool) -> Result<(), BackendError> {
        Ok(())
    }

    fn write_boundary_mask(&mut self, _boundary: &Line, _on: bool) -> Result<(), BackendError> {
        Ok(())
    }

    fn render_output(&self) -> String {
        self.output()
    }
}
