//! Graphics back-end abstraction (`spec.md` §2 component 2, §4.9): one
//! [`GraphicsBackend`] trait, four implementations (PostScript, SVG,
//! Corel metafile, fixed-pitch text grid) bound at startup from the
//! program identity (`spec.md` §3 "GPG program types").

pub mod cmf;
pub mod error;
pub mod presentation;
pub mod program;
pub mod ps;
pub mod svg;
pub mod texmet;

pub use error::{BackendError, BackendWarning};
pub use presentation::{Justify, Presentation};
pub use program::{ProgramInfo, ProgramType};

use gpg_geom::{Line, Point};

/// Ellipse parameters shared by every back end's `write_ellipse` (`spec.md`
/// §4.9 "Ellipse"). Angles are degrees, CCW, matching the spec's
/// coordinate convention; individual back ends convert as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseSpec {
    pub centre: Point,
    pub width: f64,
    pub height: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub closed: bool,
    pub rotation: f64,
    pub do_outline: bool,
    pub do_fill: bool,
}

impl EllipseSpec {
    pub fn is_full(&self) -> bool {
        self.start_angle == self.end_angle
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Bounding box plus anchor, as returned by `graphics_symbol_size` (`spec.md`
/// §4.9 "Symbol file").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolSize {
    pub width: f64,
    pub height: f64,
    pub cx: f64,
    pub cy: f64,
}

/// Start/end marker for `write_group`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEdge {
    Start,
    End,
}

/// The virtual vtable every program type binds at startup (`spec.md` §4.9).
/// Implementations own their output sink and flush/close it on
/// `close_file`; `gpg-engine` never writes to the sink directly.
pub trait GraphicsBackend {
    fn initialize_display(&mut self) -> Result<(), BackendError>;
    fn initialize_size(&mut self, width: f64, height: f64) -> Result<(), BackendError>;
    fn close_file(&mut self) -> Result<(), BackendError>;

    fn write_comment(&mut self, text: &str) -> Result<(), BackendError>;
    fn write_group(&mut self, edge: GroupEdge, name: &str) -> Result<(), BackendError>;

    fn write_bitmap(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError>;
    fn write_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) -> Result<(), BackendError>;
    fn write_box(&mut self, x: f64, y: f64, width: f64, height: f64, pres: &Presentation) -> Result<(), BackendError>;
    fn write_ellipse(&mut self, spec: &EllipseSpec, pres: &Presentation) -> Result<Option<BackendWarning>, BackendError>;
    fn write_underline(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, pres: &Presentation) -> Result<(), BackendError>;
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<(), BackendError>;

    fn write_lines(&mut self, lines: &[Line], pres: &Presentation) -> Result<(), BackendError>;
    fn write_outlines(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError>;
    fn write_boundaries(&mut self, boundary: &Line, holes: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError>;
    fn write_features(&mut self, lines: &[Line], do_outline: bool, do_fill: bool, pres: &Presentation) -> Result<(), BackendError>;

    fn write_symbol(&mut self, file: &str, x: f64, y: f64, scale: f64, rotation: f64, pres: &Presentation) -> Result<(), BackendError>;
    fn graphics_symbol_size(&self, file: &str, scale: f64) -> Result<SymbolSize, BackendError>;

    fn write_outline_mask(&mut self, line: &Line, on: bool) -> Result<(), BackendError>;
    fn write_boundary_mask(&mut self, boundary: &Line, on: bool) -> Result<(), BackendError>;

    /// Renders everything written so far to the back end's native text
    /// form, for `gpg-engine`'s `@file_name`/`@file_close` to flush to disk.
    fn render_output(&self) -> String;
}
