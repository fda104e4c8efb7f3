//! Process-wide state a directive handler reads or mutates (`spec.md` §4.8,
//! §9 "error_report/warn_report context"): the current presentation, group
//! and codeword tables, the open output back end, and a ring buffer of
//! recent lines for fatal-error context, mirroring `ErrorBufList` in
//! `gra_io.c`.

use std::collections::VecDeque;

use gpg_config::error::Diagnostic;
use gpg_config::Environment;
use gpg_backend::presentation::Presentation;
use gpg_backend::GraphicsBackend;
use gpg_interp::PolygonFrame;
use gpg_parser::{CodewordContext, GroupTable};

const MAX_RECENT_LINES: usize = 25;

pub struct Context {
    pub environment: Environment,
    pub groups: GroupTable,
    pub codewords: CodewordContext,
    pub presentation: Presentation,
    pub diagnostics: Vec<Diagnostic>,
    pub recent_lines: VecDeque<String>,
    pub current_fpdf: Option<String>,
    pub active_source: Option<String>,
    pub active_valid_time: Option<String>,
    pub backend: Box<dyn GraphicsBackend>,
    /// Set once `@version` has been processed anywhere in the run. Mirrors
    /// the original's global `Version` string: once non-blank, every file
    /// (including `@include`d ones) may use any directive, matching
    /// `gra_io.c`'s `!blank(Version)` gate rather than a per-file check.
    pub version_set: bool,
    /// The field frames a `@loop_begin` field-iteration source draws from.
    /// Reading stored fields off disk is out of scope (`spec.md` §1); the
    /// embedding application populates this before `Engine::run` the way
    /// the original pre-loads `Fdesc` before the directive loop starts.
    pub field_frames: Vec<PolygonFrame>,
}

impl Context {
    pub fn new(environment: Environment, backend: Box<dyn GraphicsBackend>) -> Self {
        Self {
            environment,
            groups: GroupTable::new(),
            codewords: CodewordContext::default(),
            presentation: Presentation::default(),
            diagnostics: Vec::new(),
            recent_lines: VecDeque::new(),
            current_fpdf: None,
            active_source: None,
            active_valid_time: None,
            backend,
            version_set: false,
            field_frames: Vec::new(),
        }
    }

    /// Resolves an [`crate::loop_stack::ActiveFeature`] into the concrete
    /// area it names, for `@areas` and friends to draw. Returns `None`
    /// (never a fatal error) when the indices are stale — a frame removed
    /// since the loop was entered, say — matching `spec.md` §7's
    /// "interpolation warnings... skips the offending feature".
    pub fn resolve_feature<'a>(&'a self, feature: &crate::loop_stack::ActiveFeature) -> Option<&'a gpg_interp::Area> {
        self.field_frames.get(feature.frame_index)?.areas.get(feature.area_index)
    }

    pub fn push_recent(&mut self, line: &str) {
        self.recent_lines.push_back(line.to_string());
        if self.recent_lines.len() > MAX_RECENT_LINES {
            self.recent_lines.pop_front();
        }
    }

    /// Records a non-fatal condition the way `warn_report` did: context is
    /// the active source/valid-time, if set.
    pub fn warn(&mut self, cause: impl Into<String>) {
        let mut diag = Diagnostic::new(cause);
        if let Some(file) = &self.current_fpdf {
            diag = diag.with_file(file.clone());
        }
        let context = match (&self.active_source, &self.active_valid_time) {
            (Some(s), Some(v)) => format!("source={s}, valid_time={v}"),
            (Some(s), None) => format!("source={s}"),
            (None, Some(v)) => format!("valid_time={v}"),
            (None, None) => String::new(),
        };
        diag = diag.with_context(context);
        tracing::warn!(target: "gpg.engine", cause = %diag.cause, "directive warning");
        self.diagnostics.push(diag);
    }

    /// Expands a directive parameter value through both the codeword map
    /// and group table's textual substitutions, in that order.
    pub fn expand_value(&mut self, text: &str) -> String {
        let (expanded, unknown) = gpg_parser::expand_codewords(text, &self.codewords);
        for name in unknown {
            self.warn(format!("unknown codeword <{name}>"));
        }
        expanded
    }
}
