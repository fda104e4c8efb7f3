use thiserror::Error;

/// Fatal back-end failures (`spec.md` §7 "I/O errors").
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot open output file '{path}': {source}")]
    OpenOutput { path: String, #[source] source: std::io::Error },
    #[error("cannot write to output: {0}")]
    Write(#[from] std::fmt::Error),
    #[error("no output file is currently open")]
    NoOpenFile,
    #[error("symbol file '{path}' not found")]
    SymbolFileNotFound { path: String },
}

/// Non-fatal back-end conditions (`spec.md` §7 "Geometry warnings").
#[derive(Debug, Clone, PartialEq)]
pub enum BackendWarning {
    DegenerateEllipse { width: f64, height: f64 },
    EmptyLine,
    TextPositionClamped { x: i64, y: i64, clamped_x: i64, clamped_y: i64 },
}

impl std::fmt::Display for BackendWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendWarning::DegenerateEllipse { width, height } => {
                write!(f, "degenerate ellipse (width={width}, height={height}), skipped")
            }
            BackendWarning::EmptyLine => write!(f, "empty or too-short line, skipped"),
            BackendWarning::TextPositionClamped { x, y, clamped_x, clamped_y } => write!(
                f,
                "text position ({x},{y}) out of range, clamped to ({clamped_x},{clamped_y})"
            ),
        }
    }
}
