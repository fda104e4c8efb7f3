use thiserror::Error;

/// Parse-time fatal kinds (`spec.md` §7 "Parse errors"). `error_report`'s
/// C contract of "print context and exit" becomes "return `Err`, let the
/// caller decide" — the caller is `gpg-engine`, which owns the recent-
/// lines context buffer these errors format into.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: missing or misplaced '{{' (directive never opened a body)")]
    MissingOpenBrace { line: usize },
    #[error("line {line}: missing or misplaced '}}' (close brace not at end of body)")]
    MisplacedCloseBrace { line: usize },
    #[error("line {line}: more than one '{{' inside a single directive body")]
    MultipleOpenBraces { line: usize },
    #[error("line {line}: more than one '=' in keyword entry '{entry}'")]
    MultipleEquals { line: usize, entry: String },
    #[error("line {line}: keyword token too long ({len} bytes)")]
    TokenTooLong { line: usize, len: usize },
    #[error("directive body exceeded the maximum length")]
    DirectiveTooLong,
    #[error("unexpected end of file while reading directive body starting at line {line}")]
    UnterminatedDirective { line: usize },
}

/// Non-fatal parse-time conditions (`spec.md` §7 "Version warnings" and
/// the unknown-codeword/unknown-group cases of "Semantic errors" — the
/// parser only ever emits the lexical subset; the rest are
/// `gpg-engine`'s job once directives are dispatched).
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    ObsoleteExtension { file: String },
    UnknownGroup { directive_line: usize, group_name: String },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::ObsoleteExtension { file } => {
                write!(f, "'{file}' uses the obsolete .pdf extension, expected .fpdf")
            }
            ParseWarning::UnknownGroup { directive_line, group_name } => {
                write!(f, "line {directive_line}: group '<{group_name}>' is not defined, left unexpanded")
            }
        }
    }
}
