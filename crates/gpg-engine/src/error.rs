//! Fatal engine errors (`spec.md` §7). Non-fatal conditions go through
//! [`gpg_config::error::Diagnostic`] instead, accumulated on [`crate::context::Context`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{file}: {cause} (at directive {directive} near line {line})")]
    Directive { file: String, directive: String, line: usize, cause: String },
    #[error(transparent)]
    Parse(#[from] gpg_parser::error::ParseError),
    #[error(transparent)]
    Config(#[from] gpg_config::error::ConfigError),
    #[error("cannot open '{path}': {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("unknown directive '{name}' at line {line}")]
    UnknownDirective { name: String, line: usize },
    #[error("@version must be the first directive processed (line {line})")]
    VersionNotSet { line: usize },
    #[error("no output file is open for directive '{directive}'")]
    NoOpenFile { directive: String },
    #[error("@loop_end at line {line} does not match the file that opened its @loop_begin")]
    MismatchedLoopFile { line: usize },
    #[error("@loop_end at line {line} with no matching @loop_begin")]
    UnbalancedLoopEnd { line: usize },
    #[error("@loop_location_look_up entries must have strictly increasing times (line {line})")]
    LookupTimesNotIncreasing { line: usize },
    #[error("@loop_location_look_up interval must be non-negative (line {line})")]
    LookupNegativeInterval { line: usize },
    #[error(transparent)]
    Backend(#[from] gpg_backend::BackendError),
}
