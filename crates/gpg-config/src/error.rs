//! Shared error taxonomy (`spec.md` §7): one enum per propagation class.
//! Fatal kinds bubble through `Result`; non-fatal kinds are collected as
//! [`Diagnostic`]s by the caller instead of aborting the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("usage: <program> <setup_file> <pdf_sub_directory> <pdf_filename> <run_time>")]
    WrongArgumentCount,
    #[error("unknown program name '{name}', expected one of: {allowed}")]
    UnknownProgramName { name: String, allowed: String },
    #[error("run time '{value}' is not in YYYY:DDD:HH format")]
    BadRunTime { value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("setup directory entry '{key}' is missing")]
    MissingDirectoryEntry { key: String },
    #[error("unknown projection '{name}'")]
    UnknownProjection { name: String },
    #[error("no target map configured")]
    NoTargetMap,
    #[error("cannot read config file '{path}': {source}")]
    Read { path: String, #[source] source: std::io::Error },
    #[error("cannot parse config file '{path}': {source}")]
    Parse { path: String, #[source] source: toml::de::Error },
}

/// Non-fatal condition surfaced to the caller instead of aborting
/// (`spec.md` §7 "Propagation policy"). Carries the same context the
/// original `warn_report`/`error_report` printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub context: String,
    pub cause: String,
}

impl Diagnostic {
    pub fn new(cause: impl Into<String>) -> Self {
        Self { file: None, context: String::new(), cause: cause.into() }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}: {} ({})", self.cause, self.context),
            None => write!(f, "{} ({})", self.cause, self.context),
        }
    }
}
