//! Ambient configuration surface (`spec.md` §10.3, §11.1): the resolved
//! environment/codeword directory map, run-time argument parsing, the
//! shared error taxonomy (`spec.md` §7), and logging bootstrap. Not a
//! reimplementation of the FPA setup-file format — see `env.rs`.

pub mod env;
pub mod error;
pub mod logging;
pub mod runtime;

pub use env::{DirectoryMap, Environment};
pub use error::{ConfigError, Diagnostic, UsageError};
pub use runtime::RunTime;
