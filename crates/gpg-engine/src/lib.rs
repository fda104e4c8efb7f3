//! The GPG directive execution engine (`spec.md` §2 component 8, §4.8):
//! owns the directive dispatch loop, loop-stack rewind, group/codeword
//! expansion, and the open output back end. `gpg-parser` supplies the
//! lexer; `gpg-backend` supplies the drawing vtable; `gpg-engine` is the
//! glue that drives one from the other per directive.

pub mod context;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod loop_stack;

pub use context::Context;
pub use engine::Engine;
pub use error::EngineError;
pub use lookup::LookupTable;
pub use loop_stack::{ActiveFeature, LoopFrame, LoopStack};
