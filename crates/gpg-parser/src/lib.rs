//! fpdf directive tokenizer (`spec.md` §2 component 2, §4.7).
//!
//! Reads an fpdf file's directive stream (`reader`), splits each
//! directive's body into keyword entries (`kv`), splices `<group_name>`
//! tokens (`group`) and `<codeword>` tokens (`codeword`), and handles the
//! backslash-escaping `{ } ; = !` need to survive comment-stripping and
//! body-splitting (`escape`). Directive dispatch, loop control, and the
//! process-wide group/codeword state live in `gpg-engine` — this crate is
//! purely lexical.

pub mod codeword;
pub mod error;
pub mod escape;
pub mod group;
pub mod kv;
pub mod reader;

pub use codeword::{expand_codewords, CodewordContext};
pub use error::{ParseError, ParseWarning};
pub use group::GroupTable;
pub use kv::{dissect_body, serialize_body, KvEntry};
pub use reader::{Parser, RawDirective};
