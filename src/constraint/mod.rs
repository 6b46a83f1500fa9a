//! Value-constraint mini-language for pin parameters.
//!
//! Every pin parameter is written as a whitespace-separated string or a list
//! of tokens. Plain tokens are candidate values; marked tokens are
//! constraints that a connecting pin must satisfy.
//!
//! # Grammar Overview
//!
//! ```text
//! spec        = { token }
//! token       = constraint | value
//! constraint  = ('=' | '~') (range | literal)
//! range       = number '..' number
//! value       = any token not starting with '=' or '~'
//! ```
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `gpio` | candidate value |
//! | `=gpio` | the connecting pin must offer `gpio` |
//! | `=1..5` | the connecting pin must offer a value in `[1, 5]` |
//! | `~uart` | the connecting pin must not offer `uart` |
//! | `~0..1` | the connecting pin must not offer a value in `[0, 1]` |
//!
//! Constraint terms on one parameter are ANDed; candidate values are
//! alternatives.

mod grammar;
mod matching;
mod spec;

pub use grammar::{parse_spec, parse_spec_str, parse_token, Token};
pub use matching::{evaluate, term_matches, ParamMatch};
pub use spec::{ConstraintTerm, ValueConstraintSpec};
