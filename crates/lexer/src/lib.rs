//! Rule-table lexing for cheatsheets.
//!
//! Grammars are static tables of regular expressions grouped into states
//! ([`rules`]); [`engine::Grammar`] compiles and runs them. The
//! [`catalog`] maps language names onto the built-in [`grammars`].

pub mod catalog;
pub mod detect;
pub mod engine;
pub mod error;
pub mod grammars;
pub mod rules;

mod pattern;

pub use catalog::{GRAMMAR_DEFINITIONS, GrammarCatalog, GrammarDefinition, GrammarResolver};
pub use engine::{Grammar, Tokens};
pub use error::{GrammarError, ResolveError};
