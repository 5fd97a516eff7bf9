//! Bundled grammar/style pairs.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use cheatcolor_lexer::{Grammar, GrammarCatalog};

use crate::config::ConfigError;
use crate::style::StyleTable;

/// Which bundled grammar and style are used when no fenced language applies.
///
/// A flavor always switches both halves together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Shell-aware grammar with nested quoting and substitution states.
    #[default]
    Shell,
    /// Comment lines versus everything else.
    Lines,
    /// Leading command word and `-flag` arguments.
    Flags,
}

impl Flavor {
    pub const ALL: [Flavor; 3] = [Flavor::Shell, Flavor::Lines, Flavor::Flags];

    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Shell => "shell",
            Flavor::Lines => "lines",
            Flavor::Flags => "flags",
        }
    }

    /// Catalog id of the grammar half.
    pub fn grammar_id(self) -> &'static str {
        match self {
            Flavor::Shell => "cheat",
            Flavor::Lines => "cheat-lines",
            Flavor::Flags => "cheat-flags",
        }
    }

    pub fn grammar(self) -> Arc<Grammar> {
        GrammarCatalog::shared()
            .find(self.grammar_id())
            .expect("bundled grammars are part of the built-in catalog")
    }

    pub fn style(self) -> StyleTable {
        match self {
            Flavor::Shell => StyleTable::cheat(),
            Flavor::Lines => StyleTable::cheat_lines(),
            Flavor::Flags => StyleTable::cheat_flags(),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Flavor::ALL
            .into_iter()
            .find(|flavor| flavor.as_str() == normalized || flavor.grammar_id() == normalized)
            .ok_or_else(|| ConfigError::UnknownFlavor {
                value: value.to_string(),
            })
    }
}
