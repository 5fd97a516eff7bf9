//! # Grammar catalog
//!
//! Resolves language names (as written after a Markdown code fence) to
//! compiled grammars. The built-in set is compiled once and shared; callers
//! can also build their own catalog and [`GrammarCatalog::register`] extra
//! definitions.

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::detect::{analyse_json, analyse_shell};
use crate::engine::Grammar;
use crate::error::{GrammarError, ResolveError};
use crate::grammars::{BASH, CHEAT, CHEAT_FLAGS, CHEAT_LINES, JSON, TEXT};
use crate::rules::GrammarSpec;

/// Looks grammars up by language name.
pub trait GrammarResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Arc<Grammar>, ResolveError>;
}

/// Describes a grammar that can be resolved by name.
#[derive(Clone, Copy, Debug)]
pub struct GrammarDefinition {
    /// Canonical identifier.
    pub id: &'static str,
    /// Human-friendly display name.
    pub label: &'static str,
    /// Alternative names accepted by [`GrammarCatalog::find`].
    pub aliases: &'static [&'static str],
    pub spec: &'static GrammarSpec,
    /// Scores how likely a text is written in this language.
    pub analyse: Option<fn(&str) -> f32>,
}

/// Ordered list of grammars compiled into [`GrammarCatalog::builtin`].
pub const GRAMMAR_DEFINITIONS: &[GrammarDefinition] = &[
    GrammarDefinition {
        id: "cheat",
        label: "Cheat",
        aliases: &["cheat", "cheatsheet"],
        spec: &CHEAT,
        analyse: Some(analyse_shell),
    },
    GrammarDefinition {
        id: "cheat-lines",
        label: "Cheat (comment lines)",
        aliases: &["cheat-lines"],
        spec: &CHEAT_LINES,
        analyse: None,
    },
    GrammarDefinition {
        id: "cheat-flags",
        label: "Cheat (commands and flags)",
        aliases: &["cheat-flags"],
        spec: &CHEAT_FLAGS,
        analyse: None,
    },
    GrammarDefinition {
        id: "bash",
        label: "Bash",
        aliases: &["bash", "sh", "ksh", "zsh", "shell"],
        spec: &BASH,
        analyse: Some(analyse_shell),
    },
    GrammarDefinition {
        id: "json",
        label: "JSON",
        aliases: &["json"],
        spec: &JSON,
        analyse: Some(analyse_json),
    },
    GrammarDefinition {
        id: "text",
        label: "Plain text",
        aliases: &["text", "plain", "txt"],
        spec: &TEXT,
        analyse: None,
    },
];

static SHARED: Lazy<GrammarCatalog> =
    Lazy::new(|| GrammarCatalog::builtin().expect("built-in grammars must compile"));

struct Entry {
    definition: GrammarDefinition,
    grammar: Arc<Grammar>,
}

/// Compiled grammars keyed by id, with alias lookup.
pub struct GrammarCatalog {
    entries: IndexMap<&'static str, Entry>,
}

impl GrammarCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Compiles every entry of [`GRAMMAR_DEFINITIONS`].
    pub fn builtin() -> Result<Self, GrammarError> {
        let mut catalog = Self::new();
        for definition in GRAMMAR_DEFINITIONS {
            catalog.register(*definition)?;
        }
        Ok(catalog)
    }

    /// Process-wide built-in catalog, compiled on first use.
    pub fn shared() -> &'static GrammarCatalog {
        &SHARED
    }

    /// Compiles and adds `definition`, replacing an entry with the same id.
    pub fn register(&mut self, definition: GrammarDefinition) -> Result<(), GrammarError> {
        let grammar = Arc::new(Grammar::compile(definition.spec)?);
        self.entries.insert(definition.id, Entry { definition, grammar });
        Ok(())
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &GrammarDefinition> {
        self.entries.values().map(|entry| &entry.definition)
    }

    /// Looks a grammar up by id or alias, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<Arc<Grammar>> {
        self.entries
            .values()
            .find(|entry| {
                entry.definition.id.eq_ignore_ascii_case(name)
                    || entry.definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
            })
            .map(|entry| Arc::clone(&entry.grammar))
    }

    /// Picks the grammar whose analyser is most confident about `text`.
    ///
    /// Ties keep the earlier registration; a score of zero never wins.
    pub fn guess(&self, text: &str) -> Option<Arc<Grammar>> {
        let mut best: Option<(f32, &Entry)> = None;
        for entry in self.entries.values() {
            let Some(analyse) = entry.definition.analyse else {
                continue;
            };
            let score = analyse(text).clamp(0.0, 1.0);
            if score > 0.0 && best.is_none_or(|(current, _)| score > current) {
                best = Some((score, entry));
            }
        }
        best.map(|(score, entry)| {
            debug!(grammar = entry.definition.id, score, "guessed grammar from content");
            Arc::clone(&entry.grammar)
        })
    }
}

impl Default for GrammarCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarResolver for GrammarCatalog {
    fn resolve(&self, name: &str) -> Result<Arc<Grammar>, ResolveError> {
        self.find(name).ok_or_else(|| ResolveError::NotFound { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_compiles_every_definition() {
        let catalog = GrammarCatalog::builtin().unwrap();
        let ids: Vec<_> = catalog.definitions().map(|definition| definition.id).collect();
        assert_eq!(ids, vec!["cheat", "cheat-lines", "cheat-flags", "bash", "json", "text"]);
    }

    #[test]
    fn resolves_ids_and_aliases_case_insensitively() {
        let catalog = GrammarCatalog::shared();
        assert_eq!(catalog.resolve("sh").unwrap().name(), "bash");
        assert_eq!(catalog.resolve("JSON").unwrap().name(), "json");
        assert_eq!(catalog.resolve("cheatsheet").unwrap().name(), "cheat");
        assert_eq!(catalog.resolve("plain").unwrap().name(), "text");
    }

    #[test]
    fn unknown_and_untrimmed_names_are_not_found() {
        let catalog = GrammarCatalog::shared();
        assert!(matches!(
            catalog.resolve("unknownlang"),
            Err(ResolveError::NotFound { name }) if name == "unknownlang"
        ));
        assert!(catalog.resolve("").is_err());
        assert!(catalog.resolve(" bash").is_err());
    }

    #[test]
    fn guesses_from_content() {
        let catalog = GrammarCatalog::shared();
        assert_eq!(catalog.guess("#!/bin/bash\nls\n").unwrap().name(), "cheat");
        assert_eq!(catalog.guess("{\"a\": 1}").unwrap().name(), "json");
        assert!(catalog.guess("just some words").is_none());
    }

    #[test]
    fn register_replaces_existing_id() {
        let mut catalog = GrammarCatalog::new();
        catalog.register(GRAMMAR_DEFINITIONS[0]).unwrap();
        catalog
            .register(GrammarDefinition {
                spec: &TEXT,
                ..GRAMMAR_DEFINITIONS[0]
            })
            .unwrap();
        assert_eq!(catalog.definitions().count(), 1);
        assert_eq!(catalog.resolve("cheat").unwrap().name(), "text");
    }
}
