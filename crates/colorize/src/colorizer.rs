//! # Colorize dispatch
//!
//! Decides whether a sheet is colored at all, which grammar/style pair is
//! used, and what text is handed to the renderer:
//!
//! - colorizing disabled, or empty input: the input comes back untouched;
//! - first line is a fence naming a language the resolver knows: the fenced
//!   body is rendered with that grammar and [`StyleTable::default_theme`];
//! - anything else, including a fence naming an unknown language: the whole
//!   original sheet is rendered with the configured bundled [`Flavor`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use cheatcolor_lexer::{Grammar, GrammarCatalog, GrammarResolver};
use tracing::{debug, info};

use crate::config::ColorizeConfig;
use crate::fence::parse_fence;
use crate::flavor::Flavor;
use crate::render::render;
use crate::style::StyleTable;

/// Where the selected grammar came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlighterSource {
    Bundled(Flavor),
    /// Resolved from the language named on the opening fence.
    External { language: String },
}

impl fmt::Display for HighlighterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlighterSource::Bundled(flavor) => write!(f, "bundled:{flavor}"),
            HighlighterSource::External { language } => write!(f, "external:{language}"),
        }
    }
}

/// The grammar, style and text chosen for one sheet.
#[derive(Debug, Clone)]
pub struct Selection<'c> {
    pub source: HighlighterSource,
    pub grammar: Arc<Grammar>,
    pub style: StyleTable,
    /// Text that will be rendered; the fenced body or the original sheet.
    pub content: Cow<'c, str>,
}

impl Selection<'_> {
    pub fn render(&self) -> String {
        render(self.grammar.tokenize(&self.content), &self.style)
    }

    /// One-line summary, e.g. `grammar = cheat style = cheat`.
    pub fn describe(&self) -> String {
        format!("grammar = {} style = {}", self.grammar.name(), self.style.name())
    }
}

/// Callback invoked with every selection while diagnostics are enabled.
pub type DiagnosticHook = Box<dyn Fn(&Selection<'_>) + Send + Sync>;

pub struct Colorizer<'r> {
    config: ColorizeConfig,
    resolver: &'r dyn GrammarResolver,
    diagnostics: Option<DiagnosticHook>,
}

impl<'r> Colorizer<'r> {
    pub fn new(config: ColorizeConfig, resolver: &'r dyn GrammarResolver) -> Self {
        Self {
            config,
            resolver,
            diagnostics: None,
        }
    }

    /// Replaces the diagnostic output. Without a hook, diagnostics are
    /// logged at `info` level as [`Selection::describe`] lines.
    pub fn with_diagnostics(mut self, hook: impl Fn(&Selection<'_>) + Send + Sync + 'static) -> Self {
        self.diagnostics = Some(Box::new(hook));
        self
    }

    pub fn config(&self) -> &ColorizeConfig {
        &self.config
    }

    /// Chooses grammar, style and text for `content`, or `None` when the
    /// sheet should be returned unchanged.
    pub fn select<'c>(&self, content: &'c str) -> Option<Selection<'c>> {
        if !self.config.enabled || content.is_empty() {
            return None;
        }

        let selection = match parse_fence(content) {
            None => self.bundled(content),
            Some(block) => match self.resolver.resolve(block.language) {
                Ok(grammar) => Selection {
                    source: HighlighterSource::External {
                        language: block.language.to_string(),
                    },
                    grammar,
                    style: StyleTable::default_theme(),
                    content: Cow::Owned(block.body),
                },
                Err(error) => {
                    debug!(%error, flavor = %self.config.flavor, "falling back to bundled grammar");
                    self.bundled(content)
                }
            },
        };

        debug!(
            source = %selection.source,
            grammar = selection.grammar.name(),
            style = selection.style.name(),
            "selected highlighter"
        );
        if self.config.diagnostics {
            match &self.diagnostics {
                Some(hook) => hook(&selection),
                None => info!(source = %selection.source, "{}", selection.describe()),
            }
        }
        Some(selection)
    }

    /// Returns `content` colored for a 256-color terminal, or unchanged when
    /// colorizing is off.
    pub fn colorize(&self, content: &str) -> String {
        match self.select(content) {
            Some(selection) => selection.render(),
            None => content.to_string(),
        }
    }

    fn bundled<'c>(&self, content: &'c str) -> Selection<'c> {
        let flavor = self.config.flavor;
        Selection {
            source: HighlighterSource::Bundled(flavor),
            grammar: flavor.grammar(),
            style: flavor.style(),
            content: Cow::Borrowed(content),
        }
    }
}

/// Colors `content` using the built-in grammar catalog.
pub fn colorize(content: &str, config: &ColorizeConfig) -> String {
    Colorizer::new(*config, GrammarCatalog::shared()).colorize(content)
}
