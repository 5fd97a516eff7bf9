use thiserror::Error;

/// Raised while compiling a [`GrammarSpec`](crate::rules::GrammarSpec).
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar '{grammar}' state '{state}': invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        grammar: &'static str,
        state: &'static str,
        pattern: &'static str,
        #[source]
        source: Box<fancy_regex::Error>,
    },
    #[error("grammar '{grammar}' state '{state}' refers to unknown state '{target}'")]
    UnknownState {
        grammar: &'static str,
        state: &'static str,
        target: &'static str,
    },
    #[error("grammar '{grammar}' has an include cycle through state '{state}'")]
    IncludeCycle { grammar: &'static str, state: &'static str },
    #[error("grammar '{grammar}' has no '{state}' state")]
    MissingState { grammar: &'static str, state: String },
}

/// Failure to look a grammar up by language name.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no grammar registered for language '{name}'")]
    NotFound { name: String },
}
