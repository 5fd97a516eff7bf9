//! # Declarative rule tables
//!
//! A grammar is plain static data: named states, each an ordered list of
//! rules. A rule either matches a pattern and emits categories, or splices in
//! the rules of another state. Nothing here executes; see
//! [`Grammar::compile`](crate::engine::Grammar::compile).

use cheatcolor_types::TokenCategory;

/// What a matching rule emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The whole match gets one category.
    Token(TokenCategory),
    /// Capture group `n + 1` gets the `n`-th category.
    ByGroups(&'static [TokenCategory]),
}

/// How the state stack changes after a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(&'static str),
    Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDef {
    Match {
        pattern: &'static str,
        action: Action,
        transition: Transition,
    },
    Include(&'static str),
}

/// One named state and its ordered rules.
pub type StateDef = (&'static str, &'static [RuleDef]);

/// Static description of a grammar.
#[derive(Debug, Clone, Copy)]
pub struct GrammarSpec {
    pub name: &'static str,
    /// State tokenization starts in.
    pub start: &'static str,
    pub states: &'static [StateDef],
}

pub const fn token(pattern: &'static str, category: TokenCategory) -> RuleDef {
    RuleDef::Match {
        pattern,
        action: Action::Token(category),
        transition: Transition::Stay,
    }
}

pub const fn groups(pattern: &'static str, categories: &'static [TokenCategory]) -> RuleDef {
    RuleDef::Match {
        pattern,
        action: Action::ByGroups(categories),
        transition: Transition::Stay,
    }
}

pub const fn push(pattern: &'static str, category: TokenCategory, state: &'static str) -> RuleDef {
    RuleDef::Match {
        pattern,
        action: Action::Token(category),
        transition: Transition::Push(state),
    }
}

pub const fn pop(pattern: &'static str, category: TokenCategory) -> RuleDef {
    RuleDef::Match {
        pattern,
        action: Action::Token(category),
        transition: Transition::Pop,
    }
}

pub const fn include(state: &'static str) -> RuleDef {
    RuleDef::Include(state)
}
