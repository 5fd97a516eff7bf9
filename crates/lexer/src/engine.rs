//! # Rule-table execution
//!
//! [`Grammar::compile`] turns a static [`GrammarSpec`] into flattened,
//! pre-compiled states. [`Tokens`] walks the input with an explicit state
//! stack: the first rule of the top state that matches at the cursor wins,
//! its categories are emitted and the stack is pushed or popped.
//!
//! Input that no rule accepts is emitted one character at a time as
//! [`TokenCategory::Text`]; a newline in that position also resets the stack
//! to the start state, so an unterminated quote or substitution cannot
//! swallow the rest of a sheet.
//!
//! Each rule remembers where it next matches, so a rule is searched again
//! only once the cursor passes that point. Look-around patterns whose search
//! hits the backtracking limit fall back to searching bounded windows of
//! whole lines; a match that would have to cross a window boundary is not
//! found.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use cheatcolor_types::{Token, TokenCategory};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::GrammarError;
use crate::pattern::{Pattern, SearchLimits, window_end};
use crate::rules::{Action, GrammarSpec, RuleDef, Transition};

#[derive(Debug, Clone, Copy)]
enum Next {
    Stay,
    Push(usize),
    Pop,
}

struct CompiledRule {
    pattern: Pattern,
    action: Action,
    next: Next,
    /// Set once the backtrack limit has been reported for this rule.
    gave_up: AtomicBool,
}

struct CompiledState {
    name: &'static str,
    /// Indices into `Grammar::rules`, includes already spliced in.
    rules: Vec<usize>,
}

/// A compiled, immutable grammar. Cheap to share behind an `Arc`.
pub struct Grammar {
    name: &'static str,
    start: usize,
    states: Vec<CompiledState>,
    rules: Vec<CompiledRule>,
    limits: SearchLimits,
}

enum Entry {
    Rule(usize),
    Include(usize),
}

impl Grammar {
    /// Compiles every pattern of `spec` and flattens its includes.
    pub fn compile(spec: &GrammarSpec) -> Result<Self, GrammarError> {
        Self::compile_with(spec, SearchLimits::default())
    }

    pub(crate) fn compile_with(spec: &GrammarSpec, limits: SearchLimits) -> Result<Self, GrammarError> {
        let mut index: IndexMap<&'static str, usize> = IndexMap::new();
        for (name, _) in spec.states {
            let next = index.len();
            index.entry(*name).or_insert(next);
        }

        let lookup = |state: &'static str, target: &'static str| {
            index.get(target).copied().ok_or(GrammarError::UnknownState {
                grammar: spec.name,
                state,
                target,
            })
        };

        let mut rules = Vec::new();
        let mut entries: Vec<Vec<Entry>> = (0..index.len()).map(|_| Vec::new()).collect();
        for &(state, defs) in spec.states {
            let slot = index[state];
            if !entries[slot].is_empty() {
                continue;
            }
            for def in defs.iter() {
                match *def {
                    RuleDef::Include(target) => entries[slot].push(Entry::Include(lookup(state, target)?)),
                    RuleDef::Match {
                        pattern,
                        action,
                        transition,
                    } => {
                        let compiled = Pattern::compile(pattern, limits).map_err(|source| GrammarError::InvalidPattern {
                            grammar: spec.name,
                            state,
                            pattern,
                            source: Box::new(source),
                        })?;
                        let next = match transition {
                            Transition::Stay => Next::Stay,
                            Transition::Pop => Next::Pop,
                            Transition::Push(target) => Next::Push(lookup(state, target)?),
                        };
                        entries[slot].push(Entry::Rule(rules.len()));
                        rules.push(CompiledRule {
                            pattern: compiled,
                            action,
                            next,
                            gave_up: AtomicBool::new(false),
                        });
                    }
                }
            }
        }

        let start = index.get(spec.start).copied().ok_or_else(|| GrammarError::MissingState {
            grammar: spec.name,
            state: spec.start.to_string(),
        })?;

        let mut states = Vec::with_capacity(index.len());
        for (slot, name) in index.keys().enumerate() {
            let mut flattened = Vec::new();
            let mut visiting = Vec::new();
            flatten(spec.name, &index, &entries, slot, &mut visiting, &mut flattened)?;
            states.push(CompiledState { name: *name, rules: flattened });
        }

        let backtracking = rules.iter().filter(|rule| rule.pattern.is_backtracking()).count();
        debug!(
            grammar = spec.name,
            states = states.len(),
            rules = rules.len(),
            backtracking,
            "compiled grammar"
        );
        Ok(Self {
            name: spec.name,
            start,
            states,
            rules,
            limits,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of all states, in definition order.
    pub fn state_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.states.iter().map(|state| state.name)
    }

    /// Tokenizes `text` starting in the grammar's start state.
    pub fn tokenize<'g, 't>(&'g self, text: &'t str) -> Tokens<'g, 't> {
        Tokens::new(self, text, self.start)
    }

    /// Tokenizes `text` starting in the named state.
    pub fn tokenize_from<'g, 't>(&'g self, text: &'t str, state: &str) -> Result<Tokens<'g, 't>, GrammarError> {
        let start = self
            .states
            .iter()
            .position(|candidate| candidate.name == state)
            .ok_or_else(|| GrammarError::MissingState {
                grammar: self.name,
                state: state.to_string(),
            })?;
        Ok(Tokens::new(self, text, start))
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("states", &self.state_names().collect::<Vec<_>>())
            .field("rules", &self.rules.len())
            .finish()
    }
}

fn flatten(
    grammar: &'static str,
    index: &IndexMap<&'static str, usize>,
    entries: &[Vec<Entry>],
    slot: usize,
    visiting: &mut Vec<usize>,
    out: &mut Vec<usize>,
) -> Result<(), GrammarError> {
    if visiting.contains(&slot) {
        let state = index.get_index(slot).map(|(name, _)| *name).unwrap_or_default();
        return Err(GrammarError::IncludeCycle { grammar, state });
    }
    visiting.push(slot);
    for entry in &entries[slot] {
        match entry {
            Entry::Rule(rule) => out.push(*rule),
            Entry::Include(target) => flatten(grammar, index, entries, *target, visiting, out)?,
        }
    }
    visiting.pop();
    Ok(())
}

/// Where a rule next matches, remembered between cursor positions.
///
/// A search from `from` that found its leftmost match at `start` proves no
/// match begins in `from..start`, so later cursors in that range can be
/// answered without searching again.
#[derive(Debug, Clone, Copy)]
enum Lookahead {
    Unknown,
    Found { from: usize, start: usize, end: usize },
    /// No match begins in `from..until`.
    Clear { from: usize, until: usize },
}

/// Lazy token stream over one input. Created by [`Grammar::tokenize`].
pub struct Tokens<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    pos: usize,
    stack: Vec<usize>,
    pending: VecDeque<Token<'t>>,
    lookahead: Vec<Lookahead>,
    /// Rules whose full-text search gave up; they search in windows.
    windowed: Vec<bool>,
}

impl<'g, 't> Tokens<'g, 't> {
    fn new(grammar: &'g Grammar, text: &'t str, start: usize) -> Self {
        Self {
            grammar,
            text,
            pos: 0,
            stack: vec![start],
            pending: VecDeque::new(),
            lookahead: vec![Lookahead::Unknown; grammar.rules.len()],
            windowed: vec![false; grammar.rules.len()],
        }
    }

    /// Name of the state on top of the stack.
    pub fn current_state(&self) -> &'static str {
        let top = self.stack.last().copied().unwrap_or(self.grammar.start);
        self.grammar.states[top].name
    }

    /// End of the match for `rule` if it matches exactly at `pos`.
    fn match_at(&mut self, rule: usize, pos: usize) -> Option<usize> {
        match self.lookahead[rule] {
            Lookahead::Found { from, start, end } if from <= pos && pos <= start => {
                return (start == pos).then_some(end);
            }
            Lookahead::Clear { from, until } if from <= pos && pos < until => return None,
            _ => {}
        }

        let lookahead = if self.windowed[rule] {
            self.search_window(rule, pos)
        } else {
            match self.grammar.rules[rule].pattern.find_at(self.text, pos) {
                Ok(Some(found)) => Lookahead::Found {
                    from: pos,
                    start: found.start,
                    end: found.end,
                },
                Ok(None) => Lookahead::Clear {
                    from: pos,
                    until: self.text.len(),
                },
                Err(error) => {
                    let compiled = &self.grammar.rules[rule];
                    if !compiled.gave_up.swap(true, Ordering::Relaxed) {
                        warn!(grammar = self.grammar.name, rule, pos, %error, "pattern search gave up; searching line windows");
                    }
                    self.windowed[rule] = true;
                    self.search_window(rule, pos)
                }
            }
        };
        self.lookahead[rule] = lookahead;
        match lookahead {
            Lookahead::Found { start, end, .. } => (start == pos).then_some(end),
            _ => None,
        }
    }

    fn search_window(&self, rule: usize, pos: usize) -> Lookahead {
        let until = window_end(self.text, pos, self.grammar.limits.window);
        match self.grammar.rules[rule].pattern.find_at(&self.text[..until], pos) {
            Ok(Some(found)) => Lookahead::Found {
                from: pos,
                start: found.start,
                end: found.end,
            },
            Ok(None) => Lookahead::Clear { from: pos, until },
            Err(_) => {
                let step = self.text[pos..].chars().next().map_or(1, char::len_utf8);
                Lookahead::Clear {
                    from: pos,
                    until: pos + step,
                }
            }
        }
    }

    fn emit(&mut self, rule: usize, start: usize, end: usize) {
        let text = self.text;
        match self.grammar.rules[rule].action {
            Action::Token(category) => self.pending.push_back(Token::new(text, start, end, category)),
            Action::ByGroups(categories) => {
                let groups = self.grammar.rules[rule].pattern.groups_at(text, start);
                let mut cursor = start;
                for (group, category) in categories.iter().enumerate() {
                    let Some(found) = groups.get(group + 1).cloned().flatten() else {
                        continue;
                    };
                    if found.start < cursor || found.end > end || found.is_empty() {
                        continue;
                    }
                    if found.start > cursor {
                        self.pending.push_back(Token::new(text, cursor, found.start, TokenCategory::Text));
                    }
                    self.pending.push_back(Token::new(text, found.start, found.end, *category));
                    cursor = found.end;
                }
                if cursor < end {
                    self.pending.push_back(Token::new(text, cursor, end, TokenCategory::Text));
                }
            }
        }
    }

    fn apply(&mut self, next: Next) {
        match next {
            Next::Stay => {}
            Next::Push(state) => self.stack.push(state),
            Next::Pop => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'t> Iterator for Tokens<'_, 't> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Token<'t>> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.pos >= self.text.len() {
            return None;
        }

        let grammar = self.grammar;
        let pos = self.pos;
        let state = self.stack.last().copied().unwrap_or(grammar.start);
        for &rule in &grammar.states[state].rules {
            let Some(end) = self.match_at(rule, pos) else {
                continue;
            };
            if end == pos {
                continue;
            }
            self.emit(rule, pos, end);
            self.pos = end;
            self.apply(grammar.rules[rule].next);
            return self.pending.pop_front();
        }

        let character = self.text[pos..].chars().next()?;
        let end = pos + character.len_utf8();
        if character == '\n' {
            self.stack.clear();
            self.stack.push(grammar.start);
        }
        self.pos = end;
        Some(Token::new(self.text, pos, end, TokenCategory::Text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{groups, include, pop, push, token};
    use TokenCategory::{Name, NameVariable, Operator, Punctuation, StringDouble, Text};

    const QUOTES: GrammarSpec = GrammarSpec {
        name: "quotes",
        start: "root",
        states: &[
            ("root", &[include("words"), push(r#"""#, StringDouble, "string")]),
            ("words", &[token(r"[a-z]+", Name), token(r"\s+", Text)]),
            ("string", &[pop(r#"""#, StringDouble), token(r#"[^"\n]+"#, StringDouble)]),
        ],
    };

    fn kinds(grammar: &Grammar, text: &str) -> Vec<(String, TokenCategory)> {
        grammar
            .tokenize(text)
            .map(|token| (token.text.to_string(), token.category))
            .collect()
    }

    #[test]
    fn push_and_pop_track_nested_state() {
        let grammar = Grammar::compile(&QUOTES).unwrap();
        assert_eq!(
            kinds(&grammar, "say \"hi there\" ok"),
            vec![
                ("say".into(), Name),
                (" ".into(), Text),
                ("\"".into(), StringDouble),
                ("hi there".into(), StringDouble),
                ("\"".into(), StringDouble),
                (" ".into(), Text),
                ("ok".into(), Name),
            ]
        );
    }

    #[test]
    fn unmatched_characters_degrade_to_text() {
        let grammar = Grammar::compile(&QUOTES).unwrap();
        let tokens = kinds(&grammar, "a1b");
        assert_eq!(tokens, vec![("a".into(), Name), ("1".into(), Text), ("b".into(), Name)]);
    }

    #[test]
    fn newline_recovers_from_unterminated_state() {
        let grammar = Grammar::compile(&QUOTES).unwrap();
        let tokens = kinds(&grammar, "\"open\nword");
        assert_eq!(tokens.last(), Some(&("word".to_string(), Name)));
    }

    #[test]
    fn by_groups_fills_uncovered_text() {
        const ASSIGN: GrammarSpec = GrammarSpec {
            name: "assign",
            start: "root",
            states: &[("root", &[groups(r"(\w+) *(=)", &[NameVariable, Operator]), token(r"\S+", Text)])],
        };
        let grammar = Grammar::compile(&ASSIGN).unwrap();
        assert_eq!(
            kinds(&grammar, "x  =1"),
            vec![
                ("x".into(), NameVariable),
                ("  ".into(), Text),
                ("=".into(), Operator),
                ("1".into(), Text),
            ]
        );
    }

    #[test]
    fn pop_keeps_the_bottom_state() {
        const POPPER: GrammarSpec = GrammarSpec {
            name: "popper",
            start: "root",
            states: &[("root", &[pop(r"\)", Punctuation), token(r"[a-z]+", Name)])],
        };
        let grammar = Grammar::compile(&POPPER).unwrap();
        let mut tokens = grammar.tokenize("))a");
        assert_eq!(tokens.next().map(|t| t.category), Some(Punctuation));
        assert_eq!(tokens.next().map(|t| t.category), Some(Punctuation));
        assert_eq!(tokens.current_state(), "root");
        assert_eq!(tokens.next().map(|t| t.category), Some(Name));
    }

    #[test]
    fn tokenize_from_starts_in_named_state() {
        let grammar = Grammar::compile(&QUOTES).unwrap();
        let tokens: Vec<_> = grammar.tokenize_from("inside\" out", "string").unwrap().collect();
        assert_eq!(tokens[0].category, StringDouble);
        assert_eq!(tokens[0].text, "inside");
        assert!(grammar.tokenize_from("x", "nowhere").is_err());
    }

    #[test]
    fn cached_lookahead_does_not_change_results() {
        let grammar = Grammar::compile(&QUOTES).unwrap();
        let text = "aa \"bb\" cc \"dd\" ee";
        let first: Vec<_> = grammar.tokenize(text).collect();
        let second: Vec<_> = grammar.tokenize(text).collect();
        assert_eq!(first, second);
        let joined: String = first.iter().map(|token| token.text).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn backtrack_limit_falls_back_to_line_windows() {
        const GUARDED: GrammarSpec = GrammarSpec {
            name: "guarded",
            start: "root",
            states: &[("root", &[token(r"x(?=y)", Name), token(r"[a-z]+", Text)])],
        };
        let limits = SearchLimits {
            backtrack_limit: 200,
            window: 32,
        };
        let grammar = Grammar::compile_with(&GUARDED, limits).unwrap();
        let text = format!("{}xy\n", "abc\n".repeat(300));

        let tokens: Vec<_> = grammar.tokenize(&text).collect();
        let joined: String = tokens.iter().map(|token| token.text).collect();
        assert_eq!(joined, text);
        let guarded: Vec<_> = tokens
            .iter()
            .filter(|token| token.category == Name)
            .map(|token| (token.start, token.text))
            .collect();
        assert_eq!(guarded, vec![(1200, "x")]);
        assert!(grammar.rules[0].gave_up.load(Ordering::Relaxed));
    }

    #[test]
    fn rejects_unknown_include_target() {
        const BROKEN: GrammarSpec = GrammarSpec {
            name: "broken",
            start: "root",
            states: &[("root", &[include("missing")])],
        };
        let error = Grammar::compile(&BROKEN).unwrap_err();
        assert!(matches!(error, GrammarError::UnknownState { target: "missing", .. }), "{error}");
    }

    #[test]
    fn rejects_include_cycles() {
        const CYCLE: GrammarSpec = GrammarSpec {
            name: "cycle",
            start: "root",
            states: &[("root", &[include("other")]), ("other", &[include("root")])],
        };
        assert!(matches!(Grammar::compile(&CYCLE), Err(GrammarError::IncludeCycle { .. })));
    }

    #[test]
    fn rejects_invalid_patterns_and_missing_start() {
        const BAD_PATTERN: GrammarSpec = GrammarSpec {
            name: "bad",
            start: "root",
            states: &[("root", &[token(r"(unclosed", Text)])],
        };
        assert!(matches!(Grammar::compile(&BAD_PATTERN), Err(GrammarError::InvalidPattern { .. })));

        const NO_START: GrammarSpec = GrammarSpec {
            name: "nostart",
            start: "root",
            states: &[("other", &[token(r"x", Text)])],
        };
        assert!(matches!(Grammar::compile(&NO_START), Err(GrammarError::MissingState { .. })));
    }
}
