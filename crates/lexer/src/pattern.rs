//! Compiled rule patterns.
//!
//! Every pattern the `regex` crate accepts runs on its linear-time engine.
//! Only patterns that need look-around or back-references are handed to
//! `fancy_regex`, whose backtracking search may give up on long inputs with
//! [`fancy_regex::RuntimeError::BacktrackLimitExceeded`].

use std::ops::Range;

/// Backtracking budget and fallback window for look-around patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchLimits {
    /// Steps one backtracking search may take before giving up.
    pub backtrack_limit: usize,
    /// Bytes searched at a time once a full search has given up. Windows
    /// are extended to the end of the line they stop in.
    pub window: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            backtrack_limit: 1_000_000,
            window: 4096,
        }
    }
}

pub(crate) enum Pattern {
    Linear(regex::Regex),
    Backtracking(fancy_regex::Regex),
}

/// Byte ranges of every capture group; index 0 is the whole match.
pub(crate) type Groups = Vec<Option<Range<usize>>>;

impl Pattern {
    /// Compiles `pattern` in multi-line mode.
    pub(crate) fn compile(pattern: &str, limits: SearchLimits) -> Result<Self, fancy_regex::Error> {
        let source = format!("(?m){pattern}");
        if let Ok(regex) = regex::Regex::new(&source) {
            return Ok(Pattern::Linear(regex));
        }
        fancy_regex::RegexBuilder::new(&source)
            .backtrack_limit(limits.backtrack_limit)
            .build()
            .map(Pattern::Backtracking)
    }

    pub(crate) fn is_backtracking(&self) -> bool {
        matches!(self, Pattern::Backtracking(_))
    }

    /// Leftmost match in `haystack` starting at or after `pos`. Text before
    /// `pos` still counts for anchors and look-behind.
    pub(crate) fn find_at(&self, haystack: &str, pos: usize) -> Result<Option<Range<usize>>, fancy_regex::Error> {
        match self {
            Pattern::Linear(regex) => Ok(regex.find_at(haystack, pos).map(|found| found.range())),
            Pattern::Backtracking(regex) => Ok(regex.find_from_pos(haystack, pos)?.map(|found| found.range())),
        }
    }

    /// Capture groups of the leftmost match at or after `pos`; empty when
    /// nothing matches or the search gives up.
    pub(crate) fn groups_at(&self, haystack: &str, pos: usize) -> Groups {
        match self {
            Pattern::Linear(regex) => regex
                .captures_at(haystack, pos)
                .map(|captures| captures.iter().map(|group| group.map(|found| found.range())).collect())
                .unwrap_or_default(),
            Pattern::Backtracking(regex) => regex
                .captures_from_pos(haystack, pos)
                .ok()
                .flatten()
                .map(|captures| captures.iter().map(|group| group.map(|found| found.range())).collect())
                .unwrap_or_default(),
        }
    }
}

/// End of the fallback search window starting at `pos`: `window` bytes on,
/// then through the next newline.
pub(crate) fn window_end(text: &str, pos: usize, window: usize) -> usize {
    let target = pos.saturating_add(window);
    if target >= text.len() {
        return text.len();
    }
    match text.as_bytes()[target..].iter().position(|&byte| byte == b'\n') {
        Some(offset) => target + offset + 1,
        None => text.len(),
    }
}
