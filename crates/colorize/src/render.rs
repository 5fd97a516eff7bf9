//! ANSI rendering of classified tokens.
//!
//! Escapes come from `crossterm::style`, so indexed colors are written in the
//! `38;5;<n>` 256-color form and `NO_COLOR` is honored the way crossterm
//! honors it. Styled spans are closed before every newline; a line never
//! starts inside an escape sequence opened on the previous one.

use std::borrow::Cow;
use std::fmt::Write;

use cheatcolor_types::Token;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::style::StyleTable;

static SGR_SEQUENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid SGR pattern"));

/// Renders `tokens` with `styles`, copying unstyled text verbatim.
pub fn render<'t>(tokens: impl IntoIterator<Item = Token<'t>>, styles: &StyleTable) -> String {
    let mut output = String::new();
    for token in tokens {
        let Some(entry) = styles.lookup(token.category).filter(|entry| !entry.is_plain()) else {
            output.push_str(token.text);
            continue;
        };
        let style = entry.content_style();
        for (index, line) in token.text.split('\n').enumerate() {
            if index > 0 {
                output.push('\n');
            }
            if !line.is_empty() {
                let _ = write!(output, "{}", style.apply(line));
            }
        }
    }
    output
}

/// Removes SGR escape sequences, leaving the plain text.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    SGR_SEQUENCE.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cheatcolor_types::TokenCategory;
    use crossterm::style::{Color, Colored};

    use crate::style::StyleEntry;

    fn token(source: &str, start: usize, end: usize, category: TokenCategory) -> Token<'_> {
        Token::new(source, start, end, category)
    }

    #[test]
    fn wraps_styled_spans_in_escapes() {
        Colored::set_ansi_color_disabled(false);
        let source = "# hi\nls";
        let tokens = [
            token(source, 0, 5, TokenCategory::CommentSingle),
            token(source, 5, 7, TokenCategory::Text),
        ];
        let rendered = render(tokens, &StyleTable::cheat());
        assert_eq!(rendered, "\x1b[38;5;6m# hi\x1b[39m\nls");
        assert_eq!(strip_ansi(&rendered), source);
    }

    #[test]
    fn indexed_colors_use_the_256_color_form() {
        Colored::set_ansi_color_disabled(false);
        let table = StyleTable::new("test").with(TokenCategory::Number, StyleEntry::fg(Color::AnsiValue(208)));
        let rendered = render([token("42", 0, 2, TokenCategory::Number)], &table);
        assert!(rendered.contains("\x1b[38;5;208m"), "{rendered:?}");
        assert_eq!(strip_ansi(&rendered), "42");
    }

    #[test]
    fn attributes_are_reset_after_the_span() {
        Colored::set_ansi_color_disabled(false);
        let table = StyleTable::new("test").with(TokenCategory::Keyword, StyleEntry::fg(Color::Green).bold());
        let rendered = render([token("if", 0, 2, TokenCategory::Keyword)], &table);
        assert!(rendered.starts_with('\x1b'));
        assert!(rendered.ends_with("\x1b[0m"), "{rendered:?}");
        assert_eq!(strip_ansi(&rendered), "if");
    }

    #[test]
    fn unstyled_tokens_pass_through() {
        let source = "plain words";
        let rendered = render([token(source, 0, source.len(), TokenCategory::Text)], &StyleTable::plain());
        assert_eq!(rendered, source);
    }

    #[test]
    fn strip_leaves_plain_text_alone() {
        assert!(matches!(strip_ansi("nothing to strip"), Cow::Borrowed(_)));
    }
}
