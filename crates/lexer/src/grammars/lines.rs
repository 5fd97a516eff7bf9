//! Line-oriented grammar: a line is either a comment or it is not.

use cheatcolor_types::TokenCategory::{CommentSingle, Text};

use crate::rules::{GrammarSpec, token};

pub const CHEAT_LINES: GrammarSpec = GrammarSpec {
    name: "cheat-lines",
    start: "root",
    states: &[(
        "root",
        &[
            token(r"^[ \t]*#[^\n]*\n?", CommentSingle),
            token(r"[^\n]+\n?", Text),
            token(r"\n", Text),
        ],
    )],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Grammar;

    #[test]
    fn splits_comment_lines_from_the_rest() {
        let grammar = Grammar::compile(&CHEAT_LINES).unwrap();
        let text = "# Extract an archive\ntar -xf a.tar # not a comment line\n\n  # indented\n";
        let tokens: Vec<_> = grammar.tokenize(text).map(|token| (token.text, token.category)).collect();
        assert_eq!(
            tokens,
            vec![
                ("# Extract an archive\n", CommentSingle),
                ("tar -xf a.tar # not a comment line\n", Text),
                ("\n", Text),
                ("  # indented\n", CommentSingle),
            ]
        );
    }
}
