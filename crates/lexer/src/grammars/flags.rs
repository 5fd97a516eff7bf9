//! Command-and-flags grammar: comment lines, the leading word of every other
//! line as the command, and `-x` / `--long` arguments as flags.

use cheatcolor_types::TokenCategory::{CommentSingle, NameAttribute, NameFunction, Text};

use crate::rules::{GrammarSpec, groups, token};

pub const CHEAT_FLAGS: GrammarSpec = GrammarSpec {
    name: "cheat-flags",
    start: "root",
    states: &[(
        "root",
        &[
            token(r"^[ \t]*#[^\n]*\n?", CommentSingle),
            groups(r"^([ \t]*)([^\s#-]\S*)", &[Text, NameFunction]),
            token(r"(?<![\w-])--?\w[\w-]*(?:=\S*)?", NameAttribute),
            token(r"\s+", Text),
            token(r"[^\s-]+|-", Text),
        ],
    )],
};
