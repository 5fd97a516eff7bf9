//! JSON grammar for sheets that embed fenced ```json payloads.

use cheatcolor_types::TokenCategory::{Keyword, NameAttribute, Number, Punctuation, StringDouble, Text};

use crate::rules::{GrammarSpec, groups, token};

pub const JSON: GrammarSpec = GrammarSpec {
    name: "json",
    start: "root",
    states: &[(
        "root",
        &[
            token(r"\s+", Text),
            groups(r#"("(?:\\.|[^"\\\n])*")(\s*)(:)"#, &[NameAttribute, Text, Punctuation]),
            token(r#""(?:\\.|[^"\\\n])*""#, StringDouble),
            token(r"\b(?:true|false|null)\b", Keyword),
            token(r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][-+]?\d+)?", Number),
            token(r"[{}\[\],:]", Punctuation),
            token(r#"[^\s"{}\[\],:]+"#, Text),
        ],
    )],
};
