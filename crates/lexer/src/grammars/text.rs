//! Grammar that classifies everything as plain text.

use cheatcolor_types::TokenCategory::Text;

use crate::rules::{GrammarSpec, token};

pub const TEXT: GrammarSpec = GrammarSpec {
    name: "text",
    start: "root",
    states: &[("root", &[token(r"(?s).+", Text)])],
};
