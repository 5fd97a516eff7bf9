//! # Token categories and classified spans
//!
//! Categories form a small tree rooted at [`TokenCategory::Text`]. Style tables
//! only need entries for the coarse categories (`String`, `Comment`, ...); the
//! finer ones inherit through [`TokenCategory::ancestors`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic label attached to a span of sheet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Unclassified text; the root of the category tree.
    Text,
    Keyword,
    Name,
    #[serde(rename = "Name.Variable")]
    NameVariable,
    #[serde(rename = "Name.Builtin")]
    NameBuiltin,
    /// Leading command word of a sheet line.
    #[serde(rename = "Name.Function")]
    NameFunction,
    /// Command-line flags such as `-v` or `--verbose`.
    #[serde(rename = "Name.Attribute")]
    NameAttribute,
    Comment,
    #[serde(rename = "Comment.Hashbang")]
    CommentHashbang,
    #[serde(rename = "Comment.Single")]
    CommentSingle,
    String,
    #[serde(rename = "String.Double")]
    StringDouble,
    #[serde(rename = "String.Single")]
    StringSingle,
    #[serde(rename = "String.Backtick")]
    StringBacktick,
    #[serde(rename = "String.Interpol")]
    StringInterpol,
    #[serde(rename = "String.Escape")]
    StringEscape,
    Operator,
    Punctuation,
    Number,
}

impl TokenCategory {
    /// Every category, parents before children.
    pub const ALL: [TokenCategory; 19] = [
        TokenCategory::Text,
        TokenCategory::Keyword,
        TokenCategory::Name,
        TokenCategory::NameVariable,
        TokenCategory::NameBuiltin,
        TokenCategory::NameFunction,
        TokenCategory::NameAttribute,
        TokenCategory::Comment,
        TokenCategory::CommentHashbang,
        TokenCategory::CommentSingle,
        TokenCategory::String,
        TokenCategory::StringDouble,
        TokenCategory::StringSingle,
        TokenCategory::StringBacktick,
        TokenCategory::StringInterpol,
        TokenCategory::StringEscape,
        TokenCategory::Operator,
        TokenCategory::Punctuation,
        TokenCategory::Number,
    ];

    /// The category one level up the tree, or `None` for [`TokenCategory::Text`].
    pub fn parent(self) -> Option<TokenCategory> {
        use TokenCategory::*;
        match self {
            Text => None,
            NameVariable | NameBuiltin | NameFunction | NameAttribute => Some(Name),
            CommentHashbang | CommentSingle => Some(Comment),
            StringDouble | StringSingle | StringBacktick | StringInterpol | StringEscape => Some(String),
            Keyword | Name | Comment | String | Operator | Punctuation | Number => Some(Text),
        }
    }

    /// Iterates from `self` up to the root, `self` first.
    pub fn ancestors(self) -> impl Iterator<Item = TokenCategory> {
        std::iter::successors(Some(self), |category| category.parent())
    }

    /// Returns true when `self` equals `other` or descends from it.
    pub fn is_a(self, other: TokenCategory) -> bool {
        self.ancestors().any(|category| category == other)
    }

    /// Dotted name, e.g. `Name.Builtin`.
    pub fn qualified_name(self) -> &'static str {
        use TokenCategory::*;
        match self {
            Text => "Text",
            Keyword => "Keyword",
            Name => "Name",
            NameVariable => "Name.Variable",
            NameBuiltin => "Name.Builtin",
            NameFunction => "Name.Function",
            NameAttribute => "Name.Attribute",
            Comment => "Comment",
            CommentHashbang => "Comment.Hashbang",
            CommentSingle => "Comment.Single",
            String => "String",
            StringDouble => "String.Double",
            StringSingle => "String.Single",
            StringBacktick => "String.Backtick",
            StringInterpol => "String.Interpol",
            StringEscape => "String.Escape",
            Operator => "Operator",
            Punctuation => "Punctuation",
            Number => "Number",
        }
    }

    /// Parses a dotted name produced by [`TokenCategory::qualified_name`].
    pub fn from_qualified_name(name: &str) -> Option<TokenCategory> {
        Self::ALL.into_iter().find(|category| category.qualified_name() == name)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

/// A classified span of the input, borrowed from it.
///
/// `start..end` is the byte range of `text` inside the tokenized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub category: TokenCategory,
}

impl<'a> Token<'a> {
    /// Builds a token for `source[start..end]`.
    pub fn new(source: &'a str, start: usize, end: usize, category: TokenCategory) -> Self {
        Self {
            text: &source[start..end],
            start,
            end,
            category,
        }
    }
}
