//! # Style tables
//!
//! A [`StyleTable`] maps token categories to terminal styles. Lookups walk up
//! the category tree, so an entry for `String` also colors `String.Double`,
//! `String.Interpol` and friends. Categories with no entry anywhere on their
//! path render unstyled.
//!
//! The named-color presets follow the 16-color ANSI set (`DarkYellow` is the
//! classic "brown", `DarkCyan` is "teal"); [`StyleTable::default_theme`] uses
//! indexed 256-color values.

use cheatcolor_types::TokenCategory;
use crossterm::style::{Attribute, Color, ContentStyle};
use indexmap::IndexMap;

/// Foreground color and text attributes for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleEntry {
    pub foreground: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleEntry {
    pub const fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// True when applying this entry would not change the output.
    pub fn is_plain(&self) -> bool {
        self.foreground.is_none() && !self.bold && !self.italic && !self.underline
    }

    pub fn content_style(&self) -> ContentStyle {
        let mut style = ContentStyle::new();
        style.foreground_color = self.foreground;
        if self.bold {
            style.attributes.set(Attribute::Bold);
        }
        if self.italic {
            style.attributes.set(Attribute::Italic);
        }
        if self.underline {
            style.attributes.set(Attribute::Underlined);
        }
        style
    }
}

/// Category-to-style mapping, always paired with a grammar when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    name: &'static str,
    entries: IndexMap<TokenCategory, StyleEntry>,
}

impl StyleTable {
    /// An empty table; everything renders unstyled.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: IndexMap::new(),
        }
    }

    pub fn with(mut self, category: TokenCategory, entry: StyleEntry) -> Self {
        self.insert(category, entry);
        self
    }

    pub fn insert(&mut self, category: TokenCategory, entry: StyleEntry) {
        self.entries.insert(category, entry);
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (TokenCategory, StyleEntry)> + '_ {
        self.entries.iter().map(|(category, entry)| (*category, *entry))
    }

    /// The entry for `category` or its nearest ancestor that has one.
    pub fn lookup(&self, category: TokenCategory) -> Option<StyleEntry> {
        category
            .ancestors()
            .find_map(|candidate| self.entries.get(&candidate).copied())
    }

    /// Style of the bundled shell grammar.
    pub fn cheat() -> Self {
        Self::new("cheat")
            .with(TokenCategory::String, StyleEntry::fg(Color::DarkYellow))
            .with(TokenCategory::Comment, StyleEntry::fg(Color::DarkCyan))
            .with(TokenCategory::Operator, StyleEntry::fg(Color::Red))
            .with(TokenCategory::Keyword, StyleEntry::fg(Color::White))
    }

    /// Style of the comment-line grammar.
    pub fn cheat_lines() -> Self {
        Self::new("cheat-lines")
            .with(TokenCategory::Comment, StyleEntry::fg(Color::DarkCyan))
            .with(TokenCategory::Text, StyleEntry::fg(Color::Grey))
    }

    /// Style of the command-and-flags grammar.
    pub fn cheat_flags() -> Self {
        Self::new("cheat-flags")
            .with(TokenCategory::Comment, StyleEntry::fg(Color::DarkCyan))
            .with(TokenCategory::NameFunction, StyleEntry::fg(Color::White).bold())
            .with(TokenCategory::NameAttribute, StyleEntry::fg(Color::DarkYellow))
    }

    /// General-purpose palette applied to grammars resolved by language name.
    pub fn default_theme() -> Self {
        Self::new("default")
            .with(TokenCategory::Comment, StyleEntry::fg(Color::AnsiValue(66)).italic())
            .with(TokenCategory::Keyword, StyleEntry::fg(Color::AnsiValue(28)).bold())
            .with(TokenCategory::Operator, StyleEntry::fg(Color::AnsiValue(241)))
            .with(TokenCategory::NameBuiltin, StyleEntry::fg(Color::AnsiValue(28)))
            .with(TokenCategory::NameFunction, StyleEntry::fg(Color::AnsiValue(21)))
            .with(TokenCategory::NameVariable, StyleEntry::fg(Color::AnsiValue(18)))
            .with(TokenCategory::NameAttribute, StyleEntry::fg(Color::AnsiValue(100)))
            .with(TokenCategory::String, StyleEntry::fg(Color::AnsiValue(124)))
            .with(TokenCategory::StringInterpol, StyleEntry::fg(Color::AnsiValue(132)).bold())
            .with(TokenCategory::StringEscape, StyleEntry::fg(Color::AnsiValue(130)).bold())
            .with(TokenCategory::Number, StyleEntry::fg(Color::AnsiValue(241)))
    }

    /// No entries at all.
    pub fn plain() -> Self {
        Self::new("plain")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_inherits_from_parent_categories() {
        let table = StyleTable::cheat();
        assert_eq!(table.lookup(TokenCategory::StringDouble), Some(StyleEntry::fg(Color::DarkYellow)));
        assert_eq!(table.lookup(TokenCategory::CommentHashbang), Some(StyleEntry::fg(Color::DarkCyan)));
        assert_eq!(table.lookup(TokenCategory::Keyword), Some(StyleEntry::fg(Color::White)));
    }

    #[test]
    fn missing_categories_are_unstyled() {
        let table = StyleTable::cheat();
        assert_eq!(table.lookup(TokenCategory::NameBuiltin), None);
        assert_eq!(table.lookup(TokenCategory::Text), None);
        assert!(StyleTable::plain().lookup(TokenCategory::Keyword).is_none());
    }

    #[test]
    fn specific_entry_beats_parent() {
        let table = StyleTable::default_theme();
        let interpol = table.lookup(TokenCategory::StringInterpol).unwrap();
        assert!(interpol.bold);
        assert_eq!(interpol.foreground, Some(Color::AnsiValue(132)));
        assert_eq!(table.lookup(TokenCategory::StringSingle).unwrap().foreground, Some(Color::AnsiValue(124)));
    }

    #[test]
    fn bundled_tables_stay_small() {
        for table in [StyleTable::cheat(), StyleTable::cheat_lines(), StyleTable::cheat_flags()] {
            let size = table.entries().count();
            assert!((1..=4).contains(&size), "{} has {size} entries", table.name());
        }
    }

    #[test]
    fn content_style_carries_attributes() {
        let style = StyleEntry::fg(Color::Red).bold().underline().content_style();
        assert_eq!(style.foreground_color, Some(Color::Red));
        assert!(style.attributes.has(Attribute::Bold));
        assert!(style.attributes.has(Attribute::Underlined));
        assert!(!style.attributes.has(Attribute::Italic));
    }
}
