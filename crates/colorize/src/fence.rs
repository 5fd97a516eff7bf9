//! Fenced code block handling.
//!
//! A sheet whose first line starts with three backticks names the language
//! of its body, Markdown style:
//!
//! ````text
//! ```json
//! {"key": "value"}
//! ```
//! ````
//!
//! The fence line and the last two `\n`-separated segments (the closing fence
//! and the empty remainder after the final newline) are dropped.

pub const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Everything after the opening backticks, verbatim (may be empty).
    pub language: &'a str,
    /// Remaining lines, each terminated by `\n`.
    pub body: String,
}

/// Splits a fenced sheet into its language hint and body.
///
/// Returns `None` when the first line is not a fence.
pub fn parse_fence(content: &str) -> Option<FencedBlock<'_>> {
    let first_line = content.lines().next()?;
    let language = first_line.strip_prefix(FENCE)?;

    let segments: Vec<&str> = content.split('\n').collect();
    let body = match segments.len() {
        0..=3 => String::new(),
        count => segments[1..count - 2].iter().fold(String::new(), |mut body, line| {
            body.push_str(line);
            body.push('\n');
            body
        }),
    };
    Some(FencedBlock { language, body })
}
