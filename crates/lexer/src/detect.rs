//! Content sniffing used to guess a grammar when no language is named.

use regex::RegexBuilder;

/// Checks whether the first line is a `#!` line whose interpreter matches
/// `interpreter` (an unanchored regex fragment such as `(ba|z|)sh`).
///
/// `/usr/bin/env bash -e` style lines are understood: option words are
/// skipped and the last path component of the remaining words is tested.
/// A trailing `.exe`, `.cmd`, `.bat` or `.bin` is allowed.
pub fn shebang_matches(text: &str, interpreter: &str) -> bool {
    let first_line = text.lines().next().unwrap_or_default();
    let Some(command) = first_line.strip_prefix("#!") else {
        return false;
    };
    let Some(found) = command
        .trim()
        .split(['/', '\\', ' '])
        .filter(|part| !part.is_empty() && !part.starts_with('-'))
        .last()
    else {
        return false;
    };

    RegexBuilder::new(&format!(r"^{interpreter}(\.(exe|cmd|bat|bin))?$"))
        .case_insensitive(true)
        .build()
        .map(|pattern| pattern.is_match(found))
        .unwrap_or(false)
}

/// Confidence in `0.0..=1.0` that `text` is a shell cheatsheet.
pub fn analyse_shell(text: &str) -> f32 {
    if shebang_matches(text, "(ba|z|)sh") {
        return 1.0;
    }
    if text.starts_with("$ ") {
        return 0.2;
    }
    0.0
}

/// Confidence that `text` is a JSON document.
pub fn analyse_json(text: &str) -> f32 {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return 0.1;
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_shell_shebangs() {
        assert!(shebang_matches("#!/bin/sh\necho", "(ba|z|)sh"));
        assert!(shebang_matches("#!/usr/bin/env bash\n", "(ba|z|)sh"));
        assert!(shebang_matches("#!/usr/local/bin/zsh -f\n", "(ba|z|)sh"));
        assert!(shebang_matches("#!C:\\tools\\BASH.EXE", "(ba|z|)sh"));
        assert!(!shebang_matches("#!/usr/bin/env python\n", "(ba|z|)sh"));
        assert!(!shebang_matches("#!/bin/bashful\n", "(ba|z|)sh"));
        assert!(!shebang_matches("echo #!/bin/sh", "(ba|z|)sh"));
        assert!(!shebang_matches("", "(ba|z|)sh"));
    }

    #[test]
    fn shell_scores() {
        assert_eq!(analyse_shell("#!/bin/bash\nls"), 1.0);
        assert_eq!(analyse_shell("$ ls -la\n"), 0.2);
        assert_eq!(analyse_shell("ls -la\n"), 0.0);
    }

    #[test]
    fn json_scores() {
        assert!(analyse_json("  {\"a\": 1}") > 0.0);
        assert_eq!(analyse_json("ls"), 0.0);
    }
}
