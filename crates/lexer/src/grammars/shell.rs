//! Shell-flavoured grammar used for cheatsheets.
//!
//! Covers keywords, builtins, comments, quoting (including `$'...'`), here
//! documents and the nested substitution forms `$(...)`, `$((...))`, `${...}`
//! and backticks. It tokenizes for coloring only; it is not a shell parser.

use cheatcolor_types::TokenCategory;
use cheatcolor_types::TokenCategory::{
    CommentHashbang, CommentSingle, Keyword, NameBuiltin, NameVariable, Number, Operator, Punctuation, StringBacktick,
    StringDouble, StringEscape, StringInterpol, StringSingle, Text,
};

use crate::rules::{GrammarSpec, StateDef, groups, include, pop, push, token};

/// The bundled cheatsheet grammar.
pub const CHEAT: GrammarSpec = GrammarSpec {
    name: "cheat",
    start: "root",
    states: STATES,
};

/// Same rule table, registered under the conventional shell names.
pub const BASH: GrammarSpec = GrammarSpec {
    name: "bash",
    start: "root",
    states: STATES,
};

const STATES: &[StateDef] = &[
    (
        "root",
        &[
            include("basic"),
            push(r"`", StringBacktick, "backticks"),
            include("data"),
            include("interp"),
        ],
    ),
    (
        "interp",
        &[
            push(r"\$\(\(", Keyword, "math"),
            push(r"\$\(", Keyword, "paren"),
            push(r"\$\{#?", StringInterpol, "curly"),
            token(r"\$[a-zA-Z_]\w*", NameVariable),
            token(r"\$(?:\d+|[#$?!_*@-])", NameVariable),
            token(r"\$", Text),
        ],
    ),
    (
        "basic",
        &[
            groups(
                r"\b(if|fi|else|while|do|done|for|then|return|function|case|select|continue|until|esac|elif)(\s*)\b",
                &[Keyword, Text],
            ),
            token(
                concat!(
                    r"\b(alias|bg|bind|break|builtin|caller|cd|command|compgen|",
                    r"complete|declare|dirs|disown|echo|enable|eval|exec|exit|",
                    r"export|false|fc|fg|getopts|hash|help|history|jobs|kill|let|",
                    r"local|logout|popd|printf|pushd|pwd|read|readonly|set|shift|",
                    r"shopt|source|suspend|test|time|times|trap|true|type|typeset|",
                    r"ulimit|umask|unalias|unset|wait)(?=[\s)`])",
                ),
                NameBuiltin,
            ),
            token(r"\A#!.+\n?", CommentHashbang),
            token(r"#.*\n?", CommentSingle),
            token(r"\\[\w\W]", StringEscape),
            groups(r"(\b\w+)(\s*)(\+?=)", &[NameVariable, Text, Operator]),
            token(r"[\[\]{}()=]", Operator),
            token(r"<<<", Operator),
            token(r"<<-?\s*('?)\\?(\w+)[\w\W]+?\2", TokenCategory::String),
            token(r"&&|\|\|", Operator),
        ],
    ),
    (
        "data",
        &[
            token(r#"(?s)\$?"(\\\\|\\[0-7]+|\\.|[^"\\$])*""#, StringDouble),
            push(r#"""#, StringDouble, "string"),
            token(r"(?s)\$'(\\\\|\\[0-7]+|\\.|[^'\\])*'", StringSingle),
            token(r"(?s)'.*?'", StringSingle),
            token(r";", Punctuation),
            token(r"&", Punctuation),
            token(r"\|", Punctuation),
            token(r"\s+", Text),
            token(r"\d+\b", Number),
            token(r#"[^=\s\[\]{}()$"'`\\<&|;]+"#, Text),
            token(r"<", Text),
        ],
    ),
    (
        "string",
        &[
            pop(r#"""#, StringDouble),
            token(r#"(?s)(\\\\|\\[0-7]+|\\.|[^"\\$])+"#, StringDouble),
            include("interp"),
        ],
    ),
    (
        "curly",
        &[
            pop(r"\}", StringInterpol),
            token(r":-", Keyword),
            token(r"\w+", NameVariable),
            token(r#"[^}:"'`$\\]+"#, Punctuation),
            token(r":", Punctuation),
            include("root"),
        ],
    ),
    ("paren", &[pop(r"\)", Keyword), include("root")]),
    (
        "math",
        &[
            pop(r"\)\)", Keyword),
            token(r"[-+*/%^|&]|\*\*|\|\|", Operator),
            token(r"\d+#\d+", Number),
            token(r"\d+#(?! )", Number),
            token(r"\d+", Number),
            include("root"),
        ],
    ),
    ("backticks", &[pop(r"`", StringBacktick), include("root")]),
];
