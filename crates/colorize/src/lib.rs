//! Terminal colorizing for plain-text cheatsheets.
//!
//! ```no_run
//! use cheatcolor::{ColorizeConfig, colorize};
//!
//! let config = ColorizeConfig::from_env_or_default();
//! print!("{}", colorize("# list files\nls -la\n", &config));
//! ```

pub mod colorizer;
pub mod config;
pub mod fence;
pub mod flavor;
pub mod render;
pub mod style;

pub use colorizer::{Colorizer, DiagnosticHook, HighlighterSource, Selection, colorize};
pub use config::{COLORIZE_ENV, ColorizeConfig, ConfigError, DIAGNOSTICS_ENV, FLAVOR_ENV};
pub use fence::{FencedBlock, parse_fence};
pub use flavor::Flavor;
pub use render::{render, strip_ansi};
pub use style::{StyleEntry, StyleTable};
