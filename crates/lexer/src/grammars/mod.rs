//! Built-in rule tables.

pub mod flags;
pub mod json;
pub mod lines;
pub mod shell;
pub mod text;

pub use flags::CHEAT_FLAGS;
pub use json::JSON;
pub use lines::CHEAT_LINES;
pub use shell::{BASH, CHEAT};
pub use text::TEXT;
