//! Colorizer configuration sourced from the process environment.
//!
//! The environment is read once into a [`ColorizeConfig`] value which is then
//! passed explicitly to the colorizer.

use std::env;

use thiserror::Error;
use tracing::warn;

use crate::flavor::Flavor;

/// Presence of this variable (any value, including empty) turns colorizing on.
pub const COLORIZE_ENV: &str = "CHEATCOLORS";

/// Selects the bundled grammar/style pair: `shell`, `lines` or `flags`.
pub const FLAVOR_ENV: &str = "CHEATCOLORS_FLAVOR";

/// Truthy values enable the diagnostic hook.
pub const DIAGNOSTICS_ENV: &str = "CHEATCOLORS_DEBUG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown flavor '{value}' (expected one of: shell, lines, flags)")]
    UnknownFlavor { value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorizeConfig {
    /// When false, colorizing returns its input untouched.
    pub enabled: bool,
    pub flavor: Flavor,
    /// Report which grammar and style were selected.
    pub diagnostics: bool,
}

impl ColorizeConfig {
    /// Colorizing on, shell flavor, no diagnostics.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let flavor = match env::var(FLAVOR_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Flavor::default(),
        };
        Ok(Self::toggles_from_env().with_flavor(flavor))
    }

    /// Like [`ColorizeConfig::from_env`], falling back to the default flavor
    /// when the flavor variable cannot be parsed.
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|error| {
            warn!(%error, variable = FLAVOR_ENV, "ignoring invalid flavor");
            Self::toggles_from_env()
        })
    }

    fn toggles_from_env() -> Self {
        Self {
            enabled: env::var_os(COLORIZE_ENV).is_some(),
            flavor: Flavor::default(),
            diagnostics: env::var(DIAGNOSTICS_ENV).map(|value| is_truthy(value.trim())).unwrap_or(false),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
