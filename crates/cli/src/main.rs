use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cheatcolor::{ColorizeConfig, Colorizer, Flavor, StyleTable, render};
use cheatcolor_lexer::{GrammarCatalog, GrammarResolver};
use cheatcolor_types::Token;
use clap::Parser;
use tracing::debug;

/// Colorize a cheatsheet for the terminal.
///
/// Colors are only applied when CHEATCOLORS is set (any value) or --force is
/// given. A sheet starting with a ```<language> fence is highlighted with the
/// named grammar when one is known.
#[derive(Debug, Parser)]
#[command(name = "cheatcolor", version)]
struct Cli {
    /// Sheet to read; standard input when omitted.
    path: Option<PathBuf>,
    /// Colorize even when CHEATCOLORS is not set.
    #[arg(long)]
    force: bool,
    /// Bundled grammar/style pair: shell, lines or flags.
    #[arg(long)]
    flavor: Option<Flavor>,
    /// Print the selected grammar and style to stderr.
    #[arg(long)]
    diagnostics: bool,
    /// Print classified tokens as JSON instead of colored text.
    #[arg(long)]
    tokens: bool,
    /// Highlight with this catalog grammar, ignoring fences and flavors.
    #[arg(long, value_name = "NAME")]
    grammar: Option<String>,
    /// List the grammars that fences and --grammar can name.
    #[arg(long)]
    list_grammars: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let catalog = GrammarCatalog::shared();

    if cli.list_grammars {
        let mut stdout = io::stdout().lock();
        for definition in catalog.definitions() {
            writeln!(stdout, "{:<12} {:<28} {}", definition.id, definition.label, definition.aliases.join(", "))?;
        }
        return Ok(());
    }

    let content = read_sheet(cli.path.as_deref())?;
    let config = resolve_config(&cli);
    debug!(?config, bytes = content.len(), "loaded sheet");

    if let Some(name) = cli.grammar.as_deref() {
        let grammar = catalog
            .resolve(name)
            .with_context(|| format!("cannot highlight with grammar '{name}'"))?;
        if cli.tokens {
            return print_tokens(grammar.tokenize(&content));
        }
        if !config.enabled {
            return write_output(&content);
        }
        let style = Flavor::ALL
            .into_iter()
            .find(|flavor| flavor.grammar_id() == grammar.name())
            .map(Flavor::style)
            .unwrap_or_else(StyleTable::default_theme);
        return write_output(&render(grammar.tokenize(&content), &style));
    }

    if cli.tokens {
        let colorizer = Colorizer::new(ColorizeConfig { enabled: true, ..config }, catalog);
        return match colorizer.select(&content) {
            Some(selection) => print_tokens(selection.grammar.tokenize(&selection.content)),
            None => print_tokens(std::iter::empty()),
        };
    }

    let colorizer =
        Colorizer::new(config, catalog).with_diagnostics(|selection| eprintln!("{}", selection.describe()));
    write_output(&colorizer.colorize(&content))
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Environment first, then command-line overrides.
fn resolve_config(cli: &Cli) -> ColorizeConfig {
    let mut config = ColorizeConfig::from_env_or_default();
    if cli.force {
        config.enabled = true;
    }
    if let Some(flavor) = cli.flavor {
        config.flavor = flavor;
    }
    if cli.diagnostics {
        config.diagnostics = true;
    }
    config
}

fn read_sheet(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read sheet {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("failed to read sheet from stdin")?;
            Ok(content)
        }
    }
}

fn print_tokens<'t>(tokens: impl Iterator<Item = Token<'t>>) -> Result<()> {
    let tokens: Vec<Token<'t>> = tokens.collect();
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &tokens)?;
    writeln!(stdout)?;
    Ok(())
}

fn write_output(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cheatcolor::{COLORIZE_ENV, DIAGNOSTICS_ENV, FLAVOR_ENV};

    #[test]
    fn flags_override_environment() {
        temp_env::with_vars([(COLORIZE_ENV, None), (FLAVOR_ENV, Some("lines")), (DIAGNOSTICS_ENV, None::<&str>)], || {
            let cli = Cli::try_parse_from(["cheatcolor", "--force", "--flavor", "flags", "--diagnostics"]).unwrap();
            let config = resolve_config(&cli);
            assert!(config.enabled);
            assert_eq!(config.flavor, Flavor::Flags);
            assert!(config.diagnostics);
        });
    }

    #[test]
    fn environment_applies_without_flags() {
        temp_env::with_vars([(COLORIZE_ENV, None), (FLAVOR_ENV, Some("lines")), (DIAGNOSTICS_ENV, None::<&str>)], || {
            let cli = Cli::try_parse_from(["cheatcolor", "sheet.txt"]).unwrap();
            let config = resolve_config(&cli);
            assert!(!config.enabled);
            assert_eq!(config.flavor, Flavor::Lines);
            assert_eq!(cli.path.as_deref(), Some(Path::new("sheet.txt")));
        });
    }

    #[test]
    fn rejects_unknown_flavor() {
        assert!(Cli::try_parse_from(["cheatcolor", "--flavor", "neon"]).is_err());
    }
}
