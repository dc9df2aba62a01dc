//! `kpi-import` command line
//!
//! Command wiring lives here so it can be driven from tests with an
//! in-memory writer; `main.rs` only sets up logging and the exit code.

#![allow(missing_docs)]

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use kpi_hierarchy::{AttributeTree, ImportRejection, PreparedHierarchy};
use kpi_import::{CellSource, ImportConfig, Importer, InMemoryStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Result of a command that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The grid was refused; the problems have been printed
    Rejected,
}

impl Outcome {
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Rejected => ExitCode::from(1),
        }
    }
}

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Framework grid (.csv, .tsv or .json)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

#[must_use]
pub fn cli() -> Command {
    Command::new("kpi-import")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate and import compliance framework spreadsheets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON import configuration"),
        )
        .arg(
            Arg::new("no-header")
                .long("no-header")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("First row is data, not column headers"),
        )
        .arg(
            Arg::new("fill-merged")
                .long("fill-merged")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Treat blank cells under a value as merged continuations"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a grid and list every problem")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the attribute hierarchy")
                .arg(file_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Dry-run the two-phase insert into an in-memory store")
                .arg(file_arg())
                .arg(json_arg()),
        )
}

/// Matches of the innermost subcommand, where global flags also land
#[must_use]
pub fn leaf_matches(matches: &ArgMatches) -> &ArgMatches {
    matches.subcommand().map_or(matches, |(_, sub)| sub)
}

/// Configuration file first, then flags on top
///
/// # Errors
/// Unreadable or malformed configuration file.
pub fn import_config(args: &ArgMatches) -> anyhow::Result<ImportConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ImportConfig::default(),
    };

    if args.get_flag("no-header") {
        config = config.with_header(false);
    }
    if args.get_flag("fill-merged") {
        config = config.with_fill_merged_cells(true);
    }
    Ok(config)
}

fn load(importer: &Importer, path: &Path) -> anyhow::Result<CellSource> {
    importer
        .load(path)
        .with_context(|| format!("failed to load grid {}", path.display()))
}

fn write_rejection(out: &mut impl Write, rejection: &ImportRejection) -> anyhow::Result<Outcome> {
    writeln!(out, "rejected: {} error(s)", rejection.errors().len())?;
    for message in rejection.messages() {
        writeln!(out, "  - {message}")?;
    }
    Ok(Outcome::Rejected)
}

fn write_warnings(out: &mut impl Write, prepared: &PreparedHierarchy) -> anyhow::Result<()> {
    for warning in prepared.warnings() {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(())
}

/// Execute the parsed command, writing results to `out`
///
/// # Errors
/// Files that cannot be read and store failures. A rejected grid is not an
/// error; it is reported through [`Outcome::Rejected`].
pub fn run(matches: &ArgMatches, out: &mut impl Write) -> anyhow::Result<Outcome> {
    let Some((command, args)) = matches.subcommand() else {
        anyhow::bail!("no command given");
    };
    let importer = Importer::new(import_config(args)?);
    let Some(path) = args.get_one::<PathBuf>("file") else {
        anyhow::bail!("no file given");
    };

    tracing::debug!(command, path = %path.display(), "running");

    match command {
        "check" => {
            let source = load(&importer, path)?;
            match importer.prepare(&source) {
                Ok(prepared) => {
                    write_warnings(out, &prepared)?;
                    writeln!(
                        out,
                        "ok: {} attribute(s) in {} column(s)",
                        prepared.len(),
                        prepared.column_count()
                    )?;
                    Ok(Outcome::Success)
                }
                Err(rejection) => write_rejection(out, &rejection),
            }
        }
        "tree" => {
            let source = load(&importer, path)?;
            let prepared = match importer.prepare(&source) {
                Ok(prepared) => prepared,
                Err(rejection) => return write_rejection(out, &rejection),
            };
            let tree = AttributeTree::from_prepared(&prepared);
            if args.get_flag("json") {
                writeln!(out, "{}", serde_json::to_string_pretty(&tree)?)?;
            } else {
                write_warnings(out, &prepared)?;
                write!(out, "{tree}")?;
            }
            Ok(Outcome::Success)
        }
        "import" => {
            let source = load(&importer, path)?;
            let mut store = InMemoryStore::new();
            let summary = match importer.import(&mut store, &source) {
                Ok(summary) => summary,
                Err(kpi_import::ImportError::Rejected(rejection)) => {
                    return write_rejection(out, &rejection);
                }
                Err(error) => return Err(error).context("import failed"),
            };

            if args.get_flag("json") {
                writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
            } else {
                for warning in &summary.warnings {
                    writeln!(out, "warning: {warning}")?;
                }
                writeln!(
                    out,
                    "imported {} attribute(s) from {} cell(s), {} root(s)",
                    summary.nodes_inserted, summary.cells_read, summary.roots
                )?;
                for (column, count) in &summary.per_column {
                    writeln!(out, "  column {column}: {count}")?;
                }
            }
            Ok(Outcome::Success)
        }
        other => anyhow::bail!("unknown command '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommand() {
        let matches = cli()
            .try_get_matches_from([
                "kpi-import",
                "check",
                "grid.csv",
                "--no-header",
                "--fill-merged",
            ])
            .unwrap();
        let config = import_config(leaf_matches(&matches)).unwrap();
        assert!(!config.has_header);
        assert!(config.fill_merged_cells);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let matches = cli()
            .try_get_matches_from([
                "kpi-import",
                "check",
                "grid.csv",
                "--config",
                "/nonexistent/kpi.json",
            ])
            .unwrap();
        let err = import_config(leaf_matches(&matches)).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn command_is_required() {
        assert!(cli().try_get_matches_from(["kpi-import"]).is_err());
    }
}
