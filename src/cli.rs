use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::paths::PathOverrides;
use crate::commands::action::{self, CatalogActionOptions};
use crate::commands::build::{self, CatalogBuildOptions};
use crate::commands::lookup::{self, CatalogLookup, CatalogLookupOptions};
use crate::commands::{CommandContext, CommandReport, status, tools};

#[derive(Debug, Parser)]
#[command(
    name = "cpg-catalog",
    version,
    about = "Index a project archive into a catalog and look projects up by year or fuzzy name"
)]
struct Cli {
    /// Root directory holding year-bucket folders.
    #[arg(long, global = true, value_name = "PATH")]
    archive_root: Option<PathBuf>,

    /// Catalog file to write (build) or read (lookups).
    #[arg(long = "catalog", global = true, value_name = "PATH")]
    catalog_file: Option<PathBuf>,

    /// Print reports as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct FuzzyArgs {
    /// Project name as remembered; repeat for several.
    #[arg(long = "name", required = true, value_name = "NAME")]
    names: Vec<String>,

    /// Minimum similarity ratio (0..=1) a catalog name must reach.
    #[arg(long)]
    threshold: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rebuild the catalog from the archive.
    Build {
        /// Walk the archive and report counts without writing the catalog.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show configuration and catalog health.
    Status,
    /// Projects filed under a year bucket.
    ByYear {
        #[arg(long)]
        year: String,
    },
    /// Project IDs for approximately matching names.
    Ids(FuzzyArgs),
    /// File manifests for approximately matching names.
    Files(FuzzyArgs),
    /// Run a named agent action with a JSON input object.
    Action {
        /// get_projects_by_year, get_project_ids or get_project_files
        name: String,
        /// JSON input; read from stdin when omitted.
        #[arg(long)]
        data: Option<String>,
    },
    /// Print function-tool definitions for the agent actions.
    Tools,
}

fn emit_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text());
    }
    if !report.ok {
        bail!(
            "{} finished with {} issue(s)",
            report.command,
            report.issues.len()
        );
    }
    Ok(())
}

fn print_rows(rows: String) -> Result<()> {
    println!("{rows}");
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = PathOverrides {
        archive_root: cli.archive_root,
        catalog_file: cli.catalog_file,
    };
    let context = || CommandContext::load(&overrides);

    match cli.command {
        Command::Tools => print_rows(tools::run()?),
        Command::Build { dry_run } => {
            let report = build::run(&context()?, &CatalogBuildOptions { dry_run })?;
            emit_report(&report, cli.json)
        }
        Command::Status => emit_report(&status::run(&context()?)?, cli.json),
        Command::ByYear { year } => print_rows(lookup::run(
            &context()?,
            &CatalogLookupOptions {
                lookup: CatalogLookup::ByYear(year),
                threshold: None,
            },
        )?),
        Command::Ids(args) => print_rows(lookup::run(
            &context()?,
            &CatalogLookupOptions {
                lookup: CatalogLookup::Ids(args.names),
                threshold: args.threshold,
            },
        )?),
        Command::Files(args) => print_rows(lookup::run(
            &context()?,
            &CatalogLookupOptions {
                lookup: CatalogLookup::Files(args.names),
                threshold: args.threshold,
            },
        )?),
        Command::Action { name, data } => print_rows(action::run(
            &context()?,
            &CatalogActionOptions { name, data },
        )?),
    }
}
