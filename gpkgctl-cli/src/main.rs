//! gpkgctl CLI - GeoPackage schema inspection and record validation
//!
//! This is the main entry point for the gpkgctl command-line tool, which provides:
//! - Schema enumeration (`tables`, `fields`, `domains` subcommands)
//! - Field/domain cross-referencing (`describe` subcommand)
//! - Record validation against a table's schema (`validate` subcommand)
//! - An interactive two-pane schema browser (`browse` subcommand)

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gpkgctl_core::{GeoPackage, GpkgError, SchemaCatalog, TableValidator, ValidateOptions};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod tui;

#[derive(Parser, Debug)]
#[command(
    name = "gpkgctl",
    author,
    version,
    about = "Inspect the schema of a GeoPackage container",
    long_about = "Enumerate tables, fields, and column constraint domains of a GeoPackage, \
                  cross-reference fields to their coded-value domains, validate JSON records \
                  against the schema, and browse it all interactively."
)]
struct Cli {
    /// Only log warnings and errors (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List content tables in the container
    Tables(TablesArgs),
    /// List one table's fields, in container source order
    Fields(FieldsArgs),
    /// List constraint domains, or show one with its rows
    Domains(DomainsArgs),
    /// Show one field's properties and its domain, if any
    Describe(DescribeArgs),
    /// Validate JSON records against a table's schema
    Validate(ValidateArgs),
    /// Browse tables, fields, and domains interactively
    Browse(BrowseArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
struct TablesArgs {
    /// Path to the GeoPackage container
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct FieldsArgs {
    /// Path to the GeoPackage container
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,

    /// Table to list fields for
    #[arg(long, value_name = "NAME")]
    table: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct DomainsArgs {
    /// Path to the GeoPackage container
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,

    /// Show one domain with its rows instead of listing all
    #[arg(value_name = "NAME")]
    name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct DescribeArgs {
    /// Path to the GeoPackage container
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,

    /// Table the field belongs to
    #[arg(long, value_name = "NAME")]
    table: String,

    /// Field to describe
    #[arg(long, value_name = "NAME")]
    field: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Path to the GeoPackage container
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,

    /// Table to validate against
    #[arg(long, value_name = "NAME")]
    table: String,

    /// Input file with a JSON object or array of objects
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Let non-nullable fields with a column default be omitted
    #[arg(long)]
    allow_defaults: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct BrowseArgs {
    /// Path to the GeoPackage container
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn init_tracing(quiet: bool) -> Result<()> {
    let default_filter = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet).ok();

    match cli.command {
        Commands::Tables(args) => run_tables(args).await?,
        Commands::Fields(args) => run_fields(args).await?,
        Commands::Domains(args) => run_domains(args).await?,
        Commands::Describe(args) => run_describe(args).await?,
        Commands::Validate(args) => run_validate(args).await?,
        Commands::Browse(args) => run_browse(args).await?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

/// One-time metadata load; everything downstream is read-only lookups.
async fn load_catalog(db: &Path) -> Result<SchemaCatalog> {
    let gpkg = GeoPackage::open(db)
        .await
        .with_context(|| format!("failed to open container {}", db.display()))?;
    gpkg.load_catalog()
        .await
        .context("failed to load container schema")
}

async fn run_tables(args: TablesArgs) -> Result<()> {
    let catalog = load_catalog(&args.db).await?;
    render::tables(&catalog, args.format)
}

async fn run_fields(args: FieldsArgs) -> Result<()> {
    let catalog = load_catalog(&args.db).await?;
    let table = catalog
        .table(&args.table)
        .ok_or_else(|| GpkgError::table_not_found(&args.table))?;
    render::fields(table, args.format)
}

async fn run_domains(args: DomainsArgs) -> Result<()> {
    let catalog = load_catalog(&args.db).await?;
    match args.name {
        Some(name) => {
            let domain = catalog
                .domain(&name)
                .ok_or_else(|| GpkgError::domain_not_found(&name))?;
            render::domain(domain, args.format)
        }
        None => render::domains(catalog.domains(), args.format),
    }
}

async fn run_describe(args: DescribeArgs) -> Result<()> {
    let catalog = load_catalog(&args.db).await?;
    let detail = catalog
        .describe(&args.table, &args.field)
        .ok_or_else(|| anyhow!("no field {}.{}", args.table, args.field))?;
    render::detail(&detail, args.format)
}

/// One record's validation outcome, for reporting.
#[derive(Debug, Serialize)]
struct RecordReport {
    index: usize,
    issues: Vec<String>,
}

async fn run_validate(args: ValidateArgs) -> Result<()> {
    let catalog = load_catalog(&args.db).await?;
    let validator = TableValidator::with_options(
        &catalog,
        &args.table,
        ValidateOptions {
            allow_defaults: args.allow_defaults,
        },
    )?;

    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    // A single object validates as a one-record batch.
    let records = match parsed {
        serde_json::Value::Array(records) => records,
        other => vec![other],
    };

    let total = records.len();
    let reports: Vec<RecordReport> = records
        .iter()
        .enumerate()
        .map(|(index, record)| RecordReport {
            index,
            issues: validator
                .validate_value(record)
                .iter()
                .map(|issue| issue.to_string())
                .collect(),
        })
        .filter(|report| !report.issues.is_empty())
        .collect();

    render::validation_report(&reports, total, args.format)?;

    if reports.is_empty() {
        info!(records = total, table = %args.table, "all records conform");
        Ok(())
    } else {
        bail!(
            "{} of {} records failed validation against '{}'",
            reports.len(),
            total,
            args.table
        )
    }
}

async fn run_browse(args: BrowseArgs) -> Result<()> {
    let catalog = load_catalog(&args.db).await?;
    tui::run(catalog)
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
