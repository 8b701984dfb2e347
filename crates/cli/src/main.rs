//! # sheetsift-cli
//!
//! Command-line interface for viewing, filtering and exporting spreadsheets.

mod repl;
mod table;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use sheetsift_export::{export_named, ExportFormat, ExportOptions};
use sheetsift_http::{is_remote, WorkbookFetcher};
use sheetsift_sheet::{
    parse_column_list, render_document, workbook_sheet_names, ColumnRef, Combinator, Condition,
    RowFilter, Sheet,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// sheetsift - find the rows with (or without) values in chosen columns
#[derive(Parser)]
#[command(name = "sheetsift")]
#[command(author, version, about = "Filter spreadsheet rows on empty and filled cells", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render a sheet, optionally filtered
    View {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long = "format", value_enum, default_value_t = ViewFormat::Html)]
        format: ViewFormat,
    },

    /// Write a sheet, optionally filtered, to a file
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Target format
        #[arg(long = "to", value_enum, value_name = "FORMAT")]
        to: ExportKind,

        /// File name, without extension
        #[arg(long, value_name = "NAME")]
        name: String,

        /// Directory to write into
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },

    /// List the worksheets of a workbook
    Sheets {
        /// Workbook path or http(s) URL
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Load a sheet and filter it interactively
    Repl {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Spreadsheet, CSV or HTML path, or http(s) URL of a workbook
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Worksheet to read instead of the first
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,
}

#[derive(Args)]
struct FilterArgs {
    /// Primary column letter
    #[arg(long, value_name = "COL")]
    primary: Option<String>,

    /// Columns to check, e.g. "B,C,AA"
    #[arg(long, value_name = "COLS")]
    columns: Option<String>,

    /// How the column checks combine
    #[arg(long, value_enum, default_value_t = CombinatorArg::And)]
    combinator: CombinatorArg,

    /// Check applied to each column
    #[arg(long, value_enum, default_value_t = ConditionArg::Null)]
    condition: ConditionArg,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
enum CombinatorArg {
    /// Every column must pass
    And,
    /// At least one column must pass
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
enum ConditionArg {
    /// Cell is empty
    Null,
    /// Cell has a value
    NotNull,
}

/// Output format for `view`.
#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
enum ViewFormat {
    /// HTML document with the table (default)
    #[default]
    Html,
    /// JSON array of header-keyed records
    Json,
    /// CSV with a header row
    Csv,
}

/// Export target.
#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
enum ExportKind {
    Xlsx,
    Csv,
    Pdf,
    #[value(alias = "jpeg")]
    Jpg,
    Png,
}

impl From<CombinatorArg> for Combinator {
    fn from(arg: CombinatorArg) -> Self {
        match arg {
            CombinatorArg::And => Combinator::All,
            CombinatorArg::Or => Combinator::Any,
        }
    }
}

impl From<ConditionArg> for Condition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::Null => Condition::IsNull,
            ConditionArg::NotNull => Condition::IsNotNull,
        }
    }
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Xlsx => ExportFormat::Xlsx,
            ExportKind::Csv => ExportFormat::Csv,
            ExportKind::Pdf => ExportFormat::Pdf,
            ExportKind::Jpg => ExportFormat::Jpeg,
            ExportKind::Png => ExportFormat::Png,
        }
    }
}

impl FilterArgs {
    /// The requested filter; `None` when no columns were given
    fn to_filter(&self) -> Result<Option<RowFilter>> {
        let Some(columns) = &self.columns else {
            if self.primary.is_some() {
                tracing::warn!("--primary has no effect without --columns");
            }
            return Ok(None);
        };

        let columns = parse_column_list(columns)
            .with_context(|| format!("Invalid column list: '{columns}'"))?;
        let mut filter = RowFilter::new(columns, self.combinator.into(), self.condition.into());
        if let Some(primary) = &self.primary {
            let primary = ColumnRef::parse(primary)
                .with_context(|| format!("Invalid primary column: '{primary}'"))?;
            filter = filter.with_primary(primary);
        }
        Ok(Some(filter))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::View {
            source,
            filter,
            out,
            format,
        } => {
            let sheet = load_filtered(&source, &filter).await?;
            let rendered = render_view(&sheet, format)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("{} {}", "Wrote".green().bold(), path.display());
                }
                None => print!("{rendered}"),
            }
            Ok(())
        }
        Command::Export {
            source,
            filter,
            to,
            name,
            dir,
        } => {
            let sheet = load_filtered(&source, &filter).await?;
            let options = ExportOptions::default().with_title(sheet.name());
            let path = export_named(&sheet, to.into(), &dir, &name, &options)
                .with_context(|| format!("Failed to export {}", source.source))?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Sheets { source } => {
            for (i, name) in list_sheets(&source).await?.iter().enumerate() {
                println!("{:>3}  {name}", i + 1);
            }
            Ok(())
        }
        Command::Repl { source } => {
            let sheet = load_source(&source).await?;
            repl::run_repl(sheet)
        }
    }
}

/// Load a local file or fetch a remote workbook.
async fn load_source(args: &SourceArgs) -> Result<Sheet> {
    let sheet_name = args.sheet.as_deref();
    if is_remote(&args.source) {
        let fetcher = WorkbookFetcher::new()?;
        fetcher
            .fetch_named_sheet(&args.source, sheet_name)
            .await
            .with_context(|| format!("Failed to fetch {}", args.source))
    } else {
        Sheet::load_sheet(&args.source, sheet_name)
            .with_context(|| format!("Failed to load {}", args.source))
    }
}

async fn load_filtered(source: &SourceArgs, filter: &FilterArgs) -> Result<Sheet> {
    let sheet = load_source(source).await?;
    match filter.to_filter()? {
        Some(filter) => {
            let (filtered, outcome) = filter.apply(&sheet)?;
            eprintln!(
                "{} {} of {} rows ({filter})",
                "Matched".green().bold(),
                outcome.matched,
                outcome.total
            );
            Ok(filtered)
        }
        None => Ok(sheet),
    }
}

async fn list_sheets(source: &str) -> Result<Vec<String>> {
    if is_remote(source) {
        let fetcher = WorkbookFetcher::new()?;
        fetcher
            .fetch_sheet_names(source)
            .await
            .with_context(|| format!("Failed to fetch {source}"))
    } else {
        workbook_sheet_names(source).with_context(|| format!("Failed to open {source}"))
    }
}

/// Render a sheet for `view`.
fn render_view(sheet: &Sheet, format: ViewFormat) -> Result<String> {
    Ok(match format {
        ViewFormat::Html => render_document(sheet, sheet.name()),
        ViewFormat::Json => {
            let mut json = sheet.to_json()?;
            json.push('\n');
            json
        }
        ViewFormat::Csv => sheet.to_csv_string()?,
    })
}
