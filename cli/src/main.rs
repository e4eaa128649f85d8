//! xml2table CLI - flatten XML documents into spreadsheets
//!
//! A command-line tool for converting XML files to XLSX, JSON, or a text preview.

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use xml2table::render::{JsonFormat, TextOptions, XlsxOptions};
use xml2table::{FlattenConfig, RecordMode, Table};

/// Flatten XML documents into tables
#[derive(Parser)]
#[command(
    name = "xml2table",
    version,
    about = "Flatten XML documents into spreadsheets",
    long_about = "xml2table - Flatten arbitrary XML into rectangular tables.\n\n\
                  Repeating elements become rows, nested paths become columns.\n\
                  Output as XLSX, JSON, or a plain text preview."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an XML file to XLSX
    Convert {
        /// Input XML file
        input: PathBuf,

        /// Output file path (default: input with .xlsx extension)
        output: Option<PathBuf>,

        /// Worksheet name
        #[arg(long, default_value = "Sheet1")]
        sheet: String,

        #[command(flatten)]
        flatten: FlattenArgs,
    },

    /// Convert an XML file to JSON
    Json {
        /// Input XML file
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        flatten: FlattenArgs,
    },

    /// Print a text preview of the flattened table
    Preview {
        /// Input XML file
        input: PathBuf,

        /// Maximum rows to show
        #[arg(long, default_value = "100")]
        rows: usize,

        /// Maximum columns to show
        #[arg(long, default_value = "50")]
        columns: usize,

        #[command(flatten)]
        flatten: FlattenArgs,
    },

    /// Show table dimensions and columns
    Info {
        /// Input XML file
        input: PathBuf,

        #[command(flatten)]
        flatten: FlattenArgs,
    },

    /// Show version information
    Version,
}

/// Flattening options shared by every conversion command
#[derive(Args)]
struct FlattenArgs {
    /// Separator between path segments
    #[arg(long, default_value = ".")]
    delimiter: String,

    /// Prefix for attribute columns
    #[arg(long, default_value = "@")]
    attribute_prefix: String,

    /// Ignore attributes
    #[arg(long)]
    no_attributes: bool,

    /// Keep namespace prefixes in column names
    #[arg(long)]
    keep_namespaces: bool,

    /// What counts as a record
    #[arg(long, default_value = "root")]
    records: RecordChoice,
}

/// Record selection
#[derive(Clone, ValueEnum)]
enum RecordChoice {
    /// The whole document is one record
    Root,
    /// Each occurrence of the most frequent root child is a record
    Repeated,
}

impl From<RecordChoice> for RecordMode {
    fn from(choice: RecordChoice) -> Self {
        match choice {
            RecordChoice::Root => RecordMode::Root,
            RecordChoice::Repeated => RecordMode::RepeatedChildren,
        }
    }
}

impl FlattenArgs {
    fn config(self) -> FlattenConfig {
        FlattenConfig::new()
            .with_path_delimiter(self.delimiter)
            .with_attribute_prefix(self.attribute_prefix)
            .with_attributes(!self.no_attributes)
            .with_strip_namespaces(!self.keep_namespaces)
            .with_record_mode(self.records.into())
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            sheet,
            flatten,
        } => {
            let output = output.unwrap_or_else(|| default_output(&input));
            let table = convert(&input, flatten, cli.verbose)?;

            let options = XlsxOptions::new().with_sheet_name(sheet);
            xml2table::render::write_xlsx(&table, &output, &options)?;
            info!("wrote {}", output.display());

            println!(
                "{} Converted {} rows x {} columns: {}",
                "✓".green().bold(),
                table.row_count(),
                table.column_count(),
                output.display()
            );
        }

        Commands::Json {
            input,
            output,
            compact,
            flatten,
        } => {
            let table = convert(&input, flatten, cli.verbose)?;

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = xml2table::render::to_json(&table, format)?;
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to JSON: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Preview {
            input,
            rows,
            columns,
            flatten,
        } => {
            let table = convert(&input, flatten, cli.verbose)?;
            let options = TextOptions::new()
                .with_max_rows(rows)
                .with_max_columns(columns);
            write_output(None, &xml2table::render::to_text(&table, &options))?;
        }

        Commands::Info { input, flatten } => {
            let table = convert(&input, flatten, cli.verbose)?;
            print_info(&input, &table);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Run the pipeline behind a spinner. The spinner stays off in verbose mode
/// so it does not interleave with log lines.
fn convert(
    input: &Path,
    flatten: FlattenArgs,
    verbose: bool,
) -> Result<Table, Box<dyn std::error::Error>> {
    let config = flatten.config();
    debug!("config: {:?}", config);

    let pb = (!verbose).then(|| create_spinner("Flattening XML..."));
    let result = xml2table::convert_file(input, &config);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let table = result?;
    if table.is_empty() {
        println!("{} No data found in {}", "!".yellow().bold(), input.display());
    }
    Ok(table)
}

fn print_info(input: &Path, table: &Table) {
    println!("{}", "Table Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Rows".bold(), table.row_count());
    println!("{}: {}", "Columns".bold(), table.column_count());

    if table.column_count() == 0 {
        return;
    }

    println!("\n{}", "Columns".cyan().bold());
    println!("{}", "─".repeat(40));
    for (column, filled) in table.columns().iter().zip(table.filled_counts()) {
        println!("{} ({}/{})", column, filled, table.row_count());
    }
}

fn print_version() {
    println!("{} {}", "xml2table".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Flatten arbitrary XML documents into rectangular tables");
    println!();
    println!("Output formats: XLSX, JSON, text");
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output(Path::new("data/catalog.xml")),
            PathBuf::from("data/catalog.xlsx")
        );
    }

    #[test]
    fn test_flatten_args_to_config() {
        let cli = Cli::parse_from([
            "xml2table",
            "info",
            "in.xml",
            "--delimiter",
            "/",
            "--no-attributes",
            "--keep-namespaces",
            "--records",
            "repeated",
        ]);
        let Commands::Info { flatten, .. } = cli.command else {
            panic!("expected info command");
        };
        let config = flatten.config();
        assert_eq!(config.path_delimiter, "/");
        assert!(!config.include_attributes);
        assert!(!config.strip_namespaces);
        assert_eq!(config.record_mode, RecordMode::RepeatedChildren);
    }
}
