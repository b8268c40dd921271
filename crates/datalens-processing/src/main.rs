//! CLI entry point for the dataset explorer.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use datalens_processing::{
    CleaningReport, ColumnRef, NormalizationMethod, ProcessingConfig, UploadSummary, Workbench,
};
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::{debug, info, warn};

/// CLI-compatible normalization method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNormalization {
    /// Rescale to [0, 1]
    Minmax,
    /// Center on the mean, scale by standard deviation
    Zscore,
    /// Divide by the smallest power of ten above the largest magnitude
    Decimal,
}

impl From<CliNormalization> for NormalizationMethod {
    fn from(cli: CliNormalization) -> Self {
        match cli {
            CliNormalization::Minmax => NormalizationMethod::MinMax,
            CliNormalization::Zscore => NormalizationMethod::ZScore,
            CliNormalization::Decimal => NormalizationMethod::DecimalScaling,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Inspect, clean and transform a delimited dataset",
    long_about = "Loads a comma-delimited file, optionally cleans it, and prints the\n\
                  requested statistics.\n\n\
                  EXAMPLES:\n  \
                  # Upload summary only\n  \
                  datalens -i data.csv\n\n  \
                  # Drop incomplete rows, then z-score a column\n  \
                  datalens -i data.csv --drop-missing --normalize zscore --column age\n\n  \
                  # Chi-squared between two columns, as JSON\n  \
                  datalens -i data.csv --chi-squared sex,survived --json"
)]
struct Args {
    /// Path to the CSV file to load
    #[arg(short, long)]
    input: String,

    /// Normalize the column given by --column
    #[arg(long, value_enum)]
    normalize: Option<CliNormalization>,

    /// Equal-width bin the column given by --column into K bins
    #[arg(long, value_name = "K")]
    bins: Option<usize>,

    /// Column for --normalize / --bins (header name or zero-based index)
    #[arg(short, long)]
    column: Option<String>,

    /// Chi-squared statistic between two columns, e.g. `--chi-squared a,b`
    #[arg(long, value_name = "A,B", value_delimiter = ',')]
    chi_squared: Option<Vec<String>>,

    /// Drop rows containing a missing cell before anything else
    #[arg(long)]
    drop_missing: bool,

    /// Drop duplicate rows before anything else
    #[arg(long)]
    drop_duplicates: bool,

    /// Descriptive statistics for every numeric column
    #[arg(long)]
    profile: bool,

    /// Correlation matrix over the numeric columns
    #[arg(long)]
    correlation: bool,

    /// Extra text treated as a missing cell (repeatable, case-insensitive)
    #[arg(long = "missing-marker", value_name = "TEXT")]
    missing_markers: Vec<String>,

    /// Number of rows in the printed preview
    #[arg(long, default_value = "10")]
    preview_rows: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all progress logs; only the final JSON document is written.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }
    if (args.normalize.is_some() || args.bins.is_some()) && args.column.is_none() {
        bail!("--normalize and --bins need --column");
    }

    let config = ProcessingConfig::builder()
        .missing_markers(args.missing_markers.iter().cloned())
        .preview_rows(args.preview_rows)
        .build()
        .context("Invalid configuration")?;
    let bench = Workbench::new(config);

    info!("Loading dataset from: {}", args.input);
    let summary = bench.load_file(&args.input)?;

    let mut report = Map::new();
    let mut cleaning = Vec::new();

    if args.drop_missing {
        cleaning.push(bench.remove_missing_values()?);
    }
    if args.drop_duplicates {
        cleaning.push(bench.remove_duplicates()?);
    }

    let column = args.column.as_deref().map(|c| column_ref(&bench, c));

    if let (Some(method), Some(column)) = (args.normalize, &column) {
        let method = NormalizationMethod::from(method);
        let values = bench
            .normalize(column.clone(), Some(method))
            .with_context(|| format!("{} of column {}", method.display_name(), column))?;
        report.insert(
            "normalized".into(),
            json!({ "column": column.to_string(), "method": method, "values": values }),
        );
    }

    if let (Some(bins), Some(column)) = (args.bins, &column) {
        let values = bench
            .discretize(column.clone(), Some(bins))
            .with_context(|| format!("Binning column {}", column))?;
        report.insert(
            "binned".into(),
            json!({ "column": column.to_string(), "bins": bins, "values": values }),
        );
    }

    if let Some(pair) = &args.chi_squared {
        let [a, b] = pair.as_slice() else {
            bail!("--chi-squared takes exactly two columns");
        };
        let (a, b) = (column_ref(&bench, a), column_ref(&bench, b));
        let result = bench
            .chi_squared(a.clone(), b.clone())
            .with_context(|| format!("Chi-squared of {} and {}", a, b))?;
        report.insert("chi_squared".into(), serde_json::to_value(&result)?);
    }

    if args.profile {
        report.insert("profile".into(), serde_json::to_value(bench.profile()?)?);
    }

    if args.correlation {
        report.insert("correlation".into(), serde_json::to_value(bench.correlation()?)?);
    }

    if args.json {
        let mut doc = Map::new();
        doc.insert("summary".into(), serde_json::to_value(&summary)?);
        doc.insert("cleaning".into(), serde_json::to_value(&cleaning)?);
        doc.extend(report);
        println!("{}", serde_json::to_string_pretty(&Value::Object(doc))?);
    } else {
        print_summary(&summary, &cleaning);
        for (section, value) in &report {
            println!("\n{}", section.to_uppercase());
            println!("{}", "-".repeat(40));
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }

    Ok(())
}

/// Interpret a column argument: a header name wins, otherwise a zero-based
/// index, otherwise a name that will fail lookup with a clear error.
fn column_ref(bench: &Workbench, raw: &str) -> ColumnRef {
    let raw = raw.trim();
    let is_header = bench
        .dataset()
        .map(|ds| ds.column_index(raw).is_some())
        .unwrap_or(false);
    if is_header {
        return ColumnRef::from(raw);
    }
    match raw.parse::<usize>() {
        Ok(index) => {
            debug!("Column argument '{}' treated as an index", raw);
            ColumnRef::Index(index)
        }
        Err(_) => {
            warn!("No column named '{}'", raw);
            ColumnRef::from(raw)
        }
    }
}

/// Print the human-readable upload summary.
///
/// Uses `println!` because this is the primary output of the command, not
/// a log line.
fn print_summary(summary: &UploadSummary, cleaning: &[CleaningReport]) {
    println!("\n{}", "=".repeat(60));
    println!("DATASET: {}", summary.file_name);
    println!("{}", "=".repeat(60));
    println!("  Rows: {}", summary.row_count);
    println!("  Columns: {}", summary.column_count);
    println!("  Numeric: {}", summary.numeric_columns.join(", "));
    println!("  Categorical: {}", summary.categorical_columns.join(", "));

    if !summary.preview.is_empty() {
        println!("\nPREVIEW");
        println!("{}", "-".repeat(40));
        for row in &summary.preview {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            println!("  {}", cells.join(" | "));
        }
    }

    for report in cleaning {
        println!(
            "\n{:?}: removed {} of {} rows ({:.1}%)",
            report.operation,
            report.rows_removed,
            report.rows_before,
            report.rows_removed_percentage()
        );
    }
}
