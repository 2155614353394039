//! Joblist CLI - Clean job-listing exports
//!
//! # Main Commands
//!
//! ```bash
//! joblist clean jobs.csv -o clean.csv       # Run the full pipeline
//! joblist clean jobs.csv --reference-date 01-10-2024 --impute-rating
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! joblist parse jobs.csv                    # Just parse CSV to JSON
//! joblist validate clean.json               # Validate cleaned JSON rows
//! joblist columns                           # Show raw and derived columns
//! joblist example-config                    # Show the default configuration
//! ```

use clap::{Parser, Subcommand};
use joblist::logs::LogLevel;
use joblist::{
    clean_csv_file, columns, parse_csv_file_auto, validate_clean_job, write_csv, write_json,
    write_to_path, CleanOptions, ExportFormat, PipelineConfig,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "joblist")]
#[command(about = "Clean raw job-listing exports into an analysis-ready table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: CSV → cleaned table
    Clean {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json or csv (default: from output extension, else json)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reference date for "N days ago" (DD-MM-YYYY)
        #[arg(long)]
        reference_date: Option<String>,

        /// Keep raw columns next to their derived columns
        #[arg(long)]
        keep_raw: bool,

        /// Fill missing ratings with the most frequent rating
        #[arg(long)]
        impute_rating: bool,

        /// Skip validation of cleaned rows
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate cleaned JSON rows against the schema
    Validate {
        /// Input JSON file (array of rows)
        input: PathBuf,
    },

    /// Show the raw columns the pipeline requires and the columns it derives
    Columns,

    /// Show the default configuration
    ExampleConfig,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            format,
            config,
            reference_date,
            keep_raw,
            impute_rating,
            no_validate,
        } => cmd_clean(
            &input,
            output.as_deref(),
            format,
            config.as_deref(),
            reference_date.as_deref(),
            keep_raw,
            impute_rating,
            no_validate,
        ),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Columns => cmd_columns(),

        Commands::ExampleConfig => cmd_example_config(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_clean(
    input: &Path,
    output: Option<&Path>,
    format: Option<ExportFormat>,
    config_path: Option<&Path>,
    reference_date: Option<&str>,
    keep_raw: bool,
    impute_rating: bool,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    // File, then environment, then flags
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    }
    .apply_env()?;
    if let Some(date) = reference_date {
        config = config.with_reference_date_str(date)?;
    }
    config.keep_raw_columns |= keep_raw;
    config.impute_rating_mode |= impute_rating;

    let options = CleanOptions { skip_validation: no_validate };
    let result = clean_csv_file(input, config, options)?;

    if let Some(info) = &result.csv_info {
        eprintln!("   Encoding: {}", info.encoding);
        eprintln!("   Delimiter: '{}'", format_delimiter(info.delimiter));
        eprintln!("   Rows: {}", info.row_count);
    }
    eprintln!("\n⚙️  {}", result.report.summary());
    let warnings = result.log.iter().filter(|e| e.level == LogLevel::Warning).count();
    if warnings > 0 {
        eprintln!("   ⚠️  {} warnings during cleaning", warnings);
    }
    for dropped in result.report.dropped.iter().take(5) {
        let id = dropped.job_id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "?".into());
        eprintln!(
            "   - row {} (job {}): {} {:?}",
            dropped.row,
            id,
            dropped.reason,
            dropped.value.as_deref().unwrap_or("")
        );
    }

    if !no_validate && result.invalid_count > 0 {
        eprintln!("\n✔️  Validation:");
        eprintln!("   ✅ Valid: {}", result.valid_count);
        eprintln!("   ❌ Invalid: {}", result.invalid_count);
        for (i, errors) in result.validation_errors.iter().take(5) {
            eprintln!("\n   Record {}:", i);
            for err in errors.iter().take(3) {
                eprintln!("     - {}", err);
            }
        }
    }

    let format = format
        .or_else(|| output.and_then(ExportFormat::from_path))
        .unwrap_or_default();

    match output {
        Some(path) => {
            write_to_path(&result.table, path, format)?;
            eprintln!("💾 Output written to: {} ({})", path.display(), format);
        }
        None => {
            let stdout = std::io::stdout().lock();
            match format {
                ExportFormat::Json => write_json(&result.table, stdout)?,
                ExportFormat::Csv => write_csv(&result.table, stdout)?,
            }
        }
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}' (auto-detected)", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.table.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.table.len());

    let json = serde_json::to_string_pretty(&result.table.to_json_records())?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records: Vec<Value> = serde_json::from_str(&content)?;

    let mut valid = 0;
    let mut invalid = 0;

    for (i, record) in records.iter().enumerate() {
        match validate_clean_job(record) {
            Ok(()) => valid += 1,
            Err(errors) => {
                invalid += 1;
                if invalid <= 5 {
                    eprintln!("\n❌ Record {} invalid:", i);
                    for err in errors.iter().take(3) {
                        eprintln!("   - {}", err);
                    }
                }
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    println!("Required raw columns:");
    for col in columns::RAW_COLUMNS {
        println!("  {}", col);
    }

    println!("\nDerived columns:");
    for col in [
        columns::MIN_EXPERIENCE,
        columns::MAX_EXPERIENCE,
        columns::MIN_SALARY,
        columns::MAX_SALARY,
        columns::AVERAGE_SALARY,
        columns::DAYS_POSTED_ON,
        columns::DATE_POSTED,
        columns::UG,
        columns::PG,
        columns::DOCTORATE,
    ] {
        println!("  {}", col);
    }
    Ok(())
}

fn cmd_example_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", PipelineConfig::default().to_json()?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
