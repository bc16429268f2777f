//! frmt — Forminator entry meta generator
//!
//! Builds the INSERT statements for form entries described in a JSON file.
//!
//! # Usage
//!
//! ```bash
//! # Write a script
//! frmt entries.json -o entries.sql
//!
//! # Print to stdout, skipping invalid entries
//! frmt entries.json --keep-going
//!
//! # Inspect a stored value
//! frmt decode 'a:1:{s:6:"status";s:9:"completed";}'
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use forminator_sql::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "frmt")]
#[command(version)]
#[command(about = "Generate Forminator entry meta INSERT statements", long_about = None)]
#[command(after_help = "EXAMPLES:
    frmt entries.json -o entries.sql
    frmt entries.json --keep-going --table wp2_frmt_form_entry_meta
    frmt decode 'a:2:{s:10:\"first-name\";s:4:\"John\";s:9:\"last-name\";s:3:\"Doe\";}'")]
struct Cli {
    /// JSON file with one submission or an array of submissions
    input: Option<PathBuf>,

    /// Write the script here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validate and report counts without writing anything
    #[arg(short, long)]
    dry_run: bool,

    /// Skip invalid submissions instead of aborting
    #[arg(short, long)]
    keep_going: bool,

    /// Settings file (TOML)
    #[arg(short, long, env = "FRMT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the target table
    #[arg(long)]
    table: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a serialized array value
    Decode {
        /// The stored meta_value
        value: String,
    },
    /// Show the field rule table
    Rules,
    /// Print a sample submission file
    Example,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Decode { value }) => decode_value(value),
        Some(Commands::Rules) => {
            show_rules();
            Ok(())
        }
        Some(Commands::Example) => show_example(),
        None => match &cli.input {
            Some(input) => generate(input, &cli),
            None => {
                println!("{}", "frmt — Forminator entry meta generator".cyan().bold());
                println!();
                println!("Usage: frmt <INPUT.json> [OPTIONS]");
                println!();
                println!("Try: frmt --help");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "forminator_sql=debug"
    } else {
        "forminator_sql=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(input: &Path, cli: &Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(table) = &cli.table {
        settings.table_name = table.clone();
    }
    let composer = Composer::new(settings);

    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let submissions = parse_submissions(&json)?;
    tracing::info!("Loaded {} submission(s) from {}", submissions.len(), input.display());

    let mut script = SqlScript::new(Local::now().naive_local());
    let mut failed = 0usize;

    if cli.keep_going {
        for (submission, result) in submissions.iter().zip(composer.each(&submissions)) {
            match result {
                Ok(statements) => script.push_entry(submission.entry_id, statements),
                Err(e) => {
                    failed += 1;
                    eprintln!("{} {}", "✗".red(), e);
                }
            }
        }
    } else {
        // Validate everything before writing anything
        let mut blocks = Vec::with_capacity(submissions.len());
        for submission in &submissions {
            blocks.push((submission.entry_id, composer.entry_inserts(submission)?));
        }
        for (entry_id, statements) in blocks {
            script.push_entry(entry_id, statements);
        }
    }

    if cli.dry_run {
        println!(
            "{} {} entr(ies), {} statement(s) would be generated",
            "✓".green(),
            script.entry_count().to_string().cyan(),
            script.statement_count().to_string().cyan()
        );
    } else if let Some(path) = &cli.output {
        std::fs::write(path, script.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!(
            "{} Wrote {} statement(s) to {}",
            "✓".green(),
            script.statement_count(),
            path.display().to_string().cyan()
        );
    } else {
        print!("{}", script);
    }

    if failed > 0 {
        anyhow::bail!("{} submission(s) skipped", failed);
    }
    Ok(())
}

fn decode_value(value: &str) -> Result<()> {
    let pairs = parse_array(value)?;
    println!("{} {} pair(s)", "Array:".green().bold(), pairs.len());
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, val) in &pairs {
        println!("  {:width$}  {}", key.cyan(), val.white(), width = width);
    }
    Ok(())
}

fn show_rules() {
    println!("{}", "Forminator Field Rules".cyan().bold());
    println!();
    println!(
        "{:4} {:14} {:24} {}",
        "#".white().bold(),
        "Meta key".white().bold(),
        "Emitted when".white().bold(),
        "Value".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for (i, rule) in FIELD_RULES.iter().enumerate() {
        println!(
            "{:4} {:14} {:24} {}",
            (i + 1).to_string().dimmed(),
            rule.key.cyan().bold(),
            rule.when.describe().yellow(),
            rule.shape.white()
        );
    }
}

fn show_example() -> Result<()> {
    let example = FormSubmission {
        entry_id: 668,
        meta_id_start: 6031,
        first_name: "Xander".to_string(),
        last_name: "Beemer".to_string(),
        email: "xander@example.com".to_string(),
        phone: "+31 6 12345678".to_string(),
        grade: "6 Dan".to_string(),
        dojo_name: "Miko Dojo".to_string(),
        birth_date: "02/03/1973".to_string(),
        gender: "M".to_string(),
        stripe_transaction_id: "pi_3RnbxeBvS0tjVNMi1g2TFBHk".to_string(),
        stripe_amount: "350.00".to_string(),
        currency: forminator_sql::config::DEFAULT_CURRENCY.to_string(),
        party: true,
        t_shirt: true,
        t_shirt_size: Some("L".to_string()),
        ffst_id: Some("M000000".to_string()),
        date_created: None,
    };
    println!("{}", serde_json::to_string_pretty(&[example])?);
    Ok(())
}
