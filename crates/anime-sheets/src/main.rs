//! anime-sheets CLI application.

use anime_sheets::{combine_sheets_keeping_format, report};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{Config, DataPaths, LogConfig};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine every .xlsx file of a folder into one workbook, one sheet per file
    Merge {
        /// Folder holding the workbooks (defaults to the configured input folder)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Merged workbook path (defaults to the configured output file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a scored anime list from pre-fetched records
    Report {
        /// JSON file with `{ "record": {...}, "user_rating": n }` items
        #[arg(short, long)]
        records: PathBuf,

        /// MyAnimeList user name, used for the default output file name
        #[arg(short, long, default_value = "user")]
        user: String,

        /// Output workbook path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration to the config path
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    shared::logging::init(&LogConfig::from_config(&config, "anime-sheets", args.verbose))?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    let written = run(args.command, &config, &args.config)?;
    info!(output = %written.display(), "Done");

    Ok(())
}

/// Execute one subcommand and return the path of the file it wrote
fn run(command: Command, config: &Config, config_path: &Path) -> Result<PathBuf> {
    match command {
        Command::Merge { input, output } => {
            let input = input.unwrap_or_else(|| config.merge_input_dir());
            let output = output.unwrap_or_else(|| config.merge_output_file());

            info!(
                input = %input.display(),
                output = %output.display(),
                "Merging workbooks"
            );
            combine_sheets_keeping_format(&input, &output).context("Merge failed")?;
            Ok(output)
        }
        Command::Report {
            records,
            user,
            output,
        } => {
            let output =
                output.unwrap_or_else(|| DataPaths::new(config.data_dir()).anime_list(&user));
            let entries = report::load_scored_entries(&records)?;
            let book = report::build_anime_list(&entries)?;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }

            // The file may be held open by a spreadsheet application
            config
                .backoff()
                .retry("save_anime_list", || report::save(&book, &output))?;

            info!(entries = entries.len(), "Anime list saved");
            Ok(output)
        }
        Command::InitConfig { force } => {
            if config_path.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite it",
                    config_path.display()
                );
            }
            Config::default().save(config_path)?;
            Ok(config_path.to_path_buf())
        }
    }
}
