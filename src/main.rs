//! dokusha-apk-lane CLI
//!
//! Entry point for the `dokusha-apk` command-line tool.

use clap::{Parser, Subcommand};
use dokusha_apk_lane::publish::{FileSink, PublishError};
use dokusha_apk_lane::{
    parse_filename, run_pipeline, scan_artifacts, LaneConfig, MemorySink, ParseOutcome,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "dokusha-apk")]
#[command(about = "APK artifact finishing lane", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename built APKs to their canonical names and publish metadata
    Run {
        /// Output root to scan (default: app/build/outputs/apk)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Environment file to append assignments to (default: $GITHUB_ENV)
        #[arg(long)]
        env_file: Option<PathBuf>,

        /// Path to lane config file (default: .ci/apk-lane.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Compute and print the plan without renaming or publishing
        #[arg(long)]
        dry_run: bool,

        /// Output the run summary in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List candidate artifacts under the output root without touching them
    Scan {
        /// Output root to scan (default: app/build/outputs/apk)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Path to lane config file (default: .ci/apk-lane.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Explain how a filename parses against the artifact grammar
    Parse {
        /// The filename to classify
        filename: String,

        /// Artifact extension to match against (default: .apk)
        #[arg(long, default_value = dokusha_apk_lane::config::DEFAULT_EXTENSION)]
        extension: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            root,
            env_file,
            config,
            dry_run,
            json,
        } => {
            run_run(root, env_file, config, dry_run, json);
        }
        Commands::Scan { root, config, json } => {
            run_scan(root, config, json);
        }
        Commands::Parse {
            filename,
            extension,
            json,
        } => {
            run_parse(&filename, &extension, json);
        }
    }
}

fn load_config(config_path: Option<PathBuf>, root: Option<PathBuf>) -> LaneConfig {
    let mut config = match LaneConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    if let Some(root) = root {
        config.root = root;
    }
    config
}

fn run_run(
    root: Option<PathBuf>,
    env_file: Option<PathBuf>,
    config_path: Option<PathBuf>,
    dry_run: bool,
    json: bool,
) {
    let mut config = load_config(config_path, root);
    if let Some(env_file) = env_file {
        config.env_file = Some(env_file);
    }

    let result = if dry_run {
        // Dry runs never touch the real sink.
        let mut sink = MemorySink::new();
        run_pipeline(&config, &mut sink, true)
    } else {
        let mut sink = match config.env_file.clone().map(FileSink::new).or_else(FileSink::from_env) {
            Some(sink) => sink,
            None => {
                eprintln!("Error: {}", PublishError::SinkUnconfigured);
                process::exit(1);
            }
        };
        run_pipeline(&config, &mut sink, false)
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", summary.to_human());
    }
}

fn run_scan(root: Option<PathBuf>, config_path: Option<PathBuf>, json: bool) {
    let config = load_config(config_path, root);

    let artifacts = match scan_artifacts(&config.root, &config.extension) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(20);
        }
    };

    if json {
        let output: Vec<serde_json::Value> = artifacts
            .iter()
            .map(|a| {
                serde_json::json!({
                    "directory": a.directory,
                    "filename": a.filename,
                    "matches": parse_filename(&a.filename, &config.extension).is_match(),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        if artifacts.is_empty() {
            println!("No candidate artifacts under {}", config.root.display());
            return;
        }

        println!("Candidate artifacts under {}:\n", config.root.display());
        for artifact in &artifacts {
            let marker = if parse_filename(&artifact.filename, &config.extension).is_match() {
                "match"
            } else {
                "no match"
            };
            println!("  {} ({})", artifact.path().display(), marker);
        }
    }
}

fn run_parse(filename: &str, extension: &str, json: bool) {
    match parse_filename(filename, extension) {
        ParseOutcome::Parsed(parsed) => {
            if json {
                let output = serde_json::json!({
                    "matches": true,
                    "base_name": parsed.base_name,
                    "version": parsed.version.dotted(),
                    "flavor": parsed.flavor,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            } else {
                println!("{} matches the artifact grammar", filename);
                println!("  Base name: {}", parsed.base_name);
                println!("  Version: {}", parsed.version);
                println!("  Flavor: {}", parsed.flavor);
            }
            process::exit(0);
        }
        ParseOutcome::NoMatch { filename } => {
            if json {
                let output = serde_json::json!({
                    "matches": false,
                    "filename": filename,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            } else {
                println!("{} does not match the artifact grammar", filename);
            }
            process::exit(1);
        }
    }
}
