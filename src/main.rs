//! asset-flow CLI
//!
//! Entry point for the `asset-flow` command-line tool.

use asset_flow::config::{merge_layers, DEFAULT_PROJECT_FILE};
use asset_flow::{logging, File, OutputConfig, ProjectConfig};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Exit code for project file and flow configuration errors.
const EXIT_CONFIG: i32 = 2;

/// Exit code for source resolution errors.
const EXIT_RESOLVE: i32 = 3;

#[derive(Parser)]
#[command(name = "asset-flow")]
#[command(about = "Compile asset blocks into build-step configuration", version)]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate step configuration for one or more files
    Process {
        /// Path to project file (default: asset-flow.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// File descriptions (JSON: { path, dir?, blocks })
        #[arg(long = "file", short = 'f', required = true)]
        files: Vec<PathBuf>,

        /// Existing config(s) to augment, layered in order
        #[arg(long)]
        merge: Vec<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the step writers of the flow
    Steps {
        /// Path to project file (default: asset-flow.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Only show the chain for this block type
        #[arg(long, short = 't')]
        block_type: Option<String>,
    },

    /// Validate the project file
    Check {
        /// Path to project file (default: asset-flow.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Process {
            config,
            files,
            merge,
            output,
        } => run_process(config, &files, &merge, output),
        Commands::Steps { config, block_type } => run_steps(config, block_type),
        Commands::Check { config } => run_check(config),
    }
}

fn run_process(
    config_path: Option<PathBuf>,
    file_paths: &[PathBuf],
    merge_paths: &[PathBuf],
    output: Option<PathBuf>,
) {
    let project = load_project(config_path);
    let writer = match project.config_writer() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    let mut files = Vec::with_capacity(file_paths.len());
    for path in file_paths {
        match File::from_json_file(path) {
            Ok(f) => files.push(f),
            Err(e) => {
                eprintln!("Error loading file description: {}", e);
                process::exit(1);
            }
        }
    }

    let mut config = match load_existing(merge_paths) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading existing config: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = writer.process_all(&files, &mut config) {
        eprintln!("Error: {}", e);
        process::exit(EXIT_RESOLVE);
    }

    let json = match serde_json::to_string_pretty(&config) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, format!("{}\n", json)) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Wrote: {}", path.display());
        }
        None => println!("{}", json),
    }
}

fn run_steps(config_path: Option<PathBuf>, block_type: Option<String>) {
    let project = load_project(config_path);
    let writer = match project.config_writer() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    match block_type {
        Some(block_type) => {
            let steps = writer.step_writers(Some(&block_type));
            if steps.is_empty() {
                println!("No steps configured for block type '{}'.", block_type);
                return;
            }
            for (i, step) in steps.iter().enumerate() {
                println!("  {}. {}", i + 1, step.name());
            }
        }
        None => {
            for block_type in writer.flow().block_types() {
                let names: Vec<&str> = writer
                    .flow()
                    .steps_for(block_type)
                    .iter()
                    .map(|s| s.name())
                    .collect();
                println!("  {}: {}", block_type, names.join(" -> "));
            }
            let all: Vec<String> = writer
                .step_writers(None)
                .iter()
                .map(|s| s.name().to_string())
                .collect();
            println!();
            println!("  All steps: {}", all.join(", "));
        }
    }
}

fn run_check(config_path: Option<PathBuf>) {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE));
    let project = load_project(Some(path.clone()));

    let flow = match project.flow() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    println!("Configuration valid: {}", path.display());
    println!();
    let roots: Vec<String> = project
        .paths
        .roots()
        .iter()
        .map(|r| r.display().to_string())
        .collect();
    if !roots.is_empty() {
        println!("  Roots: {}", roots.join(", "));
    }
    println!("  Dest: {}", project.paths.dest.display());
    println!("  Staging: {}", project.paths.staging.display());
    println!("  Warn missing: {}", project.behavior.warn_missing);
    println!("  Block types: {}", flow.block_types().count());
}

fn load_project(config_path: Option<PathBuf>) -> ProjectConfig {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE));
    match ProjectConfig::from_file(&path) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            process::exit(EXIT_CONFIG);
        }
    }
}

fn load_existing(paths: &[PathBuf]) -> Result<OutputConfig, String> {
    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        layers.push(read_json(path)?);
    }
    match merge_layers(layers) {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(OutputConfig::new()),
        _ => Err("existing config must be a JSON object".to_string()),
    }
}

fn read_json(path: &Path) -> Result<Value, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("{}: {}", path.display(), e))
}
