//! LumenPlan CLI - Bridge interface for presentation layers
//!
//! Commands: calculate, layout, uf
//! Outputs JSON to stdout, logs to stderr (RUST_LOG)
//! Returns 2 on validation failure, 1 on malformed input

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use lumenplan_core::{
    plan, summarize, utilization::STANDARD_TABLE, CalculationPipeline, CalculationRequest,
    PipelineError, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "lumenplan-cli")]
#[command(about = "LumenPlan CLI - Illuminance and Luminaire Layout Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full calculation
    Calculate {
        /// JSON payload (CalculationRequest)
        #[arg(short, long, conflicts_with = "file")]
        payload: Option<String>,

        /// Path to a JSON file holding the CalculationRequest
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print a plain-text summary instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Plan a luminaire layout for a room footprint
    Layout {
        #[arg(short, long)]
        length: f64,

        #[arg(short, long)]
        width: f64,

        #[arg(short, long)]
        count: u32,
    },

    /// Look up a utilization factor
    Uf {
        #[arg(short = 'k', long)]
        room_index: f64,

        #[arg(short, long)]
        ceiling: f64,

        #[arg(short, long)]
        wall: f64,
    },
}

fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to serialize output: {}"}}"#, e);
            ExitCode::FAILURE
        }
    }
}

fn error_output(e: &PipelineError) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": e.to_string(),
    })
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate { payload, file, text } => {
            let request = match (payload, file) {
                (Some(json), _) => CalculationRequest::from_json(&json),
                (None, Some(path)) => CalculationRequest::from_json_file(&path),
                (None, None) => {
                    println!(r#"{{"success": false, "error": "Provide --payload or --file"}}"#);
                    return ExitCode::FAILURE;
                }
            };

            let request = match request {
                Ok(r) => r,
                Err(e) => {
                    emit(&error_output(&e));
                    return ExitCode::FAILURE;
                }
            };

            match CalculationPipeline::new().calculate(&request) {
                Ok(calculation) if text => {
                    print!("{}", summarize(&calculation));
                    ExitCode::SUCCESS
                }
                Ok(calculation) => emit(&serde_json::json!({
                    "success": true,
                    "engineVersion": ENGINE_VERSION,
                    "calculation": calculation,
                    "positions": calculation.layout.as_ref().map(|l| l.positions()),
                    "summary": summarize(&calculation),
                })),
                Err(e) => {
                    emit(&error_output(&e));
                    ExitCode::from(2) // Validation failure
                }
            }
        }

        Commands::Layout { length, width, count } => {
            let layout = plan(length, width, count);
            emit(&serde_json::json!({
                "layout": layout,
                "description": layout.describe(),
                "positions": layout.positions(),
            }))
        }

        Commands::Uf { room_index, ceiling, wall } => {
            emit(&STANDARD_TABLE.lookup(room_index, ceiling, wall))
        }
    }
}
