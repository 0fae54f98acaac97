//! Match simulator CLI
//!
//! Runs a match from a JSON request file and writes the JSON response,
//! using the same schema as the library API.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use afl_core::simulate_match_json;

#[derive(Parser)]
#[command(name = "afl_sim")]
#[command(about = "Simulate an AFL match from a JSON request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a match from a request file
    Run {
        /// Input request JSON file path
        #[arg(long)]
        request: PathBuf,

        /// Output response JSON file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Override the request seed
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print the response
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print a ready-to-edit sample request
    Sample,
}

/// Rewrite the seed field of a request document.
fn override_seed(request_json: &str, seed: u64) -> Result<String> {
    let mut value: serde_json::Value =
        serde_json::from_str(request_json).context("request is not valid JSON")?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| anyhow!("request must be a JSON object"))?;
    object.insert("seed".to_string(), serde_json::json!(seed));
    Ok(value.to_string())
}

fn run_match(request: PathBuf, out: Option<PathBuf>, seed: Option<u64>, pretty: bool) -> Result<()> {
    let mut request_json = fs::read_to_string(&request)
        .with_context(|| format!("failed to read {}", request.display()))?;

    if let Some(seed) = seed {
        request_json = override_seed(&request_json, seed)?;
    }

    log::info!("simulating match from {}", request.display());
    let response = simulate_match_json(&request_json).map_err(|e| anyhow!(e))?;

    let output = if pretty {
        let value: serde_json::Value = serde_json::from_str(&response)?;
        serde_json::to_string_pretty(&value)?
    } else {
        response
    };

    match out {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Response written to {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn sample_request() -> String {
    let players: Vec<serde_json::Value> = (0..22)
        .map(|i| {
            serde_json::json!({
                "name": format!("Player {}", i + 1),
                "position": (["DEF", "MID", "RUC", "FWD"][i % 4]),
                "overall": 55 + (i % 6) * 5,
            })
        })
        .collect();
    let request = serde_json::json!({
        "schema_version": 1,
        "seed": 12345,
        "weather": "clear",
        "home_team": { "name": "Home FC", "formation": "standard", "players": players },
        "away_team": { "name": "Away FC", "formation": "press", "players": players },
    });
    serde_json::to_string_pretty(&request).unwrap_or_default()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { request, out, seed, pretty } => run_match(request, out, seed, pretty),
        Commands::Sample => {
            println!("{}", sample_request());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_seed_rewrites_object_requests() {
        let rewritten = override_seed(r#"{"seed": 1, "schema_version": 1}"#, 99).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(value["seed"], 99);
        assert_eq!(value["schema_version"], 1);
    }

    #[test]
    fn test_override_seed_rejects_non_object_requests() {
        let err = override_seed("[1, 2, 3]", 99).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
        assert!(override_seed("{not json", 99).is_err());
    }

    #[test]
    fn test_sample_request_is_a_valid_request() {
        assert!(afl_core::simulate_match_json(&sample_request()).is_ok());
    }
}
