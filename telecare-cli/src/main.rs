// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Telecare CLI
//!
//! Run the diagnosis engine from the shell and check a deployment's vocabularies and model.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use telecare_core::{DiagnosisResult, SeverityLabel, SymptomObservation};
use telecare_diagnosis::{DiagnosisEngine, EngineStatus};
use telecare_server::config::ServerConfig;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "telecare")]
#[command(about = "Telecare - symptom diagnosis engine", long_about = None)]
struct Cli {
    /// Path to configuration file (TOML, same format as the server)
    #[arg(short, long, env = "TELECARE_CONFIG")]
    config: Option<PathBuf>,

    /// Dense network artifact (overrides config file)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a list of symptoms
    Diagnose {
        /// Symptoms as names or name:severity (mild, moderate, severe)
        #[arg(required = true)]
        symptoms: Vec<String>,
    },

    /// Load vocabularies and model, and report what the engine would run with
    Verify {
        /// Fail unless a model is loaded and matches the vocabularies
        #[arg(long)]
        require_backend: bool,
    },

    /// Print the symptom and condition vocabularies
    Vocabulary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ServerConfig::load(cli.config.clone())?;
    if let Some(model) = &cli.model {
        config.engine.model_path = Some(model.clone());
    }
    if let Commands::Verify {
        require_backend: true,
    } = cli.command
    {
        config.engine.require_backend = true;
    }

    let engine =
        DiagnosisEngine::from_config(&config.engine).context("Failed to load diagnosis engine")?;

    match cli.command {
        Commands::Diagnose { symptoms } => {
            let observations: Vec<SymptomObservation> =
                symptoms.iter().map(|s| parse_observation(s)).collect();
            debug!("Parsed observations: {:?}", observations);

            let results = engine.diagnose(&observations)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&results);
            }
        }

        Commands::Verify { .. } => {
            let status = engine.status();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Vocabulary => {
            let vocabulary = engine.vocabulary();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&VocabularyOutput {
                        symptoms: vocabulary.symptoms.names(),
                        conditions: vocabulary.conditions.labels(),
                    })?
                );
            } else {
                println!("Symptoms ({}):", vocabulary.symptoms.len());
                for (i, name) in vocabulary.symptoms.names().iter().enumerate() {
                    println!("  {:>3}  {}", i, name);
                }
                println!("Conditions ({}):", vocabulary.conditions.len());
                for (i, label) in vocabulary.conditions.labels().iter().enumerate() {
                    println!("  {:>3}  {}", i, label);
                }
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct VocabularyOutput<'a> {
    symptoms: &'a [String],
    conditions: &'a [String],
}

/// Parse `name` or `name:severity`. A suffix that is not a severity label stays part
/// of the name.
fn parse_observation(arg: &str) -> SymptomObservation {
    if let Some((name, severity)) = arg.rsplit_once(':') {
        if let Ok(label) = severity.parse::<SeverityLabel>() {
            return SymptomObservation::rated(name.trim(), label);
        }
    }
    SymptomObservation::named(arg.trim())
}

fn print_results(results: &[DiagnosisResult]) {
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{}. {} (confidence {:.2}, severity {}, via {})",
            rank + 1,
            result.diagnosis,
            result.confidence,
            result.severity.as_str(),
            result.source.as_str()
        );
        for recommendation in &result.recommendations {
            println!("   - {}", recommendation);
        }
        if result.specialist_referral.required {
            println!("   ! Specialist referral required (emergency)");
        }
    }
}

fn print_status(status: &EngineStatus) {
    println!("✓ Symptoms:   {}", status.symptoms);
    println!("✓ Conditions: {}", status.conditions);
    println!("  Encoder:    {}", status.encoder);
    println!("  Top-k:      {}", status.top_k);
    match (&status.backend, &status.backend_unavailable_reason) {
        (Some(name), _) => println!("✓ Model:      {} (verified)", name),
        (None, Some(reason)) => println!("✗ Model:      unavailable ({})", reason),
        (None, None) => println!("✗ Model:      unavailable"),
    }
    for warning in &status.warnings {
        println!("  warning: {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_observation() {
        assert_eq!(parse_observation("fever"), SymptomObservation::named("fever"));
        assert_eq!(
            parse_observation("cough:Severe"),
            SymptomObservation::rated("cough", SeverityLabel::Severe)
        );
        // Not a severity: keep the whole argument as the name
        assert_eq!(
            parse_observation("pain:left side"),
            SymptomObservation::named("pain:left side")
        );
    }
}
