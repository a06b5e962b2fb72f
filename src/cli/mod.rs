//! Command-line interface
//!
//! Runs the training pipeline, scores single records, validates CSV
//! partitions against the schema and starts the prediction server.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::data;
use crate::inference::{MentalHealthRecord, Predictor};
use crate::pipeline::{PipelineRun, PipelineState, TrainPipeline};
use crate::server::{run_server, ServerConfig};
use crate::storage::LocalObjectStore;
use crate::validation::SchemaValidator;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString { s.truecolor(100, 210, 120) }
fn bad(s: &str) -> ColoredString { s.truecolor(235, 110, 100) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<20} {}", muted(key), val.white());
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_fail(msg: &str) {
    println!("  {} {}", bad("✗"), msg);
}

// ─── Commands ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "mindscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mental-health risk pipeline: train, evaluate, promote and serve")]
#[command(long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML); environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the training pipeline end to end
    Train {
        /// Directory holding `<collection>.csv`; overrides the config
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Score one survey record (JSON) with the production model
    Predict {
        /// Path to the JSON record
        #[arg(short, long)]
        record: PathBuf,
    },

    /// Check train/test CSV files against the dataset schema
    Validate {
        #[arg(long)]
        train: PathBuf,

        #[arg(long)]
        test: PathBuf,
    },

    /// Start the prediction server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,
    },
}

pub fn cmd_train(config_path: Option<&Path>, source: Option<&Path>) -> anyhow::Result<PipelineRun> {
    section("Train");

    let mut config = PipelineConfig::resolve(config_path)?;
    if let Some(dir) = source {
        config = config.with_source_dir(dir);
    }

    let start = Instant::now();
    let pipeline = TrainPipeline::from_config(config)?;
    let run = match pipeline.run() {
        Ok(run) => run,
        Err(e) => {
            let stage = e.stage().map(|s| s.to_string()).unwrap_or_else(|| "setup".to_string());
            step_fail(&format!("{} failed", stage));
            return Err(e.into());
        }
    };

    step_ok(&format!("Run finished in {:.2?}", start.elapsed()));
    kv("Run directory", &run.run_dir.display().to_string());
    kv("Train accuracy", &format!("{:.4}", run.trainer.metrics.train.accuracy));
    kv("Test accuracy", &format!("{:.4}", run.trainer.metrics.test.accuracy));
    kv("Test F1", &format!("{:.4}", run.trainer.metrics.test.f1_score));
    if run.evaluation.baseline_present {
        kv("Production F1", &format!("{:.4}", run.evaluation.baseline_score));
    } else {
        kv("Production F1", "none (cold start)");
    }
    kv("Delta", &format!("{:+.4}", run.evaluation.delta));

    match (&run.state, &run.pusher) {
        (PipelineState::Promoted, Some(pushed)) => {
            step_ok(&format!("Promoted to {}", pushed.published_path.cyan()))
        }
        _ => println!("  {} {}", muted("•"), "Challenger rejected, production model unchanged".yellow()),
    }
    println!();

    Ok(run)
}

pub fn cmd_predict(config_path: Option<&Path>, record_path: &Path) -> anyhow::Result<()> {
    section("Predict");

    let config = PipelineConfig::resolve(config_path)?;
    let content = std::fs::read_to_string(record_path)?;
    let record: MentalHealthRecord = serde_json::from_str(&content)?;

    let store = LocalObjectStore::new(&config.store_root, &config.model_store.bucket_name);
    let predictor = Predictor::from_store(&store, &config.model_store.model_key)?;
    let prediction = predictor.predict(&record)?;

    let risk = if prediction.label == 1 {
        prediction.risk.as_str().red().bold()
    } else {
        prediction.risk.as_str().green().bold()
    };
    println!("  {:<20} {}", muted("Risk"), risk);
    kv("Probability", &format!("{:.4}", prediction.probability));
    kv("Model", &predictor.model().id.to_string());
    println!();
    Ok(())
}

pub fn cmd_validate(config_path: Option<&Path>, train: &Path, test: &Path) -> anyhow::Result<bool> {
    section("Validate");

    let config = PipelineConfig::resolve(config_path)?;
    let validator = SchemaValidator::new(config.schema()?);
    let report = validator.validate(&data::read_csv(train)?, &data::read_csv(test)?);

    if report.validation_status {
        step_ok("Both partitions match the schema");
    } else {
        step_fail(&report.message);
    }
    println!();
    Ok(report.validation_status)
}

pub async fn cmd_serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let pipeline = PipelineConfig::resolve(config_path)?;
    let mut server = ServerConfig::from_pipeline(&pipeline);
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    section("Serve");
    kv("Address", &format!("http://{}:{}", server.host, server.port));
    kv("Model", &format!("{}/{}", pipeline.model_store.bucket_name, server.model_key));
    println!();

    run_server(server, &pipeline).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_with_global_config() {
        let cli = Cli::try_parse_from(["mindscope", "train", "--source", "data", "--config", "p.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p.yaml")));
        assert!(matches!(cli.command, Commands::Train { source: Some(_) }));
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["mindscope", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: None, host: None }));
    }

    #[test]
    fn test_validate_requires_both_files() {
        assert!(Cli::try_parse_from(["mindscope", "validate", "--train", "a.csv"]).is_err());
    }
}
