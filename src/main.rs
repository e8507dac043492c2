//! MalTriage - static malware triage pipeline
//!
//! Usage:
//!   maltriage-core analyze suspicious.py
//!   maltriage-core analyze dropper.exe --model-dir ./models --reports-dir ./out
//!   maltriage-core fetch --family AgentTesla --limit 20 --out ./samples

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use maltriage_core::constants;
use maltriage_core::logic::config::TriageConfig;
use maltriage_core::logic::intel::BazaarClient;
use maltriage_core::logic::model::ClassifierContext;
use maltriage_core::logic::pipeline;

#[derive(Parser)]
#[command(name = "maltriage-core")]
#[command(version = constants::APP_VERSION)]
#[command(about = "Static malware triage: feature extraction, family classification, behavior summary")]
struct Cli {
    /// Directory holding model.onnx, pipeline.json and feature_schema.json
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Directory JSON reports are written into
    #[arg(long, global = true)]
    reports_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one sample and write a JSON report
    Analyze {
        /// Path to the sample (.py, .zip, binaries, anything)
        file: PathBuf,
    },
    /// Download family-tagged samples from MalwareBazaar, or list
    /// recent submissions when no family is given
    Fetch {
        /// Family tag to search for (e.g. AgentTesla)
        #[arg(long)]
        family: Option<String>,

        /// Maximum number of samples to download or list
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Destination directory for the downloaded archives
        #[arg(long, default_value = "samples")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = TriageConfig::resolve(cli.model_dir, cli.reports_dir);

    match cli.command {
        Command::Analyze { file } => analyze(&file, &config),
        Command::Fetch { family, limit, out } => fetch(family.as_deref(), limit, &out),
    }
}

fn analyze(file: &Path, config: &TriageConfig) -> Result<()> {
    log::info!(
        "Starting {} v{} (model dir: {})",
        constants::APP_NAME,
        constants::APP_VERSION,
        config.model_dir.display()
    );

    let context = ClassifierContext::load(config);
    if let Some(reason) = context.degraded_reason() {
        eprintln!("[!] Classifier degraded: {}", reason);
    }

    let report = pipeline::analyze_file(file, &context);
    let out_path = report.write_json(&config.reports_dir)?;

    println!(
        "[+] Predicted Malware Family: {} (Confidence: {:.2})",
        report.predicted_family, report.confidence
    );
    println!("[+] Risk Level: {}", report.behavior.risk_level);
    for behavior in &report.behavior.likely_behaviors {
        println!("    - {}", behavior);
    }
    println!("[+] JSON report written to: {}", out_path.display());

    Ok(())
}

fn fetch(family: Option<&str>, limit: usize, out: &Path) -> Result<()> {
    let client = BazaarClient::from_env()?;

    match family {
        Some(family) => {
            eprintln!("[*] Querying MalwareBazaar for '{}'...", family);
            let downloaded = client.fetch_family(family, limit, out)?;
            println!(
                "[+] Downloaded {} sample archive(s) to {}",
                downloaded,
                out.display()
            );
        }
        None => {
            let recent = client.recent_samples()?;
            println!("[+] {} recent submissions", recent.len());
            for sample in recent.iter().take(limit) {
                println!(
                    "    {}  {}",
                    sample.sha256_hash,
                    sample.signature.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
