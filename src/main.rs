use anyhow::{Context, Result};
use clap::Parser;
use deckpress::{ExportConfig, LogObserver, MismatchPolicy};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Export a browser-rendered slide deck to one PDF per variant
#[derive(Parser, Debug)]
#[command(name = "deckpress", version, about)]
struct Cli {
    /// Deck markup document (overrides the config file)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving the PDFs
    #[arg(short, long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chrome/Chromium executable to launch
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// warn, fail-closed, retry or retry:<n>
    #[arg(long = "mismatch-policy", value_parser = parse_policy)]
    mismatch_policy: Option<MismatchPolicy>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_policy(s: &str) -> std::result::Result<MismatchPolicy, String> {
    s.parse().map_err(|e: deckpress::Error| e.to_string())
}

impl Cli {
    fn export_config(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ExportConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(chrome) = &self.chrome {
            config.engine.browser_path = Some(chrome.clone());
        }
        if let Some(policy) = self.mismatch_policy {
            config.verify.policy = policy;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "deckpress=debug" } else { "deckpress=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stdout)
        .with_target(false)
        .without_time()
        .init();

    let config = cli.export_config()?;
    let report = deckpress::export_deck(&config, &LogObserver).context("deck export failed")?;

    println!();
    println!("Done. Generated:");
    for (variant, doc) in report.variants.iter().zip(&report.documents) {
        let mismatches = variant.mismatches();
        if mismatches > 0 {
            println!(
                "  {} ({} pages, {} capture mismatch{})",
                doc.path.display(),
                doc.pages,
                mismatches,
                if mismatches == 1 { "" } else { "es" }
            );
        } else {
            println!("  {} ({} pages)", doc.path.display(), doc.pages);
        }
    }
    Ok(())
}
