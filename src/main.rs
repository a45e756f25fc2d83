use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::Env;
use log::error;

use ledger_report::config::Settings;
use ledger_report::generate_report;

fn run(source: &str, destination: &str) -> Result<()> {
    let settings = Settings::from_env().context("failed to load settings")?;
    generate_report(Path::new(source), destination, &settings).context("failed to generate report")?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: cargo run -- <bill_csv> <report_path>");
        std::process::exit(1);
    }

    if let Err(err) = run(&args[1], &args[2]) {
        error!("report generation failed: {:#}", err);
        error!("{:?}", err);
        std::process::exit(1);
    }
}
