use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

pub mod analysis;
pub mod bill;
pub mod config;
pub mod data;
pub mod report;

use analysis::daily::DailySpendSeries;
use analysis::ranking::CounterpartyRanking;
use analysis::Chart;
use bill::ParseError;
use config::{ConfigError, Settings};
use report::{RenderError, ReportFormat, TemplateSet};

#[derive(Debug, Error)]
#[error("cannot read {path}: {source}")]
pub struct FileReadError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

pub(crate) fn read_text(path: &Path) -> Result<String, FileReadError> {
    fs::read_to_string(path).map_err(|source| FileReadError {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("configuration: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("{0}")]
    FileRead(#[from] FileReadError),
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
    #[error("render: {0}")]
    Render(#[from] RenderError),
}

/// Reads the bill at `source`, aggregates its spend and writes the report.
///
/// Returns the path the report was written to.
pub fn generate_report(source: &Path, destination: &str, settings: &Settings) -> Result<PathBuf, ReportError> {
    info!("reading bill {}", source.display());
    let text = read_text(source)?;
    let bill = data::read_bill(&text, &settings.cells)?;

    info!("calculating spend per day");
    let daily = DailySpendSeries::from_transactions(bill.transactions(), settings.report.day_order)?;

    info!("calculating top {} counterparties", settings.report.top_n);
    let ranking = CounterpartyRanking::from_transactions(bill.transactions(), settings.report.top_n)?;

    info!("rendering report from {}", settings.report.template_dir.display());
    let templates = TemplateSet::load(&settings.report.template_dir)?;
    let charts = [Chart::from(daily), Chart::from(ranking)];
    let page = templates.render(bill.header(), &charts)?;

    let path = report::resolve_destination(destination);
    report::write_report(&path, &page)?;
    info!("report written to {}", path.display());

    Ok(path)
}
