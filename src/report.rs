use std::fs;
use std::path::{self, Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::analysis::{Chart, ChartData};
use crate::bill::HeaderFields;
use crate::{read_text, FileReadError};

pub const DEFAULT_REPORT_NAME: &str = "wechatBill.html";

pub const PER_DAY_TEMPLATE: &str = "per_day_spend";
pub const TOP_N_TEMPLATE: &str = "top_10_option";
pub const PAGE_TEMPLATE: &str = "template.html";

/// Header fields handed to the page template, in placeholder order.
pub const PAGE_FIELDS: [&str; 5] = ["name", "time", "totalRecord", "income", "pay"];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("header field {0:?} not found in bill")]
    MissingField(&'static str),
    #[error("cannot serialise chart data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write report {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// Text with ordinal `${0}`, `${1}`, ... placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    pub fn new(text: impl Into<String>) -> Template {
        Template(text.into())
    }

    /// Replaces `${i}` with `args[i]`, one placeholder at a time and in order.
    ///
    /// Replacement is plain text: an argument that itself contains `${j}` for a
    /// later `j` gets rewritten by the later pass.
    pub fn substitute<S: AsRef<str>>(&self, args: &[S]) -> String {
        args.iter().enumerate().fold(self.0.clone(), |text, (idx, arg)| {
            text.replace(&format!("${{{}}}", idx), arg.as_ref())
        })
    }
}

/// Turns the bill summary and its charts into the final document.
pub trait ReportFormat {
    fn render(&self, header: &HeaderFields, charts: &[Chart]) -> Result<String, RenderError>;
}

#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub per_day: Template,
    pub top_n: Template,
    pub page: Template,
}

impl TemplateSet {
    pub fn load(dir: &Path) -> Result<TemplateSet, FileReadError> {
        let load = |name: &str| read_text(&dir.join(name)).map(Template::new);

        Ok(TemplateSet {
            per_day: load(PER_DAY_TEMPLATE)?,
            top_n: load(TOP_N_TEMPLATE)?,
            page: load(PAGE_TEMPLATE)?,
        })
    }

    fn fragment(&self, chart: &Chart) -> Result<String, RenderError> {
        let template = match chart {
            Chart::DailySpendSeries(_) => &self.per_day,
            Chart::CounterpartyRanking(_) => &self.top_n,
        };
        Ok(template.substitute(&chart.arguments()?))
    }
}

impl ReportFormat for TemplateSet {
    /// The page receives the [`PAGE_FIELDS`] followed by one rendered fragment per chart.
    fn render(&self, header: &HeaderFields, charts: &[Chart]) -> Result<String, RenderError> {
        let mut args = PAGE_FIELDS
            .iter()
            .map(|&field| header.get(field).map(str::to_string).ok_or(RenderError::MissingField(field)))
            .collect::<Result<Vec<_>, _>>()?;

        for chart in charts {
            args.push(self.fragment(chart)?);
        }

        Ok(self.page.substitute(&args))
    }
}

/// A destination ending in a separator, or naming an existing directory,
/// gets [`DEFAULT_REPORT_NAME`] appended.
pub fn resolve_destination(destination: &str) -> PathBuf {
    let path = PathBuf::from(destination);
    if destination.ends_with(path::is_separator) || path.is_dir() {
        debug!("destination {} is a directory, using {}", destination, DEFAULT_REPORT_NAME);
        return path.join(DEFAULT_REPORT_NAME);
    }
    path
}

pub fn write_report(path: &Path, contents: &str) -> Result<(), RenderError> {
    fs::write(path, contents).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}
