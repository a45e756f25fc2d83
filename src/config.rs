use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "LEDGER_REPORT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/config.ini";
pub const DEFAULT_TEMPLATE_DIR: &str = "template";
pub const DEFAULT_TOP_N: usize = 10;

const CELL_SECTION: &str = "csv";
const REPORT_SECTION: &str = "report";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("missing [{0}] section")]
    MissingSection(&'static str),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Sections = HashMap<String, HashMap<String, String>>;

/// Parses INI-style text into `section -> (key -> value)`.
///
/// Keys are lower-cased, values are kept as written minus surrounding
/// whitespace. Lines starting with `#` or `;` are comments.
pub fn parse_sections(text: &str) -> Result<Sections, ConfigError> {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or_else(|| ConfigError::Malformed {
                line: line_no,
                reason: "unterminated section header".to_string(),
            })?;
            let name = name.trim().to_string();
            if sections.contains_key(&name) {
                return Err(ConfigError::Malformed {
                    line: line_no,
                    reason: format!("duplicate section [{}]", name),
                });
            }
            sections.insert(name.clone(), HashMap::new());
            current = Some(name);
            continue;
        }

        let section = current.as_ref().ok_or_else(|| ConfigError::Malformed {
            line: line_no,
            reason: "option outside of any section".to_string(),
        })?;

        let split_at = line.find(['=', ':']).ok_or_else(|| ConfigError::Malformed {
            line: line_no,
            reason: "expected `key = value`".to_string(),
        })?;
        let key = line[..split_at].trim().to_lowercase();
        let value = line[split_at + 1..].trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::Malformed {
                line: line_no,
                reason: "empty key".to_string(),
            });
        }

        let options = sections.entry(section.clone()).or_default();
        if options.insert(key.clone(), value).is_some() {
            return Err(ConfigError::Malformed {
                line: line_no,
                reason: format!("duplicate option {} in [{}]", key, section),
            });
        }
    }

    Ok(sections)
}

/// Lookup table from a `"col,row"` header coordinate to a field name.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    cells: HashMap<String, String>,
}

impl ConfigMap {
    pub fn new(cells: HashMap<String, String>) -> ConfigMap {
        ConfigMap { cells }
    }

    pub fn field_at(&self, col: usize, row: usize) -> Option<&str> {
        self.cells.get(&format!("{},{}", col, row)).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ConfigMap::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayOrder {
    /// Dates appear in the order they are first seen in the ledger.
    #[default]
    FirstSeen,
    Chronological,
}

impl FromStr for DayOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_seen" => Ok(DayOrder::FirstSeen),
            "chronological" => Ok(DayOrder::Chronological),
            _ => Err(ConfigError::InvalidValue {
                key: "day_order",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub top_n: usize,
    pub day_order: DayOrder,
    pub template_dir: PathBuf,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            top_n: DEFAULT_TOP_N,
            day_order: DayOrder::default(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
        }
    }
}

impl ReportOptions {
    fn from_section(options: Option<&HashMap<String, String>>) -> Result<ReportOptions, ConfigError> {
        let mut report = ReportOptions::default();
        let Some(options) = options else {
            return Ok(report);
        };

        if let Some(value) = options.get("top_n") {
            report.top_n = match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "top_n",
                        value: value.clone(),
                    })
                },
            };
        }
        if let Some(value) = options.get("day_order") {
            report.day_order = value.parse()?;
        }
        if let Some(value) = options.get("template_dir") {
            report.template_dir = PathBuf::from(value);
        }

        Ok(report)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub cells: ConfigMap,
    pub report: ReportOptions,
}

impl Settings {
    /// Loads from `$LEDGER_REPORT_CONFIG`, falling back to `config/config.ini`.
    pub fn from_env() -> Result<Settings, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Settings::load(&path)
    }

    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        debug!("loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Settings::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Settings, ConfigError> {
        let mut sections = parse_sections(text)?;
        let cells = sections
            .remove(CELL_SECTION)
            .ok_or(ConfigError::MissingSection(CELL_SECTION))?;
        let report = ReportOptions::from_section(sections.get(REPORT_SECTION))?;

        Ok(Settings {
            cells: ConfigMap::new(cells),
            report,
        })
    }
}
