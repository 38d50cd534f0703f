//! Conversion of untyped feed rows into typed records.
//!
//! Both feeds come from spreadsheet exports, so a cell may arrive as a string,
//! a number or nothing at all. Rows are first deserialized leniently into
//! [`RawProjectRow`] (every cell becomes an optional string) and then converted
//! into [`Project`] records, collecting [`FeedDiagnostics`] along the way.
//!
//! Conversion rules:
//! - `Capacity (MW)` and `Tariff` drop comma grouping (`"1,200.5"`) and keep
//!   the leading number of the cell, so `"120 MW"` reads as `120`. A
//!   non-empty cell with no leading finite number becomes `0` and is reported
//!   as a warning; an empty cell becomes `0` silently.
//! - `GEA Lot Year` is trimmed and contributes its first four characters as
//!   the target year.
//! - Rows whose `Likelihood` is not one of the configured buckets are dropped.
//! - Rows with a non-integer or repeated `ID` are skipped and reported.
//! - A project's initial `order` is its row index in the feed.
//!
//! JSON feeds are arrays of objects keyed by the column headers; CSV feeds
//! carry the same headers in their first row.

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::diagnostics::FeedDiagnostics;
use crate::error::BoardResult;
use crate::project::{BidderStatus, Likelihood, Project, ProjectId};
use crate::requirement::Requirement;
use crate::units::Megawatts;

/// A spreadsheet cell of any scalar type.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    fn into_string(self) -> String {
        match self {
            Cell::Str(s) => s,
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Deserialize any scalar cell as a string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Cell::deserialize(deserializer).map(Cell::into_string)
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Cell>::deserialize(deserializer)?.map(Cell::into_string))
}

/// One row of the project feed, before conversion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProjectRow {
    #[serde(rename = "ID", default, deserialize_with = "lenient_opt_string")]
    pub id: Option<String>,
    #[serde(rename = "Project Name", default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(rename = "Parent Company", default, deserialize_with = "lenient_opt_string")]
    pub parent_company: Option<String>,
    #[serde(rename = "SPV", default, deserialize_with = "lenient_opt_string")]
    pub spv: Option<String>,
    #[serde(rename = "Capacity (MW)", default, deserialize_with = "lenient_opt_string")]
    pub capacity: Option<String>,
    #[serde(rename = "BESS Cap", default, deserialize_with = "lenient_opt_string")]
    pub bess_cap: Option<String>,
    #[serde(rename = "Subtype", default, deserialize_with = "lenient_opt_string")]
    pub subtype: Option<String>,
    #[serde(rename = "Grid", default, deserialize_with = "lenient_opt_string")]
    pub grid: Option<String>,
    #[serde(rename = "Tariff", default, deserialize_with = "lenient_opt_string")]
    pub tariff: Option<String>,
    #[serde(rename = "Competitiveness", default, deserialize_with = "lenient_opt_string")]
    pub competitiveness: Option<String>,
    #[serde(rename = "Comp. Ranking", default, deserialize_with = "lenient_opt_string")]
    pub comp_ranking: Option<String>,
    #[serde(rename = "Likelihood", default, deserialize_with = "lenient_opt_string")]
    pub likelihood: Option<String>,
    #[serde(rename = "GEA Lot Year", default, deserialize_with = "lenient_opt_string")]
    pub lot_year: Option<String>,
    #[serde(rename = "Looker Link", default, deserialize_with = "lenient_opt_string")]
    pub looker_link: Option<String>,
}

/// Converted project feed.
#[derive(Debug, Clone, Default)]
pub struct ProjectFeed {
    pub projects: Vec<Project>,
    pub diagnostics: FeedDiagnostics,
}

/// Converted requirement feed.
#[derive(Debug, Clone, Default)]
pub struct RequirementFeed {
    pub requirements: Vec<Requirement>,
    pub diagnostics: FeedDiagnostics,
}

/// On-disk feed encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Json,
    Csv,
}

impl FeedFormat {
    /// Pick the format from the file extension; anything but `.csv` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => FeedFormat::Csv,
            _ => FeedFormat::Json,
        }
    }
}

fn trimmed(cell: &Option<String>) -> String {
    cell.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Length of the longest decimal literal at the start of `text`: optional
/// sign, digits with at most one point, then an optional exponent.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

/// Parse a numeric cell: commas are dropped and the leading number is kept.
///
/// Returns `Ok(None)` for an empty cell and `Err(raw)` for a cell that does
/// not start with a finite number.
fn parse_number(cell: Option<&str>) -> Result<Option<f64>, String> {
    let raw = match cell {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(None);
    }
    let prefix = &cleaned[..numeric_prefix_len(cleaned)];
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(raw.to_string()),
    }
}

fn numeric_or_zero(
    cell: Option<&str>,
    column: &str,
    row: usize,
    diagnostics: &mut FeedDiagnostics,
) -> f64 {
    match parse_number(cell) {
        Ok(value) => value.unwrap_or(0.0),
        Err(raw) => {
            diagnostics.add_defaulted(column, &raw, row);
            0.0
        }
    }
}

fn parse_id(cell: Option<&str>) -> Option<i64> {
    let raw = cell?.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i64),
        _ => None,
    }
}

/// Convert raw rows into projects, keeping only the recognized buckets.
pub fn convert_project_rows(rows: Vec<RawProjectRow>, buckets: &[Likelihood]) -> ProjectFeed {
    let mut diagnostics = FeedDiagnostics::new();
    let mut projects = Vec::with_capacity(rows.len());
    let mut seen = HashSet::new();
    diagnostics.stats.rows_read = rows.len();

    for (index, row) in rows.into_iter().enumerate() {
        let line = index + 1;

        let likelihood = Likelihood::new(trimmed(&row.likelihood));
        if !buckets.contains(&likelihood) {
            diagnostics.stats.dropped_rows += 1;
            continue;
        }

        let id = match parse_id(row.id.as_deref()) {
            Some(id) => ProjectId::new(id),
            None => {
                let raw = row.id.as_deref().unwrap_or("");
                diagnostics.add_skipped("identity", &format!("ID '{raw}' is not an integer"), line);
                continue;
            }
        };
        if !seen.insert(id) {
            diagnostics.add_skipped("identity", &format!("duplicate ID {id}"), line);
            continue;
        }

        let capacity =
            numeric_or_zero(row.capacity.as_deref(), "Capacity (MW)", line, &mut diagnostics);
        let tariff = numeric_or_zero(row.tariff.as_deref(), "Tariff", line, &mut diagnostics);
        let target_year: String = trimmed(&row.lot_year).chars().take(4).collect();

        projects.push(Project {
            id,
            name: trimmed(&row.name),
            parent_company: trimmed(&row.parent_company),
            spv: trimmed(&row.spv),
            bess_cap: trimmed(&row.bess_cap),
            subtype: trimmed(&row.subtype),
            grid: trimmed(&row.grid),
            tariff,
            competitiveness: trimmed(&row.competitiveness),
            comp_ranking: trimmed(&row.comp_ranking),
            looker_link: trimmed(&row.looker_link),
            likelihood,
            target_year,
            capacity: Megawatts(capacity),
            order: index as i64,
            is_moved: false,
            bidder_status: BidderStatus::Spillover,
        });
    }

    diagnostics.stats.projects = projects.len();
    if diagnostics.has_issues() {
        warn!("project feed: {}", diagnostics.summary());
        for issue in &diagnostics.issues {
            warn!("  {}", issue);
        }
    }

    ProjectFeed {
        projects,
        diagnostics,
    }
}

/// Parse a JSON array of project rows.
pub fn parse_project_json(text: &str, buckets: &[Likelihood]) -> BoardResult<ProjectFeed> {
    let rows: Vec<RawProjectRow> = serde_json::from_str(text)?;
    Ok(convert_project_rows(rows, buckets))
}

/// Read project rows from CSV with a header row.
pub fn read_project_csv<R: Read>(reader: R, buckets: &[Likelihood]) -> BoardResult<ProjectFeed> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = csv_reader
        .deserialize()
        .collect::<Result<Vec<RawProjectRow>, csv::Error>>()?;
    Ok(convert_project_rows(rows, buckets))
}

fn finish_requirements(requirements: Vec<Requirement>) -> RequirementFeed {
    let mut diagnostics = FeedDiagnostics::new();
    diagnostics.stats.rows_read = requirements.len();
    diagnostics.stats.requirements = requirements.len();
    RequirementFeed {
        requirements,
        diagnostics,
    }
}

/// Parse a JSON array of `{Year, Grid, Subtype, Capacity}` records.
pub fn parse_requirement_json(text: &str) -> BoardResult<RequirementFeed> {
    let requirements: Vec<Requirement> = serde_json::from_str(text)?;
    Ok(finish_requirements(requirements))
}

/// Read requirement records from CSV with a header row.
pub fn read_requirement_csv<R: Read>(reader: R) -> BoardResult<RequirementFeed> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let requirements = csv_reader
        .deserialize()
        .collect::<Result<Vec<Requirement>, csv::Error>>()?;
    Ok(finish_requirements(requirements))
}

/// Load the project feed from a JSON or CSV file.
pub fn load_projects(path: &Path, buckets: &[Likelihood]) -> BoardResult<ProjectFeed> {
    match FeedFormat::from_path(path) {
        FeedFormat::Csv => read_project_csv(fs::File::open(path)?, buckets),
        FeedFormat::Json => parse_project_json(&fs::read_to_string(path)?, buckets),
    }
}

/// Load the requirement feed from a JSON or CSV file.
pub fn load_requirements(path: &Path) -> BoardResult<RequirementFeed> {
    match FeedFormat::from_path(path) {
        FeedFormat::Csv => read_requirement_csv(fs::File::open(path)?),
        FeedFormat::Json => parse_requirement_json(&fs::read_to_string(path)?),
    }
}
