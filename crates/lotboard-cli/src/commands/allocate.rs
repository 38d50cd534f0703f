use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tabwriter::TabWriter;

use lotboard_cli::cli::BoardArgs;
use lotboard_cli::common::{write_csv, write_json, write_jsonl, OutputFormat};
use lotboard_cli::FileStore;
use lotboard_core::{Board, BoardConfig, GroupOutcome, Project};

use super::open_board;

#[derive(Debug, Serialize)]
struct ProjectRow {
    id: i64,
    name: String,
    company: String,
    year: String,
    grid: String,
    subtype: String,
    likelihood: String,
    capacity_mw: f64,
    tariff: f64,
    status: &'static str,
    order: i64,
    moved: bool,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.value(),
            name: project.name.clone(),
            company: project.parent_company.clone(),
            year: project.target_year.clone(),
            grid: project.grid.clone(),
            subtype: project.subtype.clone(),
            likelihood: project.likelihood.as_str().to_string(),
            capacity_mw: project.capacity.value(),
            tariff: project.tariff,
            status: project.bidder_status.as_str(),
            order: project.order,
            moved: project.is_moved,
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupRow {
    year: String,
    grid: String,
    subtype: String,
    requirement_mw: Option<f64>,
    allocated_mw: f64,
    accepted: usize,
    marginal: usize,
    spillover: usize,
    unranked: usize,
}

impl From<&GroupOutcome> for GroupRow {
    fn from(group: &GroupOutcome) -> Self {
        Self {
            year: group.key.year.clone(),
            grid: group.key.grid.clone(),
            subtype: group.key.subtype.clone(),
            requirement_mw: group.requirement.map(|mw| mw.value()),
            allocated_mw: group.allocated.value(),
            accepted: group.accepted,
            marginal: group.marginal,
            spillover: group.spillover,
            unranked: group.unranked,
        }
    }
}

pub fn handle(
    args: &BoardArgs,
    config: &BoardConfig,
    store: FileStore,
    groups: bool,
    format: OutputFormat,
) -> Result<()> {
    let board = open_board(args, config, store)?;
    if groups {
        let rows: Vec<GroupRow> = board.report().groups.iter().map(GroupRow::from).collect();
        print_groups(&rows, format)
    } else {
        print_projects(&project_rows(&board), format)
    }
}

/// Visible projects in display order.
fn project_rows(board: &Board<FileStore>) -> Vec<ProjectRow> {
    let filter = board.filter();
    let mut visible: Vec<&Project> = board
        .catalog()
        .iter()
        .filter(|p| filter.is_visible(p))
        .collect();
    visible.sort_by_key(|p| p.order);
    visible.into_iter().map(ProjectRow::from).collect()
}

fn print_projects(rows: &[ProjectRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(
                writer,
                "ORDER\tID\tNAME\tCOMPANY\tYEAR\tLIKELIHOOD\tCAPACITY (MW)\tTARIFF\tSTATUS"
            )?;
            for row in rows {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}{}",
                    row.order,
                    row.id,
                    row.name,
                    row.company,
                    row.year,
                    row.likelihood,
                    row.capacity_mw,
                    row.tariff,
                    row.status,
                    if row.moved { " (moved)" } else { "" },
                )?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(rows, &mut io::stdout(), true)?,
        OutputFormat::Jsonl => write_jsonl(rows, &mut io::stdout())?,
        OutputFormat::Csv => write_csv(rows, io::stdout())?,
    }
    Ok(())
}

fn print_groups(rows: &[GroupRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(
                writer,
                "YEAR\tGRID\tSUBTYPE\tREQUIREMENT (MW)\tALLOCATED (MW)\tACCEPTED\tMARGINAL\tSPILLOVER\tUNRANKED"
            )?;
            for row in rows {
                let requirement = row
                    .requirement_mw
                    .map_or_else(|| "-".to_string(), |mw| mw.to_string());
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    row.year,
                    row.grid,
                    row.subtype,
                    requirement,
                    row.allocated_mw,
                    row.accepted,
                    row.marginal,
                    row.spillover,
                    row.unranked,
                )?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(rows, &mut io::stdout(), true)?,
        OutputFormat::Jsonl => write_jsonl(rows, &mut io::stdout())?,
        OutputFormat::Csv => write_csv(rows, io::stdout())?,
    }
    Ok(())
}
