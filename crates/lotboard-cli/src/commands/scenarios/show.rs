use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tabwriter::TabWriter;

use lotboard_cli::common::{write_csv, write_json, write_jsonl, OutputFormat};
use lotboard_cli::FileStore;
use lotboard_core::{ScenarioEntry, ScenarioStore};

#[derive(Debug, Serialize)]
struct EntryRow {
    id: i64,
    likelihood: String,
    year: String,
    order: i64,
    moved: bool,
    capacity_mw: Option<f64>,
}

impl From<&ScenarioEntry> for EntryRow {
    fn from(entry: &ScenarioEntry) -> Self {
        Self {
            id: entry.id.value(),
            likelihood: entry.likelihood.as_str().to_string(),
            year: entry.target_year.clone(),
            order: entry.order,
            moved: entry.is_moved,
            capacity_mw: entry.capacity.map(|mw| mw.value()),
        }
    }
}

pub fn handle(scenarios: &ScenarioStore<FileStore>, name: &str, format: OutputFormat) -> Result<()> {
    let entries = scenarios.show(name)?;
    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "ID\tLIKELIHOOD\tYEAR\tORDER\tMOVED\tCAPACITY (MW)")?;
            for row in entries.iter().map(EntryRow::from) {
                let capacity = row
                    .capacity_mw
                    .map_or_else(|| "-".to_string(), |mw| mw.to_string());
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    row.id, row.likelihood, row.year, row.order, row.moved, capacity
                )?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(&entries, &mut io::stdout(), true)?,
        OutputFormat::Jsonl => write_jsonl(&entries, &mut io::stdout())?,
        OutputFormat::Csv => {
            let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
            write_csv(&rows, io::stdout())?;
        }
    }
    Ok(())
}
