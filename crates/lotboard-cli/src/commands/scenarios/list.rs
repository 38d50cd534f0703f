use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tabwriter::TabWriter;

use lotboard_cli::common::{write_csv, write_json, write_jsonl, OutputFormat};
use lotboard_cli::FileStore;
use lotboard_core::ScenarioStore;

#[derive(Debug, Serialize)]
struct ScenarioRow {
    name: String,
    projects: usize,
    moved: usize,
}

pub fn handle(mut scenarios: ScenarioStore<FileStore>, format: OutputFormat) -> Result<()> {
    let names = scenarios.list()?;
    let all = scenarios.read_all()?;
    let rows: Vec<ScenarioRow> = names
        .into_iter()
        .map(|name| {
            let entries = all.get(&name).map(Vec::as_slice).unwrap_or_default();
            ScenarioRow {
                projects: entries.len(),
                moved: entries.iter().filter(|e| e.is_moved).count(),
                name,
            }
        })
        .collect();

    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "NAME\tPROJECTS\tMOVED")?;
            for row in &rows {
                writeln!(writer, "{}\t{}\t{}", row.name, row.projects, row.moved)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(&rows, &mut io::stdout(), true)?,
        OutputFormat::Jsonl => write_jsonl(&rows, &mut io::stdout())?,
        OutputFormat::Csv => write_csv(&rows, io::stdout())?,
    }
    Ok(())
}
