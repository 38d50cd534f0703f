use std::io::{self, Write};

use anyhow::Result;
use tabwriter::TabWriter;

use lotboard_cli::cli::BoardArgs;
use lotboard_cli::common::{whole_mw, write_json, write_jsonl, OutputFormat};
use lotboard_cli::FileStore;
use lotboard_core::{BoardConfig, BoardView};

use super::open_board;

pub fn handle(
    args: &BoardArgs,
    config: &BoardConfig,
    store: FileStore,
    format: OutputFormat,
) -> Result<()> {
    let mut board = open_board(args, config, store)?;
    let view = board.view()?;
    print_totals(&view, format)
}

/// Per-year header figures. Table and CSV show whole megawatts, the JSON
/// forms carry the exact values.
pub fn print_totals(view: &BoardView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(view),
        OutputFormat::Json => Ok(write_json(&view.totals, &mut io::stdout(), true)?),
        OutputFormat::Jsonl => Ok(write_jsonl(&view.totals, &mut io::stdout())?),
        OutputFormat::Csv => print_csv(view, io::stdout()),
    }
}

fn print_table(view: &BoardView) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    write!(writer, "YEAR\tPROJECTS\tREQUIREMENT (MW)\tCAPACITY (MW)\tREMAINING (MW)")?;
    for section in &view.sections {
        write!(writer, "\t{} (MW)", section.label.to_uppercase())?;
    }
    writeln!(writer)?;
    for totals in &view.totals {
        write!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            totals.year,
            totals.project_count,
            whole_mw(totals.requirement.value()),
            whole_mw(totals.capacity.value()),
            whole_mw(totals.remaining.value()),
        )?;
        for bucket in &totals.buckets {
            write!(writer, "\t{}", whole_mw(bucket.capacity.value()))?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    if let Some(name) = &view.current_scenario {
        println!("Scenario: {name}");
    }
    Ok(())
}

fn print_csv<W: Write>(view: &BoardView, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut header = vec![
        "year".to_string(),
        "projects".to_string(),
        "requirement_mw".to_string(),
        "capacity_mw".to_string(),
        "remaining_mw".to_string(),
    ];
    header.extend(
        view.sections
            .iter()
            .map(|s| format!("{}_mw", s.bucket.as_str().to_lowercase())),
    );
    csv_writer.write_record(&header)?;

    for totals in &view.totals {
        let mut record = vec![
            totals.year.clone(),
            totals.project_count.to_string(),
            whole_mw(totals.requirement.value()).to_string(),
            whole_mw(totals.capacity.value()).to_string(),
            whole_mw(totals.remaining.value()).to_string(),
        ];
        record.extend(
            totals
                .buckets
                .iter()
                .map(|b| whole_mw(b.capacity.value()).to_string()),
        );
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotboard_core::{BucketConfig, Catalog, Project, ProjectFilter, Requirement, RequirementTable};

    #[test]
    fn test_csv_has_bucket_columns() {
        let catalog = Catalog::from_projects(vec![
            Project::new(1, "High", "2026", "Luzon", "Ground mounted", 60.4, 4.0),
            Project::new(2, "Low", "2026", "Luzon", "Ground mounted", 25.0, 3.0),
        ])
        .unwrap();
        let requirements =
            RequirementTable::new(vec![Requirement::new("2026", "Luzon", "Ground mounted", 100.0)]);
        let buckets = vec![
            BucketConfig::new("High", "Bidders"),
            BucketConfig::new("Low", "Non-bidders"),
        ];
        let view = BoardView::build(
            &catalog,
            &requirements,
            &ProjectFilter::default(),
            &buckets,
            None,
        );

        let mut output = Vec::new();
        print_csv(&view, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "year,projects,requirement_mw,capacity_mw,remaining_mw,high_mw,low_mw\n\
             2026,2,100,85,15,60,25\n"
        );
    }
}
