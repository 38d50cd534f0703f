//! Output formats and writers shared across commands.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

/// Output format for tabular/structured data.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable aligned table (default for interactive use)
    #[default]
    Table,
    /// JSON array (pipe-friendly, structured)
    Json,
    /// JSON Lines - one JSON object per line (streaming-friendly)
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
}

/// Write data as JSON to the given writer.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    data: &T,
    writer: &mut W,
    pretty: bool,
) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, data).map_err(io::Error::other)?;
    } else {
        serde_json::to_writer(&mut *writer, data).map_err(io::Error::other)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Write data as JSON Lines (one JSON object per line) to the given writer.
pub fn write_jsonl<W: Write, T: Serialize>(data: &[T], writer: &mut W) -> io::Result<()> {
    for item in data {
        serde_json::to_writer(&mut *writer, item).map_err(io::Error::other)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Write flat records as CSV; the header row comes from the field names.
pub fn write_csv<W: Write, T: Serialize>(data: &[T], writer: W) -> io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for item in data {
        csv_writer.serialize(item).map_err(io::Error::other)?;
    }
    csv_writer.flush()
}

/// Megawatts rounded to whole units, as the board headers show them.
pub fn whole_mw(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        year: &'static str,
        capacity_mw: i64,
    }

    #[test]
    fn test_write_jsonl_to_string() {
        let rows = vec![
            Row { year: "2026", capacity_mw: 165 },
            Row { year: "2027", capacity_mw: 1220 },
        ];
        let mut output = Vec::new();
        write_jsonl(&rows, &mut output).unwrap();
        let result = String::from_utf8(output).unwrap();
        assert_eq!(result.lines().count(), 2);
        assert!(result.contains("\"capacity_mw\":1220"));
    }

    #[test]
    fn test_write_csv_has_header() {
        let rows = vec![Row { year: "2026", capacity_mw: -65 }];
        let mut output = Vec::new();
        write_csv(&rows, &mut output).unwrap();
        let result = String::from_utf8(output).unwrap();
        assert_eq!(result, "year,capacity_mw\n2026,-65\n");
    }

    #[test]
    fn test_whole_mw_rounds() {
        assert_eq!(whole_mw(99.5), 100);
        assert_eq!(whole_mw(-64.6), -65);
    }
}
