use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use lotboard_cli::cli::BoardArgs;
use lotboard_cli::common::OutputFormat;
use lotboard_cli::FileStore;
use lotboard_core::{BoardCommand, BoardConfig};

use super::{open_board, summary};

pub fn handle(
    args: &BoardArgs,
    config: &BoardConfig,
    store: FileStore,
    script: &Path,
    save: Option<&str>,
    overwrite: bool,
    format: OutputFormat,
) -> Result<()> {
    let contents = fs::read_to_string(script)
        .with_context(|| format!("reading command script {}", script.display()))?;
    let commands: Vec<BoardCommand> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing command script {}", script.display()))?;

    let mut board = open_board(args, config, store)?;
    let mut view = board.view()?;
    for (index, command) in commands.into_iter().enumerate() {
        info!(step = index + 1, ?command, "applying");
        view = board
            .dispatch(command)
            .with_context(|| format!("command #{} failed", index + 1))?;
    }

    if let Some(name) = save {
        view = board
            .dispatch(BoardCommand::SaveScenario {
                name: name.to_string(),
                overwrite,
            })
            .with_context(|| format!("saving scenario '{name}'"))?;
        info!(scenario = name, "scenario saved");
    }

    summary::print_totals(&view, format)
}
