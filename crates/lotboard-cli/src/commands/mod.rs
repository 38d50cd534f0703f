use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use lotboard_cli::cli::BoardArgs;
use lotboard_cli::FileStore;
use lotboard_core::feed::{load_projects, load_requirements};
use lotboard_core::{Board, BoardCommand, BoardConfig};

pub mod allocate;
pub mod apply;
pub mod completions;
pub mod config;
pub mod scenarios;
pub mod summary;

/// Explicit `--config` file, or the default location when present.
pub fn load_config(path: Option<&Path>) -> Result<BoardConfig> {
    match path {
        Some(path) => BoardConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => BoardConfig::load().context("failed to load default config"),
    }
}

/// `--store`, then the configured store path, then `~/.lotboard/scenarios.json`.
pub fn open_store(flag: Option<&Path>, config: &BoardConfig) -> Result<FileStore> {
    let path = match flag {
        Some(path) => path.to_path_buf(),
        None => config
            .storage
            .resolved_store_path()
            .ok_or_else(|| anyhow!("cannot determine a scenario store path; pass --store"))?,
    };
    Ok(FileStore::new(path))
}

/// Load both feeds in parallel, build the board and apply the command line
/// filter overrides and scenario.
pub fn open_board(args: &BoardArgs, config: &BoardConfig, store: FileStore) -> Result<Board<FileStore>> {
    let ranking = config.board.ranking();
    let (projects, requirements) = rayon::join(
        || load_projects(&args.projects, &ranking),
        || load_requirements(&args.requirements),
    );

    let projects = projects.map(|feed| {
        if feed.diagnostics.has_issues() {
            warn!("{}: {}", args.projects.display(), feed.diagnostics.summary());
        } else {
            info!("{}: {}", args.projects.display(), feed.diagnostics.summary());
        }
        feed.projects
    });
    let requirements = requirements.map(|feed| feed.requirements);

    let mut board = Board::from_feeds(config.clone(), projects, requirements, store)
        .context("failed to initialize board")?;

    if let Some(grid) = &args.grid {
        board.dispatch(BoardCommand::SetGridFilter {
            grid: Some(grid.clone()),
        })?;
    }
    if let Some(subtype) = &args.subtype {
        board.dispatch(BoardCommand::SetSubtypeFilter {
            subtype: Some(subtype.clone()),
        })?;
    }
    if !args.companies.is_empty() {
        board.dispatch(BoardCommand::SetCompanies {
            companies: args.companies.clone(),
        })?;
    }
    if let Some(name) = &args.load {
        board
            .dispatch(BoardCommand::LoadScenario { name: name.clone() })
            .with_context(|| format!("failed to load scenario '{name}'"))?;
    }
    Ok(board)
}
