use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};

use lotboard_cli::cli::ConfigCommands;
use lotboard_core::BoardConfig;

use super::load_config;

pub fn handle(command: &ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Init { out, force } => init(out.as_deref().or(config_path), *force),
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init(target: Option<&Path>, force: bool) -> Result<()> {
    let path: PathBuf = match target {
        Some(path) => path.to_path_buf(),
        None => BoardConfig::config_path()
            .ok_or_else(|| anyhow!("unable to determine config path; pass --out"))?,
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    BoardConfig::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
