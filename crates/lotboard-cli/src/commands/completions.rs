use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use clap_complete::{generate, Shell};
use lotboard_cli::build_cli_command;

const BIN_NAME: &str = "lotboard-cli";

pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let mut cmd = build_cli_command();
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        generate(shell, &mut cmd, BIN_NAME, &mut file);
        println!("Wrote {shell:?} completion to {}", path.display());
    } else {
        generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
    }
    Ok(())
}
