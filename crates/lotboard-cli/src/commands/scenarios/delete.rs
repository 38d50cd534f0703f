use anyhow::Result;
use tracing::warn;

use lotboard_cli::FileStore;
use lotboard_core::ScenarioStore;

pub fn handle(mut scenarios: ScenarioStore<FileStore>, name: &str) -> Result<()> {
    if scenarios.delete(name)? {
        println!("Deleted scenario '{name}'");
    } else {
        warn!(scenario = name, "no such scenario");
        println!("No scenario named '{name}'");
    }
    Ok(())
}
