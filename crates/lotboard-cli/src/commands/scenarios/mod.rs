use anyhow::Result;
use lotboard_cli::cli::ScenariosCommands;
use lotboard_cli::FileStore;
use lotboard_core::{BoardConfig, ScenarioStore};

pub mod delete;
pub mod list;
pub mod show;

pub fn handle(command: &ScenariosCommands, config: &BoardConfig, store: FileStore) -> Result<()> {
    let scenarios = ScenarioStore::new(store, config.storage.scenario_key.clone());
    match command {
        ScenariosCommands::List { format } => list::handle(scenarios, *format),
        ScenariosCommands::Show { name, format } => show::handle(&scenarios, name, *format),
        ScenariosCommands::Delete { name } => delete::handle(scenarios, name),
    }
}
