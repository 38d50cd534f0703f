pub mod cli;
pub mod common;
pub mod store;

pub use cli::{build_cli_command, BoardArgs, Cli, Commands, ConfigCommands, ScenariosCommands};
pub use store::FileStore;
