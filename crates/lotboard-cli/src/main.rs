use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

use lotboard_cli::cli::{Cli, Commands};

mod commands;

use crate::commands::{allocate, apply, completions, config, scenarios, summary};

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Allocate {
            board,
            groups,
            format,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(cli.store.as_deref(), &config)?;
            allocate::handle(board, &config, store, *groups, *format)
        }
        Commands::Summary { board, format } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(cli.store.as_deref(), &config)?;
            summary::handle(board, &config, store, *format)
        }
        Commands::Apply {
            board,
            script,
            save,
            overwrite,
            format,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(cli.store.as_deref(), &config)?;
            apply::handle(
                board,
                &config,
                store,
                script,
                save.as_deref(),
                *overwrite,
                *format,
            )
        }
        Commands::Scenarios { command } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(cli.store.as_deref(), &config)?;
            scenarios::handle(command, &config, store)
        }
        Commands::Config { command } => config::handle(command, cli.config.as_deref()),
        Commands::Completions { shell, out } => completions::handle(*shell, out.as_deref()),
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
