#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod cli;
mod commands;

use bootstrap::{App, AppConfig, init_logging};
use clap::Parser;
use cli::Cli;
use commands::Effect;
use std::process;

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.store, cli.user, cli.display_name);
    init_logging(&config.log_filter);

    if let Err(err) = run(&config, cli.command) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(config: &AppConfig, command: cli::Command) -> anyhow::Result<()> {
    let app = App::load(config)?;
    let outcome = commands::execute(app.service(), config.user.as_ref(), command)?;

    if outcome.effect == Effect::Mutated {
        app.save()?;
    }
    if !outcome.output.is_empty() {
        println!("{}", outcome.output.trim_end());
    }
    Ok(())
}
