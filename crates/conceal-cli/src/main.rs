mod cli;
mod commands;

use clap::Parser;
use conceal_core::EmbedOptions;
use env_logger::Env;

use crate::cli::{CliArgs, Commands};

pub type CliResult<T> = conceal_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let options = EmbedOptions {
        progress_interval: args.progress_interval,
    };

    match args.command {
        Commands::Hide(hide) => hide.run(options),
        Commands::Unveil(unveil) => unveil.run(),
        Commands::UnveilRaw(unveil_raw) => unveil_raw.run(),
        Commands::Inspect(inspect) => inspect.run(),
    }
}
