use clap::Parser;

use crate::{cli::Cli, error::Result, settings::Settings};

mod cli;
mod commands;
mod convert;
mod error;
mod render;
mod settings;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.global)?;
    settings.apply_args(&cli.global);

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter())
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?settings, "settings loaded");
    commands::run(cli.command, &cli.global, settings)
}
