//! resloc - resolve named resources to URLs.

mod cli;

use std::io::stdout;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use resloc::{ResolverConfig, debug, logger};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ResolverConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_env(|key| std::env::var_os(key))
        .with_home(cli.home.as_deref());

    let resolver = config.build_resolver();
    debug!("config"; "{:?}", resolver);

    cli::run(&cli, &resolver, &mut stdout().lock())
}
