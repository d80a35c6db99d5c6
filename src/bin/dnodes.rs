//! Dnodes CLI Binary

use anyhow::Context;
use clap::Parser;
use dnodes::config::ConfigLoader;
use dnodes::logging::init_logging;
use dnodes::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;
    let logging = cli.logging_config(&config.logging);
    init_logging(Some(&logging)).context("initializing logging")?;

    let context = CliContext::with_config(config, cli.store.clone())
        .context("opening dnode store")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
