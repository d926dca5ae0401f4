mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use std::process;

use vsh::config::load_config;
use vsh::shell::{ShellContext, run_command_line};
use vsh::vfs::JsonFileStorage;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dir = std::env::current_dir().context("Failed to read current directory")?;
    let mut config = load_config(&dir, cli.config.as_deref())?;
    if let Some(state) = cli.state {
        config.shell.state_file = Some(state);
    }

    let state_file = config.shell.state_file();
    info!("Using state file {}", state_file.display());
    let mut shell = ShellContext::boot(&config, Box::new(JsonFileStorage::new(state_file)), cli.reset)?;

    match cli.command {
        Some(line) => {
            let (stdout, stderr) = repl::display_streams();
            let code = run_command_line(&line, &mut shell, &stdout, &stderr);
            process::exit(code);
        }
        None => repl::run(shell),
    }
}
