use std::process::ExitCode;

use anyhow::Result;
use args::{Cli, Commands};
use clap::{error::ErrorKind, CommandFactory, Parser};
use shader_cat::{cat, check, uncat, Config};

mod args;

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => error.print()?,
                _ => {
                    log::debug!("{error}");
                    println!("{}", Cli::command().render_usage());
                }
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    let config = cli.config();

    match cli.commands {
        Commands::Cat => cat_subcommand(&config),
        Commands::Uncat => uncat_subcommand(&config),
        Commands::Check => check_subcommand(&config),
    }
}

fn cat_subcommand(config: &Config) -> Result<ExitCode> {
    let expansion = cat(config)?;

    println!(
        "Processed {merged}, inlined {count} files",
        merged = config.merged,
        count = expansion.included.len()
    );

    Ok(ExitCode::SUCCESS)
}

fn uncat_subcommand(config: &Config) -> Result<ExitCode> {
    let collapse = uncat(config)?;

    for name in collapse.names() {
        println!("Processed {name}");
    }

    Ok(ExitCode::SUCCESS)
}

fn check_subcommand(config: &Config) -> Result<ExitCode> {
    let status = check(config)?;

    println!("{merged} is {status}", merged = config.merged);

    if status.is_up_to_date() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
