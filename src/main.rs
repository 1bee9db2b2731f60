use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use lnka::cli::Cli;
use lnka::commands::link::{self, TerminalInteraction};
use lnka::config::{Config, validator::ConfigValidator};
use lnka::error::SelectError;
use lnka::output::{self, Verbosity};
use lnka::{LnkaContext, logging};
use std::io;
use std::process;

fn main() {
    if let Err(e) = run() {
        let aborted = e
            .chain()
            .any(|cause| cause.downcast_ref::<SelectError>().is_some_and(SelectError::is_abort));
        if !aborted {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    logging::init(cli.debug.as_deref())?;

    if cli.quiet {
        output::set_verbosity(Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(Verbosity::Verbose);
    }

    let config = match Config::default_path() {
        Some(path) => {
            if let Err(e) = ConfigValidator::new().validate_config_file(&path) {
                output::warning(&format!("Warning: Configuration validation failed: {e}"));
            }
            Config::load(&path)?
        }
        None => Config::default(),
    };

    let (Some(source), Some(target)) = (cli.source, cli.target) else {
        // clap enforces both unless --completions was given
        anyhow::bail!("SOURCE and TARGET are required");
    };
    let ctx = LnkaContext::new(source, target, cli.title, config)
        .context("Configuration error")?;

    let mut interaction = TerminalInteraction::new(&ctx.config);
    link::execute(&ctx, &mut interaction)?;
    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
