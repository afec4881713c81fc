mod cli;
mod command;
mod config;
mod error;

use error::WrapErr;

use clap::CommandFactory;
use clap::Parser;
use tracing::Level;

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> error::Result<()> {
    color_eyre::install()?;
    let command_line = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(command_line.verbose))
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::Config::load().wrap_err("Load configuration error")?;

    if let Some(command) = command_line.command {
        let cmd: Box<dyn command::Command> = match command {
            cli::Commands::Search(args) => Box::new(command::SearchCommand::new(cfg, args)),
            cli::Commands::Version { host } => Box::new(command::VersionCommand::new(cfg, host)),
        };
        cmd.execute()?;
    } else {
        cli::Cli::command().print_help()?;
    }

    Ok(())
}
