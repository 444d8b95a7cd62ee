mod args;
mod replay;
mod store;

use std::{fmt::Display, process::ExitCode};

use clap::{
    builder::{styling::AnsiColor, Styles},
    Parser, Subcommand,
};
use log::error;

use crate::logger;

use self::args::{LoggerArgs, ReplayArgs};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, propagate_version = true, styles = cli_styles())]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a file of gateway events to an in-memory cache
    Replay(ReplayArgs),
}

impl Command {
    fn logger(&self) -> &LoggerArgs {
        match self {
            Command::Replay(args) => &args.global.logger,
        }
    }
}

pub async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.command.logger());

    let result = match cli.command {
        Command::Replay(args) => replay::main(args).await,
    };

    if let Err(err) = result {
        error!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logger(args: &LoggerArgs) {
    let level = logger::level_from_args(args.verbose, args.quiet);
    logger::init(level);
}

fn print_stat<T: Display>(name: &str, value: T) {
    let style = AnsiColor::Cyan.on_default();
    println!("{style}{name}:{style:#} {value}");
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default())
        .usage(AnsiColor::BrightMagenta.on_default())
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightCyan.on_default())
}
