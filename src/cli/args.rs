use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Args};
use humantime::parse_duration;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File of newline-delimited JSON gateway events
    pub file: PathBuf,

    /// List the channels of this guild when finished
    #[arg(short, long, value_name = "ID")]
    pub guild: Option<u64>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Prefix for every store key
    #[arg(short, long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Add latency to every store request
    #[arg(short = 'L', long, value_parser = parse_duration)]
    pub latency: Option<Duration>,

    /// Print stats after completion
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    #[command(flatten)]
    pub logger: LoggerArgs,
}

#[derive(Args, Debug)]
pub struct LoggerArgs {
    /// Print more output
    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub verbose: u8,

    /// Print less output
    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub quiet: u8,
}
