// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tally active-time tracker"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Show today's total active time")]
    Total {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Display current session information")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Close the open interval and stop the running daemon")]
    Stop,
}
