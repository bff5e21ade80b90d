// Author: Dustin Pilgrim
// License: MIT

use crate::cli::{Args, Command};
use crate::ipc::client;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    let Some(command) = args.command else {
        return Err("no subcommand given".into());
    };

    let result = match command {
        Command::Total { json } => client::handle_total(json).await,
        Command::Info { json } => client::handle_info(json).await,
        Command::Stop => client::handle_stop().await,
    };

    result.map_err(|e| e.to_string().into())
}
