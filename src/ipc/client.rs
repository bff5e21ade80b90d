// Author: Dustin Pilgrim
// License: MIT

use std::process;

use eyre::Result;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    time::{Duration, timeout},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Send one command to the running daemon and return its textual response.
/// `Ok(None)` means no daemon is listening.
async fn exchange(cmd: &str) -> Result<Option<String>> {
    let path = match super::socket_path() {
        Ok(p) => p,
        Err(_) => return Ok(None),
    };

    let mut stream = match timeout(CONNECT_TIMEOUT, UnixStream::connect(&path)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(_)) | Err(_) => return Ok(None),
    };

    stream.write_all(cmd.as_bytes()).await?;
    stream.shutdown().await?;

    let mut response = Vec::new();
    match timeout(READ_TIMEOUT, stream.read_to_end(&mut response)).await {
        Ok(Ok(_)) => Ok(Some(String::from_utf8_lossy(&response).to_string())),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(eyre::eyre!("timeout reading from tally daemon")),
    }
}

fn print_not_running(json: bool) {
    if json {
        println!(r#"{{"text":"", "alt": "not_running", "tooltip":"No running tally instance found"}}"#);
    } else {
        eprintln!("No running tally instance found");
        process::exit(1);
    }
}

fn print_response(response: &str) {
    let trimmed = response.trim_end();

    if let Some(msg) = trimmed.strip_prefix("ERROR:") {
        eprintln!("{}", msg.trim());
        process::exit(1);
    }

    println!("{trimmed}");
}

pub async fn handle_total(json: bool) -> Result<()> {
    let cmd = if json { "total --json" } else { "total" };

    match exchange(cmd).await? {
        Some(response) => print_response(&response),
        None => print_not_running(json),
    }

    Ok(())
}

pub async fn handle_info(json: bool) -> Result<()> {
    let cmd = if json { "info --json" } else { "info" };

    match exchange(cmd).await? {
        Some(response) => print_response(&response),
        None => print_not_running(json),
    }

    Ok(())
}

pub async fn handle_stop() -> Result<()> {
    match exchange("stop").await? {
        Some(response) => print_response(&response),
        None => print_not_running(false),
    }

    Ok(())
}
