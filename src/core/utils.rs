// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::process::{Command, Stdio};

pub fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    d.as_secs() as i64
}

pub fn format_total(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

pub fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', r"'\''")
}

pub fn run_shell_command_silent(command: &str) -> io::Result<()> {
    Command::new("sh")
        .arg("-lc")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
