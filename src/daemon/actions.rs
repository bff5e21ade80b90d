// Author: Dustin Pilgrim
// License: MIT

use std::io;

use crate::core::action::Action;
use crate::core::utils::{escape_single_quotes, run_shell_command_silent};

use super::Daemon;

impl Daemon {
    pub(super) fn exec_action(&mut self, action: Action) -> io::Result<()> {
        match action {
            Action::AppendClosed { start, end } => {
                tracing::info!("journal: {} - {} ({}s)", start, end, end - start);
                self.journal.append_closed(start, end)?;
            }

            Action::Notify { message } => {
                tracing::info!("notify: {}", message);
                let _ = run_shell_command_silent(&format!(
                    "notify-send -a Tally '{}'",
                    escape_single_quotes(&message)
                ));
            }
        }

        Ok(())
    }
}
