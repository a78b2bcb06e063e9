//! Terminal prompts for interactive snapshot commands.

use inquire::{Confirm, Select, Text};
use ordinal_core::{SnapshotEntry, SnapshotPrompt};

/// Asks on the terminal; `--yes` answers every confirmation up front
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl SnapshotPrompt for TerminalPrompt {
    fn choose(&mut self, entries: &[SnapshotEntry]) -> Option<usize> {
        match Select::new("Snapshot to restore:", entries.to_vec()).prompt() {
            Ok(entry) => Some(entry.index),
            Err(err) => {
                tracing::debug!("Selection aborted: {}", err);
                None
            }
        }
    }

    fn delete_selection(&mut self, entries: &[SnapshotEntry]) -> Option<String> {
        for entry in entries {
            println!("{}", entry);
        }
        Text::new("Snapshots to delete ('all' or numbers like 1,3):")
            .prompt()
            .ok()
            .filter(|input| !input.trim().is_empty())
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new(message)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}
