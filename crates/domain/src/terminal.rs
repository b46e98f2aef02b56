//! Terminal emulation model: command history and output lines.

use std::collections::VecDeque;

use serde::Serialize;

/// The command that closes the session locally instead of being forwarded.
pub const EXIT_COMMAND: &str = "exit";

/// Whether `line` is the local exit command (case-insensitive).
#[must_use]
pub fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

/// Whether command output ends in a password prompt.
///
/// Only the last non-blank line counts, and it must end with a colon.
#[must_use]
pub fn is_password_prompt(output: &str) -> bool {
    let Some(last) = output.trim_end().lines().next_back() else {
        return false;
    };
    let last = last.trim().to_lowercase();
    last.ends_with(':')
        && (last.starts_with("[sudo]")
            || last.ends_with("password:")
            || last.ends_with("passwort:")
            || last.starts_with("password for"))
}

/// Kind of a rendered terminal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Command,
    Output,
    Error,
    Success,
    Info,
}

/// One rendered terminal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalLine {
    pub kind: LineKind,
    pub text: String,
}

impl TerminalLine {
    #[must_use]
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Most-recent-first command history with a recall cursor.
///
/// The cursor starts "below" the newest entry; [`older`](Self::older) walks
/// back in time, [`newer`](Self::newer) walks forward and finally returns to
/// an empty input line.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted command and reset the recall cursor.
    pub fn push(&mut self, command: impl Into<String>) {
        self.entries.push_front(command.into());
        self.cursor = None;
    }

    /// Step to an older entry. Stays on the oldest entry at the end.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step to a newer entry. Returns `Some("")` when leaving the history.
    pub fn newer(&mut self) -> Option<&str> {
        match self.cursor {
            None => None,
            Some(0) => {
                self.cursor = None;
                Some("")
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.entries.get(i - 1).map(String::as_str)
            }
        }
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &VecDeque<String> {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
