//! Console interaction abstracted behind a trait so confirmation logic is
//! testable without a terminal. The engine stays synchronous: a prompt is a
//! blocking call that returns the user's reply line.

use std::io::{self, BufRead, Write};

pub trait UserInput {
    /// Present `prompt` and return the raw reply line (without the newline).
    fn read_reply(&mut self, prompt: &str) -> io::Result<String>;
}

/// Real console prompt: write to stdout, read one line from stdin.
pub struct ConsoleInput;

impl UserInput for ConsoleInput {
    fn read_reply(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;
        let mut reply = String::new();
        io::stdin().lock().read_line(&mut reply)?;
        Ok(reply.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// Only an explicit yes counts; anything else (including EOF/empty) declines.
pub fn is_affirmative(reply: &str) -> bool {
    matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
pub(crate) struct ScriptedInput(pub Vec<String>);

#[cfg(test)]
impl UserInput for ScriptedInput {
    fn read_reply(&mut self, _prompt: &str) -> io::Result<String> {
        if self.0.is_empty() {
            return Ok(String::new());
        }
        Ok(self.0.remove(0))
    }
}
