//! Single-key confirmation prompt on the terminal.

use std::io::{self, BufRead, IsTerminal, Write};

use console::Term;
use polypub_core::{Prompt, Result};

pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<char>> {
        self.term.write_str(message)?;
        self.term.flush()?;

        if !io::stdin().is_terminal() {
            // Piped stdin: take the first character of the first line.
            let mut line = String::new();
            let read = io::stdin().lock().read_line(&mut line)?;
            return Ok(if read == 0 {
                None
            } else {
                line.chars().next()
            });
        }

        let key = self.term.read_char()?;
        self.term.write_line(&key.to_string())?;
        io::stderr().flush()?;
        Ok(Some(key))
    }
}
