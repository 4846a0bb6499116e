use std::io::{self, BufRead, IsTerminal, Lines, StdinLock};

use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use super::symbols::{AND_IF, PIPE};
use crate::state::ShellState;

enum Input {
    /// A terminal, read through rustyline with line editing and in-session recall
    Interactive(DefaultEditor),
    /// Anything else, read one plain line at a time without prompts
    Piped(Lines<StdinLock<'static>>),
}

enum PhysicalLine {
    Line(String),
    Interrupted,
    Eof,
}

/// Reads logical lines, asking for more input while a line ends in an incomplete operator
pub struct LineEditor {
    input: Input,
}

impl LineEditor {
    pub fn new() -> Self {
        if io::stdin().is_terminal() {
            let config = Config::builder().history_ignore_space(true).build();
            match DefaultEditor::with_config(config) {
                Ok(editor) => {
                    return Self {
                        input: Input::Interactive(editor),
                    }
                }
                Err(error) => warn!("Line editing unavailable, reading plain lines: {}", error),
            }
        }

        Self {
            input: Input::Piped(io::stdin().lock().lines()),
        }
    }

    /// Prompts for and returns the next non-blank logical line.
    /// Returns `None` once input is exhausted, including midway through a continuation.
    pub fn prompt_and_read_line(&mut self, shell: &ShellState) -> Option<String> {
        'prompt: loop {
            let mut line = match self.read_physical_line(&shell.generate_prompt()) {
                PhysicalLine::Line(line) => line.trim().to_owned(),
                PhysicalLine::Interrupted => continue,
                PhysicalLine::Eof => return None,
            };

            if line.is_empty() {
                continue;
            }

            while needs_continuation(&line) {
                match self.read_physical_line(&shell.config.continuation_prompt) {
                    PhysicalLine::Line(rest) => {
                        line.push(' ');
                        line.push_str(&rest);
                        line.truncate(line.trim_end().len());
                    }
                    PhysicalLine::Interrupted => continue 'prompt,
                    PhysicalLine::Eof => return None,
                }
            }

            if let Input::Interactive(editor) = &mut self.input {
                // * Fails for lines starting with a space or repeating the last entry,
                // * neither of which needs handling
                let _ = editor.add_history_entry(line.as_str());
            }

            debug!("Read line {:?}", line);
            return Some(line);
        }
    }

    fn read_physical_line(&mut self, prompt: &str) -> PhysicalLine {
        match &mut self.input {
            Input::Interactive(editor) => match editor.readline(prompt) {
                Ok(line) => PhysicalLine::Line(line),
                Err(ReadlineError::Interrupted) => PhysicalLine::Interrupted,
                Err(ReadlineError::Eof) => PhysicalLine::Eof,
                Err(error) => {
                    warn!("Failed to read a line: {}", error);
                    PhysicalLine::Eof
                }
            },
            Input::Piped(lines) => match lines.next() {
                Some(Ok(line)) => PhysicalLine::Line(line),
                Some(Err(error)) => {
                    warn!("Failed to read a line: {}", error);
                    PhysicalLine::Eof
                }
                None => PhysicalLine::Eof,
            },
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a line ends in an operator that still needs its right-hand command
pub fn needs_continuation(line: &str) -> bool {
    let line = line.trim_end();
    line.ends_with(PIPE) || line.ends_with(AND_IF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_operators_continue() {
        assert!(needs_continuation("ls |"));
        assert!(needs_continuation("make &&  "));
        assert!(needs_continuation("false ||"));
    }

    #[test]
    fn test_complete_lines_do_not_continue() {
        assert!(!needs_continuation("ls | wc -l"));
        assert!(!needs_continuation("echo a;"));
        assert!(!needs_continuation("echo &"));
    }
}
