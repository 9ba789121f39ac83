//! Console Boundary
//!
//! "Ask a question, print text." The session never touches stdin/stdout
//! directly, so it can be driven by a script in tests.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::{Confirm, Input};
use thiserror::Error;

/// Console I/O errors.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading or writing the terminal failed.
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),

    /// Interactive prompt failed.
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Interactive input/output.
///
/// `None` from a question means the input has ended.
pub trait Console {
    /// Ask a free-form question.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, ConsoleError>;

    /// Print a block of text.
    fn say(&mut self, text: &str);
}

/// Interpret a yes/no answer. Empty input takes `default`.
pub fn parse_confirmation(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Standard input/output console.
///
/// Uses `dialoguer` prompts on a terminal and plain line reads otherwise.
#[derive(Debug)]
pub struct TerminalConsole {
    interactive: bool,
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalConsole {
    /// Console on the process's stdin/stdout.
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
        }
    }

    fn read_line(&self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn end_of_input<T>(result: dialoguer::Result<T>) -> Result<Option<T>, ConsoleError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Console for TerminalConsole {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        if !self.interactive {
            return self.read_line(&format!("{} ", prompt));
        }

        end_of_input(
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text(),
        )
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, ConsoleError> {
        if !self.interactive {
            let hint = if default { "[Y/n]" } else { "[y/N]" };
            let answer = self.read_line(&format!("{} {}: ", prompt, hint))?;
            return Ok(answer.map(|a| parse_confirmation(&a, default)));
        }

        end_of_input(
            Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact(),
        )
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Console fed from a fixed list of answers, recording everything said.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: std::collections::VecDeque<String>,
    /// Every prompt and line of output, in order.
    pub transcript: Vec<String>,
    /// Prompts asked, in order.
    pub prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedConsole {
    /// Console answering with `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// All output joined into one string.
    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    /// Number of times a prompt containing `needle` was asked.
    pub fn asked(&self, needle: &str) -> usize {
        self.prompts.iter().filter(|p| p.contains(needle)).count()
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        self.prompts.push(prompt.to_string());
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, ConsoleError> {
        Ok(self.ask(prompt)?.map(|a| parse_confirmation(&a, default)))
    }

    fn say(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation_defaults_yes() {
        assert!(parse_confirmation("", true));
        assert!(parse_confirmation("  ", true));
        assert!(parse_confirmation("y", true));
        assert!(parse_confirmation("YES", true));
        assert!(!parse_confirmation("n", true));
        assert!(!parse_confirmation("nope", true));
        assert!(!parse_confirmation("", false));
    }

    #[test]
    fn test_scripted_console_runs_out() {
        let mut console = ScriptedConsole::new(["1"]);
        assert_eq!(console.ask("move?").unwrap(), Some("1".to_string()));
        assert_eq!(console.ask("move?").unwrap(), None);
        assert_eq!(console.asked("move"), 2);
    }
}
