//! Console prompting behind an injectable input source.
//!
//! Every interactive question goes through [`Prompter`], so the selection
//! and location flows can be driven from a script in tests or a pipe in
//! headless runs. Validation loops use [`Prompter::ask_until`], which
//! re-asks until the answer is accepted, the optional attempt limit is hit,
//! or the input stream ends.

use std::io::{BufRead, Write};

use crate::error::Error;

/// Source of answers for interactive prompts.
pub trait Prompter {
    /// Print informational text (menus, diagnostics).
    fn say(&mut self, text: &str) -> Result<(), Error>;

    /// Print `prompt` and read one line of input, without the line ending.
    ///
    /// Returns [`Error::InputClosed`] when the input stream is exhausted.
    fn ask(&mut self, prompt: &str) -> Result<String, Error>;

    /// Maximum number of answers a validation loop accepts (None = unlimited).
    fn max_attempts(&self) -> Option<u32> {
        None
    }

    /// Ask until `accept` approves an answer, printing `retry` after each
    /// rejected one.
    fn ask_until<F>(
        &mut self,
        what: &str,
        prompt: &str,
        retry: &str,
        accept: F,
    ) -> Result<String, Error>
    where
        F: Fn(&str) -> bool,
        Self: Sized,
    {
        let mut attempts = 0u32;
        loop {
            let answer = self.ask(prompt)?;
            if accept(&answer) {
                return Ok(answer);
            }
            attempts += 1;
            tracing::debug!("Rejected {} input {:?} (attempt {})", what, answer, attempts);
            if let Some(limit) = self.max_attempts() {
                if attempts >= limit {
                    return Err(Error::TooManyAttempts {
                        what: what.to_string(),
                        limit,
                    });
                }
            }
            self.say(retry)?;
        }
    }
}

/// Line-oriented console over any reader/writer pair.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use inky_amsat::prompt::{Console, Prompter};
///
/// let mut console = Console::new(Cursor::new("SO-50\n"), Vec::new());
/// assert_eq!(console.ask("Enter your selection: ").unwrap(), "SO-50");
/// ```
#[derive(Debug)]
pub struct Console<R, W> {
    reader: R,
    writer: W,
    max_attempts: Option<u32>,
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Console on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console reading answers from `reader` and printing to `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_attempts: None,
        }
    }

    /// Limit validation loops to `limit` answers.
    #[must_use]
    pub fn with_max_attempts(mut self, limit: Option<u32>) -> Self {
        self.max_attempts = limit;
        self
    }

    /// Consume the console and return the writer (useful for inspecting output).
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompter for Console<R, W> {
    fn say(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, Error> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed(prompt.trim().to_string()));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }
}
