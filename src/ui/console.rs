use std::io::{self, BufRead, Write};

use crate::quiz::answer::normalize_input;

/// Words that back out of a selection menu.
pub const CANCEL_WORDS: [&str; 3] = ["q", "quit", "exit"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Chosen(usize),
    Cancelled,
}

/// Line-oriented terminal: prompts go to `out`, answers come from `input`.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Print `prompt`, then read one trimmed line. `None` at end of input.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until the answer is y/Y or n/N. End of input counts as no.
    pub fn yes_no(&mut self, message: &str) -> io::Result<bool> {
        loop {
            writeln!(self.out, "{message}")?;
            match self.prompt("> ")?.as_deref() {
                None => return Ok(false),
                Some("y" | "Y") => return Ok(true),
                Some("n" | "N") => return Ok(false),
                Some(_) => continue,
            }
        }
    }

    /// Ask for an index into `options` until one is valid or the operator cancels.
    ///
    /// With `verbose` every option is listed as `[i] option` before the prompt;
    /// otherwise only the accepted range is shown.
    pub fn select_key(
        &mut self,
        options: &[String],
        message: &str,
        verbose: bool,
    ) -> io::Result<Selection> {
        writeln!(self.out)?;
        loop {
            if verbose {
                for (i, option) in options.iter().enumerate() {
                    writeln!(self.out, "[{i}] {option}")?;
                }
                writeln!(self.out, "{message}")?;
            } else {
                writeln!(
                    self.out,
                    "{message} [0...{}]",
                    options.len().saturating_sub(1)
                )?;
            }

            let Some(raw) = self.prompt("> ")? else {
                return Ok(Selection::Cancelled);
            };
            if CANCEL_WORDS.contains(&raw.as_str()) {
                return Ok(Selection::Cancelled);
            }
            if let Some(index) = parse_choice(&raw, options.len()) {
                return Ok(Selection::Chosen(index));
            }
        }
    }
}

/// Zero-based index typed by the operator, if it names one of `len` options.
/// Full-width digits are accepted.
pub fn parse_choice(raw: &str, len: usize) -> Option<usize> {
    normalize_input(raw)
        .parse::<usize>()
        .ok()
        .filter(|&index| index < len)
}
