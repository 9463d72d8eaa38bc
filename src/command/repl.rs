use anyhow::Result;

use crate::command::table::{CommandTable, Flow};

/// Where the loop gets its input and how it complains about unknown commands.
pub trait LineSource {
    /// Next operator line, or `None` once input is exhausted.
    fn next_line(&mut self) -> Result<Option<String>>;

    fn report_unknown(&mut self, raw: &str, usage: &[&'static str]) -> Result<()>;
}

pub struct LoopHooks<C> {
    /// Runs before each prompt, e.g. to show the current question.
    pub before: Option<fn(&mut C) -> Result<()>>,
    /// Checked after each dispatched line.
    pub complete_if: Option<fn(&C) -> bool>,
}

impl<C> Default for LoopHooks<C> {
    fn default() -> Self {
        Self {
            before: None,
            complete_if: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    Completed,
    EndOfInput,
}

/// Split on the first whitespace run into `(command, rest)`.
pub fn split_command(raw: &str) -> (&str, &str) {
    let trimmed = raw.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (trimmed, ""),
    }
}

pub fn run<C: LineSource>(
    ctx: &mut C,
    table: &CommandTable<C>,
    hooks: &LoopHooks<C>,
) -> Result<LoopExit> {
    loop {
        if let Some(before) = hooks.before {
            before(ctx)?;
        }

        let Some(raw) = ctx.next_line()? else {
            return Ok(LoopExit::EndOfInput);
        };
        let (command, args) = split_command(&raw);

        let flow = if command.is_empty() {
            Flow::Continue
        } else if let Some(handler) = table.get(command) {
            handler(ctx, args)?
        } else if let Some(fallback) = table.fallback_handler() {
            fallback(ctx, raw.trim())?
        } else {
            ctx.report_unknown(raw.trim(), &table.usage_names())?;
            Flow::Continue
        };

        let done = match hooks.complete_if {
            Some(complete) => complete(ctx),
            None => false,
        };
        if flow == Flow::Complete || done {
            return Ok(LoopExit::Completed);
        }
    }
}
