use anyhow::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Complete,
}

/// Receives the host context and whatever followed the command token
/// (or the whole raw line, for a fallback handler).
pub type Handler<C> = fn(&mut C, &str) -> Result<Flow>;

/// Exact-match mapping from command token to handler, plus an optional fallback.
pub struct CommandTable<C> {
    commands: Vec<(&'static str, Handler<C>)>,
    fallback: Option<Handler<C>>,
}

impl<C> CommandTable<C> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            fallback: None,
        }
    }

    /// Register `handler` under every alias in `names`, replacing earlier bindings.
    pub fn command(mut self, names: &[&'static str], handler: Handler<C>) -> Self {
        for &name in names {
            match self.commands.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = handler,
                None => self.commands.push((name, handler)),
            }
        }
        self
    }

    pub fn fallback(mut self, handler: Handler<C>) -> Self {
        self.fallback = Some(handler);
        self
    }

    /// Put `overlay` on top of `self`: its commands and fallback win.
    pub fn layered(mut self, overlay: CommandTable<C>) -> Self {
        for (name, handler) in overlay.commands {
            self = self.command(&[name], handler);
        }
        if overlay.fallback.is_some() {
            self.fallback = overlay.fallback;
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Handler<C>> {
        self.commands
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, handler)| *handler)
    }

    pub fn fallback_handler(&self) -> Option<Handler<C>> {
        self.fallback
    }

    /// Registered names longer than one character, in registration order.
    pub fn usage_names(&self) -> Vec<&'static str> {
        self.commands
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| name.chars().count() > 1)
            .collect()
    }
}

impl<C> Default for CommandTable<C> {
    fn default() -> Self {
        Self::new()
    }
}
