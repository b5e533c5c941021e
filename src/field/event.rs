use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error;

use super::glyph::GlyphKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Render,
    Enter,
    Update,
    Exit,
    End,
}

impl FromStr for EventKind {
    type Err = error::Error;
    fn from_str(input: &str) -> Result<EventKind, Self::Err> {
        match input {
            "render" => Ok(EventKind::Render),
            "enter" => Ok(EventKind::Enter),
            "update" => Ok(EventKind::Update),
            "exit" => Ok(EventKind::Exit),
            "end" => Ok(EventKind::End),
            _ => Err(error::Error::UnknownEvent(input.to_string())),
        }
    }
}

/// Counts for one completed render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
    /// Points that produced no glyph.
    pub dropped: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Render { key: String, points: usize },
    Enter(GlyphKey),
    Update(GlyphKey),
    Exit(GlyphKey),
    End(PassSummary),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Render { .. } => EventKind::Render,
            Event::Enter(_) => EventKind::Enter,
            Event::Update(_) => EventKind::Update,
            Event::Exit(_) => EventKind::Exit,
            Event::End(_) => EventKind::End,
        }
    }
}

pub type Handler = Box<dyn FnMut(&Event)>;

/// Lifecycle event handlers, called in subscription order.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&EventKind, usize> =
            self.handlers.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("Dispatcher").field("handlers", &counts).finish()
    }
}

impl Dispatcher {
    pub fn on(&mut self, kind: EventKind, handler: Handler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    pub fn emit(&mut self, event: &Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                handler(event);
            }
        }
    }
}
