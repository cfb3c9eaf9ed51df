//! Which view is showing, and transitions between views.

use std::fmt;

/// A top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Search,
    Book,
    Manage,
    Ask,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Search => "search",
            View::Book => "book",
            View::Manage => "manage",
            View::Ask => "ask",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub from: View,
    pub to: View,
}

/// Tracks the current view and at most one pending transition.
///
/// Each navigation bumps a generation counter. Only the settle event
/// carrying the latest generation completes the transition, so a second
/// navigation before the first settles restarts the delay and ends at the
/// new target.
#[derive(Debug)]
pub struct Navigator {
    current: View,
    pending: Option<View>,
    generation: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: View::Search,
            pending: None,
            generation: 0,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition to `view`, superseding any pending one.
    /// Returns the generation the settle event must carry.
    pub fn navigate_to(&mut self, view: View) -> u64 {
        self.generation += 1;
        self.pending = Some(view);
        self.generation
    }

    /// Complete the transition started at `generation`.
    ///
    /// Returns `None` for stale generations.
    pub fn settle(&mut self, generation: u64) -> Option<Settled> {
        if generation != self.generation {
            return None;
        }
        let to = self.pending.take()?;
        let from = std::mem::replace(&mut self.current, to);
        Some(Settled { from, to })
    }

    /// The view being shown. Unchanged while transitioning.
    pub fn current(&self) -> View {
        self.current
    }

    /// Where the pending transition will end, if any.
    pub fn target(&self) -> Option<View> {
        self.pending
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when `generation` is current and no transition is pending.
    pub fn is_idle_at(&self, generation: u64) -> bool {
        generation == self.generation && self.pending.is_none()
    }
}
