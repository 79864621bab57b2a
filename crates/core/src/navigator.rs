//! Slide navigation state.
//!
//! The navigator owns the current slide index and keeps it within
//! `0..total`. Requests outside that range are ignored, never reported as
//! errors.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Number of slides in the deck.
pub const TOTAL_SLIDES: usize = 5;

/// A navigation request decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Next,
    Previous,
    Reset,
}

impl KeyCommand {
    /// Map a key name (as reported by a browser `KeyboardEvent.key`) to a command.
    ///
    /// `ArrowRight` and space advance, `ArrowLeft` goes back, `Escape` returns
    /// to the first slide. Other keys are ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | " " => Some(Self::Next),
            "ArrowLeft" => Some(Self::Previous),
            "Escape" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Bounded slide index with next/previous/goto/reset.
///
/// Deserialization goes through the same bounds check as navigation, so a
/// restored navigator always satisfies `current < total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NavigatorState")]
pub struct SlideNavigator {
    current: usize,
    total: usize,
}

/// Unchecked navigator fields as read from a serialized session.
#[derive(Deserialize)]
struct NavigatorState {
    current: usize,
    total: usize,
}

impl TryFrom<NavigatorState> for SlideNavigator {
    type Error = Error;

    fn try_from(state: NavigatorState) -> Result<Self, Error> {
        if state.total == 0 {
            return Err(Error::InvalidArgument(
                "navigator needs at least one slide".to_string(),
            ));
        }
        if state.current >= state.total {
            return Err(Error::InvalidArgument(format!(
                "slide index {} out of range for {} slides",
                state.current, state.total
            )));
        }
        Ok(Self {
            current: state.current,
            total: state.total,
        })
    }
}

impl Default for SlideNavigator {
    fn default() -> Self {
        Self {
            current: 0,
            total: TOTAL_SLIDES,
        }
    }
}

impl SlideNavigator {
    /// Create a navigator for the five-slide deck, positioned at the first slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a navigator over a custom number of slides.
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total.max(1); // At least one slide
        self.current = self.current.min(self.total - 1);
        self
    }

    /// Zero-based index of the current slide.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Move to `index` if it is within `0..total`.
    ///
    /// Returns whether the current slide changed.
    pub fn go_to(&mut self, index: isize) -> bool {
        let Ok(index) = usize::try_from(index) else {
            log::debug!("Ignoring navigation to slide {}", index);
            return false;
        };
        if index >= self.total {
            log::debug!("Ignoring navigation to slide {} of {}", index, self.total);
            return false;
        }
        let changed = index != self.current;
        if changed {
            log::debug!("Slide {} -> {}", self.current, index);
        }
        self.current = index;
        changed
    }

    /// Advance one slide. No-op on the last slide.
    pub fn next(&mut self) -> bool {
        match isize::try_from(self.current).ok().and_then(|i| i.checked_add(1)) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Go back one slide. No-op on the first slide.
    pub fn previous(&mut self) -> bool {
        match isize::try_from(self.current) {
            Ok(index) => self.go_to(index - 1),
            Err(_) => false,
        }
    }

    /// Return to the first slide.
    pub fn reset(&mut self) -> bool {
        self.go_to(0)
    }

    /// Apply a decoded key command.
    pub fn apply(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::Next => self.next(),
            KeyCommand::Previous => self.previous(),
            KeyCommand::Reset => self.reset(),
        }
    }

    /// Handle a raw key name; unknown keys are ignored.
    pub fn handle_key(&mut self, key: &str) -> bool {
        KeyCommand::from_key(key).is_some_and(|command| self.apply(command))
    }

    /// Whether "previous" is disabled.
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    /// Whether "next" is disabled.
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.total
    }

    /// Counter shown beside the navigation buttons, e.g. `3 / 5`.
    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.current + 1, self.total)
    }
}
