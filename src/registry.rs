//! Per-element widget bookkeeping.
//!
//! A [`Registry`] owns every widget attached to a surface, keyed by the
//! element node. Attaching twice is a no-op, and named commands address
//! widgets by element.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::str::FromStr;
use std::time::Instant;

use tracing::debug;

use crate::config::{Capabilities, FillConfig};
use crate::fit::FitResult;
use crate::widget::{FillError, FillWidget, Surface};

/// Operation addressed to an attached widget.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Recompute the fit now.
    Resize,
    /// Tear the widget down and forget it.
    Destroy,
}

impl FromStr for Command {
    type Err = FillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "resize" => Ok(Self::Resize),
            "destroy" => Ok(Self::Destroy),
            other => Err(FillError::UnknownCommand(other.to_owned())),
        }
    }
}

/// Widgets attached to one surface.
pub struct Registry<S: Surface> {
    widgets: HashMap<S::Node, FillWidget<S>>,
}

impl<S: Surface> Default for Registry<S> {
    fn default() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }
}

impl<S: Surface> Registry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a widget to `element`.
    ///
    /// When one is already attached, it is returned unchanged and `config`
    /// is ignored.
    pub fn attach(
        &mut self,
        surface: &mut S,
        element: S::Node,
        config: FillConfig<S::Node>,
        capabilities: Capabilities,
    ) -> Result<&mut FillWidget<S>, FillError> {
        match self.widgets.entry(element) {
            Entry::Occupied(entry) => {
                debug!(element = ?entry.key(), "fill: already attached");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let widget = FillWidget::init(surface, entry.key().clone(), config, capabilities)?;
                Ok(entry.insert(widget))
            }
        }
    }

    /// Destroy and forget the widget on `element`. Returns whether one was
    /// attached.
    pub fn detach(&mut self, surface: &mut S, element: &S::Node) -> bool {
        match self.widgets.remove(element) {
            Some(widget) => {
                widget.destroy(surface);
                true
            }
            None => false,
        }
    }

    /// Run `command` on the widget attached to `element`.
    pub fn dispatch(
        &mut self,
        surface: &mut S,
        element: &S::Node,
        command: Command,
    ) -> Result<Option<FitResult>, FillError> {
        match command {
            Command::Resize => self
                .widgets
                .get_mut(element)
                .ok_or(FillError::NotAttached)?
                .resize(surface),
            Command::Destroy => {
                if self.detach(surface, element) {
                    Ok(None)
                } else {
                    Err(FillError::NotAttached)
                }
            }
        }
    }

    /// Parse and run a named command (`"resize"` or `"destroy"`).
    pub fn dispatch_named(
        &mut self,
        surface: &mut S,
        element: &S::Node,
        name: &str,
    ) -> Result<Option<FitResult>, FillError> {
        let command = name.parse()?;
        self.dispatch(surface, element, command)
    }

    /// Forward a viewport change to every widget.
    ///
    /// Returns the failures; other widgets are unaffected by them.
    pub fn on_viewport_change(
        &mut self,
        surface: &mut S,
        now: Instant,
    ) -> Vec<(S::Node, FillError)> {
        let mut failures = Vec::new();
        for (node, widget) in &mut self.widgets {
            if let Err(err) = widget.on_viewport_change(surface, now) {
                failures.push((node.clone(), err));
            }
        }
        failures
    }

    /// Run every trailing fit that is due at `now`.
    pub fn on_timer(&mut self, surface: &mut S, now: Instant) -> Vec<(S::Node, FillError)> {
        let mut failures = Vec::new();
        for (node, widget) in &mut self.widgets {
            if let Err(err) = widget.on_timer(surface, now) {
                failures.push((node.clone(), err));
            }
        }
        failures
    }

    /// Earliest pending trailing fit across all widgets.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.widgets.values().filter_map(FillWidget::next_deadline).min()
    }

    pub fn get(&self, element: &S::Node) -> Option<&FillWidget<S>> {
        self.widgets.get(element)
    }

    pub fn get_mut(&mut self, element: &S::Node) -> Option<&mut FillWidget<S>> {
        self.widgets.get_mut(element)
    }

    pub fn contains(&self, element: &S::Node) -> bool {
        self.widgets.contains_key(element)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
