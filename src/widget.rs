//! A fill instance bound to one element of a host surface.
//!
//! The widget never touches a real document. Everything it reads or writes
//! goes through [`Surface`], so the same logic drives a browser binding, a
//! native toolkit, or the recording surface used in tests.
//!
//! Two modes are chosen once, at [`FillWidget::init`]:
//!
//! - [`Mode::Background`]: the host scales the image itself as a container
//!   background (`background-size: cover`). No listener, no computation.
//! - [`Mode::Manual`]: the widget computes a [`FitResult`] and applies it as
//!   inline styles, recomputing on throttled viewport changes.

use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::{Capabilities, ContainerRef, FillConfig};
use crate::css::{self, StyleBlock};
use crate::fit::{AspectRatio, Axis, Dimensions, FitError, FitResult, Position, compute_fit};
use crate::throttle::{ThrottleConfig, ThrottleDecision, ThrottleState};

/// Class added to the fitted element.
pub const ELEMENT_CLASS: &str = "fsr-element";
/// Class added to the container.
pub const CONTAINER_CLASS: &str = "fsr-container";
/// Class added to the element when the container background replaces it.
pub const HIDDEN_CLASS: &str = "fsr-hidden";

/// Host environment the widget reads from and writes to.
pub trait Surface {
    /// Handle to a node (element or container).
    type Node: Clone + Eq + Hash + fmt::Debug;
    /// Handle returned by [`listen_viewport`](Self::listen_viewport).
    type Listener;

    /// Parent of `node`, if it has one.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Whether `node` exists on this surface.
    fn contains(&self, node: &Self::Node) -> bool;
    /// Declared native size of an image node, `None` when not declared.
    fn intrinsic_size(&self, node: &Self::Node) -> Option<Dimensions>;
    /// Current rendered size of a node.
    fn box_size(&self, node: &Self::Node) -> Dimensions;
    /// Image source URL of a node.
    fn source(&self, node: &Self::Node) -> Option<String>;

    /// Apply `style` as inline declarations on `node`.
    fn set_style(&mut self, node: &Self::Node, style: &StyleBlock);
    /// Remove all inline styles from `node`.
    fn clear_style(&mut self, node: &Self::Node);
    /// Add a class name to `node`.
    fn add_class(&mut self, node: &Self::Node, class: &str);
    /// Remove a class name from `node`.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Start delivering viewport resize and orientation changes.
    fn listen_viewport(&mut self) -> Self::Listener;
    /// Stop delivering changes for `listener`.
    fn unlisten(&mut self, listener: Self::Listener);
}

/// Widget error. Every variant aborts only the operation that produced it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FillError {
    /// The configured container could not be resolved at init.
    #[error("the container was not found")]
    MissingContainer,
    /// The element has no declared native width/height.
    #[error("the element should declare its native width and height")]
    MissingIntrinsicDimensions,
    /// Background mode needs an image source and the element has none.
    #[error("the element has no image source")]
    MissingSource,
    /// A position keyword is not `left`/`center`/`right` or `top`/`center`/`bottom`.
    #[error("unrecognized position keyword {keyword:?} for {}", axis_name(.axis))]
    UnrecognizedPosition { axis: Axis, keyword: String },
    /// A command name that is not `resize` or `destroy`.
    #[error("{0:?} is not a valid command")]
    UnknownCommand(String),
    /// No widget is attached to the addressed element.
    #[error("no widget is attached to this element")]
    NotAttached,
    #[error(transparent)]
    Fit(#[from] FitError),
}

fn axis_name(axis: &Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "x",
        Axis::Vertical => "y",
    }
}

/// Report an error to the host log and hand it back for propagation.
fn notify(err: FillError) -> FillError {
    warn!("fill: {err}");
    err
}

/// How the element is fitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Native `background-size: cover` on the container.
    Background,
    /// Computed size and offsets, recomputed on viewport changes.
    Manual,
}

impl Mode {
    /// Pick the mode from host capability and user preference.
    pub fn select(capabilities: Capabilities, prefer_native: bool) -> Self {
        if capabilities.background_size && prefer_native {
            Self::Background
        } else {
            Self::Manual
        }
    }
}

/// One fill instance.
pub struct FillWidget<S: Surface> {
    element: S::Node,
    container: S::Node,
    position: Position,
    mode: Mode,
    listener: Option<S::Listener>,
    throttle: ThrottleState<()>,
    /// Captured once, then fixed for the widget's lifetime.
    element_ratio: Option<AspectRatio>,
    last_fit: Option<FitResult>,
}

impl<S: Surface> FillWidget<S> {
    /// Bind a widget to `element` and apply the initial fit.
    ///
    /// Fails only when the container cannot be resolved, or in background
    /// mode when the element has no source. In manual mode a failed first
    /// fit is logged and the widget is still returned; the next resize
    /// retries.
    pub fn init(
        surface: &mut S,
        element: S::Node,
        config: FillConfig<S::Node>,
        capabilities: Capabilities,
    ) -> Result<Self, FillError> {
        let container = match config.container {
            ContainerRef::Parent => surface.parent(&element),
            ContainerRef::Node(node) => surface.contains(&node).then_some(node),
        };
        let container = container.ok_or_else(|| notify(FillError::MissingContainer))?;

        let mode = Mode::select(capabilities, config.use_native_background_fit);
        let source = match mode {
            Mode::Background => Some(
                surface
                    .source(&element)
                    .ok_or_else(|| notify(FillError::MissingSource))?,
            ),
            Mode::Manual => None,
        };

        surface.add_class(&element, ELEMENT_CLASS);
        surface.add_class(&container, CONTAINER_CLASS);

        let mut widget = Self {
            element,
            container,
            position: config.position,
            mode,
            listener: None,
            throttle: ThrottleState::new(ThrottleConfig::with_wait(config.throttle_timeout)),
            element_ratio: None,
            last_fit: None,
        };
        debug!(element = ?widget.element, ?mode, "fill: init");

        if let Some(source) = source {
            surface.add_class(&widget.element, HIDDEN_CLASS);
            surface.set_style(
                &widget.container,
                &css::background_style(&source, widget.position),
            );
        } else {
            widget.listener = Some(surface.listen_viewport());
            if let Err(err) = widget.resize(surface) {
                debug!(%err, "fill: initial fit skipped");
            }
        }

        Ok(widget)
    }

    /// Recompute and apply the fit now, bypassing the throttle.
    ///
    /// Returns `Ok(None)` in background mode. On error the previously
    /// applied layout stays in place.
    pub fn resize(&mut self, surface: &mut S) -> Result<Option<FitResult>, FillError> {
        if self.mode == Mode::Background {
            return Ok(None);
        }

        let ratio = match self.element_ratio {
            Some(ratio) => ratio,
            None => {
                let ratio = surface
                    .intrinsic_size(&self.element)
                    .and_then(|size| size.ratio().ok())
                    .ok_or_else(|| notify(FillError::MissingIntrinsicDimensions))?;
                self.element_ratio = Some(ratio);
                ratio
            }
        };

        let container = surface.box_size(&self.container);
        let fit = compute_fit(ratio, container, self.position).map_err(|e| notify(e.into()))?;

        surface.set_style(&self.element, &css::fit_style(&fit));
        debug!(
            width = fit.width,
            height = fit.height,
            container_width = container.width,
            container_height = container.height,
            "fill: applied fit"
        );
        self.last_fit = Some(fit);
        Ok(Some(fit))
    }

    /// Handle a viewport resize or orientation change at `now`.
    ///
    /// Runs the fit immediately on the leading edge of a burst; later
    /// changes in the same window are folded into one trailing run, which
    /// the host triggers through [`on_timer`](Self::on_timer).
    pub fn on_viewport_change(
        &mut self,
        surface: &mut S,
        now: Instant,
    ) -> Result<Option<FitResult>, FillError> {
        if self.mode == Mode::Background {
            return Ok(None);
        }
        match self.throttle.call_at((), now) {
            ThrottleDecision::Invoke(()) => self.resize(surface),
            ThrottleDecision::Deferred { .. } | ThrottleDecision::Suppressed => Ok(None),
        }
    }

    /// Run the deferred trailing fit if it is due at `now`.
    pub fn on_timer(
        &mut self,
        surface: &mut S,
        now: Instant,
    ) -> Result<Option<FitResult>, FillError> {
        match self.throttle.fire_at(now) {
            Some(()) => self.resize(surface),
            None => Ok(None),
        }
    }

    /// When the host should next call [`on_timer`](Self::on_timer).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Detach listeners, drop any pending run, and remove every class and
    /// inline style the widget applied.
    pub fn destroy(mut self, surface: &mut S) {
        if let Some(listener) = self.listener.take() {
            surface.unlisten(listener);
        }
        self.throttle.cancel();

        surface.remove_class(&self.element, HIDDEN_CLASS);
        surface.remove_class(&self.element, ELEMENT_CLASS);
        surface.clear_style(&self.element);
        surface.remove_class(&self.container, CONTAINER_CLASS);
        surface.clear_style(&self.container);
        debug!(element = ?self.element, "fill: destroyed");
    }

    pub fn element(&self) -> &S::Node {
        &self.element
    }

    pub fn container(&self) -> &S::Node {
        &self.container
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Element ratio, once captured.
    pub fn element_ratio(&self) -> Option<AspectRatio> {
        self.element_ratio
    }

    /// Most recently applied fit.
    pub fn last_fit(&self) -> Option<&FitResult> {
        self.last_fit.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }
}

impl<S: Surface> fmt::Debug for FillWidget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillWidget")
            .field("element", &self.element)
            .field("container", &self.container)
            .field("mode", &self.mode)
            .field("position", &self.position)
            .field("listening", &self.listener.is_some())
            .field("last_fit", &self.last_fit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selection() {
        assert_eq!(Mode::select(Capabilities::native(), true), Mode::Background);
        assert_eq!(Mode::select(Capabilities::native(), false), Mode::Manual);
        assert_eq!(Mode::select(Capabilities::manual_only(), true), Mode::Manual);
        assert_eq!(Mode::select(Capabilities::manual_only(), false), Mode::Manual);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FillError::MissingContainer.to_string(),
            "the container was not found"
        );
        assert_eq!(
            FillError::UnknownCommand("explode".into()).to_string(),
            "\"explode\" is not a valid command"
        );
        assert_eq!(
            FillError::from(FitError::DegenerateContainer).to_string(),
            FitError::DegenerateContainer.to_string()
        );
    }
}
