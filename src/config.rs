//! Widget configuration and host capabilities.
//!
//! [`FillConfig`] is built once per widget and passed explicitly; there is
//! no process-wide defaults object. With the `serde` feature, the
//! serializable subset is available as [`FillOptions`].

use std::time::Duration;

use crate::fit::{FitError, Horizontal, Position, Vertical};
use crate::throttle::DEFAULT_WAIT;
use crate::widget::FillError;

/// What the host environment can do, probed once by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// The host can scale an image as a container background with
    /// `background-size: cover`.
    pub background_size: bool,
}

impl Capabilities {
    /// A host with native background scaling.
    pub const fn native() -> Self {
        Self {
            background_size: true,
        }
    }

    /// A host without native background scaling.
    pub const fn manual_only() -> Self {
        Self {
            background_size: false,
        }
    }
}

/// Which node the element is fitted into.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContainerRef<N> {
    /// The element's parent node.
    #[default]
    Parent,
    /// An explicit node.
    Node(N),
}

/// Per-widget configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillConfig<N> {
    /// Prefer native background scaling when the host supports it.
    pub use_native_background_fit: bool,
    /// Node the element is fitted into.
    pub container: ContainerRef<N>,
    /// Placement of the element inside the container.
    pub position: Position,
    /// Throttle window for viewport change events.
    pub throttle_timeout: Duration,
}

impl<N> Default for FillConfig<N> {
    fn default() -> Self {
        Self {
            use_native_background_fit: true,
            container: ContainerRef::Parent,
            position: Position::CENTER,
            throttle_timeout: DEFAULT_WAIT,
        }
    }
}

impl<N> FillConfig<N> {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`Self::use_native_background_fit`].
    pub fn use_native_background_fit(mut self, enabled: bool) -> Self {
        self.use_native_background_fit = enabled;
        self
    }

    /// Set the container node.
    pub fn container(mut self, container: ContainerRef<N>) -> Self {
        self.container = container;
        self
    }

    /// Set the typed position.
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the position from raw keywords such as `("right", "top")`.
    pub fn position_keywords(mut self, x: &str, y: &str) -> Result<Self, FillError> {
        let px = x.parse::<Horizontal>().map_err(|e| keyword_error(e, x))?;
        let py = y.parse::<Vertical>().map_err(|e| keyword_error(e, y))?;
        self.position = Position::new(px, py);
        Ok(self)
    }

    /// Set the throttle window for viewport changes.
    pub fn throttle_timeout(mut self, timeout: Duration) -> Self {
        self.throttle_timeout = timeout;
        self
    }
}

fn keyword_error(err: FitError, keyword: &str) -> FillError {
    match err {
        FitError::UnrecognizedPosition { axis } => FillError::UnrecognizedPosition {
            axis,
            keyword: keyword.to_owned(),
        },
        other => FillError::Fit(other),
    }
}

/// Serializable widget options (everything except the container node).
///
/// Missing fields take their defaults; position keywords are strict.
///
/// ```
/// # #[cfg(feature = "serde")] {
/// use zenfill::config::FillOptions;
///
/// let opts: FillOptions =
///     serde_json::from_str(r#"{"position": {"x": "right", "y": "top"}}"#).unwrap();
/// assert!(opts.use_native_background_fit);
/// assert_eq!(opts.throttle_timeout_ms, 100);
/// # }
/// ```
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FillOptions {
    pub use_native_background_fit: bool,
    pub position: Position,
    pub throttle_timeout_ms: u64,
}

#[cfg(feature = "serde")]
impl Default for FillOptions {
    fn default() -> Self {
        Self {
            use_native_background_fit: true,
            position: Position::CENTER,
            throttle_timeout_ms: DEFAULT_WAIT.as_millis() as u64,
        }
    }
}

#[cfg(feature = "serde")]
impl FillOptions {
    /// Combine with a container choice into a full config.
    pub fn into_config<N>(self, container: ContainerRef<N>) -> FillConfig<N> {
        FillConfig {
            use_native_background_fit: self.use_native_background_fit,
            container,
            position: self.position,
            throttle_timeout: Duration::from_millis(self.throttle_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::Axis;

    #[test]
    fn defaults() {
        let config = FillConfig::<u32>::default();
        assert!(config.use_native_background_fit);
        assert_eq!(config.container, ContainerRef::Parent);
        assert_eq!(config.position, Position::CENTER);
        assert_eq!(config.throttle_timeout, Duration::from_millis(100));
    }

    #[test]
    fn builder_overrides() {
        let config = FillConfig::new()
            .use_native_background_fit(false)
            .container(ContainerRef::Node(7u32))
            .throttle_timeout(Duration::from_millis(250));
        assert!(!config.use_native_background_fit);
        assert_eq!(config.container, ContainerRef::Node(7));
        assert_eq!(config.throttle_timeout, Duration::from_millis(250));
    }

    #[test]
    fn position_keywords_are_strict() {
        let config = FillConfig::<u32>::new()
            .position_keywords("right", "top")
            .unwrap();
        assert_eq!(
            config.position,
            Position::new(Horizontal::Right, Vertical::Top)
        );

        let err = FillConfig::<u32>::new()
            .position_keywords("right", "middle")
            .unwrap_err();
        assert_eq!(
            err,
            FillError::UnrecognizedPosition {
                axis: Axis::Vertical,
                keyword: "middle".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "unrecognized position keyword \"middle\" for y"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_deserialize_with_defaults() {
        let opts: FillOptions =
            serde_json::from_str(r#"{"throttle_timeout_ms": 40}"#).unwrap();
        assert_eq!(opts.throttle_timeout_ms, 40);
        assert_eq!(opts.position, Position::CENTER);

        let config = opts.into_config(ContainerRef::Node("hero"));
        assert_eq!(config.throttle_timeout, Duration::from_millis(40));
        assert_eq!(config.container, ContainerRef::Node("hero"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_reject_unknown_keywords() {
        let result: Result<FillOptions, _> =
            serde_json::from_str(r#"{"position": {"x": "middle", "y": "top"}}"#);
        assert!(result.is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn keywords_accept_mixed_case() {
        let opts: FillOptions =
            serde_json::from_str(r#"{"position": {"x": "Left", "y": "BOTTOM"}}"#).unwrap();
        assert_eq!(
            opts.position,
            Position::new(Horizontal::Left, Vertical::Bottom)
        );
    }
}
