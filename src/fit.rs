//! Cover-fit computation for an element inside a container.
//!
//! Scales an element so that it covers its container while preserving its
//! aspect ratio, then pins it to an edge or centers it on each axis. Pure
//! geometry: no allocation, `no_std` compatible, generic over the float
//! type.
//!
//! # Example
//!
//! ```
//! use zenfill::{AspectRatio, Dimensions, Offset, Position, compute_fit};
//!
//! // A 2:1 image inside a square container: height constrains.
//! let ratio = AspectRatio::of(300.0, 150.0).unwrap();
//! let fit = compute_fit(ratio, Dimensions::new(300.0, 300.0), Position::CENTER).unwrap();
//!
//! assert_eq!(fit.width, 600.0);
//! assert_eq!(fit.height, 300.0);
//! assert_eq!(fit.left, Offset::Px(-150.0));
//! assert_eq!(fit.right, Offset::Auto);
//! ```

use core::fmt;
use core::str::FromStr;

use num_traits::Float;

/// Layout axis, used to attribute position errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The `x` axis (left / center / right).
    Horizontal,
    /// The `y` axis (top / center / bottom).
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Fit computation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    /// Container width is zero (or negative), or a dimension is not finite.
    #[error("container must have a positive width and finite dimensions")]
    DegenerateContainer,
    /// Element aspect ratio is zero, negative, or not finite, or scales the
    /// element past the representable range.
    #[error("element aspect ratio must be positive and finite")]
    InvalidRatio,
    /// A position keyword did not name a known edge or `center`.
    #[error("unrecognized {axis} position keyword")]
    UnrecognizedPosition {
        /// Axis the keyword was given for.
        axis: Axis,
    },
}

/// Where along one axis the element sits once scaled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Anchor {
    /// Leading edge (left or top).
    Near,
    Center,
    /// Trailing edge (right or bottom).
    Far,
}

/// Horizontal placement keyword.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase", try_from = "String")
)]
pub enum Horizontal {
    /// Pin to the left edge.
    Left,
    /// Center horizontally.
    #[default]
    Center,
    /// Pin to the right edge.
    Right,
}

impl Horizontal {
    /// Keyword as written in configuration and CSS.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    fn anchor(self) -> Anchor {
        match self {
            Self::Left => Anchor::Near,
            Self::Center => Anchor::Center,
            Self::Right => Anchor::Far,
        }
    }
}

impl FromStr for Horizontal {
    type Err = FitError;

    /// Strict, case-insensitive keyword parse. Unknown keywords are errors,
    /// never silently centered.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("left") {
            Ok(Self::Left)
        } else if s.eq_ignore_ascii_case("center") {
            Ok(Self::Center)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(Self::Right)
        } else {
            Err(FitError::UnrecognizedPosition {
                axis: Axis::Horizontal,
            })
        }
    }
}

/// Vertical placement keyword.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase", try_from = "String")
)]
pub enum Vertical {
    /// Pin to the top edge.
    Top,
    /// Center vertically.
    #[default]
    Center,
    /// Pin to the bottom edge.
    Bottom,
}

impl Vertical {
    /// Keyword as written in configuration and CSS.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }

    fn anchor(self) -> Anchor {
        match self {
            Self::Top => Anchor::Near,
            Self::Center => Anchor::Center,
            Self::Bottom => Anchor::Far,
        }
    }
}

impl FromStr for Vertical {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("top") {
            Ok(Self::Top)
        } else if s.eq_ignore_ascii_case("center") {
            Ok(Self::Center)
        } else if s.eq_ignore_ascii_case("bottom") {
            Ok(Self::Bottom)
        } else {
            Err(FitError::UnrecognizedPosition {
                axis: Axis::Vertical,
            })
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<String> for Horizontal {
    type Error = FitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(feature = "serde")]
impl TryFrom<String> for Vertical {
    type Error = FitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Placement of the scaled element on both axes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Position {
    /// Horizontal placement.
    pub x: Horizontal,
    /// Vertical placement.
    pub y: Vertical,
}

impl Position {
    /// Centered on both axes.
    pub const CENTER: Self = Self {
        x: Horizontal::Center,
        y: Vertical::Center,
    };

    /// Create a position from typed keywords.
    pub const fn new(x: Horizontal, y: Vertical) -> Self {
        Self { x, y }
    }

    /// Parse a position from raw keywords, e.g. `("right", "top")`.
    pub fn from_keywords(x: &str, y: &str) -> Result<Self, FitError> {
        Ok(Self {
            x: x.parse()?,
            y: y.parse()?,
        })
    }
}

/// Width × height of a box, in CSS pixels or any consistent unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dimensions<F = f64> {
    /// Horizontal extent.
    pub width: F,
    /// Vertical extent.
    pub height: F,
}

impl<F: Float> Dimensions<F> {
    /// Create new dimensions.
    pub const fn new(width: F, height: F) -> Self {
        Self { width, height }
    }

    /// Aspect ratio (`height / width`) of these dimensions.
    pub fn ratio(&self) -> Result<AspectRatio<F>, FitError> {
        AspectRatio::of(self.width, self.height)
    }
}

/// Height-over-width ratio. Always positive and finite.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct AspectRatio<F = f64>(F);

impl<F: Float> AspectRatio<F> {
    /// Wrap a precomputed `height / width` value.
    pub fn new(value: F) -> Result<Self, FitError> {
        if value > F::zero() && value.is_finite() {
            Ok(Self(value))
        } else {
            Err(FitError::InvalidRatio)
        }
    }

    /// Ratio of a box with the given native width and height.
    ///
    /// Fails for a zero width, which has no defined ratio.
    pub fn of(width: F, height: F) -> Result<Self, FitError> {
        if !(width > F::zero()) {
            return Err(FitError::InvalidRatio);
        }
        Self::new(height / width)
    }

    /// The raw `height / width` value.
    pub fn get(self) -> F {
        self.0
    }
}

/// One edge offset of the fitted box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Offset<F = f64> {
    /// Explicit distance from the container edge. May be negative when the
    /// element overflows the container on this axis.
    Px(F),
    /// Edge left to the layout engine.
    Auto,
}

impl<F: Copy> Offset<F> {
    /// The numeric offset, if any.
    pub fn px(&self) -> Option<F> {
        match *self {
            Self::Px(v) => Some(v),
            Self::Auto => None,
        }
    }

    /// Whether the edge is left to the layout engine.
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// Size and edge offsets of an element fitted to its container.
///
/// On each axis exactly one edge carries a [`Offset::Px`]; the opposite one
/// is [`Offset::Auto`]. Centered axes use the leading edge (top or left).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitResult<F = f64> {
    /// Scaled element width.
    pub width: F,
    /// Scaled element height.
    pub height: F,
    /// Distance from the container's top edge.
    pub top: Offset<F>,
    /// Distance from the container's right edge.
    pub right: Offset<F>,
    /// Distance from the container's bottom edge.
    pub bottom: Offset<F>,
    /// Distance from the container's left edge.
    pub left: Offset<F>,
}

impl<F: Float> FitResult<F> {
    /// Scaled element size.
    pub fn size(&self) -> Dimensions<F> {
        Dimensions::new(self.width, self.height)
    }

    /// Whether the scaled element is at least as large as `container` on
    /// both axes, within `tolerance`.
    pub fn covers(&self, container: Dimensions<F>, tolerance: F) -> bool {
        self.width + tolerance >= container.width && self.height + tolerance >= container.height
    }
}

/// Fit an element with `element_ratio` so it covers `container`, placed
/// according to `position`.
///
/// When the element is relatively wider than the container it is scaled to
/// the container height; otherwise (equal ratios included) to the container
/// width.
pub fn compute_fit<F: Float>(
    element_ratio: AspectRatio<F>,
    container: Dimensions<F>,
    position: Position,
) -> Result<FitResult<F>, FitError> {
    let Dimensions {
        width: cw,
        height: ch,
    } = container;
    if !(cw > F::zero()) || !cw.is_finite() || !(ch >= F::zero()) || !ch.is_finite() {
        return Err(FitError::DegenerateContainer);
    }

    let ratio = element_ratio.get();
    let container_ratio = ch / cw;

    let (width, height) = if ratio < container_ratio {
        // Element is wider: height constrains.
        (ch / ratio, ch)
    } else {
        (cw, cw * ratio)
    };
    // Extreme ratios can scale past the float range.
    if !width.is_finite() || !height.is_finite() {
        return Err(FitError::InvalidRatio);
    }

    let (top, bottom) = edge_offsets(ch, height, position.y.anchor());
    let (left, right) = edge_offsets(cw, width, position.x.anchor());

    Ok(FitResult {
        width,
        height,
        top,
        right,
        bottom,
        left,
    })
}

/// Leading and trailing offsets for an extent placed within a span.
fn edge_offsets<F: Float>(span: F, extent: F, anchor: Anchor) -> (Offset<F>, Offset<F>) {
    match anchor {
        Anchor::Near => (Offset::Px(F::zero()), Offset::Auto),
        Anchor::Far => (Offset::Auto, Offset::Px(F::zero())),
        Anchor::Center => {
            let two = F::one() + F::one();
            (Offset::Px((span - extent) / two), Offset::Auto)
        }
    }
}
