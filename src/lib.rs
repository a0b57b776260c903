//! Cover-fit layout for full-bleed images.
//!
//! Scales an image so it fills its container without distortion, pins or
//! centers it on each axis, and keeps it fitted across bursts of viewport
//! changes with a leading/trailing throttle.
//!
//! # Modules
//!
//! - [`fit`] — Aspect-preserving cover fit and edge placement (`no_std`, no allocation)
//! - [`css`] — Inline style rendering for fit results and native background fits
//! - [`throttle`] — Leading/trailing throttle driven by explicit timestamps
//! - [`widget`] — One fill instance bound to an element of a host [`Surface`]
//! - [`registry`] — Per-element widget bookkeeping and named commands
//! - [`config`] — Widget configuration and host capabilities

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod fit;

#[cfg(feature = "alloc")]
pub mod css;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod registry;
#[cfg(feature = "std")]
pub mod throttle;
#[cfg(feature = "std")]
pub mod widget;

// Re-exports: core types from fit module
pub use fit::{
    AspectRatio, Axis, Dimensions, FitError, FitResult, Horizontal, Offset, Position, Vertical,
    compute_fit,
};

#[cfg(feature = "alloc")]
pub use css::StyleBlock;

#[cfg(feature = "std")]
pub use config::{Capabilities, ContainerRef, FillConfig};
#[cfg(feature = "std")]
pub use registry::{Command, Registry};
#[cfg(feature = "std")]
pub use throttle::{ThrottleConfig, ThrottleDecision, ThrottleState, Throttled};
#[cfg(feature = "std")]
pub use widget::{FillError, FillWidget, Mode, Surface};
