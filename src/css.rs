//! Inline style rendering for fit results and background fits.
//!
//! Hosts that style elements through CSS apply a [`StyleBlock`] as inline
//! declarations. Property order is stable so that rendered blocks can be
//! compared directly.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use num_traits::Float;

use crate::fit::{FitResult, Offset, Position};

/// A single `property: value` declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
}

/// Ordered list of inline style declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleBlock {
    declarations: Vec<Declaration>,
}

impl StyleBlock {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration. Later declarations of the same property win
    /// when applied, as in CSS.
    pub fn push(&mut self, property: &'static str, value: impl Into<String>) {
        self.declarations.push(Declaration {
            property,
            value: value.into(),
        });
    }

    /// Effective value of `property` (the last declaration wins).
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    /// All declarations in insertion order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Number of declarations, duplicates included.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the block has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for StyleBlock {
    /// Renders as a `style` attribute value: `width: 600px; height: 300px`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", d.property, d.value)?;
        }
        Ok(())
    }
}

/// Inline styles that size and place an element per `fit`.
///
/// Emits `width`, `height`, `top`, `right`, `bottom`, `left` in that order;
/// unset edges render as `auto`.
pub fn fit_style<F: Float + fmt::Display>(fit: &FitResult<F>) -> StyleBlock {
    let mut block = StyleBlock::new();
    block.push("width", px(fit.width));
    block.push("height", px(fit.height));
    block.push("top", offset(fit.top));
    block.push("right", offset(fit.right));
    block.push("bottom", offset(fit.bottom));
    block.push("left", offset(fit.left));
    block
}

/// Container styles that let the host scale `source` natively with
/// `background-size: cover`, anchored at `position`.
pub fn background_style(source: &str, position: Position) -> StyleBlock {
    let mut block = StyleBlock::new();
    block.push("background-image", format!("url(\"{}\")", escape_url(source)));
    block.push("background-position", background_position(position));
    block.push("background-size", "cover");
    block
}

/// `background-position` value for a placement: horizontal keyword first.
pub fn background_position(position: Position) -> String {
    format!("{} {}", position.x.as_str(), position.y.as_str())
}

fn px<F: Float + fmt::Display>(v: F) -> String {
    if v == F::zero() {
        // Avoid "-0px".
        return String::from("0px");
    }
    format!("{v}px")
}

fn offset<F: Float + fmt::Display>(o: Offset<F>) -> String {
    match o {
        Offset::Px(v) => px(v),
        Offset::Auto => String::from("auto"),
    }
}

/// Escape characters that would terminate a double-quoted CSS string.
fn escape_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{AspectRatio, Dimensions, Horizontal, Vertical, compute_fit};

    #[test]
    fn fit_style_renders_all_edges() {
        let fit = compute_fit(
            AspectRatio::of(300.0, 150.0).unwrap(),
            Dimensions::new(300.0, 300.0),
            Position::CENTER,
        )
        .unwrap();
        let block = fit_style(&fit);
        assert_eq!(
            block.to_string(),
            "width: 600px; height: 300px; top: 0px; right: auto; bottom: auto; left: -150px"
        );
    }

    #[test]
    fn pinned_edges_render_zero() {
        let fit = compute_fit(
            AspectRatio::of(1.0, 1.0).unwrap(),
            Dimensions::new(200.0, 100.0),
            Position::new(Horizontal::Right, Vertical::Bottom),
        )
        .unwrap();
        let block = fit_style(&fit);
        assert_eq!(block.get("right"), Some("0px"));
        assert_eq!(block.get("bottom"), Some("0px"));
        assert_eq!(block.get("top"), Some("auto"));
        assert_eq!(block.get("left"), Some("auto"));
    }

    #[test]
    fn background_style_uses_cover() {
        let block = background_style(
            "http://placehold.it/350x150",
            Position::new(Horizontal::Left, Vertical::Bottom),
        );
        assert_eq!(
            block.get("background-image"),
            Some("url(\"http://placehold.it/350x150\")")
        );
        assert_eq!(block.get("background-position"), Some("left bottom"));
        assert_eq!(block.get("background-size"), Some("cover"));
        assert_eq!(block.len(), 3);
    }

    #[test]
    fn url_quotes_are_escaped() {
        let block = background_style("a\"b.png", Position::CENTER);
        assert_eq!(block.get("background-image"), Some("url(\"a\\\"b.png\")"));
    }

    #[test]
    fn last_declaration_wins() {
        let mut block = StyleBlock::new();
        block.push("width", "1px");
        block.push("width", "2px");
        assert_eq!(block.get("width"), Some("2px"));
        assert!(!block.is_empty());
    }

    #[test]
    fn negative_zero_renders_plainly() {
        assert_eq!(px(-0.0f64), "0px");
    }
}
