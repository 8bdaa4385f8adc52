#![forbid(unsafe_code)]

//! Inline-style formatting and parsing for the CSS host.
//!
//! The transform and shadow strings use the exact shapes a browser embedder
//! writes to `style.transform` and `style.filter`:
//!
//! ```text
//! translateX(12px) translateY(-4.5px)
//! drop-shadow(rgba(0, 0, 0, 0.2) -8px 0px 0px)
//! ```
//!
//! Parsing is lenient. Anything that does not match reads as a zero offset
//! and is logged at `debug`; a malformed style never aborts a gesture.

use std::sync::OnceLock;

use moveit_core::Offset;
use regex_lite::Regex;

/// Inline `filter` value meaning "no shadow".
pub const FILTER_UNSET: &str = "unset";

/// Shadow colour used for bound feedback.
pub const SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.2)";

fn number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d*\.?\d+").ok()).as_ref()
}

fn axis_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"translate([XY])\(\s*(-?\d*\.?\d+)px\s*\)").ok())
        .as_ref()
}

/// `translateX(..px) translateY(..px)` for `offset`.
#[must_use]
pub fn transform_css(offset: Offset) -> String {
    format!("translateX({}px) translateY({}px)", offset.x, offset.y)
}

/// Bound-feedback shadow displaced by `(dx, dy)`.
#[must_use]
pub fn drop_shadow_css(dx: f64, dy: f64) -> String {
    format!("drop-shadow({SHADOW_COLOR} {dx}px {dy}px 0px)")
}

/// Read the offset back out of a transform string.
///
/// Returns `None` when neither axis is present; a missing axis reads as 0.
#[must_use]
pub fn parse_transform(css: &str) -> Option<Offset> {
    let re = axis_re()?;
    let mut x = None;
    let mut y = None;
    for caps in re.captures_iter(css) {
        let value = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
        match caps.get(1).map(|m| m.as_str()) {
            Some("X") => x = value.or(x),
            Some("Y") => y = value.or(y),
            _ => {}
        }
    }
    if x.is_none() && y.is_none() {
        if !css.is_empty() && css != "none" {
            tracing::debug!(css, "transform did not parse; treating as untransformed");
        }
        return None;
    }
    Some(Offset::new(x.unwrap_or(0.0), y.unwrap_or(0.0)).finite_or_zero())
}

/// Residual shadow offset from a `drop-shadow(...)` filter string.
///
/// The offset is the fifth and sixth numeric token (after the four colour
/// channels). Fewer tokens, or an unset filter, read as zero.
#[must_use]
pub fn parse_drop_shadow_offset(css: &str) -> Offset {
    let Some(re) = number_re() else {
        return Offset::ZERO;
    };
    let mut numbers = re
        .find_iter(css)
        .map(|m| m.as_str().parse::<f64>().unwrap_or(0.0))
        .skip(4);
    match (numbers.next(), numbers.next()) {
        (Some(dx), Some(dy)) => Offset::new(dx, dy).finite_or_zero(),
        _ => {
            if css != FILTER_UNSET && !css.is_empty() {
                tracing::debug!(css, "shadow filter did not parse; residual is zero");
            }
            Offset::ZERO
        }
    }
}
