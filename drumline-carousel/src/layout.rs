//! Windowed layout math: which rows intersect the viewport, and where
//! their cards sit.

use std::ops::Range;

use crate::config::CarouselConfig;

/// Where a card sits within the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    /// Offset from the viewport top, in pixels.
    pub top: f32,
    /// Offset from the viewport's right edge, in pixels. Negative values
    /// push the card outward along the bow.
    pub right: f32,
}

/// Rows intersecting the viewport at `scroll`, as an inclusive-exclusive
/// range of indices into the filtered sequence.
///
/// The window is offset so the row whose offset equals `scroll` sits in
/// the middle of the viewport rather than at its top; at rest that row is
/// the selection.
pub fn render_range(
    scroll: f32,
    viewport_height: f32,
    item_height: f32,
    total: usize,
) -> Range<usize> {
    if total == 0 || item_height <= 0.0 {
        return 0..0;
    }
    let visible_start = scroll - (viewport_height - item_height) * 0.5;
    let visible_end = visible_start + viewport_height;

    let end = ((visible_end / item_height).ceil().max(0.0) as usize).min(total);
    let start = ((visible_start / item_height).floor().max(0.0) as usize).min(end);
    start..end
}

/// Position of row `index` at the given scroll offset.
///
/// Vertically, the centering offset cancels exactly on the row the scroll
/// rests on. Horizontally, rows are pushed outward along a cosine bow that
/// saturates once the row is `arc_radius_y` away from the vertical center.
pub fn place_card(
    index: usize,
    scroll: f32,
    viewport_height: f32,
    config: &CarouselConfig,
) -> CardPlacement {
    let y = index as f32 * config.item_height - scroll;
    let top = y + (viewport_height - config.item_height) * 0.5;

    let arc = (y / config.arc_radius_y).clamp(-1.0, 1.0);
    let right = ((arc * std::f32::consts::FRAC_PI_2).cos() - 1.0) * config.arc_depth_x;

    CardPlacement { top, right }
}
