//! Scroll offset that keeps the focused line inside a padded window.

/// Rows kept between the focused line and either window edge.
pub const SCROLL_PADDING: usize = 2;

/// Return the scroll offset for a window of `height` rows over `total` lines
/// so that line `focus` stays at least `SCROLL_PADDING` rows from the edges.
///
/// A scroll that is already far enough is kept unchanged; an out-of-range
/// scroll is clamped first.
pub fn follow(total: usize, height: usize, scroll: usize, focus: usize) -> usize {
    let height = height.max(1);
    let max_scroll = total.saturating_sub(height);
    let scroll = scroll.min(max_scroll);
    if focus < scroll + SCROLL_PADDING {
        return focus.saturating_sub(SCROLL_PADDING);
    }
    if focus + SCROLL_PADDING >= scroll + height {
        return (focus + SCROLL_PADDING + 1)
            .saturating_sub(height)
            .min(max_scroll);
    }
    scroll
}

/// The half-open range of line indices shown for `scroll` and `height`.
pub fn window(total: usize, height: usize, scroll: usize) -> std::ops::Range<usize> {
    let start = scroll.min(total);
    let end = (start + height).min(total);
    start..end
}
