//! One scrolling axis: anchor <-> pixel mapping with a fixed leading partition.
//!
//! Items `0..fixed_count` are fixed and always shown; the rest scroll. Pixel
//! positions of scrollable items are measured in "scrollable space", where 0
//! is the left (or top) edge of the first scrollable item. The viewport start
//! is the scrollable-space pixel shown at the left edge of the scrollable
//! viewport; it can go negative for a right aligned grid whose content is
//! narrower than the viewport.
//!
//! Left aligned, an anchor `(index, offset)` names the item at the viewport's
//! left edge and how many of its pixels are scrolled out of view. Right
//! aligned, it names the item at the viewport's right edge and how many of its
//! pixels are hidden past that edge.

use serde::Serialize;
use tracing::trace;

/// Which axis a dimension scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Everything a dimension needs to know about its items and the canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisExtents {
    /// Size of every item, fixed ones first.
    pub item_sizes: Vec<f32>,
    pub fixed_count: usize,
    /// Line after each item.
    pub gap: f32,
    /// Line after the last fixed item.
    pub fixed_gap: f32,
    /// Non-scrollable extent before the items (header subgrids).
    pub leading: f32,
    /// Non-scrollable extent after the items (summary subgrids).
    pub trailing: f32,
    pub canvas_extent: f32,
    pub smooth: bool,
    pub right_aligned: bool,
}

/// Scroll position of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollAnchor {
    pub index: usize,
    pub offset: f32,
}

impl ScrollAnchor {
    pub const fn new(index: usize, offset: f32) -> Self {
        Self { index, offset }
    }
}

/// The smallest and largest legal anchors for the current content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollAnchorLimits {
    pub start_anchor_limit_index: usize,
    pub start_anchor_limit_offset: f32,
    pub finish_anchor_limit_index: usize,
    pub finish_anchor_limit_offset: f32,
}

impl ScrollAnchorLimits {
    fn both(anchor: ScrollAnchor) -> Self {
        Self {
            start_anchor_limit_index: anchor.index,
            start_anchor_limit_offset: anchor.offset,
            finish_anchor_limit_index: anchor.index,
            finish_anchor_limit_offset: anchor.offset,
        }
    }

    pub fn start(&self) -> ScrollAnchor {
        ScrollAnchor::new(self.start_anchor_limit_index, self.start_anchor_limit_offset)
    }

    pub fn finish(&self) -> ScrollAnchor {
        ScrollAnchor::new(
            self.finish_anchor_limit_index,
            self.finish_anchor_limit_offset,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScrollDimension {
    axis: Axis,
    extents: AxisExtents,
    valid: bool,
    start: f32,
    size: f32,
    viewport_size: f32,
    overflowed: bool,
    limits: ScrollAnchorLimits,
    /// `lefts[k]` is the scrollable-space start of scrollable item `k`;
    /// one extra entry holds the natural content size.
    lefts: Vec<f32>,
    min_viewport_start: f32,
    max_viewport_start: f32,
    compute_count: u64,
}

impl ScrollDimension {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            extents: AxisExtents::default(),
            valid: false,
            start: 0.0,
            size: 0.0,
            viewport_size: 0.0,
            overflowed: false,
            limits: ScrollAnchorLimits::default(),
            lefts: vec![0.0],
            min_viewport_start: 0.0,
            max_viewport_start: 0.0,
            compute_count: 0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of times the geometry was actually recomputed.
    pub fn compute_count(&self) -> u64 {
        self.compute_count
    }

    /// Pixel offset on the canvas where the scrollable region begins.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Scrollable content size, widened when snapped scrolling needs it.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn viewport_size(&self) -> f32 {
        self.viewport_size
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn anchor_limits(&self) -> ScrollAnchorLimits {
        self.limits
    }

    pub fn extents(&self) -> &AxisExtents {
        &self.extents
    }

    pub fn item_count(&self) -> usize {
        self.extents.item_sizes.len()
    }

    pub fn fixed_count(&self) -> usize {
        self.extents.fixed_count.min(self.item_count())
    }

    pub fn has_scrollable_items(&self) -> bool {
        self.item_count() > self.fixed_count()
    }

    pub fn min_viewport_start(&self) -> f32 {
        self.min_viewport_start
    }

    pub fn max_viewport_start(&self) -> f32 {
        self.max_viewport_start
    }

    /// Anchor at the fixed/scrollable boundary.
    fn boundary_anchor(&self) -> ScrollAnchor {
        let fixed = self.fixed_count();
        if self.extents.right_aligned && self.has_scrollable_items() {
            ScrollAnchor::new(self.item_count() - 1, 0.0)
        } else {
            ScrollAnchor::new(fixed, 0.0)
        }
    }

    /// Re-establish the anchor limits at the fixed/scrollable boundary and
    /// drop cached geometry. The next [`ScrollDimension::ensure_valid`]
    /// recomputes.
    pub fn reset(&mut self) {
        self.limits = ScrollAnchorLimits::both(self.boundary_anchor());
        self.valid = false;
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Recompute if invalidated. Returns whether a computation happened.
    pub fn ensure_valid<F>(&mut self, source: F) -> bool
    where
        F: FnOnce() -> AxisExtents,
    {
        if self.valid {
            return false;
        }
        self.compute(source());
        true
    }

    /// Recompute from `extents` unconditionally.
    pub fn compute(&mut self, extents: AxisExtents) {
        self.extents = extents;
        let fixed = self.fixed_count();
        let count = self.item_count();

        let mut fixed_extent = 0.0;
        for i in 0..fixed {
            fixed_extent += self.item_size(i);
            fixed_extent += if i + 1 == fixed {
                self.extents.fixed_gap
            } else {
                self.extents.gap
            };
        }
        self.start = self.extents.leading + fixed_extent;
        self.viewport_size =
            (self.extents.canvas_extent - self.start - self.extents.trailing).max(0.0);

        self.lefts.clear();
        self.lefts.reserve(count - fixed + 1);
        let mut left = 0.0;
        self.lefts.push(left);
        for i in fixed..count {
            left += self.item_span(i);
            self.lefts.push(left);
        }

        self.calculate_scrollable_size_and_anchor_limits();
        self.valid = true;
        self.compute_count += 1;
        trace!(
            axis = ?self.axis,
            start = self.start,
            size = self.size,
            viewport_size = self.viewport_size,
            overflowed = self.overflowed,
            "scroll dimension computed"
        );
    }

    pub fn item_size(&self, index: usize) -> f32 {
        self.extents.item_sizes.get(index).copied().unwrap_or(0.0)
    }

    /// Size of an item plus the line following it.
    pub fn item_span(&self, index: usize) -> f32 {
        self.item_size(index) + self.extents.gap
    }

    fn natural_size(&self) -> f32 {
        self.lefts.last().copied().unwrap_or(0.0)
    }

    /// Scrollable-space start of scrollable item `index`.
    pub fn scrollable_item_left(&self, index: usize) -> f32 {
        let fixed = self.fixed_count();
        if index < fixed {
            return 0.0;
        }
        self.lefts
            .get(index - fixed)
            .copied()
            .unwrap_or_else(|| self.natural_size())
    }

    /// Scrollable-space end (exclusive, including the following line) of item `index`.
    fn scrollable_item_span_end(&self, index: usize) -> f32 {
        self.scrollable_item_left(index + 1).max(self.scrollable_item_left(index))
    }

    /// Canvas offsets of the fixed items, in order.
    pub fn fixed_item_offsets(&self) -> Vec<f32> {
        let fixed = self.fixed_count();
        let mut offsets = Vec::with_capacity(fixed);
        let mut pos = self.extents.leading;
        for i in 0..fixed {
            offsets.push(pos);
            pos += self.item_size(i) + self.extents.gap;
        }
        offsets
    }

    fn calculate_scrollable_size_and_anchor_limits(&mut self) {
        let natural = self.natural_size();
        self.size = natural;
        self.overflowed = self.has_scrollable_items() && natural > self.viewport_size;

        if !self.overflowed {
            let boundary = self.boundary_anchor();
            self.limits = ScrollAnchorLimits::both(boundary);
            let start = if self.extents.right_aligned {
                natural - self.viewport_size
            } else {
                0.0
            };
            self.min_viewport_start = start;
            self.max_viewport_start = start;
            return;
        }

        let fixed = self.fixed_count();
        let count = self.item_count();
        let last = count - 1;

        if self.extents.right_aligned {
            let finish = ScrollAnchor::new(last, 0.0);
            self.max_viewport_start = natural - self.viewport_size;
            if self.extents.smooth {
                self.min_viewport_start = 0.0;
                let start = self.locate_right_aligned(self.viewport_size);
                self.limits = limits(start, finish);
            } else {
                // Walk forward until the viewport is full.
                let mut filled = 0.0;
                let mut index = fixed;
                while index < count && filled + self.item_span(index) <= self.viewport_size {
                    filled += self.item_span(index);
                    index += 1;
                }
                let start_index = if index == fixed { fixed } else { index - 1 };
                let start_finish = self.scrollable_item_span_end(start_index);
                // Widen so the first item is fully shown at the start limit.
                self.min_viewport_start = start_finish - self.viewport_size;
                self.size = natural - self.min_viewport_start.min(0.0);
                self.limits = limits(ScrollAnchor::new(start_index, 0.0), finish);
            }
        } else {
            let start = ScrollAnchor::new(fixed, 0.0);
            self.min_viewport_start = 0.0;
            if self.extents.smooth {
                self.max_viewport_start = natural - self.viewport_size;
                let finish = self.locate_left_aligned(self.max_viewport_start);
                self.limits = limits(start, finish);
            } else {
                // Walk backward until the viewport is full.
                let mut filled = 0.0;
                let mut index = count;
                while index > fixed && filled + self.item_span(index - 1) <= self.viewport_size {
                    filled += self.item_span(index - 1);
                    index -= 1;
                }
                let finish_index = if index == count { last } else { index };
                let finish_left = self.scrollable_item_left(finish_index);
                // Widen so the last item is fully shown at the finish limit.
                self.size = natural.max(finish_left + self.viewport_size);
                self.max_viewport_start = finish_left.max(natural - self.viewport_size);
                self.max_viewport_start = self.max_viewport_start.min(self.size - self.viewport_size);
                self.limits = limits(start, ScrollAnchor::new(finish_index, 0.0));
            }
        }
    }

    /// Item containing scrollable-space pixel `viewport_start` at the left edge.
    /// Landing exactly on a boundary picks the next item with offset 0.
    fn locate_left_aligned(&self, viewport_start: f32) -> ScrollAnchor {
        let fixed = self.fixed_count();
        let count = self.item_count();
        if count == fixed {
            return ScrollAnchor::new(fixed, 0.0);
        }
        if viewport_start <= 0.0 {
            return ScrollAnchor::new(fixed, 0.0);
        }
        // lefts is sorted; find the last left <= viewport_start.
        let k = self.lefts.partition_point(|&left| left <= viewport_start);
        let scrollable = count - fixed;
        let k = k.saturating_sub(1).min(scrollable - 1);
        let index = fixed + k;
        let left = self.lefts.get(k).copied().unwrap_or(0.0);
        let offset = (viewport_start - left).clamp(0.0, self.item_span(index));
        ScrollAnchor::new(index, offset)
    }

    /// Item containing the viewport's right edge at scrollable-space
    /// `viewport_finish`. Landing exactly on a boundary picks the item ending
    /// there with offset 0.
    fn locate_right_aligned(&self, viewport_finish: f32) -> ScrollAnchor {
        let fixed = self.fixed_count();
        let count = self.item_count();
        if count == fixed {
            return ScrollAnchor::new(fixed, 0.0);
        }
        let scrollable = count - fixed;
        // Item k spans (lefts[k], lefts[k + 1]]; find the first end >= finish.
        let k = self
            .lefts
            .iter()
            .skip(1)
            .position(|&end| end >= viewport_finish)
            .unwrap_or(scrollable - 1)
            .min(scrollable - 1);
        let index = fixed + k;
        let end = self.lefts.get(k + 1).copied().unwrap_or(0.0);
        let offset = (end - viewport_finish).clamp(0.0, self.item_span(index));
        ScrollAnchor::new(index, offset)
    }

    /// Scrollable-space viewport start shown by `anchor`.
    pub fn viewport_start_for_anchor(&self, anchor: ScrollAnchor) -> f32 {
        if self.extents.right_aligned {
            self.scrollable_item_span_end(anchor.index) - anchor.offset - self.viewport_size
        } else {
            self.scrollable_item_left(anchor.index) + anchor.offset
        }
    }

    /// Force an anchor into `[start limit, finish limit]`.
    pub fn clamp_anchor(&self, anchor: ScrollAnchor) -> ScrollAnchor {
        if !self.has_scrollable_items() {
            return self.boundary_anchor();
        }
        let fixed = self.fixed_count();
        let last = self.item_count() - 1;
        let mut anchor = anchor;
        anchor.index = anchor.index.clamp(fixed, last);
        anchor.offset = anchor.offset.clamp(0.0, self.item_span(anchor.index));
        if !self.extents.smooth {
            anchor.offset = 0.0;
        }
        let position = self.viewport_start_for_anchor(anchor);
        let start = self.limits.start();
        let finish = self.limits.finish();
        if position < self.viewport_start_for_anchor(start) {
            start
        } else if position > self.viewport_start_for_anchor(finish) {
            finish
        } else {
            anchor
        }
    }

    /// Anchor that places scrollable-space pixel `viewport_start` at the
    /// viewport's left edge, honouring alignment and smooth/snapped mode.
    pub fn calculate_scroll_anchor(&self, viewport_start: f32) -> ScrollAnchor {
        if !self.has_scrollable_items() {
            return self.boundary_anchor();
        }
        let viewport_start =
            viewport_start.clamp(self.min_viewport_start, self.max_viewport_start.max(self.min_viewport_start));
        let fixed = self.fixed_count();
        let last = self.item_count() - 1;

        let anchor = if self.extents.right_aligned {
            let located = self.locate_right_aligned(viewport_start + self.viewport_size);
            if self.extents.smooth || located.offset <= 0.0 {
                located
            } else if located.offset * 2.0 >= self.item_span(located.index) && located.index > fixed {
                // Mostly hidden past the right edge: anchor the previous item instead.
                ScrollAnchor::new(located.index - 1, 0.0)
            } else {
                ScrollAnchor::new(located.index, 0.0)
            }
        } else {
            let located = self.locate_left_aligned(viewport_start);
            if self.extents.smooth || located.offset <= 0.0 {
                located
            } else if located.offset * 2.0 >= self.item_span(located.index) && located.index < last {
                ScrollAnchor::new(located.index + 1, 0.0)
            } else {
                ScrollAnchor::new(located.index, 0.0)
            }
        };
        self.clamp_anchor(anchor)
    }

    /// Anchor that makes item `index` just fully visible on the side opposite
    /// the anchor: at the right (bottom) edge when `grid_right_aligned` is
    /// false, at the left edge when it is true.
    ///
    /// Only meaningful when the item lies on that opposite side of the current
    /// anchor; callers check this. Fixed or out-of-range items yield the
    /// boundary anchor.
    pub fn calculate_scroll_anchor_to_scroll_into_view(
        &self,
        index: usize,
        grid_right_aligned: bool,
    ) -> ScrollAnchor {
        let fixed = self.fixed_count();
        let count = self.item_count();
        if index < fixed || index >= count {
            return self.clamp_anchor(self.boundary_anchor());
        }

        let viewport_start = if grid_right_aligned {
            if self.extents.smooth {
                self.scrollable_item_left(index)
            } else {
                // Extend rightwards from the item while whole items still fit.
                let mut filled = self.item_span(index);
                let mut last_fitting = index;
                while last_fitting + 1 < count
                    && filled + self.item_span(last_fitting + 1) <= self.viewport_size
                {
                    filled += self.item_span(last_fitting + 1);
                    last_fitting += 1;
                }
                self.scrollable_item_span_end(last_fitting) - self.viewport_size
            }
        } else if self.extents.smooth {
            self.scrollable_item_left(index) + self.item_size(index) - self.viewport_size
        } else {
            // Extend leftwards from the item while whole items still fit.
            let mut filled = self.item_size(index);
            let mut first_fitting = index;
            while first_fitting > fixed
                && filled + self.item_span(first_fitting - 1) <= self.viewport_size
            {
                filled += self.item_span(first_fitting - 1);
                first_fitting -= 1;
            }
            self.scrollable_item_left(first_fitting)
        };

        self.calculate_scroll_anchor(viewport_start)
    }

    /// Step the anchor by `delta` whole items, clamped to the limits.
    pub fn step_anchor(&self, anchor: ScrollAnchor, delta: isize) -> ScrollAnchor {
        let index = if delta < 0 {
            anchor.index.saturating_sub(delta.unsigned_abs())
        } else {
            anchor.index.saturating_add(delta.unsigned_abs())
        };
        self.clamp_anchor(ScrollAnchor::new(index, 0.0))
    }
}

fn limits(start: ScrollAnchor, finish: ScrollAnchor) -> ScrollAnchorLimits {
    ScrollAnchorLimits {
        start_anchor_limit_index: start.index,
        start_anchor_limit_offset: start.offset,
        finish_anchor_limit_index: finish.index,
        finish_anchor_limit_offset: finish.offset,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn extents(sizes: &[f32], fixed: usize, canvas: f32, smooth: bool, right: bool) -> AxisExtents {
        AxisExtents {
            item_sizes: sizes.to_vec(),
            fixed_count: fixed,
            gap: 0.0,
            fixed_gap: 0.0,
            leading: 0.0,
            trailing: 0.0,
            canvas_extent: canvas,
            smooth,
            right_aligned: right,
        }
    }

    fn dim(sizes: &[f32], fixed: usize, canvas: f32, smooth: bool, right: bool) -> ScrollDimension {
        let mut d = ScrollDimension::new(Axis::Horizontal);
        d.compute(extents(sizes, fixed, canvas, smooth, right));
        d
    }

    #[test]
    fn not_overflowed_limits_sit_on_boundary() {
        let d = dim(&[50.0, 50.0, 50.0], 1, 400.0, true, false);
        assert!(!d.overflowed());
        assert_eq!(d.anchor_limits().start(), ScrollAnchor::new(1, 0.0));
        assert_eq!(d.anchor_limits().finish(), ScrollAnchor::new(1, 0.0));
        assert_eq!(d.start(), 50.0);
        assert_eq!(d.viewport_size(), 350.0);
    }

    #[test]
    fn smooth_left_aligned_keeps_offset() {
        let d = dim(&[100.0; 5], 0, 250.0, true, false);
        assert!(d.overflowed());
        assert_eq!(d.calculate_scroll_anchor(130.0), ScrollAnchor::new(1, 30.0));
        assert_eq!(d.anchor_limits().finish(), ScrollAnchor::new(2, 50.0));
    }

    #[test]
    fn exact_grid_line_resolves_to_next_item() {
        let d = dim(&[100.0; 5], 0, 250.0, true, false);
        assert_eq!(d.calculate_scroll_anchor(200.0), ScrollAnchor::new(2, 0.0));
    }

    #[test]
    fn snapped_rounds_to_nearest_item() {
        let d = dim(&[100.0; 5], 0, 250.0, false, false);
        assert_eq!(d.calculate_scroll_anchor(30.0), ScrollAnchor::new(0, 0.0));
        assert_eq!(d.calculate_scroll_anchor(60.0), ScrollAnchor::new(1, 0.0));
    }

    #[test]
    fn snapped_widens_size_for_last_item() {
        let d = dim(&[100.0; 5], 0, 250.0, false, false);
        // Two whole items fit, so the finish limit is item 3 and the content
        // is widened from 500 to 300 + 250.
        assert_eq!(d.anchor_limits().finish(), ScrollAnchor::new(3, 0.0));
        assert_eq!(d.size(), 550.0);
        assert_eq!(d.calculate_scroll_anchor(10_000.0), ScrollAnchor::new(3, 0.0));
    }

    #[test]
    fn right_aligned_not_overflowed_anchors_last_item() {
        let d = dim(&[100.0, 100.0], 0, 500.0, true, true);
        assert_eq!(d.anchor_limits().start(), ScrollAnchor::new(1, 0.0));
        assert_eq!(d.viewport_start_for_anchor(ScrollAnchor::new(1, 0.0)), -300.0);
    }

    #[test]
    fn right_aligned_mirrors_left_aligned() {
        let d = dim(&[100.0; 5], 0, 250.0, true, true);
        assert_eq!(d.anchor_limits().finish(), ScrollAnchor::new(4, 0.0));
        assert_eq!(d.anchor_limits().start(), ScrollAnchor::new(2, 50.0));
        // Viewport [130, 380): right edge inside item 3 with 20 px hidden.
        assert_eq!(d.calculate_scroll_anchor(130.0), ScrollAnchor::new(3, 20.0));
        // Right edge exactly on the 300 grid line: item 2, nothing hidden.
        assert_eq!(d.calculate_scroll_anchor(50.0), ScrollAnchor::new(2, 0.0));
    }

    #[test]
    fn scroll_into_view_snapped_left_aligned() {
        let d = dim(&[100.0; 6], 0, 250.0, false, false);
        assert_eq!(
            d.calculate_scroll_anchor_to_scroll_into_view(5, false),
            ScrollAnchor::new(4, 0.0)
        );
        assert_eq!(
            d.calculate_scroll_anchor_to_scroll_into_view(3, false),
            ScrollAnchor::new(2, 0.0)
        );
    }

    #[test]
    fn scroll_into_view_smooth_left_aligned_aligns_right_edge() {
        let d = dim(&[100.0; 6], 0, 250.0, true, false);
        let anchor = d.calculate_scroll_anchor_to_scroll_into_view(3, false);
        assert_eq!(anchor, ScrollAnchor::new(1, 50.0));
        assert_eq!(d.viewport_start_for_anchor(anchor) + 250.0, 400.0);
    }

    #[test]
    fn scroll_into_view_right_aligned_places_item_at_left_edge() {
        let d = dim(&[100.0; 6], 0, 250.0, true, true);
        let anchor = d.calculate_scroll_anchor_to_scroll_into_view(1, true);
        assert_eq!(d.viewport_start_for_anchor(anchor), 100.0);
    }

    #[test]
    fn step_anchor_clamps() {
        let d = dim(&[100.0; 5], 1, 250.0, false, false);
        let a = d.step_anchor(ScrollAnchor::new(1, 0.0), -1);
        assert_eq!(a, ScrollAnchor::new(1, 0.0));
        let a = d.step_anchor(ScrollAnchor::new(1, 0.0), 10);
        assert_eq!(a, d.anchor_limits().finish());
    }

    #[test]
    fn ensure_valid_is_memoised() {
        let mut d = ScrollDimension::new(Axis::Vertical);
        assert!(d.ensure_valid(|| extents(&[10.0], 0, 5.0, true, false)));
        assert!(!d.ensure_valid(|| extents(&[99.0], 0, 5.0, true, false)));
        assert_eq!(d.size(), 10.0);
        d.invalidate();
        assert!(d.ensure_valid(|| extents(&[99.0], 0, 5.0, true, false)));
        assert_eq!(d.size(), 99.0);
    }

    #[test]
    fn reset_puts_limits_on_fixed_boundary() {
        let mut d = dim(&[100.0; 10], 2, 250.0, true, false);
        d.reset();
        assert_eq!(d.anchor_limits().start(), ScrollAnchor::new(2, 0.0));
        assert_eq!(d.anchor_limits().finish(), ScrollAnchor::new(2, 0.0));
        assert!(!d.is_valid());
    }

    #[test]
    fn gaps_count_towards_spans() {
        let mut d = ScrollDimension::new(Axis::Horizontal);
        d.compute(AxisExtents {
            gap: 1.0,
            fixed_gap: 2.0,
            ..extents(&[10.0, 10.0, 10.0], 1, 100.0, true, false)
        });
        assert_eq!(d.start(), 12.0);
        assert_eq!(d.scrollable_item_left(2), 11.0);
        assert_eq!(d.size(), 22.0);
    }
}
