//! Wrapping arrangement: fills a line, then starts another.

use crate::arrangement::{item_rects, Arrangement, ArrangementBase, Placement};
use crate::justify::{justify_and_align, offset_and_spacing, Align, Justify, LineParams, Orientation};
use std::collections::HashMap;
use std::ops::Range;
use tilefx_core::{ItemId, LayoutItem, Rect, Size, SizeHintKind};

/// Split pre-sized items into lines no longer than `available`.
///
/// An item starts a new line when adding it would overflow the current one,
/// unless it is the first item of that line. A zero or negative `available`
/// puts every item on a line of its own.
pub(crate) fn wrap_lines(
    orientation: Orientation,
    placed: &[Placement<'_>],
    available: f32,
    spacing: f32,
) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut position = 0.0;
    for (i, placement) in placed.iter().enumerate() {
        let extent = orientation.main(placement.rect.size());
        if i > start && position + extent > available {
            lines.push(start..i);
            start = i;
            position = 0.0;
        }
        position += extent + spacing;
    }
    if start < placed.len() {
        lines.push(start..placed.len());
    }
    lines
}

/// Places items along the main axis and wraps onto further lines when the
/// available extent runs out.
///
/// `spacing.width` is the gap between items in a horizontal flow and
/// `spacing.height` the gap between its lines; a vertical flow swaps them.
#[derive(Debug)]
pub struct FlowArrangement {
    base: ArrangementBase,
    orientation: Orientation,
    justify: Justify,
    content_justify: Justify,
    align: Align,
    min_item_length: f32,
    stretch_factors: HashMap<ItemId, u32>,
}

impl Default for FlowArrangement {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

impl FlowArrangement {
    /// Create a flow along `orientation`.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: ArrangementBase::new(),
            orientation,
            justify: Justify::Start,
            content_justify: Justify::Start,
            align: Align::Start,
            min_item_length: 0.0,
            stretch_factors: HashMap::new(),
        }
    }

    /// Main axis.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change the main axis.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.base.invalidate();
    }

    /// Distribution within each line.
    #[must_use]
    pub const fn justify(&self) -> Justify {
        self.justify
    }

    /// Change the distribution within each line.
    pub fn set_justify(&mut self, justify: Justify) {
        self.justify = justify;
        self.base.invalidate();
    }

    /// Distribution of whole lines along the cross axis.
    #[must_use]
    pub const fn content_justify(&self) -> Justify {
        self.content_justify
    }

    /// Change how lines are distributed. `Stretch` and `Even` behave as `Start`.
    pub fn set_content_justify(&mut self, justify: Justify) {
        self.content_justify = justify;
        self.base.invalidate();
    }

    /// Cross-axis alignment within a line.
    #[must_use]
    pub const fn align(&self) -> Align {
        self.align
    }

    /// Change the cross-axis alignment within a line.
    pub fn set_align(&mut self, align: Align) {
        self.align = align;
        self.base.invalidate();
    }

    /// Smallest main-axis extent any item is given.
    #[must_use]
    pub const fn min_item_length(&self) -> f32 {
        self.min_item_length
    }

    /// Change the smallest main-axis extent.
    pub fn set_min_item_length(&mut self, length: f32) {
        self.min_item_length = length.max(0.0);
        self.base.invalidate();
    }

    /// Stretch weight of an item; 1 unless set.
    #[must_use]
    pub fn stretch_factor(&self, id: ItemId) -> u32 {
        self.stretch_factors.get(&id).copied().unwrap_or(1)
    }

    /// Set an item's stretch weight. Zero is raised to 1.
    pub fn set_stretch_factor(&mut self, id: ItemId, factor: u32) {
        self.stretch_factors.insert(id, factor.max(1));
        self.base.invalidate();
    }

    /// Gap between items on one line.
    #[must_use]
    pub fn item_spacing(&self) -> f32 {
        self.orientation.main(self.base.spacing())
    }

    /// Set the gap between items on one line.
    pub fn set_item_spacing(&mut self, spacing: f32) {
        match self.orientation {
            Orientation::Horizontal => self.base.set_horizontal_spacing(spacing),
            Orientation::Vertical => self.base.set_vertical_spacing(spacing),
        }
    }

    /// Gap between consecutive lines.
    #[must_use]
    pub fn line_spacing(&self) -> f32 {
        self.orientation.cross(self.base.spacing())
    }

    /// Set the gap between consecutive lines.
    pub fn set_line_spacing(&mut self, spacing: f32) {
        match self.orientation {
            Orientation::Horizontal => self.base.set_vertical_spacing(spacing),
            Orientation::Vertical => self.base.set_horizontal_spacing(spacing),
        }
    }

    fn sized_items<'a>(&self, items: &[&'a dyn LayoutItem]) -> Vec<Placement<'a>> {
        let mut placed = item_rects(SizeHintKind::Preferred, Size::UNCONSTRAINED, items);
        if self.min_item_length > 0.0 {
            let orient = self.orientation;
            for placement in &mut placed {
                let size = placement.rect.size();
                let main = orient.main(size).max(self.min_item_length);
                placement.rect = placement.rect.with_size(orient.size(main, orient.cross(size)));
            }
        }
        placed
    }

    /// Shift whole lines along the cross axis per the content justification.
    fn justify_content(
        &self,
        placed: &mut [Placement<'_>],
        lines: &[Range<usize>],
        used: f32,
        available: f32,
    ) {
        let extra = available - used;
        if available < 0.0 || extra < 1.0 {
            return;
        }
        let (lead, gap) = offset_and_spacing(self.content_justify, extra, lines.len());
        if lead == 0.0 && gap == 0.0 {
            return;
        }
        let (dx, dy) = match self.orientation {
            Orientation::Horizontal => (0.0, 1.0),
            Orientation::Vertical => (1.0, 0.0),
        };
        for (index, line) in lines.iter().enumerate() {
            let shift = lead + gap * index as f32;
            for placement in &mut placed[line.clone()] {
                placement.rect = placement.rect.translated(dx * shift, dy * shift);
            }
        }
    }
}

impl Arrangement for FlowArrangement {
    fn base(&self) -> &ArrangementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ArrangementBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "flow"
    }

    fn arrange<'a>(
        &self,
        _which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        let orient = self.orientation;
        let mut placed = self.sized_items(items);
        if placed.is_empty() {
            return placed;
        }

        let available = orient.main(geometry.size());
        let item_spacing = self.item_spacing();
        let line_spacing = self.line_spacing();
        let lines = wrap_lines(orient, &placed, available, item_spacing);

        let main_origin = orient.main_start(&geometry);
        let cross_origin = orient.cross_start(&geometry);
        let mut cross = 0.0;
        for (index, line) in lines.iter().enumerate() {
            let stretches: Vec<u32> = placed[line.clone()]
                .iter()
                .map(|p| self.stretch_factor(p.id()))
                .collect();
            let params = LineParams {
                orientation: orient,
                origin: orient.point(main_origin, cross_origin + cross),
                available,
                across: None,
                justify: self.justify,
                align: self.align,
                spacing: item_spacing,
            };
            let across = justify_and_align(&mut placed[line.clone()], &params, &stretches);
            tracing::debug!(
                line = index,
                first = line.start,
                len = line.len(),
                across,
                "closed flow line"
            );
            cross += across + line_spacing;
        }

        let used = cross - line_spacing;
        self.justify_content(&mut placed, &lines, used, orient.cross(geometry.size()));
        placed
    }

    fn implicit_size_hint(&self, items: &[&dyn LayoutItem]) -> Size {
        let placed = self.sized_items(items);
        if placed.is_empty() {
            return Size::ZERO;
        }
        let orient = self.orientation;
        let main: f32 = placed.iter().map(|p| orient.main(p.rect.size())).sum();
        let cross = placed
            .iter()
            .map(|p| orient.cross(p.rect.size()))
            .fold(0.0, f32::max);
        orient.size(main + self.item_spacing() * (placed.len() - 1) as f32, cross)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tilefx_core::Point;

    #[derive(Debug)]
    struct Fixed(u64, Size);

    impl LayoutItem for Fixed {
        fn id(&self) -> ItemId {
            ItemId::new(self.0)
        }

        fn size_hint(&self, _which: SizeHintKind, _constraint: Size) -> Size {
            self.1
        }
    }

    fn boxes(widths: &[f32], height: f32) -> Vec<Fixed> {
        widths
            .iter()
            .enumerate()
            .map(|(i, &w)| Fixed(i as u64, Size::new(w, height)))
            .collect()
    }

    fn rects(arr: &FlowArrangement, geometry: Rect, items: &[Fixed]) -> Vec<Rect> {
        let refs: Vec<&dyn LayoutItem> = items.iter().map(|i| i as &dyn LayoutItem).collect();
        arr.rects(SizeHintKind::Preferred, geometry, &refs)
            .iter()
            .map(|p| p.rect)
            .collect()
    }

    #[test]
    fn test_flow_defaults() {
        let arr = FlowArrangement::default();
        assert_eq!(arr.orientation(), Orientation::Horizontal);
        assert_eq!(arr.justify(), Justify::Start);
        assert_eq!(arr.content_justify(), Justify::Start);
        assert_eq!(arr.align(), Align::Start);
    }

    #[test]
    fn test_wraps_onto_second_line() {
        let mut arr = FlowArrangement::default();
        arr.set_spacing(Size::new(10.0, 5.0));
        let items = boxes(&[100.0, 100.0, 100.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 250.0, -1.0), &items);
        assert_eq!(out[0].origin(), Point::new(0.0, 0.0));
        assert_eq!(out[1].origin(), Point::new(110.0, 0.0));
        assert_eq!(out[2].origin(), Point::new(0.0, 25.0));
    }

    #[test]
    fn test_oversized_first_item_stays_on_its_line() {
        let arr = FlowArrangement::default();
        let items = boxes(&[400.0, 50.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 300.0, -1.0), &items);
        assert_eq!(out[0].origin(), Point::ORIGIN);
        assert_eq!(out[1].origin(), Point::new(0.0, 20.0));
    }

    #[test]
    fn test_lines_justified_independently() {
        let mut arr = FlowArrangement::default();
        arr.set_justify(Justify::End);
        let items = boxes(&[100.0, 100.0, 50.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 200.0, -1.0), &items);
        assert_eq!(out[0].x, 0.0);
        assert_eq!(out[2].x, 150.0);
    }

    #[test]
    fn test_align_center_within_line() {
        let mut arr = FlowArrangement::default();
        arr.set_align(Align::Center);
        let items = vec![Fixed(1, Size::new(50.0, 10.0)), Fixed(2, Size::new(50.0, 30.0))];
        let out = rects(&arr, Rect::new(0.0, 0.0, 200.0, -1.0), &items);
        assert_eq!(out[0].y, 10.0);
        assert_eq!(out[1].y, 0.0);
    }

    #[test]
    fn test_min_item_length() {
        let mut arr = FlowArrangement::default();
        arr.set_min_item_length(80.0);
        let items = boxes(&[20.0, 100.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 500.0, -1.0), &items);
        assert_eq!(out[0].width, 80.0);
        assert_eq!(out[1].width, 100.0);
        assert_eq!(out[1].x, 80.0);
    }

    #[test]
    fn test_content_justify_end() {
        let mut arr = FlowArrangement::default();
        arr.set_content_justify(Justify::End);
        let items = boxes(&[100.0, 100.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 150.0, 100.0), &items);
        assert_eq!(out[0].y, 60.0);
        assert_eq!(out[1].y, 80.0);
    }

    #[test]
    fn test_content_justify_space_between() {
        let mut arr = FlowArrangement::default();
        arr.set_content_justify(Justify::SpaceBetween);
        let items = boxes(&[100.0, 100.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 150.0, 100.0), &items);
        assert_eq!(out[0].y, 0.0);
        assert_eq!(out[1].y, 80.0);
    }

    #[test]
    fn test_vertical_flow_wraps_into_columns() {
        let mut arr = FlowArrangement::new(Orientation::Vertical);
        arr.set_line_spacing(4.0);
        let items = vec![
            Fixed(1, Size::new(30.0, 60.0)),
            Fixed(2, Size::new(30.0, 60.0)),
        ];
        let out = rects(&arr, Rect::new(0.0, 0.0, -1.0, 100.0), &items);
        assert_eq!(out[0].origin(), Point::ORIGIN);
        assert_eq!(out[1].origin(), Point::new(34.0, 0.0));
    }

    #[test]
    fn test_degenerate_width_breaks_every_item() {
        let arr = FlowArrangement::default();
        let items = boxes(&[100.0, 100.0, 100.0], 20.0);
        let out = rects(&arr, Rect::new(0.0, 0.0, 0.0, -1.0), &items);
        let ys: Vec<f32> = out.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![0.0, 20.0, 40.0]);
        assert!(out.iter().all(|r| r.x == 0.0));
    }

    #[test]
    fn test_size_hint_for_width() {
        let mut arr = FlowArrangement::default();
        arr.set_line_spacing(5.0);
        let items = boxes(&[100.0, 100.0, 100.0], 20.0);
        let refs: Vec<&dyn LayoutItem> = items.iter().map(|i| i as &dyn LayoutItem).collect();
        let hint = arr.size_hint(SizeHintKind::Preferred, Size::new(200.0, -1.0), &refs);
        assert_eq!(hint, Size::new(200.0, 45.0));
    }

    #[test]
    fn test_implicit_size_hint_is_one_line() {
        let mut arr = FlowArrangement::default();
        arr.set_item_spacing(10.0);
        let items = boxes(&[100.0, 50.0], 20.0);
        let refs: Vec<&dyn LayoutItem> = items.iter().map(|i| i as &dyn LayoutItem).collect();
        let hint = arr.size_hint(SizeHintKind::Preferred, Size::UNCONSTRAINED, &refs);
        assert_eq!(hint, Size::new(160.0, 20.0));
    }

    proptest! {
        #[test]
        fn prop_wrap_breaks_only_on_overflow(
            widths in prop::collection::vec(1.0f32..120.0, 1..30),
            available in 50.0f32..400.0,
            spacing in 0.0f32..20.0
        ) {
            let items = boxes(&widths, 10.0);
            let placed: Vec<Placement<'_>> = items
                .iter()
                .map(|i| Placement::new(i, Rect::from_size(i.1)))
                .collect();
            let lines = wrap_lines(Orientation::Horizontal, &placed, available, spacing);

            let total: usize = lines.iter().map(ExactSizeIterator::len).sum();
            prop_assert_eq!(total, widths.len());
            for (n, line) in lines.iter().enumerate() {
                prop_assert!(!line.is_empty());
                // The items before the last one always fit
                let mut running = 0.0f32;
                for (k, i) in line.clone().enumerate() {
                    if k > 0 {
                        prop_assert!(running + widths[i] <= available);
                    }
                    running += widths[i] + spacing;
                }
                // The line broke because its successor would overflow
                if let Some(next) = lines.get(n + 1) {
                    prop_assert!(running + widths[next.start] > available);
                }
            }
        }
    }
}
