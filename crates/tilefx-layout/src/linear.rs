//! Single-row or single-column arrangement.

use crate::arrangement::{item_rects, Arrangement, ArrangementBase, Placement};
use crate::justify::{justify_and_align, Align, Justify, LineParams, Orientation};
use std::collections::HashMap;
use tilefx_core::{ItemId, LayoutItem, Rect, Size, SizeHintKind};

/// Lay `items` out as one line filling `geometry`.
///
/// Items are sized with only the cross axis fixed, then handed to the line
/// solver with the full main-axis extent.
pub(crate) fn arrange_line<'a>(
    which: SizeHintKind,
    geometry: Rect,
    items: &[&'a dyn LayoutItem],
    style: LineStyle,
    stretch_of: impl Fn(ItemId) -> u32,
) -> Vec<Placement<'a>> {
    let orientation = style.orientation;
    let constraint = orientation.cross_constraint(geometry.size());
    let mut placed = item_rects(which, constraint, items);
    if placed.is_empty() {
        return placed;
    }

    let stretches: Vec<u32> = placed.iter().map(|p| stretch_of(p.id())).collect();
    let cross = orientation.cross(geometry.size());
    let params = LineParams {
        orientation,
        origin: geometry.origin(),
        available: orientation.main(geometry.size()),
        across: (cross >= 0.0).then_some(cross),
        justify: style.justify,
        align: style.align,
        spacing: style.spacing,
    };
    justify_and_align(&mut placed, &params, &stretches);
    placed
}

/// Natural size of a single line: summed along the main axis with spacing,
/// maximum across.
pub(crate) fn line_extent(orientation: Orientation, spacing: f32, items: &[&dyn LayoutItem]) -> Size {
    let rects = item_rects(SizeHintKind::Preferred, Size::UNCONSTRAINED, items);
    if rects.is_empty() {
        return Size::ZERO;
    }
    let main: f32 = rects.iter().map(|p| orientation.main(p.rect.size())).sum();
    let cross = rects
        .iter()
        .map(|p| orientation.cross(p.rect.size()))
        .fold(0.0, f32::max);
    orientation.size(main + spacing * (rects.len() - 1) as f32, cross)
}

/// Everything the line solver needs besides geometry and items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineStyle {
    pub(crate) orientation: Orientation,
    pub(crate) justify: Justify,
    pub(crate) align: Align,
    pub(crate) spacing: f32,
}

/// Places items side by side in a single row or column.
///
/// Defaults to a vertical stack with start justification and stretched
/// cross alignment.
#[derive(Debug)]
pub struct LinearArrangement {
    base: ArrangementBase,
    orientation: Orientation,
    justify: Justify,
    align: Align,
    stretch_factors: HashMap<ItemId, u32>,
}

impl Default for LinearArrangement {
    fn default() -> Self {
        Self::new(Orientation::Vertical)
    }
}

impl LinearArrangement {
    /// Create an arrangement along `orientation`.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: ArrangementBase::new(),
            orientation,
            justify: Justify::Start,
            align: Align::Stretch,
            stretch_factors: HashMap::new(),
        }
    }

    /// A left-to-right row.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// A top-to-bottom column.
    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
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

    /// Main-axis distribution.
    #[must_use]
    pub const fn justify(&self) -> Justify {
        self.justify
    }

    /// Change the main-axis distribution.
    pub fn set_justify(&mut self, justify: Justify) {
        self.justify = justify;
        self.base.invalidate();
    }

    /// Cross-axis alignment.
    #[must_use]
    pub const fn align(&self) -> Align {
        self.align
    }

    /// Change the cross-axis alignment.
    pub fn set_align(&mut self, align: Align) {
        self.align = align;
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

    /// Gap between adjacent items along the main axis.
    #[must_use]
    pub fn item_spacing(&self) -> f32 {
        self.orientation.main(self.base.spacing())
    }

    /// Set the gap along the main axis.
    pub fn set_item_spacing(&mut self, spacing: f32) {
        match self.orientation {
            Orientation::Horizontal => self.base.set_horizontal_spacing(spacing),
            Orientation::Vertical => self.base.set_vertical_spacing(spacing),
        }
    }

    fn style(&self) -> LineStyle {
        LineStyle {
            orientation: self.orientation,
            justify: self.justify,
            align: self.align,
            spacing: self.item_spacing(),
        }
    }
}

impl Arrangement for LinearArrangement {
    fn base(&self) -> &ArrangementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ArrangementBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "linear"
    }

    fn arrange<'a>(
        &self,
        which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        arrange_line(which, geometry, items, self.style(), |id| self.stretch_factor(id))
    }

    fn implicit_size_hint(&self, items: &[&dyn LayoutItem]) -> Size {
        line_extent(self.orientation, self.item_spacing(), items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilefx_core::{Margins, Point};

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

    fn three() -> [Fixed; 3] {
        [
            Fixed(1, Size::new(100.0, 20.0)),
            Fixed(2, Size::new(100.0, 20.0)),
            Fixed(3, Size::new(100.0, 20.0)),
        ]
    }

    fn rects(arr: &LinearArrangement, geometry: Rect, items: &[Fixed]) -> Vec<Rect> {
        let refs: Vec<&dyn LayoutItem> = items.iter().map(|i| i as &dyn LayoutItem).collect();
        arr.rects(SizeHintKind::Preferred, geometry, &refs)
            .iter()
            .map(|p| p.rect)
            .collect()
    }

    #[test]
    fn test_linear_defaults() {
        let arr = LinearArrangement::default();
        assert_eq!(arr.orientation(), Orientation::Vertical);
        assert_eq!(arr.justify(), Justify::Start);
        assert_eq!(arr.align(), Align::Stretch);
        assert_eq!(arr.stretch_factor(ItemId::new(9)), 1);
    }

    #[test]
    fn test_horizontal_start() {
        let arr = LinearArrangement::horizontal();
        let out = rects(&arr, Rect::new(0.0, 0.0, 300.0, 20.0), &three());
        let xs: Vec<f32> = out.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0]);
    }

    #[test]
    fn test_horizontal_space_between() {
        let mut arr = LinearArrangement::horizontal();
        arr.set_justify(Justify::SpaceBetween);
        let out = rects(&arr, Rect::new(0.0, 0.0, 320.0, 20.0), &three());
        let xs: Vec<f32> = out.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 110.0, 220.0]);
    }

    #[test]
    fn test_vertical_stretch_fills_width() {
        let arr = LinearArrangement::vertical();
        let items = [Fixed(1, Size::new(50.0, 20.0)), Fixed(2, Size::new(80.0, 30.0))];
        let out = rects(&arr, Rect::new(0.0, 0.0, 200.0, 400.0), &items);
        assert_eq!(out[0], Rect::new(0.0, 0.0, 200.0, 20.0));
        assert_eq!(out[1], Rect::new(0.0, 20.0, 200.0, 30.0));
    }

    #[test]
    fn test_stretch_factors_weight_growth() {
        let mut arr = LinearArrangement::horizontal();
        arr.set_justify(Justify::Stretch);
        arr.set_stretch_factor(ItemId::new(2), 3);
        let items = [Fixed(1, Size::new(0.0, 20.0)), Fixed(2, Size::new(0.0, 20.0))];
        let out = rects(&arr, Rect::new(0.0, 0.0, 400.0, 20.0), &items);
        assert_eq!(out[0].width, 100.0);
        assert_eq!(out[1].width, 300.0);
        assert_eq!(out[1].x, 100.0);
    }

    #[test]
    fn test_zero_stretch_factor_is_raised() {
        let mut arr = LinearArrangement::horizontal();
        arr.set_stretch_factor(ItemId::new(1), 0);
        assert_eq!(arr.stretch_factor(ItemId::new(1)), 1);
    }

    #[test]
    fn test_margins_and_origin() {
        let mut arr = LinearArrangement::horizontal();
        arr.set_margins(Margins::new(10.0, 5.0, 10.0, 5.0));
        arr.set_item_spacing(4.0);
        let items = [Fixed(1, Size::new(30.0, 10.0)), Fixed(2, Size::new(30.0, 10.0))];
        let out = rects(&arr, Rect::new(100.0, 100.0, 200.0, 30.0), &items);
        assert_eq!(out[0].origin(), Point::new(110.0, 105.0));
        assert_eq!(out[1].origin(), Point::new(144.0, 105.0));
    }

    #[test]
    fn test_item_spacing_follows_orientation() {
        let mut arr = LinearArrangement::vertical();
        arr.set_spacing(Size::new(3.0, 7.0));
        assert_eq!(arr.item_spacing(), 7.0);
        arr.set_orientation(Orientation::Horizontal);
        assert_eq!(arr.item_spacing(), 3.0);
    }

    #[test]
    fn test_size_hint_for_width() {
        let mut arr = LinearArrangement::vertical();
        arr.set_item_spacing(5.0);
        let items = three();
        let refs: Vec<&dyn LayoutItem> = items.iter().map(|i| i as &dyn LayoutItem).collect();
        let hint = arr.size_hint(SizeHintKind::Preferred, Size::new(150.0, -1.0), &refs);
        assert_eq!(hint, Size::new(150.0, 70.0));
    }

    #[test]
    fn test_implicit_size_hint() {
        let mut arr = LinearArrangement::horizontal();
        arr.set_item_spacing(10.0);
        let items = three();
        let refs: Vec<&dyn LayoutItem> = items.iter().map(|i| i as &dyn LayoutItem).collect();
        let hint = arr.size_hint(SizeHintKind::Preferred, Size::UNCONSTRAINED, &refs);
        assert_eq!(hint, Size::new(320.0, 20.0));
    }

    #[test]
    fn test_setters_invalidate() {
        let mut arr = LinearArrangement::horizontal();
        assert!(!arr.take_invalidated());
        arr.set_align(Align::Center);
        assert!(arr.take_invalidated());
    }
}
