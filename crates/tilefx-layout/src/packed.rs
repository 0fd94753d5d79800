//! Arrangements driven by the free-rectangle [`Packer`].

use crate::arrangement::{item_rects, visible_items, Arrangement, ArrangementBase, Placement};
use crate::justify::Orientation;
use crate::packer::Packer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tilefx_core::{ItemId, LayoutItem, Point, Rect, Size, SizeHintKind};

/// Default grid cell size.
pub const DEFAULT_CELL_SIZE: Size = Size::new(90.0, 50.0);

/// Cell count used along an axis that has no extent to divide.
const UNBOUNDED_CELLS: usize = 99_999;

/// Packer for a container, unbounded along the orientation's cross axis.
fn packer_for(orientation: Orientation, main_extent: f32) -> Packer {
    match orientation {
        Orientation::Horizontal => Packer::with_orientation(main_extent, f32::INFINITY, orientation),
        Orientation::Vertical => Packer::with_orientation(f32::INFINITY, main_extent, orientation),
    }
}

/// Place `size` densely or on the running line, appending when neither fits.
fn place(packer: &mut Packer, dense: bool, size: Size) -> Rect {
    let packed = if dense {
        packer.pack(size)
    } else {
        packer.line_pack(size)
    };
    packed.unwrap_or_else(|| packer.append(size))
}

/// Packs items at their preferred sizes, either into the first hole that
/// fits (dense) or strictly row by row in arrival order.
///
/// Half the spacing is trimmed from every side of each rectangle, so two
/// neighbours end up a full spacing apart.
#[derive(Debug)]
pub struct PackedArrangement {
    base: ArrangementBase,
    orientation: Orientation,
    dense: bool,
}

impl Default for PackedArrangement {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

impl PackedArrangement {
    /// Create a dense packed arrangement filling along `orientation`.
    #[must_use]
    pub const fn new(orientation: Orientation) -> Self {
        Self {
            base: ArrangementBase::new(),
            orientation,
            dense: true,
        }
    }

    /// Fill direction.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change the fill direction.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.base.invalidate();
    }

    /// Whether later items may fill holes left earlier.
    #[must_use]
    pub const fn dense(&self) -> bool {
        self.dense
    }

    /// Toggle hole filling.
    pub fn set_dense(&mut self, dense: bool) {
        self.dense = dense;
        self.base.invalidate();
    }
}

impl Arrangement for PackedArrangement {
    fn base(&self) -> &ArrangementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ArrangementBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "packed"
    }

    fn arrange<'a>(
        &self,
        which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        let orient = self.orientation;
        let mut placed = item_rects(which, orient.cross_constraint(geometry.size()), items);
        let mut packer = packer_for(orient, orient.main(geometry.size()));
        let half_h = self.base.spacing().width / 2.0;
        let half_v = self.base.spacing().height / 2.0;

        for placement in &mut placed {
            let rect = place(&mut packer, self.dense, placement.rect.size());
            placement.rect = rect
                .adjusted(half_h, half_v, -half_h, -half_v)
                .translated(geometry.x, geometry.y);
        }
        placed
    }
}

/// A grid position. Negative values count back from the last column or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column index
    pub column: i32,
    /// Row index
    pub row: i32,
}

impl GridPos {
    /// Create a grid position.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }
}

/// How many cells an item covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    /// Columns covered
    pub columns: u32,
    /// Rows covered
    pub rows: u32,
}

impl Default for Span {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }
}

/// Cells that fit `available` when each takes `cell` plus `gap`.
fn cells_fitting(available: f32, cell: f32, gap: f32) -> usize {
    let count = ((available + gap) / (cell + gap)).floor();
    if count >= 1.0 {
        count as usize
    } else {
        1
    }
}

/// Packs items onto a grid of uniform cells. Items may span several cells
/// and may be pinned to a cell; pinned items are placed first.
#[derive(Debug)]
pub struct PackedGridArrangement {
    base: ArrangementBase,
    orientation: Orientation,
    dense: bool,
    cell_size: Size,
    stretch: bool,
    positions: HashMap<ItemId, GridPos>,
    spans: HashMap<ItemId, Span>,
}

impl Default for PackedGridArrangement {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

impl PackedGridArrangement {
    /// Create a dense grid filling along `orientation`.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: ArrangementBase::new(),
            orientation,
            dense: true,
            cell_size: DEFAULT_CELL_SIZE,
            stretch: true,
            positions: HashMap::new(),
            spans: HashMap::new(),
        }
    }

    /// Fill direction.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change the fill direction.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.base.invalidate();
    }

    /// Whether later items may fill holes left earlier.
    #[must_use]
    pub const fn dense(&self) -> bool {
        self.dense
    }

    /// Toggle hole filling.
    pub fn set_dense(&mut self, dense: bool) {
        self.dense = dense;
        self.base.invalidate();
    }

    /// Unstretched cell size.
    #[must_use]
    pub const fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Change the cell size.
    pub fn set_cell_size(&mut self, size: Size) {
        self.cell_size = size;
        self.base.invalidate();
    }

    /// Change the cell width only.
    pub fn set_column_width(&mut self, width: f32) {
        self.cell_size.width = width;
        self.base.invalidate();
    }

    /// Change the cell height only.
    pub fn set_row_height(&mut self, height: f32) {
        self.cell_size.height = height;
        self.base.invalidate();
    }

    /// Whether cells grow to use the whole main-axis extent.
    #[must_use]
    pub const fn stretch(&self) -> bool {
        self.stretch
    }

    /// Toggle cell stretching.
    pub fn set_stretch(&mut self, stretch: bool) {
        self.stretch = stretch;
        self.base.invalidate();
    }

    /// Pinned cell of an item, if any.
    #[must_use]
    pub fn item_pos(&self, id: ItemId) -> Option<GridPos> {
        self.positions.get(&id).copied()
    }

    /// Pin an item to a cell, or unpin it with `None`.
    pub fn set_item_pos(&mut self, id: ItemId, pos: Option<GridPos>) {
        match pos {
            Some(pos) => self.positions.insert(id, pos),
            None => self.positions.remove(&id),
        };
        self.base.invalidate();
    }

    /// Span of an item; one cell unless set.
    #[must_use]
    pub fn item_spans(&self, id: ItemId) -> Span {
        self.spans.get(&id).copied().unwrap_or_default()
    }

    /// Set both spans of an item.
    pub fn set_item_spans(&mut self, id: ItemId, span: Span) {
        self.spans.insert(id, span);
        self.base.invalidate();
    }

    /// Set the column span of an item.
    pub fn set_item_column_span(&mut self, id: ItemId, columns: u32) {
        let span = Span {
            columns,
            ..self.item_spans(id)
        };
        self.set_item_spans(id, span);
    }

    /// Set the row span of an item.
    pub fn set_item_row_span(&mut self, id: ItemId, rows: u32) {
        let span = Span {
            rows,
            ..self.item_spans(id)
        };
        self.set_item_spans(id, span);
    }

    /// Top-left corner of `pos` on a grid of `cell`-sized cells with at most
    /// `max_columns` columns and `max_rows` rows.
    #[must_use]
    pub fn cell_pos(&self, pos: GridPos, cell: Size, max_columns: usize, max_rows: usize) -> Point {
        let resolve = |index: i32, count: usize| -> f32 {
            let index = i64::from(index);
            let resolved = if index < 0 { count as i64 + index } else { index };
            resolved as f32
        };
        let spacing = self.base.spacing();
        Point::new(
            resolve(pos.column, max_columns) * (cell.width + spacing.width),
            resolve(pos.row, max_rows) * (cell.height + spacing.height),
        )
    }

    /// Extent of `span` cells of size `cell`, including the gaps between
    /// them.
    #[must_use]
    pub fn span_size(&self, span: Span, cell: Size) -> Size {
        let spacing = self.base.spacing();
        Size::new(
            span.columns as f32 * (cell.width + spacing.width) - spacing.width,
            span.rows as f32 * (cell.height + spacing.height) - spacing.height,
        )
    }

    /// Effective cell size and the `(columns, rows)` ceilings for a
    /// main-axis extent.
    fn grid_metrics(&self, main_extent: f32) -> (Size, usize, usize) {
        let spacing = self.base.spacing();
        let mut cell = self.cell_size;
        let (mut max_columns, mut max_rows) = (UNBOUNDED_CELLS, UNBOUNDED_CELLS);
        if main_extent > 0.0 {
            match self.orientation {
                Orientation::Horizontal => {
                    max_columns = cells_fitting(main_extent, cell.width, spacing.width);
                    if self.stretch {
                        let share = (main_extent + spacing.width) / max_columns as f32;
                        cell.width = cell.width.max(share - spacing.width);
                    }
                }
                Orientation::Vertical => {
                    max_rows = cells_fitting(main_extent, cell.height, spacing.height);
                    if self.stretch {
                        let share = (main_extent + spacing.height) / max_rows as f32;
                        cell.height = cell.height.max(share - spacing.height);
                    }
                }
            }
        }
        (cell, max_columns, max_rows)
    }
}

impl Arrangement for PackedGridArrangement {
    fn base(&self) -> &ArrangementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ArrangementBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "packed_grid"
    }

    fn arrange<'a>(
        &self,
        _which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        let orient = self.orientation;
        let spacing = self.base.spacing();
        let main_extent = orient.main(geometry.size());
        let (cell, max_columns, max_rows) = self.grid_metrics(main_extent);

        let visible = visible_items(items);
        let footprints: Vec<Size> = visible
            .iter()
            .map(|item| {
                let span = self.item_spans(item.id());
                let span = Span::new(
                    span.columns.clamp(1, u32::try_from(max_columns).unwrap_or(u32::MAX)),
                    span.rows.clamp(1, u32::try_from(max_rows).unwrap_or(u32::MAX)),
                );
                let size = self.span_size(span, cell);
                Size::new(size.width + spacing.width, size.height + spacing.height)
            })
            .collect();

        let main_gap = orient.main(spacing);
        let mut packer = packer_for(orient, (main_extent + main_gap).max(0.0));
        let mut rects: Vec<Option<Rect>> = vec![None; visible.len()];

        for (i, item) in visible.iter().enumerate() {
            if let Some(pos) = self.item_pos(item.id()) {
                let corner = self.cell_pos(pos, cell, max_columns, max_rows);
                rects[i] = packer.pack_at(footprints[i], corner.x, corner.y);
                if rects[i].is_none() {
                    tracing::debug!(item = %item.id(), ?pos, "pinned cell unavailable");
                }
            }
        }
        for (slot, &footprint) in rects.iter_mut().zip(&footprints) {
            if slot.is_none() {
                *slot = Some(place(&mut packer, self.dense, footprint));
            }
        }

        visible
            .into_iter()
            .zip(rects)
            .map(|(item, rect)| {
                let rect = rect
                    .unwrap_or_default()
                    .adjusted(0.0, 0.0, -spacing.width, -spacing.height)
                    .translated(geometry.x, geometry.y);
                Placement::new(item, rect)
            })
            .collect()
    }

    fn implicit_size_hint(&self, items: &[&dyn LayoutItem]) -> Size {
        // One line of single cells
        if items.is_empty() {
            return Size::ZERO;
        }
        let count = items.len() as f32;
        let spacing = self.base.spacing();
        match self.orientation {
            Orientation::Horizontal => Size::new(
                self.cell_size.width * count + spacing.width * (count - 1.0),
                self.cell_size.height,
            ),
            Orientation::Vertical => Size::new(
                self.cell_size.width,
                self.cell_size.height * count + spacing.height * (count - 1.0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn refs(items: &[Fixed]) -> Vec<&dyn LayoutItem> {
        items.iter().map(|i| i as &dyn LayoutItem).collect()
    }

    fn rects(arr: &dyn Arrangement, geometry: Rect, items: &[Fixed]) -> Vec<Rect> {
        arr.rects(SizeHintKind::Preferred, geometry, &refs(items))
            .iter()
            .map(|p| p.rect)
            .collect()
    }

    fn cells(n: u64) -> Vec<Fixed> {
        (0..n).map(|i| Fixed(i, Size::new(10.0, 10.0))).collect()
    }

    #[test]
    fn test_packed_defaults() {
        let arr = PackedArrangement::default();
        assert_eq!(arr.orientation(), Orientation::Horizontal);
        assert!(arr.dense());
    }

    #[test]
    fn test_packed_dense_fills_holes() {
        let arr = PackedArrangement::default();
        let items = vec![
            Fixed(1, Size::new(60.0, 40.0)),
            Fixed(2, Size::new(60.0, 20.0)),
            Fixed(3, Size::new(30.0, 30.0)),
        ];
        let out = rects(&arr, Rect::new(0.0, 0.0, 100.0, -1.0), &items);
        assert_eq!(out[0], Rect::new(0.0, 0.0, 60.0, 40.0));
        assert_eq!(out[1], Rect::new(0.0, 40.0, 60.0, 20.0));
        assert_eq!(out[2], Rect::new(60.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn test_packed_line_mode_keeps_order() {
        let mut arr = PackedArrangement::default();
        arr.set_dense(false);
        let items = vec![
            Fixed(1, Size::new(60.0, 40.0)),
            Fixed(2, Size::new(60.0, 20.0)),
            Fixed(3, Size::new(30.0, 30.0)),
        ];
        let out = rects(&arr, Rect::new(0.0, 0.0, 100.0, -1.0), &items);
        assert_eq!(out[0], Rect::new(0.0, 0.0, 60.0, 40.0));
        assert_eq!(out[1], Rect::new(0.0, 40.0, 60.0, 20.0));
        assert_eq!(out[2], Rect::new(60.0, 40.0, 30.0, 30.0));
    }

    #[test]
    fn test_packed_half_spacing_and_origin() {
        let mut arr = PackedArrangement::default();
        arr.set_spacing(Size::new(10.0, 10.0));
        let items = vec![Fixed(1, Size::new(50.0, 50.0)), Fixed(2, Size::new(50.0, 50.0))];
        let out = rects(&arr, Rect::new(20.0, 30.0, 100.0, -1.0), &items);
        assert_eq!(out[0], Rect::new(25.0, 35.0, 40.0, 40.0));
        assert_eq!(out[1], Rect::new(75.0, 35.0, 40.0, 40.0));
    }

    #[test]
    fn test_packed_oversized_item_is_appended() {
        let arr = PackedArrangement::default();
        let items = vec![Fixed(1, Size::new(50.0, 20.0)), Fixed(2, Size::new(150.0, 10.0))];
        let out = rects(&arr, Rect::new(0.0, 0.0, 100.0, -1.0), &items);
        assert_eq!(out[1], Rect::new(0.0, 20.0, 150.0, 10.0));
    }

    #[test]
    fn test_packed_size_hint_for_width() {
        let arr = PackedArrangement::default();
        let items = vec![Fixed(1, Size::new(60.0, 40.0)), Fixed(2, Size::new(60.0, 20.0))];
        let hint = arr.size_hint(SizeHintKind::Preferred, Size::new(100.0, -1.0), &refs(&items));
        assert_eq!(hint, Size::new(100.0, 60.0));
    }

    #[test]
    fn test_grid_defaults() {
        let arr = PackedGridArrangement::default();
        assert_eq!(arr.cell_size(), Size::new(90.0, 50.0));
        assert!(arr.stretch());
        assert!(arr.dense());
        assert_eq!(arr.item_spans(ItemId::new(1)), Span::new(1, 1));
    }

    #[test]
    fn test_grid_stretches_cells_to_width() {
        let mut arr = PackedGridArrangement::default();
        arr.set_spacing(Size::new(10.0, 10.0));
        // (300 + 10) / 100 = 3 columns, each (310 / 3) - 10 wide
        let out = rects(&arr, Rect::new(0.0, 0.0, 300.0, -1.0), &cells(4));
        let width = 310.0 / 3.0 - 10.0;
        assert!((out[0].width - width).abs() < 0.001);
        assert!((out[2].right() - 300.0).abs() < 0.001);
        assert_eq!(out[3].x, 0.0);
        assert_eq!(out[3].y, 60.0);
    }

    #[test]
    fn test_grid_without_stretch_uses_last_column() {
        let mut arr = PackedGridArrangement::default();
        arr.set_stretch(false);
        arr.set_spacing(Size::new(10.0, 10.0));
        let out = rects(&arr, Rect::new(0.0, 0.0, 290.0, -1.0), &cells(3));
        assert_eq!(out[2], Rect::new(200.0, 0.0, 90.0, 50.0));
    }

    #[test]
    fn test_grid_spans_clamped() {
        let mut arr = PackedGridArrangement::default();
        arr.set_stretch(false);
        arr.set_item_column_span(ItemId::new(0), 10);
        arr.set_item_row_span(ItemId::new(0), 2);
        assert_eq!(arr.item_spans(ItemId::new(0)), Span::new(10, 2));
        let out = rects(&arr, Rect::new(0.0, 0.0, 180.0, -1.0), &cells(2));
        assert_eq!(out[0], Rect::new(0.0, 0.0, 180.0, 100.0));
        assert_eq!(out[1], Rect::new(0.0, 100.0, 90.0, 50.0));
    }

    #[test]
    fn test_grid_pinned_items_go_first() {
        let mut arr = PackedGridArrangement::default();
        arr.set_stretch(false);
        arr.set_item_pos(ItemId::new(2), Some(GridPos::new(0, 0)));
        let out = rects(&arr, Rect::new(0.0, 0.0, 180.0, -1.0), &cells(3));
        assert_eq!(out[2].origin(), Point::new(0.0, 0.0));
        assert_eq!(out[0].origin(), Point::new(90.0, 0.0));
        assert_eq!(out[1].origin(), Point::new(0.0, 50.0));
    }

    #[test]
    fn test_grid_negative_position_counts_from_end() {
        let mut arr = PackedGridArrangement::default();
        arr.set_stretch(false);
        arr.set_item_pos(ItemId::new(0), Some(GridPos::new(-1, 0)));
        let out = rects(&arr, Rect::new(0.0, 0.0, 270.0, -1.0), &cells(1));
        assert_eq!(out[0].origin(), Point::new(180.0, 0.0));
    }

    #[test]
    fn test_grid_unpinning() {
        let mut arr = PackedGridArrangement::default();
        arr.set_item_pos(ItemId::new(1), Some(GridPos::new(1, 1)));
        arr.set_item_pos(ItemId::new(1), None);
        assert_eq!(arr.item_pos(ItemId::new(1)), None);
    }

    #[test]
    fn test_grid_cell_pos_and_span_size() {
        let mut arr = PackedGridArrangement::default();
        arr.set_spacing(Size::new(10.0, 5.0));
        let cell = Size::new(90.0, 50.0);
        assert_eq!(arr.cell_pos(GridPos::new(2, 1), cell, 4, 10), Point::new(200.0, 55.0));
        assert_eq!(arr.cell_pos(GridPos::new(-1, -2), cell, 4, 10), Point::new(300.0, 440.0));
        assert_eq!(arr.span_size(Span::new(2, 3), cell), Size::new(190.0, 160.0));
    }

    #[test]
    fn test_vertical_grid_fills_columns() {
        let mut arr = PackedGridArrangement::new(Orientation::Vertical);
        arr.set_stretch(false);
        let out = rects(&arr, Rect::new(0.0, 0.0, -1.0, 100.0), &cells(3));
        assert_eq!(out[0].origin(), Point::new(0.0, 0.0));
        assert_eq!(out[1].origin(), Point::new(0.0, 50.0));
        assert_eq!(out[2].origin(), Point::new(90.0, 0.0));
    }

    #[test]
    fn test_grid_implicit_size_hint() {
        let mut arr = PackedGridArrangement::default();
        arr.set_spacing(Size::new(10.0, 10.0));
        let hint = arr.size_hint(SizeHintKind::Preferred, Size::UNCONSTRAINED, &refs(&cells(3)));
        assert_eq!(hint, Size::new(290.0, 50.0));
    }
}
