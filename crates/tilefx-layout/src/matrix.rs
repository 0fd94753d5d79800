//! Uniform grid whose column count follows the available width.
//!
//! Items fill the grid row-major. Every mapping between flat indexes, grid
//! cells and visual coordinates is exposed so views can hit-test and
//! rubber-band select without re-running the layout.
//!
//! Visual coordinates are relative to the container's top-left corner and
//! include the margins.

use crate::arrangement::{visible_items, Arrangement, ArrangementBase, Placement};
use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use tilefx_core::{LayoutItem, Point, Rect, Size, SizeHintKind};

/// Default narrowest column.
pub const DEFAULT_MIN_COLUMN_WIDTH: f32 = 200.0;
/// Default row height.
pub const DEFAULT_ROW_HEIGHT: f32 = 24.0;
/// Default gap between rows and between columns.
pub const DEFAULT_MATRIX_SPACING: f32 = 10.0;
/// Effectively unbounded column width and count.
pub const UNBOUNDED: usize = 999_999;

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MatrixCell {
    /// Zero-based column
    pub column: usize,
    /// Zero-based row
    pub row: usize,
}

impl MatrixCell {
    /// Create a cell reference.
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// An inclusive block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRect {
    /// First column
    pub column: usize,
    /// First row
    pub row: usize,
    /// Number of columns covered
    pub columns: usize,
    /// Number of rows covered
    pub rows: usize,
}

impl CellRect {
    /// Create a block of cells.
    #[must_use]
    pub const fn new(column: usize, row: usize, columns: usize, rows: usize) -> Self {
        Self {
            column,
            row,
            columns,
            rows,
        }
    }

    /// Every cell in the block, row-major.
    pub fn cells(&self) -> impl Iterator<Item = MatrixCell> + '_ {
        (self.row..self.row + self.rows).flat_map(move |row| {
            (self.column..self.column + self.columns).map(move |column| MatrixCell::new(column, row))
        })
    }
}

/// Uniform grid arrangement.
#[derive(Debug)]
pub struct Matrix {
    base: ArrangementBase,
    min_column_width: f32,
    max_column_width: f32,
    max_column_count: usize,
    row_height: f32,
    column_stretch: bool,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    /// Create a matrix with the default column and row metrics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: ArrangementBase::with_spacing(Size::new(
                DEFAULT_MATRIX_SPACING,
                DEFAULT_MATRIX_SPACING,
            )),
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
            max_column_width: UNBOUNDED as f32,
            max_column_count: UNBOUNDED,
            row_height: DEFAULT_ROW_HEIGHT,
            column_stretch: true,
        }
    }

    /// Narrowest column.
    #[must_use]
    pub const fn min_column_width(&self) -> f32 {
        self.min_column_width
    }

    /// Change the narrowest column.
    pub fn set_min_column_width(&mut self, width: f32) {
        self.min_column_width = width.max(0.0);
        self.base.invalidate();
    }

    /// Widest a stretched column may grow.
    #[must_use]
    pub const fn max_column_width(&self) -> f32 {
        self.max_column_width
    }

    /// Change the stretched column cap.
    pub fn set_max_column_width(&mut self, width: f32) {
        self.max_column_width = width.max(0.0);
        self.base.invalidate();
    }

    /// Column count ceiling.
    #[must_use]
    pub const fn max_column_count(&self) -> usize {
        self.max_column_count
    }

    /// Change the column count ceiling.
    pub fn set_max_column_count(&mut self, count: usize) {
        self.max_column_count = count;
        self.base.invalidate();
    }

    /// Height of every row.
    #[must_use]
    pub const fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Change the row height.
    pub fn set_row_height(&mut self, height: f32) {
        self.row_height = height.max(0.0);
        self.base.invalidate();
    }

    /// Whether columns grow to share the leftover width.
    #[must_use]
    pub const fn column_stretch(&self) -> bool {
        self.column_stretch
    }

    /// Toggle column stretching.
    pub fn set_column_stretch(&mut self, stretch: bool) {
        self.column_stretch = stretch;
        self.base.invalidate();
    }

    fn hspacing(&self) -> f32 {
        self.base.spacing().width
    }

    fn vspacing(&self) -> f32 {
        self.base.spacing().height
    }

    /// Columns that fit `width` for `item_count` items.
    ///
    /// Zero items need no columns; any other count gets at least one even
    /// when the width is degenerate.
    #[must_use]
    pub fn column_count(&self, width: f32, item_count: usize) -> usize {
        if item_count == 0 {
            return 0;
        }
        if self.max_column_count <= 1 {
            return 1;
        }
        let available = width - self.base.margins().horizontal();
        let fitting = ((available + self.hspacing()) / (self.min_column_width + self.hspacing())).floor();
        // NaN and anything below one both collapse to a single column
        let fitting = if fitting >= 1.0 { fitting as usize } else { 1 };
        fitting.min(item_count).min(self.max_column_count)
    }

    /// `(columns, rows)` for `item_count` items at `width`.
    #[must_use]
    pub fn columns_and_rows(&self, width: f32, item_count: usize) -> (usize, usize) {
        let columns = self.column_count(width, item_count);
        if columns == 0 {
            return (0, 0);
        }
        (columns, item_count.div_ceil(columns))
    }

    /// Rows needed for `item_count` items at `width`.
    #[must_use]
    pub fn row_count(&self, width: f32, item_count: usize) -> usize {
        self.columns_and_rows(width, item_count).1
    }

    /// Width of each column when `columns` columns share `width`.
    #[must_use]
    pub fn column_width(&self, width: f32, columns: usize) -> f32 {
        if columns == 0 {
            return 0.0;
        }
        if !self.column_stretch {
            return self.min_column_width;
        }
        let available = width - self.base.margins().horizontal() + self.hspacing();
        (available / columns as f32 - self.hspacing())
            .min(self.max_column_width)
            .max(0.0)
    }

    /// Left edge of `column`.
    #[must_use]
    pub fn visual_left(&self, width: f32, columns: usize, column: usize) -> f32 {
        let advance = self.column_width(width, columns) + self.hspacing();
        self.base.margins().left + advance * column as f32
    }

    /// Right edge of `column`.
    #[must_use]
    pub fn visual_right(&self, width: f32, columns: usize, column: usize) -> f32 {
        self.visual_left(width, columns, column) + self.column_width(width, columns)
    }

    /// Top edge of `row`.
    #[must_use]
    pub fn visual_top(&self, row: usize) -> f32 {
        self.base.margins().top + (self.row_height + self.vspacing()) * row as f32
    }

    /// Bottom edge of `row`.
    #[must_use]
    pub fn visual_bottom(&self, row: usize) -> f32 {
        self.visual_top(row) + self.row_height
    }

    /// Narrowest width whose rows fit `height`, margins included.
    #[must_use]
    pub fn width_for_height(&self, height: f32, item_count: usize) -> f32 {
        if item_count == 0 {
            return 0.0;
        }
        let margins = self.base.margins();
        let available = height - margins.vertical();
        let fitting = ((available + self.vspacing()) / (self.row_height + self.vspacing())).floor();
        let rows = if fitting >= 1.0 { fitting as usize } else { 1 };
        let columns = item_count
            .div_ceil(rows)
            .min(self.max_column_count.max(1));
        self.min_column_width * columns as f32
            + self.hspacing() * (columns - 1) as f32
            + margins.horizontal()
    }

    /// Total content size including margins.
    #[must_use]
    pub fn visual_size(&self, width: f32, item_count: usize) -> Size {
        let (columns, rows) = self.columns_and_rows(width, item_count);
        if columns == 0 {
            return Size::ZERO;
        }
        let margins = self.base.margins();
        let content_width = self.column_width(width, columns) * columns as f32
            + self.hspacing() * (columns - 1) as f32;
        let content_height =
            self.row_height * rows as f32 + self.vspacing() * (rows - 1) as f32;
        Size::new(
            content_width + margins.horizontal(),
            content_height + margins.vertical(),
        )
    }

    /// Total content height including margins.
    #[must_use]
    pub fn visual_height(&self, width: f32, item_count: usize) -> f32 {
        self.visual_size(width, item_count).height
    }

    /// Height of `item_count` rows stacked in one column, margins excluded.
    #[must_use]
    pub fn single_column_height(&self, item_count: usize) -> f32 {
        if item_count == 0 {
            return 0.0;
        }
        self.row_height * item_count as f32 + self.vspacing() * (item_count - 1) as f32
    }

    /// Cell holding the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfBounds`] when `index >= item_count`.
    pub fn map_index_to_cell(
        &self,
        width: f32,
        item_count: usize,
        index: usize,
    ) -> Result<MatrixCell, LayoutError> {
        if index >= item_count {
            return Err(LayoutError::IndexOutOfBounds {
                index,
                count: item_count,
            });
        }
        let columns = self.column_count(width, item_count);
        Ok(MatrixCell::new(index % columns, index / columns))
    }

    /// Flat index of `cell`, clamped to the last item.
    #[must_use]
    pub fn map_cell_to_index(&self, width: f32, item_count: usize, cell: MatrixCell) -> usize {
        let columns = self.column_count(width, item_count);
        (cell.row * columns + cell.column).min(item_count.saturating_sub(1))
    }

    /// Flat indexes of `cells`, dropping any past the last item.
    #[must_use]
    pub fn map_cells_to_indexes<I>(&self, width: f32, item_count: usize, cells: I) -> Vec<usize>
    where
        I: IntoIterator<Item = MatrixCell>,
    {
        let columns = self.column_count(width, item_count);
        cells
            .into_iter()
            .map(|cell| cell.row * columns + cell.column)
            .filter(|&index| index < item_count)
            .collect()
    }

    /// Cell under a visual point. Points above or left of the grid map to
    /// the first row or column, points right of it to the last column.
    #[must_use]
    pub fn map_point_to_cell(&self, width: f32, columns: usize, point: Point) -> MatrixCell {
        let margins = self.base.margins();
        let column_advance = self.column_width(width, columns) + self.hspacing();
        let row_advance = self.row_height + self.vspacing();
        let step = |offset: f32, advance: f32| {
            if advance > 0.0 {
                (offset / advance).floor().max(0.0) as usize
            } else {
                0
            }
        };
        MatrixCell::new(
            step(point.x - margins.left, column_advance).min(columns.saturating_sub(1)),
            step(point.y - margins.top, row_advance),
        )
    }

    /// Flat index under a visual point, clamped to the last item.
    #[must_use]
    pub fn map_point_to_index(&self, width: f32, item_count: usize, point: Point) -> usize {
        let columns = self.column_count(width, item_count);
        let cell = self.map_point_to_cell(width, columns, point);
        self.map_cell_to_index(width, item_count, cell)
    }

    /// Visual rectangle of `cell`.
    #[must_use]
    pub fn map_cell_to_visual_rect(&self, width: f32, columns: usize, cell: MatrixCell) -> Rect {
        Rect::new(
            self.visual_left(width, columns, cell.column),
            self.visual_top(cell.row),
            self.column_width(width, columns),
            self.row_height,
        )
    }

    /// Visual rectangle of the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfBounds`] when `index >= item_count`.
    pub fn map_index_to_visual_rect(
        &self,
        width: f32,
        item_count: usize,
        index: usize,
    ) -> Result<Rect, LayoutError> {
        let cell = self.map_index_to_cell(width, item_count, index)?;
        let columns = self.column_count(width, item_count);
        Ok(self.map_cell_to_visual_rect(width, columns, cell))
    }

    /// Cells touched by a visual rectangle, both corners included.
    #[must_use]
    pub fn map_visual_rect_to_cell_rect(&self, width: f32, columns: usize, rect: Rect) -> CellRect {
        let first = self.map_point_to_cell(width, columns, rect.origin());
        let last = self.map_point_to_cell(width, columns, rect.bottom_right());
        let last_column = last.column.min(columns.saturating_sub(1)).max(first.column);
        CellRect::new(
            first.column,
            first.row,
            last_column - first.column + 1,
            last.row.max(first.row) - first.row + 1,
        )
    }

    /// Every cell touched by a visual rectangle, row-major.
    #[must_use]
    pub fn map_visual_rect_to_cells(&self, width: f32, item_count: usize, rect: Rect) -> Vec<MatrixCell> {
        let columns = self.column_count(width, item_count);
        self.map_visual_rect_to_cell_rect(width, columns, rect)
            .cells()
            .collect()
    }

    /// Indexes of every item touched by a visual rectangle.
    #[must_use]
    pub fn map_visual_rect_to_indexes(&self, width: f32, item_count: usize, rect: Rect) -> Vec<usize> {
        let cells = self.map_visual_rect_to_cells(width, item_count, rect);
        self.map_cells_to_indexes(width, item_count, cells)
    }

    /// Visual rectangle covered by a block of cells.
    #[must_use]
    pub fn map_cell_rect_to_visual_rect(&self, width: f32, columns: usize, cells: CellRect) -> Rect {
        let column_advance = self.column_width(width, columns) + self.hspacing();
        let row_advance = self.row_height + self.vspacing();
        Rect::new(
            self.visual_left(width, columns, cells.column),
            self.visual_top(cells.row),
            (column_advance * cells.columns as f32 - self.hspacing()).max(0.0),
            (row_advance * cells.rows as f32 - self.vspacing()).max(0.0),
        )
    }
}

impl Arrangement for Matrix {
    fn base(&self) -> &ArrangementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ArrangementBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "matrix"
    }

    fn auto_margins(&self) -> bool {
        false
    }

    fn arrange<'a>(
        &self,
        _which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        let visible = visible_items(items);
        let width = geometry.width;
        let columns = self.column_count(width, visible.len());
        visible
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let cell = MatrixCell::new(index % columns, index / columns);
                let rect = self
                    .map_cell_to_visual_rect(width, columns, cell)
                    .translated(geometry.x, geometry.y);
                Placement::new(item, rect)
            })
            .collect()
    }

    fn implicit_size_hint(&self, items: &[&dyn LayoutItem]) -> Size {
        let count = items.len();
        if count == 0 {
            return Size::ZERO;
        }
        let columns = (count as f32).sqrt().ceil();
        let width = self.min_column_width * columns
            + self.hspacing() * (columns - 1.0)
            + self.base.margins().horizontal();
        self.visual_size(width, count)
    }

    fn size_hint(&self, which: SizeHintKind, constraint: Size, items: &[&dyn LayoutItem]) -> Size {
        let visible = visible_items(items);
        if visible.is_empty() {
            return Size::ZERO;
        }
        if constraint.width >= 0.0 {
            return Size::new(
                constraint.width,
                self.visual_height(constraint.width, visible.len()),
            );
        }
        if constraint.height >= 0.0 {
            return Size::new(
                self.width_for_height(constraint.height, visible.len()),
                constraint.height,
            );
        }
        if which == SizeHintKind::Preferred {
            return self.implicit_size_hint(&visible);
        }
        Size::UNCONSTRAINED
    }
}
