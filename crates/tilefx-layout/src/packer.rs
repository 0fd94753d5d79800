//! Free-rectangle bin packer.
//!
//! The packer keeps a list of maximal free rectangles inside its bounds.
//! Placing a rectangle splits every free rectangle it overlaps into the
//! strips left above, right, below and left of it; free rectangles swallowed
//! by another are then dropped. The list stays sorted so that the first fit
//! is always the topmost-leftmost (horizontal) or leftmost-topmost
//! (vertical) candidate.
//!
//! Bounds may be infinite along the cross axis, which makes the packer grow
//! downwards (or rightwards) forever.

use crate::justify::Orientation;
use std::cmp::Ordering;
use tilefx_core::{Rect, Size};

/// Slack allowed when deciding whether a rectangle fits a free space.
pub const PACKING_TOLERANCE: f32 = 0.1;

/// Slack on the extents checked by line packing.
const LINE_TOLERANCE: f32 = 0.01;

/// Progress of the line currently being filled by [`Packer::line_pack`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct LineCursor {
    /// Cross-axis coordinate of the line
    cross: f32,
    /// Main-axis coordinate where the next item may start
    main: f32,
    /// Thickest item on the line so far
    breadth: f32,
}

/// Free-rectangle bin packer.
#[derive(Debug, Clone, PartialEq)]
pub struct Packer {
    bounds: Rect,
    orientation: Orientation,
    spaces: Vec<Rect>,
    content: Option<Rect>,
    line: LineCursor,
}

impl Packer {
    /// A horizontally ordered packer over `(0, 0, width, height)`.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_orientation(width, height, Orientation::Horizontal)
    }

    /// A packer over `(0, 0, width, height)` that fills rows when
    /// `orientation` is horizontal and columns when it is vertical.
    #[must_use]
    pub fn with_orientation(width: f32, height: f32, orientation: Orientation) -> Self {
        let bounds = Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0));
        let spaces = if bounds.width > 0.0 && bounds.height > 0.0 {
            vec![bounds]
        } else {
            Vec::new()
        };
        Self {
            bounds,
            orientation,
            spaces,
            content: None,
            line: LineCursor::default(),
        }
    }

    /// Region the packer manages. Grows when rectangles are appended.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Fill order.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Current free rectangles, in fill order.
    #[must_use]
    pub fn spaces(&self) -> &[Rect] {
        &self.spaces
    }

    /// Union of everything placed so far.
    #[must_use]
    pub const fn content_bounds(&self) -> Option<Rect> {
        self.content
    }

    /// Place `size` at the origin of the first free space it fits.
    pub fn pack(&mut self, size: Size) -> Option<Rect> {
        let space = self.spaces.iter().find(|space| {
            size.width <= space.width + PACKING_TOLERANCE
                && size.height <= space.height + PACKING_TOLERANCE
        })?;
        let rect = Rect::from_origin_size(space.origin(), size);
        self.placed(rect);
        Some(rect)
    }

    /// Place `size` with its top-left corner exactly at `(x, y)`, provided
    /// a single free space holds the whole rectangle there.
    pub fn pack_at(&mut self, size: Size, x: f32, y: f32) -> Option<Rect> {
        let rect = Rect::new(x, y, size.width, size.height);
        let fits = self.spaces.iter().any(|space| {
            x >= space.x - PACKING_TOLERANCE
                && y >= space.y - PACKING_TOLERANCE
                && rect.right() <= space.right() + PACKING_TOLERANCE
                && rect.bottom() <= space.bottom() + PACKING_TOLERANCE
        });
        if !fits {
            return None;
        }
        self.placed(rect);
        Some(rect)
    }

    /// Place `size` on the line being filled, after everything already on
    /// it, so arrival order is preserved row by row.
    ///
    /// When the current line has no room a fresh line is started past its
    /// thickest item. Returns `None` only when even a fresh line cannot
    /// hold the rectangle.
    pub fn line_pack(&mut self, size: Size) -> Option<Rect> {
        if let Some(rect) = self.line_candidate(size) {
            self.advance_line(rect);
            self.placed(rect);
            return Some(rect);
        }
        if self.line.main <= 0.0 {
            return None;
        }

        self.line = LineCursor {
            cross: self.line.cross + self.line.breadth,
            main: 0.0,
            breadth: 0.0,
        };
        tracing::trace!(line = self.line.cross, "packer started a new line");
        let rect = self.line_candidate(size)?;
        self.advance_line(rect);
        self.placed(rect);
        Some(rect)
    }

    /// Leftmost (or topmost) position on the current line where a free
    /// space holds `size` entirely.
    fn line_candidate(&self, size: Size) -> Option<Rect> {
        let orient = self.orientation;
        let line = self.line.cross;
        let cursor = self.line.main;
        let main_len = orient.main(size);
        let cross_len = orient.cross(size);

        self.spaces
            .iter()
            .filter(|space| {
                orient.cross_start(space) <= line + PACKING_TOLERANCE
                    && orient.cross_end(space) >= line + cross_len - LINE_TOLERANCE
                    && orient.main_end(space) > cursor
            })
            .filter_map(|space| {
                let start = orient.main_start(space).max(cursor);
                (orient.main_end(space) + LINE_TOLERANCE >= start + main_len).then_some(start)
            })
            .min_by(f32::total_cmp)
            .map(|start| Rect::from_origin_size(orient.point(start, line), size))
    }

    fn advance_line(&mut self, rect: Rect) {
        let orient = self.orientation;
        self.line.main = orient.main_end(&rect);
        self.line.breadth = self.line.breadth.max(orient.cross(rect.size()));
    }

    /// Place `size` past all existing content, growing the bounds to fit.
    ///
    /// Horizontal packers append below, at `(0, bottom of content)`.
    /// Vertical packers fill columns, so they append to the right instead,
    /// at `(right of content, 0)`. The part of the new band not covered by
    /// the rectangle becomes free space.
    pub fn append(&mut self, size: Size) -> Rect {
        let orient = self.orientation;
        let content_end = self.content.map_or(0.0, |c| orient.cross_end(&c));
        let bounds_end = orient.cross_end(&self.bounds);
        let cross = if bounds_end.is_finite() {
            content_end.max(bounds_end)
        } else {
            content_end
        };
        let rect = Rect::from_origin_size(orient.point(0.0, cross), size);
        self.placed(rect);

        if bounds_end.is_finite() {
            let grown = self.bounds.union(&rect);
            let main_end = orient.main_end(&grown);
            let band_start = orient.main_end(&rect);
            if main_end > band_start {
                self.add_space(Rect::from_origin_size(
                    orient.point(band_start, cross),
                    orient.size(main_end - band_start, orient.cross(size)),
                ));
            }
            self.bounds = grown;
        }

        self.line = LineCursor {
            cross,
            main: orient.main_end(&rect),
            breadth: orient.cross(size),
        };
        tracing::debug!(?rect, bounds = ?self.bounds, "packer appended past content");
        rect
    }

    /// [`Self::pack`], falling back to [`Self::append`].
    pub fn pack_or_append(&mut self, size: Size) -> Rect {
        match self.pack(size) {
            Some(rect) => rect,
            None => self.append(size),
        }
    }

    /// Record that `rect` is occupied and recompute the free spaces.
    pub fn placed(&mut self, rect: Rect) {
        let mut revised = Vec::with_capacity(self.spaces.len() + 4);
        for space in self.spaces.drain(..) {
            if nearly_equal(&space, &rect) {
                continue;
            }
            if space.intersects(&rect) {
                revised.extend(split_space(&space, &rect));
            } else {
                revised.push(space);
            }
        }
        self.spaces = revised;
        self.content = Some(self.content.map_or(rect, |c| c.union(&rect)));
        self.merge_and_sort();
    }

    /// Declare extra free space.
    pub fn add_space(&mut self, space: Rect) {
        if space.width > 0.0 && space.height > 0.0 {
            self.spaces.push(space);
            self.merge_and_sort();
        }
    }

    fn merge_and_sort(&mut self) {
        remove_contained(&mut self.spaces);
        let orient = self.orientation;
        self.spaces.sort_by(|a, b| fill_order(orient, a, b));
    }
}

fn fill_order(orientation: Orientation, a: &Rect, b: &Rect) -> Ordering {
    orientation
        .cross_start(a)
        .total_cmp(&orientation.cross_start(b))
        .then_with(|| orientation.main_start(a).total_cmp(&orientation.main_start(b)))
}

fn nearly_equal(a: &Rect, b: &Rect) -> bool {
    (a.x - b.x).abs() < PACKING_TOLERANCE
        && (a.y - b.y).abs() < PACKING_TOLERANCE
        && (a.width - b.width).abs() < PACKING_TOLERANCE
        && (a.height - b.height).abs() < PACKING_TOLERANCE
}

/// Maximal free strips of `space` left around `rect`.
pub(crate) fn split_space(space: &Rect, rect: &Rect) -> Vec<Rect> {
    let mut strips = Vec::with_capacity(4);
    if space.y < rect.y {
        strips.push(Rect::new(space.x, space.y, space.width, rect.y - space.y));
    }
    if space.right() > rect.right() {
        strips.push(Rect::new(
            rect.right(),
            space.y,
            space.right() - rect.right(),
            space.height,
        ));
    }
    if space.bottom() > rect.bottom() {
        strips.push(Rect::new(
            space.x,
            rect.bottom(),
            space.width,
            space.bottom() - rect.bottom(),
        ));
    }
    if space.x < rect.x {
        strips.push(Rect::new(space.x, space.y, rect.x - space.x, space.height));
    }
    strips
}

/// Drop every rectangle contained in another; of exact duplicates the first
/// survives.
pub(crate) fn remove_contained(rects: &mut Vec<Rect>) {
    let mut i = 0;
    while i < rects.len() {
        let candidate = rects[i];
        let swallowed = rects.iter().enumerate().any(|(j, other)| {
            j != i && other.contains_rect(&candidate) && (*other != candidate || j < i)
        });
        if swallowed {
            rects.remove(i);
        } else {
            i += 1;
        }
    }
}
