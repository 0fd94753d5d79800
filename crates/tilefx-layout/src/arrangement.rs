//! The arrangement contract shared by every layout policy.

use std::fmt;
use tilefx_core::{valid_size_hint, ItemId, LayoutItem, Margins, Rect, Size, SizeHintKind};

/// Where an arrangement put one item.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    /// The item being placed
    pub item: &'a dyn LayoutItem,
    /// Its rectangle in container coordinates
    pub rect: Rect,
}

impl<'a> Placement<'a> {
    /// Pair an item with a rectangle.
    #[must_use]
    pub const fn new(item: &'a dyn LayoutItem, rect: Rect) -> Self {
        Self { item, rect }
    }

    /// Identity of the placed item.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.item.id()
    }
}

type Listener = Box<dyn FnMut()>;

/// State every arrangement carries: margins, spacing and invalidation.
///
/// Spacing is a size so that two-axis arrangements can use `width` for the
/// horizontal gap and `height` for the vertical one.
pub struct ArrangementBase {
    margins: Margins,
    spacing: Size,
    invalidated: bool,
    listeners: Vec<Listener>,
}

impl fmt::Debug for ArrangementBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrangementBase")
            .field("margins", &self.margins)
            .field("spacing", &self.spacing)
            .field("invalidated", &self.invalidated)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ArrangementBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrangementBase {
    /// Zero margins and zero spacing.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_spacing(Size::ZERO)
    }

    /// Zero margins and the given spacing.
    #[must_use]
    pub const fn with_spacing(spacing: Size) -> Self {
        Self {
            margins: Margins::ZERO,
            spacing,
            invalidated: false,
            listeners: Vec::new(),
        }
    }

    /// Current margins.
    #[must_use]
    pub const fn margins(&self) -> Margins {
        self.margins
    }

    /// Replace the margins.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
        self.invalidate();
    }

    /// Current spacing.
    #[must_use]
    pub const fn spacing(&self) -> Size {
        self.spacing
    }

    /// Replace both spacing components.
    pub fn set_spacing(&mut self, spacing: Size) {
        self.spacing = spacing;
        self.invalidate();
    }

    /// Replace the horizontal gap only.
    pub fn set_horizontal_spacing(&mut self, spacing: f32) {
        self.spacing.width = spacing;
        self.invalidate();
    }

    /// Replace the vertical gap only.
    pub fn set_vertical_spacing(&mut self, spacing: f32) {
        self.spacing.height = spacing;
        self.invalidate();
    }

    /// Register a callback run whenever the arrangement is invalidated.
    pub fn on_invalidate<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Mark the arrangement dirty and notify every listener.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
        for listener in &mut self.listeners {
            listener();
        }
    }

    /// Whether an option changed since the last [`Self::take_invalidated`].
    #[must_use]
    pub const fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Read and clear the dirty flag.
    pub fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }
}

/// Size every visible item with the same hint kind and constraint.
pub(crate) fn item_rects<'a>(
    which: SizeHintKind,
    constraint: Size,
    items: &[&'a dyn LayoutItem],
) -> Vec<Placement<'a>> {
    items
        .iter()
        .filter(|item| item.is_visible())
        .map(|&item| Placement::new(item, Rect::from_size(valid_size_hint(item, which, constraint))))
        .collect()
}

pub(crate) fn visible_items<'a>(items: &[&'a dyn LayoutItem]) -> Vec<&'a dyn LayoutItem> {
    items.iter().copied().filter(|item| item.is_visible()).collect()
}

/// A policy that turns a container rectangle plus an ordered item list into
/// one rectangle per visible item.
///
/// Implementors provide [`Arrangement::arrange`]; margin handling and the
/// size-hint contract come for free.
pub trait Arrangement: fmt::Debug {
    /// Shared margins, spacing and invalidation state.
    fn base(&self) -> &ArrangementBase;

    /// Mutable access to the shared state.
    fn base_mut(&mut self) -> &mut ArrangementBase;

    /// Short name used in log events.
    fn kind(&self) -> &'static str;

    /// Whether [`Arrangement::rects`] strips margins before arranging.
    ///
    /// Arrangements that fold margins into their own geometry return false.
    fn auto_margins(&self) -> bool {
        true
    }

    /// Place visible items inside `geometry`, in input order.
    ///
    /// A negative geometry component means that axis is unconstrained.
    fn arrange<'a>(
        &self,
        which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>>;

    /// Natural content size when nothing is fixed, margins excluded.
    fn implicit_size_hint(&self, _items: &[&dyn LayoutItem]) -> Size {
        Size::UNCONSTRAINED
    }

    /// Current margins.
    fn margins(&self) -> Margins {
        self.base().margins()
    }

    /// Replace the margins and invalidate.
    fn set_margins(&mut self, margins: Margins) {
        self.base_mut().set_margins(margins);
    }

    /// Current spacing.
    fn spacing(&self) -> Size {
        self.base().spacing()
    }

    /// Replace the spacing and invalidate.
    fn set_spacing(&mut self, spacing: Size) {
        self.base_mut().set_spacing(spacing);
    }

    /// Mark dirty and notify listeners.
    fn invalidate(&mut self) {
        self.base_mut().invalidate();
    }

    /// Read and clear the dirty flag.
    fn take_invalidated(&mut self) -> bool {
        self.base_mut().take_invalidated()
    }

    /// Compute item rectangles for a container.
    ///
    /// Margins are removed first when the geometry is fully specified.
    fn rects<'a>(
        &self,
        which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        let geometry = if self.auto_margins() && geometry.size().is_valid() {
            geometry.margins_removed(&self.margins())
        } else {
            geometry
        };
        tracing::trace!(
            arrangement = self.kind(),
            items = items.len(),
            ?geometry,
            "arranging items"
        );
        self.arrange(which, geometry, items)
    }

    /// Size needed to hold `items` under `constraint`.
    ///
    /// A fixed width yields the height the laid-out items reach, a fixed
    /// height yields the width. With nothing fixed only `Preferred` has an
    /// answer; other kinds report `(-1, -1)`.
    fn size_hint(&self, which: SizeHintKind, constraint: Size, items: &[&dyn LayoutItem]) -> Size {
        let visible = visible_items(items);
        if visible.is_empty() {
            return Size::ZERO;
        }
        let margins = if self.auto_margins() {
            self.margins()
        } else {
            Margins::ZERO
        };

        if constraint.width >= 0.0 {
            let width = (constraint.width - margins.horizontal()).max(0.0);
            let available = Rect::new(margins.left, margins.top, width, constraint.height);
            let bottom = self
                .arrange(which, available, &visible)
                .iter()
                .map(|p| p.rect.bottom())
                .fold(margins.top, f32::max);
            return Size::new(constraint.width, bottom + margins.bottom);
        }

        if constraint.height >= 0.0 {
            let height = (constraint.height - margins.vertical()).max(0.0);
            let available = Rect::new(margins.left, margins.top, constraint.width, height);
            let right = self
                .arrange(which, available, &visible)
                .iter()
                .map(|p| p.rect.right())
                .fold(margins.left, f32::max);
            return Size::new(right + margins.right, constraint.height);
        }

        if which == SizeHintKind::Preferred {
            let content = self.implicit_size_hint(&visible);
            if content.is_valid() {
                return Size::new(
                    content.width + margins.horizontal(),
                    content.height + margins.vertical(),
                );
            }
            return content;
        }

        Size::UNCONSTRAINED
    }
}
