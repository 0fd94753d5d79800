//! A linear arrangement that picks its orientation from the available width.

use crate::arrangement::{Arrangement, ArrangementBase, Placement};
use crate::justify::{Align, Justify, Orientation};
use crate::linear::{arrange_line, line_extent, LineStyle};
use tilefx_core::{LayoutItem, Rect, Size, SizeHintKind};

/// Width at or below which items stack vertically.
pub const DEFAULT_BREAK_WIDTH: f32 = 200.0;

/// Lays items out in a stretched row when the container is wider than the
/// break width, and in a stretched column otherwise.
#[derive(Debug)]
pub struct SwitchArrangement {
    base: ArrangementBase,
    break_width: f32,
}

impl Default for SwitchArrangement {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_WIDTH)
    }
}

impl SwitchArrangement {
    /// Create a switch that goes horizontal above `break_width`.
    #[must_use]
    pub const fn new(break_width: f32) -> Self {
        Self {
            base: ArrangementBase::new(),
            break_width,
        }
    }

    /// Width threshold.
    #[must_use]
    pub const fn break_width(&self) -> f32 {
        self.break_width
    }

    /// Change the width threshold.
    pub fn set_break_width(&mut self, width: f32) {
        self.break_width = width;
        self.base.invalidate();
    }

    /// Orientation used for a container of the given width.
    #[must_use]
    pub fn orientation_for(&self, width: f32) -> Orientation {
        if width > self.break_width {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

impl Arrangement for SwitchArrangement {
    fn base(&self) -> &ArrangementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ArrangementBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "switch"
    }

    fn arrange<'a>(
        &self,
        which: SizeHintKind,
        geometry: Rect,
        items: &[&'a dyn LayoutItem],
    ) -> Vec<Placement<'a>> {
        let orientation = self.orientation_for(geometry.width);
        tracing::trace!(%orientation, width = geometry.width, "switch orientation");
        let style = LineStyle {
            orientation,
            justify: Justify::Stretch,
            align: Align::Stretch,
            spacing: orientation.main(self.base.spacing()),
        };
        arrange_line(which, geometry, items, style, |_| 1)
    }

    fn implicit_size_hint(&self, items: &[&dyn LayoutItem]) -> Size {
        let row = line_extent(Orientation::Horizontal, self.base.spacing().width, items);
        if row.width > self.break_width {
            row
        } else {
            line_extent(Orientation::Vertical, self.base.spacing().height, items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilefx_core::ItemId;

    #[derive(Debug)]
    struct Fixed(u64);

    impl LayoutItem for Fixed {
        fn id(&self) -> ItemId {
            ItemId::new(self.0)
        }

        fn size_hint(&self, _which: SizeHintKind, _constraint: Size) -> Size {
            Size::new(50.0, 20.0)
        }
    }

    #[test]
    fn test_default_break_width() {
        assert_eq!(SwitchArrangement::default().break_width(), 200.0);
    }

    #[test]
    fn test_orientation_for_width() {
        let arr = SwitchArrangement::default();
        assert_eq!(arr.orientation_for(201.0), Orientation::Horizontal);
        assert_eq!(arr.orientation_for(200.0), Orientation::Vertical);
    }

    #[test]
    fn test_wide_container_is_a_stretched_row() {
        let arr = SwitchArrangement::default();
        let (a, b) = (Fixed(1), Fixed(2));
        let out = arr.rects(
            SizeHintKind::Preferred,
            Rect::new(0.0, 0.0, 400.0, 30.0),
            &[&a, &b],
        );
        assert_eq!(out[0].rect, Rect::new(0.0, 0.0, 200.0, 30.0));
        assert_eq!(out[1].rect, Rect::new(200.0, 0.0, 200.0, 30.0));
    }

    #[test]
    fn test_narrow_container_is_a_column() {
        let mut arr = SwitchArrangement::default();
        arr.set_spacing(Size::new(0.0, 4.0));
        let (a, b) = (Fixed(1), Fixed(2));
        let out = arr.rects(
            SizeHintKind::Preferred,
            Rect::new(0.0, 0.0, 150.0, 44.0),
            &[&a, &b],
        );
        assert_eq!(out[0].rect, Rect::new(0.0, 0.0, 150.0, 20.0));
        assert_eq!(out[1].rect, Rect::new(0.0, 24.0, 150.0, 20.0));
    }
}
