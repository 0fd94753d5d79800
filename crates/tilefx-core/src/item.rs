//! Item capability contract.
//!
//! Arrangements never own the things they place. They only need to ask an
//! item whether it is visible and how large it would like to be, so the whole
//! contract is the [`LayoutItem`] trait below.
//!
//! # Examples
//!
//! ```
//! use tilefx_core::{valid_size_hint, ItemId, LayoutItem, Size, SizeHintKind};
//!
//! #[derive(Debug)]
//! struct Label(u64);
//!
//! impl LayoutItem for Label {
//!     fn id(&self) -> ItemId {
//!         ItemId::new(self.0)
//!     }
//!
//!     fn size_hint(&self, _which: SizeHintKind, _constraint: Size) -> Size {
//!         Size::new(-1.0, 20.0)
//!     }
//! }
//!
//! let hint = valid_size_hint(&Label(1), SizeHintKind::Preferred, Size::UNCONSTRAINED);
//! assert_eq!(hint, Size::new(64.0, 20.0));
//! ```

use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of an item, used to key per-item settings such as
/// stretch factors, spans and pinned grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Create a new item ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which size hint is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeHintKind {
    /// Smallest usable size
    Minimum,
    /// Natural size
    #[default]
    Preferred,
    /// Largest useful size
    Maximum,
}

impl SizeHintKind {
    /// Value substituted for a negative (unknown) component of a hint.
    #[must_use]
    pub const fn fallback_extent(self) -> f32 {
        match self {
            Self::Minimum => 0.0,
            Self::Preferred => 64.0,
            Self::Maximum => 999_999.0,
        }
    }
}

/// Something an arrangement can place.
pub trait LayoutItem: fmt::Debug {
    /// Identity used to look up per-item arrangement settings.
    fn id(&self) -> ItemId;

    /// Invisible items get no rectangle and reserve no space.
    fn is_visible(&self) -> bool {
        true
    }

    /// Report a size for the given kind.
    ///
    /// `constraint` fixes at most one axis; the other component is negative.
    /// A negative component in the answer means "no opinion".
    fn size_hint(&self, which: SizeHintKind, constraint: Size) -> Size;

    /// The preferred height depends on the width actually assigned.
    fn has_height_for_width(&self) -> bool {
        false
    }

    /// The preferred width depends on the height actually assigned.
    fn has_width_for_height(&self) -> bool {
        false
    }
}

/// Query an item's size hint, replacing negative components with the
/// per-kind fallback so callers always get a usable size.
pub fn valid_size_hint<I>(item: &I, which: SizeHintKind, constraint: Size) -> Size
where
    I: LayoutItem + ?Sized,
{
    let hint = item.size_hint(which, constraint);
    let fallback = which.fallback_extent();
    Size::new(
        if hint.width < 0.0 { fallback } else { hint.width },
        if hint.height < 0.0 { fallback } else { hint.height },
    )
}
