//! Orientation, justification and alignment, plus the one-line solver shared
//! by the linear, flow and switch arrangements.

use crate::arrangement::Placement;
use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tilefx_core::{valid_size_hint, Point, Rect, Size, SizeHintKind};

/// Extra space below this is treated as none at all.
const MIN_EXTRA: f32 = 1.0;

/// Which axis items are distributed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Main axis is x
    #[default]
    Horizontal,
    /// Main axis is y
    Vertical,
}

impl Orientation {
    /// True for [`Orientation::Horizontal`].
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    /// The other orientation.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Main-axis component of a size.
    #[must_use]
    pub const fn main(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Cross-axis component of a size.
    #[must_use]
    pub const fn cross(self, size: Size) -> f32 {
        self.flipped().main(size)
    }

    /// Build a size from main/cross components.
    #[must_use]
    pub const fn size(self, main: f32, cross: f32) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Build a point from main/cross coordinates.
    #[must_use]
    pub const fn point(self, main: f32, cross: f32) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    /// Leading edge of a rect along the main axis.
    #[must_use]
    pub const fn main_start(self, rect: &Rect) -> f32 {
        match self {
            Self::Horizontal => rect.x,
            Self::Vertical => rect.y,
        }
    }

    /// Trailing edge of a rect along the main axis.
    #[must_use]
    pub fn main_end(self, rect: &Rect) -> f32 {
        self.main_start(rect) + self.main(rect.size())
    }

    /// Leading edge of a rect along the cross axis.
    #[must_use]
    pub const fn cross_start(self, rect: &Rect) -> f32 {
        self.flipped().main_start(rect)
    }

    /// Trailing edge of a rect along the cross axis.
    #[must_use]
    pub fn cross_end(self, rect: &Rect) -> f32 {
        self.flipped().main_end(rect)
    }

    /// A constraint that fixes only the cross axis of `available`.
    #[must_use]
    pub const fn cross_constraint(self, available: Size) -> Size {
        match self {
            Self::Horizontal => Size::with_fixed_height(available.height),
            Self::Vertical => Size::with_fixed_width(available.width),
        }
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(LayoutError::UnknownOrientation(other.to_string())),
        }
    }
}

/// Main-axis distribution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    /// Pack items at the start
    #[default]
    Start,
    /// Pack items at the end
    End,
    /// Center items
    Center,
    /// Distribute extra space between items
    SpaceBetween,
    /// Half gaps at both ends, full gaps between items
    SpaceAround,
    /// Equal gaps between items and at both ends
    SpaceEvenly,
    /// Grow or shrink items by their stretch factors
    Stretch,
    /// Ignore natural sizes and spacing, giving every item the same extent
    Even,
}

const JUSTIFY_NAMES: [(&str, Justify); 8] = [
    ("start", Justify::Start),
    ("end", Justify::End),
    ("center", Justify::Center),
    ("space_between", Justify::SpaceBetween),
    ("space_around", Justify::SpaceAround),
    ("space_evenly", Justify::SpaceEvenly),
    ("stretch", Justify::Stretch),
    ("even", Justify::Even),
];

impl Justify {
    /// Snake-case name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        JUSTIFY_NAMES
            .iter()
            .find(|(_, j)| *j == self)
            .map_or("start", |(name, _)| name)
    }
}

impl fmt::Display for Justify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Justify {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JUSTIFY_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, j)| *j)
            .ok_or_else(|| LayoutError::UnknownJustify(s.to_string()))
    }
}

/// Cross-axis alignment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Align to the start
    #[default]
    Start,
    /// Align to the end
    End,
    /// Center items
    Center,
    /// Stretch to fill
    Stretch,
}

impl Align {
    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Center => "center",
            Self::Stretch => "stretch",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Align {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "center" => Ok(Self::Center),
            "stretch" => Ok(Self::Stretch),
            other => Err(LayoutError::UnknownAlign(other.to_string())),
        }
    }
}

/// Parameters for laying out one line of items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineParams {
    /// Main axis of the line
    pub orientation: Orientation,
    /// Top-left corner of the line
    pub origin: Point,
    /// Main-axis length available; negative means unconstrained
    pub available: f32,
    /// Cross-axis extent to align within; `None` derives it from the items
    pub across: Option<f32>,
    /// Main-axis distribution
    pub justify: Justify,
    /// Cross-axis alignment
    pub align: Align,
    /// Gap between adjacent items
    pub spacing: f32,
}

/// Leading offset and additional inter-item gap for the offset-style
/// justifications, given `extra` free space shared by `count` items.
///
/// `Stretch` and `Even` resize items instead and always return `(0, 0)`.
#[must_use]
pub fn offset_and_spacing(justify: Justify, extra: f32, count: usize) -> (f32, f32) {
    let n = count as f32;
    match justify {
        Justify::End => (extra, 0.0),
        Justify::Center => (extra / 2.0, 0.0),
        Justify::SpaceBetween if count > 1 => (0.0, extra / (n - 1.0)),
        Justify::SpaceAround if count > 0 => {
            let half_gap = extra / (n * 2.0);
            (half_gap, half_gap * 2.0)
        }
        Justify::SpaceEvenly => {
            let gap = extra / (n + 1.0);
            (gap, gap)
        }
        _ => (0.0, 0.0),
    }
}

/// New main-axis lengths after sharing `extra` space.
///
/// Growth is split by stretch factor; a deficit shrinks every item in
/// proportion to its current length.
pub(crate) fn stretch_lengths(lengths: &[f32], stretches: &[u32], extra: f32) -> Vec<f32> {
    let factor_of = |i: usize| stretches.get(i).copied().unwrap_or(1) as f32;

    if extra > 0.0 {
        let total_stretch: f32 = (0..lengths.len()).map(factor_of).sum();
        if total_stretch <= 0.0 {
            return lengths.to_vec();
        }
        return lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| len + extra * factor_of(i) / total_stretch)
            .collect();
    }

    let content: f32 = lengths.iter().sum();
    if content <= 0.0 {
        return lengths.to_vec();
    }
    let scale = (content + extra).max(0.0) / content;
    lengths.iter().map(|&len| len * scale).collect()
}

/// Give `placement` a new main-axis extent, re-querying the dependent cross
/// extent when the item asks for it.
fn stretch_placement(orientation: Orientation, placement: &mut Placement<'_>, main: f32) {
    let rect = placement.rect;
    let mut size = orientation.size(main, orientation.cross(rect.size()));
    match orientation {
        Orientation::Horizontal if placement.item.has_height_for_width() => {
            let hint = valid_size_hint(
                placement.item,
                SizeHintKind::Preferred,
                Size::with_fixed_width(main),
            );
            size.height = hint.height;
        }
        Orientation::Vertical if placement.item.has_width_for_height() => {
            let hint = valid_size_hint(
                placement.item,
                SizeHintKind::Preferred,
                Size::with_fixed_height(main),
            );
            size.width = hint.width;
        }
        _ => {}
    }
    placement.rect = rect.with_size(size);
}

/// Justify `line` along the main axis and align it on the cross axis.
///
/// Rects come in with their natural sizes and leave positioned relative to
/// `params.origin`. Returns the cross extent the line occupies.
pub fn justify_and_align(line: &mut [Placement<'_>], params: &LineParams, stretches: &[u32]) -> f32 {
    if line.is_empty() {
        return 0.0;
    }
    let orient = params.orientation;
    let count = line.len();
    let lengths: Vec<f32> = line.iter().map(|p| orient.main(p.rect.size())).collect();
    let gaps = params.spacing * (count - 1) as f32;
    let total = lengths.iter().sum::<f32>() + gaps;
    let extra = params.available - total;
    let constrained = params.available >= 0.0;

    let mut offset = 0.0;
    let mut spacing = params.spacing;
    match params.justify {
        Justify::Even if constrained => {
            let breadth = params.available / count as f32;
            spacing = 0.0;
            for placement in line.iter_mut() {
                stretch_placement(orient, placement, breadth);
            }
        }
        Justify::Stretch if constrained && extra.abs() >= MIN_EXTRA => {
            let stretched = stretch_lengths(&lengths, stretches, extra);
            for (placement, main) in line.iter_mut().zip(stretched) {
                stretch_placement(orient, placement, main);
            }
        }
        justify if constrained && extra >= MIN_EXTRA => {
            let (lead, gap) = offset_and_spacing(justify, extra, count);
            offset = lead;
            spacing += gap;
        }
        _ => {}
    }

    let across = params.across.unwrap_or_else(|| {
        line.iter()
            .map(|p| orient.cross(p.rect.size()))
            .fold(0.0, f32::max)
    });

    let main_origin = orient.main(Size::new(params.origin.x, params.origin.y));
    let cross_origin = orient.cross(Size::new(params.origin.x, params.origin.y));
    for placement in line.iter_mut() {
        let rect = placement.rect;
        let main_len = orient.main(rect.size());
        let mut cross_len = orient.cross(rect.size());
        let extra_across = across - cross_len;

        let mut cross_offset = 0.0;
        if extra_across >= MIN_EXTRA {
            match params.align {
                Align::Center => cross_offset = extra_across / 2.0,
                Align::End => cross_offset = extra_across,
                Align::Stretch => cross_len = across,
                Align::Start => {}
            }
        }

        placement.rect = Rect::from_origin_size(
            orient.point(main_origin + offset, cross_origin + cross_offset),
            orient.size(main_len, cross_len),
        );
        offset += main_len + spacing;
    }
    across
}
