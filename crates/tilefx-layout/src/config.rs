//! Declarative arrangement configuration.
//!
//! Every arrangement can be described in YAML and built at runtime:
//!
//! ```yaml
//! type: linear
//! orientation: horizontal
//! justify: space_between
//! spacing: 8
//! margins: { left: 4, top: 2, right: 4, bottom: 2 }
//! ```
//!
//! Omitted fields take the arrangement's defaults.

use crate::arrangement::Arrangement;
use crate::error::LayoutError;
use crate::flow::FlowArrangement;
use crate::justify::{Align, Justify, Orientation};
use crate::linear::LinearArrangement;
use crate::matrix::{
    Matrix, DEFAULT_MATRIX_SPACING, DEFAULT_MIN_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, UNBOUNDED,
};
use crate::packed::{GridPos, PackedArrangement, PackedGridArrangement, Span, DEFAULT_CELL_SIZE};
use crate::switch::{SwitchArrangement, DEFAULT_BREAK_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilefx_core::{ItemId, Margins, Size};

/// Spacing written either as one number or per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpacingConfig {
    /// Same gap on both axes
    Uniform(f32),
    /// Horizontal and vertical gaps
    Axes {
        /// Horizontal gap
        width: f32,
        /// Vertical gap
        height: f32,
    },
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl SpacingConfig {
    /// As a size, `width` horizontal and `height` vertical.
    #[must_use]
    pub const fn to_size(self) -> Size {
        match self {
            Self::Uniform(gap) => Size::new(gap, gap),
            Self::Axes { width, height } => Size::new(width, height),
        }
    }
}

/// Margins written either as one number or per edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginsConfig {
    /// Same margin on every edge
    Uniform(f32),
    /// Per-edge margins
    Edges(Margins),
}

impl Default for MarginsConfig {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl MarginsConfig {
    /// As margins.
    #[must_use]
    pub const fn to_margins(self) -> Margins {
        match self {
            Self::Uniform(amount) => Margins::uniform(amount),
            Self::Edges(margins) => margins,
        }
    }
}

/// Settings for [`LinearArrangement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    /// Main axis
    pub orientation: Orientation,
    /// Main-axis distribution
    pub justify: Justify,
    /// Cross-axis alignment
    pub align: Align,
    /// Gap between items
    pub spacing: SpacingConfig,
    /// Container margins
    pub margins: MarginsConfig,
    /// Stretch weights keyed by item id
    pub stretch: BTreeMap<u64, u32>,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            justify: Justify::Start,
            align: Align::Stretch,
            spacing: SpacingConfig::default(),
            margins: MarginsConfig::default(),
            stretch: BTreeMap::new(),
        }
    }
}

impl LinearConfig {
    /// Build the configured arrangement.
    #[must_use]
    pub fn build(&self) -> LinearArrangement {
        let mut arr = LinearArrangement::new(self.orientation);
        arr.set_justify(self.justify);
        arr.set_align(self.align);
        arr.set_spacing(self.spacing.to_size());
        arr.set_margins(self.margins.to_margins());
        for (&id, &factor) in &self.stretch {
            arr.set_stretch_factor(ItemId::new(id), factor);
        }
        arr.take_invalidated();
        arr
    }
}

/// Settings for [`FlowArrangement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Main axis
    pub orientation: Orientation,
    /// Distribution within each line
    pub justify: Justify,
    /// Distribution of lines
    pub content_justify: Justify,
    /// Cross-axis alignment within a line
    pub align: Align,
    /// Smallest main-axis extent of any item
    pub min_item_length: f32,
    /// Item gap (`width` for horizontal flows) and line gap
    pub spacing: SpacingConfig,
    /// Container margins
    pub margins: MarginsConfig,
    /// Stretch weights keyed by item id
    pub stretch: BTreeMap<u64, u32>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            justify: Justify::Start,
            content_justify: Justify::Start,
            align: Align::Start,
            min_item_length: 0.0,
            spacing: SpacingConfig::default(),
            margins: MarginsConfig::default(),
            stretch: BTreeMap::new(),
        }
    }
}

impl FlowConfig {
    /// Build the configured arrangement.
    #[must_use]
    pub fn build(&self) -> FlowArrangement {
        let mut arr = FlowArrangement::new(self.orientation);
        arr.set_justify(self.justify);
        arr.set_content_justify(self.content_justify);
        arr.set_align(self.align);
        arr.set_min_item_length(self.min_item_length);
        arr.set_spacing(self.spacing.to_size());
        arr.set_margins(self.margins.to_margins());
        for (&id, &factor) in &self.stretch {
            arr.set_stretch_factor(ItemId::new(id), factor);
        }
        arr.take_invalidated();
        arr
    }
}

/// Settings for [`SwitchArrangement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// Widths above this lay out horizontally
    pub break_width: f32,
    /// Gap between items
    pub spacing: SpacingConfig,
    /// Container margins
    pub margins: MarginsConfig,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            break_width: DEFAULT_BREAK_WIDTH,
            spacing: SpacingConfig::default(),
            margins: MarginsConfig::default(),
        }
    }
}

impl SwitchConfig {
    /// Build the configured arrangement.
    #[must_use]
    pub fn build(&self) -> SwitchArrangement {
        let mut arr = SwitchArrangement::new(self.break_width);
        arr.set_spacing(self.spacing.to_size());
        arr.set_margins(self.margins.to_margins());
        arr.take_invalidated();
        arr
    }
}

/// Settings for [`Matrix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Narrowest column
    pub min_column_width: f32,
    /// Widest stretched column
    pub max_column_width: f32,
    /// Column count ceiling
    pub max_column_count: usize,
    /// Height of each row
    pub row_height: f32,
    /// Whether columns share leftover width
    pub column_stretch: bool,
    /// Column and row gaps
    pub spacing: SpacingConfig,
    /// Container margins
    pub margins: MarginsConfig,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
            max_column_width: UNBOUNDED as f32,
            max_column_count: UNBOUNDED,
            row_height: DEFAULT_ROW_HEIGHT,
            column_stretch: true,
            spacing: SpacingConfig::Uniform(DEFAULT_MATRIX_SPACING),
            margins: MarginsConfig::default(),
        }
    }
}

impl MatrixConfig {
    /// Build the configured arrangement.
    #[must_use]
    pub fn build(&self) -> Matrix {
        let mut arr = Matrix::new();
        arr.set_min_column_width(self.min_column_width);
        arr.set_max_column_width(self.max_column_width);
        arr.set_max_column_count(self.max_column_count);
        arr.set_row_height(self.row_height);
        arr.set_column_stretch(self.column_stretch);
        arr.set_spacing(self.spacing.to_size());
        arr.set_margins(self.margins.to_margins());
        arr.take_invalidated();
        arr
    }
}

/// Settings for [`PackedArrangement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackedConfig {
    /// Fill direction
    pub orientation: Orientation,
    /// Fill holes left by earlier items
    pub dense: bool,
    /// Gap between items
    pub spacing: SpacingConfig,
    /// Container margins
    pub margins: MarginsConfig,
}

impl Default for PackedConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            dense: true,
            spacing: SpacingConfig::default(),
            margins: MarginsConfig::default(),
        }
    }
}

impl PackedConfig {
    /// Build the configured arrangement.
    #[must_use]
    pub fn build(&self) -> PackedArrangement {
        let mut arr = PackedArrangement::new(self.orientation);
        arr.set_dense(self.dense);
        arr.set_spacing(self.spacing.to_size());
        arr.set_margins(self.margins.to_margins());
        arr.take_invalidated();
        arr
    }
}

/// Settings for [`PackedGridArrangement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackedGridConfig {
    /// Fill direction
    pub orientation: Orientation,
    /// Fill holes left by earlier items
    pub dense: bool,
    /// Unstretched cell size
    pub cell_size: Size,
    /// Grow cells to use the whole main-axis extent
    pub stretch: bool,
    /// Gap between cells
    pub spacing: SpacingConfig,
    /// Container margins
    pub margins: MarginsConfig,
    /// Pinned cells keyed by item id
    pub positions: BTreeMap<u64, GridPos>,
    /// Spans keyed by item id
    pub spans: BTreeMap<u64, Span>,
}

impl Default for PackedGridConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            dense: true,
            cell_size: DEFAULT_CELL_SIZE,
            stretch: true,
            spacing: SpacingConfig::default(),
            margins: MarginsConfig::default(),
            positions: BTreeMap::new(),
            spans: BTreeMap::new(),
        }
    }
}

impl PackedGridConfig {
    /// Build the configured arrangement.
    #[must_use]
    pub fn build(&self) -> PackedGridArrangement {
        let mut arr = PackedGridArrangement::new(self.orientation);
        arr.set_dense(self.dense);
        arr.set_cell_size(self.cell_size);
        arr.set_stretch(self.stretch);
        arr.set_spacing(self.spacing.to_size());
        arr.set_margins(self.margins.to_margins());
        for (&id, &pos) in &self.positions {
            arr.set_item_pos(ItemId::new(id), Some(pos));
        }
        for (&id, &span) in &self.spans {
            arr.set_item_spans(ItemId::new(id), span);
        }
        arr.take_invalidated();
        arr
    }
}

/// Any arrangement, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrangementConfig {
    /// Single row or column
    Linear(LinearConfig),
    /// Wrapping lines
    Flow(FlowConfig),
    /// Row or column depending on width
    Switch(SwitchConfig),
    /// Uniform grid
    Matrix(MatrixConfig),
    /// Free-rectangle packing
    Packed(PackedConfig),
    /// Packing on a cell grid
    PackedGrid(PackedGridConfig),
}

impl ArrangementConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Config`] for malformed YAML, an unknown `type`
    /// or a field of the wrong shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, LayoutError> {
        let config = serde_yaml_ng::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, LayoutError> {
        let yaml = serde_yaml_ng::to_string(self)?;
        Ok(yaml)
    }

    /// Short name of the described arrangement.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Flow(_) => "flow",
            Self::Switch(_) => "switch",
            Self::Matrix(_) => "matrix",
            Self::Packed(_) => "packed",
            Self::PackedGrid(_) => "packed_grid",
        }
    }

    /// Build the described arrangement.
    #[must_use]
    pub fn build(&self) -> Box<dyn Arrangement> {
        tracing::debug!(kind = self.kind(), "building arrangement from config");
        match self {
            Self::Linear(c) => Box::new(c.build()),
            Self::Flow(c) => Box::new(c.build()),
            Self::Switch(c) => Box::new(c.build()),
            Self::Matrix(c) => Box::new(c.build()),
            Self::Packed(c) => Box::new(c.build()),
            Self::PackedGrid(c) => Box::new(c.build()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linear() {
        let yaml = r"
type: linear
orientation: horizontal
justify: space_between
align: center
spacing: 8
stretch:
  3: 2
";
        let config = ArrangementConfig::from_yaml(yaml).unwrap();
        let ArrangementConfig::Linear(linear) = &config else {
            panic!("expected linear, got {config:?}");
        };
        assert_eq!(linear.orientation, Orientation::Horizontal);
        assert_eq!(linear.justify, Justify::SpaceBetween);
        assert_eq!(linear.align, Align::Center);
        assert_eq!(linear.spacing, SpacingConfig::Uniform(8.0));

        let arr = linear.build();
        assert_eq!(arr.item_spacing(), 8.0);
        assert_eq!(arr.stretch_factor(ItemId::new(3)), 2);
    }

    #[test]
    fn test_defaults_match_arrangements() {
        let ArrangementConfig::Linear(linear) = ArrangementConfig::from_yaml("type: linear").unwrap()
        else {
            panic!("expected linear");
        };
        assert_eq!(linear.orientation, Orientation::Vertical);
        assert_eq!(linear.align, Align::Stretch);

        let ArrangementConfig::Matrix(matrix) = ArrangementConfig::from_yaml("type: matrix").unwrap()
        else {
            panic!("expected matrix");
        };
        let built = matrix.build();
        assert_eq!(built.min_column_width(), 200.0);
        assert_eq!(built.spacing(), Size::new(10.0, 10.0));
    }

    #[test]
    fn test_per_axis_spacing_and_edge_margins() {
        let yaml = r"
type: flow
spacing: { width: 4, height: 12 }
margins: { left: 1, top: 2, right: 3, bottom: 4 }
";
        let ArrangementConfig::Flow(flow) = ArrangementConfig::from_yaml(yaml).unwrap() else {
            panic!("expected flow");
        };
        let arr = flow.build();
        assert_eq!(arr.item_spacing(), 4.0);
        assert_eq!(arr.line_spacing(), 12.0);
        assert_eq!(arr.margins(), Margins::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_packed_grid_positions_and_spans() {
        let yaml = r"
type: packed_grid
dense: false
cell_size: { width: 40, height: 40 }
positions:
  7: { column: -1, row: 0 }
spans:
  7: { columns: 2 }
";
        let ArrangementConfig::PackedGrid(grid) = ArrangementConfig::from_yaml(yaml).unwrap() else {
            panic!("expected packed_grid");
        };
        let arr = grid.build();
        assert!(!arr.dense());
        assert_eq!(arr.cell_size(), Size::new(40.0, 40.0));
        assert_eq!(arr.item_pos(ItemId::new(7)), Some(GridPos::new(-1, 0)));
        assert_eq!(arr.item_spans(ItemId::new(7)), Span::new(2, 1));
    }

    #[test]
    fn test_build_boxed() {
        let config = ArrangementConfig::from_yaml("type: switch\nbreak_width: 320").unwrap();
        assert_eq!(config.kind(), "switch");
        let mut arr = config.build();
        assert_eq!(arr.kind(), "switch");
        assert!(!arr.take_invalidated());
    }

    #[test]
    fn test_unknown_type_is_config_error() {
        let err = ArrangementConfig::from_yaml("type: spiral").unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
    }

    #[test]
    fn test_bad_enum_value_is_config_error() {
        let err = ArrangementConfig::from_yaml("type: linear\njustify: sideways").unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ArrangementConfig::Packed(PackedConfig {
            orientation: Orientation::Vertical,
            dense: false,
            ..PackedConfig::default()
        });
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("type: packed"));
        assert_eq!(ArrangementConfig::from_yaml(&yaml).unwrap(), config);
    }
}
