#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
//! Arrangement engine for tilefx.
//!
//! An arrangement turns a container rectangle and an ordered list of items
//! into one rectangle per visible item. Items are never owned; they only
//! answer size-hint queries through [`tilefx_core::LayoutItem`].
//!
//! - [`LinearArrangement`]: one row or column, justified and aligned
//! - [`FlowArrangement`]: rows that wrap when the width runs out
//! - [`SwitchArrangement`]: row or column depending on the width
//! - [`Matrix`]: uniform grid with index, cell and point mappings
//! - [`PackedArrangement`] and [`PackedGridArrangement`]: free-rectangle
//!   packing on top of [`Packer`]
//!
//! Every arrangement also answers the size-hint contract of
//! [`Arrangement::size_hint`], and can be described in YAML through
//! [`ArrangementConfig`].

mod arrangement;
mod config;
mod error;
mod flow;
mod justify;
mod linear;
mod matrix;
mod packed;
mod packer;
mod switch;

pub use arrangement::{Arrangement, ArrangementBase, Placement};
pub use config::{
    ArrangementConfig, FlowConfig, LinearConfig, MarginsConfig, MatrixConfig, PackedConfig,
    PackedGridConfig, SpacingConfig, SwitchConfig,
};
pub use error::LayoutError;
pub use flow::FlowArrangement;
pub use justify::{justify_and_align, offset_and_spacing, Align, Justify, LineParams, Orientation};
pub use linear::LinearArrangement;
pub use matrix::{
    CellRect, Matrix, MatrixCell, DEFAULT_MATRIX_SPACING, DEFAULT_MIN_COLUMN_WIDTH,
    DEFAULT_ROW_HEIGHT, UNBOUNDED,
};
pub use packed::{GridPos, PackedArrangement, PackedGridArrangement, Span, DEFAULT_CELL_SIZE};
pub use packer::{Packer, PACKING_TOLERANCE};
pub use switch::{SwitchArrangement, DEFAULT_BREAK_WIDTH};
