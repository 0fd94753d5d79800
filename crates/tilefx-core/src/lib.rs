//! Core types for the tilefx arrangement engine.
//!
//! This crate provides the value types shared by every arrangement:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`Margins`]
//! - The item capability contract: [`LayoutItem`], [`SizeHintKind`], [`ItemId`]

mod geometry;
mod item;

pub use geometry::{Margins, Point, Rect, Size};
pub use item::{valid_size_hint, ItemId, LayoutItem, SizeHintKind};
