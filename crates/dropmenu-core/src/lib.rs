//! Core types consumed by the dropmenu popup system.
//!
//! This crate provides the collaborator types the menu core is written
//! against, without implementing any menu behavior itself:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Host surfaces: [`Container`], [`IconRef`]
//! - Input: [`Event`], [`Key`], [`MouseButton`]
//! - Painting: [`Canvas`], [`TextStyle`], [`RecordingCanvas`]

mod canvas;
mod color;
mod event;
mod geometry;
mod surface;

pub use canvas::{Canvas, DrawCommand, RecordingCanvas, TextStyle};
pub use color::{Color, ColorParseError};
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use surface::{Container, IconRef};
