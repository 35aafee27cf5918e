//! Host-owned surfaces the menu system draws into.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Layout surface that popups are positioned and stacked in.
///
/// `bounds` is the container-local coordinate space; anchors handed to the
/// menu manager are expressed in the same space. Popups are stacked above
/// `z_base`, one layer per depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Visible area of the container
    pub bounds: Rect,
    /// Stacking order of the depth-0 popup
    pub z_base: u32,
}

impl Container {
    /// Default stacking base, above ordinary host content.
    pub const OVERLAY_LAYER: u32 = 1000;

    /// Create a container covering `bounds`.
    #[must_use]
    pub const fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            z_base: Self::OVERLAY_LAYER,
        }
    }

    /// Create a container of the given size at the origin.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(Rect::new(0.0, 0.0, width, height))
    }

    /// Set the stacking base.
    #[must_use]
    pub const fn with_z_base(mut self, z_base: u32) -> Self {
        self.z_base = z_base;
        self
    }

    /// Stacking order of the popup at `depth`.
    #[must_use]
    pub const fn layer_for_depth(&self, depth: usize) -> u32 {
        self.z_base + depth as u32
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::sized(1280.0, 720.0)
    }
}

/// Opaque reference to an icon owned by the presentation layer.
///
/// The menu system never looks inside; it only hands the reference back to
/// the row presenter.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconRef(Arc<str>);

impl IconRef {
    /// Create an icon reference from a host-defined key.
    #[must_use]
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// The host-defined key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IconRef({})", self.0)
    }
}
