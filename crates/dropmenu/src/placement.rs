//! Popup positioning against an anchor inside a container.
//!
//! Each axis is decided on its own: take the preferred side if the popup
//! fits there, otherwise flip to the opposite side of the anchor. If
//! neither side fits, the popup takes the side with more room and is cut
//! to that room, leaving the rest to scrolling, so it never covers its
//! anchor. The result is always clamped into the container.

use dropmenu_core::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Where a popup ended up relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Final popup viewport in container coordinates
    pub bounds: Rect,
    /// Grew toward the leading edge instead of the trailing edge
    pub flipped_x: bool,
    /// Grew upward instead of downward
    pub flipped_y: bool,
}

/// Bring an anchor that lies entirely outside `container` to the nearest
/// position inside it. Returns the anchor and whether it was moved.
#[must_use]
pub fn clamp_anchor(anchor: Rect, container: &Rect) -> (Rect, bool) {
    let outside = anchor.right() < container.left()
        || anchor.left() > container.right()
        || anchor.bottom() < container.top()
        || anchor.top() > container.bottom();
    if !outside {
        return (anchor, false);
    }
    let shrunk = Rect::new(
        anchor.x,
        anchor.y,
        anchor.width.min(container.width),
        anchor.height.min(container.height),
    );
    (shrunk.clamp_into(container), true)
}

/// Position a depth-0 dropdown: below the anchor, aligned to its leading
/// edge.
///
/// Only the vertical axis separates the popup from its anchor, so only
/// that axis is cut to fit; horizontally the popup slides along the
/// container edge instead.
#[must_use]
pub fn place_dropdown(anchor: Rect, content: Size, container: &Rect) -> Placement {
    let size = content.capped_by(container.size());
    let x = place_axis(
        anchor.left(),
        anchor.right(),
        size.width,
        container.left(),
        container.right(),
    );
    let y = place_axis(
        anchor.bottom(),
        anchor.top(),
        size.height,
        container.top(),
        container.bottom(),
    );
    let bounds = Rect::new(x.start, y.start, size.width, y.len);
    finish(bounds, container, x.flipped, y.flipped)
}

/// Position a cascaded submenu next to the parent popup, with its first
/// row level with `row`.
#[must_use]
pub fn place_cascade(
    row: Rect,
    parent: Rect,
    content: Size,
    container: &Rect,
    overlap: f32,
    padding: f32,
) -> Placement {
    let size = content.capped_by(container.size());
    let x = place_axis(
        parent.right() - overlap,
        parent.left() + overlap,
        size.width,
        container.left(),
        container.right(),
    );
    let y = place_axis(
        row.top() - padding,
        row.bottom() + padding,
        size.height,
        container.top(),
        container.bottom(),
    );
    let bounds = Rect::new(x.start, y.start, x.len, y.len);
    finish(bounds, container, x.flipped, y.flipped)
}

/// One axis of a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: f32,
    len: f32,
    flipped: bool,
}

/// Place `len` on one axis between `lo` and `hi`.
///
/// `forward_start` is where the popup starts when growing in the positive
/// direction, `backward_end` is where it ends when flipped. When neither
/// side holds `len`, the span is cut to the larger side's room.
fn place_axis(forward_start: f32, backward_end: f32, len: f32, lo: f32, hi: f32) -> Span {
    let room_forward = hi - forward_start;
    let room_backward = backward_end - lo;
    if len <= room_forward {
        return Span {
            start: forward_start,
            len,
            flipped: false,
        };
    }
    if len <= room_backward {
        return Span {
            start: backward_end - len,
            len,
            flipped: true,
        };
    }
    let flipped = room_backward > room_forward;
    let room = room_forward.max(room_backward);
    if room <= 0.0 {
        // Anchor covers the whole axis; nothing to be adjacent to
        let start = if flipped { backward_end - len } else { forward_start };
        return Span { start, len, flipped };
    }
    Span {
        start: if flipped { lo } else { forward_start },
        len: room,
        flipped,
    }
}

fn finish(bounds: Rect, container: &Rect, flipped_x: bool, flipped_y: bool) -> Placement {
    Placement {
        bounds: bounds.clamp_into(container),
        flipped_x,
        flipped_y,
    }
}
