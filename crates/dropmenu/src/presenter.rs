//! The presentation seam: measuring labels and painting rows.
//!
//! The manager decides *what* each row is and *where* it goes; a
//! [`RowPresenter`] decides how it looks. Hosts with real text shaping
//! supply their own presenter; [`DefaultPresenter`] estimates label widths
//! from the style and paints with plain [`Canvas`] primitives.

use crate::popup::RowKind;
use crate::style::MenuStyle;
use dropmenu_core::{Canvas, IconRef, Point, Rect};

/// Everything a presenter needs to draw one row.
#[derive(Debug, Clone, Copy)]
pub struct RowVisual<'a> {
    /// Row rectangle in container coordinates (may extend past the clip)
    pub bounds: Rect,
    /// Row kind
    pub kind: RowKind,
    /// Label; empty for separators
    pub label: &'a str,
    /// Icon to show, already filtered to selected rows
    pub icon: Option<&'a IconRef>,
    /// Whether the row accepts clicks
    pub enabled: bool,
    /// Whether the row is marked as the current choice
    pub selected: bool,
    /// Whether the row is under the pointer or keyboard focus
    pub highlighted: bool,
    /// Whether this row's submenu is currently open
    pub expanded: bool,
}

/// Draws popups and rows for the menu manager.
pub trait RowPresenter {
    /// Width of `label` as it will be drawn.
    fn label_width(&self, label: &str, style: &MenuStyle) -> f32;

    /// Draw the popup background and border.
    fn paint_frame(&self, canvas: &mut dyn Canvas, bounds: Rect, style: &MenuStyle);

    /// Draw one row.
    fn paint_row(&self, canvas: &mut dyn Canvas, row: &RowVisual<'_>, style: &MenuStyle);

    /// Draw the scroll indicator of a scrollable popup.
    fn paint_scrollbar(&self, canvas: &mut dyn Canvas, thumb: Rect, style: &MenuStyle) {
        canvas.fill_rect(thumb, style.border);
    }
}

/// Canvas-primitive presenter with estimated text metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPresenter;

impl RowPresenter for DefaultPresenter {
    fn label_width(&self, label: &str, style: &MenuStyle) -> f32 {
        label.chars().count() as f32 * style.char_width
    }

    fn paint_frame(&self, canvas: &mut dyn Canvas, bounds: Rect, style: &MenuStyle) {
        match &style.background_template {
            Some(template) => canvas.draw_template(template, bounds),
            None => canvas.fill_rect(bounds, style.background),
        }
        canvas.stroke_rect(bounds, style.border, 1.0);
    }

    fn paint_row(&self, canvas: &mut dyn Canvas, row: &RowVisual<'_>, style: &MenuStyle) {
        let b = row.bounds;
        if row.kind == RowKind::Separator {
            let y = b.y + b.height / 2.0;
            canvas.draw_line(
                Point::new(b.x + style.label_inset, y),
                Point::new(b.right() - style.label_inset, y),
                style.separator,
                1.0,
            );
            return;
        }

        if (row.highlighted || row.expanded) && row.enabled {
            canvas.fill_rect(b, style.highlight);
        }

        if let Some(icon) = row.icon {
            let side = (style.icon_column - 4.0).min(b.height - 4.0).max(0.0);
            let icon_rect = Rect::new(
                b.x + (style.icon_column - side) / 2.0,
                b.y + (b.height - side) / 2.0,
                side,
                side,
            );
            canvas.draw_icon(icon, icon_rect);
        }

        let text = style.label_style(row.enabled);
        let baseline = b.y + (b.height + style.text_size) / 2.0 - 2.0;
        canvas.draw_text(
            row.label,
            Point::new(b.x + style.icon_column + style.label_inset, baseline),
            &text,
        );

        if row.kind == RowKind::SubMenu {
            canvas.draw_text(
                "›",
                Point::new(b.right() - style.cascade_column + 6.0, baseline),
                &text,
            );
        }
    }
}
