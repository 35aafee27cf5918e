//! One open popup: its rows, viewport and scroll state.

use crate::node::{MenuNode, MenuPath, MenuTree, SubMenu};
use crate::placement::Placement;
use crate::presenter::RowPresenter;
use crate::style::{MenuStyle, StyleHandle};
use dropmenu_core::{Point, Rect, Size};
use serde::Serialize;
use std::ops::Range;

/// What a row displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    /// Clickable leaf
    Action,
    /// Divider
    Separator,
    /// Cascading entry
    SubMenu,
}

/// Vertical slot of one row, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    /// Row kind
    pub kind: RowKind,
    /// Offset of the row's top from the first row
    pub offset: f32,
    /// Row height
    pub height: f32,
    /// Reacts to hover and clicks
    pub interactive: bool,
    /// Submenu with at least one child
    pub cascades: bool,
}

/// Measured rows and natural size of a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    /// One entry per child, in display order
    pub rows: Vec<RowLayout>,
    /// Size the popup would take with no container limit
    pub size: Size,
}

impl PopupContent {
    /// Lay out the rows of `menu`.
    pub fn measure(menu: &SubMenu, style: &MenuStyle, presenter: &dyn RowPresenter) -> Self {
        let mut rows = Vec::with_capacity(menu.len());
        let mut offset = 0.0;
        let mut widest: f32 = 0.0;
        for node in menu.children() {
            let (kind, height) = match node {
                MenuNode::Action(_) => (RowKind::Action, style.row_height),
                MenuNode::SubMenu(_) => (RowKind::SubMenu, style.row_height),
                MenuNode::Separator => (RowKind::Separator, style.separator_height),
            };
            if let Some(label) = node.label() {
                widest = widest.max(presenter.label_width(label, style));
            }
            rows.push(RowLayout {
                kind,
                offset,
                height,
                interactive: node.is_interactive(),
                cascades: node.as_submenu().is_some_and(|sub| !sub.is_empty()),
            });
            offset += height;
        }
        let width = (widest + style.row_chrome_width()).max(style.min_width);
        Self {
            rows,
            size: Size::new(width, offset + style.padding * 2.0),
        }
    }
}

/// A visible popup bound to one submenu of a tree.
#[derive(Debug, Clone)]
pub struct Popup {
    depth: usize,
    tree: MenuTree,
    path: MenuPath,
    style: StyleHandle,
    anchor: Rect,
    placement: Placement,
    layer: u32,
    rows: Vec<RowLayout>,
    content_height: f32,
    scroll_offset: f32,
    highlighted: Option<usize>,
    open_child: Option<usize>,
}

impl Popup {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        depth: usize,
        tree: MenuTree,
        path: MenuPath,
        style: StyleHandle,
        anchor: Rect,
        placement: Placement,
        layer: u32,
        content: PopupContent,
    ) -> Self {
        Self {
            depth,
            tree,
            path,
            style,
            anchor,
            placement,
            layer,
            rows: content.rows,
            content_height: content.size.height,
            scroll_offset: 0.0,
            highlighted: None,
            open_child: None,
        }
    }

    /// Position in the chain, 0 for the root dropdown.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Path of the submenu this popup shows.
    #[must_use]
    pub const fn path(&self) -> &MenuPath {
        &self.path
    }

    /// The tree this popup belongs to.
    #[must_use]
    pub const fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// The submenu this popup shows.
    #[must_use]
    pub fn menu(&self) -> Option<&SubMenu> {
        self.tree.submenu(&self.path)
    }

    /// Node behind row `row`.
    #[must_use]
    pub fn node(&self, row: usize) -> Option<&MenuNode> {
        self.menu().and_then(|menu| menu.children().get(row))
    }

    /// Style snapshot taken when the chain opened.
    #[must_use]
    pub const fn style(&self) -> &StyleHandle {
        &self.style
    }

    /// Rectangle this popup was positioned against.
    #[must_use]
    pub const fn anchor(&self) -> Rect {
        self.anchor
    }

    /// Viewport in container coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.placement.bounds
    }

    /// Placement result, including flip flags.
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Stacking layer.
    #[must_use]
    pub const fn layer(&self) -> u32 {
        self.layer
    }

    /// Row layouts.
    #[must_use]
    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    /// Full content height including padding.
    #[must_use]
    pub const fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.placement.bounds.height).max(0.0)
    }

    /// Whether the content is taller than the viewport.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.max_scroll() > 0.0
    }

    /// Row under the pointer or keyboard focus.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Row whose submenu is open in the next popup.
    #[must_use]
    pub const fn open_child(&self) -> Option<usize> {
        self.open_child
    }

    pub(crate) fn set_highlighted(&mut self, row: Option<usize>) {
        self.highlighted = row.filter(|&i| self.rows.get(i).is_some_and(|r| r.interactive));
    }

    pub(crate) fn set_open_child(&mut self, row: Option<usize>) {
        self.open_child = row;
    }

    /// Index of the first row labelled `label`.
    #[must_use]
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.menu()?
            .children()
            .iter()
            .position(|node| node.label() == Some(label))
    }

    fn row_top(&self, row: &RowLayout) -> f32 {
        self.placement.bounds.y + self.style.padding + row.offset - self.scroll_offset
    }

    /// Row rectangle in container coordinates, after scrolling.
    ///
    /// May lie partly or wholly outside the viewport.
    #[must_use]
    pub fn row_rect(&self, row: usize) -> Option<Rect> {
        let layout = self.rows.get(row)?;
        let b = self.placement.bounds;
        Some(Rect::new(b.x, self.row_top(layout), b.width, layout.height))
    }

    /// Visible part of a row.
    #[must_use]
    pub fn visible_row_rect(&self, row: usize) -> Option<Rect> {
        self.row_rect(row)?.intersection(&self.placement.bounds)
    }

    /// Center of the visible part of a row, for pointing at it.
    #[must_use]
    pub fn row_center(&self, row: usize) -> Option<Point> {
        self.visible_row_rect(row).map(|r| r.center())
    }

    /// Row under `point`, accounting for the scroll offset.
    #[must_use]
    pub fn row_at(&self, point: Point) -> Option<usize> {
        let b = self.placement.bounds;
        if !b.contains_point(&point) {
            return None;
        }
        let local = point.y - b.y - self.style.padding + self.scroll_offset;
        if local < 0.0 {
            return None;
        }
        let i = self
            .rows
            .partition_point(|r| r.offset + r.height <= local);
        self.rows
            .get(i)
            .filter(|r| local >= r.offset)
            .map(|_| i)
    }

    /// Rows intersecting the viewport.
    #[must_use]
    pub fn visible_rows(&self) -> Range<usize> {
        let top = self.scroll_offset - self.style.padding;
        let bottom = top + self.placement.bounds.height;
        let start = self.rows.partition_point(|r| r.offset + r.height <= top);
        let end = self.rows.partition_point(|r| r.offset < bottom);
        start..end.max(start)
    }

    /// Scroll by `delta` pixels, clamped. Returns whether anything moved.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let next = (self.scroll_offset + delta).clamp(0.0, self.max_scroll());
        let moved = (next - self.scroll_offset).abs() > f32::EPSILON;
        self.scroll_offset = next;
        moved
    }

    /// Scroll just enough for `row` to be fully visible.
    pub fn scroll_into_view(&mut self, row: usize) {
        let Some(layout) = self.rows.get(row) else {
            return;
        };
        let top = layout.offset + self.style.padding;
        let bottom = top + layout.height;
        let view = self.placement.bounds.height;
        if top < self.scroll_offset {
            self.scroll_offset = layout.offset;
        } else if bottom > self.scroll_offset + view {
            self.scroll_offset = bottom - view;
        }
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
    }

    /// Thumb rectangle of the scroll indicator.
    #[must_use]
    pub fn scroll_thumb(&self) -> Option<Rect> {
        if !self.is_scrollable() {
            return None;
        }
        let b = self.placement.bounds;
        let ratio = b.height / self.content_height;
        let height = (b.height * ratio).max(12.0).min(b.height);
        let travel = b.height - height;
        let y = b.y + travel * (self.scroll_offset / self.max_scroll());
        Some(Rect::new(b.right() - 4.0, y, 3.0, height))
    }

    /// Next interactive row after (or before) `from`, wrapping.
    #[must_use]
    pub fn next_selectable(&self, from: Option<usize>, forward: bool) -> Option<usize> {
        let len = self.rows.len();
        if len == 0 {
            return None;
        }
        let mut idx = match from {
            None if forward => 0,
            None => len - 1,
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
        };
        for _ in 0..len {
            if self.rows[idx].interactive {
                return Some(idx);
            }
            idx = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        }
        None
    }

    /// First interactive row.
    #[must_use]
    pub fn first_selectable(&self) -> Option<usize> {
        self.next_selectable(None, true)
    }

    /// Last interactive row.
    #[must_use]
    pub fn last_selectable(&self) -> Option<usize> {
        self.next_selectable(None, false)
    }
}

/// Serializable view of a popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupSnapshot {
    /// Chain depth
    pub depth: usize,
    /// Path of the displayed submenu
    pub path: MenuPath,
    /// Stacking layer
    pub layer: u32,
    /// Viewport
    pub bounds: Rect,
    /// Current scroll offset
    pub scroll_offset: f32,
    /// Whether the content exceeds the viewport
    pub scrollable: bool,
    /// Highlighted row
    pub highlighted: Option<usize>,
    /// Row with an open submenu
    pub open_child: Option<usize>,
    /// Row labels; separators are `---`
    pub rows: Vec<String>,
}

impl From<&Popup> for PopupSnapshot {
    fn from(popup: &Popup) -> Self {
        let rows = popup
            .menu()
            .map(|menu| {
                menu.children()
                    .iter()
                    .map(|node| node.label().unwrap_or("---").to_string())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            depth: popup.depth,
            path: popup.path.clone(),
            layer: popup.layer,
            bounds: popup.bounds(),
            scroll_offset: popup.scroll_offset,
            scrollable: popup.is_scrollable(),
            highlighted: popup.highlighted,
            open_child: popup.open_child,
            rows,
        }
    }
}
