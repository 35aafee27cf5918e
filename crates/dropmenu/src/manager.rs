//! The popup chain and its event handling.
//!
//! A [`MenuManager`] owns at most one chain of popups. Depth 0 is the
//! dropdown opened by [`MenuManager::create_dropdown_menu`]; each deeper
//! popup shows a submenu of the row that opened it. Popups are always torn
//! down deepest first.
//!
//! ```
//! use dropmenu::{Container, Event, MenuManager, MenuResponse, MouseButton, Rect, StackBuilder};
//!
//! let mut builder = StackBuilder::new("file");
//! builder.add_action("Open", || {}).unwrap();
//! let menu = builder.root();
//!
//! let mut manager = MenuManager::new();
//! let container = Container::sized(800.0, 600.0);
//! manager
//!     .create_dropdown_menu(&container, &menu, Rect::new(10.0, 10.0, 80.0, 24.0))
//!     .unwrap();
//!
//! let at = manager.popup(0).and_then(|p| p.row_center(0)).unwrap();
//! let response = manager.dispatch(&Event::MouseDown { position: at, button: MouseButton::Left });
//! assert!(matches!(response, MenuResponse::Activated(_)));
//! assert!(!manager.is_open());
//! ```

use crate::error::{MenuError, Result};
use crate::node::{Callback, MenuNode, MenuPath, MenuTree};
use crate::placement::{clamp_anchor, place_cascade, place_dropdown};
use crate::popup::{Popup, PopupContent, PopupSnapshot, RowKind};
use crate::presenter::{DefaultPresenter, RowPresenter, RowVisual};
use crate::settle::{CascadeTarget, SettleTimer};
use crate::style::{MenuStyle, StyleHandle};
use dropmenu_core::{Canvas, Container, Event, Key, MouseButton, Point, Rect};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Why a chain was closed without an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DismissReason {
    /// Pointer pressed outside every popup
    OutsideClick,
    /// Escape pressed
    Cancelled,
    /// The container was resized
    LayoutChanged,
    /// A new dropdown replaced the chain
    Replaced,
    /// The host called [`MenuManager::dismiss`]
    Programmatic,
}

/// A selected action. The chain is already closed when this exists.
pub struct Activation {
    /// Path of the selected action
    pub path: MenuPath,
    /// Label of the selected action
    pub label: String,
    callback: Option<Callback>,
}

impl Activation {
    /// Run the callback if it has not run yet. Returns whether it ran.
    pub fn invoke(&mut self) -> bool {
        match self.callback.take() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Whether a callback is still waiting to run.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("path", &self.path)
            .field("label", &self.label)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Outcome of [`MenuManager::handle_event`].
#[derive(Debug)]
pub enum MenuResponse {
    /// The event does not concern the menu
    Ignored,
    /// The event was used by the menu
    Consumed,
    /// An action was selected and the chain closed
    Activated(Activation),
    /// The chain closed without a selection
    Dismissed(DismissReason),
}

impl MenuResponse {
    /// Whether the host should stop propagating the event.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Result of opening a dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Opened {
    /// Viewport of the depth-0 popup
    pub bounds: Rect,
    /// Content is taller than the viewport
    pub scrollable: bool,
    /// The anchor lay outside the container and was moved
    pub anchor_clamped: bool,
    /// Popup grew toward the leading edge
    pub flipped_x: bool,
    /// Popup grew upward
    pub flipped_y: bool,
    /// A previously open chain was closed to make room
    pub replaced: bool,
}

/// Serializable view of the open chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSnapshot {
    /// Title of the tree on display
    pub title: Option<String>,
    /// Popups from depth 0 outward
    pub popups: Vec<PopupSnapshot>,
    /// Cascade waiting on the settle timer
    pub pending_cascade: Option<(usize, usize)>,
}

/// Owner of the popup chain.
pub struct MenuManager {
    style: StyleHandle,
    presenter: Box<dyn RowPresenter>,
    container: Container,
    chain: Vec<Popup>,
    timer: SettleTimer,
    pointer: Option<Point>,
}

impl Default for MenuManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MenuManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuManager")
            .field("container", &self.container)
            .field("depth", &self.chain.len())
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl MenuManager {
    /// Manager with the simple style and the default presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_style(MenuStyle::simple().into_handle())
    }

    /// Manager with a given current style.
    #[must_use]
    pub fn with_style(style: StyleHandle) -> Self {
        Self {
            style,
            presenter: Box::new(DefaultPresenter),
            container: Container::default(),
            chain: Vec::new(),
            timer: SettleTimer::new(),
            pointer: None,
        }
    }

    /// Replace the presenter used for measuring and painting.
    #[must_use]
    pub fn with_presenter(mut self, presenter: impl RowPresenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    /// Style the next chain will use.
    #[must_use]
    pub const fn current_style(&self) -> &StyleHandle {
        &self.style
    }

    /// Change the style for future chains. An open chain keeps its own.
    pub fn set_current_style(&mut self, style: StyleHandle) {
        debug!(open = self.is_open(), "current menu style replaced");
        self.style = style;
    }

    /// Whether a chain is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Number of open popups.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Open popups from depth 0 outward.
    #[must_use]
    pub fn popups(&self) -> &[Popup] {
        &self.chain
    }

    /// Popup at `depth`.
    #[must_use]
    pub fn popup(&self, depth: usize) -> Option<&Popup> {
        self.chain.get(depth)
    }

    /// Container of the open chain.
    #[must_use]
    pub const fn container(&self) -> &Container {
        &self.container
    }

    /// Cascade waiting on the settle timer.
    #[must_use]
    pub fn pending_cascade(&self) -> Option<CascadeTarget> {
        self.timer.pending_target()
    }

    /// Serializable state of the chain.
    #[must_use]
    pub fn chain_snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            title: self.chain.first().map(|p| p.tree().title().to_string()),
            popups: self.chain.iter().map(PopupSnapshot::from).collect(),
            pending_cascade: self.timer.pending_target().map(|t| (t.depth, t.row)),
        }
    }

    /// Scroll `row` of the popup at `depth` into view and return its
    /// center. Popups deeper than `depth` close if the view had to move.
    pub fn reveal_row(&mut self, depth: usize, row: usize) -> Option<Point> {
        let popup = self.chain.get_mut(depth)?;
        if popup.row_center(row).is_none() {
            popup.scroll_into_view(row);
            trace!(depth, row, offset = popup.scroll_offset(), "row revealed");
            self.close_deeper_than(depth);
        }
        self.chain.get(depth)?.row_center(row)
    }

    /// Open `root` as a dropdown under `anchor`, replacing any open chain.
    ///
    /// # Errors
    ///
    /// [`MenuError::EmptyMenu`] if `root` has no items; the open chain, if
    /// any, is left as it was.
    pub fn create_dropdown_menu(
        &mut self,
        container: &Container,
        root: &MenuTree,
        anchor: Rect,
    ) -> Result<Opened> {
        if root.root().is_empty() {
            debug!(title = root.title(), "refusing to open empty menu");
            return Err(MenuError::EmptyMenu {
                label: root.title().to_string(),
            });
        }
        let replaced = self.is_open();
        if replaced {
            self.teardown(Some(DismissReason::Replaced));
        }

        self.container = *container;
        let (anchor, anchor_clamped) = clamp_anchor(anchor, &container.bounds);
        if anchor_clamped {
            warn!(?anchor, bounds = ?container.bounds, "menu anchor outside container, clamped");
        }

        let style = Rc::clone(&self.style);
        let content = PopupContent::measure(root.root(), &style, self.presenter.as_ref());
        let placement = place_dropdown(anchor, content.size, &container.bounds);
        let popup = Popup::new(
            0,
            root.clone(),
            MenuPath::root(),
            style,
            anchor,
            placement,
            container.layer_for_depth(0),
            content,
        );
        let opened = Opened {
            bounds: popup.bounds(),
            scrollable: popup.is_scrollable(),
            anchor_clamped,
            flipped_x: placement.flipped_x,
            flipped_y: placement.flipped_y,
            replaced,
        };
        debug!(
            title = root.title(),
            rows = root.root().len(),
            scrollable = opened.scrollable,
            "dropdown opened"
        );
        self.chain.push(popup);
        Ok(opened)
    }

    /// Close the chain, if any.
    pub fn dismiss(&mut self) -> Option<DismissReason> {
        if self.is_open() {
            self.teardown(Some(DismissReason::Programmatic));
            Some(DismissReason::Programmatic)
        } else {
            None
        }
    }

    /// Advance the settle timer. Returns whether a submenu opened.
    pub fn update(&mut self, elapsed: Duration) -> bool {
        let Some(target) = self.timer.advance(elapsed) else {
            return false;
        };
        let still_hovered = self
            .chain
            .get(target.depth)
            .is_some_and(|p| p.highlighted() == Some(target.row));
        if !still_hovered {
            trace!(?target, "settle fired for a row no longer hovered");
            return false;
        }
        self.open_submenu(target.depth, target.row)
    }

    /// Route an input event. Any callback is returned un-run inside
    /// [`MenuResponse::Activated`]; see [`MenuManager::dispatch`].
    pub fn handle_event(&mut self, event: &Event) -> MenuResponse {
        if let Some(position) = event.position() {
            self.pointer = Some(position);
        }
        if !self.is_open() {
            return MenuResponse::Ignored;
        }
        match *event {
            Event::MouseMove { position } => self.hover(position),
            Event::MouseDown { position, button } => self.press(position, button),
            Event::MouseUp { position, .. } => {
                if self.hit_test(position).is_some() {
                    MenuResponse::Consumed
                } else {
                    MenuResponse::Ignored
                }
            }
            Event::Scroll { delta_y } => self.scroll(delta_y),
            Event::KeyDown { key } => self.key(key),
            Event::Resize { width, height } => {
                debug!(width, height, "container resized");
                self.teardown(Some(DismissReason::LayoutChanged));
                MenuResponse::Dismissed(DismissReason::LayoutChanged)
            }
        }
    }

    /// [`handle_event`](Self::handle_event), then run the selected callback.
    ///
    /// Callbacks run while the manager is still mutably borrowed; hosts whose
    /// callbacks need the manager should use `handle_event` and invoke the
    /// activation after releasing it.
    pub fn dispatch(&mut self, event: &Event) -> MenuResponse {
        let mut response = self.handle_event(event);
        if let MenuResponse::Activated(activation) = &mut response {
            activation.invoke();
        }
        response
    }

    /// Paint every popup in stacking order.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        for popup in &self.chain {
            let style = popup.style();
            let bounds = popup.bounds();
            canvas.set_layer(popup.layer());
            self.presenter.paint_frame(canvas, bounds, style);
            canvas.push_clip(bounds);
            let Some(menu) = popup.menu() else {
                canvas.pop_clip();
                continue;
            };
            for i in popup.visible_rows() {
                let (Some(node), Some(rect), Some(layout)) =
                    (menu.children().get(i), popup.row_rect(i), popup.rows().get(i))
                else {
                    continue;
                };
                let action = node.as_action();
                let visual = RowVisual {
                    bounds: rect,
                    kind: layout.kind,
                    label: node.label().unwrap_or_default(),
                    icon: action.and_then(|a| a.visible_icon()),
                    enabled: layout.interactive,
                    selected: action.is_some_and(|a| a.is_selected()),
                    highlighted: popup.highlighted() == Some(i),
                    expanded: popup.open_child() == Some(i),
                };
                self.presenter.paint_row(canvas, &visual, style);
            }
            canvas.pop_clip();
            if let Some(thumb) = popup.scroll_thumb() {
                self.presenter.paint_scrollbar(canvas, thumb, style);
            }
        }
    }

    /// Deepest popup under `point`, with the row under it.
    fn hit_test(&self, point: Point) -> Option<(usize, Option<usize>)> {
        self.chain
            .iter()
            .rposition(|p| p.bounds().contains_point(&point))
            .map(|depth| (depth, self.chain[depth].row_at(point)))
    }

    fn hover(&mut self, position: Point) -> MenuResponse {
        let Some((depth, row)) = self.hit_test(position) else {
            self.timer.cancel();
            if let Some(last) = self.chain.last_mut() {
                let keep = last.open_child();
                last.set_highlighted(keep);
            }
            return MenuResponse::Ignored;
        };

        let Some(row) = row else {
            // Padding band: the pointer is over no row of this popup
            self.timer.cancel();
            let popup = &mut self.chain[depth];
            let keep = popup.open_child();
            popup.set_highlighted(keep);
            return MenuResponse::Consumed;
        };

        self.chain[depth].set_highlighted(Some(row));
        if self.chain[depth].open_child() == Some(row) {
            self.timer.cancel();
            return MenuResponse::Consumed;
        }

        self.close_deeper_than(depth);
        let target = CascadeTarget { depth, row };
        self.timer.cancel_unless(target);

        let cascades = self.chain[depth].rows().get(row).is_some_and(|r| r.cascades);
        if cascades && self.timer.pending_target().is_none() {
            match self.chain[depth].style().settle_delay {
                None => {
                    self.open_submenu(depth, row);
                }
                Some(delay) => {
                    trace!(depth, row, ?delay, "cascade scheduled");
                    self.timer.schedule(target, delay);
                }
            }
        }
        MenuResponse::Consumed
    }

    fn press(&mut self, position: Point, button: MouseButton) -> MenuResponse {
        let Some((depth, row)) = self.hit_test(position) else {
            self.teardown(Some(DismissReason::OutsideClick));
            return MenuResponse::Dismissed(DismissReason::OutsideClick);
        };
        if button != MouseButton::Left {
            return MenuResponse::Consumed;
        }
        match row {
            Some(row) => self.choose(depth, row),
            None => MenuResponse::Consumed,
        }
    }

    /// Act on a row as if clicked.
    fn choose(&mut self, depth: usize, row: usize) -> MenuResponse {
        let Some(node) = self.chain.get(depth).and_then(|p| p.node(row)) else {
            return MenuResponse::Consumed;
        };
        match node {
            MenuNode::Action(action) if action.is_enabled() => {
                let activation = Activation {
                    path: self.chain[depth].path().child(row),
                    label: action.label().to_string(),
                    callback: action.callback(),
                };
                debug!(label = %activation.label, path = ?activation.path, "menu action selected");
                self.teardown(None);
                MenuResponse::Activated(activation)
            }
            MenuNode::SubMenu(_) => {
                if self.chain[depth].open_child() != Some(row) {
                    self.chain[depth].set_highlighted(Some(row));
                    self.open_submenu(depth, row);
                }
                MenuResponse::Consumed
            }
            MenuNode::Action(_) | MenuNode::Separator => MenuResponse::Consumed,
        }
    }

    fn scroll(&mut self, delta_y: f32) -> MenuResponse {
        let target = self
            .pointer
            .and_then(|p| self.hit_test(p))
            .map(|(depth, _)| depth);
        let Some(depth) = target else {
            return MenuResponse::Ignored;
        };
        let step = self.chain[depth].style().scroll_step;
        if self.chain[depth].scroll_by(delta_y * step) {
            // Rows moved under any open child; it no longer lines up
            self.close_deeper_than(depth);
            self.timer.cancel();
            let under = self.pointer.and_then(|p| self.chain[depth].row_at(p));
            self.chain[depth].set_highlighted(under);
            trace!(depth, offset = self.chain[depth].scroll_offset(), "popup scrolled");
        }
        MenuResponse::Consumed
    }

    fn key(&mut self, key: Key) -> MenuResponse {
        let depth = self.chain.len() - 1;
        match key {
            Key::Escape => {
                self.teardown(Some(DismissReason::Cancelled));
                return MenuResponse::Dismissed(DismissReason::Cancelled);
            }
            Key::Up | Key::Down => {
                let popup = &self.chain[depth];
                let next = popup.next_selectable(popup.highlighted(), key == Key::Down);
                self.focus_row(depth, next);
            }
            Key::Home => {
                let first = self.chain[depth].first_selectable();
                self.focus_row(depth, first);
            }
            Key::End => {
                let last = self.chain[depth].last_selectable();
                self.focus_row(depth, last);
            }
            Key::PageUp | Key::PageDown => {
                let popup = &mut self.chain[depth];
                let page = popup.bounds().height;
                popup.scroll_by(if key == Key::PageDown { page } else { -page });
            }
            Key::Right => {
                if let Some(row) = self.chain[depth].highlighted() {
                    self.enter_submenu(depth, row);
                }
            }
            Key::Enter | Key::Space => {
                let Some(row) = self.chain[depth].highlighted() else {
                    return MenuResponse::Consumed;
                };
                if self.chain[depth].rows()[row].kind == RowKind::SubMenu {
                    self.enter_submenu(depth, row);
                } else {
                    return self.choose(depth, row);
                }
            }
            Key::Left => {
                if depth > 0 {
                    self.close_deeper_than(depth - 1);
                }
            }
            Key::Tab => return MenuResponse::Ignored,
        }
        MenuResponse::Consumed
    }

    fn focus_row(&mut self, depth: usize, row: Option<usize>) {
        self.timer.cancel();
        let popup = &mut self.chain[depth];
        popup.set_highlighted(row);
        if let Some(row) = row {
            popup.scroll_into_view(row);
        }
    }

    /// Open the submenu at `row` and focus its first row.
    fn enter_submenu(&mut self, depth: usize, row: usize) {
        if self.open_submenu(depth, row) {
            let first = self.chain[depth + 1].first_selectable();
            self.focus_row(depth + 1, first);
        }
    }

    /// Open the child popup for `row` of the popup at `depth`, closing
    /// whatever was open deeper. Returns whether a popup opened.
    fn open_submenu(&mut self, depth: usize, row: usize) -> bool {
        self.timer.cancel();
        let Some(parent) = self.chain.get(depth) else {
            return false;
        };
        let path = parent.path().child(row);
        let tree = parent.tree().clone();
        let Some(menu) = tree.submenu(&path).filter(|m| !m.is_empty()) else {
            return false;
        };
        let Some(row_rect) = parent.visible_row_rect(row).or_else(|| parent.row_rect(row)) else {
            return false;
        };

        // The whole chain shares the style it opened with
        let style = Rc::clone(self.chain[0].style());
        let parent_bounds = parent.bounds();
        let content = PopupContent::measure(menu, &style, self.presenter.as_ref());
        let rows = menu.len();
        let placement = place_cascade(
            row_rect,
            parent_bounds,
            content.size,
            &self.container.bounds,
            style.submenu_overlap,
            style.padding,
        );

        self.close_deeper_than(depth);
        let child_depth = depth + 1;
        let popup = Popup::new(
            child_depth,
            tree,
            path,
            style,
            row_rect,
            placement,
            self.container.layer_for_depth(child_depth),
            content,
        );
        debug!(depth = child_depth, rows, "submenu opened");
        self.chain[depth].set_open_child(Some(row));
        self.chain.push(popup);
        true
    }

    /// Destroy every popup deeper than `depth`, deepest first.
    fn close_deeper_than(&mut self, depth: usize) {
        while self.chain.len() > depth + 1 {
            if let Some(popup) = self.chain.pop() {
                trace!(depth = popup.depth(), "popup closed");
            }
        }
        if let Some(popup) = self.chain.get_mut(depth) {
            popup.set_open_child(None);
        }
        self.timer.cancel_deeper_than(depth);
    }

    /// Destroy the whole chain; `None` means an action was selected.
    fn teardown(&mut self, reason: Option<DismissReason>) {
        let depth = self.chain.len();
        while let Some(popup) = self.chain.pop() {
            trace!(depth = popup.depth(), "popup closed");
        }
        self.timer.cancel();
        debug!(depth, ?reason, "menu chain closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StackBuilder;
    use crate::node::ActionOptions;
    use dropmenu_core::{DrawCommand, RecordingCanvas};
    use std::cell::Cell;

    fn container() -> Container {
        Container::sized(800.0, 600.0)
    }

    fn anchor() -> Rect {
        Rect::new(20.0, 20.0, 80.0, 24.0)
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, move || h.set(h.get() + 1))
    }

    fn abc(cb1: impl Fn() + 'static, cb2: impl Fn() + 'static) -> MenuTree {
        let mut b = StackBuilder::new("abc");
        b.add_action("A", cb1).unwrap();
        b.add_separator().unwrap();
        b.push_menu("B").unwrap();
        b.add_action("C", cb2).unwrap();
        b.pop_menu().unwrap();
        b.into_root()
    }

    fn center(m: &MenuManager, depth: usize, label: &str) -> Point {
        let p = m.popup(depth).unwrap();
        p.row_center(p.row_index(label).unwrap()).unwrap()
    }

    fn move_to(m: &mut MenuManager, point: Point) -> MenuResponse {
        m.dispatch(&Event::MouseMove { position: point })
    }

    fn click(m: &mut MenuManager, point: Point) -> MenuResponse {
        m.dispatch(&Event::MouseDown {
            position: point,
            button: MouseButton::Left,
        })
    }

    fn hover_row(m: &mut MenuManager, depth: usize, label: &str) -> MenuResponse {
        let at = center(m, depth, label);
        move_to(m, at)
    }

    fn click_row(m: &mut MenuManager, depth: usize, label: &str) -> MenuResponse {
        let at = center(m, depth, label);
        click(m, at)
    }

    fn key(m: &mut MenuManager, key: Key) -> MenuResponse {
        m.dispatch(&Event::KeyDown { key })
    }

    #[test]
    fn test_open_reports_bounds() {
        let mut m = MenuManager::new();
        let opened = m
            .create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor())
            .unwrap();
        assert_eq!(opened.bounds.y, 44.0);
        assert_eq!(opened.bounds.x, 20.0);
        assert!(!opened.scrollable);
        assert!(!opened.anchor_clamped);
        assert_eq!(m.depth(), 1);
        assert_eq!(m.popup(0).unwrap().layer(), Container::OVERLAY_LAYER);
    }

    #[test]
    fn test_click_nested_action_runs_its_callback_once() {
        let (a_hits, cb1) = counter();
        let (c_hits, cb2) = counter();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(cb1, cb2), anchor()).unwrap();

        hover_row(&mut m, 0, "B");
        assert_eq!(m.depth(), 2);
        let response = click_row(&mut m, 1, "C");
        match response {
            MenuResponse::Activated(a) => {
                assert_eq!(a.label, "C");
                assert_eq!(a.path, MenuPath::from(vec![2, 0]));
                assert!(!a.is_pending());
            }
            other => panic!("expected activation, got {other:?}"),
        }
        assert_eq!(c_hits.get(), 1);
        assert_eq!(a_hits.get(), 0);
        assert!(!m.is_open());
    }

    #[test]
    fn test_handle_event_defers_callback() {
        let (hits, cb) = counter();
        let mut b = StackBuilder::new("one");
        b.add_action("Go", cb).unwrap();
        let tree = b.into_root();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        let at = center(&m, 0, "Go");
        let response = m.handle_event(&Event::MouseDown {
            position: at,
            button: MouseButton::Left,
        });
        assert!(!m.is_open());
        assert_eq!(hits.get(), 0);
        let MenuResponse::Activated(mut activation) = response else {
            panic!("expected activation");
        };
        assert!(activation.invoke());
        assert!(!activation.invoke());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_second_create_replaces_chain() {
        let mut m = MenuManager::new();
        let tree = abc(|| {}, || {});
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        hover_row(&mut m, 0, "B");
        assert_eq!(m.depth(), 2);
        let opened = m
            .create_dropdown_menu(&container(), &tree, Rect::new(300.0, 300.0, 50.0, 20.0))
            .unwrap();
        assert!(opened.replaced);
        assert_eq!(m.depth(), 1);
        assert_eq!(m.popup(0).unwrap().anchor().x, 300.0);
    }

    #[test]
    fn test_empty_menu_rejected_and_chain_kept() {
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        let empty = StackBuilder::new("nothing").into_root();
        let err = m.create_dropdown_menu(&container(), &empty, anchor()).unwrap_err();
        assert_eq!(
            err,
            MenuError::EmptyMenu {
                label: "nothing".to_string()
            }
        );
        assert_eq!(m.depth(), 1);
    }

    #[test]
    fn test_hover_sibling_closes_deeper_popups() {
        let mut b = StackBuilder::new("deep");
        b.push_menu("One").unwrap();
        b.push_menu("Two").unwrap();
        b.add_action("Leaf", || {}).unwrap();
        b.pop_menu().unwrap();
        b.pop_menu().unwrap();
        b.add_action("Other", || {}).unwrap();
        let tree = b.into_root();

        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        hover_row(&mut m, 0, "One");
        hover_row(&mut m, 1, "Two");
        assert_eq!(m.depth(), 3);
        assert_eq!(m.popup(0).unwrap().open_child(), Some(0));

        hover_row(&mut m, 0, "Other");
        assert_eq!(m.depth(), 1);
        assert_eq!(m.popup(0).unwrap().open_child(), None);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(1));
    }

    #[test]
    fn test_hover_back_onto_open_row_keeps_child() {
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        let b = center(&m, 0, "B");
        move_to(&mut m, b);
        hover_row(&mut m, 1, "C");
        move_to(&mut m, b);
        assert_eq!(m.depth(), 2);
    }

    #[test]
    fn test_leaving_popups_keeps_chain() {
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        hover_row(&mut m, 0, "B");
        let response = move_to(&mut m, Point::new(700.0, 500.0));
        assert!(!response.is_consumed());
        assert_eq!(m.depth(), 2);
    }

    #[test]
    fn test_settle_delay_defers_and_cancels() {
        let style = MenuStyle::simple()
            .with_settle_delay(Some(Duration::from_millis(200)))
            .into_handle();
        let mut m = MenuManager::with_style(style);
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();

        hover_row(&mut m, 0, "B");
        assert_eq!(m.depth(), 1);
        assert!(m.pending_cascade().is_some());
        assert!(!m.update(Duration::from_millis(100)));

        // Leave the row before the delay elapses
        hover_row(&mut m, 0, "A");
        assert!(m.pending_cascade().is_none());
        assert!(!m.update(Duration::from_millis(500)));
        assert_eq!(m.depth(), 1);

        hover_row(&mut m, 0, "B");
        assert!(m.update(Duration::from_millis(200)));
        assert_eq!(m.depth(), 2);
    }

    #[test]
    fn test_click_submenu_row_opens_without_delay() {
        let style = MenuStyle::skeuo().into_handle();
        let mut m = MenuManager::with_style(style);
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        let response = click_row(&mut m, 0, "B");
        assert!(matches!(response, MenuResponse::Consumed));
        assert_eq!(m.depth(), 2);
        assert!(m.pending_cascade().is_none());
    }

    #[test]
    fn test_empty_submenu_never_cascades() {
        let mut b = StackBuilder::new("e");
        b.push_menu("Empty").unwrap();
        b.pop_menu().unwrap();
        let tree = b.into_root();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        hover_row(&mut m, 0, "Empty");
        click_row(&mut m, 0, "Empty");
        assert_eq!(m.depth(), 1);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(0));
    }

    #[test]
    fn test_disabled_and_separator_rows_inert() {
        let (hits, cb) = counter();
        let cb: Callback = Rc::new(cb);
        let mut b = StackBuilder::new("d");
        b.add_action_with("Off", Some(cb), ActionOptions::default().enabled(false))
            .unwrap();
        b.add_separator().unwrap();
        b.add_action("On", || {}).unwrap();
        let tree = b.into_root();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();

        assert!(matches!(click_row(&mut m, 0, "Off"), MenuResponse::Consumed));
        let sep = m.popup(0).unwrap().row_center(1).unwrap();
        assert!(matches!(click(&mut m, sep), MenuResponse::Consumed));
        assert!(m.is_open());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_action_without_callback_still_dismisses() {
        let mut b = StackBuilder::new("n");
        b.add_action_with("Label", None, ActionOptions::default()).unwrap();
        let tree = b.into_root();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        let response = click_row(&mut m, 0, "Label");
        assert!(matches!(response, MenuResponse::Activated(_)));
        assert!(!m.is_open());
    }

    #[test]
    fn test_outside_click_escape_and_resize_dismiss() {
        let tree = abc(|| {}, || {});
        let mut m = MenuManager::new();

        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        let r = click(&mut m, Point::new(700.0, 500.0));
        assert!(matches!(r, MenuResponse::Dismissed(DismissReason::OutsideClick)));

        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        let r = key(&mut m, Key::Escape);
        assert!(matches!(r, MenuResponse::Dismissed(DismissReason::Cancelled)));

        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        let r = m.dispatch(&Event::Resize {
            width: 640.0,
            height: 480.0,
        });
        assert!(matches!(r, MenuResponse::Dismissed(DismissReason::LayoutChanged)));
        assert!(!m.is_open());

        assert_eq!(m.dismiss(), None);
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        assert_eq!(m.dismiss(), Some(DismissReason::Programmatic));
    }

    #[test]
    fn test_events_ignored_when_closed() {
        let mut m = MenuManager::new();
        assert!(matches!(key(&mut m, Key::Escape), MenuResponse::Ignored));
        assert!(matches!(click(&mut m, Point::new(1.0, 1.0)), MenuResponse::Ignored));
    }

    #[test]
    fn test_style_change_does_not_touch_open_chain() {
        let mut m = MenuManager::new();
        let tree = abc(|| {}, || {});
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        let before = Rc::clone(m.popup(0).unwrap().style());
        m.set_current_style(MenuStyle::skeuo().into_handle());
        hover_row(&mut m, 0, "B");
        assert!(crate::style::same_style(m.popup(0).unwrap().style(), &before));
        assert!(crate::style::same_style(m.popup(1).unwrap().style(), &before));

        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        assert!(crate::style::same_style(
            m.popup(0).unwrap().style(),
            m.current_style()
        ));
    }

    #[test]
    fn test_anchor_outside_container_is_clamped() {
        let mut m = MenuManager::new();
        let opened = m
            .create_dropdown_menu(
                &container(),
                &abc(|| {}, || {}),
                Rect::new(2000.0, -300.0, 80.0, 24.0),
            )
            .unwrap();
        assert!(opened.anchor_clamped);
        let b = opened.bounds;
        assert!(b.x >= 0.0 && b.right() <= 800.0);
        assert!(b.y >= 0.0 && b.bottom() <= 600.0);
    }

    #[test]
    fn test_tall_menu_scrolls_and_hit_tests_through_offset() {
        let mut b = StackBuilder::new("tall");
        for i in 0..100 {
            b.add_action(format!("Item {i}"), || {}).unwrap();
        }
        let tree = b.into_root();
        let mut m = MenuManager::new();
        let opened = m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        assert!(opened.scrollable);
        assert!(opened.bounds.height <= 600.0);

        let first = m.popup(0).unwrap().row_center(0).unwrap();
        move_to(&mut m, first);
        m.dispatch(&Event::Scroll { delta_y: 5.0 });
        assert_eq!(m.popup(0).unwrap().scroll_offset(), 5.0 * 24.0);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(5));

        let response = click(&mut m, first);
        let MenuResponse::Activated(a) = response else {
            panic!("expected activation");
        };
        assert_eq!(a.label, "Item 5");
    }

    #[test]
    fn test_tall_menu_leaves_its_button_clickable() {
        let mut b = StackBuilder::new("tall");
        for i in 0..100 {
            b.add_action(format!("Option {i}"), || {}).unwrap();
        }
        let tree = b.into_root();
        let button = Rect::new(20.0, 200.0, 80.0, 24.0);
        let mut m = MenuManager::new();
        let opened = m.create_dropdown_menu(&container(), &tree, button).unwrap();
        assert!(opened.scrollable);
        assert_eq!(opened.bounds.intersection(&button), None);
        assert_eq!(opened.bounds.y, button.bottom());

        let response = click(&mut m, button.center());
        assert!(matches!(
            response,
            MenuResponse::Dismissed(DismissReason::OutsideClick)
        ));
    }

    #[test]
    fn test_reveal_row_scrolls_hidden_row() {
        let mut b = StackBuilder::new("tall");
        for i in 0..100 {
            b.add_action(format!("Item {i}"), || {}).unwrap();
        }
        let tree = b.into_root();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        assert!(m.popup(0).unwrap().row_center(50).is_none());

        let at = m.reveal_row(0, 50).unwrap();
        assert!(m.popup(0).unwrap().scroll_offset() > 0.0);
        assert_eq!(m.popup(0).unwrap().row_at(at), Some(50));
        let MenuResponse::Activated(a) = click(&mut m, at) else {
            panic!("expected activation");
        };
        assert_eq!(a.label, "Item 50");

        assert_eq!(m.reveal_row(0, 1), None);
    }

    #[test]
    fn test_keyboard_navigation() {
        let (hits, cb) = counter();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, cb), anchor()).unwrap();

        key(&mut m, Key::Down);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(0));
        key(&mut m, Key::Down);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(2));
        key(&mut m, Key::Down);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(0));
        key(&mut m, Key::End);
        assert_eq!(m.popup(0).unwrap().highlighted(), Some(2));

        key(&mut m, Key::Right);
        assert_eq!(m.depth(), 2);
        assert_eq!(m.popup(1).unwrap().highlighted(), Some(0));

        key(&mut m, Key::Left);
        assert_eq!(m.depth(), 1);
        key(&mut m, Key::Left);
        assert_eq!(m.depth(), 1);

        key(&mut m, Key::Enter);
        assert_eq!(m.depth(), 2);
        let r = key(&mut m, Key::Enter);
        assert!(matches!(r, MenuResponse::Activated(_)));
        assert_eq!(hits.get(), 1);
        assert!(!m.is_open());
    }

    #[test]
    fn test_keyboard_scrolls_highlight_into_view() {
        let mut b = StackBuilder::new("tall");
        for i in 0..100 {
            b.add_action(format!("Item {i}"), || {}).unwrap();
        }
        let tree = b.into_root();
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &tree, anchor()).unwrap();
        key(&mut m, Key::Up);
        let popup = m.popup(0).unwrap();
        assert_eq!(popup.highlighted(), Some(99));
        assert!(popup.scroll_offset() > 0.0);
        let rect = popup.row_rect(99).unwrap();
        assert!(rect.bottom() <= popup.bounds().bottom() + 0.01);
    }

    #[test]
    fn test_child_stacks_above_parent() {
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        hover_row(&mut m, 0, "B");
        let parent = m.popup(0).unwrap();
        let child = m.popup(1).unwrap();
        assert!(child.layer() > parent.layer());
        assert_eq!(child.path(), &MenuPath::from(vec![2]));
    }

    #[test]
    fn test_paint_draws_visible_rows_in_layer_order() {
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        hover_row(&mut m, 0, "B");
        let mut canvas = RecordingCanvas::new();
        m.paint(&mut canvas);
        assert_eq!(canvas.texts(), vec!["A", "B", "›", "C"]);
        assert_eq!(canvas.clip_depth(), 0);
        let layers: Vec<u32> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect();
        assert_eq!(layers, vec![1000, 1001]);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut m = MenuManager::new();
        m.create_dropdown_menu(&container(), &abc(|| {}, || {}), anchor()).unwrap();
        hover_row(&mut m, 0, "B");
        let snap = m.chain_snapshot();
        assert_eq!(snap.title.as_deref(), Some("abc"));
        assert_eq!(snap.popups.len(), 2);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"open_child\":2"));
    }
}
