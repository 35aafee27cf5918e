//! Test harness for menu popup chains.

use dropmenu::{DismissReason, MenuManager, MenuResponse, MenuTree, Opened, Popup};
use dropmenu_core::{Container, Event, Key, MouseButton, Point, Rect};
use std::collections::VecDeque;
use std::time::Duration;

/// Drives a [`MenuManager`] with synthetic input.
pub struct MenuHarness {
    manager: MenuManager,
    container: Container,
    event_queue: VecDeque<Event>,
    responses: Vec<MenuResponse>,
}

impl Default for MenuHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuHarness {
    /// Harness around a default manager in a 1280x720 container.
    #[must_use]
    pub fn new() -> Self {
        Self::with_manager(MenuManager::new())
    }

    /// Harness around an existing manager.
    #[must_use]
    pub fn with_manager(manager: MenuManager) -> Self {
        Self {
            manager,
            container: Container::default(),
            event_queue: VecDeque::new(),
            responses: Vec::new(),
        }
    }

    /// Set the container size used by later `open` calls.
    #[must_use]
    pub const fn viewport(mut self, width: f32, height: f32) -> Self {
        self.container = Container::sized(width, height);
        self
    }

    /// The manager under test.
    #[must_use]
    pub fn manager(&self) -> &MenuManager {
        &self.manager
    }

    /// Mutable access to the manager under test.
    pub fn manager_mut(&mut self) -> &mut MenuManager {
        &mut self.manager
    }

    /// Container passed to `open`.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    // === Menu control ===

    /// Open `tree` under `anchor`.
    ///
    /// # Panics
    ///
    /// Panics if the manager refuses the tree.
    pub fn open(&mut self, tree: &MenuTree, anchor: Rect) -> Opened {
        let container = self.container;
        match self.manager.create_dropdown_menu(&container, tree, anchor) {
            Ok(opened) => opened,
            Err(err) => panic!("Expected menu '{}' to open: {err}", tree.title()),
        }
    }

    // === Event Simulation ===

    /// Move the pointer onto the row labelled `label` at `depth`.
    pub fn hover(&mut self, depth: usize, label: &str) -> &mut Self {
        let center = self.row_center(depth, label);
        self.move_to(center)
    }

    /// Move the pointer, then press and release on the row labelled `label`.
    pub fn click(&mut self, depth: usize, label: &str) -> &mut Self {
        let center = self.row_center(depth, label);
        self.click_at(center)
    }

    /// Move, press and release at `position`.
    pub fn click_at(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.event_queue.push_back(Event::MouseDown {
            position,
            button: MouseButton::Left,
        });
        self.event_queue.push_back(Event::MouseUp {
            position,
            button: MouseButton::Left,
        });
        self.process_events();
        self
    }

    /// Move the pointer to `position`.
    pub fn move_to(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.process_events();
        self
    }

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.event_queue.push_back(Event::KeyDown { key });
        self.process_events();
        self
    }

    /// Scroll the popup under the pointer by `notches`.
    pub fn scroll(&mut self, notches: f32) -> &mut Self {
        self.event_queue.push_back(Event::Scroll { delta_y: notches });
        self.process_events();
        self
    }

    /// Resize the host container.
    pub fn resize(&mut self, width: f32, height: f32) -> &mut Self {
        self.event_queue.push_back(Event::Resize { width, height });
        self.process_events();
        self
    }

    /// Advance simulated time by `ms` milliseconds.
    pub fn tick(&mut self, ms: u64) -> &mut Self {
        self.manager.update(Duration::from_millis(ms));
        self
    }

    // === Queries ===

    /// Popup at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if no popup is open at `depth`.
    #[must_use]
    pub fn popup(&self, depth: usize) -> &Popup {
        match self.manager.popup(depth) {
            Some(popup) => popup,
            None => panic!(
                "Expected a popup at depth {depth} but {} are open",
                self.manager.depth()
            ),
        }
    }

    /// Center of the visible part of a row.
    ///
    /// # Panics
    ///
    /// Panics if the row does not exist or is scrolled out of view.
    #[must_use]
    pub fn row_center(&self, depth: usize, label: &str) -> Point {
        let popup = self.popup(depth);
        let Some(row) = popup.row_index(label) else {
            panic!("Expected a row labelled '{label}' at depth {depth}");
        };
        match popup.row_center(row) {
            Some(point) => point,
            None => panic!("Row '{label}' at depth {depth} is scrolled out of view"),
        }
    }

    /// Labels of the rows at `depth`; separators read `---`.
    #[must_use]
    pub fn labels(&self, depth: usize) -> Vec<String> {
        self.popup(depth)
            .menu()
            .map(|menu| {
                menu.children()
                    .iter()
                    .map(|n| n.label().unwrap_or("---").to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Responses to every processed event that the menu did not ignore.
    #[must_use]
    pub fn responses(&self) -> &[MenuResponse] {
        &self.responses
    }

    /// Labels of every activated action, oldest first.
    #[must_use]
    pub fn activations(&self) -> Vec<&str> {
        self.responses
            .iter()
            .filter_map(|r| match r {
                MenuResponse::Activated(a) => Some(a.label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Reason of the most recent dismissal.
    #[must_use]
    pub fn last_dismissal(&self) -> Option<DismissReason> {
        self.responses.iter().rev().find_map(|r| match r {
            MenuResponse::Dismissed(reason) => Some(*reason),
            _ => None,
        })
    }

    // === Assertions ===

    /// Assert the number of open popups.
    ///
    /// # Panics
    ///
    /// Panics if the depth does not match.
    pub fn assert_depth(&self, expected: usize) -> &Self {
        let actual = self.manager.depth();
        assert_eq!(
            actual, expected,
            "Expected {expected} open popups but found {actual}"
        );
        self
    }

    /// Assert that no popup is open.
    ///
    /// # Panics
    ///
    /// Panics if a chain is open.
    pub fn assert_closed(&self) -> &Self {
        assert!(
            !self.manager.is_open(),
            "Expected the menu to be closed but {} popups are open",
            self.manager.depth()
        );
        self
    }

    /// Assert which row is highlighted at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if a different row, or none, is highlighted.
    pub fn assert_highlighted(&self, depth: usize, label: &str) -> &Self {
        let popup = self.popup(depth);
        let actual = popup
            .highlighted()
            .and_then(|row| popup.node(row))
            .and_then(|node| node.label());
        assert_eq!(
            actual,
            Some(label),
            "Expected '{label}' highlighted at depth {depth} but got {actual:?}"
        );
        self
    }

    /// Assert the row labels at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if the labels differ.
    pub fn assert_rows(&self, depth: usize, expected: &[&str]) -> &Self {
        let actual = self.labels(depth);
        assert_eq!(
            actual, expected,
            "Expected rows {expected:?} at depth {depth} but got {actual:?}"
        );
        self
    }

    /// Assert that every open popup lies inside the container.
    ///
    /// # Panics
    ///
    /// Panics if a popup extends past the container bounds.
    pub fn assert_inside_container(&self) -> &Self {
        let bounds = self.manager.container().bounds;
        for popup in self.manager.popups() {
            let b = popup.bounds();
            assert!(
                b.x >= bounds.x - 0.01
                    && b.y >= bounds.y - 0.01
                    && b.right() <= bounds.right() + 0.01
                    && b.bottom() <= bounds.bottom() + 0.01,
                "Expected popup at depth {} ({b:?}) inside {bounds:?}",
                popup.depth()
            );
        }
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            let response = self.manager.dispatch(&event);
            if response.is_consumed() {
                self.responses.push(response);
            }
        }
    }
}
