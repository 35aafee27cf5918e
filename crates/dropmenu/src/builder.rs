//! Stack-based menu tree builder.
//!
//! The builder keeps a stack of insertion scopes. `add_*` calls append to
//! the scope on top of the stack, `push_menu` opens a submenu and makes it
//! the new top, `pop_menu` returns to the enclosing scope.
//!
//! # Examples
//!
//! ```
//! use dropmenu::StackBuilder;
//!
//! let mut menu = StackBuilder::new("");
//! menu.add_action("Option 1", || {})?;
//! menu.add_separator()?;
//! menu.push_menu("Submenu")?;
//! for i in 0..3 {
//!     // each closure owns its own copy of `i`
//!     menu.add_action(format!("SubSubOpt {i}"), move || println!("{i}"))?;
//! }
//! menu.pop_menu()?;
//!
//! let tree = menu.root();
//! assert_eq!(tree.root().len(), 3);
//! assert_eq!(tree.depth(), 1);
//! # Ok::<(), dropmenu::MenuError>(())
//! ```

use crate::error::{MenuError, Result};
use crate::node::{Action, ActionOptions, Callback, MenuNode, MenuTree, SubMenu};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use tracing::debug;

/// Imperative push/pop builder for a [`MenuTree`].
///
/// Calling [`StackBuilder::root`] hands the tree off and freezes the
/// builder; every later structural call fails with
/// [`MenuError::InvalidMutation`].
#[derive(Debug)]
pub struct StackBuilder {
    title: String,
    root: SubMenu,
    /// Child indices from the root to the current insertion scope.
    stack: Vec<usize>,
    handed_off: Option<MenuTree>,
}

impl StackBuilder {
    /// Create a builder with an empty root.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            root: SubMenu::new(title.clone()),
            title,
            stack: Vec::new(),
            handed_off: None,
        }
    }

    /// Title metadata.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of open submenu scopes above the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the tree was already handed off.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.handed_off.is_some()
    }

    /// Append an action with a callback to the current scope.
    pub fn add_action<F>(&mut self, label: impl Into<String>, on_select: F) -> Result<&mut Self>
    where
        F: Fn() + 'static,
    {
        let callback: Callback = Rc::new(on_select);
        self.add_action_with(label, Some(callback), ActionOptions::default())
    }

    /// Append an action with explicit options and an optional callback.
    ///
    /// An action without a callback is still clickable: selecting it
    /// dismisses the menu and nothing else happens.
    pub fn add_action_with(
        &mut self,
        label: impl Into<String>,
        on_select: Option<Callback>,
        options: ActionOptions,
    ) -> Result<&mut Self> {
        let action = Action::new(label, on_select).with_options(options);
        self.insert("add_action", MenuNode::Action(action))?;
        Ok(self)
    }

    /// Append a separator to the current scope.
    pub fn add_separator(&mut self) -> Result<&mut Self> {
        self.insert("add_separator", MenuNode::Separator)?;
        Ok(self)
    }

    /// Append a submenu to the current scope and make it the new scope.
    pub fn push_menu(&mut self, label: impl Into<String>) -> Result<&mut Self> {
        let index = self.insert("push_menu", MenuNode::SubMenu(SubMenu::new(label)))?;
        self.stack.push(index);
        Ok(self)
    }

    /// Close the current submenu scope.
    pub fn pop_menu(&mut self) -> Result<&mut Self> {
        self.ensure_mutable("pop_menu")?;
        if self.stack.pop().is_none() {
            return Err(MenuError::StackUnderflow);
        }
        Ok(self)
    }

    /// Open a submenu scope that closes itself when the guard drops.
    pub fn scope(&mut self, label: impl Into<String>) -> Result<MenuScope<'_>> {
        let restore_to = self.stack.len();
        self.push_menu(label)?;
        Ok(MenuScope {
            builder: self,
            restore_to,
        })
    }

    /// Build a submenu inside a scope that is always closed, even when
    /// `fill` returns early with an error.
    pub fn submenu<F>(&mut self, label: impl Into<String>, fill: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        {
            let mut scope = self.scope(label)?;
            fill(&mut *scope)?;
        }
        Ok(self)
    }

    /// Hand the tree off and freeze the builder.
    ///
    /// Calling this again returns the same tree.
    pub fn root(&mut self) -> MenuTree {
        if let Some(tree) = &self.handed_off {
            return tree.clone();
        }
        if !self.stack.is_empty() {
            debug!(
                open_scopes = self.stack.len(),
                "menu handed off with unclosed submenu scopes"
            );
        }
        let tree = MenuTree::new(self.title.clone(), std::mem::take(&mut self.root));
        self.handed_off = Some(tree.clone());
        tree
    }

    /// Consume the builder and return the tree.
    pub fn into_root(mut self) -> MenuTree {
        self.root()
    }

    fn ensure_mutable(&self, operation: &'static str) -> Result<()> {
        if self.is_frozen() {
            return Err(MenuError::InvalidMutation { operation });
        }
        Ok(())
    }

    fn insert(&mut self, operation: &'static str, node: MenuNode) -> Result<usize> {
        self.ensure_mutable(operation)?;
        let top = self.top_mut()?;
        Ok(top.push(node))
    }

    fn top_mut(&mut self) -> Result<&mut SubMenu> {
        let mut menu = &mut self.root;
        for (depth, &index) in self.stack.iter().enumerate() {
            menu = menu
                .child_submenu_mut(index)
                .ok_or_else(|| MenuError::NotASubMenu {
                    path: self.stack[..=depth].to_vec(),
                })?;
        }
        Ok(menu)
    }
}

/// Submenu scope guard returned by [`StackBuilder::scope`].
///
/// Dereferences to the builder; dropping it closes the scope (and any
/// scope left open inside it).
#[derive(Debug)]
pub struct MenuScope<'a> {
    builder: &'a mut StackBuilder,
    restore_to: usize,
}

impl Deref for MenuScope<'_> {
    type Target = StackBuilder;

    fn deref(&self) -> &Self::Target {
        self.builder
    }
}

impl DerefMut for MenuScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.builder
    }
}

impl Drop for MenuScope<'_> {
    fn drop(&mut self) {
        self.builder.stack.truncate(self.restore_to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MenuPath;
    use dropmenu_core::IconRef;
    use proptest::prelude::*;
    use std::cell::RefCell;

    fn labels(menu: &SubMenu) -> Vec<Option<&str>> {
        menu.children().iter().map(MenuNode::label).collect()
    }

    #[test]
    fn test_new_builder_is_empty() {
        let mut b = StackBuilder::new("title");
        assert_eq!(b.title(), "title");
        assert_eq!(b.depth(), 0);
        let tree = b.root();
        assert!(tree.root().is_empty());
        assert_eq!(tree.title(), "title");
    }

    #[test]
    fn test_scenario_action_separator_submenu() {
        let mut b = StackBuilder::new("");
        b.add_action("A", || {}).unwrap();
        b.add_separator().unwrap();
        b.push_menu("B").unwrap();
        b.add_action("C", || {}).unwrap();
        b.pop_menu().unwrap();

        let tree = b.root();
        let root = tree.root();
        assert_eq!(labels(root), vec![Some("A"), None, Some("B")]);
        assert!(matches!(root.children()[0], MenuNode::Action(_)));
        assert!(matches!(root.children()[1], MenuNode::Separator));
        let sub = root.children()[2].as_submenu().unwrap();
        assert_eq!(labels(sub), vec![Some("C")]);
    }

    #[test]
    fn test_adds_after_pop_are_siblings() {
        let mut b = StackBuilder::new("");
        b.push_menu("X").unwrap().pop_menu().unwrap();
        b.add_action("after", || {}).unwrap();

        let tree = b.root();
        assert_eq!(labels(tree.root()), vec![Some("X"), Some("after")]);
        assert!(tree.submenu(&MenuPath::from(vec![0])).unwrap().is_empty());
    }

    #[test]
    fn test_pop_without_push_underflows() {
        let mut b = StackBuilder::new("");
        assert_eq!(b.pop_menu().unwrap_err(), MenuError::StackUnderflow);

        b.push_menu("X").unwrap();
        b.pop_menu().unwrap();
        assert_eq!(b.pop_menu().unwrap_err(), MenuError::StackUnderflow);
    }

    #[test]
    fn test_mutation_after_handoff_rejected() {
        let mut b = StackBuilder::new("");
        b.add_action("A", || {}).unwrap();
        let tree = b.root();
        assert!(b.is_frozen());

        assert_eq!(
            b.add_action("late", || {}).unwrap_err(),
            MenuError::InvalidMutation {
                operation: "add_action"
            }
        );
        assert!(matches!(
            b.add_separator(),
            Err(MenuError::InvalidMutation { .. })
        ));
        assert!(matches!(b.push_menu("S"), Err(MenuError::InvalidMutation { .. })));
        assert!(matches!(b.pop_menu(), Err(MenuError::InvalidMutation { .. })));

        // Tree unaffected, and a second hand-off returns the same tree
        assert_eq!(tree.root().len(), 1);
        assert!(b.root().ptr_eq(&tree));
    }

    #[test]
    fn test_action_options() {
        let mut b = StackBuilder::new("");
        let dot = IconRef::new("green-dot");
        b.add_action_with(
            "Simple",
            None,
            ActionOptions::default().selected(true).icon(Some(dot.clone())),
        )
        .unwrap();
        b.add_action_with("Off", None, ActionOptions::default().enabled(false))
            .unwrap();

        let tree = b.into_root();
        let simple = tree.root().children()[0].as_action().unwrap();
        assert!(simple.is_selected());
        assert_eq!(simple.visible_icon(), Some(&dot));
        assert!(!simple.has_callback());
        let off = tree.root().children()[1].as_action().unwrap();
        assert!(!off.is_enabled());
    }

    #[test]
    fn test_scope_guard_pops_on_drop() {
        let mut b = StackBuilder::new("");
        {
            let mut file = b.scope("File").unwrap();
            file.add_action("Open", || {}).unwrap();
            assert_eq!(file.depth(), 1);
            {
                let mut recent = file.scope("Recent").unwrap();
                recent.add_action("a.txt", || {}).unwrap();
                assert_eq!(recent.depth(), 2);
            }
            assert_eq!(file.depth(), 1);
        }
        assert_eq!(b.depth(), 0);
        b.add_action("Quit", || {}).unwrap();

        let tree = b.root();
        assert_eq!(labels(tree.root()), vec![Some("File"), Some("Quit")]);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_scope_closes_scopes_left_open_inside() {
        let mut b = StackBuilder::new("");
        {
            let mut s = b.scope("Outer").unwrap();
            s.push_menu("Inner").unwrap();
            assert_eq!(s.depth(), 2);
        }
        assert_eq!(b.depth(), 0);
    }

    #[test]
    fn test_submenu_closure_balances_on_error() {
        let mut b = StackBuilder::new("");
        let result = b.submenu("Broken", |m| {
            m.add_action("first", || {})?;
            m.pop_menu()?;
            m.pop_menu()?; // underflow
            Ok(())
        });
        assert_eq!(result.unwrap_err(), MenuError::StackUnderflow);
        assert_eq!(b.depth(), 0);

        b.submenu("Fine", |m| {
            m.add_action("x", || {})?;
            Ok(())
        })
        .unwrap();
        let tree = b.root();
        assert_eq!(labels(tree.root()), vec![Some("Broken"), Some("Fine")]);
    }

    #[test]
    fn test_loop_closures_capture_snapshots() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut b = StackBuilder::new("");
        b.push_menu("Submenu").unwrap();
        for i in 0..10 {
            let log = Rc::clone(&log);
            b.add_action(format!("SubSubOpt {i}"), move || log.borrow_mut().push(i))
                .unwrap();
        }
        b.pop_menu().unwrap();

        let tree = b.root();
        let sub = tree.root().children()[0].as_submenu().unwrap();
        for node in sub.children().iter().rev() {
            if let Some(cb) = node.as_action().and_then(Action::callback) {
                cb();
            }
        }
        assert_eq!(*log.borrow(), vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    }

    proptest! {
        #[test]
        fn prop_depth_matches_max_concurrent_pushes(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut b = StackBuilder::new("");
            let mut open = 0usize;
            let mut max_open = 0usize;
            for push in ops {
                if push {
                    b.push_menu("m").unwrap();
                    open += 1;
                    max_open = max_open.max(open);
                } else if open > 0 {
                    b.pop_menu().unwrap();
                    open -= 1;
                } else {
                    prop_assert_eq!(b.pop_menu().unwrap_err(), MenuError::StackUnderflow);
                }
                b.add_action("leaf", || {}).unwrap();
            }
            while open > 0 {
                b.pop_menu().unwrap();
                open -= 1;
            }
            prop_assert_eq!(b.pop_menu().unwrap_err(), MenuError::StackUnderflow);
            prop_assert_eq!(b.root().depth(), max_open);
        }
    }
}
