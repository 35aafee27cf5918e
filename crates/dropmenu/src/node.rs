//! The menu tree: actions, separators and submenus.
//!
//! A finished tree is a [`MenuTree`], an immutable reference-counted root.
//! Popups address nodes with a [`MenuPath`] (child indices from the root)
//! instead of holding parent pointers, so the tree has a single owner
//! and no cycles.

use dropmenu_core::IconRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Zero-argument selection callback.
///
/// Closures capture by value (`move`), so each leaf binds its own snapshot
/// of any loop variable at the time it was added.
pub type Callback = Rc<dyn Fn()>;

/// A clickable leaf.
#[derive(Clone)]
pub struct Action {
    label: String,
    enabled: bool,
    selected: bool,
    icon: Option<IconRef>,
    callback: Option<Callback>,
}

impl Action {
    /// Create an enabled, unselected action.
    pub fn new(label: impl Into<String>, callback: Option<Callback>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            selected: false,
            icon: None,
            callback,
        }
    }

    /// Apply display options.
    #[must_use]
    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.enabled = options.enabled;
        self.selected = options.selected;
        self.icon = options.icon;
        self
    }

    /// Row label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the row accepts clicks.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the row is marked as the current choice.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Icon reference, if any.
    #[must_use]
    pub const fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    /// Icon to display: only selected rows show their icon.
    #[must_use]
    pub fn visible_icon(&self) -> Option<&IconRef> {
        self.icon.as_ref().filter(|_| self.selected)
    }

    /// Whether a callback is attached.
    #[must_use]
    pub const fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Cloned handle to the callback, if any.
    #[must_use]
    pub fn callback(&self) -> Option<Callback> {
        self.callback.clone()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("selected", &self.selected)
            .field("icon", &self.icon)
            .field("callback", &self.callback.as_ref().map(|_| "Fn()"))
            .finish()
    }
}

/// Display options for an action row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOptions {
    /// Whether the row accepts clicks
    pub enabled: bool,
    /// Whether the row is marked as the current choice
    pub selected: bool,
    /// Icon shown when selected
    pub icon: Option<IconRef>,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            selected: false,
            icon: None,
        }
    }
}

impl ActionOptions {
    /// Set enabled state.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set selected state.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the icon.
    #[must_use]
    pub fn icon(mut self, icon: Option<IconRef>) -> Self {
        self.icon = icon;
        self
    }
}

/// A container of rows. The root of every tree is a `SubMenu`.
#[derive(Debug, Clone, Default)]
pub struct SubMenu {
    label: String,
    children: Vec<MenuNode>,
}

impl SubMenu {
    /// Create an empty submenu.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Submenu label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Children in display order.
    #[must_use]
    pub fn children(&self) -> &[MenuNode] {
        &self.children
    }

    /// Whether there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn push(&mut self, node: MenuNode) -> usize {
        self.children.push(node);
        self.children.len() - 1
    }

    pub(crate) fn child_submenu_mut(&mut self, index: usize) -> Option<&mut Self> {
        match self.children.get_mut(index) {
            Some(MenuNode::SubMenu(sub)) => Some(sub),
            _ => None,
        }
    }

    /// Nesting depth below this menu: 0 if no child is a submenu.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .filter_map(MenuNode::as_submenu)
            .map(|sub| sub.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// One entry in a menu.
#[derive(Debug, Clone)]
pub enum MenuNode {
    /// Clickable leaf
    Action(Action),
    /// Visual divider
    Separator,
    /// Nested menu
    SubMenu(SubMenu),
}

impl MenuNode {
    /// Label of actions and submenus.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Action(action) => Some(action.label()),
            Self::SubMenu(sub) => Some(sub.label()),
            Self::Separator => None,
        }
    }

    /// Children of a submenu; leaves have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::SubMenu(sub) => sub.children(),
            Self::Action(_) | Self::Separator => &[],
        }
    }

    /// Whether the row reacts to hover and clicks.
    ///
    /// Submenus are always interactive, even when empty.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        match self {
            Self::Action(action) => action.is_enabled(),
            Self::SubMenu(_) => true,
            Self::Separator => false,
        }
    }

    /// Borrow as an action.
    #[must_use]
    pub const fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            _ => None,
        }
    }

    /// Borrow as a submenu.
    #[must_use]
    pub const fn as_submenu(&self) -> Option<&SubMenu> {
        match self {
            Self::SubMenu(sub) => Some(sub),
            _ => None,
        }
    }
}

/// Child-index path from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MenuPath(Vec<usize>);

impl MenuPath {
    /// The root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path to the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path to the parent, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Index within the parent, `None` for the root.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Number of steps from the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw child indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for MenuPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

#[derive(Debug)]
struct TreeInner {
    title: String,
    root: SubMenu,
}

/// A finished, immutable menu tree.
///
/// Cloning shares the same tree; an open popup chain keeps its tree alive
/// regardless of what happens to the builder that produced it.
#[derive(Debug, Clone)]
pub struct MenuTree(Rc<TreeInner>);

impl MenuTree {
    /// Wrap a root menu.
    pub fn new(title: impl Into<String>, root: SubMenu) -> Self {
        Self(Rc::new(TreeInner {
            title: title.into(),
            root,
        }))
    }

    /// Title metadata (not necessarily displayed).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.0.title
    }

    /// The root menu.
    #[must_use]
    pub fn root(&self) -> &SubMenu {
        &self.0.root
    }

    /// Maximum submenu nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.root.depth()
    }

    /// Whether two handles share the same tree.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Node at `path`; `None` for the root path or a dangling path.
    #[must_use]
    pub fn node(&self, path: &MenuPath) -> Option<&MenuNode> {
        let (last, parents) = path.indices().split_last()?;
        let parent = self.submenu_at(parents)?;
        parent.children().get(*last)
    }

    /// Submenu at `path`; the empty path is the root.
    #[must_use]
    pub fn submenu(&self, path: &MenuPath) -> Option<&SubMenu> {
        self.submenu_at(path.indices())
    }

    fn submenu_at(&self, indices: &[usize]) -> Option<&SubMenu> {
        indices.iter().try_fold(&self.0.root, |menu, &i| {
            menu.children().get(i).and_then(MenuNode::as_submenu)
        })
    }

    /// Find the first node with `label`, depth-first, in display order.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<MenuPath> {
        fn walk(menu: &SubMenu, path: &MenuPath, label: &str) -> Option<MenuPath> {
            for (i, node) in menu.children().iter().enumerate() {
                let here = path.child(i);
                if node.label() == Some(label) {
                    return Some(here);
                }
                if let Some(sub) = node.as_submenu() {
                    if let Some(found) = walk(sub, &here, label) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.0.root, &MenuPath::root(), label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn sample_tree() -> MenuTree {
        let mut root = SubMenu::new("");
        root.push(MenuNode::Action(Action::new("A", None)));
        root.push(MenuNode::Separator);
        let mut b = SubMenu::new("B");
        b.push(MenuNode::Action(Action::new("C", None)));
        root.push(MenuNode::SubMenu(b));
        MenuTree::new("sample", root)
    }

    #[test]
    fn test_action_defaults() {
        let action = Action::new("Cut", None);
        assert_eq!(action.label(), "Cut");
        assert!(action.is_enabled());
        assert!(!action.is_selected());
        assert!(action.icon().is_none());
        assert!(!action.has_callback());
    }

    #[test]
    fn test_action_visible_icon_only_when_selected() {
        let dot = IconRef::new("dot");
        let plain = Action::new("Simple", None)
            .with_options(ActionOptions::default().icon(Some(dot.clone())));
        assert!(plain.visible_icon().is_none());

        let chosen = Action::new("Simple", None)
            .with_options(ActionOptions::default().selected(true).icon(Some(dot.clone())));
        assert_eq!(chosen.visible_icon(), Some(&dot));
    }

    #[test]
    fn test_action_callback_clone_invokes_same_closure() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let action = Action::new("Go", Some(Rc::new(move || h.set(h.get() + 1))));
        if let Some(cb) = action.callback() {
            cb();
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_action_debug_hides_closure() {
        let action = Action::new("Go", Some(Rc::new(|| {})));
        let dbg = format!("{action:?}");
        assert!(dbg.contains("Fn()"));
        assert!(dbg.contains("Go"));
    }

    #[test]
    fn test_node_interactivity() {
        assert!(MenuNode::Action(Action::new("x", None)).is_interactive());
        let disabled = Action::new("x", None).with_options(ActionOptions::default().enabled(false));
        assert!(!MenuNode::Action(disabled).is_interactive());
        assert!(!MenuNode::Separator.is_interactive());
        assert!(MenuNode::SubMenu(SubMenu::new("empty")).is_interactive());
    }

    #[test]
    fn test_leaves_have_no_children() {
        assert!(MenuNode::Separator.children().is_empty());
        assert!(MenuNode::Action(Action::new("x", None)).children().is_empty());
    }

    #[test]
    fn test_path_navigation() {
        let p = MenuPath::root().child(2).child(0);
        assert_eq!(p.indices(), &[2, 0]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.last(), Some(0));
        assert_eq!(p.parent(), Some(MenuPath::from(vec![2])));
        assert!(MenuPath::root().parent().is_none());
        assert!(MenuPath::root().is_root());
    }

    #[test]
    fn test_tree_lookup() {
        let tree = sample_tree();
        assert_eq!(tree.root().len(), 3);
        assert_eq!(tree.node(&MenuPath::from(vec![0])).and_then(MenuNode::label), Some("A"));
        assert!(matches!(tree.node(&MenuPath::from(vec![1])), Some(MenuNode::Separator)));
        assert_eq!(tree.submenu(&MenuPath::from(vec![2])).map(SubMenu::label), Some("B"));
        assert_eq!(
            tree.node(&MenuPath::from(vec![2, 0])).and_then(MenuNode::label),
            Some("C")
        );
        assert!(tree.node(&MenuPath::root()).is_none());
        assert!(tree.submenu(&MenuPath::from(vec![0])).is_none());
        assert!(tree.node(&MenuPath::from(vec![9])).is_none());
    }

    #[test]
    fn test_tree_find_and_depth() {
        let tree = sample_tree();
        assert_eq!(tree.find("C"), Some(MenuPath::from(vec![2, 0])));
        assert_eq!(tree.find("missing"), None);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.title(), "sample");
    }

    #[test]
    fn test_tree_clone_shares() {
        let tree = sample_tree();
        let other = tree.clone();
        assert!(tree.ptr_eq(&other));
        assert!(!tree.ptr_eq(&sample_tree()));
    }
}
