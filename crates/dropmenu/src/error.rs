//! Error types for menu building and display.

use thiserror::Error;

/// Errors raised by the builder and the menu manager.
///
/// None of these are fatal to the host: builder errors reject a single
/// call, manager errors turn the request into a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// `pop_menu` called with only the root scope open.
    #[error("pop_menu called with no open submenu scope")]
    StackUnderflow,

    /// Structural edit attempted after the tree was handed off.
    #[error("menu tree was already handed off; {operation} rejected")]
    InvalidMutation {
        /// The rejected builder operation
        operation: &'static str,
    },

    /// The menu to display has no rows.
    #[error("menu '{label}' has no items to display")]
    EmptyMenu {
        /// Label of the empty menu
        label: String,
    },

    /// A path addressed a leaf or a missing node where a submenu was needed.
    #[error("no submenu at path {path:?}")]
    NotASubMenu {
        /// Child-index path from the root
        path: Vec<usize>,
    },
}

/// Result alias for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;
