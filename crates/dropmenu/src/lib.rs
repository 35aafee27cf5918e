//! Cascading dropdown menus.
//!
//! Build a tree with [`StackBuilder`], then hand it to a [`MenuManager`]
//! to show it as a dropdown under an anchor rectangle. Hovering submenu
//! rows cascades child popups; selecting an action closes the whole chain
//! and returns its callback.
//!
//! ```
//! use dropmenu::{Container, MenuManager, Rect, StackBuilder};
//!
//! let mut menu = StackBuilder::new("edit");
//! menu.add_action("Undo", || {})?;
//! menu.add_separator()?;
//! menu.submenu("Transform", |m| {
//!     m.add_action("Upper case", || {})?;
//!     m.add_action("Lower case", || {})?;
//!     Ok(())
//! })?;
//!
//! let mut manager = MenuManager::new();
//! let opened = manager.create_dropdown_menu(
//!     &Container::sized(1024.0, 768.0),
//!     &menu.root(),
//!     Rect::new(40.0, 0.0, 60.0, 24.0),
//! )?;
//! assert!(!opened.scrollable);
//! assert_eq!(manager.depth(), 1);
//! # Ok::<(), dropmenu::MenuError>(())
//! ```

pub mod builder;
pub mod error;
pub mod manager;
pub mod node;
pub mod placement;
pub mod popup;
pub mod presenter;
pub mod settle;
pub mod style;

pub use builder::{MenuScope, StackBuilder};
pub use error::{MenuError, Result};
pub use manager::{Activation, ChainSnapshot, DismissReason, MenuManager, MenuResponse, Opened};
pub use node::{Action, ActionOptions, Callback, MenuNode, MenuPath, MenuTree, SubMenu};
pub use placement::{clamp_anchor, place_cascade, place_dropdown, Placement};
pub use popup::{Popup, PopupContent, PopupSnapshot, RowKind, RowLayout};
pub use presenter::{DefaultPresenter, RowPresenter, RowVisual};
pub use settle::{CascadeTarget, SettleTimer};
pub use style::{same_style, MenuStyle, StyleHandle};

pub use dropmenu_core::{
    Canvas, Color, Container, DrawCommand, Event, IconRef, Key, MouseButton, Point,
    RecordingCanvas, Rect, Size, TextStyle,
};
