//! Navigation menu visibility and rendering engine.
//!
//! Given a menu tree and the currently selected entry, this crate decides
//! which entries a page shows and builds a pruned copy of the tree holding
//! only those entries, ready to be turned into markup.
//!
//! The work is split in three layers:
//! - **Walking**: [`walk`] is a generic depth-first walker with subtree
//!   pruning and level notifications
//! - **Visibility**: [`VisibilityDeterminator`] computes a [`VisibilityMap`]
//!   from a [`MenuTree`] and a [`Selection`]
//! - **Rendering**: [`MenuRenderer`] mirrors the visible part of the tree
//!   into a [`RenderedMenu`], delegating each entry to an [`ItemRenderer`]
//!
//! The selection is always passed in explicitly and every call keeps its
//! state local, so one tree can serve concurrent renders.
//!
//! # Examples
//!
//! ```
//! use menu_core::{
//!     render_menu, resolve_request_item, ItemRenderer, ItemState, MenuItem, MenuSeparator,
//!     MenuTree,
//! };
//!
//! struct Labels;
//!
//! impl ItemRenderer for Labels {
//!     type Output = String;
//!
//!     fn render_separator(&mut self, _separator: &MenuSeparator) -> String {
//!         "-".to_string()
//!     }
//!
//!     fn render_item(&mut self, item: &MenuItem, state: ItemState) -> String {
//!         let marker = if state.is_selected { "*" } else { "" };
//!         format!("{}{}", item.text(), marker)
//!     }
//! }
//!
//! let mut tree = MenuTree::new();
//! tree.create_root_item(MenuItem::page("home", "Home", "home"))?;
//! tree.create_root_item(MenuItem::page("admin", "Admin", "admin"))?;
//! tree.create_item("admin", MenuItem::page("users", "Users", "users"))?;
//!
//! let selection = resolve_request_item(&tree, Some("users"));
//! let menu = render_menu(&tree, &selection, &mut Labels);
//!
//! assert_eq!(menu.len(), 2);
//! let admin = &menu.items()[1];
//! assert_eq!(admin.content(), "Admin");
//! assert_eq!(admin.children().unwrap().items()[0].content(), "Users*");
//! # Ok::<(), menu_core::MenuError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod item;
mod render;
mod selection;
#[cfg(test)]
mod test_support;
mod tree;
mod visibility;
pub mod walk;

pub use error::{MenuError, MenuErrorKind};
pub use item::{DisplayFilter, MenuItem, MenuObject, MenuSeparator, MenuTarget};
pub use render::{
    ItemRenderer, ItemState, MenuRenderer, RenderedMenu, RenderedNode, render_menu,
    render_sub_menu,
};
pub use selection::{Selection, resolve_request_item};
pub use tree::{MenuNode, MenuTree, NodeId};
pub use visibility::{
    VisibilityDeterminator, VisibilityMap, VisibilityRules, all_menu_item_ids,
    determine_visibility,
};
pub use walk::{Hierarchy, WalkCallback, WalkControl, WalkOutcome};
