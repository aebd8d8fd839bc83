//! The currently selected menu item of one request.
//!
//! The selection is always passed explicitly into the determinator and the
//! renderer. Nothing in this crate reads it from ambient state.

use crate::item::MenuObject;
use crate::tree::{MenuTree, NodeId};

/// A selected menu node, resolved against one tree.
///
/// An id that is empty or does not exist in the tree resolves to "no
/// selection". That is a normal outcome, not an error: links may carry
/// stale or forged ids.
///
/// A `Selection` holds a [`NodeId`] and must only be used with the tree it
/// was resolved against.
///
/// # Examples
///
/// ```
/// use menu_core::{MenuItem, MenuTree, Selection};
///
/// let mut tree = MenuTree::new();
/// tree.create_root_item(MenuItem::page("home", "Home", "home"))?;
///
/// assert_eq!(Selection::resolve(&tree, Some("home")).id(), Some("home"));
/// assert!(Selection::resolve(&tree, Some("forged")).is_none());
/// # Ok::<(), menu_core::MenuError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    resolved: Option<(NodeId, String)>,
}

impl Selection {
    /// Returns the empty selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolves `requested` against `tree`.
    pub fn resolve(tree: &MenuTree, requested: Option<&str>) -> Self {
        let Some(id) = requested.filter(|id| !id.is_empty()) else {
            return Self::none();
        };
        match tree.find(id) {
            Some(node) => Self {
                resolved: Some((node, id.to_string())),
            },
            None => {
                tracing::debug!(menu_item_id = %id, "selected menu item does not exist");
                Self::none()
            }
        }
    }

    /// Returns the id of the selected node.
    pub fn id(&self) -> Option<&str> {
        self.resolved.as_ref().map(|(_, id)| id.as_str())
    }

    /// Returns the handle of the selected node.
    pub fn node(&self) -> Option<NodeId> {
        self.resolved.as_ref().map(|(node, _)| *node)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_none(&self) -> bool {
        self.resolved.is_none()
    }

    /// Returns `true` if `id` is the selected id.
    pub fn is(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

/// Picks the menu item a request should display.
///
/// In order of preference:
/// 1. `requested`, if it names a page item that passes its display filter
/// 2. the first default item (see [`MenuTree::set_default_item_ids`]) that
///    passes its display filter
/// 3. the first top-level page item that passes its display filter
///
/// Returns [`Selection::none`] if none of these exist.
pub fn resolve_request_item(tree: &MenuTree, requested: Option<&str>) -> Selection {
    if let Some(id) = requested {
        if tree.object_of(id).is_some_and(is_displayable_page) {
            return Selection::resolve(tree, Some(id));
        }
    }

    let fallback = tree
        .default_items()
        .into_iter()
        .filter_map(|item| tree.object_of(item.id()))
        .find(|object| object.passes_display_filter())
        .map(MenuObject::id)
        .or_else(|| {
            tree.children(tree.root())
                .iter()
                .filter_map(|&node| tree.node(node).payload())
                .find(|object| is_displayable_page(object))
                .map(MenuObject::id)
        });

    match fallback {
        Some(id) => {
            tracing::debug!(
                requested = requested.unwrap_or_default(),
                menu_item_id = %id,
                "falling back to default menu item"
            );
            Selection::resolve(tree, Some(id))
        }
        None => Selection::none(),
    }
}

fn is_displayable_page(object: &MenuObject) -> bool {
    object.is_page_item() && object.passes_display_filter()
}
