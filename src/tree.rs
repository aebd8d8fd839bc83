//! Arena-backed menu tree.
//!
//! Nodes are owned by the tree and addressed through [`NodeId`] handles.
//! A child's parent link is a plain handle used for lookups; it plays no
//! part in ownership.

use std::collections::HashMap;

use crate::error::{MenuError, MenuErrorKind};
use crate::item::{MenuItem, MenuObject, MenuSeparator};
use crate::walk::{self, Hierarchy, WalkCallback, WalkControl};

/// Handle of a node inside one [`MenuTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One node of the menu tree.
#[derive(Debug, Clone)]
pub struct MenuNode {
    id: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: Option<MenuObject>,
}

impl MenuNode {
    /// Returns the unique id of this node. The root has an empty id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the parent handle, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child handles in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns `true` if this node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the menu object of this node, `None` for the root.
    pub fn payload(&self) -> Option<&MenuObject> {
        self.payload.as_ref()
    }

    /// Returns `true` for the payload-less root node.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Evaluates the display filter of the payload. The root always passes.
    pub fn passes_display_filter(&self) -> bool {
        self.payload
            .as_ref()
            .map_or(true, MenuObject::passes_display_filter)
    }
}

/// The navigation tree of an application.
///
/// The root node is a container without payload; the top-level menu
/// entries are its children. Ids are unique across the whole tree.
///
/// # Examples
///
/// ```
/// use menu_core::{MenuItem, MenuTree};
///
/// let mut tree = MenuTree::new();
/// tree.create_root_item(MenuItem::page("admin", "Administration", "admin"))?;
/// tree.create_item("admin", MenuItem::page("users", "Users", "users"))?;
/// tree.create_separator("admin")?;
///
/// let admin = tree.find("admin").unwrap();
/// assert_eq!(tree.children(admin).len(), 2);
/// assert_eq!(tree.len(), 3);
/// # Ok::<(), menu_core::MenuError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
    index: HashMap<String, NodeId>,
    separator_seq: usize,
    default_item_ids: Vec<String>,
}

impl MenuTree {
    /// Creates an empty tree holding only the root container.
    pub fn new() -> Self {
        Self {
            nodes: vec![MenuNode {
                id: String::new(),
                parent: None,
                children: Vec::new(),
                payload: None,
            }],
            index: HashMap::new(),
            separator_seq: 0,
            default_item_ids: Vec::new(),
        }
    }

    /// Returns the handle of the root container.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a top-level item.
    ///
    /// # Errors
    ///
    /// Returns `EmptyId` or `DuplicateId` if the item id is unusable.
    pub fn create_root_item(&mut self, item: MenuItem) -> Result<NodeId, MenuError> {
        self.insert(self.root(), MenuObject::Item(item))
    }

    /// Appends an item below the node with id `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParent` if `parent_id` does not exist, or `EmptyId` /
    /// `DuplicateId` if the item id is unusable.
    pub fn create_item(&mut self, parent_id: &str, item: MenuItem) -> Result<NodeId, MenuError> {
        let parent = self.parent_handle(parent_id)?;
        self.insert(parent, MenuObject::Item(item))
    }

    /// Appends a top-level separator with a generated id.
    pub fn create_root_separator(&mut self) -> NodeId {
        self.push_separator(self.root(), MenuSeparator::new())
    }

    /// Appends a separator with a generated id below `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParent` if `parent_id` does not exist.
    pub fn create_separator(&mut self, parent_id: &str) -> Result<NodeId, MenuError> {
        self.add_separator(parent_id, MenuSeparator::new())
    }

    /// Appends a prepared separator (for example one carrying a display
    /// filter) below `parent_id`. Its id is generated.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParent` if `parent_id` does not exist.
    pub fn add_separator(
        &mut self,
        parent_id: &str,
        separator: MenuSeparator,
    ) -> Result<NodeId, MenuError> {
        let parent = self.parent_handle(parent_id)?;
        Ok(self.push_separator(parent, separator))
    }

    /// Looks up a node by id. The empty id never resolves.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `node` was issued by another tree and is out of range.
    pub fn node(&self, node: NodeId) -> &MenuNode {
        &self.nodes[node.0]
    }

    /// Returns the menu object with the given id.
    pub fn object_of(&self, id: &str) -> Option<&MenuObject> {
        self.find(id).and_then(|node| self.node(node).payload())
    }

    /// Returns the children of `node` in display order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Returns the parent of `node`, `None` for the root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Returns the direct child of `parent` with the given id.
    pub fn child_with_id(&self, parent: NodeId, id: &str) -> Option<NodeId> {
        self.find(id)
            .filter(|&child| self.node(child).parent == Some(parent))
    }

    /// Returns `true` if `node` is `ancestor` or lies anywhere below it.
    pub fn is_same_or_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.node(n).parent;
        }
        false
    }

    /// Returns the number of menu objects, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns `true` if the tree holds no menu objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all menu nodes in pre-order (display order).
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> + '_ {
        let mut collector = PreOrder(Vec::with_capacity(self.len()));
        walk::walk_children(self, self.root(), &mut collector);
        collector.0.into_iter().map(move |node| self.node(node))
    }

    /// Replaces the item with the same id, keeping its position and
    /// children.
    ///
    /// Returns the previous item, or `None` (leaving the tree untouched) if
    /// no item with that id exists.
    pub fn replace_item(&mut self, item: MenuItem) -> Option<MenuItem> {
        let node = self.find(item.id())?;
        let slot = &mut self.nodes[node.0].payload;
        if !matches!(slot, Some(MenuObject::Item(_))) {
            return None;
        }
        match slot.replace(MenuObject::Item(item)) {
            Some(MenuObject::Item(previous)) => Some(previous),
            _ => None,
        }
    }

    /// Sets the ids of the items used when a request selects nothing.
    ///
    /// Ids are resolved lazily, so they may name items added later.
    pub fn set_default_item_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_item_ids = ids.into_iter().map(Into::into).collect();
    }

    /// Returns the first configured default item id.
    pub fn default_item_id(&self) -> Option<&str> {
        self.default_item_ids.first().map(String::as_str)
    }

    /// Returns all configured default item ids in order.
    pub fn default_item_ids(&self) -> &[String] {
        &self.default_item_ids
    }

    /// Resolves the first default item id to a page item.
    pub fn default_item(&self) -> Option<&MenuItem> {
        self.default_item_id()
            .and_then(|id| self.resolve_default_item(id))
    }

    /// Resolves every default item id, skipping ids that do not name a page
    /// item.
    pub fn default_items(&self) -> Vec<&MenuItem> {
        self.default_item_ids
            .iter()
            .filter_map(|id| self.resolve_default_item(id))
            .collect()
    }

    fn resolve_default_item(&self, id: &str) -> Option<&MenuItem> {
        match self.object_of(id) {
            Some(MenuObject::Item(item)) if item.is_page() => Some(item),
            Some(_) => {
                tracing::warn!(
                    menu_item_id = %id,
                    "default menu object does not resolve to a page item"
                );
                None
            }
            None => {
                tracing::warn!(menu_item_id = %id, "failed to resolve default menu item");
                None
            }
        }
    }

    fn parent_handle(&self, parent_id: &str) -> Result<NodeId, MenuError> {
        self.find(parent_id)
            .ok_or_else(|| MenuError::new(MenuErrorKind::UnknownParent, parent_id))
    }

    fn push_separator(&mut self, parent: NodeId, mut separator: MenuSeparator) -> NodeId {
        let id = loop {
            self.separator_seq += 1;
            let candidate = format!("separator-{}", self.separator_seq);
            if !self.index.contains_key(&candidate) {
                break candidate;
            }
        };
        separator.assign_id(id.clone());
        self.attach(parent, id, MenuObject::Separator(separator))
    }

    fn insert(&mut self, parent: NodeId, object: MenuObject) -> Result<NodeId, MenuError> {
        let id = object.id();
        if id.is_empty() {
            return Err(MenuError::new(MenuErrorKind::EmptyId, id));
        }
        if self.index.contains_key(id) {
            return Err(MenuError::new(MenuErrorKind::DuplicateId, id));
        }
        let id = id.to_string();
        Ok(self.attach(parent, id, object))
    }

    fn attach(&mut self, parent: NodeId, id: String, object: MenuObject) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(MenuNode {
            id: id.clone(),
            parent: Some(parent),
            children: Vec::new(),
            payload: Some(object),
        });
        self.nodes[parent.0].children.push(node);
        self.index.insert(id, node);
        node
    }
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy for MenuTree {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> &[NodeId] {
        MenuTree::children(self, node)
    }
}

struct PreOrder(Vec<NodeId>);

impl WalkCallback<NodeId> for PreOrder {
    fn before_children(&mut self, node: NodeId, _depth: usize) -> WalkControl {
        self.0.push(node);
        WalkControl::Continue
    }
}
