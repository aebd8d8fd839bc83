//! Which menu nodes to show for a given selection.
//!
//! [`VisibilityDeterminator`] walks the whole tree once and records every
//! node that must be rendered, together with a flag telling whether the
//! node lies on the path to the selection.
//!
//! The rules, in order:
//!
//! 1. An unknown or empty selection counts as no selection.
//! 2. Top-level nodes are always shown.
//! 3. Below the top level, with a selection `S`:
//!    - a node that is `S` or an ancestor of `S` is shown and flagged
//!    - a node whose parent is `S`, or whose parent is also the parent of
//!      `S`, is shown; this reveals its whole sibling group
//! 4. A node failing its display filter is never shown, also not as part of
//!    a revealed sibling group.
//! 5. Without a selection nothing below the top level is shown.
//!
//! [`VisibilityRules`] switches on two extensions used by classic menu
//! layouts: flagging top-level ancestors and revealing the siblings of
//! every ancestor.

use std::collections::hash_map;
use std::collections::{HashMap, HashSet};

use crate::selection::Selection;
use crate::tree::{MenuTree, NodeId};
use crate::walk::{self, WalkCallback, WalkControl};

/// Menu node ids to display, each with its "on selected path" flag.
///
/// Presence of an id means the node is rendered; absence means neither the
/// node nor anything below it is rendered.
///
/// Recording is upgrade-only: once an id is flagged `true` a later
/// `false` for the same id is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    items: HashMap<String, bool>,
}

impl VisibilityMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` for display. Never downgrades a `true` flag.
    pub fn remember(&mut self, id: &str, on_selected_path: bool) {
        match self.items.get_mut(id) {
            Some(flag) => *flag |= on_selected_path,
            None => {
                self.items.insert(id.to_owned(), on_selected_path);
            }
        }
    }

    /// Returns `true` if the node with `id` is displayed.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Returns the flag of a displayed node, `None` if it is not displayed.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.items.get(id).copied()
    }

    /// Returns `true` if the node is displayed and on the selected path.
    pub fn is_on_selected_path(&self, id: &str) -> bool {
        self.get(id).unwrap_or(false)
    }

    /// Returns the number of displayed nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no node is displayed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(id, on_selected_path)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.items.iter().map(|(id, flag)| (id.as_str(), *flag))
    }

    /// Iterates over the displayed ids in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.keys().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<(S, bool)> for VisibilityMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, flag) in iter {
            map.remember(id.as_ref(), flag);
        }
        map
    }
}

impl From<HashMap<String, bool>> for VisibilityMap {
    fn from(items: HashMap<String, bool>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a VisibilityMap {
    type Item = (&'a String, &'a bool);
    type IntoIter = hash_map::Iter<'a, String, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Tuning knobs for [`VisibilityDeterminator`].
///
/// The default rules flag only non-top-level ancestors of the selection and
/// reveal sibling groups only around the selection itself.
///
/// # Examples
///
/// ```
/// use menu_core::VisibilityRules;
///
/// let rules = VisibilityRules::new().expand_top_level_path(true);
/// assert!(rules.expands_top_level_path());
/// assert!(!rules.reveals_ancestor_siblings());
/// assert_eq!(VisibilityRules::classic(), rules.reveal_ancestor_siblings(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityRules {
    expand_top_level_path: bool,
    reveal_ancestor_siblings: bool,
}

impl VisibilityRules {
    /// Returns the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classic behaviour: top-level ancestors are flagged, and every
    /// ancestor of the selection reveals its siblings.
    pub fn classic() -> Self {
        Self {
            expand_top_level_path: true,
            reveal_ancestor_siblings: true,
        }
    }

    /// Flag top-level nodes that are the selection or one of its ancestors.
    pub fn expand_top_level_path(mut self, enabled: bool) -> Self {
        self.expand_top_level_path = enabled;
        self
    }

    /// Reveal the sibling group of every non-top-level ancestor.
    pub fn reveal_ancestor_siblings(mut self, enabled: bool) -> Self {
        self.reveal_ancestor_siblings = enabled;
        self
    }

    /// Returns whether top-level ancestors are flagged.
    pub fn expands_top_level_path(&self) -> bool {
        self.expand_top_level_path
    }

    /// Returns whether ancestors reveal their siblings.
    pub fn reveals_ancestor_siblings(&self) -> bool {
        self.reveal_ancestor_siblings
    }
}

/// Computes the [`VisibilityMap`] of a tree for a selection.
///
/// The result depends only on the tree, the selection and the rules. The
/// tree is only read.
///
/// # Examples
///
/// ```
/// use menu_core::{MenuItem, MenuTree, Selection, VisibilityDeterminator};
///
/// let mut tree = MenuTree::new();
/// tree.create_root_item(MenuItem::page("a", "A", "a"))?;
/// tree.create_item("a", MenuItem::page("a1", "A1", "a1"))?;
/// tree.create_item("a", MenuItem::page("a2", "A2", "a2"))?;
/// tree.create_root_item(MenuItem::page("b", "B", "b"))?;
/// tree.create_item("b", MenuItem::page("b1", "B1", "b1"))?;
///
/// let selection = Selection::resolve(&tree, Some("a1"));
/// let map = VisibilityDeterminator::default().determine(&tree, &selection);
///
/// let mut ids: Vec<&str> = map.ids().collect();
/// ids.sort();
/// assert_eq!(ids, vec!["a", "a1", "a2", "b"]);
/// assert!(map.is_on_selected_path("a1"));
/// # Ok::<(), menu_core::MenuError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityDeterminator {
    rules: VisibilityRules,
}

impl VisibilityDeterminator {
    /// Creates a determinator applying `rules`.
    pub fn new(rules: VisibilityRules) -> Self {
        Self { rules }
    }

    /// Returns the rules in use.
    pub fn rules(&self) -> VisibilityRules {
        self.rules
    }

    /// Walks `tree` and collects every node to display for `selection`.
    pub fn determine(&self, tree: &MenuTree, selection: &Selection) -> VisibilityMap {
        let mut determination = Determination {
            tree,
            selected: selection.node(),
            rules: self.rules,
            map: VisibilityMap::new(),
            revealed: HashSet::new(),
        };
        walk::walk_children(tree, tree.root(), &mut determination);

        tracing::debug!(
            selected = selection.id().unwrap_or_default(),
            displayed = determination.map.len(),
            "determined visible menu items"
        );
        determination.map
    }
}

/// Resolves `selected_id` and determines visibility with the default rules.
pub fn determine_visibility(tree: &MenuTree, selected_id: Option<&str>) -> VisibilityMap {
    VisibilityDeterminator::default().determine(tree, &Selection::resolve(tree, selected_id))
}

/// Marks every menu node as displayed and on the selected path.
///
/// Rendering with this map produces the fully expanded menu, as used for
/// site maps. Display filters are not consulted.
pub fn all_menu_item_ids(tree: &MenuTree) -> VisibilityMap {
    tree.iter().map(|node| (node.id(), true)).collect()
}

/// Walk state of one determination.
struct Determination<'t> {
    tree: &'t MenuTree,
    selected: Option<NodeId>,
    rules: VisibilityRules,
    map: VisibilityMap,
    /// Parents whose child group has already been revealed.
    revealed: HashSet<NodeId>,
}

impl Determination<'_> {
    /// Returns `(show, reveal_siblings, on_selected_path)` before filtering.
    fn classify(&self, node: NodeId, top_level: bool) -> (bool, bool, bool) {
        let Some(selected) = self.selected else {
            return (top_level, false, false);
        };
        let on_path = self.tree.is_same_or_descendant_of(selected, node);

        if top_level {
            return (true, false, on_path && self.rules.expand_top_level_path);
        }
        if on_path {
            return (true, self.rules.reveal_ancestor_siblings, true);
        }

        let parent = self.tree.parent(node);
        let adjacent = parent == Some(selected) || parent == self.tree.parent(selected);
        (adjacent, adjacent, false)
    }
}

impl WalkCallback<NodeId> for Determination<'_> {
    fn before_children(&mut self, node: NodeId, depth: usize) -> WalkControl {
        let (mut show, mut reveal, on_path) = self.classify(node, depth == 0);

        let menu_node = self.tree.node(node);
        if (show || reveal) && !menu_node.passes_display_filter() {
            show = false;
            reveal = false;
        }

        tracing::trace!(
            menu_item_id = %menu_node.id(),
            depth,
            show,
            reveal,
            on_path,
            "menu item visibility"
        );

        if show {
            self.map.remember(menu_node.id(), on_path);
        }
        if reveal {
            if let Some(parent) = menu_node.parent().filter(|&p| self.revealed.insert(p)) {
                for &sibling in self.tree.children(parent) {
                    let sibling = self.tree.node(sibling);
                    if sibling.passes_display_filter() {
                        self.map.remember(sibling.id(), false);
                    }
                }
            }
        }

        // Group membership needs every node, so nothing is pruned here.
        WalkControl::Continue
    }
}
