//! Building the pruned output tree of a menu.
//!
//! The renderer walks the menu tree a second time, after visibility has
//! been decided, and mirrors the visible part of it into a
//! [`RenderedMenu`]. Turning a single item or separator into output (markup,
//! widgets, text) is delegated to an [`ItemRenderer`].
//!
//! Four stacks move in lockstep with the walk:
//!
//! - open output lists; siblings at the current depth are appended to the top
//! - the slot of the node emitted at each depth, or a placeholder for a
//!   hidden node
//! - per-level counters of emitted nodes
//! - the source node at each depth
//!
//! When a render finishes, exactly the result list must be left open.
//! Anything else is a defect in this module and panics.

use std::slice;

use crate::error::{MenuError, MenuErrorKind};
use crate::item::{MenuItem, MenuObject, MenuSeparator};
use crate::selection::Selection;
use crate::tree::{MenuTree, NodeId};
use crate::visibility::{VisibilityDeterminator, VisibilityMap, VisibilityRules};
use crate::walk::{self, WalkCallback, WalkControl};

/// Render-time state of a menu item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemState {
    /// At least one child of the item is displayed.
    pub has_visible_children: bool,
    /// The item is the current selection.
    pub is_selected: bool,
    /// The item is the selection or one of its ancestors.
    pub on_selected_path: bool,
}

/// Turns single menu objects into output nodes.
///
/// # Examples
///
/// ```
/// use menu_core::{ItemRenderer, ItemState, MenuItem, MenuSeparator};
///
/// struct Text;
///
/// impl ItemRenderer for Text {
///     type Output = String;
///
///     fn render_separator(&mut self, _separator: &MenuSeparator) -> String {
///         "----".to_string()
///     }
///
///     fn render_item(&mut self, item: &MenuItem, state: ItemState) -> String {
///         if state.is_selected {
///             format!("[{}]", item.text())
///         } else {
///             item.text().to_string()
///         }
///     }
/// }
/// ```
pub trait ItemRenderer {
    /// Output produced for one menu object.
    type Output;

    /// Renders a separator.
    fn render_separator(&mut self, separator: &MenuSeparator) -> Self::Output;

    /// Renders an item.
    fn render_item(&mut self, item: &MenuItem, state: ItemState) -> Self::Output;

    /// Called when a nested list is opened, before any child is added.
    fn on_level_down(&mut self, _menu: &mut RenderedMenu<Self::Output>) {}

    /// Called when a nested list is complete, before it is attached to its
    /// parent item.
    fn on_level_up(&mut self, _menu: &mut RenderedMenu<Self::Output>) {}
}

/// One ordered list of the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu<T> {
    level: usize,
    items: Vec<RenderedNode<T>>,
}

impl<T> RenderedMenu<T> {
    fn new(level: usize) -> Self {
        Self {
            level,
            items: Vec::new(),
        }
    }

    /// Nesting level; the result list is level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the nodes of this list.
    pub fn items(&self) -> &[RenderedNode<T>] {
        &self.items
    }

    /// Returns the nodes of this list for in-place changes.
    pub fn items_mut(&mut self) -> &mut [RenderedNode<T>] {
        &mut self.items
    }

    /// Returns the number of nodes on this level.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if this list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the nodes of this level.
    pub fn iter(&self) -> slice::Iter<'_, RenderedNode<T>> {
        self.items.iter()
    }

    /// Counts the nodes of this list and of all nested lists.
    pub fn count_nodes(&self) -> usize {
        self.items
            .iter()
            .map(|node| 1 + node.children.as_ref().map_or(0, RenderedMenu::count_nodes))
            .sum()
    }

    /// Consumes the list and returns its nodes.
    pub fn into_items(self) -> Vec<RenderedNode<T>> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a RenderedMenu<T> {
    type Item = &'a RenderedNode<T>;
    type IntoIter = slice::Iter<'a, RenderedNode<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One rendered menu object and, if it has displayed children, their list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode<T> {
    content: T,
    children: Option<RenderedMenu<T>>,
}

impl<T> RenderedNode<T> {
    /// Returns the renderer output for this node.
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Returns the renderer output for in-place changes.
    pub fn content_mut(&mut self) -> &mut T {
        &mut self.content
    }

    /// Returns the nested list, present only if a child is displayed.
    pub fn children(&self) -> Option<&RenderedMenu<T>> {
        self.children.as_ref()
    }

    /// Splits the node into its content and nested list.
    pub fn into_parts(self) -> (T, Option<RenderedMenu<T>>) {
        (self.content, self.children)
    }
}

/// Configures and runs one menu render.
///
/// By default the whole tree is rendered and visibility is determined with
/// [`VisibilityRules::default`]. The start node itself is never rendered:
/// its children form level 0 of the result.
///
/// # Examples
///
/// ```
/// use menu_core::{
///     ItemRenderer, ItemState, MenuItem, MenuRenderer, MenuSeparator, MenuTree, Selection,
/// };
///
/// struct Ids;
///
/// impl ItemRenderer for Ids {
///     type Output = String;
///     fn render_separator(&mut self, separator: &MenuSeparator) -> String {
///         separator.id().to_string()
///     }
///     fn render_item(&mut self, item: &MenuItem, _state: ItemState) -> String {
///         item.id().to_string()
///     }
/// }
///
/// let mut tree = MenuTree::new();
/// tree.create_root_item(MenuItem::page("a", "A", "a"))?;
/// tree.create_item("a", MenuItem::page("a1", "A1", "a1"))?;
/// tree.create_root_item(MenuItem::page("b", "B", "b"))?;
///
/// let selection = Selection::resolve(&tree, Some("a1"));
/// let menu = MenuRenderer::new(&tree, selection).render(&mut Ids);
///
/// assert_eq!(menu.len(), 2);
/// let nested = menu.items()[0].children().unwrap();
/// assert_eq!(nested.items()[0].content(), "a1");
/// # Ok::<(), menu_core::MenuError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MenuRenderer<'t> {
    tree: &'t MenuTree,
    selection: Selection,
    start: NodeId,
    visibility: Option<VisibilityMap>,
    rules: VisibilityRules,
}

impl<'t> MenuRenderer<'t> {
    /// Creates a renderer for the whole tree.
    pub fn new(tree: &'t MenuTree, selection: Selection) -> Self {
        Self {
            tree,
            selection,
            start: tree.root(),
            visibility: None,
            rules: VisibilityRules::default(),
        }
    }

    /// Renders only the children (and their descendants) of the node with
    /// id `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if no node has this id.
    pub fn start_at(mut self, id: &str) -> Result<Self, MenuError> {
        self.start = self
            .tree
            .find(id)
            .ok_or_else(|| MenuError::new(MenuErrorKind::UnknownNode, id))?;
        Ok(self)
    }

    /// Uses a caller-supplied visibility map instead of determining one.
    pub fn visibility(mut self, visibility: VisibilityMap) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Sets the rules used when the visibility map is determined here.
    pub fn rules(mut self, rules: VisibilityRules) -> Self {
        self.rules = rules;
        self
    }

    /// Builds the output tree.
    ///
    /// # Panics
    ///
    /// Panics if the internal stacks are out of sync after the walk, which
    /// indicates a defect in this crate rather than bad input.
    pub fn render<R: ItemRenderer>(&self, renderer: &mut R) -> RenderedMenu<R::Output> {
        let determined;
        let visibility = match &self.visibility {
            Some(visibility) => visibility,
            None => {
                determined =
                    VisibilityDeterminator::new(self.rules).determine(self.tree, &self.selection);
                &determined
            }
        };
        render_sub_menu(self.tree, self.start, &self.selection, visibility, renderer)
    }
}

/// Renders the whole tree, determining visibility with the default rules.
pub fn render_menu<R: ItemRenderer>(
    tree: &MenuTree,
    selection: &Selection,
    renderer: &mut R,
) -> RenderedMenu<R::Output> {
    let visibility = VisibilityDeterminator::default().determine(tree, selection);
    render_sub_menu(tree, tree.root(), selection, &visibility, renderer)
}

/// Renders the children of `start` and their descendants with an explicit
/// visibility map.
///
/// # Panics
///
/// Panics if `start` was issued by another tree, or if the internal stacks
/// are out of sync after the walk.
pub fn render_sub_menu<R: ItemRenderer>(
    tree: &MenuTree,
    start: NodeId,
    selection: &Selection,
    visibility: &VisibilityMap,
    renderer: &mut R,
) -> RenderedMenu<R::Output> {
    let mut rendering = Rendering {
        tree,
        visibility,
        selection,
        renderer,
        targets: vec![RenderedMenu::new(0)],
        emitted: Vec::new(),
        counters: vec![0],
        sources: Vec::new(),
    };
    walk::walk_children(tree, start, &mut rendering);

    let mut targets = rendering.targets;
    let menu = match targets.pop() {
        Some(menu) if targets.is_empty() => menu,
        _ => panic!(
            "menu render stack is inconsistent: {} open lists left",
            targets.len() + 1
        ),
    };

    tracing::debug!(
        start = %tree.node(start).id(),
        selected = selection.id().unwrap_or_default(),
        top_level = menu.len(),
        rendered = menu.count_nodes(),
        "rendered menu"
    );
    menu
}

/// Walk state of one render call.
struct Rendering<'a, R: ItemRenderer> {
    tree: &'a MenuTree,
    visibility: &'a VisibilityMap,
    selection: &'a Selection,
    renderer: &'a mut R,
    targets: Vec<RenderedMenu<R::Output>>,
    // Index into the list that was the target when the node was emitted;
    // `None` for a hidden node.
    emitted: Vec<Option<usize>>,
    counters: Vec<usize>,
    sources: Vec<NodeId>,
}

impl<R: ItemRenderer> Rendering<'_, R> {
    fn has_visible_children(&self, node: NodeId) -> bool {
        self.tree
            .children(node)
            .iter()
            .any(|&child| self.visibility.contains(self.tree.node(child).id()))
    }

    fn render_object(
        &mut self,
        node: NodeId,
        object: &MenuObject,
        on_selected_path: bool,
    ) -> R::Output {
        match object {
            MenuObject::Separator(separator) => self.renderer.render_separator(separator),
            MenuObject::Item(item) => {
                let state = ItemState {
                    has_visible_children: self.has_visible_children(node),
                    is_selected: self.selection.is(item.id()),
                    on_selected_path,
                };
                self.renderer.render_item(item, state)
            }
        }
    }
}

impl<R: ItemRenderer> WalkCallback<NodeId> for Rendering<'_, R> {
    fn before_children(&mut self, node: NodeId, _depth: usize) -> WalkControl {
        let tree = self.tree;
        self.sources.push(node);

        let menu_node = tree.node(node);
        let (Some(on_selected_path), Some(object)) =
            (self.visibility.get(menu_node.id()), menu_node.payload())
        else {
            // Placeholder keeps `emitted` as deep as `sources`.
            self.emitted.push(None);
            return WalkControl::SkipSubtree;
        };

        let content = self.render_object(node, object, on_selected_path);
        let Some(target) = self.targets.last_mut() else {
            panic!("menu render stack is empty while emitting '{}'", menu_node.id());
        };
        target.items.push(RenderedNode {
            content,
            children: None,
        });
        self.emitted.push(Some(target.items.len() - 1));
        if let Some(count) = self.counters.last_mut() {
            *count += 1;
        }
        WalkControl::Continue
    }

    fn on_descend(&mut self) {
        if let Some(&parent) = self.sources.last() {
            if self.has_visible_children(parent) {
                let mut level = RenderedMenu::new(self.targets.len());
                self.renderer.on_level_down(&mut level);
                self.targets.push(level);
            }
        }
        self.counters.push(0);
    }

    fn on_ascend(&mut self) {
        let emitted_here = self.counters.pop().unwrap_or(0);
        if emitted_here == 0 {
            return;
        }

        let Some(mut level) = self.targets.pop() else {
            panic!("menu render stack underflow on ascend");
        };
        self.renderer.on_level_up(&mut level);

        // The parent item is still on top of `emitted` until after_children.
        let slot = self.emitted.last().copied().flatten();
        match (slot, self.targets.last_mut()) {
            (Some(index), Some(parent)) => parent.items[index].children = Some(level),
            _ => panic!("menu render stack has no parent item for a nested list"),
        }
    }

    fn after_children(&mut self, _node: NodeId) {
        self.sources.pop();
        self.emitted.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{deep_tree, sample_tree};
    use crate::visibility::{all_menu_item_ids, determine_visibility};

    /// Renders `id` or `id*` (selected), `id+` (on path), `id>` (has
    /// children), and records every call.
    #[derive(Default)]
    struct Recording {
        calls: Vec<String>,
        levels_down: usize,
        levels_up: usize,
    }

    impl ItemRenderer for Recording {
        type Output = String;

        fn render_separator(&mut self, separator: &MenuSeparator) -> String {
            self.calls.push(separator.id().to_string());
            "--".to_string()
        }

        fn render_item(&mut self, item: &MenuItem, state: ItemState) -> String {
            self.calls.push(item.id().to_string());
            let mut out = item.id().to_string();
            if state.is_selected {
                out.push('*');
            }
            if state.on_selected_path {
                out.push('+');
            }
            if state.has_visible_children {
                out.push('>');
            }
            out
        }

        fn on_level_down(&mut self, menu: &mut RenderedMenu<String>) {
            assert!(menu.is_empty());
            self.levels_down += 1;
        }

        fn on_level_up(&mut self, menu: &mut RenderedMenu<String>) {
            assert!(!menu.is_empty());
            self.levels_up += 1;
        }
    }

    /// Flattens a rendered menu into `a(b,c),d` form.
    fn outline(menu: &RenderedMenu<String>) -> String {
        menu.iter()
            .map(|node| match node.children() {
                Some(children) => format!("{}({})", node.content(), outline(children)),
                None => node.content().clone(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn no_selection_renders_flat_top_level() {
        let tree = sample_tree();
        let mut renderer = Recording::default();
        let menu = render_menu(&tree, &Selection::none(), &mut renderer);

        assert_eq!(outline(&menu), "a,b");
        assert_eq!(renderer.calls, vec!["a", "b"]);
        assert_eq!(renderer.levels_down, 0);
    }

    #[test]
    fn selected_leaf_opens_its_parent() {
        let tree = sample_tree();
        let selection = Selection::resolve(&tree, Some("a1"));
        let mut renderer = Recording::default();
        let menu = render_menu(&tree, &selection, &mut renderer);

        assert_eq!(outline(&menu), "a>(a1*+,a2),b");
        assert_eq!(menu.count_nodes(), 4);
        assert_eq!(menu.items()[0].children().map(RenderedMenu::level), Some(1));
        assert_eq!(renderer.levels_down, 1);
        assert_eq!(renderer.levels_up, 1);
    }

    #[test]
    fn hidden_nodes_are_never_rendered() {
        let tree = deep_tree();
        let selection = Selection::resolve(&tree, Some("a1x"));
        let mut renderer = Recording::default();
        let menu = render_menu(&tree, &selection, &mut renderer);

        assert_eq!(outline(&menu), "a>(a1+>(a1x*+,a1y)),b");
        assert!(!renderer.calls.contains(&"a2".to_string()));
        assert!(!renderer.calls.contains(&"b1".to_string()));
    }

    #[test]
    fn nested_list_only_when_a_child_is_visible() {
        let tree = sample_tree();
        let map: VisibilityMap = [("a", false), ("b", false)].into_iter().collect();
        let menu = render_sub_menu(
            &tree,
            tree.root(),
            &Selection::none(),
            &map,
            &mut Recording::default(),
        );

        assert!(menu.iter().all(|node| node.children().is_none()));
    }

    #[test]
    fn child_of_hidden_parent_is_skipped() {
        let tree = sample_tree();
        // a1 is listed but its parent is not: the subtree is pruned.
        let map: VisibilityMap = [("b", false), ("a1", true)].into_iter().collect();
        let mut renderer = Recording::default();
        let menu = render_sub_menu(&tree, tree.root(), &Selection::none(), &map, &mut renderer);

        assert_eq!(outline(&menu), "b");
        assert_eq!(renderer.calls, vec!["b"]);
    }

    #[test]
    fn separators_are_rendered_in_place() {
        let mut tree = sample_tree();
        tree.create_separator("a").unwrap();
        tree.create_item("a", MenuItem::page("a3", "A3", "p")).unwrap();
        let selection = Selection::resolve(&tree, Some("a"));
        let menu = render_menu(&tree, &selection, &mut Recording::default());

        assert_eq!(outline(&menu), "a*>(a1,a2,--,a3),b");
    }

    #[test]
    fn fully_expanded_menu() {
        let tree = deep_tree();
        let map = all_menu_item_ids(&tree);
        let menu = render_sub_menu(
            &tree,
            tree.root(),
            &Selection::none(),
            &map,
            &mut Recording::default(),
        );

        assert_eq!(outline(&menu), "a+>(a1+>(a1x+,a1y+),a2+),b+>(b1+)");
        assert_eq!(menu.count_nodes(), tree.len());
    }

    #[test]
    fn sub_menu_starts_below_start_node() {
        let tree = deep_tree();
        let selection = Selection::resolve(&tree, Some("a1x"));
        let menu = MenuRenderer::new(&tree, selection)
            .start_at("a")
            .unwrap()
            .render(&mut Recording::default());

        assert_eq!(outline(&menu), "a1+>(a1x*+,a1y)");
        assert_eq!(menu.level(), 0);
    }

    /// Marks the last entry of every nested level once it is complete.
    struct LastMarker(Recording);

    impl ItemRenderer for LastMarker {
        type Output = String;

        fn render_separator(&mut self, separator: &MenuSeparator) -> String {
            self.0.render_separator(separator)
        }

        fn render_item(&mut self, item: &MenuItem, state: ItemState) -> String {
            self.0.render_item(item, state)
        }

        fn on_level_up(&mut self, menu: &mut RenderedMenu<String>) {
            if let Some(last) = menu.items_mut().last_mut() {
                last.content_mut().push('$');
            }
        }
    }

    #[test]
    fn level_up_hook_can_edit_the_finished_level() {
        let tree = deep_tree();
        let selection = Selection::resolve(&tree, Some("a1x"));
        let menu = render_menu(&tree, &selection, &mut LastMarker(Recording::default()));

        assert_eq!(outline(&menu), "a>(a1+>$(a1x*+,a1y$)),b");
    }

    #[test]
    fn rendered_menu_can_be_taken_apart() {
        let tree = sample_tree();
        let selection = Selection::resolve(&tree, Some("a1"));
        let menu = render_menu(&tree, &selection, &mut Recording::default());

        let mut items = menu.into_items().into_iter();
        let (first, nested) = items.next().unwrap().into_parts();
        assert_eq!(first, "a>");
        let nested: Vec<String> = nested
            .unwrap()
            .into_items()
            .into_iter()
            .map(|node| node.into_parts().0)
            .collect();
        assert_eq!(nested, vec!["a1*+", "a2"]);

        let (last, children) = items.next().unwrap().into_parts();
        assert_eq!(last, "b");
        assert!(children.is_none());
        assert!(items.next().is_none());
    }

    #[test]
    fn start_at_unknown_node_is_an_error() {
        let tree = sample_tree();
        let err = MenuRenderer::new(&tree, Selection::none())
            .start_at("missing")
            .unwrap_err();
        assert_eq!(err.kind(), MenuErrorKind::UnknownNode);
    }

    #[test]
    fn builder_uses_supplied_map_and_rules() {
        let tree = deep_tree();
        let selection = Selection::resolve(&tree, Some("a1x"));

        let classic = MenuRenderer::new(&tree, selection.clone())
            .rules(VisibilityRules::classic())
            .render(&mut Recording::default());
        assert_eq!(outline(&classic), "a+>(a1+>(a1x*+,a1y),a2),b");

        let supplied = MenuRenderer::new(&tree, selection)
            .visibility(determine_visibility(&tree, None))
            .render(&mut Recording::default());
        assert_eq!(outline(&supplied), "a,b");
    }

    #[test]
    fn empty_tree_renders_empty_menu() {
        let tree = MenuTree::new();
        let menu = render_menu(&tree, &Selection::none(), &mut Recording::default());
        assert!(menu.is_empty());
        assert_eq!(menu.count_nodes(), 0);
    }
}
