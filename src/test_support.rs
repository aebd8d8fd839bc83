//! Shared fixtures for unit tests.

use crate::item::MenuItem;
use crate::tree::MenuTree;

/// Root -> {a, b}, a -> {a1, a2}, b -> {b1}.
pub(crate) fn sample_tree() -> MenuTree {
    let mut tree = MenuTree::new();
    tree.create_root_item(MenuItem::page("a", "A", "page-a")).unwrap();
    tree.create_item("a", MenuItem::page("a1", "A1", "page-a1")).unwrap();
    tree.create_item("a", MenuItem::page("a2", "A2", "page-a2")).unwrap();
    tree.create_root_item(MenuItem::page("b", "B", "page-b")).unwrap();
    tree.create_item("b", MenuItem::page("b1", "B1", "page-b1")).unwrap();
    tree
}

/// Three levels: a -> {a1 -> {a1x, a1y}, a2}, b -> {b1}.
pub(crate) fn deep_tree() -> MenuTree {
    let mut tree = sample_tree();
    tree.create_item("a1", MenuItem::page("a1x", "A1x", "page-a1x")).unwrap();
    tree.create_item("a1", MenuItem::page("a1y", "A1y", "page-a1y")).unwrap();
    tree
}
