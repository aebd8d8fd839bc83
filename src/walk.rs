//! Depth-first pre-order traversal over ordered trees.
//!
//! The walker knows nothing about menus. It drives a [`WalkCallback`] over
//! any [`Hierarchy`] and guarantees a strict push/pop discipline:
//!
//! - every node that receives `before_children` receives exactly one
//!   `after_children`, in LIFO order, whatever its [`WalkControl`] was
//! - every `on_descend` is mirrored by exactly one `on_ascend`
//!
//! Callers that keep their own stacks keyed on traversal depth can rely on
//! these pairs staying balanced, also when the walk is aborted.
//!
//! All walk state lives on the call stack and in the callback value, so one
//! tree can be walked by any number of threads at the same time.

use std::ops::ControlFlow;

/// An ordered tree that can be walked.
///
/// Node handles are small `Copy` values (indices, references) resolved
/// against the implementing tree.
pub trait Hierarchy {
    /// Handle of a node in this tree.
    type Node: Copy;

    /// Returns the children of `node` in display order.
    fn children(&self, node: Self::Node) -> &[Self::Node];
}

/// Per-node decision returned by [`WalkCallback::before_children`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Descend into the children of this node.
    Continue,
    /// Do not enter the children of this node; go on with the next sibling.
    SkipSubtree,
    /// Stop the whole walk. Pending levels are unwound but no further node
    /// is entered.
    Abort,
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every reachable node was visited.
    Completed,
    /// A callback returned [`WalkControl::Abort`].
    Aborted,
}

/// Receives the events of a walk.
///
/// Only `before_children` is required; the level and post-order
/// notifications default to no-ops.
pub trait WalkCallback<N> {
    /// Called when `node` is entered. `depth` is 0 for the first level of
    /// the walk.
    fn before_children(&mut self, node: N, depth: usize) -> WalkControl;

    /// Called once for every node passed to `before_children`, after its
    /// children (if any were entered) have been processed.
    fn after_children(&mut self, _node: N) {}

    /// Called right before the first child of the current node is entered.
    ///
    /// Only fires when the node returned [`WalkControl::Continue`] and has
    /// at least one child.
    fn on_descend(&mut self) {}

    /// Called once after the children of a node have been processed,
    /// mirroring the preceding [`on_descend`](Self::on_descend).
    fn on_ascend(&mut self) {}
}

/// Walks `root` and all of its descendants in pre-order.
///
/// `root` itself is visited at depth 0.
///
/// # Examples
///
/// ```
/// use menu_core::walk::{walk, Hierarchy, WalkCallback, WalkControl, WalkOutcome};
///
/// struct Nested(Vec<Vec<usize>>);
///
/// impl Hierarchy for Nested {
///     type Node = usize;
///     fn children(&self, node: usize) -> &[usize] {
///         &self.0[node]
///     }
/// }
///
/// struct Collect(Vec<(usize, usize)>);
///
/// impl WalkCallback<usize> for Collect {
///     fn before_children(&mut self, node: usize, depth: usize) -> WalkControl {
///         self.0.push((node, depth));
///         WalkControl::Continue
///     }
/// }
///
/// let tree = Nested(vec![vec![1, 2], vec![3], vec![], vec![]]);
/// let mut collect = Collect(Vec::new());
///
/// assert_eq!(walk(&tree, 0, &mut collect), WalkOutcome::Completed);
/// assert_eq!(collect.0, vec![(0, 0), (1, 1), (3, 2), (2, 1)]);
/// ```
pub fn walk<H, C>(tree: &H, root: H::Node, callback: &mut C) -> WalkOutcome
where
    H: Hierarchy + ?Sized,
    C: WalkCallback<H::Node> + ?Sized,
{
    outcome(visit(tree, root, 0, callback))
}

/// Walks the children of `start` and their descendants, without visiting
/// `start` itself.
///
/// The children of `start` are visited at depth 0 and no `on_descend` is
/// fired for that first level. This is the form to use for trees whose
/// root is a container without content of its own.
pub fn walk_children<H, C>(tree: &H, start: H::Node, callback: &mut C) -> WalkOutcome
where
    H: Hierarchy + ?Sized,
    C: WalkCallback<H::Node> + ?Sized,
{
    outcome(visit_all(tree, tree.children(start), 0, callback))
}

fn outcome(flow: ControlFlow<()>) -> WalkOutcome {
    match flow {
        ControlFlow::Continue(()) => WalkOutcome::Completed,
        ControlFlow::Break(()) => WalkOutcome::Aborted,
    }
}

fn visit_all<H, C>(tree: &H, nodes: &[H::Node], depth: usize, callback: &mut C) -> ControlFlow<()>
where
    H: Hierarchy + ?Sized,
    C: WalkCallback<H::Node> + ?Sized,
{
    for &node in nodes {
        visit(tree, node, depth, callback)?;
    }
    ControlFlow::Continue(())
}

fn visit<H, C>(tree: &H, node: H::Node, depth: usize, callback: &mut C) -> ControlFlow<()>
where
    H: Hierarchy + ?Sized,
    C: WalkCallback<H::Node> + ?Sized,
{
    let flow = match callback.before_children(node, depth) {
        WalkControl::Continue => {
            let children = tree.children(node);
            if children.is_empty() {
                ControlFlow::Continue(())
            } else {
                callback.on_descend();
                let flow = visit_all(tree, children, depth + 1, callback);
                callback.on_ascend();
                flow
            }
        }
        WalkControl::SkipSubtree => ControlFlow::Continue(()),
        WalkControl::Abort => ControlFlow::Break(()),
    };
    // Runs on abort too, so the caller's stacks unwind to their start depth.
    callback.after_children(node);
    flow
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adjacency list: `0` is the root, `children[n]` lists the children of `n`.
    struct Nested(Vec<Vec<usize>>);

    impl Hierarchy for Nested {
        type Node = usize;

        fn children(&self, node: usize) -> &[usize] {
            &self.0[node]
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Before(usize, usize),
        After(usize),
        Down,
        Up,
    }

    struct Recorder<F> {
        events: Vec<Event>,
        decide: F,
    }

    impl<F: FnMut(usize) -> WalkControl> Recorder<F> {
        fn new(decide: F) -> Self {
            Self {
                events: Vec::new(),
                decide,
            }
        }
    }

    impl<F: FnMut(usize) -> WalkControl> WalkCallback<usize> for Recorder<F> {
        fn before_children(&mut self, node: usize, depth: usize) -> WalkControl {
            self.events.push(Event::Before(node, depth));
            (self.decide)(node)
        }

        fn after_children(&mut self, node: usize) {
            self.events.push(Event::After(node));
        }

        fn on_descend(&mut self) {
            self.events.push(Event::Down);
        }

        fn on_ascend(&mut self) {
            self.events.push(Event::Up);
        }
    }

    // 0 -> {1, 2}, 1 -> {3, 4}, 2 -> {5}
    fn sample() -> Nested {
        Nested(vec![vec![1, 2], vec![3, 4], vec![5], vec![], vec![], vec![]])
    }

    fn assert_balanced(events: &[Event]) {
        let mut nodes = Vec::new();
        let mut levels = 0usize;
        for event in events {
            match event {
                Event::Before(node, _) => nodes.push(*node),
                Event::After(node) => assert_eq!(nodes.pop(), Some(*node)),
                Event::Down => levels += 1,
                Event::Up => levels = levels.checked_sub(1).expect("unmatched ascend"),
            }
        }
        assert!(nodes.is_empty(), "unclosed nodes: {:?}", nodes);
        assert_eq!(levels, 0);
    }

    #[test]
    fn walk_visits_root_then_children_in_pre_order() {
        let mut recorder = Recorder::new(|_| WalkControl::Continue);
        let outcome = walk(&sample(), 0, &mut recorder);

        assert_eq!(outcome, WalkOutcome::Completed);
        use Event::*;
        assert_eq!(
            recorder.events,
            vec![
                Before(0, 0),
                Down,
                Before(1, 1),
                Down,
                Before(3, 2),
                After(3),
                Before(4, 2),
                After(4),
                Up,
                After(1),
                Before(2, 1),
                Down,
                Before(5, 2),
                After(5),
                Up,
                After(2),
                Up,
                After(0),
            ]
        );
    }

    #[test]
    fn walk_children_skips_start_and_first_level_notifications() {
        let mut recorder = Recorder::new(|_| WalkControl::Continue);
        walk_children(&sample(), 0, &mut recorder);

        assert_eq!(recorder.events.first(), Some(&Event::Before(1, 0)));
        assert_eq!(recorder.events.last(), Some(&Event::After(2)));
        assert!(!recorder.events.contains(&Event::Before(0, 0)));
        assert_balanced(&recorder.events);
    }

    #[test]
    fn skip_subtree_does_not_enter_children() {
        let mut recorder = Recorder::new(|node| {
            if node == 1 {
                WalkControl::SkipSubtree
            } else {
                WalkControl::Continue
            }
        });
        let outcome = walk_children(&sample(), 0, &mut recorder);

        assert_eq!(outcome, WalkOutcome::Completed);
        assert!(!recorder.events.contains(&Event::Before(3, 1)));
        assert!(!recorder.events.contains(&Event::Before(4, 1)));
        assert!(recorder.events.contains(&Event::After(1)));
        assert!(recorder.events.contains(&Event::Before(5, 1)));
        assert_balanced(&recorder.events);
    }

    #[test]
    fn leaf_with_continue_fires_no_level_change() {
        let tree = Nested(vec![vec![1], vec![]]);
        let mut recorder = Recorder::new(|_| WalkControl::Continue);
        walk_children(&tree, 0, &mut recorder);

        assert_eq!(recorder.events, vec![Event::Before(1, 0), Event::After(1)]);
    }

    #[test]
    fn abort_stops_walk_and_unwinds_pending_levels() {
        let mut recorder = Recorder::new(|node| {
            if node == 3 {
                WalkControl::Abort
            } else {
                WalkControl::Continue
            }
        });
        let outcome = walk(&sample(), 0, &mut recorder);

        assert_eq!(outcome, WalkOutcome::Aborted);
        assert!(!recorder.events.contains(&Event::Before(4, 2)));
        assert!(!recorder.events.contains(&Event::Before(2, 1)));
        assert!(!recorder.events.contains(&Event::Before(5, 2)));
        assert_balanced(&recorder.events);
    }

    #[test]
    fn abort_on_first_level_of_walk_children() {
        let mut recorder = Recorder::new(|_| WalkControl::Abort);
        let outcome = walk_children(&sample(), 0, &mut recorder);

        assert_eq!(outcome, WalkOutcome::Aborted);
        assert_eq!(recorder.events, vec![Event::Before(1, 0), Event::After(1)]);
    }

    #[test]
    fn walk_children_of_leaf_visits_nothing() {
        let mut recorder = Recorder::new(|_| WalkControl::Continue);
        let outcome = walk_children(&sample(), 5, &mut recorder);

        assert_eq!(outcome, WalkOutcome::Completed);
        assert!(recorder.events.is_empty());
    }
}
