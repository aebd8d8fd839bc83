use std::fmt;
use std::sync::Arc;

/// Decides whether a menu object may be shown.
///
/// Filters typically consult ambient state the menu tree does not own, such
/// as the rights of the current user. They are evaluated once per node and
/// call; the result must not depend on the traversal in progress.
///
/// Any `Fn(&MenuObject) -> bool` closure that is `Send + Sync` is a filter.
///
/// # Examples
///
/// ```
/// use menu_core::{MenuItem, MenuObject};
///
/// let item = MenuItem::page("admin", "Administration", "admin-page")
///     .with_display_filter(|_: &MenuObject| false);
///
/// assert!(!MenuObject::Item(item).passes_display_filter());
/// ```
pub trait DisplayFilter: Send + Sync {
    /// Returns `true` if `object` may be displayed.
    fn matches(&self, object: &MenuObject) -> bool;
}

impl<F> DisplayFilter for F
where
    F: Fn(&MenuObject) -> bool + Send + Sync,
{
    fn matches(&self, object: &MenuObject) -> bool {
        self(object)
    }
}

/// Shared, optional display filter attached to a menu object.
#[derive(Clone, Default)]
struct FilterSlot(Option<Arc<dyn DisplayFilter>>);

impl FilterSlot {
    fn passes(&self, object: &MenuObject) -> bool {
        self.0.as_ref().map_or(true, |filter| filter.matches(object))
    }

    fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "Some(<filter>)")
        } else {
            write!(f, "None")
        }
    }
}

/// What a menu item points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    /// An application page, identified by its page id.
    Page {
        /// Id of the page rendered when the item is selected.
        page_id: String,
    },
    /// An external link.
    External {
        /// Absolute or relative URL.
        url: String,
    },
}

/// A selectable entry of the menu.
#[derive(Debug, Clone)]
pub struct MenuItem {
    id: String,
    text: String,
    target: MenuTarget,
    filter: FilterSlot,
}

impl MenuItem {
    /// Creates an item pointing to an application page.
    pub fn page(
        id: impl Into<String>,
        text: impl Into<String>,
        page_id: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            text,
            MenuTarget::Page {
                page_id: page_id.into(),
            },
        )
    }

    /// Creates an item pointing to an external URL.
    pub fn external(
        id: impl Into<String>,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::new(id, text, MenuTarget::External { url: url.into() })
    }

    /// Creates an item with an explicit target.
    pub fn new(id: impl Into<String>, text: impl Into<String>, target: MenuTarget) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target,
            filter: FilterSlot::default(),
        }
    }

    /// Attaches a display filter, replacing any previous one.
    pub fn with_display_filter(mut self, filter: impl DisplayFilter + 'static) -> Self {
        self.filter = FilterSlot(Some(Arc::new(filter)));
        self
    }

    /// Returns the unique id of this item.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the item target.
    pub fn target(&self) -> &MenuTarget {
        &self.target
    }

    /// Returns `true` if this item points to an application page.
    pub fn is_page(&self) -> bool {
        matches!(self.target, MenuTarget::Page { .. })
    }

    /// Returns `true` if a display filter is attached.
    pub fn has_display_filter(&self) -> bool {
        self.filter.is_set()
    }
}

/// A visual divider between menu items.
///
/// Separator ids are assigned by the menu tree when the separator is
/// inserted.
#[derive(Debug, Clone, Default)]
pub struct MenuSeparator {
    id: String,
    filter: FilterSlot,
}

impl MenuSeparator {
    /// Creates a separator. The tree assigns its id on insertion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a display filter, replacing any previous one.
    pub fn with_display_filter(mut self, filter: impl DisplayFilter + 'static) -> Self {
        self.filter = FilterSlot(Some(Arc::new(filter)));
        self
    }

    /// Returns the id assigned by the menu tree.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Payload of a menu node.
#[derive(Debug, Clone)]
pub enum MenuObject {
    /// A selectable item.
    Item(MenuItem),
    /// A separator.
    Separator(MenuSeparator),
}

impl MenuObject {
    /// Returns the unique id of the wrapped object.
    pub fn id(&self) -> &str {
        match self {
            Self::Item(item) => item.id(),
            Self::Separator(separator) => separator.id(),
        }
    }

    /// Evaluates the display filter of the wrapped object.
    ///
    /// Objects without a filter always pass.
    pub fn passes_display_filter(&self) -> bool {
        match self {
            Self::Item(item) => item.filter.passes(self),
            Self::Separator(separator) => separator.filter.passes(self),
        }
    }

    /// Returns the wrapped item, if this is not a separator.
    pub fn as_item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator(_) => None,
        }
    }

    /// Returns `true` if this is an item pointing to an application page.
    pub fn is_page_item(&self) -> bool {
        self.as_item().is_some_and(MenuItem::is_page)
    }
}

impl From<MenuItem> for MenuObject {
    fn from(item: MenuItem) -> Self {
        Self::Item(item)
    }
}

impl From<MenuSeparator> for MenuObject {
    fn from(separator: MenuSeparator) -> Self {
        Self::Separator(separator)
    }
}
