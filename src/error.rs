use std::fmt;

/// Error returned when a menu operation is called with invalid input.
///
/// Every `MenuError` is a caller error: a missing or duplicate id, or a
/// reference to a node that does not exist. Internal consistency failures
/// inside the walker or renderer are never reported through this type.
///
/// # Examples
///
/// ```
/// use menu_core::{MenuError, MenuErrorKind};
///
/// let error = MenuError::new(MenuErrorKind::UnknownParent, "admin");
/// assert_eq!(error.kind(), MenuErrorKind::UnknownParent);
/// assert_eq!(error.id(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuError {
    kind: MenuErrorKind,
    id: String,
}

impl MenuError {
    /// Creates a new error for the given menu object id.
    pub fn new(kind: MenuErrorKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> MenuErrorKind {
        self.kind
    }

    /// Returns the id the failing operation was called with.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu error ({}): '{}'", self.kind, self.id)
    }
}

impl std::error::Error for MenuError {}

/// Kind of menu error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuErrorKind {
    /// A menu object id was empty.
    EmptyId,
    /// A menu object with the same id is already part of the tree.
    DuplicateId,
    /// The parent id of a new menu object does not exist.
    UnknownParent,
    /// A start node or lookup id does not exist.
    UnknownNode,
}

impl fmt::Display for MenuErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "empty id"),
            Self::DuplicateId => write!(f, "duplicate id"),
            Self::UnknownParent => write!(f, "no such parent menu item"),
            Self::UnknownNode => write!(f, "no such menu node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_kind_and_id() {
        let error = MenuError::new(MenuErrorKind::DuplicateId, "home");
        assert_eq!(error.to_string(), "menu error (duplicate id): 'home'");
    }

    #[test]
    fn empty_id_error_displays_empty_quotes() {
        let error = MenuError::new(MenuErrorKind::EmptyId, "");
        assert_eq!(error.to_string(), "menu error (empty id): ''");
    }
}
