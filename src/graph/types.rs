//! Core types for the module graph.

use std::collections::BTreeSet;
use std::fmt;

/// A unique identifier for a module in a [`Forest`](super::Forest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// A unique identifier for a pin in a [`Forest`](super::Forest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub usize);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Whether a pin consumes or produces a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Take,
    Give,
}

impl Direction {
    /// The direction a connecting pin must have.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Take => Direction::Give,
            Direction::Give => Direction::Take,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Take => write!(f, "take"),
            Direction::Give => write!(f, "give"),
        }
    }
}

/// Upward visibility of a pin.
///
/// A scoped pin is filed into every ancestor named in `ancestors`, and into
/// the parentless top of its tree when `root` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub ancestors: BTreeSet<String>,
    pub root: bool,
}

impl Scope {
    /// Sentinel token selecting the top-level module.
    pub const ROOT: &'static str = "root";

    /// Build a scope from raw tokens.
    pub fn from_tokens<S: AsRef<str>>(tokens: impl IntoIterator<Item = S>) -> Self {
        let mut scope = Scope::default();
        for token in tokens {
            let token = token.as_ref();
            if token == Self::ROOT {
                scope.root = true;
            } else {
                scope.ancestors.insert(token.to_string());
            }
        }
        scope
    }

    /// Check if a pin with this scope is visible in the given ancestor.
    ///
    /// Named ancestors only apply to modules that have a parent; the
    /// parentless top only admits the `root` sentinel.
    pub fn admits(&self, ancestor_name: &str, has_parent: bool) -> bool {
        if has_parent {
            self.ancestors.contains(ancestor_name)
        } else {
            self.root
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.ancestors.iter().map(String::as_str).collect();
        if self.root {
            parts.push(Self::ROOT);
        }
        write!(f, "{}", parts.join(" "))
    }
}
