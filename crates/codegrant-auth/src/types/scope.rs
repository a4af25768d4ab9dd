//! Scopes and scope sets.
//!
//! A [`Scope`] is a named unit of delegated permission. The registry of valid
//! scopes lives in storage; the authorization endpoint resolves the names in
//! a request's `scope` parameter into a [`ScopeSet`] of registered entities.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A registered permission unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Unique scope name as it appears in the `scope` parameter.
    pub name: String,

    /// Description shown to users on consent screens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Scope {
    /// Creates a scope without a description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the scope description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Splits a space-delimited `scope` parameter into distinct scope names.
///
/// Order is irrelevant and duplicates collapse. Returns an empty set for a
/// blank or whitespace-only string.
#[must_use]
pub fn requested_scope_names(scope: &str) -> BTreeSet<&str> {
    scope.split_whitespace().collect()
}

/// A set of resolved scopes, keyed by name.
///
/// Authorization codes own their `ScopeSet`, so later registry changes do not
/// affect codes that were already issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(BTreeMap<String, Scope>);

impl ScopeSet {
    /// Creates an empty scope set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scope; a scope with the same name is replaced.
    pub fn insert(&mut self, scope: Scope) {
        self.0.insert(scope.name.clone(), scope);
    }

    /// Returns `true` if a scope with this name is in the set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the scope with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scope> {
        self.0.get(name)
    }

    /// Number of scopes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates scopes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.0.values()
    }

    /// Iterates scope names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        let mut set = Self::new();
        for scope in iter {
            set.insert(scope);
        }
        set
    }
}

impl fmt::Display for ScopeSet {
    /// Formats the set as a space-delimited `scope` parameter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in self.names() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
