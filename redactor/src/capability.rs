//! Capability predicates: "does the current caller hold capability X?"
//!
//! A predicate is resolved once per caller (typically from a session) and then
//! consulted inline during traversal, so it must be cheap and must not block.
//! The engine never asks about an empty capability name; such fields are
//! always visible.

use std::collections::HashSet;

/// The caller's granted authority, reduced to a boolean test.
///
/// Closures implement this directly:
///
/// ```rust
/// use redactor::CapabilityPredicate;
///
/// let admin = |capability: &str| capability.starts_with("admin:");
/// assert!(admin.has_capability("admin:read"));
/// assert!(!admin.has_capability("salary:read"));
/// ```
pub trait CapabilityPredicate {
    /// Returns `true` if the caller holds `capability`.
    fn has_capability(&self, capability: &str) -> bool;
}

impl<F> CapabilityPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn has_capability(&self, capability: &str) -> bool {
        self(capability)
    }
}

/// Pins a closure's signature so it can be used as a predicate without
/// annotating the argument type.
pub fn from_fn<F>(predicate: F) -> F
where
    F: Fn(&str) -> bool,
{
    predicate
}

/// Denies every named capability. This is the default predicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenyAll;

impl CapabilityPredicate for DenyAll {
    fn has_capability(&self, _capability: &str) -> bool {
        false
    }
}

/// Grants every capability.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl CapabilityPredicate for AllowAll {
    fn has_capability(&self, _capability: &str) -> bool {
        true
    }
}

/// A pre-resolved set of granted capability names.
///
/// ```rust
/// use redactor::{CapabilityPredicate, CapabilitySet};
///
/// let grants: CapabilitySet = ["contract:read"].into_iter().collect();
/// assert!(grants.has_capability("contract:read"));
/// assert!(!grants.has_capability("salary:read"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: HashSet<String>,
}

impl CapabilitySet {
    /// Creates an empty set, which grants nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `capability` to the set.
    pub fn grant(&mut self, capability: impl Into<String>) {
        self.granted.insert(capability.into());
    }

    /// Builder form of [`CapabilitySet::grant`].
    #[must_use]
    pub fn with(mut self, capability: impl Into<String>) -> Self {
        self.grant(capability);
        self
    }

    /// Returns `true` if `capability` was granted.
    pub fn contains(&self, capability: &str) -> bool {
        self.granted.contains(capability)
    }

    /// Number of granted capabilities.
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    /// Returns `true` if nothing was granted.
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Iterates over the granted capability names in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.granted.iter().map(String::as_str)
    }
}

impl CapabilityPredicate for CapabilitySet {
    fn has_capability(&self, capability: &str) -> bool {
        self.contains(capability)
    }
}

impl<S> FromIterator<S> for CapabilitySet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S> Extend<S> for CapabilitySet
where
    S: Into<String>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.granted.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::{from_fn, AllowAll, CapabilityPredicate, CapabilitySet, DenyAll};

    #[test]
    fn deny_all_is_fail_closed() {
        assert!(!DenyAll.has_capability("pwd:read"));
        assert!(!DenyAll.has_capability("anything"));
    }

    #[test]
    fn allow_all_grants() {
        assert!(AllowAll.has_capability("salary:read"));
    }

    #[test]
    fn closure_predicate() {
        let predicate = from_fn(|capability| capability == "contract:read");
        assert!(predicate.has_capability("contract:read"));
        assert!(!predicate.has_capability("salary:read"));
    }

    #[test]
    fn capability_set_membership() {
        let mut grants = CapabilitySet::new().with("contract:read");
        grants.grant("user:password:read");
        grants.extend(["employment:salary:read"]);

        assert_eq!(grants.len(), 3);
        assert!(grants.has_capability("contract:read"));
        assert!(grants.has_capability("employment:salary:read"));
        assert!(!grants.has_capability("user:DriversLicense:read"));
    }

    #[test]
    fn empty_set_grants_nothing() {
        let grants = CapabilitySet::default();
        assert!(grants.is_empty());
        assert!(!grants.has_capability("pwd:read"));
    }

    #[test]
    fn collect_from_strings() {
        let grants: CapabilitySet = vec![String::from("a"), String::from("b")]
            .into_iter()
            .collect();
        let mut names: Vec<&str> = grants.iter().collect();
        names.sort_unstable();
        assert_eq!(names, ["a", "b"]);
    }
}
