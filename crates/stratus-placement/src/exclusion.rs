//! Normalized cluster exclusion set.

use std::collections::BTreeSet;

/// Canonical form of a cluster identifier: trimmed, ASCII-lowercased.
pub(crate) fn normalize(cluster_id: &str) -> String {
    cluster_id.trim().to_ascii_lowercase()
}

/// Clusters a placement attempt must avoid.
///
/// Identifiers are normalized on both insert and lookup, so provider-side
/// case or whitespace differences never defeat the collision check. Within
/// one fleet run the set only grows: seeded optionally from the group's
/// pre-existing clusters, then extended with each placed account's cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    clusters: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cluster; returns whether it was newly added.
    pub fn insert(&mut self, cluster_id: &str) -> bool {
        self.clusters.insert(normalize(cluster_id))
    }

    pub fn contains(&self, cluster_id: &str) -> bool {
        self.clusters.contains(&normalize(cluster_id))
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Normalized cluster identifiers, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.clusters.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for cluster in iter {
            set.insert(cluster.as_ref());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains_normalize() {
        let mut set = ExclusionSet::new();
        assert!(set.insert(" BL3Prod001 "));
        assert!(set.contains("bl3prod001"));
        assert!(set.contains("BL3PROD001"));
        assert!(set.contains("  bl3prod001  "));
        assert!(!set.contains("bl3prod002"));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut set = ExclusionSet::new();
        assert!(set.insert("c1"));
        assert!(!set.insert("C1"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn from_iterator_collects_distinct_normalized() {
        let set: ExclusionSet = ["c1", "C1", "c2"].into_iter().collect();
        assert_eq!(set.len(), 2);
        let clusters: Vec<&str> = set.iter().collect();
        assert_eq!(clusters, vec!["c1", "c2"]);
    }

    #[test]
    fn starts_empty() {
        let set = ExclusionSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
