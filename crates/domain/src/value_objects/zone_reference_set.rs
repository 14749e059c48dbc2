//! Known toll-zone labels and the membership test

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, MatchKind};

/// How a label matched the reference set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneMatch {
    /// The trimmed label equals a member
    Exact(String),
    /// A member occurs inside the trimmed label
    Partial(String),
}

impl ZoneMatch {
    /// The reference member that matched
    #[must_use]
    pub fn member(&self) -> &str {
        match self {
            Self::Exact(m) | Self::Partial(m) => m,
        }
    }
}

/// Immutable set of normalized toll-zone labels
///
/// Members are trimmed, non-empty and case-sensitive. Membership is an exact
/// comparison first, then a containment check of every member against the
/// label. An empty set never matches.
#[derive(Debug, Clone, Default)]
pub struct ZoneReferenceSet {
    members: HashSet<String>,
    ordered: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl ZoneReferenceSet {
    /// A set with no members
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the set from raw labels, trimming and dropping blanks and duplicates
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = HashSet::new();
        let mut ordered = Vec::new();
        for label in labels {
            let trimmed = label.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if members.insert(trimmed.to_string()) {
                ordered.push(trimmed.to_string());
            }
        }

        // Falls back to a linear scan if the automaton cannot be built.
        let matcher = if ordered.is_empty() {
            None
        } else {
            AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&ordered)
                .ok()
        };

        Self {
            members,
            ordered,
            matcher,
        }
    }

    /// Number of distinct members
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True when nothing was loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Members in load order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Whether a resolved label denotes a toll zone
    #[must_use]
    pub fn is_in_zone(&self, label: &str) -> bool {
        self.find_match(label).is_some()
    }

    /// Membership test that also reports which member matched
    #[must_use]
    pub fn find_match(&self, label: &str) -> Option<ZoneMatch> {
        if self.is_empty() {
            return None;
        }
        let label = label.trim();
        if self.members.contains(label) {
            return Some(ZoneMatch::Exact(label.to_string()));
        }

        let partial = match &self.matcher {
            Some(matcher) => matcher
                .find(label)
                .and_then(|m| self.ordered.get(m.pattern().as_usize())),
            None => self.ordered.iter().find(|member| label.contains(member.as_str())),
        };
        partial.map(|member| ZoneMatch::Partial(member.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(labels: &[&str]) -> ZoneReferenceSet {
        ZoneReferenceSet::from_labels(labels.iter().copied())
    }

    #[test]
    fn exact_match() {
        let zones = set(&["Sunset Plaza, Gate 2"]);
        assert_eq!(
            zones.find_match("Sunset Plaza, Gate 2"),
            Some(ZoneMatch::Exact("Sunset Plaza, Gate 2".to_string()))
        );
    }

    #[test]
    fn substring_fallback() {
        let zones = set(&["Sunset Plaza"]);
        assert!(zones.is_in_zone("Sunset Plaza, Gate 2"));
        assert_eq!(
            zones.find_match("Sunset Plaza, Gate 2"),
            Some(ZoneMatch::Partial("Sunset Plaza".to_string()))
        );
    }

    #[test]
    fn label_is_trimmed_before_matching() {
        let zones = set(&["Plaza A"]);
        assert_eq!(
            zones.find_match("   Plaza A \n"),
            Some(ZoneMatch::Exact("Plaza A".to_string()))
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let zones = set(&["Plaza A"]);
        assert!(!zones.is_in_zone("plaza a"));
    }

    #[test]
    fn label_shorter_than_member_does_not_match() {
        let zones = set(&["Sunset Plaza, Gate 2"]);
        assert!(!zones.is_in_zone("Sunset Plaza"));
    }

    #[test]
    fn empty_set_never_matches() {
        let zones = ZoneReferenceSet::empty();
        assert!(!zones.is_in_zone("anything"));
        assert!(!zones.is_in_zone(""));
    }

    #[test]
    fn blank_members_are_dropped() {
        let zones = set(&["", "   ", "Plaza A"]);
        assert_eq!(zones.len(), 1);
        assert!(!zones.is_in_zone("Highway 9"));
    }

    #[test]
    fn members_are_trimmed_and_deduplicated() {
        let zones = set(&[" Plaza A ", "Plaza A", "Plaza B"]);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones.iter().collect::<Vec<_>>(), vec!["Plaza A", "Plaza B"]);
    }

    #[test]
    fn empty_label_is_not_in_non_empty_set() {
        let zones = set(&["Plaza A"]);
        assert!(!zones.is_in_zone("   "));
    }

    proptest! {
        #[test]
        fn any_member_matches_any_label_containing_it(
            prefix in "[a-z ]{0,10}",
            member in "[A-Z][a-z]{2,8}",
            suffix in "[a-z ,0-9]{0,10}",
        ) {
            let zones = ZoneReferenceSet::from_labels([member.as_str()]);
            let label = format!("{prefix}{member}{suffix}");
            prop_assert!(zones.is_in_zone(&label));
        }

        #[test]
        fn empty_set_rejects_everything(label in ".*") {
            prop_assert!(!ZoneReferenceSet::empty().is_in_zone(&label));
        }
    }
}
