//! Field inclusion and its composition rule.

/// Whether a field is present in the schema or pruned by an embedding filter.
///
/// Excluded fields are still populated during indexing but are invisible to
/// query DSL lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInclusion {
    /// The field is part of the schema.
    Included,
    /// The field was pruned by an enclosing embedding filter.
    Excluded,
}

impl FieldInclusion {
    /// Composes this inclusion with a child's declared inclusion.
    ///
    /// The result is `Included` only when both operands are `Included`: once an
    /// ancestor is excluded, every descendant is excluded too. This is the
    /// single rule used everywhere inclusion propagates down a subtree.
    #[must_use]
    pub fn compose(self, child: FieldInclusion) -> FieldInclusion {
        match (self, child) {
            (FieldInclusion::Included, FieldInclusion::Included) => FieldInclusion::Included,
            _ => FieldInclusion::Excluded,
        }
    }

    /// Returns true for [`FieldInclusion::Included`].
    pub fn is_included(self) -> bool {
        matches!(self, FieldInclusion::Included)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldInclusion::{Excluded, Included};

    #[test]
    fn test_compose_included_only_when_both_included() {
        assert_eq!(Included.compose(Included), Included);
        assert_eq!(Included.compose(Excluded), Excluded);
        assert_eq!(Excluded.compose(Included), Excluded);
        assert_eq!(Excluded.compose(Excluded), Excluded);
    }

    #[test]
    fn test_excluded_ancestor_wins() {
        // An excluded ancestor makes any child exclusion irrelevant.
        for child in [Included, Excluded] {
            assert_eq!(Excluded.compose(child), Excluded);
        }
    }

    #[test]
    fn test_is_included() {
        assert!(Included.is_included());
        assert!(!Excluded.is_included());
    }
}
