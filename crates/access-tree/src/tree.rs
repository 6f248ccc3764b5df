//! Threshold access trees
//!
//! An access tree is a monotone boolean formula built from threshold gates.
//! Leaves name shares by a dense integer id; an inner node with threshold `t`
//! is satisfied when at least `t` of its children are.
//!
//! ```text
//!            2-of
//!           /    \
//!        1-of     #2        (#0 OR #1) AND #2
//!        /  \
//!      #0    #1
//! ```
//!
//! Trees are immutable once built. Children order is significant: it fixes
//! the column layout of the span program compiled from the tree.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::satisfaction::SatisfactionCheck;
use crate::subset::MinimalSubset;
use crate::traversal::traverse;

/// Identifies a leaf, and externally the fact that must be presented for it
pub type ShareId = usize;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessTree {
    Leaf {
        share_id: ShareId,
    },
    Inner {
        threshold: usize,
        children: Vec<AccessTree>,
    },
}

impl AccessTree {
    #[inline]
    pub fn leaf(share_id: ShareId) -> Self {
        Self::Leaf { share_id }
    }

    /// Threshold gate over `children`, checking `1 <= threshold <= children`
    pub fn gate(threshold: usize, children: Vec<AccessTree>) -> Result<Self> {
        check_gate(threshold, children.len())?;
        Ok(Self::Inner {
            threshold,
            children,
        })
    }

    /// All children must be satisfied
    pub fn and(children: Vec<AccessTree>) -> Result<Self> {
        Self::gate(children.len(), children)
    }

    /// Any single child suffices
    pub fn or(children: Vec<AccessTree>) -> Result<Self> {
        Self::gate(1, children)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Gate threshold, definitionally 0 for a leaf
    #[inline]
    pub fn threshold(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Inner { threshold, .. } => *threshold,
        }
    }

    #[inline]
    pub fn children(&self) -> &[AccessTree] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Inner { children, .. } => children,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Inner { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Leaf share ids in pre-order, left to right
    pub fn share_ids(&self) -> Vec<ShareId> {
        let mut ids = Vec::with_capacity(self.leaf_count());
        self.collect_share_ids(&mut ids);
        ids
    }

    fn collect_share_ids(&self, out: &mut Vec<ShareId>) {
        match self {
            Self::Leaf { share_id } => out.push(*share_id),
            Self::Inner { children, .. } => {
                for child in children {
                    child.collect_share_ids(out);
                }
            }
        }
    }

    /// Check every gate satisfies `1 <= threshold <= children`
    pub fn validate(&self) -> Result<()> {
        if let Self::Inner {
            threshold,
            children,
        } = self
        {
            check_gate(*threshold, children.len())?;
            for child in children {
                child.validate()?;
            }
        }
        Ok(())
    }

    /// Does presenting `shares` satisfy this tree?
    ///
    /// A malformed gate is never satisfied; use [`validate`](Self::validate)
    /// to tell the two apart.
    pub fn is_satisfied_by(&self, shares: &BTreeSet<ShareId>) -> bool {
        // the satisfaction fold has no failure path
        traverse(self, SatisfactionCheck::new(shares)).unwrap_or(false)
    }

    /// Greedy small subset of `shares` that still satisfies the tree
    ///
    /// Returns the number of distinct shares used and their ids, or `None`
    /// when `shares` does not satisfy the tree. A share id labelling several
    /// leaves is listed and counted once. Not guaranteed to be a minimum.
    pub fn minimal_satisfying_subset(
        &self,
        shares: &BTreeSet<ShareId>,
    ) -> Result<Option<(usize, Vec<ShareId>)>> {
        let (count, mut ids) = traverse(self, MinimalSubset::new(shares))?;
        if count == 0 {
            return Ok(None);
        }
        let mut seen = BTreeSet::new();
        ids.retain(|id| seen.insert(*id));
        Ok(Some((ids.len(), ids)))
    }
}

pub(crate) fn check_gate(threshold: usize, children: usize) -> Result<()> {
    if threshold == 0 {
        return Err(Error::malformed(format!(
            "gate over {} children has threshold 0",
            children
        )));
    }
    if threshold > children {
        return Err(Error::malformed(format!(
            "threshold {} exceeds {} children",
            threshold, children
        )));
    }
    Ok(())
}

impl fmt::Display for AccessTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { share_id } => write!(f, "#{}", share_id),
            Self::Inner {
                threshold,
                children,
            } => {
                write!(f, "{}-of(", threshold)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (#0 OR #1) AND #2
    fn and_of_or() -> AccessTree {
        AccessTree::and(vec![
            AccessTree::or(vec![AccessTree::leaf(0), AccessTree::leaf(1)]).unwrap(),
            AccessTree::leaf(2),
        ])
        .unwrap()
    }

    fn set(ids: &[ShareId]) -> BTreeSet<ShareId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_constructors_validate_gates() {
        assert!(AccessTree::gate(0, vec![AccessTree::leaf(0)]).is_err());
        assert!(AccessTree::gate(3, vec![AccessTree::leaf(0), AccessTree::leaf(1)]).is_err());
        assert!(AccessTree::and(vec![]).is_err());
        assert!(AccessTree::or(vec![]).is_err());
        assert!(AccessTree::gate(2, vec![AccessTree::leaf(0), AccessTree::leaf(1)]).is_ok());
    }

    #[test]
    fn test_validate_nested() {
        assert!(and_of_or().validate().is_ok());

        let bad = AccessTree::Inner {
            threshold: 1,
            children: vec![AccessTree::Inner {
                threshold: 0,
                children: vec![AccessTree::leaf(0)],
            }],
        };
        assert!(matches!(bad.validate(), Err(Error::MalformedTree { .. })));

        let childless = AccessTree::Inner {
            threshold: 1,
            children: vec![],
        };
        assert!(childless.validate().is_err());
    }

    #[test]
    fn test_shape_queries() {
        let tree = and_of_or();
        assert_eq!(tree.threshold(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.share_ids(), vec![0, 1, 2]);
        assert!(!tree.is_leaf());
        assert_eq!(AccessTree::leaf(4).threshold(), 0);
        assert!(AccessTree::leaf(4).children().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(and_of_or().to_string(), "2-of(1-of(#0, #1), #2)");
    }

    #[test]
    fn test_and_of_or_satisfaction() {
        let tree = and_of_or();
        assert!(tree.is_satisfied_by(&set(&[0, 2])));
        assert!(tree.is_satisfied_by(&set(&[1, 2])));
        assert!(tree.is_satisfied_by(&set(&[0, 1, 2])));
        assert!(!tree.is_satisfied_by(&set(&[0, 1])));
        assert!(!tree.is_satisfied_by(&set(&[2])));
        assert!(!tree.is_satisfied_by(&set(&[])));
    }

    #[test]
    fn test_and_of_or_minimal_subset() {
        let tree = and_of_or();
        let (count, ids) = tree
            .minimal_satisfying_subset(&set(&[0, 1, 2]))
            .unwrap()
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&2));
        assert!(ids.contains(&0) ^ ids.contains(&1));

        assert_eq!(tree.minimal_satisfying_subset(&set(&[0, 1])).unwrap(), None);
    }

    #[test]
    fn test_malformed_gate_never_satisfied() {
        let bad = AccessTree::Inner {
            threshold: 0,
            children: vec![AccessTree::leaf(0)],
        };
        assert!(!bad.is_satisfied_by(&set(&[0])));
        assert!(bad.minimal_satisfying_subset(&set(&[0])).is_err());
    }

    #[test]
    fn test_repeated_share_id_counted_once() {
        // (#0 or #1) and (#0 or #2): both gates pick #0
        let tree = AccessTree::and(vec![
            AccessTree::or(vec![AccessTree::leaf(0), AccessTree::leaf(1)]).unwrap(),
            AccessTree::or(vec![AccessTree::leaf(0), AccessTree::leaf(2)]).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            tree.minimal_satisfying_subset(&set(&[0, 1, 2])).unwrap(),
            Some((1, vec![0]))
        );
        assert!(tree.is_satisfied_by(&set(&[0])));
    }
}
