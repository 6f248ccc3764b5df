//! Greedy minimal satisfying subset
//!
//! At every gate, keep the `t` satisfied children that needed the fewest
//! leaves. This is locally optimal per gate but not a global minimum: a
//! share reused across subtrees is counted once per use while choosing.
//! [`AccessTree::minimal_satisfying_subset`] removes the repeats from the
//! final answer.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::traversal::TreeVisitor;
use crate::tree::{check_gate, AccessTree, ShareId};

/// (leaves used, leaf ids); `(0, [])` marks an unsatisfied subtree
pub(crate) type SubsetResult = (usize, Vec<ShareId>);

pub(crate) struct MinimalSubset<'a> {
    presented: &'a BTreeSet<ShareId>,
    threshold: usize,
    leaf: Option<ShareId>,
    satisfied_children: Vec<SubsetResult>,
}

impl<'a> MinimalSubset<'a> {
    pub(crate) fn new(presented: &'a BTreeSet<ShareId>) -> Self {
        Self {
            presented,
            threshold: 0,
            leaf: None,
            satisfied_children: Vec::new(),
        }
    }
}

impl TreeVisitor for MinimalSubset<'_> {
    type Output = SubsetResult;

    fn visit(&mut self, node: &AccessTree) -> Result<()> {
        match node {
            AccessTree::Leaf { share_id } => {
                if self.presented.contains(share_id) {
                    self.leaf = Some(*share_id);
                }
            }
            AccessTree::Inner {
                threshold,
                children,
            } => {
                check_gate(*threshold, children.len())?;
                self.threshold = *threshold;
            }
        }
        Ok(())
    }

    fn child_context(&mut self) -> Result<Self> {
        Ok(Self::new(self.presented))
    }

    fn accept_child_result(&mut self, result: SubsetResult) {
        if result.0 > 0 {
            self.satisfied_children.push(result);
        }
    }

    fn finish(mut self) -> SubsetResult {
        if let Some(share_id) = self.leaf {
            return (1, vec![share_id]);
        }
        if self.threshold == 0 || self.satisfied_children.len() < self.threshold {
            return (0, Vec::new());
        }

        // stable: equal counts keep child order
        self.satisfied_children.sort_by_key(|(count, _)| *count);

        let mut count = 0;
        let mut ids = Vec::new();
        for (child_count, child_ids) in self.satisfied_children.into_iter().take(self.threshold) {
            count += child_count;
            ids.extend(child_ids);
        }
        (count, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::traverse;

    fn subset(tree: &AccessTree, ids: &[ShareId]) -> SubsetResult {
        let presented: BTreeSet<ShareId> = ids.iter().copied().collect();
        traverse(tree, MinimalSubset::new(&presented)).unwrap()
    }

    #[test]
    fn test_prefers_cheaper_children() {
        // 1-of( AND(#0, #1, #2), #3 ) -> just #3
        let tree = AccessTree::or(vec![
            AccessTree::and((0..3).map(AccessTree::leaf).collect()).unwrap(),
            AccessTree::leaf(3),
        ])
        .unwrap();
        assert_eq!(subset(&tree, &[0, 1, 2, 3]), (1, vec![3]));
        assert_eq!(subset(&tree, &[0, 1, 2]), (3, vec![0, 1, 2]));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tree = AccessTree::gate(2, (0..4).map(AccessTree::leaf).collect()).unwrap();
        assert_eq!(subset(&tree, &[1, 2, 3]), (2, vec![1, 2]));
    }

    #[test]
    fn test_unsatisfied_is_empty() {
        let tree = AccessTree::gate(3, (0..4).map(AccessTree::leaf).collect()).unwrap();
        assert_eq!(subset(&tree, &[0, 1]), (0, vec![]));
    }

    #[test]
    fn test_threshold_zero_rejected() {
        let tree = AccessTree::Inner {
            threshold: 0,
            children: vec![AccessTree::leaf(0)],
        };
        let presented: BTreeSet<ShareId> = [0].into_iter().collect();
        assert!(traverse(&tree, MinimalSubset::new(&presented)).is_err());
    }

    #[test]
    fn test_nested_mixed() {
        // 2-of( 2-of(#0,#1,#2), 1-of(#3,#4), #5 )
        let tree = AccessTree::gate(
            2,
            vec![
                AccessTree::gate(2, vec![AccessTree::leaf(0), AccessTree::leaf(1), AccessTree::leaf(2)])
                    .unwrap(),
                AccessTree::or(vec![AccessTree::leaf(3), AccessTree::leaf(4)]).unwrap(),
                AccessTree::leaf(5),
            ],
        )
        .unwrap();
        assert_eq!(subset(&tree, &[0, 1, 2, 3, 4, 5]), (2, vec![3, 5]));
        assert_eq!(subset(&tree, &[0, 2, 4]), (3, vec![4, 0, 2]));
    }
}
