//! Satisfaction check: does a presented share set satisfy the tree?

use std::collections::BTreeSet;

use crate::error::Result;
use crate::traversal::TreeVisitor;
use crate::tree::{AccessTree, ShareId};

/// Per-node state of the satisfaction fold.
///
/// Once enough children are satisfied the node settles and the driver skips
/// its remaining children. Every value returned by `finish` is the real
/// answer for that subtree.
pub(crate) struct SatisfactionCheck<'a> {
    presented: &'a BTreeSet<ShareId>,
    threshold: usize,
    satisfied_children: usize,
    well_formed: bool,
    satisfied: bool,
}

impl<'a> SatisfactionCheck<'a> {
    pub(crate) fn new(presented: &'a BTreeSet<ShareId>) -> Self {
        Self {
            presented,
            threshold: 0,
            satisfied_children: 0,
            well_formed: true,
            satisfied: false,
        }
    }
}

impl TreeVisitor for SatisfactionCheck<'_> {
    type Output = bool;

    fn visit(&mut self, node: &AccessTree) -> Result<()> {
        match node {
            AccessTree::Leaf { share_id } => {
                self.satisfied = self.presented.contains(share_id);
            }
            AccessTree::Inner {
                threshold,
                children,
            } => {
                self.threshold = *threshold;
                self.well_formed = *threshold >= 1 && *threshold <= children.len();
            }
        }
        Ok(())
    }

    fn child_context(&mut self) -> Result<Self> {
        Ok(Self::new(self.presented))
    }

    fn accept_child_result(&mut self, result: bool) {
        if self.satisfied || !self.well_formed || !result {
            return;
        }
        self.satisfied_children += 1;
        if self.satisfied_children >= self.threshold {
            self.satisfied = true;
        }
    }

    fn finish(self) -> bool {
        self.satisfied
    }

    fn is_settled(&self) -> bool {
        self.satisfied
    }
}
