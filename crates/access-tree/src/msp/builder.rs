//! Compile an access tree into span program rows
//!
//! Column 0 carries the secret. A gate with threshold `t` over `n` children
//! hands child `k` (1-indexed) the parent's prefix extended with the
//! Vandermonde powers `k, k^2, ..., k^(t-1)`, so any `t` children can
//! interpolate the parent's value and fewer cannot. Each child subtree then
//! claims its own fresh columns; later siblings are shifted past them with
//! zero padding so unrelated subtrees never share randomness.
//!
//! Rows are returned up the fold and collected at the root.

use tracing::trace;

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::traversal::TreeVisitor;
use crate::tree::{check_gate, AccessTree, ShareId};

/// Labelled matrix rows, shortest-prefix form (implicitly zero-padded)
pub(crate) type Rows<S> = Vec<(ShareId, Vec<S>)>;

pub(crate) struct MatrixBuilder<S: FieldElement> {
    prefix: Vec<S>,
    threshold: usize,
    leaf: Option<ShareId>,
    /// columns already claimed by earlier children's subtrees
    own_offset: usize,
    /// position of the next child as a field element
    counter: S,
    rows: Rows<S>,
}

impl<S: FieldElement> MatrixBuilder<S> {
    /// State for the root: a single secret column
    pub(crate) fn root() -> Self {
        Self::with_prefix(vec![S::one()])
    }

    fn with_prefix(prefix: Vec<S>) -> Self {
        Self {
            prefix,
            threshold: 0,
            leaf: None,
            own_offset: 0,
            counter: S::zero(),
            rows: Vec::new(),
        }
    }
}

impl<S: FieldElement> TreeVisitor for MatrixBuilder<S> {
    /// (extra columns introduced by this subtree, its rows)
    type Output = (usize, Rows<S>);

    fn visit(&mut self, node: &AccessTree) -> Result<()> {
        match node {
            AccessTree::Leaf { share_id } => self.leaf = Some(*share_id),
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
        if self.threshold == 0 {
            return Err(Error::malformed("gate with threshold 0 has children"));
        }

        self.counter = self.counter.add(&S::one());
        if self.counter.is_zero() {
            return Err(Error::malformed(
                "gate fan-out reaches the field characteristic",
            ));
        }

        let mut prefix = Vec::with_capacity(self.prefix.len() + self.threshold - 1 + self.own_offset);
        prefix.extend_from_slice(&self.prefix);

        // counter^1 .. counter^(t-1)
        let mut value = S::one();
        for _ in 1..self.threshold {
            value = value.mul(&self.counter);
            prefix.push(value.clone());
        }

        prefix.extend(core::iter::repeat(S::zero()).take(self.own_offset));

        Ok(Self::with_prefix(prefix))
    }

    fn accept_child_result(&mut self, (columns_used, rows): (usize, Rows<S>)) {
        self.own_offset += columns_used;
        self.rows.extend(rows);
    }

    fn finish(self) -> (usize, Rows<S>) {
        if let Some(share_id) = self.leaf {
            trace!(share_id, row = ?self.prefix, "span program row");
            return (0, vec![(share_id, self.prefix)]);
        }
        (self.own_offset + self.threshold - 1, self.rows)
    }
}
