//! Generic fold over an access tree
//!
//! Each algorithm in this crate (satisfaction, minimal subset, span program
//! construction) is a [`TreeVisitor`]: a plain state value that is told about
//! its node, spawns an owned state for every child, folds the children's
//! results back in and finally produces the node's result. The driving loop
//! lives here once.
//!
//! Child state is always a fresh value derived from the parent, never a
//! reference into it, so two traversals of the same tree share nothing.

use crate::error::Result;
use crate::tree::AccessTree;

pub trait TreeVisitor: Sized {
    type Output;

    /// Inspect the node this state belongs to.
    fn visit(&mut self, node: &AccessTree) -> Result<()>;

    /// Produce the state used to traverse the next child's subtree.
    fn child_context(&mut self) -> Result<Self>;

    /// Fold one finished child result into this node's aggregate.
    fn accept_child_result(&mut self, result: Self::Output);

    /// Final result for this node.
    fn finish(self) -> Self::Output;

    /// Once a node reports settled, the driver stops descending into its
    /// remaining children. The node's own result must not depend on them.
    fn is_settled(&self) -> bool {
        false
    }
}

/// Run `visitor` over `node` and its subtree, children in order.
///
/// Recurses once per tree level, so stack use grows with
/// [`AccessTree::depth`]. Trees parsed from text are bounded by
/// [`MAX_NESTING`](crate::policy::MAX_NESTING); trees built by hand are
/// as deep as their builder makes them.
pub fn traverse<V: TreeVisitor>(node: &AccessTree, mut visitor: V) -> Result<V::Output> {
    visitor.visit(node)?;
    for child in node.children() {
        if visitor.is_settled() {
            break;
        }
        let context = visitor.child_context()?;
        let result = traverse(child, context)?;
        visitor.accept_child_result(result);
    }
    Ok(visitor.finish())
}
