//! Policies and their conversion into access trees
//!
//! Schemes describe who may decrypt as a [`Policy`] over their own fact type
//! (attribute names, party identifiers, ...). [`convert_policy`] turns it
//! into an [`AccessTree`] with dense share ids and returns the [`LeafMap`]
//! recording which fact each id stands for.
//!
//! Share ids are assigned in pre-order, left to right, which is also the
//! order the span program builder visits leaves.

mod parser;

pub use parser::MAX_NESTING;

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::tree::{check_gate, AccessTree, ShareId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOp {
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy<F> {
    Fact(F),
    Threshold {
        threshold: usize,
        children: Vec<Policy<F>>,
    },
    Boolean {
        op: BooleanOp,
        children: Vec<Policy<F>>,
    },
    /// Not monotone, so never convertible. Kept so parsers can report it.
    Not(Box<Policy<F>>),
}

impl<F> Policy<F> {
    pub fn and(children: Vec<Policy<F>>) -> Self {
        Self::Boolean {
            op: BooleanOp::And,
            children,
        }
    }

    pub fn or(children: Vec<Policy<F>>) -> Self {
        Self::Boolean {
            op: BooleanOp::Or,
            children,
        }
    }

    pub fn threshold(threshold: usize, children: Vec<Policy<F>>) -> Self {
        Self::Threshold {
            threshold,
            children,
        }
    }
}

/// share id -> fact, dense in `[0, len)`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafMap<F> {
    facts: Vec<F>,
}

impl<F> LeafMap<F> {
    fn new() -> Self {
        Self { facts: Vec::new() }
    }

    fn assign(&mut self, fact: F) -> ShareId {
        self.facts.push(fact);
        self.facts.len() - 1
    }

    #[inline]
    pub fn get(&self, share_id: ShareId) -> Option<&F> {
        self.facts.get(share_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShareId, &F)> {
        self.facts.iter().enumerate()
    }
}

impl<F: PartialEq> LeafMap<F> {
    /// Every leaf standing for `fact`; a fact may occur more than once
    pub fn share_ids_of(&self, fact: &F) -> Vec<ShareId> {
        self.iter()
            .filter(|(_, f)| *f == fact)
            .map(|(share_id, _)| share_id)
            .collect()
    }

    /// Share set unlocked by presenting `facts`
    pub fn share_ids_for<'a, I>(&self, facts: I) -> BTreeSet<ShareId>
    where
        I: IntoIterator<Item = &'a F>,
        F: 'a,
    {
        let presented: Vec<&F> = facts.into_iter().collect();
        self.iter()
            .filter(|(_, f)| presented.contains(f))
            .map(|(share_id, _)| share_id)
            .collect()
    }
}

/// Build the access tree for `policy`, assigning share ids in pre-order.
pub fn convert_policy<F: Clone>(policy: &Policy<F>) -> Result<(AccessTree, LeafMap<F>)> {
    let mut leaf_map = LeafMap::new();
    let tree = convert_node(policy, &mut leaf_map)?;
    debug!(leaves = leaf_map.len(), depth = tree.depth(), "converted policy");
    Ok((tree, leaf_map))
}

fn convert_node<F: Clone>(policy: &Policy<F>, leaf_map: &mut LeafMap<F>) -> Result<AccessTree> {
    match policy {
        Policy::Fact(fact) => Ok(AccessTree::leaf(leaf_map.assign(fact.clone()))),
        Policy::Threshold {
            threshold,
            children,
        } => gate(*threshold, children, leaf_map),
        Policy::Boolean {
            op: BooleanOp::And,
            children,
        } => gate(children.len(), children, leaf_map),
        Policy::Boolean {
            op: BooleanOp::Or,
            children,
        } => gate(1, children, leaf_map),
        Policy::Not(_) => Err(Error::UnsupportedPolicyKind("negation")),
    }
}

fn gate<F: Clone>(
    threshold: usize,
    children: &[Policy<F>],
    leaf_map: &mut LeafMap<F>,
) -> Result<AccessTree> {
    check_gate(threshold, children.len())?;
    let children = children
        .iter()
        .map(|child| convert_node(child, leaf_map))
        .collect::<Result<Vec<_>>>()?;
    Ok(AccessTree::Inner {
        threshold,
        children,
    })
}

impl<F: fmt::Display> fmt::Display for Policy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn nested<F: fmt::Display>(p: &Policy<F>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match p {
                Policy::Fact(_) | Policy::Threshold { .. } | Policy::Not(_) => write!(f, "{}", p),
                Policy::Boolean { .. } => write!(f, "({})", p),
            }
        }

        match self {
            Policy::Fact(fact) => write!(f, "{}", fact),
            Policy::Threshold {
                threshold,
                children,
            } => {
                write!(f, "{} of (", threshold)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Policy::Boolean { op, children } => {
                let sep = match op {
                    BooleanOp::And => " and ",
                    BooleanOp::Or => " or ",
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    nested(child, f)?;
                }
                Ok(())
            }
            Policy::Not(inner) => {
                write!(f, "not ")?;
                nested(inner, f)
            }
        }
    }
}
