//! Monotone span programs
//!
//! A span program is a matrix `M` over a field with one row per leaf of an
//! access tree. A set of leaves is qualified exactly when the unit vector
//! `e0 = (1, 0, ..., 0)` lies in the span of its rows.
//!
//! # Sharing
//!
//! Pick `v = (s, r_1, ..., r_{d-1})` with `r_i` uniformly random. The share of
//! leaf `i` is `<M_i, v>`.
//!
//! # Reconstruction
//!
//! For a qualified set `A`, find coefficients `c` with `Σ_{i∈A} c_i M_i = e0`.
//! Then `Σ c_i <M_i, v> = <e0, v> = s`. Callers holding group elements
//! instead of field shares combine them with the same coefficients in the
//! exponent.
//!
//! # Leaves
//!
//! A program compiled from a [`Policy`] keeps the [`LeafMap`] produced by
//! conversion, so every row can be traced back to the fact it stands for.

mod builder;
mod solve;

use std::collections::{BTreeMap, BTreeSet};

use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::policy::{convert_policy, LeafMap, Policy};
use crate::traversal::traverse;
use crate::tree::{AccessTree, ShareId};

use builder::MatrixBuilder;

/// Span program over `S`, optionally labelled with facts of type `F`
#[derive(Clone, Debug, PartialEq)]
pub struct MonotoneSpanProgram<S: FieldElement, F = ()> {
    /// Rows in leaf order, each shorter row implicitly zero-padded
    rows: Vec<(ShareId, Vec<S>)>,
    /// share id -> position in `rows`
    index: BTreeMap<ShareId, usize>,
    total_columns: usize,
    leaf_map: Option<LeafMap<F>>,
}

impl<S: FieldElement> MonotoneSpanProgram<S> {
    /// Compile `tree` into a span program over `S`.
    ///
    /// Fails with [`Error::MalformedTree`] for an invalid gate, a repeated
    /// share id, or a gate with at least as many children as the field's
    /// characteristic.
    pub fn build(tree: &AccessTree) -> Result<Self> {
        Self::compile(tree, None)
    }
}

impl<S: FieldElement, F> MonotoneSpanProgram<S, F> {
    /// Compile a tree produced by [`convert_policy`] together with its
    /// leaf map.
    ///
    /// Besides the checks of [`build`](MonotoneSpanProgram::build), every
    /// share id of the tree must have a fact in `leaf_map`.
    pub fn with_leaves(tree: &AccessTree, leaf_map: LeafMap<F>) -> Result<Self> {
        let orphan = tree
            .share_ids()
            .into_iter()
            .find(|id| leaf_map.get(*id).is_none());
        if let Some(orphan) = orphan {
            return Err(Error::malformed(format!(
                "share id {} has no fact in the leaf map",
                orphan
            )));
        }
        Self::compile(tree, Some(leaf_map))
    }

    /// Convert `policy` and compile the resulting tree, keeping its leaves.
    pub fn from_policy(policy: &Policy<F>) -> Result<Self>
    where
        F: Clone,
    {
        let (tree, leaf_map) = convert_policy(policy)?;
        Self::with_leaves(&tree, leaf_map)
    }

    fn compile(tree: &AccessTree, leaf_map: Option<LeafMap<F>>) -> Result<Self> {
        let (extra_columns, rows) = traverse(tree, MatrixBuilder::<S>::root())?;
        let total_columns = 1 + extra_columns;

        let mut index = BTreeMap::new();
        for (position, (share_id, row)) in rows.iter().enumerate() {
            debug_assert!(row.len() <= total_columns);
            if index.insert(*share_id, position).is_some() {
                return Err(Error::malformed(format!(
                    "share id {} appears in more than one leaf",
                    share_id
                )));
            }
        }

        debug!(rows = rows.len(), columns = total_columns, "built span program");

        Ok(Self {
            rows,
            index,
            total_columns,
            leaf_map,
        })
    }

    /// Leaf map kept from [`with_leaves`](Self::with_leaves) or
    /// [`from_policy`](Self::from_policy)
    #[inline]
    pub fn leaf_map(&self) -> Option<&LeafMap<F>> {
        self.leaf_map.as_ref()
    }

    /// Fact standing behind `share_id`, if the program carries a leaf map
    pub fn fact(&self, share_id: ShareId) -> Option<&F> {
        self.leaf_map.as_ref()?.get(share_id)
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Width `d` of the matrix, column 0 included
    #[inline]
    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    /// Labelled rows in leaf order, without padding
    #[inline]
    pub fn rows(&self) -> &[(ShareId, Vec<S>)] {
        &self.rows
    }

    pub fn row(&self, share_id: ShareId) -> Option<&[S]> {
        self.index
            .get(&share_id)
            .map(|&position| self.rows[position].1.as_slice())
    }

    /// Row for `share_id` padded to `total_columns`
    pub fn padded_row(&self, share_id: ShareId) -> Option<Vec<S>> {
        self.row(share_id).map(|row| self.pad(row))
    }

    pub fn share_ids(&self) -> impl Iterator<Item = ShareId> + '_ {
        self.rows.iter().map(|(share_id, _)| *share_id)
    }

    fn pad(&self, row: &[S]) -> Vec<S> {
        let mut padded = Vec::with_capacity(self.total_columns);
        padded.extend_from_slice(row);
        padded.resize(self.total_columns, S::zero());
        padded
    }

    /// Split `secret` into one share per leaf.
    pub fn share_with_rng<R: RngCore + CryptoRng>(
        &self,
        secret: S,
        rng: &mut R,
    ) -> BTreeMap<ShareId, S> {
        let mut v = Vec::with_capacity(self.total_columns);
        v.push(secret);
        v.extend((1..self.total_columns).map(|_| S::random(rng)));

        self.rows
            .iter()
            .map(|(share_id, row)| {
                // missing trailing entries are zero and contribute nothing
                let share = row
                    .iter()
                    .zip(&v)
                    .fold(S::zero(), |acc, (m, x)| acc.add(&m.mul(x)));
                (*share_id, share)
            })
            .collect()
    }

    /// [`share_with_rng`](Self::share_with_rng) using the OS rng
    #[cfg(feature = "std")]
    pub fn share(&self, secret: S) -> BTreeMap<ShareId, S> {
        self.share_with_rng(secret, &mut rand_core::OsRng)
    }

    /// Coefficients `c` with `Σ c_i M_i = e0` over the rows of `qualified`.
    ///
    /// Share ids that do not label a row are ignored. Zero coefficients are
    /// left out of the result. Fails with [`Error::NoSatisfyingSet`] when the
    /// rows do not span `e0`, i.e. the set is not qualified.
    pub fn solving_vector(&self, qualified: &BTreeSet<ShareId>) -> Result<BTreeMap<ShareId, S>> {
        let selected: Vec<(ShareId, &[S])> = qualified
            .iter()
            .filter_map(|id| self.row(*id).map(|row| (*id, row)))
            .collect();

        // transpose: one equation per column, one unknown per selected row
        let system: Vec<Vec<S>> = (0..self.total_columns)
            .map(|col| {
                selected
                    .iter()
                    .map(|(_, row)| row.get(col).cloned().unwrap_or_else(S::zero))
                    .collect()
            })
            .collect();

        let mut target = vec![S::zero(); self.total_columns];
        target[0] = S::one();

        let Some(coefficients) = solve::solve(system, target) else {
            debug!(rows = selected.len(), "share set does not span the secret column");
            return Err(Error::NoSatisfyingSet);
        };

        let vector: BTreeMap<ShareId, S> = selected
            .iter()
            .zip(coefficients)
            .filter(|(_, c)| !c.is_zero())
            .map(|((share_id, _), c)| (*share_id, c))
            .collect();

        debug!(
            rows = selected.len(),
            used = vector.len(),
            "computed solving vector"
        );
        Ok(vector)
    }

    /// Recover the secret from field-valued shares of a qualified set.
    pub fn reconstruct(&self, shares: &BTreeMap<ShareId, S>) -> Result<S> {
        let ids: BTreeSet<ShareId> = shares.keys().copied().collect();
        let vector = self.solving_vector(&ids)?;
        Ok(vector.iter().fold(S::zero(), |acc, (share_id, c)| {
            // every id in the vector came from `shares`
            match shares.get(share_id) {
                Some(share) => acc.add(&c.mul(share)),
                None => acc,
            }
        }))
    }
}
