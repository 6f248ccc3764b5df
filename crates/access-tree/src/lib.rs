//! Monotone secret sharing over threshold access trees
//!
//! An [`AccessTree`] describes which sets of parties may jointly recover a
//! secret: leaves carry share ids, inner nodes are t-of-n gates. The crate
//! compiles such a tree into a [`MonotoneSpanProgram`] that splits a field
//! secret into one share per leaf and, for any qualified set, computes the
//! coefficients that recombine those shares into the secret.
//!
//! # Pieces
//!
//! - [`convert_policy`]: AND/OR/threshold policies over arbitrary facts into
//!   trees with dense share ids, plus a small textual policy language
//! - [`AccessTree::is_satisfied_by`] and
//!   [`AccessTree::minimal_satisfying_subset`]: qualification checks without
//!   any algebra
//! - [`MonotoneSpanProgram`]: matrix construction, sharing, solving vectors
//! - [`lagrange_coefficients`] and [`RandomPolynomial`]: flat (t, n) Shamir
//!   sharing
//!
//! All tree walks share one driver, [`traverse`], parametrised by a
//! [`TreeVisitor`].
//!
//! # Field Backends
//!
//! - [`Fp`]: prime fields of up to 64 bits, mostly for tests
//! - `ristretto255` (default): `curve25519_dalek::Scalar`
//!
//! # Example
//!
//! ```
//! use std::collections::{BTreeMap, BTreeSet};
//! use access_tree::{convert_policy, Fp, MonotoneSpanProgram, Policy};
//!
//! type F = Fp<2305843009213693951>;
//!
//! let policy: Policy<String> = "(alice or bob) and carol".parse().unwrap();
//! let (tree, leaves) = convert_policy(&policy).unwrap();
//!
//! let held = leaves.share_ids_for(&["bob".to_string(), "carol".to_string()]);
//! assert!(tree.is_satisfied_by(&held));
//!
//! let msp = MonotoneSpanProgram::<F>::build(&tree).unwrap();
//! let shares = msp.share(F::new(42));
//! let subset: BTreeMap<_, _> = held.iter().map(|id| (*id, shares[id])).collect();
//! assert_eq!(msp.reconstruct(&subset).unwrap(), F::new(42));
//! ```

mod error;
pub mod field;
mod lagrange;
pub mod msp;
pub mod policy;
mod polynomial;
mod satisfaction;
mod subset;
pub mod traversal;
pub mod tree;

pub use error::{Error, Result};
pub use field::{FieldElement, Fp};
pub use lagrange::{interpolate, lagrange_coefficient, lagrange_coefficients};
pub use msp::MonotoneSpanProgram;
pub use policy::{convert_policy, BooleanOp, LeafMap, Policy};
pub use polynomial::RandomPolynomial;
pub use traversal::{traverse, TreeVisitor};
pub use tree::{AccessTree, ShareId};
