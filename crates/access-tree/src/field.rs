//! Finite field abstraction
//!
//! Every algorithm in this crate is generic over [`FieldElement`], so the
//! same access tree can drive share generation over whichever scalar field
//! the calling scheme works in:
//! - [`Fp`]: prime field with a compile-time modulus
//! - ristretto255 scalars (feature `ristretto255`)

use core::fmt::{self, Debug, Display};

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Scalar field element trait
///
/// Implementations must be pure values: no operation may observe or mutate
/// shared state, which is what lets trees and span programs be read from many
/// threads at once.
pub trait FieldElement: Clone + Debug + Sized + PartialEq + Send + Sync {
    /// The additive identity
    fn zero() -> Self;

    /// The multiplicative identity
    fn one() -> Self;

    /// Embed an integer (reduced modulo the characteristic)
    fn from_u64(v: u64) -> Self;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn mul(&self, other: &Self) -> Self;

    fn neg(&self) -> Self;

    /// Multiplicative inverse, `None` for zero
    fn invert(&self) -> Option<Self>;

    /// Division, `None` when `other` is zero
    fn div(&self, other: &Self) -> Option<Self> {
        other.invert().map(|inv| self.mul(&inv))
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Uniformly random element
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self;
}

// ============================================================================
// Prime field with compile-time modulus
// ============================================================================

/// Element of `Z_P` for a prime `P < 2^63`.
///
/// `P` is not checked for primality; inversion uses Fermat's little theorem
/// and is only correct for prime moduli.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Zeroize)]
pub struct Fp<const P: u64>(u64);

impl<const P: u64> Fp<P> {
    pub const MODULUS: u64 = P;

    pub fn new(value: u64) -> Self {
        Self(value % P)
    }

    /// Canonical representative in `[0, P)`
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    fn pow(&self, mut exp: u64) -> Self {
        let mut base = *self;
        let mut acc = Self(1 % P);
        while exp > 0 {
            if exp & 1 == 1 {
                acc = FieldElement::mul(&acc, &base);
            }
            base = FieldElement::mul(&base, &base);
            exp >>= 1;
        }
        acc
    }
}

impl<const P: u64> FieldElement for Fp<P> {
    fn zero() -> Self {
        Self(0)
    }

    fn one() -> Self {
        Self(1 % P)
    }

    fn from_u64(v: u64) -> Self {
        Self::new(v)
    }

    fn add(&self, other: &Self) -> Self {
        Self(((self.0 as u128 + other.0 as u128) % P as u128) as u64)
    }

    fn sub(&self, other: &Self) -> Self {
        Self(((self.0 as u128 + P as u128 - other.0 as u128) % P as u128) as u64)
    }

    fn mul(&self, other: &Self) -> Self {
        Self(((self.0 as u128 * other.0 as u128) % P as u128) as u64)
    }

    fn neg(&self) -> Self {
        if self.0 == 0 {
            *self
        } else {
            Self(P - self.0)
        }
    }

    fn invert(&self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        Some(self.pow(P - 2))
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        // rejection sampling keeps the distribution uniform
        let zone = (u64::MAX / P) * P;
        loop {
            let v = rng.next_u64();
            if v < zone {
                return Self(v % P);
            }
        }
    }
}

impl<const P: u64> From<u64> for Fp<P> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const P: u64> Debug for Fp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.0, P)
    }
}

impl<const P: u64> Display for Fp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ristretto255 scalars
// ============================================================================

#[cfg(feature = "ristretto255")]
mod ristretto {
    use super::*;
    use curve25519_dalek::scalar::Scalar;

    impl FieldElement for Scalar {
        fn zero() -> Self {
            Scalar::ZERO
        }

        fn one() -> Self {
            Scalar::ONE
        }

        fn from_u64(v: u64) -> Self {
            Scalar::from(v)
        }

        fn add(&self, other: &Self) -> Self {
            self + other
        }

        fn sub(&self, other: &Self) -> Self {
            self - other
        }

        fn mul(&self, other: &Self) -> Self {
            self * other
        }

        fn neg(&self) -> Self {
            -self
        }

        fn invert(&self) -> Option<Self> {
            if *self == Scalar::ZERO {
                return None;
            }
            Some(Scalar::invert(self))
        }

        fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
            Scalar::random(rng)
        }
    }
}
