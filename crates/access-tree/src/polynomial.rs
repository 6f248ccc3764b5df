//! Random polynomials with a fixed constant term
//!
//! Shamir sharing of `s` for a flat (t, n) structure: pick
//! f(X) = s + a_1 X + ... + a_{t-1} X^{t-1} and hand party `i` the value f(i).

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::field::FieldElement;

/// Polynomial of exact degree `d` with f(0) fixed by the caller.
///
/// Holds secret coefficients; `Debug` does not print them.
#[derive(Clone)]
pub struct RandomPolynomial<S: FieldElement> {
    /// [a_0 = f(0), a_1, ..., a_d]
    coefficients: Vec<S>,
}

impl<S: FieldElement> RandomPolynomial<S> {
    /// Sample the non-constant coefficients uniformly, resampling the leading
    /// one until it is nonzero. A degree 0 polynomial is the constant
    /// `zero_value`.
    pub fn new<R: RngCore + CryptoRng>(degree: usize, zero_value: S, rng: &mut R) -> Self {
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(zero_value);

        for _ in 1..degree {
            coefficients.push(S::random(rng));
        }

        if degree > 0 {
            let leading = loop {
                let candidate = S::random(rng);
                if !candidate.is_zero() {
                    break candidate;
                }
            };
            coefficients.push(leading);
        }

        Self { coefficients }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn coefficients(&self) -> &[S] {
        &self.coefficients
    }

    /// f(x) by Horner's method
    pub fn evaluate(&self, x: &S) -> S {
        let mut result = S::zero();
        for coeff in self.coefficients.iter().rev() {
            result = result.mul(x);
            result = result.add(coeff);
        }
        result
    }

    #[inline]
    pub fn evaluate_at(&self, index: u32) -> S {
        self.evaluate(&S::from_u64(index as u64))
    }

    /// Shares f(1), ..., f(n) tagged with their index
    pub fn shares(&self, n: u32) -> Vec<(u32, S)> {
        (1..=n).map(|i| (i, self.evaluate_at(i))).collect()
    }
}

impl<S: FieldElement + Zeroize> Zeroize for RandomPolynomial<S> {
    fn zeroize(&mut self) {
        self.coefficients.iter_mut().for_each(Zeroize::zeroize);
    }
}

impl<S: FieldElement> core::fmt::Debug for RandomPolynomial<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RandomPolynomial")
            .field("degree", &self.degree())
            .field("coefficients", &"[REDACTED]")
            .finish()
    }
}
