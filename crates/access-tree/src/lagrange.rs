//! Lagrange interpolation coefficients
//!
//! For an index set Q and evaluation point x, the coefficient for i ∈ Q is
//!
//! λ_i(x) = Π_{j ∈ Q, j ≠ i} (x - j) / (i - j)
//!
//! so that Σ λ_i(x) · f(i) = f(x) for every polynomial f of degree < |Q|.
//! At x = 0 this is Shamir reconstruction; with group elements in place of
//! f(i) it combines distributed key shares in the exponent.
//!
//! The batch version uses a common denominator so the whole set costs one
//! field inversion:
//!
//! - ξ = Π_{j ∈ Q} (x - j)
//! - d_i = (x - i) · Π_{j ≠ i} (i - j)
//! - ρ_i = Π_{j ≠ i} d_j, d̄ = Π_i d_i
//! - λ_i = ξ · ρ_i · d̄^{-1}

use crate::error::{Error, Result};
use crate::field::FieldElement;

fn check_indices(indices: &[u32]) -> Result<()> {
    if indices.is_empty() {
        return Err(Error::EmptySet);
    }
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(Error::DuplicateIndex(pair[0]));
        }
    }
    Ok(())
}

/// λ_i(x) for a single index `i` of `indices`.
pub fn lagrange_coefficient<S: FieldElement>(i: u32, indices: &[u32], x: &S) -> Result<S> {
    check_indices(indices)?;
    if !indices.contains(&i) {
        return Err(Error::IndexNotInSet(i));
    }

    let xi = S::from_u64(i as u64);
    let mut numerator = S::one();
    let mut denominator = S::one();
    for &j in indices.iter().filter(|&&j| j != i) {
        let xj = S::from_u64(j as u64);
        numerator = numerator.mul(&x.sub(&xj));
        denominator = denominator.mul(&xi.sub(&xj));
    }

    numerator.div(&denominator).ok_or(Error::DivisionByZero)
}

/// λ_i(x) for every index, in input order.
///
/// O(k²) multiplications and a single inversion.
pub fn lagrange_coefficients<S: FieldElement>(indices: &[u32], x: &S) -> Result<Vec<S>> {
    check_indices(indices)?;
    let k = indices.len();
    let points: Vec<S> = indices.iter().map(|&i| S::from_u64(i as u64)).collect();

    // x is one of the nodes: interpolation is the identity there
    if let Some(hit) = points.iter().position(|p| p == x) {
        // distinct indices may still collide modulo the characteristic,
        // anywhere in the set and not only at x
        for (i, p) in points.iter().enumerate() {
            if points[i + 1..].contains(p) {
                return Err(Error::DivisionByZero);
            }
        }
        let mut unit = vec![S::zero(); k];
        unit[hit] = S::one();
        return Ok(unit);
    }

    // ξ = Π (x - j)
    let xi = points
        .iter()
        .fold(S::one(), |acc, p| acc.mul(&x.sub(p)));

    // d_i = (x - i) · Π_{j ≠ i} (i - j)
    let d_values: Vec<S> = (0..k)
        .map(|i| {
            let mut d = x.sub(&points[i]);
            for (j, p) in points.iter().enumerate() {
                if i != j {
                    d = d.mul(&points[i].sub(p));
                }
            }
            d
        })
        .collect();

    // ρ_i = Π_{j ≠ i} d_j, forward then backward
    let mut rho = vec![S::one(); k];
    for i in 1..k {
        rho[i] = rho[i - 1].mul(&d_values[i - 1]);
    }
    let mut suffix = S::one();
    for i in (0..k).rev() {
        rho[i] = rho[i].mul(&suffix);
        suffix = suffix.mul(&d_values[i]);
    }

    // suffix now holds d̄
    let d_bar_inv = suffix.invert().ok_or(Error::DivisionByZero)?;
    let delta = xi.mul(&d_bar_inv);

    Ok(rho.iter().map(|rho_i| delta.mul(rho_i)).collect())
}

/// Evaluate at `x` the unique polynomial of degree < `points.len()` through
/// `points`.
pub fn interpolate<S: FieldElement>(points: &[(u32, S)], x: &S) -> Result<S> {
    let indices: Vec<u32> = points.iter().map(|(i, _)| *i).collect();
    let coefficients = lagrange_coefficients::<S>(&indices, x)?;
    Ok(coefficients
        .iter()
        .zip(points)
        .fold(S::zero(), |acc, (lambda, (_, y))| acc.add(&lambda.mul(y))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Fp;

    type F = Fp<13>;
    type Big = Fp<2305843009213693951>;

    #[test]
    fn test_lagrange_single() {
        let coeffs = lagrange_coefficients::<F>(&[1], &F::zero()).unwrap();
        assert_eq!(coeffs, vec![F::one()]);
    }

    #[test]
    fn test_lagrange_two_points() {
        // Q = {1, 2} at 0: λ_1 = 2, λ_2 = -1
        let coeffs = lagrange_coefficients::<F>(&[1, 2], &F::zero()).unwrap();
        assert_eq!(coeffs, vec![F::new(2), F::one().neg()]);
    }

    #[test]
    fn test_lagrange_three_points() {
        // Q = {1, 2, 3} at 0: λ = (3, -3, 1)
        let coeffs = lagrange_coefficients::<F>(&[1, 2, 3], &F::zero()).unwrap();
        assert_eq!(coeffs, vec![F::new(3), F::new(3).neg(), F::one()]);
    }

    #[test]
    fn test_single_matches_batch() {
        let indices = [2u32, 5, 7, 11];
        let x = Big::new(3);
        let batch = lagrange_coefficients::<Big>(&indices, &x).unwrap();
        for (pos, &i) in indices.iter().enumerate() {
            assert_eq!(lagrange_coefficient::<Big>(i, &indices, &x).unwrap(), batch[pos]);
        }
    }

    #[test]
    fn test_partition_of_unity() {
        for k in 2..=10u32 {
            let indices: Vec<u32> = (1..=k).collect();
            let coeffs = lagrange_coefficients::<Big>(&indices, &Big::zero()).unwrap();
            let sum = coeffs.iter().fold(Big::zero(), |acc, c| acc.add(c));
            assert_eq!(sum, Big::one(), "k={}", k);
        }
    }

    #[test]
    fn test_interpolate_non_consecutive() {
        // f(x) = 1 + 2x + 3x²: f(1) = 6, f(3) = 34, f(5) = 86
        let points = [(1, Big::new(6)), (3, Big::new(34)), (5, Big::new(86))];
        assert_eq!(interpolate(&points, &Big::zero()).unwrap(), Big::one());
        // f(2) = 17
        assert_eq!(interpolate(&points, &Big::new(2)).unwrap(), Big::new(17));
    }

    #[test]
    fn test_evaluation_point_in_set() {
        let coeffs = lagrange_coefficients::<F>(&[1, 4, 6], &F::new(4)).unwrap();
        assert_eq!(coeffs, vec![F::zero(), F::one(), F::zero()]);
        assert_eq!(lagrange_coefficient::<F>(4, &[1, 4, 6], &F::new(4)).unwrap(), F::one());
        assert_eq!(lagrange_coefficient::<F>(1, &[1, 4, 6], &F::new(4)).unwrap(), F::zero());
    }

    #[test]
    fn test_duplicate_error() {
        assert_eq!(
            lagrange_coefficients::<F>(&[1, 2, 2], &F::zero()),
            Err(Error::DuplicateIndex(2))
        );
        assert_eq!(
            lagrange_coefficient::<F>(1, &[1, 3, 1], &F::zero()),
            Err(Error::DuplicateIndex(1))
        );
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(lagrange_coefficients::<F>(&[], &F::zero()), Err(Error::EmptySet));
        assert_eq!(
            lagrange_coefficient::<F>(4, &[1, 2], &F::zero()),
            Err(Error::IndexNotInSet(4))
        );
    }

    #[test]
    fn test_congruent_indices_divide_by_zero() {
        // 1 ≡ 14 (mod 13)
        assert_eq!(
            lagrange_coefficients::<F>(&[1, 14], &F::zero()),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            lagrange_coefficient::<F>(1, &[1, 14], &F::zero()),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn test_congruent_indices_rejected_when_x_is_a_node() {
        // x = 4 is in the set, 1 and 14 collide elsewhere
        assert_eq!(
            lagrange_coefficients::<F>(&[1, 14, 4], &F::new(4)),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            lagrange_coefficient::<F>(1, &[1, 14, 4], &F::new(4)),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            interpolate(&[(1, F::new(2)), (14, F::new(3)), (4, F::new(5))], &F::new(4)),
            Err(Error::DivisionByZero)
        );
    }
}
