//! Gauss-Jordan elimination over a field

use crate::field::FieldElement;

/// Solve `a · x = b` where `a` has `b.len()` rows of equal length.
///
/// Returns one solution with every free variable set to zero, or `None`
/// when the system is inconsistent.
pub(crate) fn solve<S: FieldElement>(mut a: Vec<Vec<S>>, mut b: Vec<S>) -> Option<Vec<S>> {
    let rows = a.len();
    debug_assert_eq!(rows, b.len());
    let cols = a.first().map_or(0, Vec::len);

    let mut pivot_cols = Vec::with_capacity(rows.min(cols));
    let mut r = 0;

    for c in 0..cols {
        if r == rows {
            break;
        }
        let Some(p) = (r..rows).find(|&i| !a[i][c].is_zero()) else {
            continue;
        };
        a.swap(r, p);
        b.swap(r, p);

        // pivot is nonzero, so it inverts
        let inv = a[r][c].invert()?;
        for x in a[r][c..].iter_mut() {
            *x = x.mul(&inv);
        }
        b[r] = b[r].mul(&inv);

        for i in 0..rows {
            if i == r || a[i][c].is_zero() {
                continue;
            }
            let factor = a[i][c].clone();
            for j in c..cols {
                let t = a[r][j].mul(&factor);
                a[i][j] = a[i][j].sub(&t);
            }
            let t = b[r].mul(&factor);
            b[i] = b[i].sub(&t);
        }

        pivot_cols.push(c);
        r += 1;
    }

    // rows below the last pivot are zero on the left; their right side must be too
    if b[r..].iter().any(|v| !v.is_zero()) {
        return None;
    }

    let mut x = vec![S::zero(); cols];
    for (row, &col) in pivot_cols.iter().enumerate() {
        x[col] = b[row].clone();
    }
    Some(x)
}
