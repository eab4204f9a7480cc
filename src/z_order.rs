use crate::math::{Real, Vector};
use num::float::FloatCore;
use std::cmp::Ordering;

/// Reorders `data` so that its `i`-th element becomes `data[permutation[i]]`.
pub fn apply_permutation<T: Clone>(permutation: &[usize], data: &[T]) -> Vec<T> {
    permutation.iter().map(|i| data[*i].clone()).collect()
}

/// The permutation sorting `points` along a Morton curve.
///
/// Every coordinate must be non-negative for the order to be spatially coherent.
pub fn compute_points_z_order(points: &[Vector<Real>]) -> Vec<usize> {
    let mut indices: Vec<_> = (0..points.len()).collect();
    indices.sort_by(|i, j| {
        z_order_floats(points[*i].as_slice(), points[*j].as_slice()).unwrap_or(Ordering::Equal)
    });
    indices
}

// Fast construction of k-Nearest Neighbor Graphs for Point Clouds
// Michael Connor, Piyush Kumar
// Algorithm 1
//
// http://compgeom.com/~piyush/papers/tvcg_stann.pdf
fn z_order_floats(p1: &[Real], p2: &[Real]) -> Option<Ordering> {
    debug_assert_eq!(p1.len(), p2.len());
    let mut x = i16::MIN;
    let mut dim = 0;

    for (j, (a, b)) in p1.iter().zip(p2.iter()).enumerate() {
        let y = xor_msb_float(*a, *b);
        if x < y {
            x = y;
            dim = j;
        }
    }

    p1[dim].partial_cmp(&p2[dim])
}

// Position of the most significant bit differing between `a` and `b`.
fn xor_msb_float(a: Real, b: Real) -> i16 {
    if a == b {
        return i16::MIN;
    }

    let (mantissa1, exponent1, _) = FloatCore::integer_decode(a as f64);
    let (mantissa2, exponent2, _) = FloatCore::integer_decode(b as f64);

    if exponent1 == exponent2 {
        exponent1 + msdb(mantissa1, mantissa2)
    } else {
        exponent1.max(exponent2) + 53
    }
}

fn msdb(x: u64, y: u64) -> i16 {
    64i16 - (x ^ y).leading_zeros() as i16
}

#[cfg(test)]
mod test {
    use super::{apply_permutation, compute_points_z_order};
    use crate::math::Vector;

    #[test]
    fn morton_order_of_a_unit_cube() {
        let points = [
            Vector::new(1.0, 1.0, 1.0),
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(0.0, 0.0, 1.0),
            Vector::new(1.0, 0.0, 0.0),
        ];

        let perm = compute_points_z_order(&points);
        let sorted = apply_permutation(&perm, &points);

        assert_eq!(sorted[0], Vector::new(0.0, 0.0, 0.0));
        assert_eq!(sorted[3], Vector::new(1.0, 1.0, 1.0));
    }
}
