// Classical multidimensional scaling (Torgerson).
//
// Double-center the squared distance matrix, take the top two
// eigenpairs of the resulting Gram matrix, and scale the eigenvectors by
// the square roots of their eigenvalues. Unlike iterative stress
// minimization this has no random initialization, so the same distance
// matrix always projects to the same coordinates; each axis's sign is
// additionally pinned so eigensolver sign flips can't vary the layout.

use anyhow::Result;
use nalgebra::{DMatrix, SymmetricEigen};

/// Project a pairwise distance matrix into 2-D.
pub fn project_2d(dist: &[Vec<f64>]) -> Result<Vec<(f64, f64)>> {
    let n = dist.len();
    if n == 0 {
        anyhow::bail!("cannot project an empty distance matrix");
    }
    if dist.iter().any(|row| row.len() != n) {
        anyhow::bail!("distance matrix is not square");
    }
    if n == 1 {
        return Ok(vec![(0.0, 0.0)]);
    }

    // B = -1/2 · J · D² · J with J = I − 11ᵀ/n
    let d2 = DMatrix::from_fn(n, n, |i, j| dist[i][j] * dist[i][j]);
    let j = DMatrix::identity(n, n) - DMatrix::from_element(n, n, 1.0 / n as f64);
    let b = -0.5 * &j * d2 * &j;

    let eigen = SymmetricEigen::new(b);

    // Rank eigenpairs by eigenvalue, largest first
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut axes = Vec::with_capacity(2);
    for &idx in order.iter().take(2) {
        let lambda = eigen.eigenvalues[idx].max(0.0);
        let scale = lambda.sqrt();
        let mut axis: Vec<f64> = eigen
            .eigenvectors
            .column(idx)
            .iter()
            .map(|v| v * scale)
            .collect();

        // Pin the sign: the largest-magnitude coordinate points positive
        let flip = axis
            .iter()
            .cloned()
            .max_by(|a, b| {
                a.abs()
                    .partial_cmp(&b.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|extreme| extreme < 0.0)
            .unwrap_or(false);
        if flip {
            for v in &mut axis {
                *v = -*v;
            }
        }
        axes.push(axis);
    }

    Ok((0..n).map(|i| (axes[0][i], axes[1][i])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec<f64>> {
        // Equilateral triangle with side 1
        vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ]
    }

    fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn repeated_projection_is_identical() {
        let first = project_2d(&triangle()).unwrap();
        let second = project_2d(&triangle()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn recovers_pairwise_distances() {
        let points = project_2d(&triangle()).unwrap();
        for i in 0..3 {
            for j in (i + 1)..3 {
                let d = euclidean(points[i], points[j]);
                assert!((d - 1.0).abs() < 1e-6, "distance {i}-{j} was {d}");
            }
        }
    }

    #[test]
    fn single_point_projects_to_origin() {
        let points = project_2d(&[vec![0.0]]).unwrap();
        assert_eq!(points, vec![(0.0, 0.0)]);
    }

    #[test]
    fn rejects_non_square_input() {
        assert!(project_2d(&[vec![0.0, 1.0]]).is_err());
    }
}
