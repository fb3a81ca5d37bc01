//! A small symmetric-eigenvalue solver used to determine the span dimension
//! of a point cloud (spec.md §3 invariant 7: a polyhedron outline's vertices
//! must be coplanar within tolerance and must not be collinear-only, i.e.
//! span dimension >= 2).
//!
//! Full SVD is overkill for 3x3; we diagonalise the (symmetric, positive
//! semi-definite) covariance matrix of the centred point set with the
//! classic cyclic Jacobi eigenvalue algorithm and count eigenvalues above
//! tolerance.

use cgmath::{InnerSpace, Matrix3, Point3, Vector3};

/// Eigenvalues (ascending) and eigenvectors (as columns, matching order) of
/// a symmetric 3x3 matrix, computed by the cyclic Jacobi method.
pub fn jacobi_eigen_symmetric3(m: Matrix3<f64>) -> ([f64; 3], Matrix3<f64>) {
    let mut a = m;
    let mut v = Matrix3::from_scale(1.0);
    for _ in 0..50 {
        let (mut p, mut q, mut max_off) = (0usize, 1usize, 0.0f64);
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            let val = a[j][i].abs();
            if val > max_off {
                max_off = val;
                p = i;
                q = j;
            }
        }
        if max_off < 1e-14 {
            break;
        }
        let theta = (a[q][q] - a[p][p]) / (2.0 * a[q][p]);
        let t = theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt());
        let c = 1.0 / (1.0 + t * t).sqrt();
        let s = t * c;
        let app = a[p][p];
        let aqq = a[q][q];
        let apq = a[q][p];
        a[p][p] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
        a[q][q] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
        a[q][p] = 0.0;
        a[p][q] = 0.0;
        for k in 0..3 {
            if k != p && k != q {
                let akp = a[p][k];
                let akq = a[q][k];
                a[p][k] = c * akp - s * akq;
                a[k][p] = a[p][k];
                a[q][k] = s * akp + c * akq;
                a[k][q] = a[q][k];
            }
        }
        for k in 0..3 {
            let vkp = v[p][k];
            let vkq = v[q][k];
            v[p][k] = c * vkp - s * vkq;
            v[q][k] = s * vkp + c * vkq;
        }
    }
    ([a[0][0], a[1][1], a[2][2]], v)
}

/// The covariance matrix of `points` about their centroid.
pub fn covariance(points: &[Point3<f64>]) -> Matrix3<f64> {
    if points.is_empty() {
        return Matrix3::from_scale(0.0);
    }
    let centroid: Vector3<f64> =
        points.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.to_vec_local())
            / points.len() as f64;
    let mut cov = Matrix3::from_scale(0.0);
    for p in points {
        let d = p.to_vec_local() - centroid;
        cov.x.x += d.x * d.x;
        cov.x.y += d.x * d.y;
        cov.x.z += d.x * d.z;
        cov.y.x += d.y * d.x;
        cov.y.y += d.y * d.y;
        cov.y.z += d.y * d.z;
        cov.z.x += d.z * d.x;
        cov.z.y += d.z * d.y;
        cov.z.z += d.z * d.z;
    }
    cov
}

trait ToVecLocal {
    fn to_vec_local(&self) -> Vector3<f64>;
}
impl ToVecLocal for Point3<f64> {
    fn to_vec_local(&self) -> Vector3<f64> { Vector3::new(self.x, self.y, self.z) }
}

/// The number of eigenvalues of `points`' covariance matrix exceeding
/// `tol * tol`, i.e. the dimension of the affine subspace the points span,
/// within `tol`. Returns 0 for an (near-)empty/degenerate set, 1 for
/// collinear, 2 for coplanar-but-not-collinear, 3 otherwise.
pub fn span_dimension(points: &[Point3<f64>], tol: f64) -> usize {
    if points.len() < 2 {
        return 0;
    }
    let cov = covariance(points);
    let (eigs, _) = jacobi_eigen_symmetric3(cov);
    let threshold = tol * tol * points.len() as f64;
    eigs.iter().filter(|&&e| e > threshold).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_have_span_one() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(span_dimension(&pts, 1e-7), 1);
    }

    #[test]
    fn coplanar_points_have_span_two() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(span_dimension(&pts, 1e-7), 2);
    }

    #[test]
    fn non_planar_points_have_span_three() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(span_dimension(&pts, 1e-7), 3);
    }
}
