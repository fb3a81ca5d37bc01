//! Tait-Bryan rotations and poses (spec.md §3 "Poses and rotations").

use cgmath::{Matrix3, Point3, Vector3};

/// A Tait-Bryan (heading/pitch/roll, Z-Y'-X'' order) rotation, normalised
/// to the canonical `(-pi, pi]` range on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation3D {
    /// yaw, radians
    pub heading: f64,
    /// pitch, radians
    pub pitch: f64,
    /// roll, radians
    pub roll: f64,
}

fn normalize_angle(a: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut x = a % two_pi;
    if x <= -std::f64::consts::PI {
        x += two_pi;
    } else if x > std::f64::consts::PI {
        x -= two_pi;
    }
    x
}

impl Rotation3D {
    /// Builds a rotation, normalising each angle to `(-pi, pi]`.
    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Rotation3D {
            heading: normalize_angle(heading),
            pitch: normalize_angle(pitch),
            roll: normalize_angle(roll),
        }
    }

    /// The identity rotation.
    pub fn identity() -> Self { Rotation3D { heading: 0.0, pitch: 0.0, roll: 0.0 } }

    /// The Z-Y'-X'' rotation matrix `Rz(heading) * Ry(pitch) * Rx(roll)`.
    pub fn matrix(&self) -> Matrix3<f64> {
        let rz = Matrix3::from_angle_z(cgmath::Rad(self.heading));
        let ry = Matrix3::from_angle_y(cgmath::Rad(self.pitch));
        let rx = Matrix3::from_angle_x(cgmath::Rad(self.roll));
        rz * ry * rx
    }
}

/// A position plus orientation in 3-D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose3D {
    /// the position
    pub position: Point3<f64>,
    /// the orientation
    pub rotation: Rotation3D,
}

impl Pose3D {
    /// A pose at the origin with identity rotation.
    pub fn identity() -> Self { Pose3D { position: Point3::new(0.0, 0.0, 0.0), rotation: Rotation3D::identity() } }

    /// The local +x (forward) direction of this pose, in the outer frame.
    pub fn forward(&self) -> Vector3<f64> { self.rotation.matrix() * Vector3::new(1.0, 0.0, 0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_rotation_is_identity_matrix() {
        let r = Rotation3D::identity();
        let m = r.matrix();
        let v = m * Vector3::new(1.0, 0.0, 0.0);
        assert!((v.x - 1.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
        assert!(v.z.abs() < 1e-12);
    }

    #[test]
    fn heading_rotates_forward_in_xy_plane() {
        let r = Rotation3D::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        let fwd = r.matrix() * Vector3::new(1.0, 0.0, 0.0);
        assert!(fwd.x.abs() < 1e-9);
        assert!((fwd.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn angle_normalisation_wraps() {
        let r = Rotation3D::new(3.0 * std::f64::consts::PI, 0.0, 0.0);
        assert!(r.heading.abs() <= std::f64::consts::PI + 1e-9);
    }
}
