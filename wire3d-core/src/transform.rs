/// 3D transformation matrices and their composition order
use nalgebra::{Matrix4, Vector3};

/// Coordinate axis for a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Map a script axis character. Anything outside `x`, `y`, `z` is rejected.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Transform builder for 3D transformations
///
/// Every constructor returns a fresh homogeneous matrix; nothing is mutated
/// in place. The accumulated transform is threaded through [`Transform::compose`].
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f64> {
        Matrix4::identity()
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Right-handed rotation of `theta` radians about `axis`
    pub fn rotation_matrix(axis: Axis, theta: f64) -> Matrix4<f64> {
        let axisangle = match axis {
            Axis::X => Vector3::new(theta, 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, theta, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, theta),
        };
        Matrix4::new_rotation(axisangle)
    }

    /// Left-multiply `new` onto `existing`.
    ///
    /// Points are later multiplied on the right of the result, so transforms
    /// act on geometry in the order they were composed: composing a scale and
    /// then a translation scales first and translates second.
    pub fn compose(new: &Matrix4<f64>, existing: &Matrix4<f64>) -> Matrix4<f64> {
        new * existing
    }
}
