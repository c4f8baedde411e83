use retarget_utils::vector::Vector3f;

/// Orientation (XYZ Euler, radians) plus translation of a scene object.
///
/// The character root owns one of these; landmark visuals reuse the type
/// with a zero rotation. The Euler roll component is always zero for the
/// root, see [`crate::retarget::geometry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootTransform {
    pub rotation_euler: Vector3f,
    pub translation: Vector3f,
}

impl RootTransform {
    pub fn identity() -> Self {
        Self {
            rotation_euler: Vector3f::zeros(),
            translation: Vector3f::zeros(),
        }
    }

    pub fn from_translation(translation: Vector3f) -> Self {
        Self {
            rotation_euler: Vector3f::zeros(),
            translation,
        }
    }
}

impl Default for RootTransform {
    fn default() -> Self {
        Self::identity()
    }
}
