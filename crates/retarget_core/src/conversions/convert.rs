use crate::common::types::ConversionProfile;
use retarget_utils::vector::Vector3f;

// The MediaPipe depth axis is over-scaled relative to the image-plane
// axes, so it is dampened on conversion
const OPENPOSE_DEPTH_DAMPING: f32 = 4.0;

impl ConversionProfile {
    /// Maps a position from the source system's axis convention into the
    /// target system's (X right, Y depth, Z up). Pure and total.
    pub fn convert(&self, v: &Vector3f) -> Vector3f {
        match self {
            Self::Godot => Vector3f::new(-v.x, v.z, v.y),
            Self::OpenPose => Vector3f::new(v.x, v.z / OPENPOSE_DEPTH_DAMPING, -v.y),
        }
    }

    /// Inverse of [`ConversionProfile::convert`]
    pub fn invert(&self, v: &Vector3f) -> Vector3f {
        match self {
            Self::Godot => Vector3f::new(-v.x, v.z, v.y),
            Self::OpenPose => Vector3f::new(v.x, -v.z, v.y * OPENPOSE_DEPTH_DAMPING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn roundtrip(profile: ConversionProfile, v: Vector3f) {
        let back = profile.invert(&profile.convert(&v));
        assert_relative_eq!(back.x, v.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, v.y, epsilon = 1e-6);
        assert_relative_eq!(back.z, v.z, epsilon = 1e-6);
        let forth = profile.convert(&profile.invert(&v));
        assert_relative_eq!(forth.x, v.x, epsilon = 1e-6);
        assert_relative_eq!(forth.y, v.y, epsilon = 1e-6);
        assert_relative_eq!(forth.z, v.z, epsilon = 1e-6);
    }

    #[test]
    fn profiles_invert_cleanly() {
        for profile in [ConversionProfile::Godot, ConversionProfile::OpenPose] {
            roundtrip(profile, Vector3f::new(1.0, 2.0, 3.0));
            roundtrip(profile, Vector3f::new(-0.25, 0.0, 17.5));
            roundtrip(profile, Vector3f::zeros());
        }
    }

    #[test]
    fn godot_swaps_and_mirrors() {
        let out = ConversionProfile::Godot.convert(&Vector3f::new(1.0, 2.0, 3.0));
        assert_relative_eq!(out.x, -1.0);
        assert_relative_eq!(out.y, 3.0);
        assert_relative_eq!(out.z, 2.0);
    }

    #[test]
    fn openpose_dampens_depth() {
        let out = ConversionProfile::OpenPose.convert(&Vector3f::new(0.0, 0.0, 8.0));
        assert_relative_eq!(out.y, 2.0);
    }
}
