use crate::common::{
    clip::{landmark, LandmarkFrame},
    types::ConversionProfile,
};
use crate::error::RetargetError;
use nalgebra as na;
use retarget_utils::vector::{Matrix3f, Vector3f};

const COLLINEARITY_EPS: f32 = 1e-6;

/// The four landmarks a frame's body basis is estimated from
#[derive(Clone, Debug)]
pub struct AnchorJoints {
    pub shoulder_r: String,
    pub shoulder_l: String,
    pub hip_r: String,
    pub hip_l: String,
}

impl Default for AnchorJoints {
    fn default() -> Self {
        Self {
            shoulder_r: "shoulder01.R".to_owned(),
            shoulder_l: "shoulder01.L".to_owned(),
            hip_r: "upperleg01.R".to_owned(),
            hip_l: "upperleg01.L".to_owned(),
        }
    }
}

/// Per-frame body orientation and center estimated from shoulders and hips.
///
/// The basis rows (X lateral, Y forward, Z vertical) are converted to the
/// target convention but not normalized; treat the matrix as
/// orientation-carrying only.
#[derive(Clone, Debug)]
pub struct FrameGeometry {
    pub basis: Matrix3f,
    pub body_center: Vector3f,
}

impl FrameGeometry {
    /// Estimates the basis and body center for one frame.
    ///
    /// # Errors
    /// `MissingAnchor` when one of the four anchor landmarks is absent,
    /// `DegenerateBasis` when lateral and vertical axes are near collinear.
    /// Both are per-frame conditions; callers hold the previous root
    /// transform for that frame.
    pub fn estimate(frame: &LandmarkFrame, anchors: &AnchorJoints, profile: ConversionProfile) -> Result<Self, RetargetError> {
        let anchor = |joint: &str| {
            landmark(frame, joint).ok_or_else(|| RetargetError::MissingAnchor { joint: joint.to_owned() })
        };
        let shoulder_r = anchor(&anchors.shoulder_r)?;
        let shoulder_l = anchor(&anchors.shoulder_l)?;
        let hip_r = anchor(&anchors.hip_r)?;
        let hip_l = anchor(&anchors.hip_l)?;

        let shoulder_mid = (shoulder_r + shoulder_l) / 2.0;
        let hip_mid = (hip_r + hip_l) / 2.0;

        let base_x = (shoulder_l + hip_l) / 2.0 - (shoulder_r + hip_r) / 2.0;
        let base_z = shoulder_mid - hip_mid;
        let base_y = base_x.cross(&base_z);
        if base_y.norm() <= COLLINEARITY_EPS * base_x.norm() * base_z.norm() || base_y.norm() == 0.0 {
            return Err(RetargetError::DegenerateBasis);
        }

        let basis = Matrix3f::from_rows(&[
            profile.convert(&base_x).transpose(),
            profile.convert(&base_y).transpose(),
            profile.convert(&base_z).transpose(),
        ]);
        let body_center = profile.convert(&((shoulder_mid + hip_mid) / 2.0));
        Ok(Self { basis, body_center })
    }

    /// XYZ Euler angles of the basis with the roll component zeroed.
    ///
    /// Shoulder/hip noise makes roll unreliable, so only yaw and pitch are
    /// trusted: the lateral and vertical axes are orthonormalized into a
    /// proper rotation, decomposed, and the X component dropped.
    pub fn rotation_euler(&self) -> Vector3f {
        let lateral: Vector3f = self.basis.row(0).transpose();
        let vertical: Vector3f = self.basis.row(2).transpose();

        let z_n = vertical.normalize();
        let x_n = (lateral - z_n * lateral.dot(&z_n)).normalize();
        let y_n = z_n.cross(&x_n);
        let rot = na::Rotation3::from_matrix_unchecked(Matrix3f::from_columns(&[x_n, y_n, z_n]));
        let (_roll, pitch, yaw) = rot.euler_angles();
        Vector3f::new(0.0, pitch, yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn frame_of(entries: &[(&str, [f32; 3])]) -> LandmarkFrame {
        entries.iter().map(|(j, p)| ((*j).to_owned(), *p)).collect()
    }

    fn upright_frame() -> LandmarkFrame {
        frame_of(&[
            ("shoulder01.R", [-0.2, 0.0, 0.0]),
            ("shoulder01.L", [0.2, 0.0, 0.0]),
            ("upperleg01.R", [-0.15, 0.5, 0.0]),
            ("upperleg01.L", [0.15, 0.5, 0.0]),
        ])
    }

    #[test]
    fn body_center_is_converted_midpoint() {
        let geom = FrameGeometry::estimate(&upright_frame(), &AnchorJoints::default(), ConversionProfile::OpenPose).unwrap();
        // Source midpoint is (0, 0.25, 0); OpenPose maps (x, y, z) -> (x, z/4, -y)
        assert_relative_eq!(geom.body_center.x, 0.0);
        assert_relative_eq!(geom.body_center.y, 0.0);
        assert_relative_eq!(geom.body_center.z, -0.25);
    }

    #[test]
    fn missing_anchor_is_reported() {
        let mut frame = upright_frame();
        frame.remove("upperleg01.L");
        let result = FrameGeometry::estimate(&frame, &AnchorJoints::default(), ConversionProfile::OpenPose);
        assert!(matches!(result, Err(RetargetError::MissingAnchor { joint }) if joint == "upperleg01.L"));
    }

    #[test]
    fn collinear_axes_are_degenerate() {
        // Shoulders and hips all on one vertical line
        let frame = frame_of(&[
            ("shoulder01.R", [0.0, 0.0, 0.0]),
            ("shoulder01.L", [0.0, 0.1, 0.0]),
            ("upperleg01.R", [0.0, 0.5, 0.0]),
            ("upperleg01.L", [0.0, 0.6, 0.0]),
        ]);
        let result = FrameGeometry::estimate(&frame, &AnchorJoints::default(), ConversionProfile::OpenPose);
        assert!(matches!(result, Err(RetargetError::DegenerateBasis)));
    }

    #[test]
    fn roll_component_is_always_zero() {
        // Tilt the shoulder line out of the lateral plane so the raw basis
        // carries roll; the emitted Euler must still have none
        let frame = frame_of(&[
            ("shoulder01.R", [-0.2, -0.05, 0.1]),
            ("shoulder01.L", [0.2, 0.07, -0.08]),
            ("upperleg01.R", [-0.15, 0.5, 0.02]),
            ("upperleg01.L", [0.15, 0.52, -0.03]),
        ]);
        let geom = FrameGeometry::estimate(&frame, &AnchorJoints::default(), ConversionProfile::OpenPose).unwrap();
        let euler = geom.rotation_euler();
        assert_relative_eq!(euler.x, 0.0);
    }

    #[test]
    fn upright_body_has_level_euler() {
        // Godot source convention has +y up, so shoulders sit above hips
        let frame = frame_of(&[
            ("shoulder01.R", [-0.2, 0.5, 0.0]),
            ("shoulder01.L", [0.2, 0.5, 0.0]),
            ("upperleg01.R", [-0.15, 0.0, 0.0]),
            ("upperleg01.L", [0.15, 0.0, 0.0]),
        ]);
        let geom = FrameGeometry::estimate(&frame, &AnchorJoints::default(), ConversionProfile::Godot).unwrap();
        let euler = geom.rotation_euler();
        // Godot-converted upright frame: lateral ends up along -X, so the
        // yaw is a half turn, but pitch and roll stay flat
        assert_relative_eq!(euler.x, 0.0);
        assert_relative_eq!(euler.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(euler.z.abs(), std::f32::consts::PI, epsilon = 1e-5);
    }
}
