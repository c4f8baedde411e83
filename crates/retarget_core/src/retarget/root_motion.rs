use crate::common::root_transform::RootTransform;
use crate::error::RetargetError;
use retarget_utils::vector::Vector3f;

/// Integrates per-frame body centers into an absolute character root
/// translation, carrying state across clip boundaries so concatenated
/// clips never teleport the character.
///
/// All translations within a clip are relative to the body center of the
/// clip's first frame (the baseline primed by the session), scaled by the
/// configured distance factor, and offset by the root transform the
/// previous clip ended on.
#[derive(Debug)]
pub struct RootMotionIntegrator {
    previous_root: RootTransform,
    start_anchor: Option<Vector3f>,
    distance_factor: f32,
}

impl RootMotionIntegrator {
    pub fn new(distance_factor: f32) -> Self {
        Self {
            previous_root: RootTransform::identity(),
            start_anchor: None,
            distance_factor,
        }
    }

    /// Establishes the clip baseline from the first estimated body center;
    /// later calls within the same clip are ignored
    pub fn prime(&mut self, body_center: Vector3f) {
        if self.start_anchor.is_none() {
            self.start_anchor = Some(body_center);
        }
    }

    pub fn is_primed(&self) -> bool {
        self.start_anchor.is_some()
    }

    /// Body-center displacement since the clip baseline, in world units.
    ///
    /// # Errors
    /// `UninitializedBaseline` when called before [`Self::prime`]; the
    /// session state machine makes this unreachable, the check guards
    /// against producing garbage translations if it is ever bypassed.
    pub fn relative_translation(&self, body_center: &Vector3f) -> Result<Vector3f, RetargetError> {
        let anchor = self.start_anchor.ok_or(RetargetError::UninitializedBaseline)?;
        Ok((body_center - anchor) * self.distance_factor)
    }

    /// Absolute translation for keyframing
    pub fn absolute_translation(&self, relative: &Vector3f) -> Vector3f {
        self.previous_root.translation + relative
    }

    pub fn previous_root(&self) -> &RootTransform {
        &self.previous_root
    }

    /// Snapshots the live root transform at the end of a clip so the next
    /// clip continues from it, and clears the baseline for re-priming
    pub fn end_clip(&mut self, live_root: &RootTransform) {
        self.previous_root = *live_root;
        self.start_anchor = None;
    }

    pub fn reset(&mut self) {
        self.previous_root = RootTransform::identity();
        self.start_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relative_translation_before_priming_is_fatal() {
        let integrator = RootMotionIntegrator::new(20.0);
        let result = integrator.relative_translation(&Vector3f::zeros());
        assert!(matches!(result, Err(RetargetError::UninitializedBaseline)));
    }

    #[test]
    fn relative_translation_scales_displacement() {
        let mut integrator = RootMotionIntegrator::new(20.0);
        integrator.prime(Vector3f::new(0.5, 0.0, 0.0));
        let rel = integrator.relative_translation(&Vector3f::new(0.6, 0.0, -0.05)).unwrap();
        assert_relative_eq!(rel.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(rel.y, 0.0);
        assert_relative_eq!(rel.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn priming_twice_keeps_first_baseline() {
        let mut integrator = RootMotionIntegrator::new(1.0);
        integrator.prime(Vector3f::zeros());
        integrator.prime(Vector3f::new(5.0, 5.0, 5.0));
        let rel = integrator.relative_translation(&Vector3f::new(1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(rel.x, 1.0);
    }

    #[test]
    fn end_clip_snapshots_not_references() {
        let mut integrator = RootMotionIntegrator::new(1.0);
        let mut live = RootTransform::from_translation(Vector3f::new(1.0, 2.0, 3.0));
        integrator.end_clip(&live);

        // Mutating the live transform afterwards must not move the baseline
        live.translation = Vector3f::new(9.0, 9.0, 9.0);
        assert_relative_eq!(integrator.previous_root().translation.x, 1.0);
        assert!(!integrator.is_primed());
    }

    #[test]
    fn absolute_translation_offsets_previous_clip_end() {
        let mut integrator = RootMotionIntegrator::new(2.0);
        integrator.end_clip(&RootTransform::from_translation(Vector3f::new(10.0, 0.0, 0.0)));
        integrator.prime(Vector3f::zeros());
        let rel = integrator.relative_translation(&Vector3f::new(1.0, 0.0, 0.0)).unwrap();
        let abs = integrator.absolute_translation(&rel);
        assert_relative_eq!(abs.x, 12.0);
    }
}
