use retarget_utils::vector::{vec_from_fixed, Vector3f};
use std::collections::HashMap;

/// Read-only rest-pose data extracted from the host rig.
///
/// Holds the rest-pose bone head position of every joint the topology may
/// reference, in the character's reference frame, plus the uniform scale
/// of the landmark parent group. Bone lengths are derived from the head
/// positions exactly once, at session construction; nothing here is ever
/// recomputed from runtime landmark data.
#[derive(Clone, Debug)]
pub struct RestSkeleton {
    heads: HashMap<String, Vector3f>,
    landmark_scale: f32,
}

impl RestSkeleton {
    pub fn new(heads: HashMap<String, Vector3f>, landmark_scale: f32) -> Self {
        Self { heads, landmark_scale }
    }

    pub fn new_from_fixed<I, S>(heads: I, landmark_scale: f32) -> Self
    where
        I: IntoIterator<Item = (S, [f32; 3])>,
        S: Into<String>,
    {
        let heads = heads
            .into_iter()
            .map(|(joint, head)| (joint.into(), vec_from_fixed(&head)))
            .collect();
        Self::new(heads, landmark_scale)
    }

    pub fn rest_head(&self, joint: &str) -> Option<&Vector3f> {
        self.heads.get(joint)
    }

    /// Uniform scale factor of the landmark parent group; placed landmark
    /// positions are divided by this before keyframing
    pub fn landmark_scale(&self) -> f32 {
        self.landmark_scale
    }
}
