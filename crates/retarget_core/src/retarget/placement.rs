use crate::common::{
    clip::{landmark, LandmarkFrame},
    root_transform::RootTransform,
    skeleton::RestSkeleton,
    topology::JointTopology,
    types::ConversionProfile,
};
use crate::error::RetargetError;
use log::debug;
use nalgebra as na;
use retarget_utils::vector::Vector3f;
use std::collections::HashMap;

/// Places each landmarked joint at its per-frame position, rescaled so
/// every joint-to-joint segment keeps the skeleton's rest-pose bone
/// length no matter how much the estimator's distances wobble.
///
/// Rest lengths and the targeter lookup are fixed at construction; the
/// per-frame pass is pure over the frame and the live root transform.
#[derive(Debug)]
pub struct LandmarkPlacement {
    profile: ConversionProfile,
    order: Vec<String>,
    targeter_of: HashMap<String, String>,
    rest_heads: HashMap<String, Vector3f>,
    rest_lengths: HashMap<String, f32>,
    landmark_scale: f32,
}

impl LandmarkPlacement {
    /// Precomputes rest heads and bone lengths for every landmarked joint.
    ///
    /// # Errors
    /// `MissingRestHead` when the skeleton has no rest pose for a joint
    /// the topology marks as landmarked.
    pub fn new(topology: &JointTopology, skeleton: &RestSkeleton, profile: ConversionProfile) -> Result<Self, RetargetError> {
        let mut rest_heads = HashMap::new();
        for joint in topology.placement_order() {
            let head = skeleton
                .rest_head(joint)
                .copied()
                .ok_or_else(|| RetargetError::MissingRestHead { joint: joint.clone() })?;
            rest_heads.insert(joint.clone(), head);
        }

        let mut targeter_of = HashMap::new();
        let mut rest_lengths = HashMap::new();
        for joint in topology.placement_order() {
            if let Some(targeter) = topology.targeter_of(joint) {
                let length = (rest_heads[targeter] - rest_heads[joint.as_str()]).norm();
                targeter_of.insert(joint.clone(), targeter.to_owned());
                rest_lengths.insert(joint.clone(), length);
            }
        }

        Ok(Self {
            profile,
            order: topology.placement_order().to_vec(),
            targeter_of,
            rest_heads,
            rest_lengths,
            landmark_scale: skeleton.landmark_scale(),
        })
    }

    /// Places every landmarked joint present in `frame`.
    ///
    /// Returns joint id to position in the landmark group's local scale.
    /// Joints missing from the frame are skipped for this frame; frame
    /// entries unknown to the topology are ignored.
    pub fn place_frame(&self, frame: &LandmarkFrame, root: &RootTransform) -> HashMap<String, Vector3f> {
        let mut placed_world: HashMap<&str, Vector3f> = HashMap::new();
        let mut placed = HashMap::new();

        for joint in &self.order {
            let Some(current) = landmark(frame, joint) else {
                debug!("joint `{joint}` absent from frame, skipping");
                continue;
            };
            let world = match self.targeter_of.get(joint) {
                Some(targeter) => {
                    let Some(targeter_current) = landmark(frame, targeter) else {
                        debug!("targeter `{targeter}` of `{joint}` absent from frame, skipping");
                        continue;
                    };
                    let direction = self.profile.convert(&current) - self.profile.convert(&targeter_current);
                    if direction.norm() == 0.0 {
                        debug!("joint `{joint}` coincides with its targeter, skipping");
                        continue;
                    }
                    // Anchor on the targeter's placement for this frame so
                    // chained segments stay rest-length exact
                    let anchor = placed_world
                        .get(targeter.as_str())
                        .copied()
                        .unwrap_or_else(|| self.world_head(targeter, root));
                    anchor + direction.normalize() * self.rest_lengths[joint]
                }
                None => self.world_head(joint, root),
            };
            placed_world.insert(joint, world);
            placed.insert(joint.clone(), world / self.landmark_scale);
        }
        placed
    }

    fn world_head(&self, joint: &str, root: &RootTransform) -> Vector3f {
        let e = root.rotation_euler;
        let rotation = na::Rotation3::from_euler_angles(e.x, e.y, e.z);
        rotation * self.rest_heads[joint] + root.translation
    }

    pub fn rest_length(&self, joint: &str) -> Option<f32> {
        self.rest_lengths.get(joint).copied()
    }
}
