use crate::common::{root_transform::RootTransform, types::Channel};
use retarget_utils::vector::Vector3f;
use std::collections::HashMap;

/// Objects the core addresses in the host scene
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectId {
    /// The character root (the `Base` empty the whole rig hangs from)
    Root,
    /// One joint's landmark visual, keyed by joint identifier
    Landmark(String),
}

/// Seam between the retargeting core and the host scene graph.
///
/// The core never touches the host's object model directly; it emits
/// calls against this trait. `commit` carries an ordering guarantee: all
/// transform writes issued since the previous `commit` are applied and
/// visible to subsequent reads of the host scene.
pub trait SceneWriter {
    /// Creates the landmark visual for a joint, once per session
    fn create_visual(&mut self, joint: &str);

    /// Points a bone's damped-track constraint at a landmark visual, once
    /// per session, never per frame
    fn set_constraint_target(&mut self, bone: &str, target_joint: &str);

    /// Updates an object's live transform; landmark visuals ignore the
    /// rotation part
    fn set_transform(&mut self, object: &ObjectId, transform: &RootTransform);

    /// Snapshots the named channel of the object's live transform at
    /// `frame` on the shared timeline
    fn keyframe(&mut self, object: &ObjectId, channel: Channel, frame: u64);

    /// Applies all pending transform writes since the last commit
    fn commit(&mut self);

    /// Drops every keyframe emitted so far (session re-runs)
    fn clear_keyframes(&mut self);
}

/// One recorded keyframe of the in-memory scene
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub object: ObjectId,
    pub channel: Channel,
    pub frame: u64,
    pub value: Vector3f,
}

/// A [`SceneWriter`] that records everything it is told, for tests and
/// offline inspection of a session's output.
#[derive(Default)]
pub struct MemoryScene {
    pub visuals: Vec<String>,
    pub constraints: HashMap<String, String>,
    pub transforms: HashMap<ObjectId, RootTransform>,
    pub keyframes: Vec<Keyframe>,
    pub commits: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keyframed values of one channel of one object, in frame order
    pub fn channel_track(&self, object: &ObjectId, channel: Channel) -> Vec<(u64, Vector3f)> {
        self.keyframes
            .iter()
            .filter(|k| &k.object == object && k.channel == channel)
            .map(|k| (k.frame, k.value))
            .collect()
    }

    pub fn live_transform(&self, object: &ObjectId) -> Option<&RootTransform> {
        self.transforms.get(object)
    }
}

impl SceneWriter for MemoryScene {
    fn create_visual(&mut self, joint: &str) {
        if !self.visuals.iter().any(|v| v == joint) {
            self.visuals.push(joint.to_owned());
        }
    }

    fn set_constraint_target(&mut self, bone: &str, target_joint: &str) {
        self.constraints.insert(bone.to_owned(), target_joint.to_owned());
    }

    fn set_transform(&mut self, object: &ObjectId, transform: &RootTransform) {
        self.transforms.insert(object.clone(), *transform);
    }

    fn keyframe(&mut self, object: &ObjectId, channel: Channel, frame: u64) {
        let transform = self.transforms.get(object).copied().unwrap_or_default();
        let value = match channel {
            Channel::Location => transform.translation,
            Channel::RotationEuler => transform.rotation_euler,
        };
        self.keyframes.push(Keyframe {
            object: object.clone(),
            channel,
            frame,
            value,
        });
    }

    fn commit(&mut self) {
        self.commits += 1;
    }

    fn clear_keyframes(&mut self) {
        self.keyframes.clear();
    }
}
