use crate::common::{
    clip::{LandmarkFrame, MotionClip},
    root_transform::RootTransform,
    skeleton::RestSkeleton,
    topology::JointTopology,
    types::{Channel, ConversionProfile},
};
use crate::error::RetargetError;
use crate::retarget::{
    geometry::{AnchorJoints, FrameGeometry},
    placement::LandmarkPlacement,
    root_motion::RootMotionIntegrator,
    smoother::TemporalSmoother,
};
use crate::scene::{ObjectId, SceneWriter};
use log::{info, warn};
use retarget_utils::numerical::unwrap_angle;
use retarget_utils::vector::Vector3f;
use std::collections::HashMap;
use strum_macros::Display;

// Smoother keys for the root channels; prefixed so they can never collide
// with a joint identifier coming out of a clip
const KEY_ROTATION: &str = "__root.rotation";
const KEY_TRANSLATION: &str = "__root.translation";

/// Everything a session needs beyond topology and skeleton
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub profile: ConversionProfile,
    /// Multiplier from estimator body-center displacement to world root
    /// translation
    pub distance_factor: f32,
    /// Frames averaged per emitted keyframe
    pub smoothing_window: u64,
    /// Timeline gap inserted after clip `i`, in frames
    pub inter_clip_gap_frames: Vec<u64>,
    pub anchors: AnchorJoints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile: ConversionProfile::OpenPose,
            distance_factor: 20.0,
            smoothing_window: 10,
            inter_clip_gap_frames: Vec::new(),
            anchors: AnchorJoints::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum SessionPhase {
    /// No clip is being applied
    Idle,
    /// A clip started but no frame has established the root baseline yet
    Priming,
    /// Frames are being accumulated and keyframes emitted
    Streaming,
    /// The last applied clip has been committed
    ClipEnd,
}

/// Drives whole clips through the retargeting pipeline and writes the
/// result into a [`SceneWriter`].
///
/// The session owns the shared timeline: every applied clip continues at
/// the frame index the previous one ended on, plus any configured gap, and
/// the root transform carries over so concatenated clips form one
/// continuous performance.
pub struct Session<W: SceneWriter> {
    scene: W,
    config: SessionConfig,
    placement: LandmarkPlacement,
    smoother: TemporalSmoother,
    integrator: RootMotionIntegrator,
    live_root: RootTransform,
    frame_index: u64,
    clips_applied: usize,
    phase: SessionPhase,
    // First rotation sample of the open window; later samples are unwrapped
    // toward it so the window mean never straddles the 2-pi seam
    rotation_ref: Option<Vector3f>,
}

impl<W: SceneWriter> Session<W> {
    /// Builds the session and performs all one-time scene setup: one
    /// landmark visual per landmarked joint and one constraint target per
    /// rig bone.
    ///
    /// # Errors
    /// `InvalidSmoothingWindow` for a zero window, or any error from
    /// [`LandmarkPlacement::new`].
    pub fn new(mut scene: W, topology: &JointTopology, skeleton: &RestSkeleton, config: SessionConfig) -> Result<Self, RetargetError> {
        if config.smoothing_window == 0 {
            return Err(RetargetError::InvalidSmoothingWindow);
        }
        let placement = LandmarkPlacement::new(topology, skeleton, config.profile)?;

        for joint in topology.placement_order() {
            scene.create_visual(joint);
        }
        for (bone, target) in topology.driven() {
            scene.set_constraint_target(bone, target);
        }
        for (bone, target) in topology.passive() {
            scene.set_constraint_target(bone, target);
        }

        Ok(Self {
            scene,
            smoother: TemporalSmoother::new(config.smoothing_window),
            integrator: RootMotionIntegrator::new(config.distance_factor),
            config,
            placement,
            live_root: RootTransform::identity(),
            frame_index: 0,
            clips_applied: 0,
            phase: SessionPhase::Idle,
            rotation_ref: None,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn clips_applied(&self) -> usize {
        self.clips_applied
    }

    pub fn scene(&self) -> &W {
        &self.scene
    }

    pub fn into_scene(self) -> W {
        self.scene
    }

    /// Applies one clip: accumulates every frame, emits keyframes at each
    /// window boundary, and closes the clip with a commit and the
    /// configured timeline gap.
    ///
    /// Frames whose anchors are missing or degenerate are logged and held
    /// over (the timeline still advances, the pose does not change).
    ///
    /// # Errors
    /// Propagates [`RetargetError::UninitializedBaseline`]; per-frame
    /// estimation failures are not errors.
    pub fn apply_clip(&mut self, clip: &MotionClip) -> Result<(), RetargetError> {
        info!(
            "applying clip with {} frames starting at timeline frame {}",
            clip.num_frames(),
            self.frame_index
        );
        self.phase = SessionPhase::Priming;

        for frame in &clip.poses {
            match FrameGeometry::estimate(frame, &self.config.anchors, self.config.profile) {
                Ok(geometry) => {
                    self.integrator.prime(geometry.body_center);
                    self.phase = SessionPhase::Streaming;
                    self.accumulate_frame(frame, &geometry)?;
                }
                Err(err) => {
                    warn!("holding frame {}: {err}", self.frame_index);
                }
            }

            let next = self.frame_index + 1;
            if let Some(averaged) = self.smoother.try_flush(next) {
                self.apply_flush(&averaged, next);
            }
            self.frame_index = next;
        }

        self.end_clip();
        Ok(())
    }

    /// Applies clips back to back on the shared timeline
    ///
    /// # Errors
    /// Stops at the first clip that fails.
    pub fn apply_clips(&mut self, clips: &[MotionClip]) -> Result<(), RetargetError> {
        for clip in clips {
            self.apply_clip(clip)?;
        }
        Ok(())
    }

    /// Rewinds the session to a fresh state and drops every keyframe
    /// written so far
    pub fn reset(&mut self) {
        self.smoother.clear();
        self.integrator.reset();
        self.live_root = RootTransform::identity();
        self.frame_index = 0;
        self.clips_applied = 0;
        self.phase = SessionPhase::Idle;
        self.rotation_ref = None;
        self.scene.clear_keyframes();
    }

    fn accumulate_frame(&mut self, frame: &LandmarkFrame, geometry: &FrameGeometry) -> Result<(), RetargetError> {
        let euler = geometry.rotation_euler();
        let euler = match self.rotation_ref {
            Some(reference) => Vector3f::new(
                unwrap_angle(euler.x, reference.x),
                unwrap_angle(euler.y, reference.y),
                unwrap_angle(euler.z, reference.z),
            ),
            None => {
                self.rotation_ref = Some(euler);
                euler
            }
        };
        self.smoother.accumulate(KEY_ROTATION, euler);

        let relative = self.integrator.relative_translation(&geometry.body_center)?;
        self.smoother.accumulate(KEY_TRANSLATION, relative);

        for (joint, position) in self.placement.place_frame(frame, &self.live_root) {
            self.smoother.accumulate(&joint, position);
        }
        Ok(())
    }

    fn apply_flush(&mut self, averaged: &HashMap<String, Vector3f>, frame: u64) {
        if let Some(rotation) = averaged.get(KEY_ROTATION) {
            self.live_root.rotation_euler = *rotation;
        }
        if let Some(relative) = averaged.get(KEY_TRANSLATION) {
            self.live_root.translation = self.integrator.absolute_translation(relative);
        }
        self.scene.set_transform(&ObjectId::Root, &self.live_root);
        self.scene.keyframe(&ObjectId::Root, Channel::Location, frame);
        self.scene.keyframe(&ObjectId::Root, Channel::RotationEuler, frame);

        for (joint, position) in averaged {
            if joint == KEY_ROTATION || joint == KEY_TRANSLATION {
                continue;
            }
            let object = ObjectId::Landmark(joint.clone());
            self.scene.set_transform(&object, &RootTransform::from_translation(*position));
            self.scene.keyframe(&object, Channel::Location, frame);
        }
        self.rotation_ref = None;
    }

    fn end_clip(&mut self) {
        // A trailing partial window is dropped rather than averaged over
        // fewer frames than configured
        self.smoother.clear();
        self.rotation_ref = None;
        self.integrator.end_clip(&self.live_root);
        self.scene.commit();
        self.phase = SessionPhase::ClipEnd;

        let gap = self
            .config
            .inter_clip_gap_frames
            .get(self.clips_applied)
            .copied()
            .unwrap_or(0);
        if gap > 0 {
            info!("advancing timeline by {gap} gap frames after clip {}", self.clips_applied);
            self.frame_index += gap;
        }
        self.clips_applied += 1;
        self.phase = SessionPhase::Idle;
    }
}
