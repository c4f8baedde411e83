//! Retargeting of estimated 3D body landmarks onto a humanoid skeleton.
//!
//! The input is a sequence of motion clips, each a list of per-frame joint
//! positions coming from an upstream pose estimator in its own coordinate
//! convention. The output is keyframed animation written through the
//! [`scene::SceneWriter`] seam: a root transform for the whole character
//! plus per-joint landmark positions that always respect the skeleton's
//! rest-pose bone lengths.

pub mod common;
pub mod conversions;
pub mod error;
pub mod retarget;
pub mod scene;
