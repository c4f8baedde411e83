use crate::error::RetargetError;
use retarget_utils::vector::{vec_from_fixed, Vector3f};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One estimator sample: joint identifier to position in source coordinates
pub type LandmarkFrame = HashMap<String, [f32; 3]>;

/// Looks up a joint position in a frame as a vector
pub fn landmark(frame: &LandmarkFrame, joint: &str) -> Option<Vector3f> {
    frame.get(joint).map(vec_from_fixed)
}

/// One contiguous motion dataset produced by the upstream estimator
/// pipeline: the declared joint identifiers plus one landmark mapping per
/// video frame.
#[derive(Clone, Debug, Deserialize)]
pub struct MotionClip {
    pub bones: Vec<String>,
    pub poses: Vec<LandmarkFrame>,
}

impl MotionClip {
    /// Loads a clip from a `{"bones": [...], "poses": [...]}` JSON file
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn new_from_json(path: &str) -> Result<Self, RetargetError> {
        let file = std::fs::File::open(path)?;
        Self::new_from_reader(std::io::BufReader::new(file))
    }

    /// # Errors
    /// Returns an error when the stream does not parse as clip JSON.
    pub fn new_from_reader<R: Read>(reader: R) -> Result<Self, RetargetError> {
        let clip: Self = serde_json::from_reader(reader)?;
        Ok(clip.normalized())
    }

    /// # Errors
    /// Returns an error when the string does not parse as clip JSON.
    pub fn new_from_str(json: &str) -> Result<Self, RetargetError> {
        let clip: Self = serde_json::from_str(json)?;
        Ok(clip.normalized())
    }

    // MakeHuman names its mirrored bones `<id>.<R/L>`, but some estimator
    // exports drop the dot. Re-insert it so clip ids match the rig.
    fn normalized(mut self) -> Self {
        self.bones = self.bones.iter().map(|id| add_point_in_id(id)).collect();
        self.poses = self
            .poses
            .iter()
            .map(|frame| frame.iter().map(|(id, pos)| (add_point_in_id(id), *pos)).collect())
            .collect();
        self
    }

    pub fn num_frames(&self) -> usize {
        self.poses.len()
    }
}

fn add_point_in_id(id: &str) -> String {
    match id.as_bytes().last() {
        Some(b'R' | b'L') if id.len() > 1 && !id[..id.len() - 1].ends_with('.') => {
            format!("{}.{}", &id[..id.len() - 1], &id[id.len() - 1..])
        }
        _ => id.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_clip_json() {
        let clip = MotionClip::new_from_str(
            r#"{
                "bones": ["shoulder01.R", "shoulder01.L"],
                "poses": [
                    {"shoulder01.R": [0.1, 0.2, 0.3], "shoulder01.L": [0.4, 0.5, 0.6]},
                    {"shoulder01.R": [0.2, 0.2, 0.3], "shoulder01.L": [0.5, 0.5, 0.6]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(clip.num_frames(), 2);
        let pos = landmark(&clip.poses[0], "shoulder01.L").unwrap();
        assert_relative_eq!(pos.x, 0.4);
    }

    #[test]
    fn normalizes_undotted_side_suffixes() {
        let clip = MotionClip::new_from_str(
            r#"{
                "bones": ["wristL", "wrist.R", "neck03"],
                "poses": [{"wristL": [1.0, 0.0, 0.0], "wrist.R": [0.0, 1.0, 0.0], "neck03": [0.0, 0.0, 1.0]}]
            }"#,
        )
        .unwrap();
        assert_eq!(clip.bones, vec!["wrist.L", "wrist.R", "neck03"]);
        assert!(landmark(&clip.poses[0], "wrist.L").is_some());
        assert!(landmark(&clip.poses[0], "neck03").is_some());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(MotionClip::new_from_str("{\"bones\": []}").is_err());
    }
}
