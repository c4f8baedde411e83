use crate::error::RetargetError;
use std::collections::{HashMap, HashSet};

/// The joint topology of one session: which joint points toward which.
///
/// `driven` maps a joint to the joint it is anchored from and points
/// toward (it carries a landmark). `passive` maps a bone to the landmark
/// it tracks without having a landmark of its own (helper bones of the
/// rig, e.g. the second thigh segment of a two-segment upper leg).
///
/// Construction precomputes the inverse `targeter_of` mapping and a
/// placement order in which every joint comes after its targeter, so the
/// per-frame placement pass does no searching.
#[derive(Clone, Debug)]
pub struct JointTopology {
    driven: HashMap<String, String>,
    passive: HashMap<String, String>,
    targeter_of: HashMap<String, String>,
    placement_order: Vec<String>,
}

impl JointTopology {
    pub fn new(driven: HashMap<String, String>, passive: HashMap<String, String>) -> Result<Self, RetargetError> {
        let mut landmarked: HashSet<&str> = HashSet::new();
        for (joint, target) in &driven {
            landmarked.insert(joint);
            landmarked.insert(target);
        }

        // Passive bones may only track joints that actually carry a landmark
        for target in passive.values() {
            if !landmarked.contains(target.as_str()) {
                return Err(RetargetError::UnresolvedTopologyJoint { joint: target.clone() });
            }
        }

        let mut targeter_of: HashMap<String, String> = HashMap::new();
        for (joint, target) in &driven {
            if targeter_of.insert(target.clone(), joint.clone()).is_some() {
                return Err(RetargetError::DuplicateTargeter { joint: target.clone() });
            }
        }

        // Roots first, then down the targeting chains
        let mut placement_order: Vec<String> = landmarked
            .iter()
            .filter(|joint| !targeter_of.contains_key(**joint))
            .map(|joint| (*joint).to_owned())
            .collect();
        placement_order.sort();
        let mut idx = 0;
        while idx < placement_order.len() {
            let joint = placement_order[idx].clone();
            if let Some(target) = driven.get(&joint) {
                placement_order.push(target.clone());
            }
            idx += 1;
        }
        if placement_order.len() < landmarked.len() {
            let unreached = landmarked
                .iter()
                .find(|joint| !placement_order.iter().any(|p| p == **joint))
                .map_or_else(String::new, |joint| (*joint).to_owned());
            return Err(RetargetError::CyclicTopology { joint: unreached });
        }

        Ok(Self {
            driven,
            passive,
            targeter_of,
            placement_order,
        })
    }

    /// The topology of the original MakeHuman rig driven by MediaPipe
    /// landmarks: elbows and knees point toward wrists and feet, shoulders
    /// and upper legs toward elbows and knees; duplicate rig segments only
    /// track the landmarks of their primary counterparts.
    pub fn makehuman_default() -> Self {
        let driven = [
            ("lowerarm01.L", "wrist.L"),
            ("lowerarm01.R", "wrist.R"),
            ("shoulder01.R", "lowerarm01.R"),
            ("shoulder01.L", "lowerarm01.L"),
            ("lowerleg01.R", "foot.R"),
            ("lowerleg01.L", "foot.L"),
            ("upperleg01.R", "lowerleg01.R"),
            ("upperleg01.L", "lowerleg01.L"),
        ];
        let passive = [
            ("upperleg02.R", "lowerleg01.R"),
            ("upperleg02.L", "lowerleg01.L"),
            ("lowerleg02.R", "foot.R"),
            ("lowerleg02.L", "foot.L"),
            ("upperarm01.R", "lowerarm01.R"),
            ("upperarm02.R", "lowerarm01.R"),
            ("upperarm01.L", "lowerarm01.L"),
            ("upperarm02.L", "lowerarm01.L"),
            ("lowerarm02.L", "wrist.L"),
            ("lowerarm02.R", "wrist.R"),
        ];
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(a, b)| ((*a).to_owned(), (*b).to_owned()))
                .collect::<HashMap<_, _>>()
        };
        // The built-in tables are acyclic and conflict-free
        Self::new(to_map(&driven), to_map(&passive)).expect("default topology is valid")
    }

    pub fn driven(&self) -> &HashMap<String, String> {
        &self.driven
    }

    pub fn passive(&self) -> &HashMap<String, String> {
        &self.passive
    }

    /// The joint whose landmark is anchored from `joint`, if any
    pub fn targeter_of(&self, joint: &str) -> Option<&str> {
        self.targeter_of.get(joint).map(String::as_str)
    }

    /// All joints that carry a landmark, targeters before their targets
    pub fn placement_order(&self) -> &[String] {
        &self.placement_order
    }

    pub fn is_landmarked(&self, joint: &str) -> bool {
        self.placement_order.iter().any(|p| p == joint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetargetError;

    fn map_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(a, b)| ((*a).to_owned(), (*b).to_owned())).collect()
    }

    #[test]
    fn targeter_inverse_mapping() {
        let topo = JointTopology::new(map_of(&[("elbow", "wrist"), ("shoulder", "elbow")]), HashMap::new()).unwrap();
        assert_eq!(topo.targeter_of("wrist"), Some("elbow"));
        assert_eq!(topo.targeter_of("elbow"), Some("shoulder"));
        assert_eq!(topo.targeter_of("shoulder"), None);
    }

    #[test]
    fn placement_order_puts_targeter_first() {
        let topo = JointTopology::new(map_of(&[("elbow", "wrist"), ("shoulder", "elbow")]), HashMap::new()).unwrap();
        let order = topo.placement_order();
        let pos = |j: &str| order.iter().position(|o| o == j).unwrap();
        assert!(pos("shoulder") < pos("elbow"));
        assert!(pos("elbow") < pos("wrist"));
    }

    #[test]
    fn cyclic_topology_is_rejected() {
        let result = JointTopology::new(map_of(&[("a", "b"), ("b", "a")]), HashMap::new());
        assert!(matches!(result, Err(RetargetError::CyclicTopology { .. })));
    }

    #[test]
    fn duplicate_targeter_is_rejected() {
        let result = JointTopology::new(map_of(&[("a", "c"), ("b", "c")]), HashMap::new());
        assert!(matches!(result, Err(RetargetError::DuplicateTargeter { joint }) if joint == "c"));
    }

    #[test]
    fn passive_must_track_landmarked_joint() {
        let result = JointTopology::new(map_of(&[("elbow", "wrist")]), map_of(&[("helper", "ankle")]));
        assert!(matches!(result, Err(RetargetError::UnresolvedTopologyJoint { joint }) if joint == "ankle"));
    }

    #[test]
    fn makehuman_default_is_valid() {
        let topo = JointTopology::makehuman_default();
        assert_eq!(topo.targeter_of("wrist.L"), Some("lowerarm01.L"));
        assert_eq!(topo.targeter_of("lowerleg01.R"), Some("upperleg01.R"));
        assert!(topo.is_landmarked("foot.L"));
        assert!(!topo.is_landmarked("upperarm02.L"));
    }
}
