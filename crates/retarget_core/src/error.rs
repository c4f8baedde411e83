use thiserror::Error;

/// Error taxonomy of the retargeting core.
///
/// The per-frame conditions (`MissingAnchor`, `DegenerateBasis`) are
/// recovered locally by the session, which holds the previous root
/// transform for that frame; they never abort a clip. The remaining
/// variants are fatal and surface at session construction or clip loading.
#[derive(Debug, Error)]
pub enum RetargetError {
    #[error("anchor landmark `{joint}` is missing from the frame")]
    MissingAnchor { joint: String },

    #[error("degenerate body basis: lateral and vertical axes are nearly collinear")]
    DegenerateBasis,

    #[error("relative translation requested before the clip baseline was primed")]
    UninitializedBaseline,

    #[error("joint `{joint}` has no rest-pose bone head in the skeleton")]
    MissingRestHead { joint: String },

    #[error("topology references `{joint}` which does not resolve to a landmarked joint")]
    UnresolvedTopologyJoint { joint: String },

    #[error("joint `{joint}` is targeted by more than one driven joint")]
    DuplicateTargeter { joint: String },

    #[error("topology contains a targeting cycle through `{joint}`")]
    CyclicTopology { joint: String },

    #[error("smoothing window must be at least 1")]
    InvalidSmoothingWindow,

    #[error("failed to read motion clip: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse motion clip: {0}")]
    Json(#[from] serde_json::Error),
}
