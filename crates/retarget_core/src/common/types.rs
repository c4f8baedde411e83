use strum_macros::Display;

/// Coordinate conventions of the supported upstream estimators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum ConversionProfile {
    Godot,
    OpenPose,
}

/// Keyframable channels of a scene object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Channel {
    Location,
    RotationEuler,
}
