pub mod clip;
pub mod root_transform;
pub mod skeleton;
pub mod topology;
pub mod types;
