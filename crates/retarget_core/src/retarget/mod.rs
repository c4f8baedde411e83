pub mod geometry;
pub mod placement;
pub mod root_motion;
pub mod session;
pub mod smoother;
