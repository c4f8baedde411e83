use std::f32::consts::{PI, TAU};

// Function to handle the 2π wrap-around when accumulating angles for
// averaging: returns the representation of `angle` closest to `reference`
pub fn unwrap_angle(angle: f32, reference: f32) -> f32 {
    let mut diff = angle - reference;
    while diff > PI {
        diff -= TAU;
    }
    while diff < -PI {
        diff += TAU;
    }
    reference + diff
}
