use na::{Matrix3, Vector3};
extern crate nalgebra as na;

pub type Vector3f = Vector3<f32>;
pub type Vector3d = Vector3<f64>;
pub type Matrix3f = Matrix3<f32>;

pub fn vec_from_fixed(v: &[f32; 3]) -> Vector3f {
    Vector3f::new(v[0], v[1], v[2])
}

pub fn to_fixed_vec3(v: &Vector3f) -> [f32; 3] {
    [v.x, v.y, v.z]
}

pub fn v3d_from_v3f(v: &Vector3f) -> Vector3d {
    Vector3d::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

#[allow(clippy::cast_possible_truncation)]
pub fn v3f_from_v3d(v: &Vector3d) -> Vector3f {
    Vector3f::new(v.x as f32, v.y as f32, v.z as f32)
}
