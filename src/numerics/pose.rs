extern crate nalgebra as na;

use na::{Vector3, Isometry3, Translation3, Rotation3, UnitQuaternion};
use crate::Float;

/**
 * Rotation from roll, pitch, yaw in degrees, applied about the fixed x, y, z axes in that order.
 */
pub fn rotation_from_rpy_degrees(rpy: &Vector3<Float>) -> Rotation3<Float> {
    Rotation3::from_euler_angles(rpy.x.to_radians(), rpy.y.to_radians(), rpy.z.to_radians())
}

pub fn from_rpy_degrees(rpy: &Vector3<Float>, t: &Vector3<Float>) -> Isometry3<Float> {
    Isometry3::<Float>::from_parts(Translation3::from(*t), UnitQuaternion::from_rotation_matrix(&rotation_from_rpy_degrees(rpy)))
}

/**
 * Pose of b expressed in frame a, given both in a common world frame: T_ab = T_wa^-1 * T_wb
 */
pub fn relative_pose(world_a: &Isometry3<Float>, world_b: &Isometry3<Float>) -> Isometry3<Float> {
    world_a.inverse()*world_b
}
