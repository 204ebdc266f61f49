extern crate nalgebra as na;
extern crate frame_sync;

use argh::FromArgs;
use color_eyre::eyre::Result;
use na::Vector3;

use frame_sync::Float;
use frame_sync::numerics::pose::{from_rpy_degrees, relative_pose};

/// Compute the T_b_c transformation matrix from IMU to camera based on IMU and camera poses.
/// Example: tbc_compute --ri 180,0,-90 --ti 0.1,0,0 --rc 0,0,90 --tc 0,0,0.2
#[derive(FromArgs)]
struct Args {
    /// rotation roll,pitch,yaw in degrees for the IMU
    #[argh(option, default = "Vector3::zeros()", from_str_fn(parse_vector3))]
    ri: Vector3<Float>,

    /// translation x,y,z for the IMU
    #[argh(option, default = "Vector3::zeros()", from_str_fn(parse_vector3))]
    ti: Vector3<Float>,

    /// rotation roll,pitch,yaw in degrees for the camera
    #[argh(option, default = "Vector3::zeros()", from_str_fn(parse_vector3))]
    rc: Vector3<Float>,

    /// translation x,y,z for the camera
    #[argh(option, default = "Vector3::zeros()", from_str_fn(parse_vector3))]
    tc: Vector3<Float>
}

fn parse_vector3(value: &str) -> Result<Vector3<Float>, String> {
    let parts = value.split(',')
        .map(|s| s.trim().parse::<Float>().map_err(|e| format!("`{}`: {}", s, e)))
        .collect::<Result<Vec<Float>, String>>()?;
    match parts.as_slice() {
        &[x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(format!("expected three comma separated values, got `{}`", value))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = argh::from_env();

    let world_imu = from_rpy_degrees(&args.ri, &args.ti);
    println!("World -> IMU matrix{}", world_imu.to_homogeneous());

    let world_cam = from_rpy_degrees(&args.rc, &args.tc);
    println!("World -> camera matrix{}", world_cam.to_homogeneous());

    let imu_cam = relative_pose(&world_imu, &world_cam);
    println!("IMU -> camera matrix{}", imu_cam.to_homogeneous());

    Ok(())
}
