pub mod sensors;
pub mod interpolation;
pub mod alignment;
pub mod io;
pub mod numerics;
pub mod progress;
pub mod runtime_conf;

pub use runtime_conf::load_runtime_conf;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

/// Topic timestamps are logged in nanoseconds, frame timestamps in microseconds.
pub const NS_TO_US: Float = 0.001;

define_float!(f64);
