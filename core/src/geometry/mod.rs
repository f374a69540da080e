//! Geometry

use crate::pbrt::*;

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3<$t> {
                Vector3 { x, y, z }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Point3<$t> {
                Point3 { x, y, z }
            }
        }
    };
}

mod animated_transform;
mod bounds3;
mod common;
mod matrix4x4;
mod normal;
mod point2;
mod point3;
mod quaternion;
mod ray;
mod transform;
mod vector3;

// Re-export
pub use animated_transform::*;
pub use bounds3::*;
pub use common::*;
pub use matrix4x4::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use quaternion::*;
pub use ray::*;
pub use transform::*;
pub use vector3::*;
