pub mod bounds;
pub mod pose;
pub mod vec3;

pub use bounds::Aabb;
pub use pose::{Orientation, Pose};
pub use vec3::Vec3;
