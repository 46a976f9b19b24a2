//! Geometry routines behind light placement
//!
//! - **Primitives**: rays and triangles for scene queries
//! - **Hull**: 2D and 3D convex hulls
//! - **Box fit**: minimum-area oriented rectangles
//! - **Projection**: flattening point sets onto planes

pub mod primitives;
pub mod hull;
pub mod box_fit;
pub mod projection;

pub use primitives::{Ray, RayHit, Triangle};
pub use hull::{convex_hull_2d, convex_hull_3d, ConvexHull};
pub use box_fit::{box_fit_2d, get_box, OrientedRect};
pub use projection::{farthest_along, flatten_to_back_plane, project_to_plane};
