//! Scene collaborators
//!
//! The inference core never owns scene state. It reads the scene through
//! [`SceneQuery`] (ray casts, camera, cursor) and writes results through
//! [`SceneSink`]. [`MemoryScene`] implements both for tests and tooling.

pub mod memory;

use slotmap::new_key_type;

use crate::error::PaintResult;
use crate::foundation::math::Vec3;
use crate::geometry::{ConvexHull, Ray, RayHit};
use crate::lighting::LightSpec;

pub use memory::MemoryScene;

/// Distance occlusion rays start away from their origin surface
pub const OCCLUSION_EPSILON: f32 = 0.01;

new_key_type! {
    /// Handle to a light created through a [`SceneSink`]
    pub struct LightHandle;

    /// Handle to a point cloud mesh created through a [`SceneSink`]
    pub struct MeshHandle;
}

/// Read-only view of the scene
pub trait SceneQuery {
    /// Closest surface hit along `ray`, no farther than `max_distance`
    fn ray_cast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;

    /// Position of the active camera, if the scene has one
    fn camera_position(&self) -> Option<Vec3>;

    /// Reference point used to anchor sun lamps
    fn cursor_location(&self) -> Vec3 {
        Vec3::zeros()
    }

    /// Whether anything blocks the view from `origin` along `direction`.
    ///
    /// The ray starts [`OCCLUSION_EPSILON`] along `direction` so the surface the
    /// origin sits on does not count as a blocker.
    fn is_occluded(&self, origin: &Vec3, direction: &Vec3, max_distance: f32) -> bool {
        let ray = Ray::new(origin + direction * OCCLUSION_EPSILON, *direction);
        self.ray_cast(&ray, max_distance).is_some()
    }
}

/// Write access to the scene for created lights and meshes
pub trait SceneSink {
    /// Create a light and return its handle
    fn create_light(&mut self, spec: LightSpec) -> LightHandle;

    /// Replace a light's description
    fn update_light(&mut self, handle: LightHandle, spec: LightSpec) -> PaintResult<()>;

    /// Remove a light
    fn delete_light(&mut self, handle: LightHandle) -> PaintResult<()>;

    /// Current description of a light
    fn light_spec(&self, handle: LightHandle) -> Option<&LightSpec>;

    /// Create a mesh holding only vertices
    fn create_point_cloud_mesh(&mut self, points: &[Vec3]) -> MeshHandle;

    /// Replace a mesh's vertices, discarding any faces
    fn update_point_cloud_mesh(&mut self, handle: MeshHandle, points: &[Vec3]) -> PaintResult<()>;

    /// Replace a mesh's geometry with the convex hull of its vertices
    fn compute_convex_hull(&mut self, handle: MeshHandle) -> PaintResult<()>;

    /// Remove a mesh
    fn delete_mesh(&mut self, handle: MeshHandle) -> PaintResult<()>;

    /// Current geometry of a mesh
    fn mesh(&self, handle: MeshHandle) -> Option<&ConvexHull>;
}

/// A scene that can be both queried and written to
pub trait Scene: SceneQuery + SceneSink {
    /// This scene as a read-only query
    fn as_query(&self) -> &dyn SceneQuery;
}

impl<T: SceneQuery + SceneSink> Scene for T {
    fn as_query(&self) -> &dyn SceneQuery {
        self
    }
}
