//! In-memory scene backed by a triangle soup and slot maps

use std::cell::Cell;

use slotmap::SlotMap;

use crate::error::{PaintError, PaintResult};
use crate::foundation::math::Vec3;
use crate::geometry::{convex_hull_3d, ConvexHull, Ray, RayHit, Triangle};
use crate::lighting::LightSpec;
use crate::scene::{LightHandle, MeshHandle, SceneQuery, SceneSink};

/// Scene used by tests and the demo: ray casts against triangles, lights and
/// meshes live in slot maps.
#[derive(Debug, Default)]
pub struct MemoryScene {
    triangles: Vec<Triangle>,
    camera: Option<Vec3>,
    cursor: Vec3,
    lights: SlotMap<LightHandle, LightSpec>,
    meshes: SlotMap<MeshHandle, ConvexHull>,
    ray_casts: Cell<usize>,
}

impl MemoryScene {
    /// Create an empty scene with no camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the camera position
    #[must_use]
    pub fn with_camera(mut self, position: Vec3) -> Self {
        self.camera = Some(position);
        self
    }

    /// Set the cursor location
    #[must_use]
    pub fn with_cursor(mut self, location: Vec3) -> Self {
        self.cursor = location;
        self
    }

    /// Add a triangle of blocking geometry
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a parallelogram as two triangles, facing along `axis_u x axis_v`
    pub fn add_quad(&mut self, center: Vec3, axis_u: Vec3, axis_v: Vec3) {
        let a = center - axis_u - axis_v;
        let b = center + axis_u - axis_v;
        let c = center + axis_u + axis_v;
        let d = center - axis_u + axis_v;
        self.triangles.push(Triangle::new(a, b, c));
        self.triangles.push(Triangle::new(a, c, d));
    }

    /// All lights currently in the scene
    pub fn lights(&self) -> impl Iterator<Item = (LightHandle, &LightSpec)> {
        self.lights.iter()
    }

    /// Number of lights
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Number of meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Ray casts performed so far
    pub fn ray_cast_count(&self) -> usize {
        self.ray_casts.get()
    }
}

impl SceneQuery for MemoryScene {
    fn ray_cast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        self.ray_casts.set(self.ray_casts.get() + 1);
        self.triangles
            .iter()
            .filter_map(|triangle| triangle.hit(ray, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn camera_position(&self) -> Option<Vec3> {
        self.camera
    }

    fn cursor_location(&self) -> Vec3 {
        self.cursor
    }
}

impl SceneSink for MemoryScene {
    fn create_light(&mut self, spec: LightSpec) -> LightHandle {
        log::trace!("Creating {:?} light", spec.kind());
        self.lights.insert(spec)
    }

    fn update_light(&mut self, handle: LightHandle, spec: LightSpec) -> PaintResult<()> {
        let slot = self
            .lights
            .get_mut(handle)
            .ok_or_else(|| PaintError::MissingObject(format!("{handle:?}")))?;
        *slot = spec;
        Ok(())
    }

    fn delete_light(&mut self, handle: LightHandle) -> PaintResult<()> {
        self.lights
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| PaintError::MissingObject(format!("{handle:?}")))
    }

    fn light_spec(&self, handle: LightHandle) -> Option<&LightSpec> {
        self.lights.get(handle)
    }

    fn create_point_cloud_mesh(&mut self, points: &[Vec3]) -> MeshHandle {
        self.meshes.insert(ConvexHull { vertices: points.to_vec(), faces: Vec::new() })
    }

    fn update_point_cloud_mesh(&mut self, handle: MeshHandle, points: &[Vec3]) -> PaintResult<()> {
        let mesh = self
            .meshes
            .get_mut(handle)
            .ok_or_else(|| PaintError::MissingObject(format!("{handle:?}")))?;
        mesh.vertices = points.to_vec();
        mesh.faces.clear();
        Ok(())
    }

    fn compute_convex_hull(&mut self, handle: MeshHandle) -> PaintResult<()> {
        let mesh = self
            .meshes
            .get_mut(handle)
            .ok_or_else(|| PaintError::MissingObject(format!("{handle:?}")))?;
        *mesh = convex_hull_3d(&mesh.vertices);
        Ok(())
    }

    fn delete_mesh(&mut self, handle: MeshHandle) -> PaintResult<()> {
        self.meshes
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| PaintError::MissingObject(format!("{handle:?}")))
    }

    fn mesh(&self, handle: MeshHandle) -> Option<&ConvexHull> {
        self.meshes.get(handle)
    }
}
