//! Light inference
//!
//! Turns resolved strokes into [`LightSpec`] descriptions:
//!
//! - **derive**: point, spot and area lamps plus the per-stroke fallback
//! - **sun**: occlusion-aware sun direction, sun lamps and sky textures
//! - **flag**: shadow card geometry
//! - **mesh**: emissive hulls and tube polylines
//! - **cache**: geometry change detection for mesh rebuilds

pub mod visibility;
pub mod light;
pub mod derive;
pub mod sun;
pub mod flag;
pub mod mesh;
pub mod cache;

pub use visibility::RayVisibility;
pub use light::{
    AreaLight, AreaShape, FlagCard, LampType, LightKind, LightSpec, MeshLight, PointLight,
    SkyModelKind, SkyParameters, SkyTexture, SpotLight, SunLight, TubeLight,
};
pub use derive::{
    derive_area, derive_lamp, derive_point, derive_spot, derive_with_fallback, lamp_energy,
    relative_power, Derived,
};
pub use sun::{derive_sky, derive_sun, dir_to_geo, geo_to_dir, solve_sun_direction, sun_direction};
pub use flag::{flag_points, light_points};
pub use mesh::{derive_tube, hull_points, merge_by_distance, tube_geometry, TubeGeometry};
pub use cache::{hash_points, hash_polylines, GeometryCache};
