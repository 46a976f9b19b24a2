//! Light descriptions handed to the scene sink
//!
//! Pure data: every derivation in this crate ends in a [`LightSpec`], and the sink
//! turns it into a scene object.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Quat, Vec3, Vec4};
use crate::lighting::RayVisibility;
use crate::scene::{LightHandle, MeshHandle};

/// Lamp kinds the lamp tool can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LampType {
    /// Omnidirectional point lamp
    Point,
    /// Cone lamp
    Spot,
    /// Rectangular or elliptical emitter
    Area,
}

impl LampType {
    /// Next type in the POINT -> SPOT -> AREA cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Point => Self::Spot,
            Self::Spot => Self::Area,
            Self::Area => Self::Point,
        }
    }
}

/// Shape of an area lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaShape {
    /// Independent X/Y size
    Rectangle,
    /// Single size
    Square,
    /// Single size
    Disk,
    /// Independent X/Y size
    Ellipse,
}

impl AreaShape {
    /// Square and disk lamps use one size for both axes
    pub fn is_uniform(self) -> bool {
        matches!(self, Self::Square | Self::Disk)
    }
}

/// Sky models a direction can be converted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyModelKind {
    /// Physically based model parameterized by elevation and rotation
    Nishita,
    /// Analytic model taking the raw sun direction
    Preetham,
}

/// Omnidirectional lamp
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// World-space location
    pub location: Vec3,
    /// Soft shadow radius
    pub radius: f32,
    /// Power in watts
    pub energy: f32,
    /// Light color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

/// Cone lamp
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    /// World-space location
    pub location: Vec3,
    /// Orientation; the cone points along local -Z
    pub rotation: Quat,
    /// Full cone angle in radians
    pub spot_size: f32,
    /// Cone edge softness
    pub spot_blend: f32,
    /// Soft shadow radius
    pub radius: f32,
    /// Power in watts
    pub energy: f32,
    /// Light color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

/// Planar emitter
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLight {
    /// World-space center
    pub location: Vec3,
    /// Orientation; emission leaves along local -Z
    pub rotation: Quat,
    /// Outline shape
    pub shape: AreaShape,
    /// Size along local X
    pub size: f32,
    /// Size along local Y (ignored by uniform shapes)
    pub size_y: f32,
    /// Spread angle in radians
    pub spread: f32,
    /// Power in watts
    pub energy: f32,
    /// Light color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

impl AreaLight {
    /// World-space corners of the emitter outline
    pub fn corners(&self) -> [Vec3; 4] {
        let half_x = self.size * 0.5;
        let half_y = if self.shape.is_uniform() { half_x } else { self.size_y * 0.5 };
        [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .map(|(sx, sy)| self.location + self.rotation * Vec3::new(sx * half_x, sy * half_y, 0.0))
    }
}

/// Directional lamp
#[derive(Debug, Clone, PartialEq)]
pub struct SunLight {
    /// Anchor location, only used for display
    pub location: Vec3,
    /// Orientation; light travels along local -Z
    pub rotation: Quat,
    /// Angular diameter in radians
    pub angle: f32,
    /// Strength
    pub energy: f32,
    /// Light color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

impl SunLight {
    /// Direction the light travels
    pub fn direction(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }
}

/// Sun parameters in a sky model's own terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkyParameters {
    /// Physically based sky
    Nishita {
        /// Sun elevation in radians
        sun_elevation: f32,
        /// Sun rotation around the vertical axis in radians
        sun_rotation: f32,
    },
    /// Analytic sky
    Preetham {
        /// Unit direction toward the sun
        sun_direction: Vec3,
    },
}

/// Environment sky driven by a painted sun direction
#[derive(Debug, Clone, PartialEq)]
pub struct SkyTexture {
    /// Model-specific sun parameters
    pub parameters: SkyParameters,
    /// Sun disc size
    pub sun_size: f32,
    /// Sun intensity
    pub intensity: f32,
    /// World ray visibility
    pub visibility: RayVisibility,
}

/// Skinned tube emitter built from stroke polylines
#[derive(Debug, Clone, PartialEq)]
pub struct TubeLight {
    /// Polyline vertices after merging
    pub vertices: Vec<Vec3>,
    /// Polyline edges indexing `vertices`
    pub edges: Vec<[u32; 2]>,
    /// Tube radius
    pub skin_radius: f32,
    /// Subdivision levels before skinning
    pub pre_subdiv: u32,
    /// Subdivision levels after skinning
    pub post_subdiv: u32,
    /// Smooth shading
    pub smooth: bool,
    /// Emission strength
    pub emit_value: f32,
    /// Emission color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

/// Emissive convex hull mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLight {
    /// Point cloud mesh that is hulled
    pub mesh: MeshHandle,
    /// Emission strength
    pub emit_value: f32,
    /// Emission color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

/// Shadow card blocking one light
#[derive(Debug, Clone, PartialEq)]
pub struct FlagCard {
    /// Card geometry
    pub mesh: MeshHandle,
    /// Light the card shadows
    pub light: LightHandle,
    /// Card color
    pub color: Vec4,
    /// Card opacity
    pub opacity: f32,
    /// Ray visibility
    pub visibility: RayVisibility,
}

/// Discriminant of [`LightSpec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Point lamp
    Point,
    /// Spot lamp
    Spot,
    /// Area lamp
    Area,
    /// Sun lamp
    Sun,
    /// Sky texture
    Sky,
    /// Tube light
    Tube,
    /// Mesh light
    Mesh,
    /// Shadow flag
    Flag,
}

/// Everything a derivation can produce
#[derive(Debug, Clone, PartialEq)]
pub enum LightSpec {
    /// Point lamp
    Point(PointLight),
    /// Spot lamp
    Spot(SpotLight),
    /// Area lamp
    Area(AreaLight),
    /// Sun lamp
    Sun(SunLight),
    /// Sky texture
    Sky(SkyTexture),
    /// Tube light
    Tube(TubeLight),
    /// Emissive hull
    Mesh(MeshLight),
    /// Shadow card
    Flag(FlagCard),
}

impl LightSpec {
    /// Kind of light described
    pub fn kind(&self) -> LightKind {
        match self {
            Self::Point(_) => LightKind::Point,
            Self::Spot(_) => LightKind::Spot,
            Self::Area(_) => LightKind::Area,
            Self::Sun(_) => LightKind::Sun,
            Self::Sky(_) => LightKind::Sky,
            Self::Tube(_) => LightKind::Tube,
            Self::Mesh(_) => LightKind::Mesh,
            Self::Flag(_) => LightKind::Flag,
        }
    }

    /// Location of lamp-like lights
    pub fn location(&self) -> Option<Vec3> {
        match self {
            Self::Point(light) => Some(light.location),
            Self::Spot(light) => Some(light.location),
            Self::Area(light) => Some(light.location),
            Self::Sun(light) => Some(light.location),
            _ => None,
        }
    }

    /// Power of lamp-like lights
    pub fn energy(&self) -> Option<f32> {
        match self {
            Self::Point(light) => Some(light.energy),
            Self::Spot(light) => Some(light.energy),
            Self::Area(light) => Some(light.energy),
            Self::Sun(light) => Some(light.energy),
            _ => None,
        }
    }

    /// True for lamps a shadow flag can be placed against
    pub fn is_lamp(&self) -> bool {
        matches!(self, Self::Point(_) | Self::Spot(_) | Self::Area(_) | Self::Sun(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants, Unit};
    use approx::assert_relative_eq;

    #[test]
    fn test_lamp_type_cycle() {
        assert_eq!(LampType::Point.next(), LampType::Spot);
        assert_eq!(LampType::Spot.next(), LampType::Area);
        assert_eq!(LampType::Area.next(), LampType::Point);
    }

    #[test]
    fn test_area_corners_respect_shape_and_rotation() {
        let mut area = AreaLight {
            location: Vec3::new(0.0, 0.0, 2.0),
            rotation: Quat::from_axis_angle(&Unit::new_normalize(Vec3::z()), constants::HALF_PI),
            shape: AreaShape::Rectangle,
            size: 2.0,
            size_y: 1.0,
            spread: constants::PI,
            energy: 10.0,
            color: Vec3::new(1.0, 1.0, 1.0),
            visibility: RayVisibility::all(),
        };
        let corners = area.corners();
        // Local X maps to world Y after a quarter turn
        assert_relative_eq!(corners[0], Vec3::new(0.5, -1.0, 2.0), epsilon = 1e-5);

        area.shape = AreaShape::Square;
        let corners = area.corners();
        assert_relative_eq!(corners[2], Vec3::new(-1.0, 1.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sun_direction_follows_rotation() {
        let sun = SunLight {
            location: Vec3::zeros(),
            rotation: Quat::identity(),
            angle: 0.01,
            energy: 1.0,
            color: Vec3::new(1.0, 1.0, 1.0),
            visibility: RayVisibility::all(),
        };
        assert_relative_eq!(sun.direction(), -Vec3::z());
    }
}
