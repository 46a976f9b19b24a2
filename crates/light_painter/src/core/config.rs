//! # Tool Configuration
//!
//! All settings that drive stroke resolution and light inference, grouped per tool.
//! Every struct has defaults matching the interactive tools, builder-style `with_*`
//! setters and a `validate` check that rejects out-of-range values.
//!
//! ## Configuration Categories
//!
//! - **Lamp**: point/spot/area placement, power and shape
//! - **Sun / Sky**: occlusion sampling and sun appearance
//! - **Flag**: shadow card interpolation and appearance
//! - **Mesh / Tube**: emissive hull and skinned tube lights
//! - **Session**: eraser and interaction settings

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::foundation::math::{constants, Vec3, Vec4};
use crate::lighting::{AreaShape, LampType, RayVisibility, SkyModelKind};
use crate::stroke::{AxisMode, StrokeCountMode};

/// Default sun angular diameter in radians
pub const DEFAULT_SUN_ANGLE: f32 = 0.009_180_43;

/// Default sky sun disc size in radians
pub const DEFAULT_SKY_SUN_SIZE: f32 = 0.009_512;

fn white() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

/// # Logging Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter passed to `env_logger` when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// # Lamp Settings
///
/// Placement and appearance of point, spot and area lamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampSettings {
    /// Which lamp the tool creates
    pub lamp_type: LampType,
    /// How stroke normals are derived
    pub axis: AxisMode,
    /// Distance to push the lamp off the painted surface
    pub offset: f32,
    /// Pool all strokes into one lamp or create one per stroke
    pub count_mode: StrokeCountMode,
    /// Soft shadow radius
    pub radius: f32,
    /// Light power (watts), or power at one unit of distance when relative
    pub power: f32,
    /// Scale power with the square of the offset
    pub relative_power: bool,
    /// Light color
    pub color: Vec3,
    /// Spot cone edge softness
    pub spot_blend: f32,
    /// Area lamp shape
    pub area_shape: AreaShape,
    /// Smallest allowed area lamp size on each axis
    pub min_area_size: [f32; 2],
    /// Area lamp spread angle
    pub area_spread: f32,
    /// Ray visibility
    pub visibility: RayVisibility,
}

impl LampSettings {
    /// Create lamp settings for a lamp type
    pub fn new(lamp_type: LampType) -> Self {
        Self {
            lamp_type,
            axis: AxisMode::Normal,
            offset: 1.0,
            count_mode: StrokeCountMode::One,
            radius: 0.1,
            power: 10.0,
            relative_power: false,
            color: white(),
            spot_blend: 0.15,
            area_shape: AreaShape::Rectangle,
            min_area_size: [0.01, 0.01],
            area_spread: constants::PI,
            visibility: RayVisibility::all(),
        }
    }

    /// Set axis mode
    pub fn with_axis(mut self, axis: AxisMode) -> Self {
        self.axis = axis;
        self
    }

    /// Set offset
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// Set power and whether it is distance relative
    pub fn with_power(mut self, power: f32, relative: bool) -> Self {
        self.power = power;
        self.relative_power = relative;
        self
    }

    /// Set area shape
    pub fn with_area_shape(mut self, shape: AreaShape) -> Self {
        self.area_shape = shape;
        self
    }

    /// Set stroke count mode
    pub fn with_count_mode(mut self, mode: StrokeCountMode) -> Self {
        self.count_mode = mode;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.radius < 0.0 {
            return Err("Lamp radius cannot be negative".to_string());
        }
        if self.power < 0.0 {
            return Err("Lamp power cannot be negative".to_string());
        }
        if self.min_area_size.iter().any(|s| *s <= 0.0) {
            return Err("Minimum area size must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.spot_blend) {
            return Err("Spot blend must be within [0, 1]".to_string());
        }
        Ok(())
    }
}

impl Default for LampSettings {
    fn default() -> Self {
        Self::new(LampType::Point)
    }
}

/// # Sun Settings
///
/// Direction solving and appearance of sun lamps. The sky tool shares the
/// sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunSettings {
    /// How stroke normals are derived
    pub axis: AxisMode,
    /// Search for an unoccluded direction instead of the plain average normal
    pub use_occlusion: bool,
    /// Azimuth samples per half circle
    pub longitude_samples: u32,
    /// Elevation samples between the horizon and the clamp
    pub latitude_samples: u32,
    /// Highest elevation considered, in radians
    pub elevation_clamp: f32,
    /// Occlusion ray length
    pub max_distance: f32,
    /// Angular diameter of the sun
    pub angle: f32,
    /// Sun strength
    pub power: f32,
    /// Sun color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

impl SunSettings {
    /// Fewest azimuth samples the solver accepts
    pub const MIN_LONGITUDE_SAMPLES: u32 = 4;
    /// Fewest elevation samples the solver accepts
    pub const MIN_LATITUDE_SAMPLES: u32 = 3;

    /// Create sun settings with defaults
    pub fn new() -> Self {
        Self {
            axis: AxisMode::Normal,
            use_occlusion: true,
            longitude_samples: 6,
            latitude_samples: 6,
            elevation_clamp: 60.0 * constants::DEG_TO_RAD,
            max_distance: f32::INFINITY,
            angle: DEFAULT_SUN_ANGLE,
            power: 1.0,
            color: white(),
            visibility: RayVisibility::all(),
        }
    }

    /// Set sampling resolution
    pub fn with_samples(mut self, longitude: u32, latitude: u32) -> Self {
        self.longitude_samples = longitude;
        self.latitude_samples = latitude;
        self
    }

    /// Set elevation clamp in radians
    pub fn with_elevation_clamp(mut self, clamp: f32) -> Self {
        self.elevation_clamp = clamp;
        self
    }

    /// Enable or disable occlusion solving
    pub fn with_occlusion(mut self, enabled: bool) -> Self {
        self.use_occlusion = enabled;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.longitude_samples < Self::MIN_LONGITUDE_SAMPLES {
            return Err(format!("Longitude samples must be at least {}", Self::MIN_LONGITUDE_SAMPLES));
        }
        if self.latitude_samples < Self::MIN_LATITUDE_SAMPLES {
            return Err(format!("Latitude samples must be at least {}", Self::MIN_LATITUDE_SAMPLES));
        }
        if !(0.0..=constants::HALF_PI).contains(&self.elevation_clamp) {
            return Err("Elevation clamp must be within [0, pi/2]".to_string());
        }
        if self.max_distance <= 0.0 {
            return Err("Occlusion distance must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for SunSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Sky Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkySettings {
    /// Sky model the direction is converted for
    pub model: SkyModelKind,
    /// Size of the sun disc
    pub sun_size: f32,
    /// Sun intensity
    pub intensity: f32,
    /// World ray visibility
    pub visibility: RayVisibility,
}

impl SkySettings {
    /// Set the sky model
    pub fn with_model(mut self, model: SkyModelKind) -> Self {
        self.model = model;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.sun_size < 0.0 || self.intensity < 0.0 {
            return Err("Sky sun size and intensity cannot be negative".to_string());
        }
        Ok(())
    }
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            model: SkyModelKind::Nishita,
            sun_size: DEFAULT_SKY_SUN_SIZE,
            intensity: 1.0,
            visibility: RayVisibility::all(),
        }
    }
}

/// # Flag Settings
///
/// Placement of shadow cards between selected lights and the painted patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagSettings {
    /// Position between light (0) and surface (1)
    pub factor: f32,
    /// Distance from the surface toward a sun lamp
    pub sun_offset: f32,
    /// Card color
    pub color: Vec4,
    /// Card opacity
    pub opacity: f32,
    /// Ray visibility
    pub visibility: RayVisibility,
}

impl FlagSettings {
    /// Smallest accepted factor
    pub const MIN_FACTOR: f32 = 0.0001;

    /// Set the interpolation factor, clamped to the accepted range
    pub fn with_factor(mut self, factor: f32) -> Self {
        self.factor = factor.clamp(Self::MIN_FACTOR, 1.0);
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_FACTOR..=1.0).contains(&self.factor) {
            return Err("Flag factor must be within [0.0001, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err("Flag opacity must be within [0, 1]".to_string());
        }
        Ok(())
    }
}

impl Default for FlagSettings {
    fn default() -> Self {
        Self {
            factor: 0.5,
            sun_offset: 1.0,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            opacity: 1.0,
            visibility: RayVisibility::all(),
        }
    }
}

/// # Mesh Light Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// How stroke normals are derived
    pub axis: AxisMode,
    /// Distance to push the hull off the painted surface
    pub offset: f32,
    /// Flatten points against the average normal before hulling
    pub flatten: bool,
    /// Emission strength
    pub emit_value: f32,
    /// Emission color
    pub color: Vec3,
    /// Ray visibility
    pub visibility: RayVisibility,
}

impl MeshSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.emit_value < 0.0 {
            return Err("Emission cannot be negative".to_string());
        }
        Ok(())
    }
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            axis: AxisMode::Normal,
            offset: 0.0,
            flatten: true,
            emit_value: 2.0,
            color: white(),
            visibility: RayVisibility::all(),
        }
    }
}

/// # Tube Light Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeSettings {
    /// How stroke normals are derived
    pub axis: AxisMode,
    /// Distance to push the tube off the painted surface
    pub offset: f32,
    /// Vertices closer than this are merged
    pub merge_distance: f32,
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

impl TubeSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.merge_distance < 0.0 {
            return Err("Merge distance cannot be negative".to_string());
        }
        if self.skin_radius <= 0.0 {
            return Err("Skin radius must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for TubeSettings {
    fn default() -> Self {
        Self {
            axis: AxisMode::Normal,
            offset: 0.0,
            merge_distance: 0.05,
            skin_radius: 0.1,
            pre_subdiv: 2,
            post_subdiv: 2,
            smooth: true,
            emit_value: 2.0,
            color: white(),
            visibility: RayVisibility::all(),
        }
    }
}

/// # Session Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Initial eraser radius
    pub eraser_radius: f32,
    /// Eraser radius change per key press
    pub eraser_step: f32,
    /// Smallest eraser radius
    pub eraser_min: f32,
    /// World distance covered by one unit of eraser radius
    pub eraser_units_per_pixel: f32,
}

impl SessionSettings {
    /// Eraser radius in world units
    pub fn eraser_world_radius(&self, radius: f32) -> f32 {
        radius * self.eraser_units_per_pixel
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.eraser_min <= 0.0 || self.eraser_radius < self.eraser_min {
            return Err("Eraser radius must be at least the positive minimum".to_string());
        }
        if self.eraser_units_per_pixel <= 0.0 {
            return Err("Eraser scale must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            eraser_radius: 50.0,
            eraser_step: 10.0,
            eraser_min: 10.0,
            eraser_units_per_pixel: 0.01,
        }
    }
}

/// # Complete Painter Configuration
///
/// Top-level configuration holding every tool's settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Point/spot/area lamp tool
    pub lamp: LampSettings,
    /// Sun tool, also used for sky sampling
    pub sun: SunSettings,
    /// Sky tool
    pub sky: SkySettings,
    /// Flag tool
    pub flag: FlagSettings,
    /// Mesh light tool
    pub mesh: MeshSettings,
    /// Tube light tool
    pub tube: TubeSettings,
    /// Interactive session
    pub session: SessionSettings,
}

impl PainterConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.lamp.validate()?;
        self.sun.validate()?;
        self.sky.validate()?;
        self.flag.validate()?;
        self.mesh.validate()?;
        self.tube.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Config for PainterConfig {}
