//! Per-ray visibility of created lights

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which ray types see a created light or emissive object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RayVisibility: u8 {
        /// Directly visible to the camera
        const CAMERA = 1 << 0;
        /// Contributes to diffuse bounces
        const DIFFUSE = 1 << 1;
        /// Contributes to specular reflections
        const SPECULAR = 1 << 2;
        /// Scatters in volumes
        const VOLUME = 1 << 3;
    }
}

impl Default for RayVisibility {
    fn default() -> Self {
        Self::all()
    }
}

impl RayVisibility {
    /// Lamp multiplier for one ray type: 1.0 when visible, 0.0 otherwise
    pub fn factor(self, ray: Self) -> f32 {
        if self.contains(ray) { 1.0 } else { 0.0 }
    }

    /// Diffuse lamp multiplier
    pub fn diffuse_factor(self) -> f32 {
        self.factor(Self::DIFFUSE)
    }

    /// Specular lamp multiplier
    pub fn specular_factor(self) -> f32 {
        self.factor(Self::SPECULAR)
    }

    /// Volume lamp multiplier
    pub fn volume_factor(self) -> f32 {
        self.factor(Self::VOLUME)
    }

    /// Copy with one ray type flipped
    #[must_use]
    pub fn toggled(self, ray: Self) -> Self {
        self ^ ray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_factors() {
        let vis = RayVisibility::default().toggled(RayVisibility::SPECULAR);
        assert!(!vis.contains(RayVisibility::SPECULAR));
        assert_eq!(vis.specular_factor(), 0.0);
        assert_eq!(vis.diffuse_factor(), 1.0);
        assert_eq!(vis.toggled(RayVisibility::SPECULAR), RayVisibility::all());
    }
}
