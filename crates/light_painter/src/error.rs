//! Error types for stroke resolution and light inference

use thiserror::Error;

/// Errors raised while turning painted strokes into lights
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    /// The stroke normals cancel out, so no average direction exists
    #[error("Average of normals results in a zero vector - unable to calculate average direction!")]
    DegenerateNormal,

    /// The occlusion solver had no candidate facing the painted surfaces
    #[error("No valid sun direction found - add more samples or raise the elevation clamp!")]
    NoValidDirection,

    /// Rim lighting needs a scene camera
    #[error("Set a camera for your scene to use rim lighting!")]
    MissingCamera,

    /// The command needs objects selected beforehand
    #[error("{0}")]
    InvalidSelection(String),

    /// Nothing has been painted yet
    #[error("No strokes to build lights from")]
    NoStrokes,

    /// A serialized stroke path could not be parsed
    #[error("Invalid stroke path: {0}")]
    InvalidStrokePath(String),

    /// A handle no longer refers to a scene object
    #[error("Scene object not found: {0}")]
    MissingObject(String),
}

impl PaintError {
    /// Recoverable errors are reported and handled by a fallback; the rest abort the command.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DegenerateNormal | Self::NoValidDirection)
    }
}

/// Result alias used throughout the crate
pub type PaintResult<T> = Result<T, PaintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(PaintError::DegenerateNormal.is_recoverable());
        assert!(PaintError::NoValidDirection.is_recoverable());
        assert!(!PaintError::MissingCamera.is_recoverable());
        assert!(!PaintError::InvalidSelection("x".into()).is_recoverable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            PaintError::MissingCamera.to_string(),
            "Set a camera for your scene to use rim lighting!"
        );
    }
}
