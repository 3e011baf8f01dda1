//! Error types for Ring Burst.
//!
//! The simulation itself cannot fail. Errors only come from acquiring a
//! drawing surface at startup and from loading tuning files.

use std::fmt;

/// Errors that can occur while acquiring a drawing surface.
///
/// These are fatal: the simulation cannot run without somewhere to draw.
#[derive(Debug)]
pub enum SurfaceError {
    /// No canvas element with the given id exists.
    CanvasNotFound(String),
    /// The canvas exists but refused to hand out a 2D context.
    ContextUnavailable,
    /// The host platform failed in some other way (window, document, ...).
    Platform(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::CanvasNotFound(id) => write!(f, "Canvas element '{}' not found", id),
            SurfaceError::ContextUnavailable => write!(f, "2D drawing context is unavailable"),
            SurfaceError::Platform(msg) => write!(f, "Platform error: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Errors that can occur while loading settings.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the settings file.
    Io(std::io::Error),
    /// Settings file is not valid JSON for [`crate::Settings`].
    Parse(serde_json::Error),
    /// Settings parsed but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read settings: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse settings: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_surface_error_display() {
        let err = SurfaceError::CanvasNotFound("canvas".to_string());
        assert_eq!(err.to_string(), "Canvas element 'canvas' not found");
    }

    #[test]
    fn test_config_error_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(err.source().is_some());
        assert!(ConfigError::Invalid("x".into()).source().is_none());
    }
}
