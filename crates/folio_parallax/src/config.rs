//! Parallax configuration

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown parallax direction name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown parallax direction '{0}' (expected vertical, horizontal, or both)")]
pub struct ParseDirectionError(pub String);

/// Axis a parallax element translates along
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallaxDirection {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

impl ParallaxDirection {
    pub fn is_vertical(&self) -> bool {
        matches!(self, ParallaxDirection::Vertical | ParallaxDirection::Both)
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, ParallaxDirection::Horizontal | ParallaxDirection::Both)
    }
}

impl FromStr for ParallaxDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(ParallaxDirection::Vertical),
            "horizontal" => Ok(ParallaxDirection::Horizontal),
            "both" => Ok(ParallaxDirection::Both),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Per-element parallax configuration
///
/// Every field has a default, so a config deserialized from a partial table
/// (or built from `ParallaxConfig::new(speed)`) is always complete.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Translation magnitude multiplier
    pub speed: f32,
    pub direction: ParallaxDirection,
    /// Grow from 0.8x to 1.2x across the element's traversal
    pub scale: bool,
    /// Fade in towards the middle of the traversal and out after it
    pub opacity: bool,
    /// Tilt around the X and Y axes
    pub rotation: bool,
    /// Simulated distance from the viewer; scales translation, scale depth,
    /// and rotation together
    pub depth: f32,
    /// Per-element progress below which the element is left alone
    pub threshold: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            direction: ParallaxDirection::Vertical,
            scale: false,
            opacity: false,
            rotation: false,
            depth: 1.0,
            threshold: 0.0,
        }
    }
}

impl ParallaxConfig {
    /// Vertical parallax at the given speed, everything else default
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    pub fn direction(mut self, direction: ParallaxDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn scale(mut self, enabled: bool) -> Self {
        self.scale = enabled;
        self
    }

    pub fn opacity(mut self, enabled: bool) -> Self {
        self.opacity = enabled;
        self
    }

    pub fn rotation(mut self, enabled: bool) -> Self {
        self.rotation = enabled;
        self
    }

    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Engine-wide settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum updates per second; `0` disables rate limiting
    pub target_fps: u32,
    /// Elements further than this outside the viewport are not updated
    pub cull_margin: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            cull_margin: 200.0,
        }
    }
}

impl EngineConfig {
    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn cull_margin(mut self, margin: f32) -> Self {
        self.cull_margin = margin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParallaxConfig::new(0.3);
        assert_eq!(config.speed, 0.3);
        assert_eq!(config.direction, ParallaxDirection::Vertical);
        assert!(!config.scale && !config.opacity && !config.rotation);
        assert_eq!(config.depth, 1.0);
        assert_eq!(config.threshold, 0.0);
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let config: ParallaxConfig = toml::from_str(
            r#"
            speed = -0.4
            direction = "both"
            scale = true
            "#,
        )
        .unwrap();

        assert_eq!(config.speed, -0.4);
        assert_eq!(config.direction, ParallaxDirection::Both);
        assert!(config.scale);
        assert!(!config.rotation);
        assert_eq!(config.depth, 1.0);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("Both".parse(), Ok(ParallaxDirection::Both));
        assert_eq!(" horizontal ".parse(), Ok(ParallaxDirection::Horizontal));
        assert_eq!(
            "diagonal".parse::<ParallaxDirection>(),
            Err(ParseDirectionError("diagonal".to_string()))
        );
    }

    #[test]
    fn test_direction_axes() {
        assert!(ParallaxDirection::Both.is_vertical());
        assert!(ParallaxDirection::Both.is_horizontal());
        assert!(!ParallaxDirection::Horizontal.is_vertical());
        assert!(!ParallaxDirection::Vertical.is_horizontal());
    }
}
