use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::Params;

/// Coarse display-size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeTier {
    Xs,
    S,
    M,
    L,
}

impl SizeTier {
    /// Pick a tier from the viewport width in CSS pixels
    pub fn from_viewport_width(width: f32) -> Self {
        if width > 1000.0 {
            SizeTier::L
        } else if width > 600.0 {
            SizeTier::M
        } else if width > 390.0 {
            SizeTier::S
        } else {
            SizeTier::Xs
        }
    }

    /// Canvas size the browser host allocates for this tier
    pub fn canvas_size(self) -> (f32, f32) {
        match self {
            SizeTier::Xs => (300.0, 200.0),
            SizeTier::S => (350.0, 300.0),
            SizeTier::M => (600.0, 450.0),
            SizeTier::L => (800.0, 600.0),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "xs" => Some(SizeTier::Xs),
            "s" => Some(SizeTier::S),
            "m" => Some(SizeTier::M),
            "l" => Some(SizeTier::L),
            _ => None,
        }
    }
}

/// Game configuration
///
/// Velocities are in pixels per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub player_speed: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub speed_multiplier: f32,
    pub max_pace_factor: f32,
    pub hit_limit: u32,
    pub hit_deflection: f32,
    pub speed_limit: f32,
    pub ai_speed_factor: f32,
    pub ai_tolerance: f32,
    pub prediction_interval_ms: f64,
    pub countdown_seconds: u32,
    pub win_score: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_tier(SizeTier::L)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings bundle for a display tier, arena sized to the tier's canvas
    pub fn for_tier(tier: SizeTier) -> Self {
        // ball speed, radius, paddle w/h, player speed, ai factor/tolerance, multiplier, speed limit
        let (ball_speed, ball_radius, paddle_width, paddle_height, player_speed) = match tier {
            SizeTier::Xs => (2.5, 5.0, 5.0, 50.0, 2.5),
            SizeTier::S => (3.5, 6.5, 6.0, 60.0, 3.0),
            SizeTier::M => (4.5, 8.0, 8.0, 80.0, 4.0),
            SizeTier::L => (5.0, 10.0, 10.0, 100.0, 5.0),
        };
        let (ai_speed_factor, ai_tolerance, speed_multiplier, speed_limit) = match tier {
            SizeTier::Xs => (0.3, 15.0, 1.02, 2.5),
            SizeTier::S => (0.4, 20.0, 1.03, 3.0),
            SizeTier::M => (0.6, 35.0, 1.06, 4.0),
            SizeTier::L => (0.7, 50.0, 1.1, 5.0),
        };
        let (arena_width, arena_height) = tier.canvas_size();

        Self {
            arena_width,
            arena_height,
            paddle_width,
            paddle_height,
            player_speed,
            ball_radius,
            ball_speed,
            speed_multiplier,
            max_pace_factor: Params::MAX_PACE_FACTOR,
            hit_limit: Params::HIT_LIMIT,
            hit_deflection: Params::HIT_DEFLECTION,
            speed_limit,
            ai_speed_factor,
            ai_tolerance,
            prediction_interval_ms: Params::PREDICTION_INTERVAL_MS,
            countdown_seconds: Params::COUNTDOWN_SECONDS,
            win_score: Params::WIN_SCORE,
        }
    }

    /// Resize the simulated arena to the render surface
    pub fn with_arena(mut self, width: f32, height: f32) -> Self {
        self.arena_width = width;
        self.arena_height = height;
        self
    }

    /// Load a configuration from JSON; missing fields take the large-tier defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Highest pace a ball may reach after repeated speed-ups
    pub fn pace_cap(&self) -> f32 {
        self.ball_speed * self.max_pace_factor
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_viewport_width() {
        assert_eq!(SizeTier::from_viewport_width(1280.0), SizeTier::L);
        assert_eq!(SizeTier::from_viewport_width(1000.0), SizeTier::M);
        assert_eq!(SizeTier::from_viewport_width(601.0), SizeTier::M);
        assert_eq!(SizeTier::from_viewport_width(600.0), SizeTier::S);
        assert_eq!(SizeTier::from_viewport_width(390.0), SizeTier::Xs);
    }

    #[test]
    fn test_large_tier_matches_default() {
        let config = Config::new();
        assert_eq!(config, Config::for_tier(SizeTier::L));
        assert_eq!(config.ball_speed, 5.0);
        assert_eq!(config.paddle_height, 100.0);
        assert_eq!(config.win_score, 4, "First to 4");
        assert_eq!((config.arena_width, config.arena_height), (800.0, 600.0));
    }

    #[test]
    fn test_small_tiers_are_slower() {
        let xs = Config::for_tier(SizeTier::Xs);
        let m = Config::for_tier(SizeTier::M);
        assert!(xs.ball_speed < m.ball_speed);
        assert!(xs.ai_tolerance < m.ai_tolerance);
        assert_eq!(xs.hit_limit, 3);
        assert_eq!(m.speed_multiplier, 1.06);
    }

    #[test]
    fn test_with_arena_overrides_size_only() {
        let config = Config::for_tier(SizeTier::M).with_arena(640.0, 480.0);
        assert_eq!(config.center(), glam::Vec2::new(320.0, 240.0));
        assert_eq!(config.ball_radius, 8.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "win_score": 2, "ball_speed": 7.5 }"#).unwrap();
        assert_eq!(config.win_score, 2);
        assert_eq!(config.ball_speed, 7.5);
        assert_eq!(config.paddle_height, 100.0);

        let err = Config::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
