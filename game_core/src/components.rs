use glam::Vec2;
use rand::Rng;

use crate::ai::AiBrain;
use crate::arena::{Axis, Edge, PaddlePlacement};
use crate::config::Config;
use crate::params::Params;
use crate::resources::GameRng;

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Speed on the primary axis, reset on every serve
    pub pace: f32,
    pub serve_speed: f32,
    pub multiplier: f32,
    pub pace_cap: f32,
}

impl Ball {
    /// Kick-off ball: centred, moving diagonally at the configured speed
    pub fn new(pos: Vec2, config: &Config) -> Self {
        Self {
            pos,
            vel: Vec2::splat(config.ball_speed),
            radius: config.ball_radius,
            pace: config.ball_speed,
            serve_speed: config.ball_speed,
            multiplier: config.speed_multiplier,
            pace_cap: config.pace_cap(),
        }
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Re-centre with a random side and a small random angle
    pub fn serve(&mut self, center: Vec2, rng: &mut GameRng) {
        self.pos = center;
        self.pace = self.serve_speed;

        let dx = if rng.0.gen_bool(0.5) {
            self.serve_speed
        } else {
            -self.serve_speed
        };
        let angle = rng
            .0
            .gen_range(-Params::SERVE_ANGLE_SPREAD..Params::SERVE_ANGLE_SPREAD);
        let mut dy = angle.sin() * self.serve_speed;
        if dy.abs() < Params::MIN_SERVE_SPIN {
            dy = if dy < 0.0 {
                -Params::MIN_SERVE_SPIN
            } else {
                Params::MIN_SERVE_SPIN
            };
        }
        self.vel = Vec2::new(dx, dy);
    }

    /// Multiply velocity by the per-hit multiplier, up to the pace cap.
    /// Returns whether the pace changed.
    pub fn speed_up(&mut self) -> bool {
        let next = (self.pace * self.multiplier).min(self.pace_cap);
        if next <= self.pace {
            return false;
        }
        self.vel *= next / self.pace;
        self.pace = next;
        true
    }

    /// Manhattan speed, the measure the AI reacts to
    pub fn travel_speed(&self) -> f32 {
        self.vel.x.abs() + self.vel.y.abs()
    }
}

/// Paddle component - one contestant's paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub slot: u8,
    pub edge: Edge,
    pub axis: Axis,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Paddle {
    pub fn new(slot: u8, placement: PaddlePlacement, speed: f32) -> Self {
        Self {
            slot,
            edge: placement.edge,
            axis: placement.axis,
            pos: placement.pos,
            size: placement.size,
            speed,
        }
    }

    /// Length along the movement axis
    pub fn extent(&self) -> f32 {
        self.axis.along(self.size)
    }

    /// Position along the movement axis
    pub fn offset(&self) -> f32 {
        self.axis.along(self.pos)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Centre coordinate along the movement axis
    pub fn center_along(&self) -> f32 {
        self.offset() + self.extent() / 2.0
    }

    /// Set the axis offset, clamped to `[0, limit - extent]`
    pub fn set_offset(&mut self, offset: f32, limit: f32) {
        let max = (limit - self.extent()).max(0.0);
        let offset = offset.clamp(0.0, max);
        match self.axis {
            Axis::Vertical => self.pos.y = offset,
            Axis::Horizontal => self.pos.x = offset,
        }
    }

    /// Axis-aligned box vs circle
    pub fn touches(&self, center: Vec2, radius: f32) -> bool {
        let max = self.pos + self.size;
        let closest = center.clamp(self.pos, max);
        (center - closest).length_squared() <= radius * radius
    }
}

/// Movement intent for a paddle, produced by a human or the computer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddleIntent {
    pub increase: bool,
    pub decrease: bool,
    /// Distance to travel this frame
    pub step: f32,
    /// Absolute centre to jump to (touch input)
    pub target: Option<f32>,
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed displacement along the axis
    pub fn delta(&self) -> f32 {
        match (self.increase, self.decrease) {
            (true, false) => self.step,
            (false, true) => -self.step,
            _ => 0.0,
        }
    }
}

/// Contestant component - who owns a paddle and how they are doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contestant {
    pub name: String,
    pub score: u32,
    /// Paddle hits since the last speed-up
    pub hits: u32,
}

impl Contestant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            hits: 0,
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.hits = 0;
    }
}

/// Where a paddle's intents come from
#[derive(Debug, Clone)]
pub enum Controller {
    Human,
    Computer(AiBrain),
}

impl Controller {
    pub fn is_computer(&self) -> bool {
        matches!(self, Controller::Computer(_))
    }
}
