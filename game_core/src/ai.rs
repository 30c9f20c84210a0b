//! Computer opponent
//!
//! The brain re-predicts where the ball will meet its paddle plane at most
//! once per prediction interval, and re-rolls its tolerance and speed factor
//! every decision. Leading on score or facing a fast ball makes it sloppier.

use rand::Rng;

use crate::arena::{Arena, Edge};
use crate::components::{Ball, Paddle, PaddleIntent};
use crate::config::Config;
use crate::params::Params;
use crate::resources::GameRng;

/// AI controller state
#[derive(Debug, Clone, PartialEq)]
pub struct AiBrain {
    pub last_prediction_ms: Option<f64>,
    /// Predicted centre along the paddle axis
    pub target: Option<f32>,
    pub tolerance: f32,
    pub speed_factor: f32,
}

/// What the brain may look at when deciding
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    pub ball: &'a Ball,
    pub paddle: &'a Paddle,
    pub arena: &'a Arena,
    /// Own tally advantage over the designated opponent
    pub lead: i64,
    /// Opponent paddle hits since its last speed-up
    pub opponent_hits: u32,
    pub now_ms: f64,
}

impl AiBrain {
    pub fn new(config: &Config) -> Self {
        Self {
            last_prediction_ms: None,
            target: None,
            tolerance: config.ai_tolerance,
            speed_factor: config.ai_speed_factor,
        }
    }

    /// Force a fresh prediction on the next decision (after a serve)
    pub fn forget_prediction(&mut self) {
        self.last_prediction_ms = None;
    }

    /// Produce this frame's intent
    pub fn decide(&mut self, view: &AiView, config: &Config, rng: &mut GameRng) -> PaddleIntent {
        let approaching = is_approaching(view.ball, view.paddle);
        self.tune(approaching, view, config, rng);
        self.refresh_target(approaching, view, config);

        let paddle = view.paddle;
        let target = self
            .target
            .unwrap_or_else(|| paddle.axis.along(view.arena.center()));
        let center = paddle.center_along();
        let step = paddle.speed * self.speed_factor + rng.0.gen::<f32>() * Params::AI_JITTER;

        PaddleIntent {
            increase: center < target - self.tolerance,
            decrease: center > target + self.tolerance,
            step,
            target: None,
        }
    }

    /// Re-roll tolerance and speed factor for the current situation
    pub fn tune(&mut self, approaching: bool, view: &AiView, config: &Config, rng: &mut GameRng) {
        let (tol_lo, tol_hi, factor_lo) = if approaching {
            (0.5, 1.0, config.ai_speed_factor)
        } else {
            (
                1.0,
                2.0,
                (config.ai_speed_factor - Params::AI_RECEDING_SPEED_DROP)
                    .max(Params::AI_MIN_SPEED_FACTOR),
            )
        };
        let tolerance = config.ai_tolerance * lerp(tol_lo, tol_hi, rng.0.gen());
        let factor = lerp(factor_lo.min(1.0), 1.0, rng.0.gen());

        let ease = lead_ratio(view.lead)
            * speed_ratio(view.ball.travel_speed(), view.opponent_hits, config);
        self.tolerance = tolerance * ease;
        self.speed_factor = factor / ease;
    }

    /// Recompute the target if none exists or the interval has elapsed.
    /// Returns whether a new target was taken.
    pub fn refresh_target(&mut self, approaching: bool, view: &AiView, config: &Config) -> bool {
        let due = match self.last_prediction_ms {
            None => true,
            Some(last) => view.now_ms - last > config.prediction_interval_ms,
        };
        if !due {
            return false;
        }

        self.target = Some(if approaching {
            predict_intercept(view.ball, view.paddle, view.arena)
        } else {
            view.paddle.axis.along(view.arena.center())
        });
        self.last_prediction_ms = Some(view.now_ms);
        true
    }
}

/// Whether the ball is heading for the paddle's edge
pub fn is_approaching(ball: &Ball, paddle: &Paddle) -> bool {
    ball.vel.dot(paddle.edge.inward()) < 0.0
}

/// Where along its axis the paddle should be when the ball reaches the
/// paddle plane, folding bounces off the side walls.
pub fn predict_intercept(ball: &Ball, paddle: &Paddle, arena: &Arena) -> f32 {
    let axis = paddle.axis;
    let plane = match paddle.edge {
        Edge::Left | Edge::Top => axis.across(paddle.pos + paddle.size),
        Edge::Right | Edge::Bottom => axis.across(paddle.pos),
    };
    let distance = (plane - axis.across(ball.pos)).abs();
    let closing = axis.across(ball.vel).abs().max(f32::EPSILON);
    let time = distance / closing;

    let raw = axis.along(ball.pos) + axis.along(ball.vel) * time;
    fold(raw, arena.extent(axis))
}

/// Mirror `value` back into `[0, extent]` as if it bounced off both ends
pub fn fold(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let period = extent * 2.0;
    let m = value.rem_euclid(period);
    if m > extent {
        period - m
    } else {
        m
    }
}

/// Ease-off once the AI leads comfortably
pub fn lead_ratio(lead: i64) -> f32 {
    if lead >= Params::AI_LEAD_MARGIN {
        (1.0 + lead as f32 * Params::AI_LEAD_STEP).min(Params::AI_LEAD_CAP)
    } else {
        1.0
    }
}

/// Ease-off against a fast ball, re-evaluated on the opponent's hit cycle
pub fn speed_ratio(ball_speed: f32, opponent_hits: u32, config: &Config) -> f32 {
    let on_cycle = config.hit_limit == 0 || opponent_hits % config.hit_limit == 0;
    if ball_speed > config.speed_limit && on_cycle {
        (1.0 + (ball_speed - config.speed_limit) * Params::AI_SPEED_STEP).min(Params::AI_SPEED_CAP)
    } else {
        1.0
    }
}

fn lerp(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * t
}
