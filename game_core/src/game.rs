//! One match, from countdown to decision
//!
//! [`MatchContext`] owns the world for a single match. Browser hosts call
//! [`MatchContext::frame`] once per animation frame; native hosts hand a
//! [`MatchDriver`] to [`run_match`], which loops until the match resolves.

use glam::Vec2;
use hecs::{Entity, World};
use proto::MatchRecord;
use std::fmt;

use crate::ai::AiBrain;
use crate::arena::{Arena, ScoreKind};
use crate::components::{Ball, Contestant, Controller, Paddle};
use crate::config::Config;
use crate::host::{keys, CancelToken, Localizer, RenderSurface, TextSize};
use crate::input::{InputState, KeyBindings};
use crate::params::Params;
use crate::phase::{MatchFsm, MatchPhase, PhaseEvent};
use crate::resources::{Events, GameRng, GoalEvent, Time};
use crate::{spawn_ball, spawn_paddle, step};

/// Distance from a paddle to its countdown hint and score label
const LABEL_INSET: f32 = 60.0;

/// A named contestant and who steers them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    pub name: String,
    pub computer: bool,
}

impl Entrant {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            computer: false,
        }
    }

    pub fn computer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            computer: true,
        }
    }
}

/// Everything needed to start a match
#[derive(Debug, Clone)]
pub struct MatchSetup {
    pub entrants: Vec<Entrant>,
    pub in_tournament: bool,
    pub seed: u64,
}

impl MatchSetup {
    /// Human contestants; a lone name is paired with a computer opponent
    pub fn humans<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entrants: names.into_iter().map(Entrant::human).collect(),
            in_tournament: false,
            seed: 0,
        }
    }

    /// Every contestant steered by the computer
    pub fn computers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entrants: names.into_iter().map(Entrant::computer).collect(),
            in_tournament: false,
            seed: 0,
        }
    }

    pub fn in_tournament(mut self, in_tournament: bool) -> Self {
        self.in_tournament = in_tournament;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Entrants in slot order, including the computer stand-in for solo play
    pub fn roster(&self) -> Result<Vec<Entrant>, MatchError> {
        let count = self.entrants.len();
        if count == 0 || count > Params::MAX_CONTESTANTS {
            return Err(MatchError::InvalidRoster { count });
        }

        let mut roster = self.entrants.clone();
        if count == 1 {
            if roster[0].name == Params::COMPUTER_NAME && !roster[0].computer {
                roster[0].name = format!("{} (Player)", Params::COMPUTER_NAME);
            }
            roster.push(Entrant::computer(Params::COMPUTER_NAME));
        }
        Ok(roster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The render surface reported no drawable area
    NoSurface,
    InvalidRoster { count: usize },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NoSurface => write!(f, "no render surface available"),
            MatchError::InvalidRoster { count } => write!(
                f,
                "a match needs 1 to {} contestants, got {}",
                Params::MAX_CONTESTANTS,
                count
            ),
        }
    }
}

impl std::error::Error for MatchError {}

/// One contestant's final line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub slot: u8,
    pub name: String,
    pub score: u32,
    pub computer: bool,
}

/// A decided match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub standings: Vec<Standing>,
    pub kind: ScoreKind,
    /// Slot whose tally reached the winning score
    pub decided: u8,
    pub goals: Vec<GoalEvent>,
}

impl MatchResult {
    fn name_of(&self, slot: u8) -> &str {
        self.standings
            .iter()
            .find(|s| s.slot == slot)
            .map(|s| s.name.as_str())
            .unwrap_or_default()
    }

    /// The winner of a two-paddle match; multi-paddle matches only eliminate
    pub fn winner(&self) -> Option<&str> {
        match self.kind {
            ScoreKind::PointsFor => Some(self.name_of(self.decided)),
            ScoreKind::GoalsAgainst => None,
        }
    }

    /// The contestant this match knocks out
    pub fn loser(&self) -> &str {
        match self.kind {
            ScoreKind::PointsFor => self
                .standings
                .iter()
                .find(|s| s.slot != self.decided)
                .map(|s| s.name.as_str())
                .unwrap_or_default(),
            ScoreKind::GoalsAgainst => self.name_of(self.decided),
        }
    }

    /// History record for a two-paddle match
    pub fn record(&self) -> Option<MatchRecord> {
        let winner = self.winner()?;
        match self.standings.as_slice() {
            [first, second] => Some(MatchRecord {
                player1: first.name.clone(),
                player2: second.name.clone(),
                player1_score: first.score,
                player2_score: second.score,
                winner: winner.to_string(),
            }),
            _ => None,
        }
    }
}

/// How a match resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Decided(MatchResult),
    /// Cancelled, or never started
    Void,
}

impl Outcome {
    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            Outcome::Decided(result) => Some(result),
            Outcome::Void => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Finished(Outcome),
}

/// A single match's state, passed explicitly to every system
pub struct MatchContext {
    world: World,
    ball: Entity,
    paddles: Vec<Entity>,
    entrants: Vec<Entrant>,
    arena: Arena,
    config: Config,
    rng: GameRng,
    time: Time,
    events: Events,
    fsm: MatchFsm,
    countdown_started_ms: Option<f64>,
    in_tournament: bool,
    goals: Vec<GoalEvent>,
    decided: Option<u8>,
    frames: u64,
}

impl MatchContext {
    /// Build a match sized to the render surface
    pub fn new(setup: MatchSetup, config: Config, surface: (f32, f32)) -> Result<Self, MatchError> {
        let (width, height) = surface;
        if width <= 0.0 || height <= 0.0 {
            return Err(MatchError::NoSurface);
        }
        let entrants = setup.roster()?;
        let config = config.with_arena(width, height);
        let arena = Arena::new(&config, entrants.len());

        let mut world = World::new();
        let ball = spawn_ball(&mut world, &arena, &config);
        let paddles = entrants
            .iter()
            .enumerate()
            .map(|(slot, entrant)| {
                let controller = if entrant.computer {
                    Controller::Computer(AiBrain::new(&config))
                } else {
                    Controller::Human
                };
                spawn_paddle(
                    &mut world,
                    &arena,
                    &config,
                    slot as u8,
                    entrant.name.clone(),
                    controller,
                )
            })
            .collect();

        tracing::info!(
            contestants = ?entrants.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            width,
            height,
            tournament = setup.in_tournament,
            "match created"
        );

        Ok(Self {
            world,
            ball,
            paddles,
            entrants,
            arena,
            config,
            rng: GameRng::new(setup.seed),
            time: Time::default(),
            events: Events::new(),
            fsm: MatchFsm::new(),
            countdown_started_ms: None,
            in_tournament: setup.in_tournament,
            goals: Vec::new(),
            decided: None,
            frames: 0,
        })
    }

    /// Advance the match by one host frame
    pub fn frame(&mut self, input: &InputState, now_ms: f64, cancel: &CancelToken) -> FrameStatus {
        if let Some(outcome) = self.outcome() {
            return FrameStatus::Finished(outcome);
        }
        if cancel.is_cancelled() {
            self.fsm.transition(PhaseEvent::Cancel);
            tracing::info!(frames = self.frames, "match cancelled");
            return FrameStatus::Finished(Outcome::Void);
        }

        self.time.advance_to(now_ms);
        match self.fsm.phase() {
            MatchPhase::Countdown => {
                let started = *self.countdown_started_ms.get_or_insert(now_ms);
                let length = f64::from(self.config.countdown_seconds) * 1000.0;
                if now_ms - started >= length {
                    self.fsm.transition(PhaseEvent::CountdownDone);
                }
                FrameStatus::Continue
            }
            MatchPhase::Running => self.run_frame(input),
            _ => FrameStatus::Continue,
        }
    }

    fn run_frame(&mut self, input: &InputState) -> FrameStatus {
        self.frames += 1;
        let outcome = step(
            &mut self.world,
            &self.arena,
            &self.config,
            input,
            &self.time,
            &mut self.events,
            &mut self.rng,
        );
        self.goals.extend(self.events.goals.iter().copied());

        if outcome.goal.is_none() {
            return FrameStatus::Continue;
        }
        self.fsm.transition(PhaseEvent::Goal);

        match outcome.reached {
            Some(slot) => {
                self.decided = Some(slot);
                self.fsm.transition(PhaseEvent::Decided);
                match self.result() {
                    Some(result) => {
                        tracing::info!(
                            decided = slot,
                            winner = result.winner().unwrap_or("-"),
                            loser = result.loser(),
                            frames = self.frames,
                            "match over"
                        );
                        FrameStatus::Finished(Outcome::Decided(result))
                    }
                    None => FrameStatus::Finished(Outcome::Void),
                }
            }
            None => {
                self.fsm.transition(PhaseEvent::Serve);
                FrameStatus::Continue
            }
        }
    }

    /// Reset scores, paddles, ball and computer brains, then count down again
    pub fn rematch(&mut self) -> bool {
        if !self.fsm.can_transition(PhaseEvent::Rematch) {
            return false;
        }
        for (_e, contestant) in self.world.query_mut::<&mut Contestant>() {
            contestant.reset();
        }
        for (_e, (paddle, controller)) in self.world.query_mut::<(&mut Paddle, &mut Controller)>() {
            let placement = self.arena.paddle_placement(paddle.slot, &self.config);
            *paddle = Paddle::new(paddle.slot, placement, self.config.player_speed);
            if let Controller::Computer(brain) = controller {
                *brain = AiBrain::new(&self.config);
            }
        }
        if let Ok(mut ball) = self.world.get::<&mut Ball>(self.ball) {
            *ball = Ball::new(self.arena.center(), &self.config);
        }
        self.goals.clear();
        self.events.clear();
        self.decided = None;
        self.countdown_started_ms = None;
        self.fsm.transition(PhaseEvent::Rematch);
        tracing::info!("rematch");
        true
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.fsm.phase() {
            MatchPhase::Cancelled => Some(Outcome::Void),
            MatchPhase::GameOver => Some(
                self.result()
                    .map(Outcome::Decided)
                    .unwrap_or(Outcome::Void),
            ),
            _ => None,
        }
    }

    /// Final standings once a slot reached the winning score
    pub fn result(&self) -> Option<MatchResult> {
        let decided = self.decided?;
        Some(MatchResult {
            standings: self.standings(),
            kind: self.arena.kind,
            decided,
            goals: self.goals.clone(),
        })
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.entrants
            .iter()
            .enumerate()
            .map(|(slot, entrant)| Standing {
                slot: slot as u8,
                name: entrant.name.clone(),
                score: self.contestant(slot as u8).map(|c| c.score).unwrap_or(0),
                computer: entrant.computer,
            })
            .collect()
    }

    pub fn phase(&self) -> MatchPhase {
        self.fsm.phase()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    /// Every goal credited this match, in order
    pub fn goals(&self) -> &[GoalEvent] {
        &self.goals
    }

    /// Simulation frames run (countdown excluded)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn in_tournament(&self) -> bool {
        self.in_tournament
    }

    pub fn ball(&self) -> Option<Ball> {
        self.world.get::<&Ball>(self.ball).ok().map(|b| *b)
    }

    pub fn paddle(&self, slot: u8) -> Option<Paddle> {
        let entity = *self.paddles.get(slot as usize)?;
        self.world.get::<&Paddle>(entity).ok().map(|p| *p)
    }

    pub fn contestant(&self, slot: u8) -> Option<Contestant> {
        let entity = *self.paddles.get(slot as usize)?;
        self.world
            .get::<&Contestant>(entity)
            .ok()
            .map(|c| (*c).clone())
    }

    pub fn controller(&self, slot: u8) -> Option<Controller> {
        let entity = *self.paddles.get(slot as usize)?;
        self.world
            .get::<&Controller>(entity)
            .ok()
            .map(|c| (*c).clone())
    }

    /// Direct world access for hosts that stage positions (tests, replays)
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn ball_entity(&self) -> Entity {
        self.ball
    }

    /// Whole seconds left on the countdown display (2, 1, 0)
    pub fn countdown_label(&self) -> u32 {
        let seconds = self.config.countdown_seconds;
        let elapsed = match self.countdown_started_ms {
            Some(started) => ((self.time.now_ms - started) / 1000.0).max(0.0) as u32,
            None => 0,
        };
        seconds.saturating_sub(1).saturating_sub(elapsed)
    }

    /// Draw the current phase
    pub fn render(&self, surface: &mut dyn RenderSurface, lang: &dyn Localizer) {
        let center = self.arena.center();
        surface.clear();
        surface.background();

        match self.fsm.phase() {
            MatchPhase::Countdown => {
                for (slot, entrant) in self.entrants.iter().enumerate() {
                    if entrant.computer {
                        continue;
                    }
                    if let Some(paddle) = self.paddle(slot as u8) {
                        let at = paddle.center() + paddle.edge.inward() * LABEL_INSET;
                        let hint = KeyBindings::for_slot(slot as u8).label;
                        surface.text(&format!("{} ({})", entrant.name, hint), at, TextSize::Small);
                    }
                }
                let label = format!("{} {}", lang.translate(keys::COUNTDOWN), self.countdown_label());
                surface.text(&label, center, TextSize::Large);
            }
            MatchPhase::Running | MatchPhase::Scoring => {
                surface.dashed_line(
                    Vec2::new(center.x, 0.0),
                    Vec2::new(center.x, self.arena.height),
                );
                if let Some(ball) = self.ball() {
                    surface.circle(ball.pos, ball.radius);
                }
                for slot in 0..self.paddles.len() as u8 {
                    let (Some(paddle), Some(contestant)) = (self.paddle(slot), self.contestant(slot))
                    else {
                        continue;
                    };
                    surface.rect(paddle.pos, paddle.size);
                    let at = paddle.center() + paddle.edge.inward() * LABEL_INSET;
                    let line = format!("{}: {}", contestant.name, contestant.score);
                    surface.text(&line, at, TextSize::Small);
                }
            }
            MatchPhase::GameOver => {
                if let Some(result) = self.result() {
                    let line = match result.winner() {
                        Some(winner) => format!("{} {}", winner, lang.translate(keys::WINNER_SINGLE)),
                        None => format!("{} {}", result.loser(), lang.translate(keys::WINNER_LOSE)),
                    };
                    surface.text(&line, center, TextSize::Large);
                }
                if !self.in_tournament {
                    let below = center + Vec2::new(0.0, 40.0);
                    surface.text(&lang.translate(keys::RESTART), below, TextSize::Medium);
                }
            }
            MatchPhase::Cancelled => {
                surface.text(&lang.translate(keys::CANCELLED), center, TextSize::Medium);
            }
        }
    }
}

/// Supplies clock, input and presentation to [`run_match`]
pub trait MatchDriver {
    fn now_ms(&mut self) -> f64;

    fn input(&mut self, _ctx: &MatchContext) -> InputState {
        InputState::new()
    }

    fn present(&mut self, _ctx: &MatchContext) {}
}

/// A clock that advances one 60 Hz frame per call
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    pub now_ms: f64,
    pub step_ms: f64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            step_ms: Params::FRAME_MS,
        }
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchDriver for FixedStep {
    fn now_ms(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }
}

/// Run frames until the match is decided or cancelled
pub fn run_match(ctx: &mut MatchContext, driver: &mut dyn MatchDriver, cancel: &CancelToken) -> Outcome {
    loop {
        let input = driver.input(ctx);
        let now_ms = driver.now_ms();
        let status = ctx.frame(&input, now_ms, cancel);
        driver.present(ctx);
        if let FrameStatus::Finished(outcome) = status {
            return outcome;
        }
    }
}

/// Build and run a match; a missing surface or bad roster yields a void outcome
pub fn play_match(
    setup: MatchSetup,
    config: Config,
    surface: (f32, f32),
    driver: &mut dyn MatchDriver,
    cancel: &CancelToken,
) -> Outcome {
    match MatchContext::new(setup, config, surface) {
        Ok(mut ctx) => run_match(&mut ctx, driver, cancel),
        Err(e) => {
            tracing::warn!(error = %e, "match not started");
            Outcome::Void
        }
    }
}
