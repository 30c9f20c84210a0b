use crate::arena::Edge;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    pub dt_ms: f64,  // Milliseconds since the previous frame
    pub now_ms: f64, // Host clock
}

impl Time {
    pub fn new(dt_ms: f64, now_ms: f64) -> Self {
        Self { dt_ms, now_ms }
    }

    /// Advance to a new host timestamp
    pub fn advance_to(&mut self, now_ms: f64) {
        self.dt_ms = (now_ms - self.now_ms).max(0.0);
        self.now_ms = now_ms;
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// A ball crossing a goal edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalEvent {
    pub edge: Edge,
    /// Slot whose tally was incremented
    pub credited: u8,
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    pub goals: Vec<GoalEvent>,
    /// Slots whose paddle struck the ball
    pub paddle_hits: Vec<u8>,
    pub wall_bounces: u32,
    pub speed_ups: u32,
    pub served: bool,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.goals.clear();
        self.paddle_hits.clear();
        self.wall_bounces = 0;
        self.speed_ups = 0;
        self.served = false;
    }
}
