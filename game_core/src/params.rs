/// Fixed tuning parameters shared by every size tier
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Score
    pub const WIN_SCORE: u32 = 4;

    // Serve
    pub const SERVE_ANGLE_SPREAD: f32 = std::f32::consts::PI / 8.0; // +/- 22.5 degrees
    pub const MIN_SERVE_SPIN: f32 = 0.2; // floor on the secondary velocity component

    // Paddle hits
    pub const HIT_DEFLECTION: f32 = 2.0; // tangential kick at the paddle tip
    pub const HIT_LIMIT: u32 = 3;
    pub const MAX_PACE_FACTOR: f32 = 4.0; // pace cap as a multiple of the serve speed

    // AI
    pub const PREDICTION_INTERVAL_MS: f64 = 1000.0;
    pub const AI_JITTER: f32 = 2.0;
    pub const AI_RECEDING_SPEED_DROP: f32 = 0.2;
    pub const AI_MIN_SPEED_FACTOR: f32 = 0.1;
    pub const AI_LEAD_MARGIN: i64 = 3;
    pub const AI_LEAD_STEP: f32 = 0.2;
    pub const AI_LEAD_CAP: f32 = 2.0;
    pub const AI_SPEED_STEP: f32 = 0.1;
    pub const AI_SPEED_CAP: f32 = 1.5;

    // Match flow
    pub const COUNTDOWN_SECONDS: u32 = 3;
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    // Tournament
    pub const BRACKET_SIZE: usize = 8;
    pub const MAX_CONTESTANTS: usize = 4;
    pub const COMPUTER_NAME: &'static str = "AI";
}
