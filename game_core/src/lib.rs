pub mod ai;
pub mod arena;
pub mod components;
pub mod config;
pub mod elimination;
pub mod game;
pub mod host;
pub mod input;
pub mod params;
pub mod phase;
pub mod resources;
pub mod systems;
pub mod tournament;

pub use ai::*;
pub use arena::*;
pub use components::*;
pub use config::*;
pub use elimination::*;
pub use game::*;
pub use host::*;
pub use input::*;
pub use params::*;
pub use phase::*;
pub use resources::*;
pub use tournament::*;

use hecs::World;
use systems::*;

/// What one simulation step produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub goal: Option<GoalEvent>,
    /// Slot whose tally reached the winning score
    pub reached: Option<u8>,
}

/// Run one frame of the Pong simulation
pub fn step(
    world: &mut World,
    arena: &Arena,
    config: &Config,
    input: &InputState,
    time: &Time,
    events: &mut Events,
    rng: &mut GameRng,
) -> StepOutcome {
    // Clear events at start of frame
    events.clear();

    // 1. Intents from the input snapshot and the computer paddles
    apply_intents(world, input, arena, config, time, rng);

    // 2. Move paddles based on intents
    move_paddles(world, arena);

    // 3. Walls, then goals (a goal serves a fresh ball unless the match is decided)
    bounce_walls(world, arena, events);
    let goal = check_goals(world, arena, events);
    let reached = match goal {
        Some(_) => settle_goal(world, arena, config, rng, events),
        None => None,
    };
    if reached.is_some() {
        return StepOutcome { goal, reached };
    }

    // 4. Ball vs paddles
    check_paddles(world, config, events);

    // 5. Move ball
    move_ball(world);

    StepOutcome { goal, reached }
}

/// Helper to create a paddle entity for a slot
pub fn spawn_paddle(
    world: &mut World,
    arena: &Arena,
    config: &Config,
    slot: u8,
    name: impl Into<String>,
    controller: Controller,
) -> hecs::Entity {
    let placement = arena.paddle_placement(slot, config);
    world.spawn((
        Paddle::new(slot, placement, config.player_speed),
        PaddleIntent::new(),
        Contestant::new(name),
        controller,
    ))
}

/// Helper to create the ball entity at kick-off
pub fn spawn_ball(world: &mut World, arena: &Arena, config: &Config) -> hecs::Entity {
    world.spawn((Ball::new(arena.center(), config),))
}
