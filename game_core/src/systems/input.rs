use hecs::World;

use crate::ai::AiView;
use crate::arena::{Arena, ScoreKind};
use crate::components::{Ball, Contestant, Controller, Paddle, PaddleIntent};
use crate::config::Config;
use crate::input::InputState;
use crate::resources::{GameRng, Time};

/// Turn the input snapshot and AI decisions into paddle intents
pub fn apply_intents(
    world: &mut World,
    input: &InputState,
    arena: &Arena,
    config: &Config,
    time: &Time,
    rng: &mut GameRng,
) {
    // First, collect ball and tally data without holding borrows
    let ball = match world.query::<&Ball>().iter().next() {
        Some((_e, ball)) => *ball,
        None => return,
    };
    let tallies: Vec<(u8, u32, u32)> = world
        .query::<(&Paddle, &Contestant)>()
        .iter()
        .map(|(_e, (p, c))| (p.slot, c.score, c.hits))
        .collect();
    let tally_of = |slot: u8| {
        tallies
            .iter()
            .find(|(s, _, _)| *s == slot)
            .map(|(_, score, hits)| (*score, *hits))
            .unwrap_or((0, 0))
    };

    for (_entity, (paddle, controller, intent)) in
        world.query_mut::<(&Paddle, &mut Controller, &mut PaddleIntent)>()
    {
        *intent = match controller {
            Controller::Human => {
                let held = input.slot(paddle.slot);
                PaddleIntent {
                    increase: held.increase,
                    decrease: held.decrease,
                    step: paddle.speed,
                    target: held.touch,
                }
            }
            Controller::Computer(brain) => {
                let opponent = if paddle.slot == 0 { 1 } else { 0 };
                let (own, _) = tally_of(paddle.slot);
                let (theirs, opponent_hits) = tally_of(opponent);
                let lead = match arena.kind {
                    ScoreKind::PointsFor => own as i64 - theirs as i64,
                    ScoreKind::GoalsAgainst => theirs as i64 - own as i64,
                };
                let view = AiView {
                    ball: &ball,
                    paddle,
                    arena,
                    lead,
                    opponent_hits,
                    now_ms: time.now_ms,
                };
                brain.decide(&view, config, rng)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiBrain;
    use crate::{spawn_ball, spawn_paddle};

    fn setup_world() -> (World, Config, Arena, GameRng) {
        let config = Config::new();
        let arena = Arena::new(&config, 2);
        (World::new(), config, arena, GameRng::new(12345))
    }

    #[test]
    fn test_human_intent_copies_input() {
        let (mut world, config, arena, mut rng) = setup_world();
        spawn_ball(&mut world, &arena, &config);
        let paddle = spawn_paddle(&mut world, &arena, &config, 0, "left", Controller::Human);

        let mut input = InputState::new();
        input.hold(0, true);
        apply_intents(&mut world, &input, &arena, &config, &Time::default(), &mut rng);

        let intent = *world.get::<&PaddleIntent>(paddle).unwrap();
        assert!(intent.increase && !intent.decrease);
        assert_eq!(intent.step, config.player_speed);
        assert_eq!(intent.target, None);
    }

    #[test]
    fn test_touch_passes_through_as_target() {
        let (mut world, config, arena, mut rng) = setup_world();
        spawn_ball(&mut world, &arena, &config);
        let paddle = spawn_paddle(&mut world, &arena, &config, 1, "right", Controller::Human);

        let mut input = InputState::new();
        input.touch(1, 120.0);
        apply_intents(&mut world, &input, &arena, &config, &Time::default(), &mut rng);

        let intent = *world.get::<&PaddleIntent>(paddle).unwrap();
        assert_eq!(intent.target, Some(120.0));
    }

    #[test]
    fn test_computer_ignores_keyboard() {
        let (mut world, config, arena, mut rng) = setup_world();
        spawn_ball(&mut world, &arena, &config);
        let brain = Controller::Computer(AiBrain::new(&config));
        let paddle = spawn_paddle(&mut world, &arena, &config, 1, "AI", brain);

        let mut input = InputState::new();
        input.hold(1, false);
        apply_intents(&mut world, &input, &arena, &config, &Time::default(), &mut rng);

        let controller = world.get::<&Controller>(paddle).unwrap();
        match &*controller {
            Controller::Computer(brain) => assert!(brain.target.is_some(), "Brain predicted"),
            Controller::Human => panic!("Controller must stay a computer"),
        }
    }

    #[test]
    fn test_no_ball_leaves_intents_alone() {
        let (mut world, config, arena, mut rng) = setup_world();
        let paddle = spawn_paddle(&mut world, &arena, &config, 0, "left", Controller::Human);
        let mut input = InputState::new();
        input.hold(0, true);
        apply_intents(&mut world, &input, &arena, &config, &Time::default(), &mut rng);
        assert_eq!(*world.get::<&PaddleIntent>(paddle).unwrap(), PaddleIntent::new());
    }
}
