use crate::{Arena, Ball, Paddle, PaddleIntent};
use hecs::World;

/// Apply paddle movement based on intents
pub fn move_paddles(world: &mut World, arena: &Arena) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        let limit = arena.extent(paddle.axis);
        if let Some(center) = intent.target {
            paddle.set_offset(center - paddle.extent() / 2.0, limit);
        } else {
            let delta = intent.delta();
            if delta != 0.0 {
                paddle.set_offset(paddle.offset() + delta, limit);
            }
        }
    }
}

/// Move ball based on velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.integrate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{spawn_ball, spawn_paddle, Config, Controller};
    use glam::Vec2;

    fn setup_world(paddles: usize) -> (World, Config, Arena) {
        let config = Config::new();
        let arena = Arena::new(&config, paddles);
        (World::new(), config, arena)
    }

    fn set_intent(world: &mut World, paddle: hecs::Entity, intent: PaddleIntent) {
        *world.get::<&mut PaddleIntent>(paddle).unwrap() = intent;
    }

    #[test]
    fn test_paddle_moves_by_step() {
        let (mut world, config, arena) = setup_world(2);
        let paddle = spawn_paddle(&mut world, &arena, &config, 0, "left", Controller::Human);
        let start = world.get::<&Paddle>(paddle).unwrap().offset();

        set_intent(
            &mut world,
            paddle,
            PaddleIntent {
                decrease: true,
                step: 5.0,
                ..PaddleIntent::new()
            },
        );
        move_paddles(&mut world, &arena);
        assert_eq!(world.get::<&Paddle>(paddle).unwrap().offset(), start - 5.0);
    }

    #[test]
    fn test_paddle_never_leaves_arena() {
        let (mut world, config, arena) = setup_world(4);
        let paddle = spawn_paddle(&mut world, &arena, &config, 2, "bottom", Controller::Human);
        set_intent(
            &mut world,
            paddle,
            PaddleIntent {
                increase: true,
                step: 1_000.0,
                ..PaddleIntent::new()
            },
        );

        for _ in 0..5 {
            move_paddles(&mut world, &arena);
            let p = *world.get::<&Paddle>(paddle).unwrap();
            assert!(p.offset() >= 0.0);
            assert!(p.offset() <= arena.width - p.extent());
        }
        assert_eq!(
            world.get::<&Paddle>(paddle).unwrap().offset(),
            arena.width - config.paddle_height
        );
    }

    #[test]
    fn test_touch_target_centres_paddle() {
        let (mut world, config, arena) = setup_world(2);
        let paddle = spawn_paddle(&mut world, &arena, &config, 1, "right", Controller::Human);

        set_intent(
            &mut world,
            paddle,
            PaddleIntent {
                target: Some(200.0),
                ..PaddleIntent::new()
            },
        );
        move_paddles(&mut world, &arena);
        assert_eq!(world.get::<&Paddle>(paddle).unwrap().center_along(), 200.0);

        set_intent(
            &mut world,
            paddle,
            PaddleIntent {
                target: Some(5.0),
                ..PaddleIntent::new()
            },
        );
        move_paddles(&mut world, &arena);
        assert_eq!(world.get::<&Paddle>(paddle).unwrap().offset(), 0.0, "Clamped at the top");
    }

    #[test]
    fn test_ball_integrates_velocity() {
        let (mut world, config, arena) = setup_world(2);
        let ball = spawn_ball(&mut world, &arena, &config);
        move_ball(&mut world);
        assert_eq!(
            world.get::<&Ball>(ball).unwrap().pos,
            arena.center() + Vec2::splat(config.ball_speed)
        );
    }
}
