use crate::{Arena, Ball, Config, Contestant, Controller, Edge, EdgeRule, Events, GameRng, GoalEvent, Paddle};
use hecs::World;

/// Check if the ball reached a goal edge; credits the slot the edge table names.
/// At most one goal is counted per frame.
pub fn check_goals(world: &mut World, arena: &Arena, events: &mut Events) -> Option<GoalEvent> {
    let ball = world.query::<&Ball>().iter().next().map(|(_e, ball)| *ball)?;

    let (edge, credited) = Edge::ALL.into_iter().find_map(|edge| match arena.rule(edge) {
        EdgeRule::Goal(slot) if arena.reaches(edge, ball.pos, ball.radius) => Some((edge, slot)),
        _ => None,
    })?;

    let contestant = world
        .query_mut::<(&Paddle, &mut Contestant)>()
        .into_iter()
        .find(|(_e, (paddle, _))| paddle.slot == credited)
        .map(|(_e, (_, contestant))| contestant)?;
    contestant.score += 1;
    tracing::debug!(?edge, credited, score = contestant.score, name = %contestant.name, "goal");

    let goal = GoalEvent { edge, credited };
    events.goals.push(goal);
    Some(goal)
}

/// Settle a goal: returns the lowest slot whose tally reached the winning
/// score, otherwise serves a fresh ball and returns `None`.
pub fn settle_goal(
    world: &mut World,
    arena: &Arena,
    config: &Config,
    rng: &mut GameRng,
    events: &mut Events,
) -> Option<u8> {
    let reached = world
        .query::<(&Paddle, &Contestant)>()
        .iter()
        .filter(|(_e, (_, c))| c.score >= config.win_score)
        .map(|(_e, (p, _))| p.slot)
        .min();
    if reached.is_some() {
        return reached;
    }

    serve_ball(world, arena, rng);
    events.served = true;
    None
}

/// Re-centre and re-launch the ball; computer paddles re-predict
pub fn serve_ball(world: &mut World, arena: &Arena, rng: &mut GameRng) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.serve(arena.center(), rng);
    }
    for (_entity, controller) in world.query_mut::<&mut Controller>() {
        if let Controller::Computer(brain) = controller {
            brain.forget_prediction();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiBrain;
    use crate::{spawn_ball, spawn_paddle};
    use glam::Vec2;

    fn setup_world(paddles: usize) -> (World, Config, Arena, Events, GameRng) {
        let config = Config::new();
        let arena = Arena::new(&config, paddles);
        let mut world = World::new();
        for slot in 0..paddles as u8 {
            spawn_paddle(&mut world, &arena, &config, slot, format!("P{}", slot), Controller::Human);
        }
        let rng = GameRng::new(12345); // Fixed seed for deterministic tests
        (world, config, arena, Events::new(), rng)
    }

    fn score_of(world: &World, slot: u8) -> u32 {
        world
            .query::<(&Paddle, &Contestant)>()
            .iter()
            .find(|(_e, (p, _))| p.slot == slot)
            .map(|(_e, (_, c))| c.score)
            .unwrap()
    }

    fn put_ball(world: &mut World, arena: &Arena, config: &Config, pos: Vec2) -> hecs::Entity {
        let ball = spawn_ball(world, arena, config);
        world.get::<&mut Ball>(ball).unwrap().pos = pos;
        ball
    }

    #[test]
    fn test_left_edge_credits_slot_one() {
        let (mut world, config, arena, mut events, _rng) = setup_world(2);
        put_ball(&mut world, &arena, &config, Vec2::new(-1.0, 300.0));

        let goal = check_goals(&mut world, &arena, &mut events);

        assert_eq!(goal, Some(GoalEvent { edge: Edge::Left, credited: 1 }));
        assert_eq!(score_of(&world, 1), 1, "Right player should score");
        assert_eq!(score_of(&world, 0), 0);
        assert_eq!(events.goals.len(), 1);
    }

    #[test]
    fn test_right_edge_credits_slot_zero() {
        let (mut world, config, arena, mut events, _rng) = setup_world(2);
        put_ball(&mut world, &arena, &config, Vec2::new(805.0, 300.0));

        check_goals(&mut world, &arena, &mut events);
        assert_eq!(score_of(&world, 0), 1, "Left player should score");
    }

    #[test]
    fn test_bottom_edge_is_a_goal_with_three_paddles() {
        let (mut world, config, arena, mut events, _rng) = setup_world(3);
        put_ball(&mut world, &arena, &config, Vec2::new(400.0, 598.0));

        let goal = check_goals(&mut world, &arena, &mut events);
        assert_eq!(goal.map(|g| g.credited), Some(2));

        let (mut world, config, arena, mut events, _rng) = setup_world(2);
        put_ball(&mut world, &arena, &config, Vec2::new(400.0, 598.0));
        assert_eq!(check_goals(&mut world, &arena, &mut events), None, "Wall in 2-player mode");
    }

    #[test]
    fn test_side_edges_count_against_their_own_slot_with_three_paddles() {
        let (mut world, config, arena, mut events, _rng) = setup_world(3);
        put_ball(&mut world, &arena, &config, Vec2::new(-1.0, 40.0));
        let goal = check_goals(&mut world, &arena, &mut events);
        assert_eq!(goal, Some(GoalEvent { edge: Edge::Left, credited: 0 }));
        assert_eq!(score_of(&world, 1), 0, "Right paddle is not charged for the left miss");

        let (mut world, config, arena, mut events, _rng) = setup_world(3);
        put_ball(&mut world, &arena, &config, Vec2::new(805.0, 40.0));
        check_goals(&mut world, &arena, &mut events);
        assert_eq!(score_of(&world, 1), 1);
    }

    #[test]
    fn test_top_edge_credits_slot_three() {
        let (mut world, config, arena, mut events, _rng) = setup_world(4);
        put_ball(&mut world, &arena, &config, Vec2::new(400.0, 2.0));
        check_goals(&mut world, &arena, &mut events);
        assert_eq!(score_of(&world, 3), 1);
    }

    #[test]
    fn test_no_scoring_when_ball_in_bounds() {
        let (mut world, config, arena, mut events, _rng) = setup_world(2);
        put_ball(&mut world, &arena, &config, arena.center());

        assert_eq!(check_goals(&mut world, &arena, &mut events), None);
        assert!(events.goals.is_empty(), "No scoring events");
    }

    #[test]
    fn test_settle_serves_until_threshold() {
        let (mut world, config, arena, mut events, mut rng) = setup_world(2);
        let ball = put_ball(&mut world, &arena, &config, Vec2::new(-1.0, 300.0));
        let brain = spawn_paddle(
            &mut world,
            &arena,
            &config,
            3,
            "spare",
            Controller::Computer(AiBrain {
                last_prediction_ms: Some(10.0),
                ..AiBrain::new(&config)
            }),
        );

        check_goals(&mut world, &arena, &mut events);
        assert_eq!(settle_goal(&mut world, &arena, &config, &mut rng, &mut events), None);
        assert!(events.served);
        assert_eq!(world.get::<&Ball>(ball).unwrap().pos, arena.center());
        match &*world.get::<&Controller>(brain).unwrap() {
            Controller::Computer(b) => assert_eq!(b.last_prediction_ms, None),
            Controller::Human => unreachable!(),
        }

        for _ in 1..config.win_score {
            world.get::<&mut Ball>(ball).unwrap().pos = Vec2::new(-1.0, 300.0);
            check_goals(&mut world, &arena, &mut events);
        }
        assert_eq!(
            settle_goal(&mut world, &arena, &config, &mut rng, &mut events),
            Some(1)
        );
    }
}
