use crate::{Arena, Axis, Ball, Config, Contestant, Edge, EdgeRule, Events, Paddle};
use hecs::World;

/// Reflect the ball off every edge the arena treats as a wall
pub fn bounce_walls(world: &mut World, arena: &Arena, events: &mut Events) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        for edge in Edge::ALL {
            if arena.rule(edge) != EdgeRule::Bounce || !arena.reaches(edge, ball.pos, ball.radius)
            {
                continue;
            }
            let inward = edge.inward();
            if ball.vel.dot(inward) < 0.0 {
                events.wall_bounces += 1;
            }
            // Force the normal component away from the wall
            match edge {
                Edge::Left | Edge::Right => ball.vel.x = ball.vel.x.abs() * inward.x,
                Edge::Top | Edge::Bottom => ball.vel.y = ball.vel.y.abs() * inward.y,
            }
        }
    }
}

/// Check ball collisions with paddles
pub fn check_paddles(world: &mut World, config: &Config, events: &mut Events) {
    // First, collect ball data without holding borrows
    let (ball_entity, mut ball) = match world.query::<&Ball>().iter().next() {
        Some((entity, ball)) => (entity, *ball),
        None => return, // No ball in world
    };

    let mut hits: Vec<(u8, Paddle)> = Vec::new();
    for (_entity, (paddle, contestant)) in world.query_mut::<(&Paddle, &mut Contestant)>() {
        if !paddle.touches(ball.pos, ball.radius) {
            continue;
        }
        // Only bounce if the ball is moving toward the paddle
        let inward = paddle.edge.inward();
        if ball.vel.dot(inward) >= 0.0 {
            continue;
        }

        // Relative strike point from -1 (low end) to 1 (high end)
        let half = paddle.extent() / 2.0;
        let hit_relative = if half > 0.0 {
            ((paddle.axis.along(ball.pos) - paddle.center_along()) / half).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let kick = hit_relative * config.hit_deflection;

        match paddle.axis {
            Axis::Vertical => {
                ball.vel.x = ball.vel.x.abs() * inward.x;
                ball.vel.y += kick;
            }
            Axis::Horizontal => {
                ball.vel.y = ball.vel.y.abs() * inward.y;
                ball.vel.x += kick;
            }
        }

        contestant.hits += 1;
        if contestant.hits >= config.hit_limit {
            if ball.speed_up() {
                events.speed_ups += 1;
            }
            contestant.hits = 0;
        }
        hits.push((paddle.slot, *paddle));
    }

    if hits.is_empty() {
        return;
    }
    hits.sort_by_key(|(slot, _)| *slot);
    for (slot, paddle) in hits {
        tracing::debug!(slot, edge = ?paddle.edge, pace = ball.pace, "paddle hit");
        events.paddle_hits.push(slot);
    }
    if let Ok(mut stored) = world.get::<&mut Ball>(ball_entity) {
        *stored = ball;
    }
}
