//! Host-neutral input snapshot
//!
//! Hosts translate keyboard and touch events into an [`InputState`]; the
//! simulation reads it once per frame.

use glam::Vec2;

use crate::config::Config;
use crate::params::Params;

/// Extra depth added to each edge's touch zone
const TOUCH_MARGIN: f32 = 10.0;
/// Corner dead zones as a fraction of the paddle length
const CORNER_FRACTION: f32 = 0.9;

/// Keys that drive one paddle slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Moves up (vertical) or left (horizontal)
    pub decrease: &'static str,
    /// Moves down (vertical) or right (horizontal)
    pub increase: &'static str,
    /// Hint drawn during the countdown
    pub label: &'static str,
}

impl KeyBindings {
    pub fn for_slot(slot: u8) -> Self {
        match slot {
            0 => Self {
                decrease: "w",
                increase: "s",
                label: "W / S",
            },
            1 => Self {
                decrease: "ArrowUp",
                increase: "ArrowDown",
                label: "↑ / ↓",
            },
            2 => Self {
                decrease: "z",
                increase: "x",
                label: "Z / X",
            },
            _ => Self {
                decrease: ",",
                increase: ".",
                label: ", / .",
            },
        }
    }

    fn matches(key: &str, binding: &str) -> bool {
        if binding.len() == 1 {
            key.eq_ignore_ascii_case(binding)
        } else {
            key == binding
        }
    }
}

/// One paddle's input for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddleInput {
    pub increase: bool,
    pub decrease: bool,
    /// Paddle centre requested by a touch, along the paddle axis
    pub touch: Option<f32>,
}

/// Input snapshot for every slot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub paddles: [PaddleInput; Params::MAX_CONTESTANTS],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: u8) -> PaddleInput {
        self.paddles
            .get(slot as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Apply a key transition; returns whether any binding matched
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        let mut matched = false;
        for (slot, input) in self.paddles.iter_mut().enumerate() {
            let bindings = KeyBindings::for_slot(slot as u8);
            if KeyBindings::matches(key, bindings.decrease) {
                input.decrease = down;
                matched = true;
            } else if KeyBindings::matches(key, bindings.increase) {
                input.increase = down;
                matched = true;
            }
        }
        matched
    }

    /// Hold a direction on a slot
    pub fn hold(&mut self, slot: u8, increase: bool) {
        if let Some(input) = self.paddles.get_mut(slot as usize) {
            input.increase = increase;
            input.decrease = !increase;
        }
    }

    pub fn touch(&mut self, slot: u8, along: f32) {
        if let Some(input) = self.paddles.get_mut(slot as usize) {
            input.touch = Some(along);
        }
    }

    pub fn release_touches(&mut self) {
        for input in &mut self.paddles {
            input.touch = None;
        }
    }
}

/// Map a touch point to the slot whose edge zone contains it, with the
/// coordinate along that paddle's axis. Corners are dead with 3+ paddles.
pub fn touch_zone(point: Vec2, config: &Config, paddles: usize) -> Option<(u8, f32)> {
    let (w, h) = (config.arena_width, config.arena_height);
    let depth = config.paddle_width + TOUCH_MARGIN;

    if paddles >= 3 {
        let corner = config.paddle_height * CORNER_FRACTION;
        let near_x = point.x < corner || point.x > w - corner;
        let near_y = point.y < corner || point.y > h - corner;
        if near_x && near_y {
            return None;
        }
    }

    if point.x <= depth {
        Some((0, point.y))
    } else if point.x >= w - depth {
        Some((1, point.y))
    } else if paddles >= 3 && point.y >= h - depth {
        Some((2, point.x))
    } else if paddles >= 4 && point.y <= depth {
        Some((3, point.x))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_slots() {
        let mut input = InputState::new();
        assert!(input.key("W", true), "Letter bindings ignore case");
        assert!(input.slot(0).decrease);

        input.key("ArrowDown", true);
        assert!(input.slot(1).increase);

        input.key(".", true);
        assert!(input.slot(3).increase);

        input.key("W", false);
        assert!(!input.slot(0).decrease);
        assert!(!input.key("q", true));
    }

    #[test]
    fn test_touch_zones() {
        let config = Config::new();
        assert_eq!(
            touch_zone(Vec2::new(5.0, 300.0), &config, 2),
            Some((0, 300.0))
        );
        assert_eq!(
            touch_zone(Vec2::new(795.0, 120.0), &config, 2),
            Some((1, 120.0))
        );
        assert_eq!(touch_zone(Vec2::new(400.0, 595.0), &config, 2), None);
        assert_eq!(
            touch_zone(Vec2::new(400.0, 595.0), &config, 3),
            Some((2, 400.0))
        );
        assert_eq!(
            touch_zone(Vec2::new(400.0, 5.0), &config, 4),
            Some((3, 400.0))
        );
    }

    #[test]
    fn test_corners_are_dead_with_extra_paddles() {
        let config = Config::new();
        let corner = Vec2::new(5.0, 5.0);
        assert_eq!(touch_zone(corner, &config, 2), Some((0, 5.0)));
        assert_eq!(touch_zone(corner, &config, 4), None);
    }
}
