use glam::Vec2;

use crate::config::Config;

/// One side of the rectangular arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Edge a paddle slot defends
    pub fn of_slot(slot: u8) -> Edge {
        match slot {
            0 => Edge::Left,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Top,
        }
    }

    /// Unit normal pointing into the arena
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Movement axis of a paddle sitting on this edge
    pub fn paddle_axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Vertical,
            Edge::Top | Edge::Bottom => Axis::Horizontal,
        }
    }
}

/// Direction a paddle slides in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Coordinate along the axis
    pub fn along(self, v: Vec2) -> f32 {
        match self {
            Axis::Vertical => v.y,
            Axis::Horizontal => v.x,
        }
    }

    /// Coordinate across the axis (towards the paddle plane)
    pub fn across(self, v: Vec2) -> f32 {
        match self {
            Axis::Vertical => v.x,
            Axis::Horizontal => v.y,
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Axis::Vertical => Vec2::Y,
            Axis::Horizontal => Vec2::X,
        }
    }
}

/// What happens when the ball reaches an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRule {
    Bounce,
    /// Credit the given slot
    Goal(u8),
}

/// How a tally reaching the winning score is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Two paddles: reaching the threshold wins
    PointsFor,
    /// Three or four paddles: reaching the threshold eliminates
    GoalsAgainst,
}

/// Per-mode edge rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTable {
    pub left: EdgeRule,
    pub right: EdgeRule,
    pub top: EdgeRule,
    pub bottom: EdgeRule,
}

impl EdgeTable {
    /// Edge table for the number of paddles in play.
    ///
    /// | paddles | left | right | top | bottom |
    /// |---|---|---|---|---|
    /// | 2 | Goal(1) | Goal(0) | Bounce | Bounce |
    /// | 3 | Goal(0) | Goal(1) | Bounce | Goal(2) |
    /// | 4 | Goal(0) | Goal(1) | Goal(3) | Goal(2) |
    ///
    /// Two paddles credit the opponent; with more, every wall counts
    /// against the paddle guarding it.
    pub fn for_paddles(paddles: usize) -> Self {
        let mut table = Self {
            left: EdgeRule::Goal(1),
            right: EdgeRule::Goal(0),
            top: EdgeRule::Bounce,
            bottom: EdgeRule::Bounce,
        };
        if paddles >= 3 {
            table.left = EdgeRule::Goal(0);
            table.right = EdgeRule::Goal(1);
            table.bottom = EdgeRule::Goal(2);
        }
        if paddles >= 4 {
            table.top = EdgeRule::Goal(3);
        }
        table
    }

    pub fn rule(&self, edge: Edge) -> EdgeRule {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }
}

/// Where a paddle starts and how it is shaped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddlePlacement {
    pub edge: Edge,
    pub axis: Axis,
    pub pos: Vec2,
    pub size: Vec2,
}

/// The playing field for one match
#[derive(Debug, Clone)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub paddles: usize,
    pub edges: EdgeTable,
    pub kind: ScoreKind,
}

impl Arena {
    pub fn new(config: &Config, paddles: usize) -> Self {
        let paddles = paddles.clamp(2, 4);
        Self {
            width: config.arena_width,
            height: config.arena_height,
            paddles,
            edges: EdgeTable::for_paddles(paddles),
            kind: if paddles > 2 {
                ScoreKind::GoalsAgainst
            } else {
                ScoreKind::PointsFor
            },
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn rule(&self, edge: Edge) -> EdgeRule {
        self.edges.rule(edge)
    }

    /// Length of the range a paddle on `axis` slides in
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    /// Whether a ball of radius `r` at `pos` is touching or past `edge`
    pub fn reaches(&self, edge: Edge, pos: Vec2, r: f32) -> bool {
        match edge {
            Edge::Left => pos.x - r <= 0.0,
            Edge::Right => pos.x + r >= self.width,
            Edge::Top => pos.y - r <= 0.0,
            Edge::Bottom => pos.y + r >= self.height,
        }
    }

    /// Starting placement for a slot, centred on its edge
    pub fn paddle_placement(&self, slot: u8, config: &Config) -> PaddlePlacement {
        let edge = Edge::of_slot(slot);
        let axis = edge.paddle_axis();
        let (thick, long) = (config.paddle_width, config.paddle_height);
        let (pos, size) = match edge {
            Edge::Left => (
                Vec2::new(0.0, (self.height - long) / 2.0),
                Vec2::new(thick, long),
            ),
            Edge::Right => (
                Vec2::new(self.width - thick, (self.height - long) / 2.0),
                Vec2::new(thick, long),
            ),
            Edge::Bottom => (
                Vec2::new((self.width - long) / 2.0, self.height - thick),
                Vec2::new(long, thick),
            ),
            Edge::Top => (
                Vec2::new((self.width - long) / 2.0, 0.0),
                Vec2::new(long, thick),
            ),
        };
        PaddlePlacement {
            edge,
            axis,
            pos,
            size,
        }
    }
}
