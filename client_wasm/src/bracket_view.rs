//! Text boards shown between matches
//!
//! Laid out as plain lines so any [`RenderSurface`] can draw them.

use game_core::{keys, Bracket, EliminationRound, Localizer, RenderSurface, TextSize};
use glam::Vec2;

const LINE_GAP: f32 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLine {
    pub text: String,
    pub size: TextSize,
    /// Contestant already knocked out
    pub struck: bool,
}

impl BoardLine {
    fn heading(text: String) -> Self {
        Self {
            text,
            size: TextSize::Large,
            struck: false,
        }
    }

    fn label(text: String) -> Self {
        Self {
            text,
            size: TextSize::Medium,
            struck: false,
        }
    }

    fn name(text: &str, struck: bool) -> Self {
        Self {
            text: text.to_string(),
            size: TextSize::Small,
            struck,
        }
    }

    fn height(&self) -> f32 {
        match self.size {
            TextSize::Small => 18.0,
            TextSize::Medium => 24.0,
            TextSize::Large => 36.0,
        }
    }
}

/// Round name, then each pairing of the round under its match number
pub fn bracket_board(bracket: &Bracket, lang: &dyn Localizer) -> Vec<BoardLine> {
    let view = bracket.round_view();
    let mut lines = Vec::new();
    if let Some(name) = view.name {
        lines.push(BoardLine::heading(lang.translate(name.key())));
    }
    let match_label = lang.translate(keys::MATCH_NUMBER);
    for (index, (left, right)) in view.pairings.iter().enumerate() {
        lines.push(BoardLine::label(format!("{} {}", match_label, index + 1)));
        lines.push(BoardLine::name(left, bracket.is_eliminated(left)));
        lines.push(BoardLine::name(right, bracket.is_eliminated(right)));
    }
    lines
}

/// Everyone who entered the elimination round, knocked-out names struck
pub fn field_board(round: &EliminationRound, lang: &dyn Localizer) -> Vec<BoardLine> {
    let next = round.next_roster().map(<[String]>::len).unwrap_or(0);
    let mut lines = vec![BoardLine::label(format!(
        "{} {}",
        lang.translate(keys::MATCH_NUMBER),
        round.matches_played() + 1
    ))];
    if next == 2 {
        lines.insert(0, BoardLine::heading(lang.translate(keys::FINAL)));
    }
    for name in round.participants() {
        let struck = round.eliminated().contains(name);
        lines.push(BoardLine::name(name, struck));
    }
    lines
}

pub fn champion_line(name: &str, lang: &dyn Localizer) -> String {
    format!("🏆 {} {}", name, lang.translate(keys::CHAMPION))
}

/// Draw lines centred on the surface; struck names get a rule through them
pub fn draw_board(lines: &[BoardLine], surface: &mut dyn RenderSurface) {
    let (width, height) = surface.size();
    let total: f32 = lines.iter().map(|l| l.height() + LINE_GAP).sum();
    let mut y = (height - total) / 2.0;

    surface.clear();
    surface.background();
    for line in lines {
        let at = Vec2::new(width / 2.0, y + line.height() / 2.0);
        surface.text(&line.text, at, line.size);
        if line.struck {
            let half = line.text.chars().count() as f32 * 4.0;
            surface.rect(Vec2::new(at.x - half, at.y - 1.0), Vec2::new(half * 2.0, 2.0));
        }
        y += line.height() + LINE_GAP;
    }
}
