//! Screen state machine
//!
//! Tracks which screen the page shows around the match itself: idle,
//! playing, the board between series matches, a finished single match
//! waiting for a click, and the champion banner.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Idle,
    Playing,
    /// Bracket or remaining field shown before the next match
    Intermission,
    /// A single match ended; a click replays it
    GameOver,
    /// A bracket or elimination round has a champion
    Champion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    StartMatch,
    StartSeries,
    NextMatch,
    MatchOver,
    SeriesMatchOver,
    ChampionDecided,
    PlayAgain,
    Quit,
}

/// An accepted screen change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenChange {
    pub from: Screen,
    pub to: Screen,
    pub event: ScreenEvent,
}

/// Transition table
fn next_screen(screen: Screen, event: ScreenEvent) -> Option<Screen> {
    use Screen::*;
    use ScreenEvent::*;

    match (screen, event) {
        (_, Quit) => Some(Idle),

        (Idle, StartMatch) => Some(Playing),
        (Idle, StartSeries) => Some(Intermission),
        (Intermission, NextMatch) => Some(Playing),

        (Playing, MatchOver) => Some(GameOver),
        (Playing, SeriesMatchOver) => Some(Intermission),
        (Playing, ChampionDecided) => Some(Champion),

        (GameOver, PlayAgain) => Some(Playing),
        // A fresh draw from the same names
        (Champion, PlayAgain) => Some(Intermission),

        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenFsm {
    screen: Screen,
}

impl ScreenFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn accepts(&self, event: ScreenEvent) -> bool {
        next_screen(self.screen, event).is_some()
    }

    /// Apply an event; rejected events leave the screen unchanged
    pub fn transition(&mut self, event: ScreenEvent) -> Option<ScreenChange> {
        let Some(to) = next_screen(self.screen, event) else {
            tracing::debug!(screen = ?self.screen, ?event, "screen event ignored");
            return None;
        };
        let change = ScreenChange {
            from: self.screen,
            to,
            event,
        };
        self.screen = to;
        Some(change)
    }

    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }
}
