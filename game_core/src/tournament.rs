//! Eight-player single-elimination bracket
//!
//! The roster is shuffled once. Each round plays adjacent pairs in order;
//! the loser of every match leaves the working list and the winner keeps
//! its place, so the next round pairs the survivors the same way.

use proto::TournamentRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

use crate::game::Outcome;
use crate::host::{keys, CancelToken, Navigator, Route};
use crate::params::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundName {
    QuarterFinals,
    SemiFinals,
    Final,
}

impl RoundName {
    /// Name of a round that starts with `remaining` contestants
    pub fn for_remaining(remaining: usize) -> Option<Self> {
        match remaining {
            8 => Some(RoundName::QuarterFinals),
            4 => Some(RoundName::SemiFinals),
            2 => Some(RoundName::Final),
            _ => None,
        }
    }

    /// Localization key
    pub fn key(self) -> &'static str {
        match self {
            RoundName::QuarterFinals => keys::QUARTER_FINALS,
            RoundName::SemiFinals => keys::SEMI_FINALS,
            RoundName::Final => keys::FINAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentError {
    RosterSize { min: usize, max: usize, got: usize },
    EmptyName,
    DuplicateName(String),
    /// The reported name is not playing the current match
    NotInMatch(String),
    Finished,
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::RosterSize { min, max, got } if min == max => {
                write!(f, "expected exactly {} contestants, got {}", min, got)
            }
            TournamentError::RosterSize { min, max, got } => {
                write!(f, "expected {} to {} contestants, got {}", min, max, got)
            }
            TournamentError::EmptyName => write!(f, "contestant names must not be empty"),
            TournamentError::DuplicateName(name) => write!(f, "duplicate contestant {:?}", name),
            TournamentError::NotInMatch(name) => {
                write!(f, "{:?} is not playing the current match", name)
            }
            TournamentError::Finished => write!(f, "the tournament is already decided"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Check size and uniqueness of an entry list
pub(crate) fn validate_names(
    names: &[String],
    min: usize,
    max: usize,
) -> Result<(), TournamentError> {
    if names.len() < min || names.len() > max {
        return Err(TournamentError::RosterSize {
            min,
            max,
            got: names.len(),
        });
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if !seen.insert(name.as_str()) {
            return Err(TournamentError::DuplicateName(name.clone()));
        }
    }
    Ok(())
}

/// The next match to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// 1-based match number across the whole bracket
    pub number: u32,
    pub round: u32,
    pub left: String,
    pub right: String,
}

/// What the host draws at the start of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundView {
    pub round: u32,
    pub name: Option<RoundName>,
    pub pairings: Vec<(String, String)>,
}

/// Who left the bracket and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub loser: String,
    pub round: u32,
}

/// Tournament state
#[derive(Debug, Clone)]
pub struct Bracket {
    participants: Vec<String>,
    remaining: Vec<String>,
    round_roster: Vec<String>,
    eliminated: Vec<Elimination>,
    cursor: usize,
    round: u32,
    matches_played: u32,
}

impl Bracket {
    /// Validate exactly eight unique names and shuffle them once
    pub fn new<R: Rng + ?Sized>(names: Vec<String>, rng: &mut R) -> Result<Self, TournamentError> {
        validate_names(&names, Params::BRACKET_SIZE, Params::BRACKET_SIZE)?;
        let mut names = names;
        names.shuffle(rng);
        Ok(Self::from_order(names))
    }

    /// Keep the given order (fixed pairings)
    pub fn unshuffled(names: Vec<String>) -> Result<Self, TournamentError> {
        validate_names(&names, Params::BRACKET_SIZE, Params::BRACKET_SIZE)?;
        Ok(Self::from_order(names))
    }

    fn from_order(names: Vec<String>) -> Self {
        tracing::info!(order = ?names, "bracket drawn");
        Self {
            participants: names.clone(),
            remaining: names.clone(),
            round_roster: names,
            eliminated: Vec::new(),
            cursor: 0,
            round: 1,
            matches_played: 0,
        }
    }

    pub fn next_pairing(&self) -> Option<Pairing> {
        if self.champion().is_some() {
            return None;
        }
        let left = self.remaining.get(self.cursor)?;
        let right = self.remaining.get(self.cursor + 1)?;
        Some(Pairing {
            number: self.matches_played + 1,
            round: self.round,
            left: left.clone(),
            right: right.clone(),
        })
    }

    /// Report the winner of the current pairing; the other contestant is removed
    pub fn record_winner(&mut self, winner: &str) -> Result<Elimination, TournamentError> {
        let pairing = self.next_pairing().ok_or(TournamentError::Finished)?;
        let loser_index = if winner == pairing.left {
            self.cursor + 1
        } else if winner == pairing.right {
            self.cursor
        } else {
            return Err(TournamentError::NotInMatch(winner.to_string()));
        };

        let loser = self.remaining.remove(loser_index);
        let elimination = Elimination {
            loser,
            round: self.round,
        };
        tracing::info!(
            number = pairing.number,
            round = self.round,
            winner,
            loser = %elimination.loser,
            "bracket match decided"
        );
        self.eliminated.push(elimination.clone());
        self.matches_played += 1;
        self.cursor += 1;

        if self.cursor + 1 >= self.remaining.len() {
            self.cursor = 0;
            self.round += 1;
            self.round_roster = self.remaining.clone();
            if let Some(champion) = self.champion() {
                tracing::info!(champion, matches = self.matches_played, "bracket champion");
            }
        }
        Ok(elimination)
    }

    /// Current round's pairings, including ones already played
    pub fn round_view(&self) -> RoundView {
        RoundView {
            round: self.round,
            name: RoundName::for_remaining(self.round_roster.len()),
            pairings: self
                .round_roster
                .chunks(2)
                .filter_map(|pair| match pair {
                    [a, b] => Some((a.clone(), b.clone())),
                    _ => None,
                })
                .collect(),
        }
    }

    /// True before the first match of a round
    pub fn at_round_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn champion(&self) -> Option<&str> {
        match self.remaining.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn is_eliminated(&self, name: &str) -> bool {
        self.eliminated.iter().any(|e| e.loser == name)
    }

    pub fn eliminated(&self) -> &[Elimination] {
        &self.eliminated
    }

    /// Entry order after the shuffle
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    /// History record once a champion exists
    pub fn record(&self, creator: &str) -> Option<TournamentRecord> {
        Some(TournamentRecord {
            creator_name: creator.to_string(),
            winner_nickname: self.champion()?.to_string(),
            participants_names: self.participants.clone(),
        })
    }
}

/// Validate an entry list, sending the host back to setup when it is refused
pub fn open_bracket<R: Rng + ?Sized>(
    names: Vec<String>,
    rng: &mut R,
    navigator: &mut dyn Navigator,
) -> Result<Bracket, TournamentError> {
    Bracket::new(names, rng).map_err(|e| {
        tracing::warn!(error = %e, "bracket refused");
        navigator.navigate(Route::Setup);
        e
    })
}

/// How a bracket or elimination round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentOutcome {
    Champion(String),
    /// Cancelled, or a match resolved without a winner
    Aborted,
}

/// Play every pairing in order until a champion remains
pub fn run_tournament(
    bracket: &mut Bracket,
    cancel: &CancelToken,
    mut play: impl FnMut(&Pairing) -> Outcome,
) -> Result<TournamentOutcome, TournamentError> {
    while let Some(pairing) = bracket.next_pairing() {
        if cancel.is_cancelled() {
            tracing::info!(round = bracket.round(), "bracket cancelled");
            return Ok(TournamentOutcome::Aborted);
        }
        let outcome = play(&pairing);
        let Some(winner) = outcome.result().and_then(|r| r.winner()) else {
            tracing::info!(number = pairing.number, "bracket aborted, match had no winner");
            return Ok(TournamentOutcome::Aborted);
        };
        bracket.record_winner(winner)?;
    }

    match bracket.champion() {
        Some(champion) => Ok(TournamentOutcome::Champion(champion.to_string())),
        None => Ok(TournamentOutcome::Aborted),
    }
}
