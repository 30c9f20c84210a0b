//! Multi-paddle elimination round
//!
//! Three or four contestants share the arena. Every match knocks out the
//! contestant whose goals-against reach the limit; once two remain they
//! play an ordinary two-paddle final.

use proto::TournamentRecord;

use crate::game::{MatchResult, Outcome};
use crate::host::CancelToken;
use crate::params::Params;
use crate::tournament::{validate_names, TournamentError, TournamentOutcome};

/// Smallest field that needs a multi-paddle arena
pub const MIN_ELIMINATION_FIELD: usize = 3;

#[derive(Debug, Clone)]
pub struct EliminationRound {
    participants: Vec<String>,
    remaining: Vec<String>,
    eliminated: Vec<String>,
    matches_played: u32,
}

impl EliminationRound {
    pub fn new(names: Vec<String>) -> Result<Self, TournamentError> {
        validate_names(&names, MIN_ELIMINATION_FIELD, Params::MAX_CONTESTANTS)?;
        tracing::info!(field = ?names, "elimination round opened");
        Ok(Self {
            participants: names.clone(),
            remaining: names,
            eliminated: Vec::new(),
            matches_played: 0,
        })
    }

    /// Names for the next match in slot order, or `None` once decided
    pub fn next_roster(&self) -> Option<&[String]> {
        if self.champion().is_some() {
            None
        } else {
            Some(&self.remaining)
        }
    }

    /// Remove the contestant the match knocked out; returns the champion once one is left
    pub fn record(&mut self, result: &MatchResult) -> Result<Option<&str>, TournamentError> {
        if self.champion().is_some() {
            return Err(TournamentError::Finished);
        }
        let loser = result.loser();
        let index = self
            .remaining
            .iter()
            .position(|name| name == loser)
            .ok_or_else(|| TournamentError::NotInMatch(loser.to_string()))?;

        let loser = self.remaining.remove(index);
        tracing::info!(loser = %loser, remaining = self.remaining.len(), "eliminated");
        self.eliminated.push(loser);
        self.matches_played += 1;
        Ok(self.champion())
    }

    pub fn champion(&self) -> Option<&str> {
        match self.remaining.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Knocked-out contestants, first out first
    pub fn eliminated(&self) -> &[String] {
        &self.eliminated
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    pub fn record_for(&self, creator: &str) -> Option<TournamentRecord> {
        Some(TournamentRecord {
            creator_name: creator.to_string(),
            winner_nickname: self.champion()?.to_string(),
            participants_names: self.participants.clone(),
        })
    }
}

/// Play matches until one contestant is left
pub fn run_elimination(
    round: &mut EliminationRound,
    cancel: &CancelToken,
    mut play: impl FnMut(&[String]) -> Outcome,
) -> Result<TournamentOutcome, TournamentError> {
    loop {
        if cancel.is_cancelled() {
            tracing::info!(played = round.matches_played(), "elimination round cancelled");
            return Ok(TournamentOutcome::Aborted);
        }
        let Some(roster) = round.next_roster() else {
            break;
        };
        let roster = roster.to_vec();
        let Outcome::Decided(result) = play(&roster) else {
            return Ok(TournamentOutcome::Aborted);
        };
        round.record(&result)?;
    }

    match round.champion() {
        Some(champion) => Ok(TournamentOutcome::Champion(champion.to_string())),
        None => Ok(TournamentOutcome::Aborted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ScoreKind;
    use crate::game::Standing;

    fn result(names: &[String], decided: u8) -> MatchResult {
        let kind = if names.len() == 2 {
            ScoreKind::PointsFor
        } else {
            ScoreKind::GoalsAgainst
        };
        MatchResult {
            standings: names
                .iter()
                .enumerate()
                .map(|(slot, name)| Standing {
                    slot: slot as u8,
                    name: name.clone(),
                    score: if slot as u8 == decided { 4 } else { 1 },
                    computer: true,
                })
                .collect(),
            kind,
            decided,
            goals: Vec::new(),
        }
    }

    fn field(n: usize) -> Vec<String> {
        ["Ann", "Bo", "Cy", "Di"][..n].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_field_size_is_checked() {
        assert_eq!(
            EliminationRound::new(field(2)).unwrap_err(),
            TournamentError::RosterSize { min: 3, max: 4, got: 2 }
        );
        assert!(EliminationRound::new(field(3)).is_ok());
    }

    #[test]
    fn test_goals_against_knocks_out_the_decided_slot() {
        let mut round = EliminationRound::new(field(4)).unwrap();
        let roster = round.next_roster().unwrap().to_vec();
        assert_eq!(round.record(&result(&roster, 2)).unwrap(), None);
        assert_eq!(round.eliminated(), ["Cy"]);
        assert_eq!(round.next_roster().unwrap(), ["Ann", "Bo", "Di"]);
    }

    #[test]
    fn test_four_contestants_take_three_matches() {
        let mut round = EliminationRound::new(field(4)).unwrap();
        let mut sizes = Vec::new();
        let outcome = run_elimination(&mut round, &CancelToken::new(), |roster| {
            sizes.push(roster.len());
            // The last slot always concedes; in the final slot 0 scores
            let decided = if roster.len() == 2 { 0 } else { roster.len() as u8 - 1 };
            Outcome::Decided(result(roster, decided))
        })
        .unwrap();

        assert_eq!(sizes, vec![4, 3, 2]);
        assert_eq!(outcome, TournamentOutcome::Champion("Ann".to_string()));
        assert_eq!(round.eliminated(), ["Di", "Cy", "Bo"]);
        assert_eq!(round.record_for("host").unwrap().participants_names.len(), 4);
    }

    #[test]
    fn test_stranger_in_result_is_rejected() {
        let mut round = EliminationRound::new(field(3)).unwrap();
        let stranger = result(&["X".to_string(), "Y".to_string(), "Z".to_string()], 0);
        assert_eq!(
            round.record(&stranger).unwrap_err(),
            TournamentError::NotInMatch("X".to_string())
        );
    }

    #[test]
    fn test_void_match_aborts() {
        let mut round = EliminationRound::new(field(3)).unwrap();
        let outcome = run_elimination(&mut round, &CancelToken::new(), |_| Outcome::Void).unwrap();
        assert_eq!(outcome, TournamentOutcome::Aborted);
        assert!(round.eliminated().is_empty());
    }
}
