//! Match state machine
//!
//! `Countdown → Running → Scoring → Running | GameOver`, plus the
//! cancellation exit and the rematch loop back to the countdown.

/// Match phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Countdown,
    Running,
    /// A goal was just credited; resolves within the same frame
    Scoring,
    GameOver,
    Cancelled,
}

/// Events that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    CountdownDone,
    Goal,
    Serve,
    Decided,
    Cancel,
    Rematch,
}

/// Result of a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub success: bool,
    pub from: MatchPhase,
    pub to: MatchPhase,
    pub event: PhaseEvent,
}

/// Match finite state machine
#[derive(Debug, Clone)]
pub struct MatchFsm {
    phase: MatchPhase,
}

impl MatchFsm {
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::Countdown,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, event: PhaseEvent) -> bool {
        next_phase(self.phase, event).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, event: PhaseEvent) -> Transition {
        let from = self.phase;
        match next_phase(from, event) {
            Some(to) => {
                self.phase = to;
                Transition {
                    success: true,
                    from,
                    to,
                    event,
                }
            }
            None => {
                tracing::warn!(?from, ?event, "rejected phase transition");
                Transition {
                    success: false,
                    from,
                    to: from,
                    event,
                }
            }
        }
    }

    /// Whether frames should run the simulation
    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    /// Whether the match has resolved one way or another
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, MatchPhase::GameOver | MatchPhase::Cancelled)
    }
}

impl Default for MatchFsm {
    fn default() -> Self {
        Self::new()
    }
}

/// Get next phase for a given event (if valid)
fn next_phase(phase: MatchPhase, event: PhaseEvent) -> Option<MatchPhase> {
    match (phase, event) {
        // From Countdown
        (MatchPhase::Countdown, PhaseEvent::CountdownDone) => Some(MatchPhase::Running),
        (MatchPhase::Countdown, PhaseEvent::Cancel) => Some(MatchPhase::Cancelled),

        // From Running
        (MatchPhase::Running, PhaseEvent::Goal) => Some(MatchPhase::Scoring),
        (MatchPhase::Running, PhaseEvent::Cancel) => Some(MatchPhase::Cancelled),

        // From Scoring
        (MatchPhase::Scoring, PhaseEvent::Serve) => Some(MatchPhase::Running),
        (MatchPhase::Scoring, PhaseEvent::Decided) => Some(MatchPhase::GameOver),

        // From GameOver
        (MatchPhase::GameOver, PhaseEvent::Rematch) => Some(MatchPhase::Countdown),

        // Invalid transition
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase() {
        let fsm = MatchFsm::new();
        assert_eq!(fsm.phase(), MatchPhase::Countdown);
        assert!(!fsm.is_running());
    }

    #[test]
    fn test_point_cycle() {
        let mut fsm = MatchFsm::new();
        assert!(fsm.transition(PhaseEvent::CountdownDone).success);
        assert!(fsm.transition(PhaseEvent::Goal).success);
        assert_eq!(fsm.phase(), MatchPhase::Scoring);
        assert!(fsm.transition(PhaseEvent::Serve).success);
        assert!(fsm.is_running());
    }

    #[test]
    fn test_decided_match_is_terminal() {
        let mut fsm = MatchFsm::new();
        fsm.transition(PhaseEvent::CountdownDone);
        fsm.transition(PhaseEvent::Goal);
        let result = fsm.transition(PhaseEvent::Decided);
        assert_eq!(result.to, MatchPhase::GameOver);
        assert!(fsm.is_terminal());
        assert!(!fsm.can_transition(PhaseEvent::Cancel), "Too late to cancel");
    }

    #[test]
    fn test_invalid_transition() {
        let mut fsm = MatchFsm::new();
        let result = fsm.transition(PhaseEvent::Goal);
        assert!(!result.success);
        assert_eq!(result.to, MatchPhase::Countdown);
    }

    #[test]
    fn test_rematch_restarts_countdown() {
        let mut fsm = MatchFsm::new();
        assert!(!fsm.can_transition(PhaseEvent::Rematch));
        for event in [PhaseEvent::CountdownDone, PhaseEvent::Goal, PhaseEvent::Decided] {
            fsm.transition(event);
        }
        assert!(fsm.transition(PhaseEvent::Rematch).success);
        assert_eq!(fsm.phase(), MatchPhase::Countdown);
    }

    #[test]
    fn test_cancel_from_countdown_and_running() {
        let mut fsm = MatchFsm::new();
        assert!(fsm.can_transition(PhaseEvent::Cancel));
        fsm.transition(PhaseEvent::CountdownDone);
        assert!(fsm.transition(PhaseEvent::Cancel).success);
        assert_eq!(fsm.phase(), MatchPhase::Cancelled);
        assert!(fsm.is_terminal());
    }
}
