//! Transient notices about result submission
//!
//! The queue is shared between the app, which reports the immediate outcome
//! of a submission, and sinks that finish delivery later.

use game_core::ReportStatus;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct Notices(Rc<RefCell<VecDeque<ReportStatus>>>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, status: ReportStatus) {
        self.0.borrow_mut().push_back(status);
    }

    /// Oldest notice not yet shown
    pub fn take(&self) -> Option<ReportStatus> {
        self.0.borrow_mut().pop_front()
    }
}

/// Text the page shows for a notice
pub fn notice_text(status: &ReportStatus) -> String {
    match status {
        ReportStatus::Submitted => "Result sent".to_string(),
        ReportStatus::NoSession => "Sign in to keep your results".to_string(),
        ReportStatus::Failed(reason) => format!("Result not saved: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_queue() {
        let notices = Notices::new();
        let sink_side = notices.clone();
        notices.push(ReportStatus::Submitted);
        sink_side.push(ReportStatus::Failed("result store answered 500".to_string()));

        assert_eq!(notices.take(), Some(ReportStatus::Submitted));
        assert_eq!(
            notices.take().as_ref().map(notice_text),
            Some("Result not saved: result store answered 500".to_string())
        );
        assert_eq!(sink_side.take(), None);
    }
}
