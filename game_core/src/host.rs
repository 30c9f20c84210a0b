//! Seams between the simulation and whatever hosts it
//!
//! The browser client and the native CLI each implement these traits; the
//! match loop and the bracket engine only ever talk to the traits.

use glam::Vec2;
use proto::{RecordError, ResultRecord};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{Config, SizeTier};

/// Localization keys the core asks for
pub mod keys {
    pub const COUNTDOWN: &str = "game.countdown";
    pub const WINNER_SINGLE: &str = "game.winner.single";
    pub const WINNER_LOSE: &str = "game.winner.lose";
    pub const RESTART: &str = "game.restartMessage";
    pub const CHAMPION: &str = "game.winnerMessage";
    pub const MATCH_NUMBER: &str = "game.matchNumber";
    pub const CANCELLED: &str = "game.cancelled";
    pub const QUARTER_FINALS: &str = "game.roundName.quarterFinals";
    pub const SEMI_FINALS: &str = "game.roundName.semiFinals";
    pub const FINAL: &str = "game.roundName.final";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

/// A 2D surface the match draws itself on
pub trait RenderSurface {
    /// Pixel width and height; zero means no surface is available
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn background(&mut self);
    fn circle(&mut self, center: Vec2, radius: f32);
    fn rect(&mut self, pos: Vec2, size: Vec2);
    fn dashed_line(&mut self, from: Vec2, to: Vec2);
    /// Text centred on `at`
    fn text(&mut self, text: &str, at: Vec2, size: TextSize);
}

/// Display strings by symbolic key
pub trait Localizer {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Shows the key itself
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFallback;

impl Localizer for KeyFallback {}

/// Dotted-key lookup into a JSON language document
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: serde_json::Value,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let root: serde_json::Value = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        if !root.is_object() {
            return Err(CatalogError::NotAnObject);
        }
        Ok(Self { root })
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.get(part))
            .and_then(|v| v.as_str())
    }
}

impl Localizer for Catalog {
    fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "invalid language file: {}", e),
            CatalogError::NotAnObject => write!(f, "language file must be a JSON object"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Supplies the settings bundle for a display tier
pub trait SettingsProvider {
    fn tier(&self) -> SizeTier;

    fn settings(&self) -> Config {
        Config::for_tier(self.tier())
    }
}

impl SettingsProvider for SizeTier {
    fn tier(&self) -> SizeTier {
        *self
    }
}

/// Who is signed in, if anyone
pub trait SessionProvider {
    fn current_user(&self) -> Option<String>;
}

/// Views the core may ask the host to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Contestant entry
    Setup,
    Home,
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Shared cancellation flag, checked at the top of every frame and round
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// External match-history store
pub trait ResultSink {
    fn submit(&mut self, record: &ResultRecord) -> Result<(), SinkError>;
}

#[derive(Debug)]
pub enum SinkError {
    Encode(RecordError),
    Transport(String),
    Rejected { status: u16 },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Encode(e) => write!(f, "could not encode result: {}", e),
            SinkError::Transport(msg) => write!(f, "could not reach result store: {}", msg),
            SinkError::Rejected { status } => write!(f, "result store answered {}", status),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<RecordError> for SinkError {
    fn from(e: RecordError) -> Self {
        SinkError::Encode(e)
    }
}

/// Outcome of a result submission, for a transient notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Submitted,
    NoSession,
    Failed(String),
}

/// Submit a result on behalf of the signed-in user. Never fails the caller:
/// errors are logged and returned as a notice.
pub fn report_result(
    session: &dyn SessionProvider,
    sink: &mut dyn ResultSink,
    build: impl FnOnce(&str) -> ResultRecord,
) -> ReportStatus {
    let Some(user) = session.current_user() else {
        tracing::info!("no session, result not submitted");
        return ReportStatus::NoSession;
    };

    let record = build(&user);
    match sink.submit(&record) {
        Ok(()) => {
            tracing::info!(endpoint = record.endpoint(), winner = record.winner(), "result submitted");
            ReportStatus::Submitted
        }
        Err(e) => {
            tracing::warn!(error = %e, endpoint = record.endpoint(), "result submission failed");
            ReportStatus::Failed(e.to_string())
        }
    }
}
