//! Page-level flow around the match
//!
//! The browser calls [`App::frame`] once per animation frame. A single
//! match waits for a click when it ends; brackets and elimination rounds
//! show a board for a few seconds between matches and report the champion.

use game_core::{
    open_bracket, report_result, touch_zone, Bracket, CancelToken, Config, EliminationRound,
    FrameStatus, GameRng, InputState, Localizer, MatchContext, MatchResult, MatchSetup, Navigator,
    Outcome, RenderSurface, ReportStatus, ResultSink, Route, SessionProvider, TextSize,
    TournamentError,
};
use glam::Vec2;
use proto::{ResultRecord, TournamentRecord};

use crate::bracket_view::{bracket_board, champion_line, draw_board, field_board};
use crate::fsm::{Screen, ScreenEvent, ScreenFsm};
use crate::notice::Notices;

/// How long the board stays up between matches
pub const INTERMISSION_MS: f64 = 3000.0;

/// Everything outside the core the app talks to
pub struct Hosts<'a> {
    pub session: &'a dyn SessionProvider,
    pub sink: &'a mut dyn ResultSink,
    pub navigator: &'a mut dyn Navigator,
}

enum Series {
    Single,
    Bracket(Bracket),
    Elimination(EliminationRound),
}

/// What a decided match leads to
enum Next {
    GameOver(Option<ResultRecord>),
    Continue,
    Champion(String),
}

pub struct App {
    fsm: ScreenFsm,
    series: Series,
    entry: Vec<String>,
    ctx: Option<MatchContext>,
    settings: Config,
    surface: (f32, f32),
    input: InputState,
    cancel: CancelToken,
    rng: GameRng,
    seed: u64,
    resume_at: Option<f64>,
    champion: Option<String>,
    notices: Notices,
}

impl App {
    pub fn new(settings: Config, surface: (f32, f32), seed: u64) -> Self {
        Self {
            fsm: ScreenFsm::new(),
            series: Series::Single,
            entry: Vec::new(),
            ctx: None,
            settings,
            surface,
            input: InputState::new(),
            cancel: CancelToken::new(),
            rng: GameRng::new(seed),
            seed,
            resume_at: None,
            champion: None,
            notices: Notices::new(),
        }
    }

    pub fn state(&self) -> Screen {
        self.fsm.screen()
    }

    /// The oldest result-submission notice, taken once
    pub fn take_notice(&mut self) -> Option<ReportStatus> {
        self.notices.take()
    }

    /// Shared with sinks that deliver after `submit` returns
    pub fn notices(&self) -> Notices {
        self.notices.clone()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// New settings and surface size apply from the next match
    pub fn resize(&mut self, settings: Config, surface: (f32, f32)) {
        self.settings = settings;
        self.surface = surface;
    }

    /// One to four names; a lone name faces the computer
    pub fn start_match(&mut self, names: Vec<String>) -> bool {
        self.reset();
        self.series = Series::Single;
        self.entry = names;
        self.fsm.transition(ScreenEvent::StartMatch);
        self.open_match(self.entry.clone(), false)
    }

    pub fn start_tournament(
        &mut self,
        names: Vec<String>,
        navigator: &mut dyn Navigator,
    ) -> Result<(), TournamentError> {
        self.reset();
        let bracket = open_bracket(names.clone(), &mut self.rng.0, navigator)?;
        self.series = Series::Bracket(bracket);
        self.entry = names;
        self.fsm.transition(ScreenEvent::StartSeries);
        Ok(())
    }

    pub fn start_elimination(
        &mut self,
        names: Vec<String>,
        navigator: &mut dyn Navigator,
    ) -> Result<(), TournamentError> {
        self.reset();
        let round = EliminationRound::new(names.clone()).map_err(|e| {
            tracing::warn!(error = %e, "elimination round refused");
            navigator.navigate(Route::Setup);
            e
        })?;
        self.series = Series::Elimination(round);
        self.entry = names;
        self.fsm.transition(ScreenEvent::StartSeries);
        Ok(())
    }

    pub fn key(&mut self, key: &str, down: bool) -> bool {
        self.input.key(key, down)
    }

    /// Route a touch to the paddle whose edge zone contains it
    pub fn touch(&mut self, point: Vec2) -> bool {
        let Some(ctx) = &self.ctx else {
            return false;
        };
        match touch_zone(point, ctx.config(), ctx.arena().paddles) {
            Some((slot, along)) => {
                self.input.touch(slot, along);
                true
            }
            None => false,
        }
    }

    pub fn release_touches(&mut self) {
        self.input.release_touches();
    }

    /// Replay a finished single match, or redraw the bracket after a champion
    pub fn click(&mut self, navigator: &mut dyn Navigator) -> bool {
        match self.fsm.screen() {
            Screen::GameOver => {
                let replayed = self.ctx.as_mut().map(|ctx| ctx.rematch()).unwrap_or(false);
                if replayed {
                    self.input = InputState::new();
                    self.fsm.transition(ScreenEvent::PlayAgain);
                }
                replayed
            }
            Screen::Champion => {
                let names = self.entry.clone();
                let again = if matches!(self.series, Series::Bracket(_)) {
                    self.start_tournament(names, navigator)
                } else {
                    self.start_elimination(names, navigator)
                };
                again.is_ok()
            }
            _ => false,
        }
    }

    /// Abandon whatever is running; the match resolves on the next frame
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if !self.fsm.is_playing() {
            self.reset();
        }
    }

    pub fn frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn RenderSurface,
        lang: &dyn Localizer,
        hosts: &mut Hosts,
    ) -> Screen {
        match self.fsm.screen() {
            Screen::Idle => {}
            Screen::Playing => {
                let Some(ctx) = self.ctx.as_mut() else {
                    self.reset();
                    return self.fsm.screen();
                };
                let status = ctx.frame(&self.input, now_ms, &self.cancel);
                ctx.render(surface, lang);
                if let FrameStatus::Finished(outcome) = status {
                    self.finish_match(outcome, now_ms, hosts);
                }
            }
            Screen::Intermission => {
                let resume_at = *self.resume_at.get_or_insert(now_ms + INTERMISSION_MS);
                match &self.series {
                    Series::Bracket(bracket) => draw_board(&bracket_board(bracket, lang), surface),
                    Series::Elimination(round) => draw_board(&field_board(round, lang), surface),
                    Series::Single => {}
                }
                if now_ms >= resume_at {
                    self.next_match();
                }
            }
            Screen::GameOver => {
                if let Some(ctx) = &self.ctx {
                    ctx.render(surface, lang);
                }
            }
            Screen::Champion => {
                let (width, height) = surface.size();
                let center = Vec2::new(width / 2.0, height / 2.0);
                surface.clear();
                surface.background();
                if let Some(name) = &self.champion {
                    surface.text(&champion_line(name, lang), center, TextSize::Large);
                }
                let below = center + Vec2::new(0.0, 50.0);
                surface.text(&lang.translate(game_core::keys::RESTART), below, TextSize::Medium);
            }
        }
        self.fsm.screen()
    }

    fn finish_match(&mut self, outcome: Outcome, now_ms: f64, hosts: &mut Hosts) {
        let Outcome::Decided(result) = outcome else {
            tracing::info!("match ended without a result");
            hosts.navigator.navigate(Route::Home);
            self.reset();
            return;
        };

        let next = match &mut self.series {
            Series::Single => Ok(Next::GameOver(result.record().map(ResultRecord::from))),
            Series::Bracket(bracket) => {
                record_bracket(bracket, &result).map(|c| c.map_or(Next::Continue, Next::Champion))
            }
            Series::Elimination(round) => round
                .record(&result)
                .map(|c| c.map_or(Next::Continue, |name| Next::Champion(name.to_string()))),
        };
        let next = match next {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(error = %e, "series rejected a result");
                self.reset();
                return;
            }
        };

        match next {
            Next::GameOver(record) => {
                self.fsm.transition(ScreenEvent::MatchOver);
                if let Some(record) = record {
                    self.notices
                        .push(report_result(hosts.session, hosts.sink, |_user| record));
                }
            }
            Next::Continue => {
                self.resume_at = Some(now_ms + INTERMISSION_MS);
                self.fsm.transition(ScreenEvent::SeriesMatchOver);
            }
            Next::Champion(champion) => {
                let participants = match &self.series {
                    Series::Bracket(bracket) => bracket.participants().to_vec(),
                    Series::Elimination(round) => round.participants().to_vec(),
                    Series::Single => Vec::new(),
                };
                let winner = champion.clone();
                let status = report_result(hosts.session, hosts.sink, |user| {
                    ResultRecord::from(TournamentRecord {
                        creator_name: user.to_string(),
                        winner_nickname: winner,
                        participants_names: participants,
                    })
                });
                self.notices.push(status);
                self.champion = Some(champion);
                self.fsm.transition(ScreenEvent::ChampionDecided);
            }
        }
    }

    fn next_match(&mut self) {
        self.resume_at = None;
        let roster = match &self.series {
            Series::Bracket(bracket) => bracket
                .next_pairing()
                .map(|pairing| vec![pairing.left, pairing.right]),
            Series::Elimination(round) => round.next_roster().map(<[String]>::to_vec),
            Series::Single => None,
        };
        let Some(roster) = roster else {
            self.reset();
            return;
        };
        self.fsm.transition(ScreenEvent::NextMatch);
        self.open_match(roster, true);
    }

    fn open_match(&mut self, names: Vec<String>, in_tournament: bool) -> bool {
        self.seed = self.seed.wrapping_add(1);
        let setup = MatchSetup::humans(names)
            .in_tournament(in_tournament)
            .seeded(self.seed);
        match MatchContext::new(setup, self.settings.clone(), self.surface) {
            Ok(ctx) => {
                self.input = InputState::new();
                self.ctx = Some(ctx);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "match not started");
                self.reset();
                false
            }
        }
    }

    fn reset(&mut self) {
        self.fsm.transition(ScreenEvent::Quit);
        self.ctx = None;
        self.resume_at = None;
        self.champion = None;
        self.input = InputState::new();
        self.cancel.reset();
    }
}

/// Feed a two-paddle result to the bracket; returns the champion once decided
fn record_bracket(
    bracket: &mut Bracket,
    result: &MatchResult,
) -> Result<Option<String>, TournamentError> {
    let winner = result.winner().ok_or(TournamentError::Finished)?;
    bracket.record_winner(winner)?;
    Ok(bracket.champion().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Ball, KeyFallback, SinkError};

    #[derive(Default)]
    struct Page {
        texts: Vec<String>,
    }

    impl RenderSurface for Page {
        fn size(&self) -> (f32, f32) {
            (800.0, 600.0)
        }
        fn clear(&mut self) {
            self.texts.clear();
        }
        fn background(&mut self) {}
        fn circle(&mut self, _center: Vec2, _radius: f32) {}
        fn rect(&mut self, _pos: Vec2, _size: Vec2) {}
        fn dashed_line(&mut self, _from: Vec2, _to: Vec2) {}
        fn text(&mut self, text: &str, _at: Vec2, _size: TextSize) {
            self.texts.push(text.to_string());
        }
    }

    struct Signed;

    impl SessionProvider for Signed {
        fn current_user(&self) -> Option<String> {
            Some("host".to_string())
        }
    }

    #[derive(Default)]
    struct Inbox(Vec<ResultRecord>);

    impl ResultSink for Inbox {
        fn submit(&mut self, record: &ResultRecord) -> Result<(), SinkError> {
            self.0.push(record.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Routes(Vec<Route>);

    impl Navigator for Routes {
        fn navigate(&mut self, route: Route) {
            self.0.push(route);
        }
    }

    fn app() -> App {
        App::new(Config::new(), (800.0, 600.0), 1)
    }

    /// Run frames until the screen leaves `state`, forcing the ball into
    /// the right-hand goal so slot 0 wins every point
    fn play_out(app: &mut App, now: &mut f64, page: &mut Page, hosts: &mut Hosts) {
        let start = app.state();
        for _ in 0..100_000 {
            if let Some(ctx) = app.ctx.as_mut() {
                let ball = ctx.ball_entity();
                if let Ok(mut b) = ctx.world_mut().get::<&mut Ball>(ball) {
                    b.pos = Vec2::new(795.0, 40.0);
                    b.vel = Vec2::new(5.0, 0.0);
                }
            }
            *now += 1000.0 / 60.0;
            if app.frame(*now, page, &KeyFallback, hosts) != start {
                return;
            }
        }
        panic!("screen stuck in {:?}", start);
    }

    #[test]
    fn test_single_match_reports_and_waits_for_click() {
        let (mut inbox, mut routes) = (Inbox::default(), Routes::default());
        let mut hosts = Hosts {
            session: &Signed,
            sink: &mut inbox,
            navigator: &mut routes,
        };
        let mut app = app();
        let mut page = Page::default();
        let mut now = 0.0;

        assert!(app.start_match(vec!["Rob".to_string()]));
        play_out(&mut app, &mut now, &mut page, &mut hosts);
        assert_eq!(app.state(), Screen::GameOver);
        assert_eq!(app.take_notice(), Some(ReportStatus::Submitted));

        app.frame(now, &mut page, &KeyFallback, &mut hosts);
        assert!(page.texts.contains(&"Rob game.winner.single".to_string()));
        assert!(page.texts.contains(&"game.restartMessage".to_string()));

        assert!(app.click(hosts.navigator));
        assert_eq!(app.state(), Screen::Playing);
        drop(hosts);
        match &inbox.0[0] {
            ResultRecord::Match(m) => {
                assert_eq!(m.winner, "Rob");
                assert_eq!(m.player2, "AI");
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    /// Accepts at once and fails later, like a background POST
    struct Deferred {
        notices: Notices,
        queued: usize,
    }

    impl ResultSink for Deferred {
        fn submit(&mut self, _record: &ResultRecord) -> Result<(), SinkError> {
            self.queued += 1;
            Ok(())
        }
    }

    #[test]
    fn test_late_delivery_failure_reaches_the_page() {
        let mut app = app();
        let mut sink = Deferred {
            notices: app.notices(),
            queued: 0,
        };
        let mut routes = Routes::default();
        let mut hosts = Hosts {
            session: &Signed,
            sink: &mut sink,
            navigator: &mut routes,
        };
        let mut page = Page::default();
        let mut now = 0.0;

        app.start_match(vec!["a".to_string(), "b".to_string()]);
        play_out(&mut app, &mut now, &mut page, &mut hosts);
        drop(hosts);
        assert_eq!(sink.queued, 1);

        sink.notices
            .push(ReportStatus::Failed("result store answered 503".to_string()));
        assert_eq!(app.take_notice(), Some(ReportStatus::Submitted));
        assert_eq!(
            app.take_notice(),
            Some(ReportStatus::Failed("result store answered 503".to_string()))
        );
        assert_eq!(app.take_notice(), None);
    }

    #[test]
    fn test_bracket_runs_to_a_champion() {
        let (mut inbox, mut routes) = (Inbox::default(), Routes::default());
        let mut hosts = Hosts {
            session: &Signed,
            sink: &mut inbox,
            navigator: &mut routes,
        };
        let mut app = app();
        let mut page = Page::default();
        let mut now = 0.0;
        let names: Vec<String> = (1..=8).map(|i| format!("P{}", i)).collect();

        app.start_tournament(names, hosts.navigator).unwrap();
        let mut matches = 0;
        while app.state() != Screen::Champion {
            // Board first, then the match
            assert_eq!(app.state(), Screen::Intermission);
            while app.state() == Screen::Intermission {
                now += 100.0;
                app.frame(now, &mut page, &KeyFallback, &mut hosts);
            }
            assert!(page.texts.iter().any(|t| t.starts_with("game.matchNumber")));
            play_out(&mut app, &mut now, &mut page, &mut hosts);
            matches += 1;
        }
        assert_eq!(matches, 7);

        app.frame(now, &mut page, &KeyFallback, &mut hosts);
        assert!(page.texts[0].starts_with("🏆 "));
        drop(hosts);
        assert_eq!(inbox.0.len(), 1, "Only the champion is reported");
        assert!(matches!(&inbox.0[0], ResultRecord::Tournament(t) if t.creator_name == "host"));
    }

    #[test]
    fn test_short_roster_goes_back_to_setup() {
        let mut routes = Routes::default();
        let mut app = app();
        let err = app
            .start_tournament(vec!["a".to_string(), "b".to_string()], &mut routes)
            .unwrap_err();
        assert!(matches!(err, TournamentError::RosterSize { got: 2, .. }));
        assert_eq!(routes.0, vec![Route::Setup]);
        assert_eq!(app.state(), Screen::Idle);
    }

    #[test]
    fn test_cancel_returns_home() {
        let (mut inbox, mut routes) = (Inbox::default(), Routes::default());
        let mut hosts = Hosts {
            session: &Signed,
            sink: &mut inbox,
            navigator: &mut routes,
        };
        let mut app = app();
        let mut page = Page::default();
        app.start_match(vec!["a".to_string(), "b".to_string()]);
        app.frame(0.0, &mut page, &KeyFallback, &mut hosts);
        app.cancel();
        assert_eq!(app.frame(16.0, &mut page, &KeyFallback, &mut hosts), Screen::Idle);
        drop(hosts);
        assert_eq!(routes.0, vec![Route::Home]);
        assert!(inbox.0.is_empty());
    }

    #[test]
    fn test_touch_needs_a_match() {
        let mut app = app();
        assert!(!app.touch(Vec2::new(5.0, 300.0)));
        app.start_match(vec!["a".to_string(), "b".to_string()]);
        assert!(app.touch(Vec2::new(5.0, 300.0)));
        assert_eq!(app.input.slot(0).touch, Some(300.0));
    }
}
