//! The round state machine and the state it owns.
//!
//! `GameSession` is the single aggregate for one board: round state, ball,
//! paddle, score and the outbox of display, tone and link traffic produced
//! by the last callbacks. Peripherals never touch it directly; `Board` feeds
//! events in and drains the outbox.

use std::cmp::Ordering;
use std::collections::VecDeque;

use catch_traits::{NavEvent, TextMode};

use crate::ball::{BallModel, Direction};
use crate::config::{GameCfg, ServeRole, SpeedTier};
use crate::error::{BuildError, Result};
use crate::frame::FrameOp;
use crate::paddle::{Nudge, PaddleModel};
use crate::protocol::{LinkProtocol, Message, ProtocolFault, WIN_SENTINEL};
use crate::state::{Outcome, RoundState};

/// Sound cues requested by the game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCue {
    Catch,
    Throw,
    Victory,
    /// Stop whatever is playing.
    Silence,
}

/// Link traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub sent: u64,
    pub received: u64,
    pub faults: u64,
}

#[derive(Debug, Default)]
struct Outbox {
    frame: Vec<FrameOp>,
    tones: Vec<ToneCue>,
    link: VecDeque<Message>,
}

#[derive(Debug)]
pub struct GameSession {
    cfg: GameCfg,
    protocol: LinkProtocol,
    state: RoundState,
    cursor: SpeedTier,
    speed: Option<SpeedTier>,
    /// A local choice waits one link poll for a concurrent remote one.
    confirm_pending: bool,
    chose_locally: bool,
    serving: bool,
    ball: BallModel,
    paddle: PaddleModel,
    ball_on_screen: bool,
    outcome: Option<Outcome>,
    score: u32,
    rounds: u32,
    reset_requested: bool,
    reset_tick: u8,
    outbox: Outbox,
    stats: LinkStats,
}

/// Check a runtime config before any board is built from it.
pub fn validate_cfg(cfg: &GameCfg) -> std::result::Result<(), BuildError> {
    if !(3..WIN_SENTINEL).contains(&cfg.grid.rows) {
        return Err(BuildError::InvalidConfig("grid rows out of range"));
    }
    if cfg.grid.cols < 3 {
        return Err(BuildError::InvalidConfig("grid needs at least 3 columns"));
    }
    if cfg.speeds.slow == 0 || cfg.speeds.medium == 0 || cfg.speeds.fast == 0 {
        return Err(BuildError::InvalidConfig("speed ticks must be >= 1"));
    }
    let r = &cfg.rates;
    if r.base_hz == 0 {
        return Err(BuildError::InvalidConfig("base rate must be > 0"));
    }
    let task_rates = [r.input_hz, r.link_hz, r.motion_hz, r.render_hz, r.tone_hz];
    if task_rates.iter().any(|&hz| hz == 0 || hz > r.base_hz) {
        return Err(BuildError::InvalidConfig(
            "task rates must be in 1..=base rate",
        ));
    }
    Ok(())
}

impl GameSession {
    pub fn new(cfg: GameCfg) -> Result<Self> {
        validate_cfg(&cfg).map_err(eyre::Report::new)?;
        let grid = cfg.grid;
        let mut session = Self {
            protocol: LinkProtocol::new(grid.max_row(), cfg.decode),
            state: RoundState::Init,
            cursor: SpeedTier::Slow,
            speed: None,
            confirm_pending: false,
            chose_locally: false,
            serving: false,
            ball: BallModel::new(grid, cfg.speeds.ticks(SpeedTier::Slow)),
            paddle: PaddleModel::new(grid),
            ball_on_screen: false,
            outcome: None,
            score: 0,
            rounds: 0,
            reset_requested: false,
            reset_tick: 0,
            outbox: Outbox::default(),
            stats: LinkStats::default(),
            cfg,
        };
        session.show_banner();
        Ok(session)
    }

    pub fn cfg(&self) -> &GameCfg {
        &self.cfg
    }

    pub fn protocol(&self) -> &LinkProtocol {
        &self.protocol
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Tier currently highlighted in Setup.
    pub fn cursor(&self) -> SpeedTier {
        self.cursor
    }

    /// Agreed speed for the current round, once chosen or received.
    pub fn speed(&self) -> Option<SpeedTier> {
        self.speed
    }

    pub fn ball(&self) -> &BallModel {
        &self.ball
    }

    pub fn paddle(&self) -> &PaddleModel {
        &self.paddle
    }

    pub fn ball_on_screen(&self) -> bool {
        self.ball_on_screen
    }

    /// Outcome of the most recent round; kept across the reset.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Rounds that reached Over since power-up.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_requested
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle_nav(&mut self, event: NavEvent) {
        match (self.state, event) {
            (RoundState::Init, NavEvent::Push) => self.enter_setup(),
            (RoundState::Setup, NavEvent::West) => self.move_cursor(self.cursor.faster()),
            (RoundState::Setup, NavEvent::East) => self.move_cursor(self.cursor.slower()),
            (RoundState::Setup, NavEvent::Push) => self.choose_speed(),
            (RoundState::Playing, NavEvent::North) => self.nudge_paddle(Nudge::North),
            (RoundState::Playing, NavEvent::South) => self.nudge_paddle(Nudge::South),
            (RoundState::Playing, NavEvent::Push) => self.throw(),
            (RoundState::Over, NavEvent::Push) => self.request_reset(),
            _ => {}
        }
    }

    fn enter_setup(&mut self) {
        self.transition(RoundState::Setup);
        self.outbox.frame.push(FrameOp::Mode(TextMode::Step));
        self.outbox.frame.push(FrameOp::Clear);
        self.outbox
            .frame
            .push(FrameOp::Text(self.cursor.label().to_string()));
    }

    fn move_cursor(&mut self, tier: SpeedTier) {
        if tier == self.cursor {
            return;
        }
        self.cursor = tier;
        self.outbox.frame.push(FrameOp::Text(tier.label().to_string()));
    }

    fn choose_speed(&mut self) {
        if self.speed.is_some() {
            return;
        }
        self.speed = Some(self.cursor);
        self.confirm_pending = true;
        self.chose_locally = true;
        self.serving = self.cfg.serve != ServeRole::Never;
        self.outbox.link.push_back(Message::SpeedSelect(self.cursor));
        tracing::debug!(speed = ?self.cursor, "speed chosen locally");
    }

    fn nudge_paddle(&mut self, nudge: Nudge) {
        self.paddle
            .nudge(nudge, &mut self.ball, &mut self.outbox.frame);
    }

    fn throw(&mut self) {
        if !self.paddle.holds_ball() {
            return;
        }
        self.paddle.throw_ball();
        self.ball.throw();
        self.outbox.tones.push(ToneCue::Throw);
        tracing::debug!(row = self.ball.row(), "ball thrown");
    }

    fn request_reset(&mut self) {
        if self.reset_requested {
            return;
        }
        self.reset_requested = true;
        self.outbox.link.push_back(Message::ResetRequest);
        tracing::debug!("reset requested locally");
    }

    // ── Link ─────────────────────────────────────────────────────────────────

    /// Next message to transmit with its wire byte.
    pub fn pop_outgoing(&mut self) -> Option<(Message, u8)> {
        let msg = self.outbox.link.pop_front()?;
        self.stats.sent += 1;
        Some((msg, self.protocol.encode(msg)))
    }

    /// Decode and apply one received byte. Faults are counted and leave the
    /// session untouched.
    pub fn receive(&mut self, byte: u8) -> std::result::Result<Message, ProtocolFault> {
        self.stats.received += 1;
        let applied = self
            .protocol
            .decode(byte, self.state)
            .and_then(|msg| self.apply(msg).map(|()| msg));
        if applied.is_err() {
            self.stats.faults += 1;
        }
        applied
    }

    fn apply(&mut self, msg: Message) -> std::result::Result<(), ProtocolFault> {
        match (self.state, msg) {
            (RoundState::Setup, Message::SpeedSelect(tier)) => {
                match self.speed {
                    Some(mine) if self.chose_locally => self.merge_choice(mine, tier),
                    Some(_) => {}
                    None => {
                        self.speed = Some(tier);
                        self.serving = self.cfg.serve == ServeRole::Always;
                    }
                }
                Ok(())
            }
            (RoundState::Playing, Message::BallHandoff(row)) => {
                if self.ball_on_screen || self.paddle.holds_ball() {
                    return Err(ProtocolFault::BallAlreadyHere);
                }
                self.ball.receive_remote(row, &mut self.outbox.frame);
                self.ball_on_screen = true;
                tracing::debug!(row, "ball received");
                Ok(())
            }
            (RoundState::Playing, Message::Win) => {
                self.score += 1;
                self.outcome = Some(Outcome::Win);
                self.enter_over();
                self.outbox.tones.push(ToneCue::Victory);
                Ok(())
            }
            (RoundState::Over, Message::ResetRequest) => {
                self.reset_requested = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Both players chose before either saw the other's byte. Both boards
    /// settle on the slower tier and exactly one of them serves: the one that
    /// picked the slower tier, or the lead board on a tie. Fixed serve roles
    /// are left alone.
    fn merge_choice(&mut self, mine: SpeedTier, theirs: SpeedTier) {
        self.speed = Some(mine.min(theirs));
        if self.cfg.serve == ServeRole::Chooser {
            self.serving = match mine.cmp(&theirs) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => self.cfg.lead,
            };
        }
        tracing::debug!(
            mine = ?mine,
            theirs = ?theirs,
            serving = self.serving,
            "concurrent speed choices merged"
        );
    }

    /// End-of-poll bookkeeping: start the round once a speed is agreed, and
    /// run the reset debounce. A locally chosen speed starts the round one
    /// poll later so a choice the peer sent in the same tick is still seen.
    pub fn settle_link(&mut self) {
        match self.state {
            RoundState::Setup if self.confirm_pending => self.confirm_pending = false,
            RoundState::Setup if self.speed.is_some() => self.enter_playing(),
            RoundState::Over if self.reset_requested => {
                if self.reset_tick == 1 {
                    self.reset_round();
                } else {
                    self.reset_tick = 1;
                }
            }
            _ => {}
        }
    }

    fn enter_playing(&mut self) {
        let Some(tier) = self.speed else {
            return;
        };
        self.ball.reset();
        self.ball.set_speed(self.cfg.speeds.ticks(tier));
        self.paddle.reset();
        self.transition(RoundState::Playing);
        self.outbox.frame.push(FrameOp::Clear);
        self.paddle.draw(&mut self.outbox.frame);
        self.ball_on_screen = self.serving;
        if self.serving {
            self.paddle.catch_ball();
            self.ball.init_local(&mut self.outbox.frame);
        }
        tracing::info!(speed = ?tier, serving = self.serving, "round started");
    }

    fn enter_over(&mut self) {
        self.transition(RoundState::Over);
        self.rounds += 1;
        self.ball_on_screen = false;
        self.reset_requested = false;
        self.reset_tick = 0;
        self.outbox.frame.push(FrameOp::Clear);
        self.outbox.frame.push(FrameOp::Text(self.score.to_string()));
        tracing::info!(
            outcome = self.outcome.map(Outcome::name),
            score = self.score,
            "round over"
        );
    }

    fn reset_round(&mut self) {
        self.transition(RoundState::Init);
        self.ball.reset();
        self.paddle.reset();
        self.ball_on_screen = false;
        self.speed = None;
        self.confirm_pending = false;
        self.chose_locally = false;
        self.cursor = SpeedTier::Slow;
        self.serving = false;
        self.reset_requested = false;
        self.reset_tick = 0;
        self.outbox.tones.push(ToneCue::Silence);
        self.outbox.frame.push(FrameOp::Clear);
        self.show_banner();
    }

    fn show_banner(&mut self) {
        self.outbox.frame.push(FrameOp::Mode(TextMode::Scroll));
        self.outbox.frame.push(FrameOp::Text(self.cfg.banner.clone()));
    }

    // ── Motion ───────────────────────────────────────────────────────────────

    /// One motion tick: advance the ball, then apply the edge rules.
    pub fn motion_tick(&mut self) {
        if self.state != RoundState::Playing || !self.ball_on_screen {
            return;
        }
        self.ball.tick(&mut self.outbox.frame);
        if !self.ball.in_flight() {
            return;
        }
        let grid = self.cfg.grid;
        match self.ball.direction() {
            Direction::Up if self.ball.col() == 0 => self.hand_off(),
            Direction::Down if self.ball.col() == grid.paddle_col() => self.judge_catch(),
            _ => {}
        }
    }

    fn hand_off(&mut self) {
        let row = self.cfg.grid.mirror_row(self.ball.row());
        self.outbox.link.push_back(Message::BallHandoff(row));
        self.ball.hide(&mut self.outbox.frame);
        self.ball_on_screen = false;
        tracing::debug!(local_row = self.ball.row(), remote_row = row, "ball handed off");
    }

    fn judge_catch(&mut self) {
        if self.ball.row() == self.paddle.row() {
            self.paddle.catch_ball();
            self.outbox.tones.push(ToneCue::Catch);
            self.ball.caught(self.paddle.row(), &mut self.outbox.frame);
            // The ball's old cell was on the paddle column.
            self.paddle.draw(&mut self.outbox.frame);
            tracing::debug!(row = self.paddle.row(), "ball caught");
        } else {
            tracing::debug!(
                ball_row = self.ball.row(),
                paddle_row = self.paddle.row(),
                "ball missed"
            );
            self.outbox.link.push_back(Message::Win);
            self.outcome = Some(Outcome::Lose);
            self.enter_over();
        }
    }

    // ── Outbox ───────────────────────────────────────────────────────────────

    pub fn take_frame(&mut self) -> Vec<FrameOp> {
        std::mem::take(&mut self.outbox.frame)
    }

    pub fn take_tones(&mut self) -> Vec<ToneCue> {
        std::mem::take(&mut self.outbox.tones)
    }

    /// Note sequence configured for `cue`.
    pub fn tone_token(&self, cue: ToneCue) -> &str {
        match cue {
            ToneCue::Catch => &self.cfg.tones.catch,
            ToneCue::Throw => &self.cfg.tones.throw,
            ToneCue::Victory => &self.cfg.tones.victory,
            ToneCue::Silence => "",
        }
    }

    fn transition(&mut self, to: RoundState) {
        tracing::info!(from = %self.state, to = %to, "round state");
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskRates;

    fn session() -> GameSession {
        GameSession::new(GameCfg::default()).expect("valid default cfg")
    }

    #[test]
    fn starts_in_init_with_banner() {
        let mut s = session();
        assert_eq!(s.state(), RoundState::Init);
        let frame = s.take_frame();
        assert_eq!(frame[0], FrameOp::Mode(TextMode::Scroll));
        assert!(matches!(&frame[1], FrameOp::Text(t) if t.starts_with("CATCH")));
    }

    #[test]
    fn setup_cursor_steps_and_labels() {
        let mut s = session();
        s.handle_nav(NavEvent::Push);
        s.take_frame();
        s.handle_nav(NavEvent::West);
        s.handle_nav(NavEvent::West);
        s.handle_nav(NavEvent::West);
        assert_eq!(s.cursor(), SpeedTier::Fast);
        s.handle_nav(NavEvent::East);
        assert_eq!(s.cursor(), SpeedTier::Medium);
        let texts: Vec<FrameOp> = s.take_frame();
        assert_eq!(
            texts,
            vec![
                FrameOp::Text("2".into()),
                FrameOp::Text("3".into()),
                FrameOp::Text("2".into()),
            ]
        );
    }

    #[test]
    fn choosing_queues_speed_and_serves() {
        let mut s = session();
        s.handle_nav(NavEvent::Push);
        s.handle_nav(NavEvent::West);
        s.handle_nav(NavEvent::Push);
        assert_eq!(
            s.pop_outgoing(),
            Some((Message::SpeedSelect(SpeedTier::Medium), 1))
        );
        s.settle_link();
        assert_eq!(s.state(), RoundState::Setup);
        s.settle_link();
        assert_eq!(s.state(), RoundState::Playing);
        assert!(s.paddle().holds_ball());
        assert!(s.ball_on_screen());
        assert_eq!(s.ball().speed_ticks(), 40);
    }

    #[test]
    fn concurrent_choices_converge_on_slower() {
        let mut s = session();
        s.handle_nav(NavEvent::Push);
        s.handle_nav(NavEvent::West);
        s.handle_nav(NavEvent::West);
        s.handle_nav(NavEvent::Push);
        s.settle_link();
        assert_eq!(s.receive(0), Ok(Message::SpeedSelect(SpeedTier::Slow)));
        s.settle_link();
        assert_eq!(s.speed(), Some(SpeedTier::Slow));
        assert_eq!(s.state(), RoundState::Playing);
        assert_eq!(s.ball().speed_ticks(), 90);
        // The peer picked the slower tier, so the peer serves.
        assert!(!s.paddle().holds_ball());
        assert!(!s.ball_on_screen());
    }

    #[rstest::rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn equal_concurrent_choices_serve_only_on_lead(#[case] lead: bool, #[case] serves: bool) {
        let mut s = GameSession::new(GameCfg {
            lead,
            ..GameCfg::default()
        })
        .unwrap();
        s.handle_nav(NavEvent::Push);
        s.handle_nav(NavEvent::Push);
        s.settle_link();
        assert_eq!(s.receive(0), Ok(Message::SpeedSelect(SpeedTier::Slow)));
        s.settle_link();
        assert_eq!(s.state(), RoundState::Playing);
        assert_eq!(s.paddle().holds_ball(), serves);
        assert_eq!(s.ball_on_screen(), serves);
    }

    #[test]
    fn slower_local_choice_keeps_the_serve() {
        let mut s = session();
        s.handle_nav(NavEvent::Push);
        s.handle_nav(NavEvent::Push);
        s.settle_link();
        assert_eq!(s.receive(2), Ok(Message::SpeedSelect(SpeedTier::Fast)));
        s.settle_link();
        assert_eq!(s.speed(), Some(SpeedTier::Slow));
        assert!(s.paddle().holds_ball());
    }

    #[test]
    fn never_role_does_not_serve_after_choosing() {
        let cfg = GameCfg {
            serve: ServeRole::Never,
            ..GameCfg::default()
        };
        let mut s = GameSession::new(cfg).unwrap();
        s.handle_nav(NavEvent::Push);
        s.handle_nav(NavEvent::Push);
        s.settle_link();
        s.settle_link();
        assert_eq!(s.state(), RoundState::Playing);
        assert!(!s.paddle().holds_ball());
        assert!(!s.ball_on_screen());
    }

    #[test]
    fn rejects_zero_rate() {
        let cfg = GameCfg {
            rates: TaskRates {
                tone_hz: 0,
                ..TaskRates::default()
            },
            ..GameCfg::default()
        };
        let err = GameSession::new(cfg).expect_err("zero rate");
        assert!(err.downcast_ref::<BuildError>().is_some());
    }

    #[test]
    fn throw_without_ball_is_ignored() {
        let mut s = session();
        s.handle_nav(NavEvent::Push);
        assert_eq!(s.receive(2), Ok(Message::SpeedSelect(SpeedTier::Fast)));
        s.settle_link();
        s.take_tones();
        s.handle_nav(NavEvent::Push);
        assert!(s.take_tones().is_empty());
        assert!(!s.ball().in_flight());
    }
}
