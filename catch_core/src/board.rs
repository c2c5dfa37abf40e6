//! One board: a `GameSession` wired to its four peripherals and driven by
//! the cooperative scheduler.

use catch_traits::{BoxError, Buzzer, DotMatrix, NavEvent, NavSwitch, SerialLink};
use eyre::WrapErr;

use crate::config::GameCfg;
use crate::error::{BuildError, Result};
use crate::frame::FrameOp;
use crate::hw_error::map_hw_error;
use crate::scheduler::{Scheduler, Task};
use crate::session::GameSession;
use crate::state::RoundState;

#[inline]
fn hw(e: BoxError) -> eyre::Report {
    eyre::Report::new(map_hw_error(&*e))
}

pub struct Board<D, N, L, B> {
    id: String,
    session: GameSession,
    matrix: D,
    nav: N,
    link: L,
    buzzer: B,
    scheduler: Scheduler,
    events: Vec<NavEvent>,
}

impl<D, N, L, B> core::fmt::Debug for Board<D, N, L, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Board")
            .field("id", &self.id)
            .field("tick", &self.scheduler.tick())
            .field("state", &self.session.state())
            .field("score", &self.session.score())
            .finish_non_exhaustive()
    }
}

impl<D, N, L, B> Board<D, N, L, B>
where
    D: DotMatrix,
    N: NavSwitch,
    L: SerialLink,
    B: Buzzer,
{
    pub fn builder() -> BoardBuilder<D, N, L, B> {
        BoardBuilder::default()
    }

    /// Run every task due on the current base tick, then advance the tick.
    pub fn step(&mut self) -> Result<()> {
        let span = tracing::debug_span!("board", id = %self.id);
        let _enter = span.enter();
        for task in Task::ORDER {
            if self.scheduler.is_due(task) {
                self.run(task)?;
            }
        }
        self.scheduler.advance();
        Ok(())
    }

    /// Run one task immediately, regardless of its period.
    pub fn run(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Input => self.input_task(),
            Task::Link => self.link_task(),
            Task::Motion => {
                self.session.motion_tick();
                Ok(())
            }
            Task::Render => self.render_task(),
            Task::Tone => self.tone_task(),
        }
    }

    fn input_task(&mut self) -> Result<()> {
        self.events.clear();
        self.nav
            .poll(&mut self.events)
            .map_err(hw)
            .wrap_err("navswitch poll")?;
        for ev in self.events.drain(..) {
            tracing::trace!(event = ?ev, state = %self.session.state(), "nav");
            self.session.handle_nav(ev);
        }
        Ok(())
    }

    /// Flush queued messages, read at most one byte, then settle the round.
    fn link_task(&mut self) -> Result<()> {
        while let Some((msg, byte)) = self.session.pop_outgoing() {
            tracing::debug!(?msg, byte, "link send");
            self.link.try_send(byte).map_err(hw).wrap_err("link send")?;
        }
        // Init does not listen; anything sent early waits for Setup.
        if self.session.state() != RoundState::Init && self.link.byte_ready() {
            let byte = self.link.receive_byte().map_err(hw).wrap_err("link receive")?;
            tracing::trace!(byte, "link recv");
            match self.session.receive(byte) {
                Ok(msg) => tracing::debug!(?msg, "link message"),
                Err(fault) => tracing::warn!(
                    %fault,
                    byte,
                    state = %self.session.state(),
                    "protocol fault; byte ignored"
                ),
            }
        }
        self.session.settle_link();
        Ok(())
    }

    fn render_task(&mut self) -> Result<()> {
        for op in self.session.take_frame() {
            tracing::trace!(?op, "frame");
            match op {
                FrameOp::Cell { row, col, on } => self.matrix.set_cell(row, col, on),
                FrameOp::Text(text) => self.matrix.show_text(&text),
                FrameOp::Mode(mode) => self.matrix.set_text_mode(mode),
                FrameOp::Clear => self.matrix.clear(),
            }
            .map_err(hw)
            .wrap_err("display update")?;
        }
        self.matrix
            .refresh()
            .map_err(hw)
            .wrap_err("display refresh")
    }

    fn tone_task(&mut self) -> Result<()> {
        for cue in self.session.take_tones() {
            let token = self.session.tone_token(cue);
            tracing::debug!(?cue, token, "tone");
            self.buzzer
                .play_sequence(token)
                .map_err(hw)
                .wrap_err("buzzer")?;
        }
        Ok(())
    }
}

impl<D, N, L, B> Board<D, N, L, B> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Index of the next base tick.
    pub fn tick(&self) -> u64 {
        self.scheduler.tick()
    }

    pub fn matrix(&self) -> &D {
        &self.matrix
    }

    pub fn nav_mut(&mut self) -> &mut N {
        &mut self.nav
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }
}

/// Builder for `Board`. Peripherals are required; the config defaults.
pub struct BoardBuilder<D, N, L, B> {
    id: Option<String>,
    cfg: Option<GameCfg>,
    matrix: Option<D>,
    nav: Option<N>,
    link: Option<L>,
    buzzer: Option<B>,
}

impl<D, N, L, B> Default for BoardBuilder<D, N, L, B> {
    fn default() -> Self {
        Self {
            id: None,
            cfg: None,
            matrix: None,
            nav: None,
            link: None,
            buzzer: None,
        }
    }
}

impl<D, N, L, B> BoardBuilder<D, N, L, B>
where
    D: DotMatrix,
    N: NavSwitch,
    L: SerialLink,
    B: Buzzer,
{
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_config(mut self, cfg: GameCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn with_display(mut self, matrix: D) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_input(mut self, nav: N) -> Self {
        self.nav = Some(nav);
        self
    }

    pub fn with_link(mut self, link: L) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_tone(mut self, buzzer: B) -> Self {
        self.buzzer = Some(buzzer);
        self
    }

    pub fn try_build(self) -> Result<Board<D, N, L, B>> {
        let BoardBuilder {
            id,
            cfg,
            matrix,
            nav,
            link,
            buzzer,
        } = self;

        let matrix = matrix.ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;
        let nav = nav.ok_or_else(|| eyre::Report::new(BuildError::MissingInput))?;
        let link = link.ok_or_else(|| eyre::Report::new(BuildError::MissingLink))?;
        let buzzer = buzzer.ok_or_else(|| eyre::Report::new(BuildError::MissingBuzzer))?;
        let cfg = cfg.unwrap_or_default();
        let id = id.unwrap_or_else(|| "board".to_string());

        let scheduler = Scheduler::new(&cfg.rates);
        let session = GameSession::new(cfg)?;
        tracing::debug!(
            id = %id,
            tick_us = scheduler.tick_us(),
            motion_period = scheduler.period(Task::Motion),
            link_period = scheduler.period(Task::Link),
            "board built"
        );
        Ok(Board {
            id,
            session,
            matrix,
            nav,
            link,
            buzzer,
            scheduler,
            events: Vec::with_capacity(4),
        })
    }
}
