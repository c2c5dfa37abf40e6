//! Two simulated boards: assembly, scripted input and the run summary.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use catch_config::{BoardId, NavKey, ScriptRow};
use catch_core::error::Result as CoreResult;
use catch_core::conversions::nav_event;
use catch_core::hw_error::map_hw_error;
use catch_core::{
    Board, GameCfg, LinkStats, Outcome, RESET_SENTINEL, RoundState, RunOptions, RunReport,
    run_pair,
};
use catch_hardware::util::wait_for_byte;
use catch_hardware::{FrameBuffer, LoggingBuzzer, ScriptedNavSwitch, SimulatedLink};
use catch_traits::{Buzzer, DotMatrix, MonotonicClock, SerialLink};
use eyre::WrapErr;

pub type SimBoard = Board<FrameBuffer, ScriptedNavSwitch, SimulatedLink, LoggingBuzzer>;

/// One round at the default rates: `a` picks medium, moves up a row and
/// throws; `b` stays put and misses, so `a` wins.
pub const DEMO_SCRIPT: &[ScriptRow] = &[
    ScriptRow { tick: 0, board: BoardId::A, event: NavKey::Push },
    ScriptRow { tick: 0, board: BoardId::B, event: NavKey::Push },
    ScriptRow { tick: 100, board: BoardId::A, event: NavKey::West },
    ScriptRow { tick: 200, board: BoardId::A, event: NavKey::Push },
    ScriptRow { tick: 300, board: BoardId::A, event: NavKey::North },
    ScriptRow { tick: 400, board: BoardId::A, event: NavKey::Push },
];

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub ticks: u64,
    pub script: Option<PathBuf>,
    pub realtime: bool,
}

#[derive(Debug, Clone)]
pub struct BoardSummary {
    pub id: &'static str,
    pub state: RoundState,
    pub outcome: Option<Outcome>,
    pub score: u32,
    pub rounds: u32,
    pub stats: LinkStats,
    pub frame: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SimSummary {
    pub report: RunReport,
    pub boards: [BoardSummary; 2],
}

impl SimSummary {
    /// Board whose last finished round was a win, if any.
    pub fn winner(&self) -> Option<&'static str> {
        self.boards
            .iter()
            .find(|b| b.outcome == Some(Outcome::Win))
            .map(|b| b.id)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let boards: Vec<_> = self
            .boards
            .iter()
            .map(|b| {
                serde_json::json!({
                    "id": b.id,
                    "state": b.state.name(),
                    "outcome": b.outcome.map(Outcome::name),
                    "score": b.score,
                    "rounds": b.rounds,
                    "sent": b.stats.sent,
                    "received": b.stats.received,
                    "faults": b.stats.faults,
                })
            })
            .collect();
        serde_json::json!({
            "ticks": self.report.ticks,
            "late_ticks": self.report.late_ticks,
            "interrupted": self.report.interrupted,
            "winner": self.winner(),
            "boards": boards,
        })
    }

    pub fn to_text(&self, show: bool) -> String {
        let mut s = format!("ticks: {}\n", self.report.ticks);
        for b in &self.boards {
            s.push_str(&format!(
                "board {}: state={} outcome={} score={} rounds={} sent={} received={} faults={}\n",
                b.id,
                b.state,
                b.outcome.map_or("-", Outcome::name),
                b.score,
                b.rounds,
                b.stats.sent,
                b.stats.received,
                b.stats.faults,
            ));
            if show {
                if let Some(text) = &b.text {
                    s.push_str(&format!("text: {text}\n"));
                }
                s.push_str(&b.frame);
            }
        }
        s.push_str(&format!("winner: {}\n", self.winner().unwrap_or("none")));
        s
    }
}

fn nav_for(rows: &[ScriptRow], id: BoardId) -> ScriptedNavSwitch {
    ScriptedNavSwitch::new(
        rows.iter()
            .filter(|r| r.board == id)
            .map(|r| (r.tick, nav_event(r.event))),
    )
}

fn sim_board(
    cfg: &GameCfg,
    rows: &[ScriptRow],
    id: BoardId,
    link: SimulatedLink,
) -> CoreResult<SimBoard> {
    SimBoard::builder()
        .with_id(id.to_string())
        // One config drives both boards here; `a` breaks serve ties.
        .with_config(GameCfg {
            lead: id == BoardId::A,
            ..cfg.clone()
        })
        .with_display(FrameBuffer::new(cfg.grid.rows, cfg.grid.cols))
        .with_input(nav_for(rows, id))
        .with_link(link)
        .with_tone(LoggingBuzzer::default())
        .try_build()
}

/// Two boards joined by a simulated cable, fed from `rows`.
pub fn build_pair(cfg: &GameCfg, rows: &[ScriptRow]) -> CoreResult<(SimBoard, SimBoard)> {
    let (la, lb) = SimulatedLink::pair();
    let a = sim_board(cfg, rows, BoardId::A, la)?;
    let b = sim_board(cfg, rows, BoardId::B, lb)?;
    Ok((a, b))
}

fn summarize(board: &SimBoard, id: &'static str) -> BoardSummary {
    let s = board.session();
    BoardSummary {
        id,
        state: s.state(),
        outcome: s.outcome(),
        score: s.score(),
        rounds: s.rounds(),
        stats: s.stats(),
        frame: board.matrix().render_ascii(),
        text: board.matrix().text().map(str::to_string),
    }
}

pub fn run_sim(
    cfg: &catch_config::Config,
    opts: &SimOptions,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<SimSummary> {
    let game: GameCfg = cfg.into();
    let (rows, demo) = match &opts.script {
        Some(path) => (catch_config::load_input_script(path)?, false),
        None => (DEMO_SCRIPT.to_vec(), true),
    };
    let (mut a, mut b) = build_pair(&game, &rows).wrap_err("assemble boards")?;

    let run_opts = RunOptions {
        max_ticks: opts.ticks,
        // The demo is a single round; custom scripts may play several.
        stop_when_over: demo,
        pace: opts
            .realtime
            .then(|| Arc::new(MonotonicClock::new()) as Arc<dyn catch_traits::Clock + Send + Sync>),
        shutdown: Some(shutdown),
    };
    tracing::info!(events = rows.len(), demo, ticks = opts.ticks, "simulate");
    let report = run_pair(&mut a, &mut b, &run_opts, |t, a, b| {
        a.nav_mut().advance_to(t);
        b.nav_mut().advance_to(t);
    })?;

    Ok(SimSummary {
        report,
        boards: [summarize(&a, "a"), summarize(&b, "b")],
    })
}

/// Validate wiring of every simulated peripheral and one board tick.
pub fn self_check(cfg: &catch_config::Config) -> eyre::Result<Vec<String>> {
    let game: GameCfg = cfg.into();
    let mut lines = Vec::new();
    let hw = |e: catch_traits::BoxError| eyre::Report::new(map_hw_error(&*e));

    let (mut la, mut lb) = SimulatedLink::pair();
    la.try_send(RESET_SENTINEL).map_err(hw).wrap_err("link send")?;
    let byte = wait_for_byte(&mut lb, Duration::from_millis(100), Duration::from_micros(200))
        .wrap_err("link loopback")?;
    eyre::ensure!(byte == RESET_SENTINEL, "link loopback returned {byte:#04x}");
    lines.push("link: ok".to_string());

    let mut fb = FrameBuffer::new(game.grid.rows, game.grid.cols);
    for row in 0..game.grid.rows {
        for col in 0..game.grid.cols {
            fb.set_cell(row, col, true).map_err(hw).wrap_err("display")?;
        }
    }
    fb.refresh().map_err(hw).wrap_err("display")?;
    eyre::ensure!(
        fb.lit(game.grid.max_row(), game.grid.max_col()),
        "display did not latch the last cell"
    );
    fb.clear().map_err(hw).wrap_err("display")?;
    lines.push(format!("display: ok ({}x{})", game.grid.rows, game.grid.cols));

    let mut bz = LoggingBuzzer::default();
    bz.play_sequence(&game.tones.catch).map_err(hw).wrap_err("buzzer")?;
    bz.play_sequence("").map_err(hw).wrap_err("buzzer")?;
    lines.push("buzzer: ok".to_string());

    let (mut a, _b) = build_pair(&game, &[]).wrap_err("assemble boards")?;
    a.step()?;
    eyre::ensure!(
        a.session().state() == RoundState::Init,
        "fresh board is not waiting in init"
    );
    lines.push(format!(
        "board: ok (tick {} us, motion every {} ticks)",
        a.scheduler().tick_us(),
        a.scheduler().period(catch_core::Task::Motion)
    ));
    Ok(lines)
}
