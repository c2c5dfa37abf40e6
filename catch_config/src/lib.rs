#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and input-script parsing for the catch game.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the stock 7x5 game.
//! - Input scripts are CSV files with strict headers that drive the
//!   simulated navigation switches of both boards.
use serde::Deserialize;

/// Largest grid height; rows must stay below the control sentinels on the wire.
pub const MAX_ROWS: u8 = 16;
/// Largest grid width.
pub const MAX_COLS: u8 = 16;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Grid {
    pub rows: u8,
    pub cols: u8,
}

impl Default for Grid {
    fn default() -> Self {
        Self { rows: 7, cols: 5 }
    }
}

/// Ticks of the motion task between ball steps, per selectable tier.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Speed {
    pub slow_ticks: u16,
    pub medium_ticks: u16,
    pub fast_ticks: u16,
}

impl Default for Speed {
    fn default() -> Self {
        Self {
            slow_ticks: 90,
            medium_ticks: 40,
            fast_ticks: 20,
        }
    }
}

/// Scheduler rates in Hz. Each task runs every `base_hz / task_hz` base ticks.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Tasks {
    pub base_hz: u32,
    pub input_hz: u32,
    pub link_hz: u32,
    pub motion_hz: u32,
    pub render_hz: u32,
    pub tone_hz: u32,
}

impl Default for Tasks {
    fn default() -> Self {
        Self {
            base_hz: 1000,
            input_hz: 100,
            link_hz: 100,
            motion_hz: 250,
            render_hz: 250,
            tone_hz: 100,
        }
    }
}

/// Which board starts a round holding the ball.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Serve {
    /// The board whose player confirmed the speed holds the ball.
    #[default]
    Chooser,
    /// This board always serves.
    Always,
    /// This board never serves.
    Never,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Board {
    pub serve: Serve,
    /// Serve when both players confirm the same speed at once. Set on exactly
    /// one of the two boards.
    pub lead: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Out-of-range and unexpected bytes are reported as faults.
    #[default]
    Strict,
    /// Legacy interpretation: any byte in Over is a reset, unknown speeds are medium.
    Lenient,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Protocol {
    pub decode: DecodeMode,
}

/// Note sequences handed to the buzzer.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Tone {
    pub catch: String,
    pub throw: String,
    pub victory: String,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            catch: "C".to_string(),
            throw: "E".to_string(),
            victory: "C E G C+ G E C+ > ".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Display {
    /// Scrolling text shown at power-up and after every reset.
    pub banner: String,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            banner: "CATCH! PRESS TO CHOOSE SPEED".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub speed: Speed,
    #[serde(default)]
    pub tasks: Tasks,
    #[serde(default)]
    pub board: Board,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Grid
        if !(3..=MAX_ROWS).contains(&self.grid.rows) {
            eyre::bail!("grid.rows must be in [3, {MAX_ROWS}]");
        }
        if !(3..=MAX_COLS).contains(&self.grid.cols) {
            eyre::bail!("grid.cols must be in [3, {MAX_COLS}]");
        }

        // Speed
        if self.speed.slow_ticks == 0 || self.speed.medium_ticks == 0 || self.speed.fast_ticks == 0
        {
            eyre::bail!("speed ticks must be >= 1");
        }
        if !(self.speed.slow_ticks >= self.speed.medium_ticks
            && self.speed.medium_ticks >= self.speed.fast_ticks)
        {
            eyre::bail!("speed ticks must satisfy slow_ticks >= medium_ticks >= fast_ticks");
        }

        // Tasks
        if self.tasks.base_hz == 0 {
            eyre::bail!("tasks.base_hz must be > 0");
        }
        for (name, hz) in [
            ("input_hz", self.tasks.input_hz),
            ("link_hz", self.tasks.link_hz),
            ("motion_hz", self.tasks.motion_hz),
            ("render_hz", self.tasks.render_hz),
            ("tone_hz", self.tasks.tone_hz),
        ] {
            if hz == 0 {
                eyre::bail!("tasks.{name} must be > 0");
            }
            if hz > self.tasks.base_hz {
                eyre::bail!("tasks.{name} must be <= tasks.base_hz");
            }
        }

        // Tone
        if self.tone.catch.is_empty() || self.tone.throw.is_empty() {
            eyre::bail!("tone.catch and tone.throw must not be empty");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Board a scripted event is addressed to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoardId {
    A,
    B,
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardId::A => f.write_str("a"),
            BoardId::B => f.write_str("b"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavKey {
    North,
    South,
    East,
    West,
    Push,
}

/// Input script schema.
///
/// Expected headers:
/// tick,board,event
///
/// Example:
/// tick,board,event
/// 0,a,push
/// 0,b,push
/// 200,a,push
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRow {
    pub tick: u64,
    pub board: BoardId,
    pub event: NavKey,
}

/// Parse an input script from any reader. Rows are returned ordered by tick;
/// rows sharing a tick keep their file order.
pub fn parse_input_script<R: std::io::Read>(reader: R) -> eyre::Result<Vec<ScriptRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read script headers: {}", e))?
        .clone();
    let expected = ["tick", "board", "event"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "input script must have headers 'tick,board,event', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ScriptRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid script row {}: {}", idx + 2, e);
            }
        }
    }
    rows.sort_by_key(|r| r.tick);
    Ok(rows)
}

pub fn load_input_script(path: &std::path::Path) -> eyre::Result<Vec<ScriptRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open input script {:?}: {}", path, e))?;
    parse_input_script(file)
}
