//! Runtime configuration for a board.
//!
//! These are the structs used by `GameSession` and `Board`. They are separate
//! from the TOML-deserialized config in `catch_config`; see `conversions`.

/// Matrix geometry. Rows run along the paddle's axis of travel, columns run
/// from the far edge (col 0) to the paddle (col `cols - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCfg {
    pub rows: u8,
    pub cols: u8,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self { rows: 7, cols: 5 }
    }
}

impl GridCfg {
    #[inline]
    pub fn max_row(&self) -> u8 {
        self.rows - 1
    }

    #[inline]
    pub fn max_col(&self) -> u8 {
        self.cols - 1
    }

    /// Column the paddle is drawn on; an incoming ball is judged here.
    #[inline]
    pub fn paddle_col(&self) -> u8 {
        self.max_col()
    }

    /// Column a held ball sits on, one in front of the paddle.
    #[inline]
    pub fn held_col(&self) -> u8 {
        self.cols - 2
    }

    #[inline]
    pub fn start_row(&self) -> u8 {
        self.rows / 2
    }

    /// The paddle covers `row` and `row + 1`.
    #[inline]
    pub fn max_paddle_row(&self) -> u8 {
        self.max_row() - 1
    }

    /// Row as seen by the other board, which faces this one.
    #[inline]
    pub fn mirror_row(&self, row: u8) -> u8 {
        self.max_row().saturating_sub(row)
    }
}

/// Selectable ball speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SpeedTier {
    #[default]
    Slow,
    Medium,
    Fast,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 3] = [SpeedTier::Slow, SpeedTier::Medium, SpeedTier::Fast];

    /// Wire index, 0..=2.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            SpeedTier::Slow => 0,
            SpeedTier::Medium => 1,
            SpeedTier::Fast => 2,
        }
    }

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(usize::from(i)).copied()
    }

    /// Next tier up, saturating at Fast.
    pub fn faster(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(SpeedTier::Fast)
    }

    /// Next tier down, saturating at Slow.
    pub fn slower(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(SpeedTier::Slow)
    }

    /// Digit shown on the matrix while choosing.
    pub fn label(self) -> char {
        char::from(b'1' + self.index())
    }
}

/// Motion ticks between ball steps, per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTable {
    pub slow: u16,
    pub medium: u16,
    pub fast: u16,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            slow: 90,
            medium: 40,
            fast: 20,
        }
    }
}

impl SpeedTable {
    pub fn ticks(&self, tier: SpeedTier) -> u16 {
        match tier {
            SpeedTier::Slow => self.slow,
            SpeedTier::Medium => self.medium,
            SpeedTier::Fast => self.fast,
        }
    }
}

/// Scheduler rates in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRates {
    pub base_hz: u32,
    pub input_hz: u32,
    pub link_hz: u32,
    pub motion_hz: u32,
    pub render_hz: u32,
    pub tone_hz: u32,
}

impl Default for TaskRates {
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

impl TaskRates {
    /// Every task runs on every base tick.
    pub fn uniform(hz: u32) -> Self {
        Self {
            base_hz: hz,
            input_hz: hz,
            link_hz: hz,
            motion_hz: hz,
            render_hz: hz,
            tone_hz: hz,
        }
    }
}

/// Which board starts a round holding the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeRole {
    /// Whoever confirms the speed locally serves.
    #[default]
    Chooser,
    Always,
    Never,
}

/// How bytes that do not fit the current state are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    #[default]
    Strict,
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCfg {
    pub catch: String,
    pub throw: String,
    pub victory: String,
}

impl Default for ToneCfg {
    fn default() -> Self {
        Self {
            catch: "C".to_string(),
            throw: "E".to_string(),
            victory: "C E G C+ G E C+ > ".to_string(),
        }
    }
}

/// Everything a board needs to run a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCfg {
    pub grid: GridCfg,
    pub speeds: SpeedTable,
    pub rates: TaskRates,
    pub serve: ServeRole,
    /// Wins the serve when both boards choose the same tier at once.
    pub lead: bool,
    pub decode: DecodePolicy,
    pub tones: ToneCfg,
    pub banner: String,
}

impl Default for GameCfg {
    fn default() -> Self {
        Self {
            grid: GridCfg::default(),
            speeds: SpeedTable::default(),
            rates: TaskRates::default(),
            serve: ServeRole::default(),
            lead: false,
            decode: DecodePolicy::default(),
            tones: ToneCfg::default(),
            banner: "CATCH! PRESS TO CHOOSE SPEED".to_string(),
        }
    }
}
