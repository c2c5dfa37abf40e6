//! Conversions from catch_config (TOML-deserialized) types to catch_core runtime types.

use crate::config::{
    DecodePolicy, GameCfg, GridCfg, ServeRole, SpeedTable, TaskRates, ToneCfg,
};
use catch_traits::NavEvent;

impl From<&catch_config::Grid> for GridCfg {
    fn from(g: &catch_config::Grid) -> Self {
        GridCfg {
            rows: g.rows,
            cols: g.cols,
        }
    }
}

impl From<&catch_config::Speed> for SpeedTable {
    fn from(s: &catch_config::Speed) -> Self {
        SpeedTable {
            slow: s.slow_ticks,
            medium: s.medium_ticks,
            fast: s.fast_ticks,
        }
    }
}

impl From<&catch_config::Tasks> for TaskRates {
    fn from(t: &catch_config::Tasks) -> Self {
        TaskRates {
            base_hz: t.base_hz,
            input_hz: t.input_hz,
            link_hz: t.link_hz,
            motion_hz: t.motion_hz,
            render_hz: t.render_hz,
            tone_hz: t.tone_hz,
        }
    }
}

impl From<catch_config::Serve> for ServeRole {
    fn from(s: catch_config::Serve) -> Self {
        match s {
            catch_config::Serve::Chooser => ServeRole::Chooser,
            catch_config::Serve::Always => ServeRole::Always,
            catch_config::Serve::Never => ServeRole::Never,
        }
    }
}

impl From<catch_config::DecodeMode> for DecodePolicy {
    fn from(m: catch_config::DecodeMode) -> Self {
        match m {
            catch_config::DecodeMode::Strict => DecodePolicy::Strict,
            catch_config::DecodeMode::Lenient => DecodePolicy::Lenient,
        }
    }
}

impl From<&catch_config::Tone> for ToneCfg {
    fn from(t: &catch_config::Tone) -> Self {
        ToneCfg {
            catch: t.catch.clone(),
            throw: t.throw.clone(),
            victory: t.victory.clone(),
        }
    }
}

impl From<&catch_config::Config> for GameCfg {
    fn from(c: &catch_config::Config) -> Self {
        GameCfg {
            grid: (&c.grid).into(),
            speeds: (&c.speed).into(),
            rates: (&c.tasks).into(),
            serve: c.board.serve.into(),
            lead: c.board.lead,
            decode: c.protocol.decode.into(),
            tones: (&c.tone).into(),
            banner: c.display.banner.clone(),
        }
    }
}

/// Script key to switch event. Both types live outside this crate, so this
/// is a function rather than a `From` impl.
pub fn nav_event(k: catch_config::NavKey) -> NavEvent {
    match k {
        catch_config::NavKey::North => NavEvent::North,
        catch_config::NavKey::South => NavEvent::South,
        catch_config::NavKey::East => NavEvent::East,
        catch_config::NavKey::West => NavEvent::West,
        catch_config::NavKey::Push => NavEvent::Push,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_maps_to_default_runtime_cfg() {
        let cfg: GameCfg = (&catch_config::Config::default()).into();
        assert_eq!(cfg, GameCfg::default());
    }

    #[test]
    fn serve_and_decode_map_one_to_one() {
        assert_eq!(ServeRole::from(catch_config::Serve::Never), ServeRole::Never);
        assert_eq!(
            DecodePolicy::from(catch_config::DecodeMode::Lenient),
            DecodePolicy::Lenient
        );
        assert_eq!(nav_event(catch_config::NavKey::West), NavEvent::West);
    }
}
