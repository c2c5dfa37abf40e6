#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any text either fails to parse, fails validation, or yields a config
    // the core accepts. None of the three may panic.
    let Ok(cfg) = toml::from_str::<catch_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let game: catch_core::GameCfg = (&cfg).into();
    assert!(catch_core::session::validate_cfg(&game).is_ok());
    let _ = catch_core::GameSession::new(game);
});
