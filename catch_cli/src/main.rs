mod cli;
mod error_fmt;
mod sim;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::sim::SimOptions;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    let code = match real_main(cli) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            error_fmt::exit_code_for_error(&err)
        }
    };
    std::process::exit(code);
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let text = std::fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {:?}", cli.config))?;
    let cfg = catch_config::load_toml(&text).wrap_err("parse config TOML")?;
    cfg.validate().wrap_err("invalid configuration")?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging);
    tracing::debug!(config = ?cli.config, "config loaded");

    match cli.cmd {
        Commands::Simulate {
            ticks,
            script,
            realtime,
            show,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            if realtime {
                let flag = Arc::clone(&shutdown);
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "failed to install Ctrl-C handler");
                }
            }
            let opts = SimOptions {
                ticks,
                script,
                realtime,
            };
            let summary = sim::run_sim(&cfg, &opts, shutdown)?;
            if cli.json {
                println!("{}", summary.to_json());
            } else {
                print!("{}", summary.to_text(show));
            }
        }
        Commands::SelfCheck => {
            let lines = sim::self_check(&cfg)?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true, "checks": lines }));
            } else {
                for line in &lines {
                    println!("{line}");
                }
                println!("self-check ok");
            }
        }
    }
    Ok(())
}

/// Console layer on stderr (`RUST_LOG` wins over `--log-level`), plus an
/// optional JSON-lines file layer from `[logging]`.
fn init_tracing(json: bool, level: &str, logging: &catch_config::Logging) {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let file = logging.file.as_deref().map(|path| {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "catch.log".into(), |n| n.to_string_lossy().into_owned());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let file_filter = EnvFilter::try_new(logging.level.as_deref().unwrap_or("info"))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(file_filter)
    });

    let _ = tracing_subscriber::registry()
        .with(console.with_filter(console_filter))
        .with(file)
        .try_init();
}
