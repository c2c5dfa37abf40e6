//! Human-readable error descriptions and structured JSON error formatting.

use catch_core::error::{BuildError, GameError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingDisplay => {
                "What happened: No display was provided to the board.\nLikely causes: The matrix driver failed to initialize or was not wired into the builder.\nHow to fix: Pass the display via with_display(...).".to_string()
            }
            BuildError::MissingInput => {
                "What happened: No navigation switch was provided to the board.\nLikely causes: The input driver was not wired into the builder.\nHow to fix: Pass the navswitch via with_input(...).".to_string()
            }
            BuildError::MissingLink => {
                "What happened: No serial link was provided to the board.\nLikely causes: The link to the other board was not opened.\nHow to fix: Pass the link via with_link(...).".to_string()
            }
            BuildError::MissingBuzzer => {
                "What happened: No buzzer was provided to the board.\nLikely causes: The tone driver was not wired into the builder.\nHow to fix: Pass the buzzer via with_tone(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range [grid], [speed] or [tasks] values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/catch.toml for a sample."
            ),
        };
    }

    if let Some(ge) = err.downcast_ref::<GameError>() {
        return match ge {
            GameError::Link(msg) => format!(
                "What happened: The serial link failed ({msg}).\nLikely causes: The other board went away or the cable is disconnected.\nHow to fix: Reconnect both boards and restart the round."
            ),
            GameError::Peripheral(msg) => format!(
                "What happened: A peripheral reported an error ({msg}).\nLikely causes: Display, navswitch or buzzer driver failure.\nHow to fix: Re-run with --log-level=debug to see which task failed."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("input script must have headers") {
        return "Invalid headers in input script. Expected 'tick,board,event'.".to_string();
    }

    if lower.contains("invalid script row") || lower.contains("open input script") {
        return format!(
            "What happened: The input script could not be used.\nLikely causes: Missing file, or a row with an unknown board (a|b) or event (north|south|east|west|push).\nHow to fix: Fix the CSV and rerun. Details: {msg}"
        );
    }

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path.\nHow to fix: Point --config at a TOML file (see etc/catch.toml). Details: {msg}"
        );
    }

    if lower.contains("invalid configuration") || lower.contains("parse config") {
        return format!(
            "What happened: Configuration is invalid.\nLikely causes: {msg}\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 peripheral, 4 serial link, 5 board assembly, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 5;
    }
    match err.downcast_ref::<GameError>() {
        Some(GameError::Peripheral(_)) => 3,
        Some(GameError::Link(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match err.downcast_ref::<GameError>() {
        Some(GameError::Peripheral(_)) => "Peripheral",
        Some(GameError::Link(_)) => "Link",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_get_their_own_code() {
        let err = eyre::Report::new(BuildError::MissingLink);
        assert_eq!(exit_code_for_error(&err), 5);
        assert!(humanize(&err).contains("serial link"));
    }

    #[test]
    fn wrapped_link_error_is_still_typed() {
        use eyre::WrapErr;
        let err: eyre::Result<()> =
            Err(eyre::Report::new(GameError::Link("disconnected".into()))).wrap_err("link send");
        let err = err.unwrap_err();
        assert_eq!(exit_code_for_error(&err), 4);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Link");
        assert_eq!(v["code"], 4);
    }

    #[test]
    fn script_header_message_is_short() {
        let err = eyre::eyre!("input script must have headers 'tick,board,event', got: t,b,e");
        assert_eq!(
            humanize(&err),
            "Invalid headers in input script. Expected 'tick,board,event'."
        );
    }
}
