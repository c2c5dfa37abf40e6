//! Maps `Box<dyn Error>` from peripheral boundaries to typed `GameError`.
//!
//! The traits in `catch_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to the core error enum, with an optional
//! feature-gated path for `catch_hardware::HwError` downcasting.

use crate::error::GameError;

/// Map a peripheral-boundary error to a typed `GameError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> GameError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<catch_hardware::error::HwError>() {
            return match hw {
                catch_hardware::error::HwError::LinkClosed
                | catch_hardware::error::HwError::NoByte => GameError::Link(hw.to_string()),
                other => GameError::Peripheral(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("link") || lower.contains("uart") || lower.contains("disconnected") {
        GameError::Link(s)
    } else {
        GameError::Peripheral(s)
    }
}
