use std::time::{Duration, Instant};

use catch_traits::SerialLink;

use crate::error::{HwError, Result};

/// Poll `link` until a byte is ready or `timeout` expires, then read it.
/// Sleeps in small intervals to avoid CPU spinning.
pub fn wait_for_byte(
    link: &mut impl SerialLink,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<u8> {
    let deadline = Instant::now() + timeout;
    while !link.byte_ready() {
        if Instant::now() >= deadline {
            return Err(HwError::NoByte);
        }
        std::thread::sleep(poll_interval);
    }
    link.receive_byte()
        .map_err(|e| match e.downcast::<HwError>() {
            Ok(hw) => *hw,
            Err(other) => HwError::Io(std::io::Error::other(other.to_string())),
        })
}
