use catch_traits::{BoxError, Buzzer};

/// Buzzer that logs each sequence instead of sounding it.
#[derive(Debug, Default)]
pub struct LoggingBuzzer {
    current: Option<String>,
    history: Vec<String>,
}

impl LoggingBuzzer {
    /// Sequence currently playing; `None` after a silence.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Buzzer for LoggingBuzzer {
    fn play_sequence(&mut self, token: &str) -> Result<(), BoxError> {
        if token.is_empty() {
            tracing::debug!("buzzer silenced");
            self.current = None;
        } else {
            tracing::debug!(token, "buzzer play");
            self.current = Some(token.to_string());
        }
        self.history.push(token.to_string());
        Ok(())
    }
}
