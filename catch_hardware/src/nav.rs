use std::collections::VecDeque;

use catch_traits::{BoxError, NavEvent, NavSwitch};

/// Navswitch that replays `(tick, event)` pairs. The owner moves the clock
/// with `advance_to`; every event at or before the current tick is reported
/// by the next poll, once.
#[derive(Debug, Default)]
pub struct ScriptedNavSwitch {
    script: VecDeque<(u64, NavEvent)>,
    now: u64,
}

impl ScriptedNavSwitch {
    pub fn new(events: impl IntoIterator<Item = (u64, NavEvent)>) -> Self {
        let mut v: Vec<_> = events.into_iter().collect();
        v.sort_by_key(|(t, _)| *t);
        Self {
            script: v.into(),
            now: 0,
        }
    }

    pub fn advance_to(&mut self, tick: u64) {
        self.now = self.now.max(tick);
    }

    /// Events not yet reported.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl NavSwitch for ScriptedNavSwitch {
    fn poll(&mut self, events: &mut Vec<NavEvent>) -> Result<(), BoxError> {
        while let Some(&(t, ev)) = self.script.front() {
            if t > self.now {
                break;
            }
            self.script.pop_front();
            tracing::trace!(tick = t, event = ?ev, "nav actuation");
            events.push(ev);
        }
        Ok(())
    }
}
