//! Test and helper mocks for catch_core.
//!
//! These are in-process, single-threaded peripherals for unit tests,
//! benches and examples. `catch_hardware` has the richer simulated ones.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use catch_traits::{BoxError, Buzzer, DotMatrix, NavEvent, NavSwitch, SerialLink, TextMode};

use crate::board::Board;
use crate::config::GameCfg;
use crate::error::Result as CoreResult;

/// Matrix that remembers lit cells and the text it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingMatrix {
    lit: BTreeSet<(u8, u8)>,
    texts: Vec<String>,
    mode: Option<TextMode>,
    refreshes: u64,
}

impl RecordingMatrix {
    pub fn is_lit(&self, row: u8, col: u8) -> bool {
        self.lit.contains(&(row, col))
    }

    pub fn lit_cells(&self) -> Vec<(u8, u8)> {
        self.lit.iter().copied().collect()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn last_text(&self) -> Option<&str> {
        self.texts.last().map(String::as_str)
    }

    pub fn mode(&self) -> Option<TextMode> {
        self.mode
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl DotMatrix for RecordingMatrix {
    fn set_cell(&mut self, row: u8, col: u8, on: bool) -> Result<(), BoxError> {
        if on {
            self.lit.insert((row, col));
        } else {
            self.lit.remove(&(row, col));
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), BoxError> {
        self.refreshes += 1;
        Ok(())
    }

    fn show_text(&mut self, text: &str) -> Result<(), BoxError> {
        self.texts.push(text.to_string());
        Ok(())
    }

    fn set_text_mode(&mut self, mode: TextMode) -> Result<(), BoxError> {
        self.mode = Some(mode);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BoxError> {
        self.lit.clear();
        Ok(())
    }
}

/// A display whose bus always fails; exercises error propagation.
#[derive(Debug, Default)]
pub struct FailingMatrix;

impl DotMatrix for FailingMatrix {
    fn set_cell(&mut self, _row: u8, _col: u8, _on: bool) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("display bus stuck")))
    }

    fn refresh(&mut self) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("display bus stuck")))
    }

    fn show_text(&mut self, _text: &str) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("display bus stuck")))
    }

    fn set_text_mode(&mut self, _mode: TextMode) -> Result<(), BoxError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Navswitch fed by the test; each queued event is reported once.
#[derive(Debug, Default)]
pub struct QueueNav {
    pending: VecDeque<NavEvent>,
}

impl QueueNav {
    pub fn push(&mut self, ev: NavEvent) {
        self.pending.push_back(ev);
    }
}

impl NavSwitch for QueueNav {
    fn poll(&mut self, events: &mut Vec<NavEvent>) -> Result<(), BoxError> {
        events.extend(self.pending.drain(..));
        Ok(())
    }
}

type ByteQueue = Rc<RefCell<VecDeque<u8>>>;

/// One end of an in-memory, reliable, in-order byte link.
#[derive(Debug)]
pub struct LoopbackLink {
    inbox: ByteQueue,
    peer: ByteQueue,
    sent: Vec<u8>,
}

impl LoopbackLink {
    /// Two connected ends.
    pub fn pair() -> (Self, Self) {
        let ab: ByteQueue = Rc::default();
        let ba: ByteQueue = Rc::default();
        (
            Self {
                inbox: Rc::clone(&ba),
                peer: Rc::clone(&ab),
                sent: Vec::new(),
            },
            Self {
                inbox: ab,
                peer: ba,
                sent: Vec::new(),
            },
        )
    }

    /// Deliver `byte` to this end as if the peer had sent it.
    pub fn inject(&self, byte: u8) {
        self.inbox.borrow_mut().push_back(byte);
    }

    /// Everything this end has transmitted.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl SerialLink for LoopbackLink {
    fn try_send(&mut self, byte: u8) -> Result<(), BoxError> {
        self.sent.push(byte);
        self.peer.borrow_mut().push_back(byte);
        Ok(())
    }

    fn byte_ready(&mut self) -> bool {
        !self.inbox.borrow().is_empty()
    }

    fn receive_byte(&mut self) -> Result<u8, BoxError> {
        self.inbox
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Box::new(std::io::Error::other("link: no byte pending")) as BoxError)
    }
}

/// Buzzer that records every sequence it is asked to play.
#[derive(Debug, Default)]
pub struct RecordingBuzzer {
    played: Vec<String>,
}

impl RecordingBuzzer {
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl Buzzer for RecordingBuzzer {
    fn play_sequence(&mut self, token: &str) -> Result<(), BoxError> {
        self.played.push(token.to_string());
        Ok(())
    }
}

/// Board assembled from the mocks above.
pub type MockBoard = Board<RecordingMatrix, QueueNav, LoopbackLink, RecordingBuzzer>;

/// Two mock boards `a` and `b` sharing a loopback link.
pub fn mock_pair(cfg_a: GameCfg, cfg_b: GameCfg) -> CoreResult<(MockBoard, MockBoard)> {
    let (la, lb) = LoopbackLink::pair();
    let a = MockBoard::builder()
        .with_id("a")
        .with_config(cfg_a)
        .with_display(RecordingMatrix::default())
        .with_input(QueueNav::default())
        .with_link(la)
        .with_tone(RecordingBuzzer::default())
        .try_build()?;
    let b = MockBoard::builder()
        .with_id("b")
        .with_config(cfg_b)
        .with_display(RecordingMatrix::default())
        .with_input(QueueNav::default())
        .with_link(lb)
        .with_tone(RecordingBuzzer::default())
        .try_build()?;
    Ok((a, b))
}
