use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError, unbounded};

use catch_traits::{BoxError, SerialLink};

use crate::error::HwError;

/// One end of a simulated serial cable. Bytes arrive in order and are never
/// lost; the two ends may live on different threads.
#[derive(Debug)]
pub struct SimulatedLink {
    tx: Sender<u8>,
    rx: Receiver<u8>,
    peeked: Option<u8>,
}

impl SimulatedLink {
    /// Two connected ends.
    pub fn pair() -> (Self, Self) {
        let (tx_ab, rx_ab) = unbounded();
        let (tx_ba, rx_ba) = unbounded();
        (
            Self {
                tx: tx_ab,
                rx: rx_ba,
                peeked: None,
            },
            Self {
                tx: tx_ba,
                rx: rx_ab,
                peeked: None,
            },
        )
    }

    /// Bytes waiting to be read at this end.
    pub fn pending(&self) -> usize {
        self.rx.len() + usize::from(self.peeked.is_some())
    }
}

impl SerialLink for SimulatedLink {
    fn try_send(&mut self, byte: u8) -> Result<(), BoxError> {
        self.tx.try_send(byte).map_err(|e| match e {
            TrySendError::Disconnected(_) => HwError::LinkClosed,
            TrySendError::Full(_) => HwError::Io(std::io::Error::other("uart tx full")),
        })?;
        tracing::trace!(byte, "uart tx");
        Ok(())
    }

    fn byte_ready(&mut self) -> bool {
        if self.peeked.is_none() {
            self.peeked = self.rx.try_recv().ok();
        }
        self.peeked.is_some()
    }

    fn receive_byte(&mut self) -> Result<u8, BoxError> {
        if let Some(b) = self.peeked.take() {
            return Ok(b);
        }
        match self.rx.try_recv() {
            Ok(b) => Ok(b),
            Err(TryRecvError::Empty) => Err(HwError::NoByte.into()),
            Err(TryRecvError::Disconnected) => Err(HwError::LinkClosed.into()),
        }
    }
}
