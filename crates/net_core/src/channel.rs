//! Typed in-proc channels for intents and events.
//!
//! Messages cross as encoded frames (one `WireEncode` message per
//! frame), so swapping the mpsc pair for a real transport changes
//! nothing above this module. Receivers are non-blocking; the
//! authority loop drains between ticks.

use std::marker::PhantomData;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::wire::{WireDecode, WireEncode};

pub struct Tx<T> {
    inner: Sender<Vec<u8>>,
    _msg: PhantomData<T>,
}

pub struct Rx<T> {
    inner: Receiver<Vec<u8>>,
    _msg: PhantomData<T>,
}

impl<T> Clone for Tx<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _msg: PhantomData,
        }
    }
}

/// Create a sender/receiver pair carrying frames of `T`. The
/// underlying channel is unbounded.
#[must_use]
pub fn channel<T>() -> (Tx<T>, Rx<T>) {
    let (s, r) = mpsc::channel::<Vec<u8>>();
    (
        Tx {
            inner: s,
            _msg: PhantomData,
        },
        Rx {
            inner: r,
            _msg: PhantomData,
        },
    )
}

impl<T: WireEncode> Tx<T> {
    /// Encode and send one message; returns false if the receiver is
    /// dropped.
    #[must_use]
    pub fn send(&self, msg: &T) -> bool {
        let mut buf = Vec::new();
        msg.encode(&mut buf);
        self.inner.send(buf).is_ok()
    }
}

impl<T: WireDecode> Rx<T> {
    /// Non-blocking receive and decode of a single frame. A corrupt
    /// frame surfaces as `Some(Err(..))`; the caller decides whether
    /// to log or drop.
    pub fn try_recv(&self) -> Option<anyhow::Result<T>> {
        let bytes = self.inner.try_recv().ok()?;
        Some(T::decode(&mut &bytes[..]))
    }

    /// Drain all currently queued frames in arrival order.
    #[must_use]
    pub fn drain(&self) -> Vec<anyhow::Result<T>> {
        let mut out = Vec::new();
        while let Some(msg) = self.try_recv() {
            out.push(msg);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Intent;
    use crate::event::Event;

    #[test]
    fn intents_arrive_typed_and_ordered() {
        let (tx, rx) = channel::<Intent>();
        assert!(tx.send(&Intent::Attack {
            attacker: 3,
            at: 0.5
        }));
        assert!(tx.send(&Intent::Defend {
            entity: 3,
            active: true
        }));
        let got = rx.drain();
        assert_eq!(got.len(), 2);
        assert_eq!(
            got[0].as_ref().unwrap(),
            &Intent::Attack {
                attacker: 3,
                at: 0.5
            }
        );
        assert_eq!(
            got[1].as_ref().unwrap(),
            &Intent::Defend {
                entity: 3,
                active: true
            }
        );
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn event_frames_roundtrip() {
        let (tx, rx) = channel::<Event>();
        let ev = Event::MatchEnded { winner: 7 };
        assert!(tx.send(&ev));
        assert_eq!(rx.try_recv().unwrap().unwrap(), ev);
    }

    #[test]
    fn cloned_sender_feeds_the_same_receiver() {
        let (tx, rx) = channel::<Event>();
        let tx2 = tx.clone();
        assert!(tx.send(&Event::MatchEnded { winner: 1 }));
        assert!(tx2.send(&Event::MatchEnded { winner: 2 }));
        assert_eq!(rx.drain().len(), 2);
    }
}
