//! Single-permit "frame ready" signal.
//!
//! A [`ReadySignal`] is a mailbox that holds at most one presence-only token.
//! The producer task posts a token once per frame with [`send()`](ReadySignal::send),
//! which waits while the previous token is still pending. The refill ISR
//! removes tokens with [`try_receive()`](ReadySignal::try_receive) or the
//! two-phase [`try_claim()`](ReadySignal::try_claim), neither of which blocks.
//!
//! # Safety Contract
//!
//! - Only ONE task may send (the "producer").
//! - Only ONE context may receive or claim (the "consumer", usually an ISR).
//! - Posting a token has release semantics and receiving it has acquire
//!   semantics, so every write the producer made before `send()` completed is
//!   visible to the consumer once it observes the token. The reverse holds for
//!   [`Claim::release()`]: reads made under a claim finish before the producer's
//!   next `send()` can complete.
//! - The token and parked flags use `SeqCst`: a sender parking while the
//!   consumer releases must see either the empty slot or be woken.

use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};

use embassy_sync::waitqueue::AtomicWaker;

/// Result of removing a token from the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received {
    /// A sender was parked on the full mailbox and has been woken.
    ///
    /// Interrupt glue uses this to request a context switch on return.
    pub woke_task: bool,
}

/// Capacity-1 mailbox carrying a presence-only token.
pub struct ReadySignal {
    /// A token is waiting to be consumed.
    pending: AtomicBool,
    /// The sender registered its waker and is waiting for the slot.
    parked: AtomicBool,
    waker: AtomicWaker,
}

impl ReadySignal {
    /// Create an empty signal.
    pub const fn new() -> Self {
        ReadySignal {
            pending: AtomicBool::new(false),
            parked: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// Post a token, waiting until the previous one has been consumed.
    ///
    /// Task context only. If the returned future is dropped before it
    /// completes, no token is posted.
    pub fn send(&self) -> SendFuture<'_> {
        SendFuture { signal: self }
    }

    /// Post a token if the mailbox is empty. Returns `false` when full.
    pub fn try_send(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Remove the pending token, if any. Never blocks; ISR-safe.
    pub fn try_receive(&self) -> Option<Received> {
        if self.pending.swap(false, Ordering::SeqCst) {
            Some(self.wake_sender())
        } else {
            None
        }
    }

    /// Observe the pending token without removing it.
    ///
    /// The token stays in the mailbox until [`Claim::release()`] is called,
    /// so the producer stays blocked while the consumer reads the data the
    /// token refers to. Dropping the claim leaves the token pending.
    pub fn try_claim(&self) -> Option<Claim<'_>> {
        if self.pending.load(Ordering::Acquire) {
            Some(Claim { signal: self })
        } else {
            None
        }
    }

    /// Check whether a token is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Drop any pending token. Exclusive access means no context is waiting.
    pub(crate) fn reset(&mut self) {
        *self.pending.get_mut() = false;
        *self.parked.get_mut() = false;
    }

    fn wake_sender(&self) -> Received {
        let woke_task = self.parked.swap(false, Ordering::SeqCst);
        if woke_task {
            self.waker.wake();
        }
        Received { woke_task }
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a token is pending, held by the consumer while it reads.
#[must_use = "dropping a claim leaves the token pending"]
pub struct Claim<'a> {
    signal: &'a ReadySignal,
}

impl Claim<'_> {
    /// Remove the claimed token and wake the sender if it is parked.
    pub fn release(self) -> Received {
        // Only the consumer clears `pending`, so the token is still there.
        self.signal.pending.store(false, Ordering::SeqCst);
        self.signal.wake_sender()
    }
}

/// Future returned by [`ReadySignal::send()`].
#[must_use = "futures do nothing unless polled"]
pub struct SendFuture<'a> {
    signal: &'a ReadySignal,
}

impl Future for SendFuture<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let signal = self.signal;
        if signal.try_send() {
            return Poll::Ready(());
        }

        signal.waker.register(cx.waker());
        signal.parked.store(true, Ordering::SeqCst);

        // Re-check: the consumer may have emptied the slot between the first
        // attempt and registering the waker.
        if signal.try_send() {
            signal.parked.store(false, Ordering::Relaxed);
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

impl Drop for SendFuture<'_> {
    fn drop(&mut self) {
        self.signal.parked.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn new_is_empty() {
        let signal = ReadySignal::new();
        assert!(!signal.is_pending());
        assert_eq!(signal.try_receive(), None);
        assert!(signal.try_claim().is_none());
    }

    #[test]
    fn send_then_receive_once() {
        let signal = ReadySignal::new();
        assert!(signal.send().now_or_never().is_some());
        assert!(signal.is_pending());

        assert_eq!(signal.try_receive(), Some(Received { woke_task: false }));
        assert_eq!(signal.try_receive(), None);
        assert_eq!(signal.try_receive(), None);
    }

    #[test]
    fn capacity_is_one() {
        let signal = ReadySignal::new();
        assert!(signal.try_send());
        assert!(!signal.try_send());

        // A second send stays pending until the token is consumed.
        assert!(signal.send().now_or_never().is_none());
        assert!(signal.try_receive().is_some());
        assert!(signal.send().now_or_never().is_some());
        assert!(signal.try_receive().is_some());
        assert!(signal.try_receive().is_none());
    }

    #[test]
    fn dropped_send_posts_nothing() {
        let signal = ReadySignal::new();
        assert!(signal.try_send());
        drop(signal.send().now_or_never());
        assert!(signal.try_receive().is_some());
        // The abandoned send must not have left a token behind.
        assert!(signal.try_receive().is_none());
    }

    #[test]
    fn claim_keeps_token_until_release() {
        let signal = ReadySignal::new();
        assert!(signal.try_send());

        let claim = signal.try_claim().unwrap();
        assert!(signal.is_pending());
        assert!(!signal.try_send());

        assert_eq!(claim.release(), Received { woke_task: false });
        assert!(!signal.is_pending());
        assert!(signal.try_send());
    }

    #[test]
    fn dropped_claim_leaves_token() {
        let signal = ReadySignal::new();
        assert!(signal.try_send());
        drop(signal.try_claim());
        assert!(signal.is_pending());
        assert!(signal.try_receive().is_some());
    }

    #[test]
    fn receive_reports_parked_sender() {
        let signal = ReadySignal::new();
        assert!(signal.try_send());

        let mut send = signal.send();
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(Pin::new(&mut send).poll(&mut cx).is_pending());

        assert_eq!(signal.try_receive(), Some(Received { woke_task: true }));
        assert!(Pin::new(&mut send).poll(&mut cx).is_ready());
        drop(send);

        // Nobody is parked on the token just posted.
        assert_eq!(signal.try_receive(), Some(Received { woke_task: false }));
    }

    #[test]
    fn interleaved_sequence_conserves_tokens() {
        // Script of operations: true = try_send, false = try_receive.
        let script = [
            true, true, false, false, true, false, true, true, true, false, false, true, false,
        ];
        let signal = ReadySignal::new();
        let mut model_pending = false;
        let mut sent = 0;
        let mut received = 0;

        for &op in script.iter() {
            if op {
                let ok = signal.try_send();
                assert_eq!(ok, !model_pending);
                if ok {
                    sent += 1;
                    model_pending = true;
                }
            } else {
                let got = signal.try_receive().is_some();
                assert_eq!(got, model_pending);
                if got {
                    received += 1;
                    model_pending = false;
                }
            }
            assert!(sent - received <= 1);
        }
        assert_eq!(sent, 4);
        assert_eq!(received, 4);
    }

    #[test]
    fn threaded_sender_and_receiver_agree() {
        const TOKENS: usize = 2_000;
        let signal = ReadySignal::new();
        let received = AtomicUsize::new(0);

        thread::scope(|s| {
            s.spawn(|| {
                futures::executor::block_on(async {
                    for _ in 0..TOKENS {
                        signal.send().await;
                    }
                });
            });
            s.spawn(|| {
                while received.load(Ordering::Relaxed) < TOKENS {
                    if signal.try_receive().is_some() {
                        received.fetch_add(1, Ordering::Relaxed);
                    } else {
                        thread::yield_now();
                    }
                }
            });
        });

        assert_eq!(received.load(Ordering::Relaxed), TOKENS);
        assert!(!signal.is_pending());
    }
}
