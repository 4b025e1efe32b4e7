//! Synchronization between the producer task and the refill ISR.
//!
//! The only primitive is [`ReadySignal`], a single-permit mailbox. It carries
//! no payload: which frame a token refers to is implied by the order in which
//! tokens are posted (see [`crate::frame`]).

pub mod ready;

pub use ready::{Claim, ReadySignal, Received, SendFuture};
