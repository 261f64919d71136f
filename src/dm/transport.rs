//! The transport interface consumed by the distributed-memory (DM) barrier
//! algorithms (spec §6).
//!
//! This crate does not implement a distributed transport itself — that is
//! an external collaborator (spec §1). It only consumes `send`/`recv`,
//! assuming a reliable, ordered, rank-addressable, point-to-point channel
//! (FIFO per `(sender, receiver, tag)`, per spec §3/§4.7).

/// A message tag distinguishing logically different exchanges on the same
/// `(src, dst)` pair, for transports that do not otherwise guarantee FIFO
/// ordering across message "kinds" (spec §4.8's `LOSER_ARRIVAL` /
/// `WINNER_WAKEUP` distinction, and §4.7's episode-parity tagging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageTag(pub i32);

impl MessageTag {
    /// Construct a tag from a raw value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        MessageTag(value)
    }
}

/// A reliable, ordered, rank-addressable point-to-point transport.
///
/// Per spec §6, `N <= 1` byte of payload is sufficient for every algorithm
/// in this crate — barrier messages carry no data, only a tag.
pub trait Transport {
    /// The error type returned by a failed `send`/`recv`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `payload` to rank `dst` tagged `tag`. Blocks until accepted by
    /// the transport.
    fn send(&self, dst: usize, tag: MessageTag, payload: &[u8]) -> Result<(), Self::Error>;

    /// Receive into `payload` from rank `src` tagged `tag`. Blocks until a
    /// matching message arrives.
    fn recv(&self, src: usize, tag: MessageTag, payload: &mut [u8]) -> Result<(), Self::Error>;

    /// This process's rank within the communicator.
    fn rank(&self) -> usize;

    /// Total number of participants in the communicator.
    fn size(&self) -> usize;
}
