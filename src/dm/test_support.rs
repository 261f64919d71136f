//! In-memory [`Transport`] used only by this crate's own tests.
//!
//! Real deployments bring their own transport (spec §6); this one routes
//! `send`/`recv` through a fixed mesh of MPSC channels, one per ordered
//! `(src, dst)` pair, so message order within a pair is exactly FIFO as the
//! DM algorithms require. A `recv` call filters its channel for a matching
//! tag, stashing any non-matching message it pulls off the channel into a
//! small per-pair backlog rather than discarding it — real transports are
//! expected to do the tag-matching themselves, so this is a test fixture,
//! not a template for production code.

use crate::dm::transport::{MessageTag, Transport};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;

struct Envelope {
    tag: MessageTag,
    payload: Vec<u8>,
}

/// An in-memory, FIFO-per-pair transport over a fixed set of ranks.
pub struct ChannelTransport {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Envelope>>,
    receivers: Vec<Mutex<Receiver<Envelope>>>,
    backlog: Vec<Mutex<VecDeque<Envelope>>>,
}

impl ChannelTransport {
    /// Build a fully connected cluster of `size` transports, one per rank.
    #[must_use]
    pub fn cluster(size: usize) -> Vec<ChannelTransport> {
        assert!(size >= 1);
        // channels[src][dst] carries messages src -> dst.
        let mut senders: Vec<Vec<Sender<Envelope>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut receivers: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        for _src in 0..size {
            for _dst in 0..size {
                let (tx, rx) = std::sync::mpsc::channel();
                senders[_src].push(tx);
                receivers[_dst].push(rx);
            }
        }
        // Transpose receivers so transports[r].receivers[peer] reads what
        // peer sent to r.
        let mut receivers_by_rank: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        for (dst, row) in receivers.drain(..).enumerate() {
            for (src, rx) in row.into_iter().enumerate() {
                let _ = src;
                receivers_by_rank[dst].push(rx);
            }
        }

        (0..size)
            .map(|rank| {
                let my_senders: Vec<_> = (0..size).map(|dst| senders[rank][dst].clone()).collect();
                let my_receivers: Vec<_> = receivers_by_rank[rank]
                    .drain(..)
                    .map(Mutex::new)
                    .collect();
                ChannelTransport {
                    rank,
                    size,
                    senders: my_senders,
                    receivers: my_receivers,
                    backlog: (0..size).map(|_| Mutex::new(VecDeque::new())).collect(),
                }
            })
            .collect()
    }
}

impl Transport for ChannelTransport {
    type Error = std::sync::mpsc::RecvError;

    fn send(&self, dst: usize, tag: MessageTag, payload: &[u8]) -> Result<(), Self::Error> {
        self.senders[dst]
            .send(Envelope {
                tag,
                payload: payload.to_vec(),
            })
            .expect("peer transport dropped mid-test");
        Ok(())
    }

    fn recv(&self, src: usize, tag: MessageTag, payload: &mut [u8]) -> Result<(), Self::Error> {
        let mut backlog = self.backlog[src].lock().unwrap();
        if let Some(pos) = backlog.iter().position(|e| e.tag == tag) {
            let envelope = backlog.remove(pos).unwrap();
            let n = payload.len().min(envelope.payload.len());
            payload[..n].copy_from_slice(&envelope.payload[..n]);
            return Ok(());
        }
        drop(backlog);

        let rx = self.receivers[src].lock().unwrap();
        loop {
            let envelope = rx.recv()?;
            if envelope.tag == tag {
                let n = payload.len().min(envelope.payload.len());
                payload[..n].copy_from_slice(&envelope.payload[..n]);
                return Ok(());
            }
            self.backlog[src].lock().unwrap().push_back(envelope);
        }
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_routes_pairwise() {
        let transports = ChannelTransport::cluster(3);
        transports[0].send(1, MessageTag::new(7), b"x").unwrap();
        let mut buf = [0u8; 1];
        transports[1].recv(0, MessageTag::new(7), &mut buf).unwrap();
        assert_eq!(&buf, b"x");
    }

    #[test]
    fn recv_skips_non_matching_tag_until_match_arrives() {
        let transports = ChannelTransport::cluster(2);
        transports[0].send(1, MessageTag::new(1), b"a").unwrap();
        transports[0].send(1, MessageTag::new(2), b"b").unwrap();
        let mut buf = [0u8; 1];
        transports[1].recv(0, MessageTag::new(2), &mut buf).unwrap();
        assert_eq!(&buf, b"b");
        transports[1].recv(0, MessageTag::new(1), &mut buf).unwrap();
        assert_eq!(&buf, b"a");
    }
}
