use crossbeam_channel::{Receiver, Sender};
use log::error;

use super::comm::Communicator;

/// A communicator whose ranks live in the same process, typically one per
/// thread. Every ordered pair of ranks is connected by its own unbounded
/// channel, which gives the per-pair FIFO ordering the collectives need.
///
pub struct ChannelCommunicator {
    rank: usize,
    senders: Vec<Sender<Vec<u8>>>,
    receivers: Vec<Receiver<Vec<u8>>>,
}

impl ChannelCommunicator {
    /// Create the endpoints of a group of `size` ranks. Endpoint `r` is meant
    /// to be moved to the thread which plays rank `r`.
    ///
    pub fn group(size: usize) -> Vec<Self> {
        let mut senders: Vec<Vec<_>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut receivers: Vec<Vec<_>> = (0..size).map(|_| Vec::with_capacity(size)).collect();

        // channel (src, dst): the sender goes to src, the receiver to dst
        for src in 0..size {
            for dst in 0..size {
                let (s, r) = crossbeam_channel::unbounded();
                senders[src].push(s);
                receivers[dst].push(r);
            }
        }
        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| Self { rank, senders, receivers })
            .collect()
    }
}

impl Communicator for ChannelCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn send(&self, rank: usize, message: Vec<u8>) {
        if self.senders[rank].send(message).is_err() {
            error!("rank {} failed to send to rank {}: peer hung up", self.rank, rank);
            panic!("peer {} hung up", rank)
        }
    }

    fn recv(&self, rank: usize) -> Vec<u8> {
        match self.receivers[rank].recv() {
            Ok(message) => message,
            Err(_) => {
                error!("rank {} failed to receive from rank {}: peer hung up", self.rank, rank);
                panic!("peer {} hung up", rank)
            }
        }
    }
}
