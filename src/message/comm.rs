use super::util;

/// Interface for a group of processes that can exchange messages. The
/// underlying transport can in principle be TCP, in-process channels, or a
/// higher level abstraction like MPI.
///
/// Messages between any ordered pair of ranks must be delivered in the order
/// they were sent. The collective operations below rely on this: as long as
/// every rank issues the same sequence of collectives, messages belonging to
/// consecutive collectives can never be confused.
///
pub trait Communicator {
    /// Must be implemented to return the rank of this process within the
    /// communicator.
    fn rank(&self) -> usize;

    /// Must be implemented to return the number of peers processes in this
    /// communicator.
    fn size(&self) -> usize;

    /// Must be implemented to send a message to a peer. This method must
    /// return immediately, in other words it is not allowed to block until a
    /// matching receive is posted.
    fn send(&self, rank: usize, message: Vec<u8>);

    /// Must be implemented to receive the next message from the given peer.
    /// This method is allowed to block until a message is ready to be
    /// received.
    fn recv(&self, rank: usize) -> Vec<u8>;

    /// Implements a binomial tree broadcast from the root node. The message
    /// buffer must be `Some` if this is the root node, and it must be `None`
    /// otherwise.
    ///
    fn broadcast(&self, value: Option<Vec<u8>>) -> Vec<u8> {
        let r = self.rank();
        let p = self.size();
        let mut value = value;

        for level in (0..util::ceil_log2(p)).rev() {
            let one = 1 << level;
            let two = 1 << (level + 1);

            if r % two == 0 {
                if r + one < p {
                    let message = value.clone().expect("broadcast root must supply a value");
                    self.send(r + one, message)
                }
            } else if r % one == 0 {
                value = Some(self.recv(r - one))
            }
        }
        value.expect("broadcast root must supply a value")
    }

    /// Implements a binomial tree reduce. All ranks return `None` except for
    /// the root. The fold order is fixed by the rank layout, so the result is
    /// reproducible for a given communicator size.
    ///
    fn reduce<F>(&self, f: F, mut value: Vec<u8>) -> Option<Vec<u8>>
    where
        F: Fn(Vec<u8>, Vec<u8>) -> Vec<u8>,
    {
        let r = self.rank();
        let p = self.size();

        for level in 0..util::ceil_log2(p) {
            let one = 1 << level;
            let two = 1 << (level + 1);

            if r % two == 0 {
                if r + one < p {
                    value = f(value, self.recv(r + one))
                }
            } else {
                self.send(r - one, value);
                return None;
            }
        }
        Some(value)
    }

    /// Implements an all-reduce (symmetric fold) operation over a commutative
    /// binary operator.
    ///
    fn all_reduce<F>(&self, f: F, value: Vec<u8>) -> Vec<u8>
    where
        F: Fn(Vec<u8>, Vec<u8>) -> Vec<u8>,
    {
        self.broadcast(self.reduce(f, value))
    }
}

/// The communicator of a single process. Every collective completes
/// immediately with the local value.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialCommunicator;

impl Communicator for SerialCommunicator {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn send(&self, rank: usize, _message: Vec<u8>) {
        panic!("serial communicator has no peer {}", rank)
    }

    fn recv(&self, rank: usize) -> Vec<u8> {
        panic!("serial communicator has no peer {}", rank)
    }
}
