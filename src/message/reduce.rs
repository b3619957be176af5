use log::trace;
use num_complex::Complex64;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::comm::Communicator;

/// The combination rule of a collective reduction.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Min,
    Max,
}

/// A scalar which can take part in a collective reduction.
///
pub trait Reducible: Copy + Serialize + DeserializeOwned {
    /// Combine two partial results under the given rule. Types without an
    /// order panic on `Min` and `Max`. Integer sums use the native `+`, so
    /// they panic on overflow in debug builds and wrap in release builds.
    fn combine(op: ReduceOp, a: Self, b: Self) -> Self;
}

/// The reduction capability injected into the hierarchy-wide operators. A
/// group of size one passes values through unchanged.
///
/// Every process must issue the same reductions in the same order; a
/// mismatch hangs or produces wrong answers and cannot be detected locally.
///
pub trait Reducer {
    /// The number of processes taking part in each reduction.
    fn num_processes(&self) -> usize;

    /// Reduce a value over all processes; every process gets the result.
    fn reduce_scalar<T: Reducible>(&self, op: ReduceOp, value: T) -> T;

    fn reduce_sum<T: Reducible>(&self, value: T) -> T {
        self.reduce_scalar(ReduceOp::Sum, value)
    }

    fn reduce_min<T: Reducible>(&self, value: T) -> T {
        self.reduce_scalar(ReduceOp::Min, value)
    }

    fn reduce_max<T: Reducible>(&self, value: T) -> T {
        self.reduce_scalar(ReduceOp::Max, value)
    }
}

impl<C: Communicator> Reducer for C {
    fn num_processes(&self) -> usize {
        Communicator::size(self)
    }

    fn reduce_scalar<T: Reducible>(&self, op: ReduceOp, value: T) -> T {
        trace!("rank {}: all-reduce ({:?}) over {} ranks", self.rank(), op, Communicator::size(self));

        let bytes = Communicator::all_reduce(self, |a, b| {
            encode(&T::combine(op, decode(&a), decode(&b)))
        }, encode(&value));

        decode(&bytes)
    }
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    rmp_serde::encode::to_vec(value)
        .unwrap_or_else(|e| panic!("failed to encode reduction payload: {}", e))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> T {
    rmp_serde::decode::from_slice(bytes)
        .unwrap_or_else(|e| panic!("failed to decode reduction payload: {}", e))
}

macro_rules! impl_reducible_ordered {
    ($($t:ty),*) => {
        $(
            impl Reducible for $t {
                fn combine(op: ReduceOp, a: Self, b: Self) -> Self {
                    match op {
                        ReduceOp::Sum => a + b,
                        ReduceOp::Min => if b < a { b } else { a },
                        ReduceOp::Max => if b > a { b } else { a },
                    }
                }
            }
        )*
    };
}

impl_reducible_ordered!(i32, i64, u64, usize, f32, f64);

impl Reducible for Complex64 {
    fn combine(op: ReduceOp, a: Self, b: Self) -> Self {
        match op {
            ReduceOp::Sum => a + b,
            _ => panic!("complex values have no order; cannot reduce with {:?}", op),
        }
    }
}
