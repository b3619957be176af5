//! This module exports a minimal message-passing API, which is encapsulated
//! by a `Communicator` trait. Implementors only need to write `send` and
//! `recv` operations for a given transport layer; the trait then provides
//! default implementations for broadcast, reduce, and all-reduce operations.
//! The `reduce` submodule layers the scalar reductions used by the
//! hierarchy-wide operators on top of any communicator.
//!

pub mod channel;
pub mod comm;
pub mod reduce;
pub mod util;
