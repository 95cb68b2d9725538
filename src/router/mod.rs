//! Router Module
//!
//! Turns "which shard, which role" into a usable connection.
//!
//! ## Core Concepts
//! - **Master lookup**: exactly one address should hold the master record for a shard.
//!   None is an error; more than one is a registry inconsistency that is logged, and the
//!   first address in sorted order is used.
//! - **Replica selection**: reads prefer a slave chosen uniformly at random from the
//!   slaves registered at call time, falling back to the master.
//! - **Broadcast**: every known address except the local one, dialed concurrently.
//!
//! Liveness is the registry's job. An address present in the registry is assumed dialable.
//!
//! ## Submodules
//! - **`dialer`**: the connection factory trait and its HTTP implementation.
//! - **`router`**: the `Router` trait and `ShardRouter`.

pub mod dialer;
pub mod router;

pub use dialer::{Dialer, HttpConn, HttpDialer};
pub use router::{Router, ShardRouter};

#[cfg(test)]
mod tests;
