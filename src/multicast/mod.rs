//! Multicast Module
//!
//! Fans one inbound request out to every endpoint registered under a namespace and
//! folds the responses back into one.
//!
//! ## Core Concepts
//! - **All-or-nothing**: a single transport failure or non-success status fails the
//!   whole call. Successful responses collected so far are closed, never returned.
//! - **Unordered results**: responses are collected in arrival order. Each one keeps the
//!   address of the endpoint that produced it.
//! - **Merge modes**: `One` returns the first collected body; `All` concatenates the
//!   bodies, or rebuilds a single multipart message when the first response carries a
//!   `Boundary` header.
//!
//! ## Submodules
//! - **`concat`**: a stream that drains a queue of body streams in order.
//! - **`multicaster`**: the concurrent fan-out.
//! - **`merge`**: folding a response set into one body.

pub mod concat;
pub mod merge;
pub mod multicaster;

pub use concat::ConcatStream;
pub use merge::{MergedResponse, ReturnMode, merge};
pub use multicaster::Multicaster;
