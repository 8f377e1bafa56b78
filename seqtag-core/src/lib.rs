//! Shared primitives for the seqtag sequence-labeling crates.
//!
//! `seqtag-core` provides the foundation the other seqtag crates build on:
//!
//! - **Error types** — [`SeqtagError`] and [`Result`] for structured error handling
//! - **Randomness** — [`Xorshift64`], a small seedable generator for stochastic
//!   inference, so sampling code is deterministic under test

pub mod error;
pub mod rng;

pub use error::{Result, SeqtagError};
pub use rng::Xorshift64;
