//! This crate implements encoding and trellis inference for a feed-forward convolutional code.
//! The encoder drives a zero-tail-terminated shift register over an information bit sequence;
//! three inference algorithms consume noisy channel observations of the coded sequence over the
//! same trellis: maximum-likelihood sequence decoding (Viterbi), exact conditional entropy of the
//! transmitted sequence given the observation (a forward-backward pass), and the Reliability
//! Output Viterbi Algorithm (ROVA) of Raghavan & Baum, which computes the probability that the
//! Viterbi decision is correct. All three are generic over a channel likelihood model, with
//! hard-decision (binary symmetric channel) and soft-decision (BPSK-AWGN) models provided.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use thiserror::Error;

mod model;
mod trellis;

pub mod sim;
pub mod utils;

pub use model::{EdgeLikelihood, HardDecision, SoftDecision};
pub use trellis::{reverse_generator, ConvolutionalCode};

/// Custom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}

/// Enumeration of binary symbol values
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Bit {
    /// Binary symbol `0`
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}
