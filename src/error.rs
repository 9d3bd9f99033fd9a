//! Error types for atn-ulcs.
//!
//! This module provides structured error types for the correlation engine:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`DecodeError`] - Structural decode failures from application codecs
//!
//! Neutral outcomes are deliberately *not* errors here: an address that is
//! not a 20-octet OSI NSAP yields [`Direction::Unknown`], and a packet whose
//! references resolve to no conversation yields `None`. Both are expected,
//! frequent results of dissecting real captures. `DecodeError` is the only
//! failure the engine produces, and the trial-decode dispatcher consumes it
//! locally when probing candidate grammars.
//!
//! [`Direction::Unknown`]: crate::nsap::Direction::Unknown

use thiserror::Error;

/// Main error type for atn-ulcs operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Structural decode failure from an application codec
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Structural decode failures.
///
/// Produced by the built-in codecs and the ACSE recognizer. During trial
/// classification these are caught by the dispatcher and the next candidate
/// grammar is attempted; they never abort dissection of a capture.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Message too short for the grammar's minimum encoding
    #[error("{codec}: message too short (need {needed} bytes, have {have})")]
    TooShort {
        codec: &'static str,
        needed: usize,
        have: usize,
    },

    /// PER choice index outside the grammar's root alternatives
    #[error("{codec}: choice index {index} out of range (max {max})")]
    BadChoiceIndex {
        codec: &'static str,
        index: u8,
        max: u8,
    },

    /// Extension bit set on a choice with no extension alternatives
    #[error("{codec}: extension bit set on a root-only choice")]
    UnsupportedExtension { codec: &'static str },

    /// Any other structural violation
    #[error("{codec}: {reason}")]
    Malformed {
        codec: &'static str,
        reason: &'static str,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
