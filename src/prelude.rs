//! Convenient re-exports for common usage.
//!
//! This module provides a curated set of the most commonly used types
//! from atn-ulcs, allowing you to import them with a single `use` statement.
//!
//! # Example
//!
//! ```rust
//! use atn_ulcs::prelude::*;
//!
//! let dissector = UlcsDissector::new();
//! let mut store = SessionStore::new();
//! // Feed packets in capture order via dissector.dissect(&mut store, &pkt)
//! ```

// Address and direction types
pub use crate::nsap::Direction;
pub use crate::transport::{AddressFamily, OsiAddress, PacketInfo, RefPattern};

// Session state
pub use crate::session::{
    AeQualifier, ConversationId, ConversationKey, ConversationRecord, SessionStore,
};

// Codec types
pub use crate::codec::{default_registry, AppCodec, AppGrammar, CodecRegistry, DecodedPdu, FieldValue};

// Dissector
pub use crate::ulcs::{DissectOutcome, PayloadForm, UlcsDissector};

// Error types
pub use crate::error::{DecodeError, Error, Result};
