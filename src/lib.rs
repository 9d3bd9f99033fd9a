//! # atn-ulcs
//!
//! Conversation and session correlation for the ATN upper layers
//! (ICAO Doc 9705 ULCS).
//!
//! Aeronautical datalink applications - Context Management logon and
//! controller-pilot datalink (CPDLC, plain or protected mode) - ride on the
//! OSI upper layers over the ATN internetwork. The application grammar of a
//! packet is not announced in the packet itself; it is a property of the
//! *session*, established once at association time. This crate tracks those
//! sessions across a capture and classifies every packet's payload:
//!
//! - **Header peeling**: fingerprint the two wire forms (explicit
//!   session + presentation + ACSE triplet vs. bare fully-encoded PDV-list)
//! - **Conversation tracking**: key sessions by `(address, transport
//!   reference, address)` triples, with one logical session shared across
//!   the reference patterns its packets exhibit
//! - **Association bridging**: correlate an AARQ with its differently keyed
//!   AARE through the aircraft's 24-bit ICAO address
//! - **Classification**: commit the AE-qualifier carried by association
//!   PDUs, or derive one by ordered trial decode when none was captured
//!
//! ## Quick Start
//!
//! ```rust
//! use atn_ulcs::prelude::*;
//!
//! let dissector = UlcsDissector::new();
//! let mut store = SessionStore::new();
//!
//! let src = OsiAddress::osi(vec![0u8; 20]);
//! let dst = OsiAddress::osi(vec![0u8; 20]);
//! let pkt = PacketInfo {
//!     src,
//!     dst,
//!     src_ref: Some(3),
//!     dst_ref: None,
//!     payload: &[0xE8, 0x02, 0x00, 0x01, 22],
//! };
//!
//! let outcome = dissector.dissect(&mut store, &pkt);
//! println!("{:?} {:?}", outcome.form, outcome.qualifier);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                           atn-ulcs                                  |
//! +---------------------------------------------------------------------+
//! |  transport/  - OSI addresses, transport references, PacketInfo      |
//! |  nsap/       - ICAO mobile prefixes, direction, aircraft address    |
//! |  session/    - conversation keys, per-capture store, resolver       |
//! |  ulcs/       - header peeler, ACSE bridge, trial dispatch,          |
//! |                UlcsDissector                                        |
//! |  codec/      - structural application codecs (CM, CPDLC, PM-CPDLC)  |
//! |  error/      - error types                                          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! State is explicit throughout: a [`SessionStore`] belongs to one open
//! capture, packets are fed in capture order, and two captures never share
//! state.

pub mod codec;
pub mod error;
pub mod nsap;
pub mod prelude;
pub mod session;
pub mod transport;
pub mod ulcs;

// Re-export commonly used types at crate root for convenience
pub use codec::{
    default_registry, AppCodec, AppGrammar, CmCodec, CodecRegistry, CpdlcCodec, DecodedPdu,
    FieldEntry, FieldValue, PmCpdlcCodec,
};
pub use error::{DecodeError, Error, Result};
pub use nsap::{classify, Direction};
pub use session::{
    AarqPending, AeQualifier, ConversationId, ConversationKey, ConversationRecord,
    ExactKeyScheme, HashedKeyScheme, KeyScheme, SessionStore,
};
pub use transport::{AddressFamily, OsiAddress, PacketInfo, RefPattern};
pub use ulcs::{
    classify_by_trial, parse_acse, parse_spdu, peel, AcsePdu, AcsePduKind, DissectOutcome,
    PayloadForm, PeeledPayload, SpduHeader, SpduType, UlcsDissector,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
