//! Session correlation: conversation keys, the per-capture store, and
//! reference-pattern resolution.
//!
//! ## Components
//!
//! - [`KeyScheme`] / [`ConversationKey`] - pluggable address+reference hashing
//! - [`SessionStore`] - conversation table and AARQ pending table, scoped to
//!   one open capture
//! - [`resolver`] - maps a packet's transport reference pattern to a key and
//!   finds or creates the conversation record

pub mod key;
pub mod resolver;
pub mod store;

pub use key::{ConversationKey, ExactKeyScheme, HashedKeyScheme, KeyScheme};
pub use store::{AarqPending, AeQualifier, ConversationId, ConversationRecord, SessionStore};
