//! Conversation resolution from transport reference patterns.
//!
//! Transport packets present their connection references in one of three
//! observed patterns, and the pattern decides which `(address, reference,
//! address)` triple keys the conversation:
//!
//! - data transfer (destination reference only): `(dst, dst_ref, src)`
//! - connect request (source reference only): `(src, src_ref, dst)`
//! - connect confirm (both present): `(src, src_ref, dst)` - the source
//!   side is always favored
//!
//! A packet with no reference at all simply resolves to nothing; that is a
//! normal outcome, not an error.

use crate::session::key::ConversationKey;
use crate::session::store::{ConversationRecord, SessionStore};
use crate::transport::PacketInfo;

/// Derive the conversation key for a packet, if one can be formed.
pub fn conversation_key(store: &SessionStore, pkt: &PacketInfo<'_>) -> Option<ConversationKey> {
    match (pkt.src_ref, pkt.dst_ref) {
        // Data transfer: keyed on the receiving side.
        (None, Some(dst_ref)) => Some(store.key(&pkt.dst, dst_ref, &pkt.src)),
        // Connect request / connect confirm: keyed on the sending side.
        (Some(src_ref), _) => Some(store.key(&pkt.src, src_ref, &pkt.dst)),
        (None, None) => None,
    }
}

/// Look up the conversation a packet belongs to. Never creates.
pub fn find<'s>(store: &'s SessionStore, pkt: &PacketInfo<'_>) -> Option<&'s ConversationRecord> {
    let key = conversation_key(store, pkt)?;
    store.find(&key)
}

/// Create a conversation for a packet's key.
///
/// Returns `None` when no key can be formed or when a record already exists
/// for it (the existing record is left untouched).
pub fn create<'s>(
    store: &'s mut SessionStore,
    pkt: &PacketInfo<'_>,
) -> Option<&'s ConversationRecord> {
    let key = conversation_key(store, pkt)?;
    store.create(key)
}
