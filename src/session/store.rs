//! Per-capture session state: the conversation table and the AARQ pending
//! table.
//!
//! [`SessionStore`] is constructed once per open capture and passed by
//! reference into every classification call; it is never hidden global
//! state, so independent captures (and test runs) stay isolated. The
//! execution model is packet-at-a-time, so no interior locking is needed.
//!
//! Conversation records live in an arena indexed by [`ConversationId`];
//! the key map may alias several keys to one record, which is how a single
//! logical session stays shared across the reference patterns its packets
//! exhibit. Records are append-only for the life of the capture: the first
//! insert for a key wins and the first classification of a record sticks.

use std::collections::HashMap;

use tracing::debug;

use super::key::{ConversationKey, HashedKeyScheme, KeyScheme};
use crate::transport::OsiAddress;

/// Index of a conversation record within a [`SessionStore`].
pub type ConversationId = u32;

/// Which application grammar a session carries.
///
/// A closed enum standing in for the integer ae-qualifier tag: grammar
/// selection happens through one pattern match instead of scattered integer
/// switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AeQualifier {
    /// Not yet determined; trial decoding may still resolve it.
    #[default]
    Unknown,
    /// Context Management application (aircraft logon).
    ContextManagement,
    /// Plain CPDLC.
    PlainCpdlc,
    /// Protected-mode CPDLC.
    ProtectedCpdlc,
}

impl AeQualifier {
    /// ICAO ae-qualifier value for Context Management.
    pub const WIRE_CMA: i64 = 2;
    /// ICAO ae-qualifier value for plain CPDLC.
    pub const WIRE_CPDLC: i64 = 21;
    /// ICAO ae-qualifier value for protected-mode CPDLC.
    pub const WIRE_PM_CPDLC: i64 = 22;

    /// Map an ae-qualifier integer from an association PDU.
    pub fn from_wire(value: i64) -> Self {
        match value {
            Self::WIRE_CMA => AeQualifier::ContextManagement,
            Self::WIRE_CPDLC => AeQualifier::PlainCpdlc,
            Self::WIRE_PM_CPDLC => AeQualifier::ProtectedCpdlc,
            _ => AeQualifier::Unknown,
        }
    }

    /// Return a string representation of the qualifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            AeQualifier::Unknown => "unknown",
            AeQualifier::ContextManagement => "context-management",
            AeQualifier::PlainCpdlc => "cpdlc",
            AeQualifier::ProtectedCpdlc => "protected-cpdlc",
        }
    }

    /// True once a concrete grammar has been determined.
    pub fn is_known(&self) -> bool {
        !matches!(self, AeQualifier::Unknown)
    }
}

/// One tracked logical air/ground application session.
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub id: ConversationId,
    ae_qualifier: AeQualifier,
}

impl ConversationRecord {
    /// The grammar committed for this session, if any.
    pub fn ae_qualifier(&self) -> AeQualifier {
        self.ae_qualifier
    }

    /// Commit a qualifier; only the first concrete classification sticks.
    fn classify(&mut self, qualifier: AeQualifier) -> bool {
        if self.ae_qualifier.is_known() || !qualifier.is_known() {
            return false;
        }
        self.ae_qualifier = qualifier;
        true
    }
}

/// A stashed "association request in flight", bridging an AARQ to its later,
/// differently-keyed AARE.
#[derive(Debug, Clone, Copy)]
pub struct AarqPending {
    /// Cleared when the matching response arrives.
    pub pending: bool,
    /// The conversation created for the requesting side.
    pub conversation: ConversationId,
}

/// Conversation table + AARQ pending table for one open capture.
pub struct SessionStore {
    records: Vec<ConversationRecord>,
    by_key: HashMap<ConversationKey, ConversationId>,
    pending: HashMap<u32, AarqPending>,
    scheme: Box<dyn KeyScheme>,
}

impl SessionStore {
    /// Create a store using the default hashed key scheme.
    pub fn new() -> Self {
        Self::with_scheme(HashedKeyScheme)
    }

    /// Create a store using a specific key scheme.
    pub fn with_scheme<S: KeyScheme + 'static>(scheme: S) -> Self {
        Self {
            records: Vec::new(),
            by_key: HashMap::new(),
            pending: HashMap::new(),
            scheme: Box::new(scheme),
        }
    }

    /// Derive a conversation key with the store's active scheme.
    pub fn key(&self, a: &OsiAddress, reference: u16, b: &OsiAddress) -> ConversationKey {
        self.scheme.key(a, reference, b)
    }

    /// Look up a record by key. Never creates.
    pub fn find(&self, key: &ConversationKey) -> Option<&ConversationRecord> {
        self.by_key.get(key).map(|&id| &self.records[id as usize])
    }

    /// Get a record by id.
    pub fn get(&self, id: ConversationId) -> Option<&ConversationRecord> {
        self.records.get(id as usize)
    }

    /// Insert a fresh record for `key`.
    ///
    /// Returns `None` if a record already exists for that key; the existing
    /// record is left untouched (idempotent protection against
    /// double-creation, not an update path).
    pub fn create(&mut self, key: ConversationKey) -> Option<&ConversationRecord> {
        if self.by_key.contains_key(&key) {
            return None;
        }
        let id = self.records.len() as ConversationId;
        self.records.push(ConversationRecord {
            id,
            ae_qualifier: AeQualifier::Unknown,
        });
        self.by_key.insert(key, id);
        Some(&self.records[id as usize])
    }

    /// Look up the record for `key`, creating it if absent.
    pub fn find_or_create(&mut self, key: ConversationKey) -> ConversationId {
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = self.records.len() as ConversationId;
        self.records.push(ConversationRecord {
            id,
            ae_qualifier: AeQualifier::Unknown,
        });
        self.by_key.insert(key, id);
        id
    }

    /// Map an additional key onto an existing record (session identity
    /// shared across reference patterns). First insert for the key wins.
    pub fn alias(&mut self, key: ConversationKey, id: ConversationId) -> bool {
        if self.by_key.contains_key(&key) || self.get(id).is_none() {
            return false;
        }
        self.by_key.insert(key, id);
        true
    }

    /// Commit a qualifier on a record; the first classification sticks.
    pub fn classify(&mut self, id: ConversationId, qualifier: AeQualifier) -> bool {
        let Some(record) = self.records.get_mut(id as usize) else {
            return false;
        };
        let committed = record.classify(qualifier);
        if committed {
            debug!(
                conversation = id,
                qualifier = qualifier.as_str(),
                "conversation classified"
            );
        }
        committed
    }

    /// Stash a pending association request for an aircraft address.
    ///
    /// Returns `false` without touching anything if a request is already
    /// pending for that aircraft: two logons started before either completes
    /// are not supported, and the second one loses its pending state (a
    /// documented limitation of the original engine, kept as-is).
    pub fn stash_pending(&mut self, aircraft: u32, conversation: ConversationId) -> bool {
        if let Some(existing) = self.pending.get(&aircraft) {
            if existing.pending {
                debug!(
                    aircraft = format_args!("{aircraft:06x}"),
                    "association request already pending, ignoring"
                );
                return false;
            }
        }
        self.pending.insert(
            aircraft,
            AarqPending {
                pending: true,
                conversation,
            },
        );
        true
    }

    /// Consume the pending request for an aircraft, clearing its flag.
    ///
    /// Returns the requester's conversation, or `None` when nothing is
    /// pending (a response with no matching request).
    pub fn take_pending(&mut self, aircraft: u32) -> Option<ConversationId> {
        let entry = self.pending.get_mut(&aircraft)?;
        if !entry.pending {
            return None;
        }
        entry.pending = false;
        Some(entry.conversation)
    }

    /// Inspect the pending entry for an aircraft, if any.
    pub fn pending(&self, aircraft: u32) -> Option<&AarqPending> {
        self.pending.get(&aircraft)
    }

    /// Number of tracked conversations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no conversation has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all state; call when a capture is closed or reloaded.
    pub fn reset(&mut self) {
        self.records.clear();
        self.by_key.clear();
        self.pending.clear();
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
