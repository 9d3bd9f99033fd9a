//! Minimal ACSE surface and the AARQ/AARE association bridge.
//!
//! Only the envelope of an ACSE PDU matters here: which of the five PDU
//! kinds it is, and whether it carries an AE-qualifier integer. Full ACSE
//! field decoding is the generated codec layer's job and stays out of this
//! crate.
//!
//! The bridge is the heart of explicit classification. An association
//! request and its response arrive as independently keyed packets; the
//! only value they share is the aircraft's 24-bit ICAO address inside the
//! mobile NSAP. So the request stashes its conversation under that address,
//! and the response retrieves it and aliases the response's own reference
//! pattern onto the same record.

use tracing::debug;

use crate::codec::per_choice;
use crate::error::DecodeError;
use crate::nsap;
use crate::session::{resolver, ConversationId, SessionStore};
use crate::transport::PacketInfo;

/// ACSE PDU kinds (the ACSE-apdu CHOICE root).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcsePduKind {
    /// Association request
    Aarq,
    /// Association response
    Aare,
    /// Release request
    Rlrq,
    /// Release response
    Rlre,
    /// Abort
    Abrt,
}

impl AcsePduKind {
    /// Return a string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AcsePduKind::Aarq => "aarq",
            AcsePduKind::Aare => "aare",
            AcsePduKind::Rlrq => "rlrq",
            AcsePduKind::Rlre => "rlre",
            AcsePduKind::Abrt => "abrt",
        }
    }
}

const ACSE_ALTERNATIVES: &[&str] = &["aarq", "aare", "rlrq", "rlre", "abrt"];

/// The slice of an ACSE PDU the correlation engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcsePdu {
    pub kind: AcsePduKind,
    /// Calling (AARQ) or responding (AARE) AE-qualifier, when the optional
    /// field is present.
    pub ae_qualifier: Option<i64>,
}

/// Recognize the ACSE envelope: PDU kind plus the optional AE-qualifier.
pub fn parse_acse(data: &[u8]) -> Result<AcsePdu, DecodeError> {
    let (index, _) = per_choice("acse", data, ACSE_ALTERNATIVES)?;
    let kind = match index {
        0 => AcsePduKind::Aarq,
        1 => AcsePduKind::Aare,
        2 => AcsePduKind::Rlrq,
        3 => AcsePduKind::Rlre,
        _ => AcsePduKind::Abrt,
    };

    let Some(&options) = data.get(1) else {
        return Err(DecodeError::TooShort {
            codec: "acse",
            needed: 2,
            have: data.len(),
        });
    };

    let ae_qualifier = if options & 0x01 != 0 {
        let Some(&value) = data.get(2) else {
            return Err(DecodeError::TooShort {
                codec: "acse",
                needed: 3,
                have: data.len(),
            });
        };
        Some(i64::from(value))
    } else {
        None
    };

    Ok(AcsePdu { kind, ae_qualifier })
}

/// Handle an association request.
///
/// Finds or creates the conversation for the request's reference pattern,
/// commits an explicit AE-qualifier when the PDU carries one, and stashes
/// the conversation under the requesting aircraft's address so the later,
/// differently keyed response can find it. A request while another is
/// already pending for the same aircraft leaves the existing stash
/// untouched (first pending wins; interleaved logons are a known
/// limitation).
pub fn on_association_request(
    store: &mut SessionStore,
    pkt: &PacketInfo<'_>,
    pdu: &AcsePdu,
) -> Option<ConversationId> {
    let key = resolver::conversation_key(store, pkt)?;
    let id = store.find_or_create(key);

    if let Some(value) = pdu.ae_qualifier {
        store.classify(id, crate::session::AeQualifier::from_wire(value));
    }

    let aircraft = nsap::aircraft_address(pkt);
    if aircraft != 0 {
        if store.stash_pending(aircraft, id) {
            debug!(
                aircraft = format_args!("{aircraft:06x}"),
                conversation = id,
                "association request pending"
            );
        }
    }
    Some(id)
}

/// Handle an association response.
///
/// Looks up the pending request by the responding aircraft's address. With
/// no pending request there is nothing to bridge and the packet's
/// application type stays unresolved (trial decoding takes over later).
/// Otherwise the response's reference pattern is aliased onto the stashed
/// conversation - one entry for the data-transfer pattern, one per side
/// for connect-confirm - and the pending flag is cleared.
pub fn on_association_response(
    store: &mut SessionStore,
    pkt: &PacketInfo<'_>,
) -> Option<ConversationId> {
    let aircraft = nsap::aircraft_address(pkt);
    if aircraft == 0 {
        return None;
    }
    let id = store.take_pending(aircraft)?;

    match (pkt.src_ref, pkt.dst_ref) {
        (None, Some(dst_ref)) => {
            let key = store.key(&pkt.dst, dst_ref, &pkt.src);
            store.alias(key, id);
        }
        (Some(src_ref), Some(dst_ref)) => {
            let requester = store.key(&pkt.dst, dst_ref, &pkt.src);
            store.alias(requester, id);
            let responder = store.key(&pkt.src, src_ref, &pkt.dst);
            store.alias(responder, id);
        }
        (Some(src_ref), None) => {
            let key = store.key(&pkt.src, src_ref, &pkt.dst);
            store.alias(key, id);
        }
        (None, None) => {}
    }

    debug!(
        aircraft = format_args!("{aircraft:06x}"),
        conversation = id,
        "association response bridged"
    );
    Some(id)
}
