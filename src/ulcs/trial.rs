//! Heuristic classification by trial decode.
//!
//! When a conversation has no committed grammar (no association PDU was
//! captured, or none carried an AE-qualifier), the payload itself is the
//! only evidence. Each candidate codec is probed in the registry's fixed
//! order and the first structurally clean decode wins. The order is part of
//! the observable behavior: plain CPDLC accepts inputs protected mode
//! rejects, so protected mode must be probed first.

use tracing::{debug, trace};

use crate::codec::{AppCodec, CodecRegistry, DecodedPdu};
use crate::nsap::Direction;
use crate::session::AeQualifier;

/// Probe the registry's trial candidates against a payload.
///
/// Returns the winning codec's qualifier and decoded PDU, or `None` when
/// every candidate rejects the input. Probing is side-effect free; the
/// caller decides whether the verdict is committed to a conversation.
pub fn classify_by_trial<'a>(
    registry: &CodecRegistry,
    payload: &'a [u8],
    direction: Direction,
) -> Option<(AeQualifier, DecodedPdu<'a>)> {
    for codec in registry.candidates() {
        match codec.decode(payload, direction) {
            Ok(pdu) => {
                debug!(
                    codec = codec.name(),
                    direction = direction.as_str(),
                    "trial decode succeeded"
                );
                return Some((codec.qualifier(), pdu));
            }
            Err(err) => {
                trace!(codec = codec.name(), %err, "trial decode rejected");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::default_registry;

    // Protected mode rejects the leading extension bit; plain CPDLC reads
    // it as the reference-number flag and accepts. With protected mode
    // probed first, this input must classify as plain CPDLC.
    #[test]
    fn test_order_breaks_the_tie() {
        let registry = default_registry();
        let payload = [0x80, 0x01, 0x02, 0x03, 0x04, 0x05];

        let (qualifier, pdu) =
            classify_by_trial(&registry, &payload, Direction::Uplink).unwrap();
        assert_eq!(qualifier, AeQualifier::PlainCpdlc);
        assert_eq!(pdu.codec, "cpdlc");
    }

    // An input both CPDLC grammars accept goes to the first candidate.
    #[test]
    fn test_first_success_wins() {
        let registry = default_registry();
        // Choice index 3 (pm-send) for protected mode; also a valid plain
        // CPDLC header.
        let payload = [0x60, 0x01, 0x02, 0x03];

        let (qualifier, _) =
            classify_by_trial(&registry, &payload, Direction::Uplink).unwrap();
        assert_eq!(qualifier, AeQualifier::ProtectedCpdlc);
    }

    #[test]
    fn test_all_candidates_reject() {
        let registry = default_registry();
        // Too short for either CPDLC grammar.
        let payload = [0x00];
        assert!(classify_by_trial(&registry, &payload, Direction::Uplink).is_none());
    }

    #[test]
    fn test_unknown_direction_never_classifies() {
        let registry = default_registry();
        let payload = [0x60, 0x01, 0x02, 0x03];
        assert!(classify_by_trial(&registry, &payload, Direction::Unknown).is_none());
    }

    #[test]
    fn test_narrowed_order_reaches_cm() {
        let mut registry = default_registry();
        registry.set_trial_order(&[AeQualifier::ContextManagement]);

        let payload = [0x40, 0xAA, 0xBB];
        let (qualifier, pdu) =
            classify_by_trial(&registry, &payload, Direction::Downlink).unwrap();
        assert_eq!(qualifier, AeQualifier::ContextManagement);
        assert_eq!(pdu.pdu, "aircraft-message");
    }
}
