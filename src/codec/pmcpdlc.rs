//! Protected-mode CPDLC structural codec.
//!
//! Protected mode wraps CPDLC in the ProtectedGroundPDUs /
//! ProtectedAircraftPDUs grammars: a four-alternative PER CHOICE (abort
//! user, abort provider, start, send) whose send variant carries the
//! application message plus an integrity check. The choice header is a
//! root-only CHOICE, so an input with the extension bit set is structurally
//! not protected mode - that is what lets trial decoding tell the two CPDLC
//! flavors apart.

use smallvec::smallvec;

use super::{per_choice, AppCodec, DecodedPdu, FieldValue};
use crate::error::DecodeError;
use crate::nsap::Direction;
use crate::session::AeQualifier;

/// ProtectedGroundPDUs root alternatives (uplink).
const GROUND_PDUS: &[&str] = &["pm-abort-user", "pm-abort-provider", "pm-startup", "pm-send"];

/// ProtectedAircraftPDUs root alternatives (downlink).
const AIRCRAFT_PDUS: &[&str] = &[
    "pm-abort-user",
    "pm-abort-provider",
    "pm-startdown",
    "pm-send",
];

/// Minimum body length per choice index: the aborts fit in the choice
/// octet, start carries a message, send adds the integrity check.
const MIN_LEN: [usize; 4] = [1, 1, 2, 3];

/// Protected-mode CPDLC structural codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PmCpdlcCodec;

impl AppCodec for PmCpdlcCodec {
    fn name(&self) -> &'static str {
        "pm-cpdlc"
    }

    fn display_name(&self) -> &'static str {
        "ATN CPDLC (protected mode)"
    }

    fn qualifier(&self) -> AeQualifier {
        AeQualifier::ProtectedCpdlc
    }

    fn decode<'a>(
        &self,
        data: &'a [u8],
        direction: Direction,
    ) -> Result<DecodedPdu<'a>, DecodeError> {
        let (pdu_name, alternatives) = match direction {
            Direction::Uplink => ("protected-ground-pdu", GROUND_PDUS),
            Direction::Downlink => ("protected-aircraft-pdu", AIRCRAFT_PDUS),
            Direction::Unknown => {
                return Err(DecodeError::Malformed {
                    codec: "pm-cpdlc",
                    reason: "packet direction required to select grammar",
                })
            }
        };

        let (index, variant) = per_choice("pm-cpdlc", data, alternatives)?;
        let needed = MIN_LEN[index as usize];
        if data.len() < needed {
            return Err(DecodeError::TooShort {
                codec: "pm-cpdlc",
                needed,
                have: data.len(),
            });
        }

        let mut pdu = DecodedPdu::new("pm-cpdlc", pdu_name);
        pdu.fields = smallvec![
            ("pdu_variant", FieldValue::Str(variant)),
            ("choice_index", FieldValue::UInt8(index)),
            ("body", FieldValue::Bytes(&data[1..])),
        ];
        Ok(pdu)
    }
}
