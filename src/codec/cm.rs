//! Context Management (CM) structural codec.
//!
//! CM is the ATN logon application: an aircraft registers with a ground
//! facility and exchanges contact/forward requests. The top-level grammars
//! are two PER CHOICEs, one per direction; this codec validates the choice
//! header and minimum body length, which is all the correlation engine
//! needs to accept or reject CM as a candidate grammar.

use smallvec::smallvec;

use super::{per_choice, AppCodec, DecodedPdu, FieldValue};
use crate::error::DecodeError;
use crate::nsap::Direction;
use crate::session::AeQualifier;

/// CMGroundMessage root alternatives (uplink).
const GROUND_MESSAGES: &[&str] = &[
    "cm-contact-request",
    "cm-forward-request",
    "cm-logon-response",
    "cm-update",
];

/// CMAircraftMessage root alternatives (downlink).
const AIRCRAFT_MESSAGES: &[&str] = &[
    "cm-contact-response",
    "cm-forward-response",
    "cm-logon-request",
];

/// Context Management structural codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmCodec;

impl AppCodec for CmCodec {
    fn name(&self) -> &'static str {
        "cm"
    }

    fn display_name(&self) -> &'static str {
        "ATN Context Management"
    }

    fn qualifier(&self) -> AeQualifier {
        AeQualifier::ContextManagement
    }

    fn decode<'a>(
        &self,
        data: &'a [u8],
        direction: Direction,
    ) -> Result<DecodedPdu<'a>, DecodeError> {
        let (pdu_name, alternatives) = match direction {
            Direction::Uplink => ("ground-message", GROUND_MESSAGES),
            Direction::Downlink => ("aircraft-message", AIRCRAFT_MESSAGES),
            Direction::Unknown => {
                return Err(DecodeError::Malformed {
                    codec: "cm",
                    reason: "packet direction required to select grammar",
                })
            }
        };

        if data.len() < 2 {
            return Err(DecodeError::TooShort {
                codec: "cm",
                needed: 2,
                have: data.len(),
            });
        }
        let (index, message) = per_choice("cm", data, alternatives)?;

        let mut pdu = DecodedPdu::new("cm", pdu_name);
        pdu.fields = smallvec![
            ("message", FieldValue::Str(message)),
            ("choice_index", FieldValue::UInt8(index)),
            ("body", FieldValue::Bytes(&data[1..])),
        ];
        Ok(pdu)
    }
}
