//! Plain (unprotected) CPDLC structural codec.
//!
//! The top-level grammars are ATCUplinkMessage / ATCDownlinkMessage: a
//! SEQUENCE opening with the message header - an optional
//! message-reference-number flag, then a 6-bit message identification
//! number, then the timestamp. Structurally that means: the leading bit is
//! the optionality flag, and the minimum encoding is four octets (six when
//! the reference number is present).
//!
//! Plain CPDLC is deliberately the permissive candidate: it accepts inputs
//! whose leading bit is set, which the protected-mode grammar rejects as an
//! extension bit. Trial ordering (protected mode first) depends on that.

use smallvec::smallvec;

use super::{AppCodec, DecodedPdu, FieldValue};
use crate::error::DecodeError;
use crate::nsap::Direction;
use crate::session::AeQualifier;

/// Minimum encoding of a header without the message reference number.
const MIN_LEN: usize = 4;

/// Minimum encoding when the message reference number is present.
const MIN_LEN_WITH_REF: usize = 6;

/// Plain CPDLC structural codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpdlcCodec;

impl AppCodec for CpdlcCodec {
    fn name(&self) -> &'static str {
        "cpdlc"
    }

    fn display_name(&self) -> &'static str {
        "ATN CPDLC"
    }

    fn qualifier(&self) -> AeQualifier {
        AeQualifier::PlainCpdlc
    }

    fn decode<'a>(
        &self,
        data: &'a [u8],
        direction: Direction,
    ) -> Result<DecodedPdu<'a>, DecodeError> {
        let pdu_name = match direction {
            Direction::Uplink => "atc-uplink-message",
            Direction::Downlink => "atc-downlink-message",
            Direction::Unknown => {
                return Err(DecodeError::Malformed {
                    codec: "cpdlc",
                    reason: "packet direction required to select grammar",
                })
            }
        };

        let Some(&head) = data.first() else {
            return Err(DecodeError::TooShort {
                codec: "cpdlc",
                needed: MIN_LEN,
                have: 0,
            });
        };
        let msg_ref_present = head & 0x80 != 0;
        let needed = if msg_ref_present { MIN_LEN_WITH_REF } else { MIN_LEN };
        if data.len() < needed {
            return Err(DecodeError::TooShort {
                codec: "cpdlc",
                needed,
                have: data.len(),
            });
        }

        let msg_id = (head >> 1) & 0x3F;
        let mut pdu = DecodedPdu::new("cpdlc", pdu_name);
        pdu.fields = smallvec![
            ("msg_id", FieldValue::UInt8(msg_id)),
            ("msg_ref_present", FieldValue::Bool(msg_ref_present)),
            ("body", FieldValue::Bytes(&data[1..])),
        ];
        Ok(pdu)
    }
}
