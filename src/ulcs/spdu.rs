//! Header peeling: recognizing the two wire forms of the ATN upper layers.
//!
//! ATN upper-layer payloads arrive in one of two shapes:
//!
//! - an explicit Session + Presentation + ACSE triplet, announced by one of
//!   a small fixed set of session/presentation type-byte combinations, or
//! - a bare PDV-list (fully-encoded user data with no session header),
//!   announced by its leading PER bits.
//!
//! The peeler matches the leading two octets against both fingerprint
//! tables and dispatches accordingly; anything else is reported as
//! unrecognized and left to other dissectors.

/// Session PDU types, selected by the top 5 bits of the first octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpduType {
    ShortConnect,
    ShortConnectAccept,
    ShortConnectAcceptContinue,
    ShortRefuse,
    ShortRefuseContinue,
}

impl SpduType {
    /// Decode from the session type byte (top 5 bits).
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte >> 3 {
            0x1D => Some(SpduType::ShortConnect),
            0x1F => Some(SpduType::ShortConnectAccept),
            0x1E => Some(SpduType::ShortConnectAcceptContinue),
            0x1C => Some(SpduType::ShortRefuse),
            0x14 => Some(SpduType::ShortRefuseContinue),
            _ => None,
        }
    }

    /// The 5-bit type code.
    pub fn code(&self) -> u8 {
        match self {
            SpduType::ShortConnect => 0x1D,
            SpduType::ShortConnectAccept => 0x1F,
            SpduType::ShortConnectAcceptContinue => 0x1E,
            SpduType::ShortRefuse => 0x1C,
            SpduType::ShortRefuseContinue => 0x14,
        }
    }

    /// True for the refuse variants, whose low bits carry session
    /// parameters.
    pub fn has_parameters(&self) -> bool {
        matches!(self, SpduType::ShortRefuse | SpduType::ShortRefuseContinue)
    }

    /// Return a string representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpduType::ShortConnect => "short-connect",
            SpduType::ShortConnectAccept => "short-connect-accept",
            SpduType::ShortConnectAcceptContinue => "short-connect-accept-continue",
            SpduType::ShortRefuse => "short-refuse",
            SpduType::ShortRefuseContinue => "short-refuse-continue",
        }
    }
}

/// Parsed session header.
///
/// The parameter fields are only meaningful for the refuse variants: bit 2
/// of the type byte indicates parameters are present, bit 1 whether the
/// transport connection is retained, bit 0 whether the refusal is
/// transient or persistent. When parameters are indicated, a reject-reason
/// nibble follows the presentation byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpduHeader {
    pub spdu: SpduType,
    pub parameter_indication: bool,
    pub connection_retained: bool,
    pub persistent: bool,
    pub reject_reason: Option<u8>,
}

/// Outcome of peeling the leading octets of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeeledPayload<'a> {
    /// Explicit session + presentation header; `rest` starts at the ACSE
    /// user data.
    SessionThenAcse { header: SpduHeader, rest: &'a [u8] },
    /// Bare PDV-list; the whole payload is application user data.
    BarePdvList { rest: &'a [u8] },
    /// Neither form; not ours to dissect.
    NotRecognized,
}

/// Mask isolating the session type bits and the full presentation byte.
const SES_PRES_MASK: u16 = 0xF8FF;

/// Known session/presentation type-byte combinations of the ATN upper
/// layers. Byte 0 is masked to its session type bits, byte 1 is the short
/// presentation PPDU byte and is matched exactly.
const SES_PRES_FINGERPRINTS: &[u16] = &[
    // Short-Connect + short presentation connect variants
    0xE802, 0xE803, 0xE806, 0xE807,
    // Short-Connect-Accept + short presentation accept variants
    0xF802, 0xF803, 0xF806, 0xF807,
    // Short-Connect-Accept-Continue + short presentation accept variants
    0xF002, 0xF003, 0xF006, 0xF007,
    // Short-Refuse + presentation connect/reject variants
    0xE002, 0xE007, 0xE00A,
    // Short-Refuse-Continue + presentation connect/reject variants
    0xA002, 0xA007, 0xA00A,
];

/// Mask and values fingerprinting a bare PDV-list.
const PDV_MASK: u16 = 0xFFF0;
const PDV_LIST_PATTERNS: [u16; 2] = [0x0020, 0x00A0];

/// Parse the session header at the start of a recognized
/// session+presentation payload.
///
/// Consumes the session byte and the presentation byte, plus one more
/// octet carrying the reject-reason nibble when a refuse variant indicates
/// parameters. Returns the header and the number of octets consumed.
pub fn parse_spdu(data: &[u8]) -> Option<(SpduHeader, usize)> {
    let &type_byte = data.first()?;
    let spdu = SpduType::from_byte(type_byte)?;
    if data.len() < 2 {
        return None;
    }

    let mut header = SpduHeader {
        spdu,
        parameter_indication: false,
        connection_retained: false,
        persistent: false,
        reject_reason: None,
    };
    let mut consumed = 2;

    if spdu.has_parameters() {
        header.parameter_indication = type_byte & 0x04 != 0;
        header.connection_retained = type_byte & 0x02 != 0;
        header.persistent = type_byte & 0x01 != 0;
        if header.parameter_indication {
            header.reject_reason = Some(data.get(2)? & 0x0F);
            consumed = 3;
        }
    }

    Some((header, consumed))
}

/// Recognize which upper-layer form a payload carries.
pub fn peel(payload: &[u8]) -> PeeledPayload<'_> {
    if payload.len() < 2 {
        return PeeledPayload::NotRecognized;
    }
    let word = u16::from_be_bytes([payload[0], payload[1]]);

    if SES_PRES_FINGERPRINTS.contains(&(word & SES_PRES_MASK)) {
        if let Some((header, consumed)) = parse_spdu(payload) {
            return PeeledPayload::SessionThenAcse {
                header,
                rest: &payload[consumed..],
            };
        }
        return PeeledPayload::NotRecognized;
    }

    if PDV_LIST_PATTERNS.contains(&(word & PDV_MASK)) {
        return PeeledPayload::BarePdvList { rest: payload };
    }

    PeeledPayload::NotRecognized
}
