//! Transport-layer packet metadata consumed by the correlation engine.
//!
//! The ATN upper layers ride on the OSI transport stack (CLNP/COTP). Each
//! transport packet the host hands us carries two network addresses and up
//! to two 16-bit connection references; which references are present decides
//! how a conversation key is formed (see [`crate::session::resolver`]).

/// Address family tag carried alongside raw address octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// OSI network address (NSAP octets).
    Osi,
    /// Anything else the capture layer may hand us (kept opaque).
    Other(u8),
}

/// An opaque network address: a family tag plus raw octets.
///
/// The correlation engine only interprets addresses that are OSI-typed and
/// exactly [`NSAP_LENGTH`] octets long; everything else still hashes (the
/// key schemes are total functions) but is never classified.
///
/// [`NSAP_LENGTH`]: crate::nsap::NSAP_LENGTH
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OsiAddress {
    pub family: AddressFamily,
    pub octets: Vec<u8>,
}

impl OsiAddress {
    /// Create an OSI-typed address from raw octets.
    pub fn osi(octets: impl Into<Vec<u8>>) -> Self {
        Self {
            family: AddressFamily::Osi,
            octets: octets.into(),
        }
    }

    /// Create an address of a non-OSI family.
    pub fn other(family: u8, octets: impl Into<Vec<u8>>) -> Self {
        Self {
            family: AddressFamily::Other(family),
            octets: octets.into(),
        }
    }

    /// True if this address is OSI-typed and exactly 20 octets long,
    /// the only shape the NSAP classifier will look inside.
    pub fn is_osi_nsap(&self) -> bool {
        self.family == AddressFamily::Osi && self.octets.len() == crate::nsap::NSAP_LENGTH
    }
}

/// Which transport references a packet presents.
///
/// Derived from the presence of the source/destination references, this
/// mirrors the observed COTP patterns: data transfer echoes only the
/// destination reference, a connect request carries only the sender's own
/// reference, and a connect confirm carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPattern {
    /// Destination reference present, source reference absent.
    DataTransfer,
    /// Source reference present, destination reference absent.
    ConnectRequest,
    /// Both references present.
    ConnectConfirm,
    /// No reference present; no conversation key can be formed.
    Unkeyed,
}

/// Per-packet metadata handed to the dissector by the host.
///
/// The payload slice is the upper-layer user data (after the transport
/// header); field values decoded from it borrow from this slice.
#[derive(Debug, Clone)]
pub struct PacketInfo<'a> {
    pub src: OsiAddress,
    pub dst: OsiAddress,
    /// Sender's connection reference (`clnp_srcref`), if present.
    pub src_ref: Option<u16>,
    /// Receiver's connection reference (`clnp_dstref`), if present.
    pub dst_ref: Option<u16>,
    /// Upper-layer payload.
    pub payload: &'a [u8],
}

impl<'a> PacketInfo<'a> {
    /// Classify which reference pattern this packet exhibits.
    pub fn ref_pattern(&self) -> RefPattern {
        match (self.src_ref, self.dst_ref) {
            (None, Some(_)) => RefPattern::DataTransfer,
            (Some(_), None) => RefPattern::ConnectRequest,
            (Some(_), Some(_)) => RefPattern::ConnectConfirm,
            (None, None) => RefPattern::Unkeyed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_pattern_data_transfer() {
        let pkt = PacketInfo {
            src: OsiAddress::osi(vec![0u8; 20]),
            dst: OsiAddress::osi(vec![0u8; 20]),
            src_ref: None,
            dst_ref: Some(7),
            payload: &[],
        };
        assert_eq!(pkt.ref_pattern(), RefPattern::DataTransfer);
    }

    #[test]
    fn test_ref_pattern_connect_request() {
        let pkt = PacketInfo {
            src: OsiAddress::osi(vec![0u8; 20]),
            dst: OsiAddress::osi(vec![0u8; 20]),
            src_ref: Some(3),
            dst_ref: None,
            payload: &[],
        };
        assert_eq!(pkt.ref_pattern(), RefPattern::ConnectRequest);
    }

    #[test]
    fn test_ref_pattern_connect_confirm() {
        let pkt = PacketInfo {
            src: OsiAddress::osi(vec![0u8; 20]),
            dst: OsiAddress::osi(vec![0u8; 20]),
            src_ref: Some(9),
            dst_ref: Some(3),
            payload: &[],
        };
        assert_eq!(pkt.ref_pattern(), RefPattern::ConnectConfirm);
    }

    #[test]
    fn test_ref_pattern_unkeyed() {
        let pkt = PacketInfo {
            src: OsiAddress::osi(vec![0u8; 20]),
            dst: OsiAddress::osi(vec![0u8; 20]),
            src_ref: None,
            dst_ref: None,
            payload: &[],
        };
        assert_eq!(pkt.ref_pattern(), RefPattern::Unkeyed);
    }

    #[test]
    fn test_is_osi_nsap() {
        assert!(OsiAddress::osi(vec![0u8; 20]).is_osi_nsap());
        assert!(!OsiAddress::osi(vec![0u8; 19]).is_osi_nsap());
        assert!(!OsiAddress::other(2, vec![0u8; 20]).is_osi_nsap());
    }
}
