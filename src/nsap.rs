//! ICAO NSAP address structure and packet direction classification.
//!
//! An ATN network address is a 20-octet OSI NSAP. ICAO reserves two 4-byte
//! big-endian prefixes for mobile (airborne) systems; when either endpoint
//! of a packet carries one, the packet can be classified as uplink
//! (ground-to-air) or downlink (air-to-ground), and the aircraft's 24-bit
//! ICAO address can be read out of the matching NSAP.
//!
//! Addresses that are not OSI-typed or not exactly 20 octets are never an
//! error: classification simply reports [`Direction::Unknown`] and an
//! aircraft address of 0, and the caller carries on without it.

use crate::transport::{OsiAddress, PacketInfo};

/// Length of an ATN NSAP address in octets.
pub const NSAP_LENGTH: usize = 20;

/// "All Mobile ATSC" NSAP prefix (air traffic services communications).
pub const MOBILE_ATSC_PREFIX: u32 = 0x470027C1;

/// "All Mobile AINSC" NSAP prefix (aeronautical industry services).
pub const MOBILE_AINSC_PREFIX: u32 = 0x47002741;

/// Offset of the 24-bit ICAO aircraft address within a mobile NSAP.
const AIRCRAFT_ADDR_OFFSET: usize = 8;

/// Direction of a packet relative to the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Ground to air (destination NSAP carries a mobile prefix).
    Uplink,
    /// Air to ground (source NSAP carries a mobile prefix).
    Downlink,
    /// Neither endpoint recognized as an aircraft.
    #[default]
    Unknown,
}

impl Direction {
    /// Return a string representation of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Uplink => "uplink",
            Direction::Downlink => "downlink",
            Direction::Unknown => "unknown",
        }
    }
}

/// True if the address is a well-formed NSAP whose 4-byte prefix is one of
/// the ICAO mobile markers.
pub fn is_mobile(addr: &OsiAddress) -> bool {
    if !addr.is_osi_nsap() {
        return false;
    }
    let prefix = u32::from_be_bytes([
        addr.octets[0],
        addr.octets[1],
        addr.octets[2],
        addr.octets[3],
    ]);
    prefix == MOBILE_ATSC_PREFIX || prefix == MOBILE_AINSC_PREFIX
}

/// Classify a packet as uplink or downlink from its NSAP prefixes.
///
/// Both addresses must be OSI-typed 20-octet NSAPs, otherwise the result is
/// `Unknown`. The source address is tested first, the destination second;
/// when both carry a mobile prefix the destination match wins. That check
/// order is deliberate and must be preserved for parity with deployed
/// captures (air-to-air traffic classifies as uplink).
pub fn classify(pkt: &PacketInfo<'_>) -> Direction {
    if !pkt.src.is_osi_nsap() || !pkt.dst.is_osi_nsap() {
        return Direction::Unknown;
    }

    let mut direction = Direction::Unknown;
    if is_mobile(&pkt.src) {
        direction = Direction::Downlink;
    }
    if is_mobile(&pkt.dst) {
        direction = Direction::Uplink;
    }
    direction
}

/// Extract the 24-bit ICAO aircraft address from a packet, or 0.
///
/// The address comes from octets 8..=10 of whichever endpoint carries a
/// mobile prefix, with the same precedence as [`classify`]: destination
/// over source when both match.
pub fn aircraft_address(pkt: &PacketInfo<'_>) -> u32 {
    let mut address = 0;
    if is_mobile(&pkt.src) {
        address = extract_aircraft_address(&pkt.src);
    }
    if is_mobile(&pkt.dst) {
        address = extract_aircraft_address(&pkt.dst);
    }
    address
}

/// Read the 24-bit aircraft address out of a mobile NSAP.
///
/// The caller is responsible for checking [`is_mobile`] first; on a
/// too-short address this returns 0.
pub fn extract_aircraft_address(addr: &OsiAddress) -> u32 {
    match addr.octets.get(AIRCRAFT_ADDR_OFFSET..AIRCRAFT_ADDR_OFFSET + 3) {
        Some(o) => (u32::from(o[0]) << 16) | (u32::from(o[1]) << 8) | u32::from(o[2]),
        None => 0,
    }
}

/// Format NSAP octets as dotted hex groups (AFI, then 2-octet groups).
pub fn format_nsap(octets: &[u8]) -> String {
    let mut out = String::with_capacity(octets.len() * 3);
    for (i, b) in octets.iter().enumerate() {
        if i == 1 || (i > 1 && (i - 1) % 2 == 0) {
            out.push('.');
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}
