//! Field value types for decoded PDUs.
//!
//! Decoded fields are zero-copy where possible: `Str` and `Bytes` reference
//! the packet payload directly, `OwnedString` is used when a value must be
//! constructed.

use compact_str::CompactString;
use smallvec::SmallVec;

/// Field entry for decoded PDUs: (field_name, value).
/// Field names are always static strings (grammar-defined).
pub type FieldEntry<'data> = (&'static str, FieldValue<'data>);

/// Possible field value types.
///
/// The lifetime parameter `'data` ties the value to the packet payload.
#[derive(Debug, Clone)]
pub enum FieldValue<'data> {
    /// Unsigned 8-bit integer
    UInt8(u8),
    /// Unsigned 16-bit integer
    UInt16(u16),
    /// Unsigned 32-bit integer
    UInt32(u32),
    /// Boolean value
    Bool(bool),
    /// Zero-copy string reference into packet data
    Str(&'data str),
    /// Zero-copy byte slice reference into packet data
    Bytes(&'data [u8]),
    /// Owned string for constructed values (formatted addresses, enum names).
    /// Uses CompactString for small-string optimization.
    OwnedString(CompactString),
    /// Null/missing value
    Null,
}

impl<'data> FieldValue<'data> {
    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt8(v) => Some(u64::from(*v)),
            FieldValue::UInt16(v) => Some(u64::from(*v)),
            FieldValue::UInt32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    /// Try to get as str reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            FieldValue::OwnedString(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get as bytes reference.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl<'a, 'b> PartialEq<FieldValue<'b>> for FieldValue<'a> {
    fn eq(&self, other: &FieldValue<'b>) -> bool {
        match (self, other) {
            (FieldValue::UInt8(a), FieldValue::UInt8(b)) => a == b,
            (FieldValue::UInt16(a), FieldValue::UInt16(b)) => a == b,
            (FieldValue::UInt32(a), FieldValue::UInt32(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Str(a), FieldValue::Str(b)) => a == b,
            (FieldValue::Str(a), FieldValue::OwnedString(b)) => *a == b.as_str(),
            (FieldValue::OwnedString(a), FieldValue::Str(b)) => a.as_str() == *b,
            (FieldValue::OwnedString(a), FieldValue::OwnedString(b)) => a == b,
            (FieldValue::Bytes(a), FieldValue::Bytes(b)) => a == b,
            (FieldValue::Null, FieldValue::Null) => true,
            _ => false,
        }
    }
}

impl<'data> std::fmt::Display for FieldValue<'data> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::UInt8(v) => write!(f, "{v}"),
            FieldValue::UInt16(v) => write!(f, "{v}"),
            FieldValue::UInt32(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Str(s) => write!(f, "{s}"),
            FieldValue::OwnedString(s) => write!(f, "{s}"),
            FieldValue::Bytes(b) => write!(f, "[{} bytes]", b.len()),
            FieldValue::Null => write!(f, "NULL"),
        }
    }
}

/// Result of a structural decode of one application PDU.
///
/// Carries the grammar variant the codec selected plus a small field list;
/// most PDUs surface fewer than 8 fields at this level.
#[derive(Debug, Clone)]
pub struct DecodedPdu<'data> {
    /// Codec that produced this PDU (e.g. "cpdlc").
    pub codec: &'static str,
    /// Selected top-level grammar variant (e.g. "uplink-message").
    pub pdu: &'static str,
    /// Extracted field values.
    pub fields: SmallVec<[FieldEntry<'data>; 8]>,
}

impl<'data> DecodedPdu<'data> {
    /// Create a decoded PDU with no fields yet.
    pub fn new(codec: &'static str, pdu: &'static str) -> Self {
        Self {
            codec,
            pdu,
            fields: SmallVec::new(),
        }
    }

    /// Get a field value by name (linear search, N is small).
    pub fn get(&self, name: &str) -> Option<&FieldValue<'data>> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }
}
