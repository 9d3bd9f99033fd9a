//! Application codec framework.
//!
//! This module provides:
//! - [`AppCodec`] trait for application-grammar decoders
//! - [`AppGrammar`] closed enum over the built-in codecs (static dispatch)
//! - [`CodecRegistry`] for qualifier-to-codec selection and trial ordering
//!
//! The built-in codecs are *structural* decoders: they validate the
//! PER-level shape of a candidate grammar (extension bit, choice index
//! bounds, minimum lengths) and surface the selected variant, standing in
//! for the mechanically generated per-field decoders that live outside this
//! crate. That is exactly the depth the correlation engine needs - a trial
//! decode accepts or rejects a grammar on structure alone.

mod cm;
mod cpdlc;
mod field;
mod pmcpdlc;

pub use cm::CmCodec;
pub use cpdlc::CpdlcCodec;
pub use field::{DecodedPdu, FieldEntry, FieldValue};
pub use pmcpdlc::PmCpdlcCodec;

use smallvec::SmallVec;

use crate::error::DecodeError;
use crate::nsap::Direction;
use crate::session::AeQualifier;

/// Core trait all application codecs implement.
///
/// `decode` is pure: it either returns a decoded PDU or a [`DecodeError`],
/// with no observable side effects. The trial dispatcher relies on that to
/// probe candidates without committing anything.
pub trait AppCodec {
    /// Unique identifier for this codec (e.g. "cpdlc", "cm").
    fn name(&self) -> &'static str;

    /// Human-readable display name.
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// The application qualifier this codec decodes for.
    fn qualifier(&self) -> AeQualifier;

    /// Structurally decode one PDU of this codec's grammar.
    ///
    /// The direction selects the ground or aircraft grammar of the
    /// application; a packet with no usable direction cannot pick one.
    fn decode<'a>(
        &self,
        data: &'a [u8],
        direction: Direction,
    ) -> Result<DecodedPdu<'a>, DecodeError>;
}

/// Read a PER CHOICE header: extension bit, then the index over the root
/// alternatives. Returns the index and the alternative's name.
pub(crate) fn per_choice(
    codec: &'static str,
    data: &[u8],
    alternatives: &[&'static str],
) -> Result<(u8, &'static str), DecodeError> {
    let Some(&head) = data.first() else {
        return Err(DecodeError::TooShort {
            codec,
            needed: 1,
            have: 0,
        });
    };
    if head & 0x80 != 0 {
        return Err(DecodeError::UnsupportedExtension { codec });
    }

    let max = alternatives.len() as u8 - 1;
    let bits = 8 - max.leading_zeros() as u8;
    let index = (head >> (7 - bits)) & ((1u8 << bits) - 1);
    if index > max {
        return Err(DecodeError::BadChoiceIndex { codec, index, max });
    }
    Ok((index, alternatives[index as usize]))
}

/// Enum of all built-in application codecs.
///
/// Grammar selection happens once, via pattern match, instead of scattered
/// switches on the integer ae-qualifier tag.
#[derive(Debug, Clone, Copy)]
pub enum AppGrammar {
    ContextManagement(CmCodec),
    PlainCpdlc(CpdlcCodec),
    ProtectedCpdlc(PmCpdlcCodec),
}

/// Macro to delegate AppCodec trait methods to inner types.
macro_rules! delegate_codec {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            AppGrammar::ContextManagement(c) => c.$method($($arg),*),
            AppGrammar::PlainCpdlc(c) => c.$method($($arg),*),
            AppGrammar::ProtectedCpdlc(c) => c.$method($($arg),*),
        }
    };
}

impl AppCodec for AppGrammar {
    #[inline]
    fn name(&self) -> &'static str {
        delegate_codec!(self, name)
    }

    #[inline]
    fn display_name(&self) -> &'static str {
        delegate_codec!(self, display_name)
    }

    #[inline]
    fn qualifier(&self) -> AeQualifier {
        delegate_codec!(self, qualifier)
    }

    #[inline]
    fn decode<'a>(
        &self,
        data: &'a [u8],
        direction: Direction,
    ) -> Result<DecodedPdu<'a>, DecodeError> {
        delegate_codec!(self, decode, data, direction)
    }
}

impl From<CmCodec> for AppGrammar {
    fn from(c: CmCodec) -> Self {
        AppGrammar::ContextManagement(c)
    }
}

impl From<CpdlcCodec> for AppGrammar {
    fn from(c: CpdlcCodec) -> Self {
        AppGrammar::PlainCpdlc(c)
    }
}

impl From<PmCpdlcCodec> for AppGrammar {
    fn from(c: PmCpdlcCodec) -> Self {
        AppGrammar::ProtectedCpdlc(c)
    }
}

/// Registry of application codecs with a fixed trial-candidate order.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: Vec<AppGrammar>,
    trial_order: SmallVec<[AeQualifier; 4]>,
}

impl CodecRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            codecs: Vec::new(),
            trial_order: SmallVec::new(),
        }
    }

    /// Register a codec.
    pub fn register<C: Into<AppGrammar>>(&mut self, codec: C) {
        self.codecs.push(codec.into());
    }

    /// Set the ordered candidate list used by heuristic classification.
    pub fn set_trial_order(&mut self, order: &[AeQualifier]) {
        self.trial_order = order.iter().copied().collect();
    }

    /// Get the codec for a committed qualifier.
    pub fn get(&self, qualifier: AeQualifier) -> Option<&AppGrammar> {
        self.codecs.iter().find(|c| c.qualifier() == qualifier)
    }

    /// Get a codec by name.
    pub fn get_by_name(&self, name: &str) -> Option<&AppGrammar> {
        self.codecs.iter().find(|c| c.name() == name)
    }

    /// Trial candidates, in their fixed order.
    pub fn candidates(&self) -> impl Iterator<Item = &AppGrammar> {
        self.trial_order.iter().filter_map(|q| self.get(*q))
    }

    /// Get the number of registered codecs.
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with all built-in codecs.
///
/// The trial order covers the ambiguous CPDLC traffic: protected mode is
/// probed before plain CPDLC, for both directions. A Context Management
/// deployment narrows the order to its own grammar via
/// [`CodecRegistry::set_trial_order`].
pub fn default_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register(PmCpdlcCodec);
    registry.register(CpdlcCodec);
    registry.register(CmCodec);
    registry.set_trial_order(&[AeQualifier::ProtectedCpdlc, AeQualifier::PlainCpdlc]);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup_by_qualifier() {
        let registry = default_registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.get(AeQualifier::PlainCpdlc).unwrap().name(),
            "cpdlc"
        );
        assert_eq!(registry.get(AeQualifier::ContextManagement).unwrap().name(), "cm");
        assert!(registry.get(AeQualifier::Unknown).is_none());
    }

    #[test]
    fn test_registry_lookup_by_name() {
        let registry = default_registry();
        assert!(registry.get_by_name("pm-cpdlc").is_some());
        assert!(registry.get_by_name("nonexistent").is_none());
    }

    #[test]
    fn test_default_trial_order() {
        let registry = default_registry();
        let names: Vec<_> = registry.candidates().map(|c| c.name()).collect();
        assert_eq!(names, vec!["pm-cpdlc", "cpdlc"]);
    }

    #[test]
    fn test_trial_order_override() {
        let mut registry = default_registry();
        registry.set_trial_order(&[AeQualifier::ContextManagement]);
        let names: Vec<_> = registry.candidates().map(|c| c.name()).collect();
        assert_eq!(names, vec!["cm"]);
    }

    #[test]
    fn test_per_choice_bounds() {
        let alts = ["a", "b", "c"];
        // index bits for max=2 -> 2 bits from the top after the extension bit
        assert_eq!(per_choice("t", &[0x00], &alts).unwrap(), (0, "a"));
        assert_eq!(per_choice("t", &[0x20], &alts).unwrap(), (1, "b"));
        assert_eq!(per_choice("t", &[0x40], &alts).unwrap(), (2, "c"));
        assert!(matches!(
            per_choice("t", &[0x60], &alts),
            Err(DecodeError::BadChoiceIndex { index: 3, max: 2, .. })
        ));
    }

    #[test]
    fn test_per_choice_extension_bit() {
        assert!(matches!(
            per_choice("t", &[0x80], &["a", "b"]),
            Err(DecodeError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_per_choice_empty_input() {
        assert!(matches!(
            per_choice("t", &[], &["a"]),
            Err(DecodeError::TooShort { .. })
        ));
    }

    #[test]
    fn test_grammar_enum_is_small() {
        // All codecs are zero-sized unit structs, so the enum is just the
        // discriminant.
        assert!(std::mem::size_of::<AppGrammar>() <= 8);
    }
}
