//! Conversation key schemes.
//!
//! A conversation key folds two network addresses and one 16-bit transport
//! reference into a single lookup key. The scheme sits behind the
//! [`KeyScheme`] trait so the lossy hashed key used for parity with the
//! original engine can be swapped for an exact composite key without
//! touching any call site.

use crate::transport::OsiAddress;

/// A correlation key for the conversation table.
///
/// `Hashed` is a lossy 32-bit fold of `(addr_a, reference, addr_b)`;
/// distinct sessions may alias once transport references are reused deep
/// into a capture (a known accuracy bound, accepted rather than detected).
/// `Exact` keeps the full triple and cannot alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationKey {
    Hashed(u32),
    Exact {
        a: OsiAddress,
        reference: u16,
        b: OsiAddress,
    },
}

/// Strategy for deriving a [`ConversationKey`] from an address/reference
/// triple.
///
/// Implementations must be pure (equal inputs give equal keys across calls)
/// and order-sensitive in the two addresses. There is no failure mode:
/// addresses of unrecognized families still key, since callers only invoke
/// the scheme with transport-supplied addresses.
pub trait KeyScheme: Send + Sync {
    fn key(&self, a: &OsiAddress, reference: u16, b: &OsiAddress) -> ConversationKey;
}

/// Default lossy scheme: `k = (hash(a) << 16) | ref`, then
/// `k = (hash(b) << 24) | k`.
///
/// Matches the original engine's behavior, trading collision resistance for
/// a fixed-width integer key.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedKeyScheme;

impl HashedKeyScheme {
    /// Deterministic fold of an address's family tag and octets.
    fn hash_address(addr: &OsiAddress) -> u32 {
        let seed = match addr.family {
            crate::transport::AddressFamily::Osi => 0x4F53u32,
            crate::transport::AddressFamily::Other(f) => u32::from(f),
        };
        addr.octets
            .iter()
            .fold(seed, |h, &b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
    }
}

impl KeyScheme for HashedKeyScheme {
    fn key(&self, a: &OsiAddress, reference: u16, b: &OsiAddress) -> ConversationKey {
        let mut k = (Self::hash_address(a) << 16) | u32::from(reference);
        k = (Self::hash_address(b) << 24) | k;
        ConversationKey::Hashed(k)
    }
}

/// Exact composite scheme: keeps the full `(a, reference, b)` triple.
///
/// Costs more memory per table entry but eliminates the aliasing risk of
/// the hashed scheme when references are reused across a long capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKeyScheme;

impl KeyScheme for ExactKeyScheme {
    fn key(&self, a: &OsiAddress, reference: u16, b: &OsiAddress) -> ConversationKey {
        ConversationKey::Exact {
            a: a.clone(),
            reference,
            b: b.clone(),
        }
    }
}
