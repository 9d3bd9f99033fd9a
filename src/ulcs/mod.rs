//! The ATN upper-layer dissector: header peeling, association tracking and
//! application classification, tied together per packet.
//!
//! [`UlcsDissector`] is the crate's front door. Feed it packets in capture
//! order together with the capture's [`SessionStore`] and it returns, per
//! packet, which wire form the payload took, which conversation it belongs
//! to, and the decoded application PDU when one of the grammars matched.

pub mod acse;
pub mod spdu;
pub mod trial;

pub use acse::{parse_acse, AcsePdu, AcsePduKind};
pub use spdu::{parse_spdu, peel, PeeledPayload, SpduHeader, SpduType};
pub use trial::classify_by_trial;

use crate::codec::{default_registry, AppCodec, CodecRegistry, DecodedPdu};
use crate::error::DecodeError;
use crate::nsap::{self, Direction};
use crate::session::{resolver, AeQualifier, ConversationId, SessionStore};
use crate::transport::PacketInfo;

/// Which upper-layer wire form a packet carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadForm {
    /// Explicit session + presentation + ACSE triplet.
    SessionThenAcse,
    /// Bare fully-encoded PDV-list (application data only).
    BarePdvList,
    /// Neither fingerprint matched.
    NotRecognized,
}

/// Everything the dissector learned about one packet.
#[derive(Debug)]
pub struct DissectOutcome<'a> {
    pub form: PayloadForm,
    pub direction: Direction,
    /// The conversation the packet resolved to, when one exists.
    pub conversation: Option<ConversationId>,
    /// The grammar in effect for this packet (committed or trial-derived).
    pub qualifier: AeQualifier,
    /// Session header, for the explicit session form.
    pub session: Option<SpduHeader>,
    /// ACSE envelope, for the explicit session form.
    pub acse: Option<AcsePdu>,
    /// Decoded application PDU, for the bare PDV-list form.
    pub app: Option<DecodedPdu<'a>>,
    /// Decode failure of the recognized form, if any. The packet is still
    /// "ours", it just did not parse.
    pub error: Option<DecodeError>,
}

impl<'a> DissectOutcome<'a> {
    fn unresolved(form: PayloadForm, direction: Direction) -> Self {
        Self {
            form,
            direction,
            conversation: None,
            qualifier: AeQualifier::Unknown,
            session: None,
            acse: None,
            app: None,
            error: None,
        }
    }
}

/// Stateless dissector over per-capture session state.
///
/// The dissector owns only the codec registry; all mutable per-capture
/// state lives in the [`SessionStore`] the caller passes in, so one
/// dissector may serve any number of captures.
pub struct UlcsDissector {
    registry: CodecRegistry,
}

impl UlcsDissector {
    /// Create a dissector with the built-in codecs and default trial order.
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
        }
    }

    /// Create a dissector over a custom registry.
    pub fn with_registry(registry: CodecRegistry) -> Self {
        Self { registry }
    }

    /// The dissector's codec registry.
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Dissect one packet, updating the capture's session state.
    pub fn dissect<'a>(
        &self,
        store: &mut SessionStore,
        pkt: &PacketInfo<'a>,
    ) -> DissectOutcome<'a> {
        let direction = nsap::classify(pkt);

        match spdu::peel(pkt.payload) {
            PeeledPayload::SessionThenAcse { header, rest } => {
                let mut outcome =
                    DissectOutcome::unresolved(PayloadForm::SessionThenAcse, direction);
                outcome.session = Some(header);

                match parse_acse(rest) {
                    Ok(pdu) => {
                        outcome.acse = Some(pdu);
                        outcome.conversation = match pdu.kind {
                            AcsePduKind::Aarq => {
                                acse::on_association_request(store, pkt, &pdu)
                            }
                            AcsePduKind::Aare => acse::on_association_response(store, pkt)
                                .or_else(|| resolver::find(store, pkt).map(|r| r.id)),
                            _ => resolver::find(store, pkt).map(|r| r.id),
                        };
                    }
                    Err(err) => outcome.error = Some(err),
                }

                if let Some(id) = outcome.conversation {
                    if let Some(record) = store.get(id) {
                        outcome.qualifier = record.ae_qualifier();
                    }
                }
                outcome
            }

            PeeledPayload::BarePdvList { rest } => {
                let mut outcome =
                    DissectOutcome::unresolved(PayloadForm::BarePdvList, direction);

                let known = resolver::find(store, pkt)
                    .map(|record| (record.id, record.ae_qualifier()));

                match known {
                    Some((id, qualifier)) if qualifier.is_known() => {
                        // Committed grammar: decode with it, no trial.
                        outcome.conversation = Some(id);
                        outcome.qualifier = qualifier;
                        if let Some(codec) = self.registry.get(qualifier) {
                            match codec.decode(rest, direction) {
                                Ok(pdu) => outcome.app = Some(pdu),
                                Err(err) => outcome.error = Some(err),
                            }
                        }
                    }
                    _ => {
                        outcome.conversation = known.map(|(id, _)| id);
                        if let Some((qualifier, pdu)) =
                            classify_by_trial(&self.registry, rest, direction)
                        {
                            outcome.qualifier = qualifier;
                            outcome.app = Some(pdu);
                            // Commit the verdict only when the packet keys a
                            // conversation at all.
                            if let Some(key) = resolver::conversation_key(store, pkt) {
                                let id = store.find_or_create(key);
                                store.classify(id, qualifier);
                                outcome.conversation = Some(id);
                            }
                        }
                    }
                }
                outcome
            }

            PeeledPayload::NotRecognized => {
                DissectOutcome::unresolved(PayloadForm::NotRecognized, direction)
            }
        }
    }
}

impl Default for UlcsDissector {
    fn default() -> Self {
        Self::new()
    }
}
