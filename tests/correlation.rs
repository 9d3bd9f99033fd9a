//! End-to-end correlation tests: full association lifecycles over the
//! public API, packets fed in capture order.

use atn_ulcs::prelude::*;
use atn_ulcs::nsap::{MOBILE_AINSC_PREFIX, MOBILE_ATSC_PREFIX, NSAP_LENGTH};
use atn_ulcs::{AcsePduKind, ExactKeyScheme, SpduType};

fn mobile_nsap(prefix: u32, aircraft: u32) -> OsiAddress {
    let mut octets = vec![0u8; NSAP_LENGTH];
    octets[..4].copy_from_slice(&prefix.to_be_bytes());
    octets[8] = (aircraft >> 16) as u8;
    octets[9] = (aircraft >> 8) as u8;
    octets[10] = aircraft as u8;
    OsiAddress::osi(octets)
}

fn ground_nsap(tag: u8) -> OsiAddress {
    let mut octets = vec![0u8; NSAP_LENGTH];
    octets[..4].copy_from_slice(&0x47004900u32.to_be_bytes());
    octets[19] = tag;
    OsiAddress::osi(octets)
}

fn pkt<'a>(
    src: &OsiAddress,
    dst: &OsiAddress,
    src_ref: Option<u16>,
    dst_ref: Option<u16>,
    payload: &'a [u8],
) -> PacketInfo<'a> {
    PacketInfo {
        src: src.clone(),
        dst: dst.clone(),
        src_ref,
        dst_ref,
        payload,
    }
}

/// AARQ carrying ae-qualifier 22 (protected-mode CPDLC), wrapped in the
/// Short-Connect session + presentation header.
const AARQ_PM: [u8; 5] = [0xE8, 0x02, 0x00, 0x01, 22];

/// AARE with no qualifier, wrapped in Short-Connect-Accept.
const AARE: [u8; 4] = [0xF8, 0x02, 0x10, 0x00];

// A protected-mode logon followed by data transfer in both directions:
// every packet of the exchange resolves to the same conversation, and the
// qualifier committed at association time classifies all later traffic
// without any trial decoding.
#[test]
fn protected_mode_association_lifecycle() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x3C4D5E);
    let ground = ground_nsap(1);

    // Downlink AARQ: aircraft opens the association with its own
    // reference.
    let request = pkt(&aircraft, &ground, Some(3), None, &AARQ_PM);
    let outcome = dissector.dissect(&mut store, &request);
    assert_eq!(outcome.direction, Direction::Downlink);
    assert_eq!(outcome.form, PayloadForm::SessionThenAcse);
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);
    let id = outcome.conversation.expect("request keys a conversation");

    // Uplink AARE: ground echoes reference 3 and allocates 9.
    let response = pkt(&ground, &aircraft, Some(9), Some(3), &AARE);
    let outcome = dissector.dissect(&mut store, &response);
    assert_eq!(outcome.direction, Direction::Uplink);
    assert_eq!(outcome.conversation, Some(id));
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);

    // Downlink data transfer toward the ground (reference 9): bare
    // PDV-list, pm-abort-user shape.
    let down = [0x00, 0x21];
    let outcome = dissector.dissect(&mut store, &pkt(&aircraft, &ground, None, Some(9), &down));
    assert_eq!(outcome.form, PayloadForm::BarePdvList);
    assert_eq!(outcome.conversation, Some(id));
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);
    assert_eq!(outcome.app.unwrap().codec, "pm-cpdlc");

    // Uplink data transfer toward the aircraft (reference 3).
    let up = [0x00, 0x21, 0x02, 0x03];
    let outcome = dissector.dissect(&mut store, &pkt(&ground, &aircraft, None, Some(3), &up));
    assert_eq!(outcome.conversation, Some(id));
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);
}

// The AARE entered the table under both its reference patterns: the
// requester's data-transfer key and the responder's own key both resolve
// to the one shared record.
#[test]
fn connect_confirm_aliases_both_sides() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let aircraft = mobile_nsap(MOBILE_AINSC_PREFIX, 0xABCDEF);
    let ground = ground_nsap(2);

    let id = dissector
        .dissect(&mut store, &pkt(&aircraft, &ground, Some(3), None, &AARQ_PM))
        .conversation
        .unwrap();
    dissector.dissect(&mut store, &pkt(&ground, &aircraft, Some(9), Some(3), &AARE));

    let requester_key = store.key(&aircraft, 3, &ground);
    let responder_key = store.key(&ground, 9, &aircraft);
    assert_eq!(store.find(&requester_key).unwrap().id, id);
    assert_eq!(store.find(&responder_key).unwrap().id, id);
}

// Two aircraft logging on through the same ground facility stay in
// separate conversations keyed by their own references and addresses.
#[test]
fn two_aircraft_do_not_share_state() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let ground = ground_nsap(3);
    let plane_a = mobile_nsap(MOBILE_ATSC_PREFIX, 0x111111);
    let plane_b = mobile_nsap(MOBILE_ATSC_PREFIX, 0x222222);

    let id_a = dissector
        .dissect(&mut store, &pkt(&plane_a, &ground, Some(3), None, &AARQ_PM))
        .conversation
        .unwrap();
    let id_b = dissector
        .dissect(&mut store, &pkt(&plane_b, &ground, Some(3), None, &AARQ_PM))
        .conversation
        .unwrap();
    assert_ne!(id_a, id_b);

    // Each response bridges through its own aircraft address.
    let out_a = dissector.dissect(&mut store, &pkt(&ground, &plane_a, Some(8), Some(3), &AARE));
    let out_b = dissector.dissect(&mut store, &pkt(&ground, &plane_b, Some(9), Some(3), &AARE));
    assert_eq!(out_a.conversation, Some(id_a));
    assert_eq!(out_b.conversation, Some(id_b));
}

// A response with no captured request bridges nothing; the capture simply
// started mid-association.
#[test]
fn orphan_response_is_harmless() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x654321);
    let ground = ground_nsap(4);

    let outcome = dissector.dissect(&mut store, &pkt(&ground, &aircraft, Some(9), Some(3), &AARE));
    assert_eq!(outcome.acse.unwrap().kind, AcsePduKind::Aare);
    assert!(outcome.conversation.is_none());
    assert!(store.is_empty());
}

// Without a captured association, classification falls back to trial
// decoding: candidates are probed in their fixed order and the first
// structurally clean decode wins, so traffic both CPDLC grammars accept
// deterministically classifies as protected mode.
#[test]
fn trial_order_resolves_ambiguous_traffic() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x777777);
    let ground = ground_nsap(5);

    // PDV-list fingerprint 0x00Ax; bit 7 of the first octet is clear, so
    // protected mode accepts this (pm-abort-user) and wins by order.
    let accepted_by_both = [0x00, 0xA1, 0x02, 0x03];
    let outcome = dissector.dissect(
        &mut store,
        &pkt(&ground, &aircraft, None, Some(5), &accepted_by_both),
    );
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);
    let id = outcome.conversation.unwrap();
    assert_eq!(
        store.get(id).unwrap().ae_qualifier(),
        AeQualifier::ProtectedCpdlc
    );

    // The verdict stuck: later packets of the conversation skip the trial
    // and the first classification is never overwritten.
    let outcome = dissector.dissect(
        &mut store,
        &pkt(&ground, &aircraft, None, Some(5), &accepted_by_both),
    );
    assert_eq!(outcome.conversation, Some(id));
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);
}

// A Context Management deployment narrows the trial order to CM and gets
// CM verdicts for the same bare PDV-list form.
#[test]
fn cm_deployment_classifies_logon_traffic() {
    let mut registry = default_registry();
    registry.set_trial_order(&[AeQualifier::ContextManagement]);
    let dissector = UlcsDissector::with_registry(registry);
    let mut store = SessionStore::new();

    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x0A0B0C);
    let ground = ground_nsap(6);

    // Downlink CM message. The 0x00A0 lead is the PDV fingerprint; CM
    // reads its choice index from the top bits of the first octet, so 0x00
    // selects cm-contact-response of the aircraft grammar.
    let msg = [0x00, 0xA0, 0x40, 0x55];
    let outcome = dissector.dissect(&mut store, &pkt(&aircraft, &ground, None, Some(2), &msg));
    assert_eq!(outcome.qualifier, AeQualifier::ContextManagement);
    let app = outcome.app.unwrap();
    assert_eq!(app.codec, "cm");
    assert_eq!(app.pdu, "aircraft-message");
}

// The session header survives peeling with its refuse parameters intact.
#[test]
fn refuse_header_reports_reason() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x00A1B2);
    let ground = ground_nsap(7);

    // Short-Refuse with parameters: reason nibble 0x05, then an abort
    // ACSE PDU.
    let refuse = [(0x1C << 3) | 0x05, 0x02, 0x05, 0x40, 0x00];
    let outcome = dissector.dissect(&mut store, &pkt(&ground, &aircraft, Some(9), Some(3), &refuse));
    let header = outcome.session.unwrap();
    assert_eq!(header.spdu, SpduType::ShortRefuse);
    assert!(header.parameter_indication);
    assert!(header.persistent);
    assert_eq!(header.reject_reason, Some(0x05));
    assert_eq!(outcome.acse.unwrap().kind, AcsePduKind::Abrt);
}

// Closing a capture resets the store; the next capture starts clean and
// reuses nothing.
#[test]
fn captures_are_isolated_by_reset() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::new();
    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x3C4D5E);
    let ground = ground_nsap(8);

    dissector.dissect(&mut store, &pkt(&aircraft, &ground, Some(3), None, &AARQ_PM));
    assert!(!store.is_empty());

    store.reset();
    assert!(store.is_empty());

    // The old response now finds no pending request.
    let outcome = dissector.dissect(&mut store, &pkt(&ground, &aircraft, Some(9), Some(3), &AARE));
    assert!(outcome.conversation.is_none());
}

// The exact key scheme is a drop-in replacement observable only through
// key values, not behavior.
#[test]
fn exact_scheme_runs_the_same_lifecycle() {
    let dissector = UlcsDissector::new();
    let mut store = SessionStore::with_scheme(ExactKeyScheme);
    let aircraft = mobile_nsap(MOBILE_ATSC_PREFIX, 0x3C4D5E);
    let ground = ground_nsap(9);

    let id = dissector
        .dissect(&mut store, &pkt(&aircraft, &ground, Some(3), None, &AARQ_PM))
        .conversation
        .unwrap();
    let outcome = dissector.dissect(&mut store, &pkt(&ground, &aircraft, Some(9), Some(3), &AARE));
    assert_eq!(outcome.conversation, Some(id));

    let down = [0x00, 0x21];
    let outcome = dissector.dissect(&mut store, &pkt(&aircraft, &ground, None, Some(9), &down));
    assert_eq!(outcome.conversation, Some(id));
    assert_eq!(outcome.qualifier, AeQualifier::ProtectedCpdlc);
}
