// Session state machine: classification, auth, and raw-window hygiene.

mod common;

use common::fixtures::open_session;
use ulndef::actions;
use ulndef::tag::{operations, Session};
use ulndef::test_support::{SharedSim, SimTag};
use ulndef::{Error, Pwd, TagKind};

#[test]
fn ev1_ul21_detection_and_pack_overlay() {
    let sim = SimTag::ul21().with_pwd([0x11, 0x22, 0x33, 0x44], [0xAA, 0x55]);
    let (shared, handle) = SharedSim::new(sim);
    let mut session = Session::open(Box::new(shared), None).unwrap();

    actions::attach(&mut session, Some(Pwd::from_bytes([0x11, 0x22, 0x33, 0x44]))).unwrap();
    assert_eq!(session.kind(), TagKind::Ul21);
    assert_eq!(session.managed_pages(), 0x29);

    let dump = operations::read_all(&mut session).unwrap();
    assert!(dump.is_complete());
    // PWD/PACK merged at the UL21 overlay only.
    assert_eq!(dump.image.page(37), &[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(&dump.image.page(38)[..2], &[0xAA, 0x55]);
    assert_eq!(dump.image.page(18), &[0; 4]);
    assert_eq!(&dump.image.page(19)[..2], &[0, 0]);

    // Raw windows for GET_VERSION and PWD_AUTH were both closed again.
    let sim = handle.borrow();
    assert!(sim.handle_crc);
    assert!(sim.easy_framing);
}

#[test]
fn ev1_ul11_detection() {
    let mut session = open_session(SimTag::ul11());
    actions::attach(&mut session, None).unwrap();
    assert_eq!(session.kind(), TagKind::Ul11);
    assert_eq!(session.managed_pages(), 0x14);
}

#[test]
fn plain_ultralight_classification_reselects() {
    let sim = SimTag::plain();
    let (shared, handle) = SharedSim::new(sim);
    let mut session = Session::open(Box::new(shared), None).unwrap();

    actions::attach(&mut session, None).unwrap();
    assert_eq!(session.kind(), TagKind::Ultralight);
    assert_eq!(session.managed_pages(), 0x10);

    let sim = handle.borrow();
    // GET_VERSION knocked the tag out of ACTIVE; classification re-selected.
    assert_eq!(sim.select_count, 2);
    assert!(sim.handle_crc);
    assert!(sim.easy_framing);
}

#[test]
fn classification_is_deterministic() {
    for _ in 0..3 {
        let mut session = open_session(SimTag::ul21());
        actions::attach(&mut session, None).unwrap();
        assert_eq!(session.kind(), TagKind::Ul21);
    }
}

#[test]
fn wrong_atqa_rejected_before_any_page_command() {
    let mut sim = SimTag::plain();
    sim.atqa = [0x00, 0x00];
    let (shared, handle) = SharedSim::new(sim);
    let mut session = Session::open(Box::new(shared), None).unwrap();

    match actions::attach(&mut session, None) {
        Err(Error::WrongTagType { atqa: 0x0000 }) => {}
        other => panic!("expected WrongTagType, got {:?}", other),
    }

    let sim = handle.borrow();
    // Selection happened once and nothing was transceived afterwards.
    assert_eq!(sim.select_count, 1);
    assert!(sim.handle_crc);
    assert!(sim.easy_framing);
}

#[test]
fn wrong_password_is_fatal_and_restores_framing() {
    let sim = SimTag::ul11().with_pwd([1, 2, 3, 4], [0xDE, 0xAD]);
    let (shared, handle) = SharedSim::new(sim);
    let mut session = Session::open(Box::new(shared), None).unwrap();

    let result = actions::attach(&mut session, Some(Pwd::from_bytes([9, 9, 9, 9])));
    assert!(matches!(result, Err(Error::AuthFailed)));
    assert!(session.pack().is_none());

    let sim = handle.borrow();
    assert!(sim.handle_crc);
    assert!(sim.easy_framing);
}

#[test]
fn framing_restored_under_injected_read_failures() {
    // Fault injection across the whole read path: every raw window that
    // was opened must be closed by the time the operation returns,
    // whatever the outcome.
    let sim = SimTag::ul21()
        .with_user_bytes(&common::fixtures::existing_url_tlv())
        .fail_read_at(0)
        .fail_read_at(8)
        .fail_read_at(36);
    let (shared, handle) = SharedSim::new(sim);
    let mut session = Session::open(Box::new(shared), None).unwrap();

    actions::attach(&mut session, None).unwrap();
    let dump = operations::read_all(&mut session).unwrap();
    // Single transient faults recover through re-select plus retry.
    assert!(dump.is_complete());

    let sim = handle.borrow();
    assert!(sim.handle_crc);
    assert!(sim.easy_framing);
}

#[test]
fn tag_removed_mid_read_is_terminal() {
    let (shared, handle) = SharedSim::new(SimTag::plain());
    let mut session = Session::open(Box::new(shared), None).unwrap();
    actions::attach(&mut session, None).unwrap();

    handle.borrow_mut().present = false;
    assert!(matches!(
        operations::read_all(&mut session),
        Err(Error::TagRemoved)
    ));
}
