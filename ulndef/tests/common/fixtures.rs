// fixtures.rs — sample tags and hand-built NDEF TLV areas.
#![allow(dead_code)]

use ulndef::tag::Session;
use ulndef::test_support::SimTag;

/// Build the TLV bytes for a single URI record by hand, independent of the
/// codec under test.
pub fn uri_tlv(prefix_code: u8, tail: &str) -> Vec<u8> {
    let payload_len = tail.len() + 1;
    let mut tlv = vec![
        0x03,
        (payload_len + 4) as u8,
        0xD1,
        0x01,
        payload_len as u8,
        0x55,
        prefix_code,
    ];
    tlv.extend_from_slice(tail.as_bytes());
    tlv.push(0xFE);
    tlv
}

/// The S2 image: `https://a.b.co` abbreviated with prefix code 0x04.
pub fn existing_url_tlv() -> Vec<u8> {
    uri_tlv(0x04, "a.b.co")
}

/// A plain Ultralight already holding `https://a.b.co`.
pub fn plain_tag_with_url() -> SimTag {
    SimTag::plain().with_user_bytes(&existing_url_tlv())
}

/// Open a session over an owned simulated tag.
pub fn open_session(sim: SimTag) -> Session<'static> {
    Session::open(Box::new(sim), None).expect("simulated open cannot fail")
}
