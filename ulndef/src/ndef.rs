// ulndef/src/ndef.rs

//! NDEF TLV codec for a single well-known "U" (URI) record.
//!
//! The TLV area is the user memory starting at page 4 (image byte 16).
//! Only the short TLV form is supported; the message holds exactly one
//! record with header `D1 01 <len> 55`, a one-byte URI prefix code and the
//! URI tail, followed by the 0xFE terminator.

use crate::constants::{NDEF_SINGLE_SHORT_RECORD, NDEF_TYPE_URI, TLV_NDEF, TLV_TERMINATOR};
use crate::tag::memory::Image;
use crate::types::TagKind;
use crate::{Error, Result};

/// URI identifier abbreviations handled by this tool.
pub const URI_PREFIXES: [(u8, &str); 2] = [(0x02, "https://www."), (0x04, "https://")];

/// Abbreviation text for a prefix code; codes outside the table decode to
/// an empty prefix and the tail is emitted unchanged.
pub fn prefix_for(code: u8) -> &'static str {
    URI_PREFIXES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, p)| *p)
        .unwrap_or("")
}

/// Split a URI into its prefix code and tail, preferring the longest
/// matching abbreviation. An unabbreviated URI gets code 0x00 and the full
/// string as tail.
pub fn split_uri(uri: &str) -> (u8, &str) {
    for (code, prefix) in URI_PREFIXES {
        if let Some(tail) = uri.strip_prefix(prefix) {
            return (code, tail);
        }
    }
    (0x00, uri)
}

/// Decode the URI record from a memory image.
pub fn decode(image: &Image, kind: TagKind) -> Result<String> {
    let user = image.user_area(kind);

    if user[0] != TLV_NDEF {
        return Err(Error::NotNdef {
            offset: 0,
            actual: user[0],
        });
    }
    if user[2] != NDEF_SINGLE_SHORT_RECORD || user[3] != 0x01 || user[5] != NDEF_TYPE_URI {
        return Err(Error::NotUri);
    }

    let payload_len = user[4] as usize;
    if payload_len == 0 {
        return Err(Error::NotUri);
    }
    let tail_len = payload_len - 1;
    if 7 + tail_len > user.len() {
        return Err(Error::NotUri);
    }

    let tail = std::str::from_utf8(&user[7..7 + tail_len]).map_err(|_| Error::NotUri)?;
    Ok(format!("{}{}", prefix_for(user[6]), tail))
}

/// Encode `uri` into the user area of `image`, leaving every other page
/// untouched (write policy decides what actually reaches the tag).
pub fn encode(uri: &str, image: &mut Image, kind: TagKind) -> Result<()> {
    let (code, tail) = split_uri(uri);
    let tail_len = tail.len();
    let payload_len = tail_len + 1;
    let tlv_len = payload_len + 4;

    // T + L + value + terminator must fit the user area, and L is short-form.
    let needed = 2 + tlv_len + 1;
    let capacity = kind.user_len();
    if tlv_len > 0xFE || needed > capacity {
        return Err(Error::UriTooLong { needed, capacity });
    }

    let user = image.user_area_mut(kind);
    user[0] = TLV_NDEF;
    user[1] = tlv_len as u8;
    user[2] = NDEF_SINGLE_SHORT_RECORD;
    user[3] = 0x01;
    user[4] = payload_len as u8;
    user[5] = NDEF_TYPE_URI;
    user[6] = code;
    user[7..7 + tail_len].copy_from_slice(tail.as_bytes());
    user[7 + tail_len] = TLV_TERMINATOR;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_uri_prefers_longest_prefix() {
        assert_eq!(split_uri("https://www.example.com"), (0x02, "example.com"));
        assert_eq!(split_uri("https://a.b.co"), (0x04, "a.b.co"));
        assert_eq!(split_uri("ftp://x"), (0x00, "ftp://x"));
    }

    #[test]
    fn encode_layout_example_com() {
        let mut image = Image::default();
        encode("https://www.example.com", &mut image, TagKind::Ultralight).unwrap();

        let expected: &[u8] = &[
            0x03, 0x10, 0xD1, 0x01, 0x0C, 0x55, 0x02, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
            b'.', b'c', b'o', b'm', 0xFE,
        ];
        assert_eq!(&image.as_bytes()[16..16 + expected.len()], expected);
    }

    #[test]
    fn decode_known_image() {
        let mut image = Image::default();
        let tlv: &[u8] = &[
            0x03, 0x0A, 0xD1, 0x01, 0x06, 0x55, 0x04, b'a', b'.', b'b', b'.', b'c', b'o', 0xFE,
        ];
        image.as_bytes_mut()[16..16 + tlv.len()].copy_from_slice(tlv);

        assert_eq!(
            decode(&image, TagKind::Ultralight).unwrap(),
            "https://a.b.co"
        );
    }

    #[test]
    fn decode_empty_image_is_not_ndef() {
        let image = Image::default();
        match decode(&image, TagKind::Ultralight) {
            Err(Error::NotNdef {
                offset: 0,
                actual: 0,
            }) => {}
            other => panic!("expected NotNdef, got {:?}", other),
        }
    }

    #[test]
    fn decode_text_record_is_not_uri() {
        let mut image = Image::default();
        // A text record: type 'T' instead of 'U'.
        let tlv: &[u8] = &[0x03, 0x07, 0xD1, 0x01, 0x03, 0x54, 0x02, b'h', b'i', 0xFE];
        image.as_bytes_mut()[16..16 + tlv.len()].copy_from_slice(tlv);
        assert!(matches!(
            decode(&image, TagKind::Ultralight),
            Err(Error::NotUri)
        ));
    }

    #[test]
    fn decode_unknown_prefix_code_keeps_tail() {
        let mut image = Image::default();
        // Prefix code 0x01 (http://www.) is outside the supported table.
        let tlv: &[u8] = &[0x03, 0x08, 0xD1, 0x01, 0x04, 0x55, 0x01, b'a', b'.', b'b', 0xFE];
        image.as_bytes_mut()[16..16 + tlv.len()].copy_from_slice(tlv);
        assert_eq!(decode(&image, TagKind::Ultralight).unwrap(), "a.b");
    }

    #[test]
    fn decode_invalid_utf8_tail() {
        let mut image = Image::default();
        let tlv: &[u8] = &[0x03, 0x07, 0xD1, 0x01, 0x03, 0x55, 0x04, 0xC0, 0xC1, 0xFE];
        image.as_bytes_mut()[16..16 + tlv.len()].copy_from_slice(tlv);
        assert!(matches!(
            decode(&image, TagKind::Ultralight),
            Err(Error::NotUri)
        ));
    }

    #[test]
    fn encode_too_long_for_plain_ultralight() {
        let mut image = Image::default();
        let url = format!("https://{}", "a".repeat(48));
        match encode(&url, &mut image, TagKind::Ultralight) {
            Err(Error::UriTooLong { capacity: 48, .. }) => {}
            other => panic!("expected UriTooLong, got {:?}", other),
        }
        // The image stays untouched on failure.
        assert!(image.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn encode_fits_ul21_but_not_ul11() {
        let url = format!("https://{}", "a".repeat(60));
        let mut image = Image::default();
        assert!(encode(&url, &mut image, TagKind::Ul11).is_err());
        assert!(encode(&url, &mut image, TagKind::Ul21).is_ok());
    }

    #[test]
    fn roundtrip_unprefixed_uri() {
        let mut image = Image::default();
        encode("mailto:x@y.z", &mut image, TagKind::Ultralight).unwrap();
        assert_eq!(
            decode(&image, TagKind::Ultralight).unwrap(),
            "mailto:x@y.z"
        );
    }
}
