// ulndef/src/error.rs

use thiserror::Error;

/// Common error type for session, codec, and transport failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no NFC device found")]
    NoDevice,

    #[error("no tag in the reader field")]
    NoTag,

    #[error("tag is not a MIFARE Ultralight (ATQA {atqa:#06x})")]
    WrongTagType { atqa: u16 },

    #[error("tag was removed during the operation")]
    TagRemoved,

    #[error("password authentication rejected by the tag")]
    AuthFailed,

    #[error("card did not accept the unlock sequence; not a magic card")]
    NotMagic,

    #[error("no NDEF message TLV in tag memory (byte {offset}: {actual:#04x})")]
    NotNdef { offset: usize, actual: u8 },

    #[error("NDEF message does not hold a single well-known URI record")]
    NotUri,

    #[error("encoded URI needs {needed} bytes but only {capacity} fit the user area")]
    UriTooLong { needed: usize, capacity: usize },

    #[error("invalid response length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid password {0:?}: expected 8 hex digits")]
    InvalidPassword(String),

    #[error("transient reader error: {0}")]
    IoTransient(String),

    #[error("reader error: {0}")]
    IoFatal(String),
}

impl Error {
    /// True when a re-selection of the target may clear the failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::IoTransient(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_tag_type_display() {
        let err = Error::WrongTagType { atqa: 0x0004 };
        let s = format!("{}", err);
        assert!(s.contains("0x0004"));
    }

    #[test]
    fn uri_too_long_display() {
        let err = Error::UriTooLong {
            needed: 60,
            capacity: 48,
        };
        let s = format!("{}", err);
        assert!(s.contains("60"));
        assert!(s.contains("48"));
    }

    #[test]
    fn not_ndef_display() {
        let err = Error::NotNdef {
            offset: 0,
            actual: 0xFF,
        };
        assert!(format!("{}", err).contains("0xff"));
    }

    #[test]
    fn transient_classification() {
        assert!(Error::IoTransient("rf glitch".into()).is_transient());
        assert!(!Error::IoFatal("bus gone".into()).is_transient());
        assert!(!Error::TagRemoved.is_transient());
    }
}
