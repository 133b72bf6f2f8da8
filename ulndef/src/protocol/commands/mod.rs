// ulndef/src/protocol/commands/mod.rs

pub mod auth;
pub mod halt;
pub mod read;
pub mod version;
pub mod write;

pub use auth::encode_pwd_auth;
pub use halt::encode_halt;
pub use read::encode_read;
pub use version::encode_get_version;
pub use write::encode_compat_write;

/// High-level Command enum. New commands should be added here and
/// their per-command encoder placed in `protocol::commands::<name>.rs`.
#[derive(Debug, Clone)]
pub enum Command {
    /// READ four pages starting at `page` (framed).
    Read {
        /// First page of the 16-byte read window.
        page: u32,
    },
    /// Compatibility-mode WRITE of one page (framed, 16-byte payload).
    CompatWrite {
        /// Page to write.
        page: u32,
        /// Page content; the wire frame zero-pads to 16 bytes.
        data: [u8; 4],
    },
    /// EV1 GET_VERSION (raw).
    GetVersion,
    /// EV1 PWD_AUTH (raw).
    PwdAuth {
        /// 4-byte password.
        pwd: crate::types::Pwd,
    },
    /// ISO 14443-3 HLTA (raw).
    Halt,
}

impl Command {
    /// Return the command code as it appears on the wire.
    pub fn command_code(&self) -> u8 {
        match self {
            Self::Read { .. } => crate::constants::CMD_READ,
            Self::CompatWrite { .. } => crate::constants::CMD_COMPAT_WRITE,
            Self::GetVersion => crate::constants::CMD_GET_VERSION,
            Self::PwdAuth { .. } => crate::constants::CMD_PWD_AUTH,
            Self::Halt => crate::constants::CMD_HALT[0],
        }
    }

    /// Raw commands are sent with reader CRC and easy framing disabled;
    /// their encoders append the ISO 14443-A CRC themselves.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::GetVersion | Self::PwdAuth { .. } | Self::Halt)
    }

    /// Encode the command into its wire frame.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Read { page } => encode_read(*page),
            Self::CompatWrite { page, data } => encode_compat_write(*page, *data),
            Self::GetVersion => encode_get_version(),
            Self::PwdAuth { pwd } => encode_pwd_auth(pwd),
            Self::Halt => encode_halt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_codes() {
        assert_eq!(Command::Read { page: 4 }.command_code(), 0x30);
        assert_eq!(
            Command::CompatWrite {
                page: 4,
                data: [0; 4]
            }
            .command_code(),
            0xA0
        );
        assert_eq!(Command::GetVersion.command_code(), 0x60);
        assert_eq!(Command::Halt.command_code(), 0x50);
    }

    #[test]
    fn raw_classification() {
        assert!(!Command::Read { page: 0 }.is_raw());
        assert!(Command::GetVersion.is_raw());
        assert!(Command::Halt.is_raw());
    }
}
