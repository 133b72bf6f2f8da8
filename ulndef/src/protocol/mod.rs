// ulndef/src/protocol/mod.rs

pub mod commands;
pub mod crc;

pub use commands::*;
pub use crc::{append_crc, iso14443a_crc};
