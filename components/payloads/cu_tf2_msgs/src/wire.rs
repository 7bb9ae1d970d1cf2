//! Wire formats and their configuration.
//!
//! Every format is positional: a message is its fields in declaration
//! order with no tags. Nothing can be skipped, so a decoder that stops
//! before the end of its input is looking at garbage and the input is
//! rejected. Inputs are walked against the message layout before they are
//! handed to a decoder.

use bincode::config::{BigEndian, Configuration, Limit, LittleEndian, Varint};
use cdr::{CdrBe, CdrLe, Infinite};
use ron::extensions::Extensions;
use ron::Options;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

use crate::error::{RegistryError, RegistryResult};
use crate::layout::Scanner;
use crate::message::RosMessage;

/// Upper bound on what a bincode length prefix may claim while decoding.
const BINCODE_DECODE_LIMIT: usize = 64 * 1024 * 1024;

type BincodeLe = Configuration<LittleEndian, Varint, Limit<BINCODE_DECODE_LIMIT>>;
type BincodeBe = Configuration<BigEndian, Varint, Limit<BINCODE_DECODE_LIMIT>>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireFormat {
    /// OMG CDR with its 4 bytes encapsulation header, as spoken by ROS 2 / DDS.
    #[default]
    Cdr,
    /// bincode 2 standard configuration, the Copper log format.
    Bincode,
    /// ROS 1 serialization as framed by TCPROS: a little endian `u32` length,
    /// then the fields unaligned with `u32` length prefixed strings.
    Ros1,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// How messages are laid out on the wire.
///
/// The CDR decoder follows the byte order announced by the encapsulation
/// header, `byte_order` only drives encoding for that format. ROS 1 is
/// always little endian and ignores it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WireConfig {
    pub format: WireFormat,
    pub byte_order: ByteOrder,
    pub max_message_size: Option<u64>,
}

impl WireConfig {
    pub fn cdr() -> Self {
        Self::default()
    }

    pub fn bincode() -> Self {
        Self {
            format: WireFormat::Bincode,
            ..Self::default()
        }
    }

    pub fn ros1() -> Self {
        Self {
            format: WireFormat::Ros1,
            ..Self::default()
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_max_message_size(mut self, max_message_size: u64) -> Self {
        self.max_message_size = Some(max_message_size);
        self
    }

    pub fn encode<M: RosMessage>(&self, msg: &M) -> RegistryResult<Vec<u8>> {
        let type_name = M::type_name();
        msg.check()
            .map_err(|reason| RegistryError::encoding(type_name, reason))?;

        let bytes = match (self.format, self.byte_order) {
            (WireFormat::Cdr, ByteOrder::Little) => cdr::serialize::<_, _, CdrLe>(msg, Infinite)
                .map_err(|e| RegistryError::encoding(type_name, e))?,
            (WireFormat::Cdr, ByteOrder::Big) => cdr::serialize::<_, _, CdrBe>(msg, Infinite)
                .map_err(|e| RegistryError::encoding(type_name, e))?,
            (WireFormat::Bincode, ByteOrder::Little) => {
                bincode::encode_to_vec(msg, bincode_le())
                    .map_err(|e| RegistryError::encoding(type_name, e))?
            }
            (WireFormat::Bincode, ByteOrder::Big) => bincode::encode_to_vec(msg, bincode_be())
                .map_err(|e| RegistryError::encoding(type_name, e))?,
            (WireFormat::Ros1, _) => {
                serde_rosmsg::to_vec(msg).map_err(|e| RegistryError::encoding(type_name, e))?
            }
        };

        if let Some(max) = self.max_message_size {
            if bytes.len() as u64 > max {
                return Err(RegistryError::encoding(
                    type_name,
                    format!("{} bytes exceed the {max} bytes limit", bytes.len()),
                ));
            }
        }
        Ok(bytes)
    }

    pub fn decode<M: RosMessage>(&self, bytes: &[u8]) -> RegistryResult<M> {
        let type_name = M::type_name();
        if let Some(max) = self.max_message_size {
            if bytes.len() as u64 > max {
                return Err(RegistryError::decoding(
                    type_name,
                    format!("{} bytes exceed the {max} bytes limit", bytes.len()),
                ));
            }
        }

        self.scan::<M>(bytes)
            .map_err(|reason| RegistryError::decoding(type_name, reason))?;

        let (msg, read) = match (self.format, self.byte_order) {
            (WireFormat::Cdr, _) => {
                let mut cursor = Cursor::new(bytes);
                let msg: M = cdr::deserialize_from(&mut cursor, cdr::Bounded(bytes.len() as u64))
                    .map_err(|e| RegistryError::decoding(type_name, e))?;
                (msg, cursor.position() as usize)
            }
            (WireFormat::Bincode, ByteOrder::Little) => {
                bincode::decode_from_slice(bytes, bincode_le())
                    .map_err(|e| RegistryError::decoding(type_name, e))?
            }
            (WireFormat::Bincode, ByteOrder::Big) => {
                bincode::decode_from_slice(bytes, bincode_be())
                    .map_err(|e| RegistryError::decoding(type_name, e))?
            }
            (WireFormat::Ros1, _) => {
                let msg: M = serde_rosmsg::from_slice(bytes)
                    .map_err(|e| RegistryError::decoding(type_name, e))?;
                (msg, bytes.len())
            }
        };

        if read != bytes.len() {
            return Err(RegistryError::decoding(
                type_name,
                format!("{} trailing bytes after the message", bytes.len() - read),
            ));
        }
        msg.check()
            .map_err(|reason| RegistryError::decoding(type_name, reason))?;
        Ok(msg)
    }

    /// Layout walk of the whole input, bounding every length prefix.
    fn scan<M: RosMessage>(&self, bytes: &[u8]) -> Result<(), String> {
        let mut scanner = Scanner::new(self.format, self.byte_order, bytes)?;
        M::scan(&mut scanner)?;
        scanner.finish()
    }

    pub fn serialize_ron(&self) -> RegistryResult<String> {
        ron_options()
            .to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| RegistryError::Config(e.to_string()))
    }
}

fn bincode_le() -> BincodeLe {
    bincode::config::standard().with_limit::<BINCODE_DECODE_LIMIT>()
}

fn bincode_be() -> BincodeBe {
    bincode::config::standard()
        .with_big_endian()
        .with_limit::<BINCODE_DECODE_LIMIT>()
}

fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

/// Read a wire configuration from a RON file.
pub fn read_wire_config(path: impl AsRef<Path>) -> RegistryResult<WireConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| RegistryError::Config(format!("Failed to read {}: {e}", path.display())))?;
    read_wire_config_str(&content)
}

/// Read a wire configuration from RON text.
pub fn read_wire_config_str(content: &str) -> RegistryResult<WireConfig> {
    ron_options()
        .from_str(content)
        .map_err(|e| RegistryError::Config(e.to_string()))
}
