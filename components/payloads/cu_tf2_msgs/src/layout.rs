//! Structural walk over an encoded message, run before any decoder sees it.
//!
//! Every string and sequence length prefix is checked against the bytes
//! left in the input, so a corrupt prefix is rejected here instead of sizing
//! a buffer inside the decoder. The walk also enforces what the decoders let
//! through on their own: CDR string terminators and `bool` values.

use crate::wire::{ByteOrder, WireFormat};

/// Field by field layout of a message, in declaration order.
pub trait WireLayout {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String>;
}

/// Cursor over the body of an encoded message.
#[derive(Debug)]
pub struct Scanner<'a> {
    body: &'a [u8],
    pos: usize,
    format: WireFormat,
    byte_order: ByteOrder,
}

impl<'a> Scanner<'a> {
    /// Strips the framing of `format`.
    /// CDR announces its byte order in the encapsulation header, ROS 1 is
    /// always little endian.
    pub(crate) fn new(
        format: WireFormat,
        byte_order: ByteOrder,
        bytes: &'a [u8],
    ) -> Result<Self, String> {
        let (body, byte_order) = match format {
            WireFormat::Cdr => {
                let (header, body) = split_prefix(bytes, "encapsulation header")?;
                let byte_order = match header {
                    [0, 0 | 2, _, _] => ByteOrder::Big,
                    [0, 1 | 3, _, _] => ByteOrder::Little,
                    _ => return Err(format!("unknown encapsulation {header:?}")),
                };
                (body, byte_order)
            }
            WireFormat::Ros1 => {
                let (prefix, body) = split_prefix(bytes, "message length")?;
                let len = u32::from_le_bytes(prefix);
                if len as usize != body.len() {
                    return Err(format!(
                        "message length says {len} bytes but {} follow",
                        body.len()
                    ));
                }
                (body, ByteOrder::Little)
            }
            WireFormat::Bincode => (bytes, byte_order),
        };
        Ok(Self {
            body,
            pos: 0,
            format,
            byte_order,
        })
    }

    pub fn u32(&mut self) -> Result<(), String> {
        self.integer::<4>()
    }

    pub fn i32(&mut self) -> Result<(), String> {
        self.integer::<4>()
    }

    pub fn f64(&mut self) -> Result<(), String> {
        self.fixed::<8>().map(drop)
    }

    /// Enumeration carried as a `uint8`. bincode writes the variant index as
    /// a variable length integer.
    pub fn code(&mut self) -> Result<(), String> {
        self.integer::<1>()
    }

    pub fn bool(&mut self) -> Result<(), String> {
        match self.fixed::<1>()? {
            [0 | 1] => Ok(()),
            [other] => Err(format!("invalid bool {other} at offset {}", self.pos - 1)),
        }
    }

    pub fn string(&mut self) -> Result<(), String> {
        let len = self.length()?;
        let bytes = self.take(len)?;
        if self.format == WireFormat::Cdr {
            match bytes.split_last() {
                Some((&0, _)) => {}
                Some((&last, _)) => {
                    return Err(format!("string terminator is {last:#04x}, not NUL"));
                }
                None => return Err("empty string without its NUL terminator".to_string()),
            }
        }
        Ok(())
    }

    pub fn sequence<F>(&mut self, element: F) -> Result<(), String>
    where
        F: Fn(&mut Self) -> Result<(), String>,
    {
        let count = self.length()?;
        for _ in 0..count {
            element(self)?;
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<(), String> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(format!("{n} trailing bytes after the message")),
        }
    }

    fn remaining(&self) -> usize {
        self.body.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        if len > self.remaining() {
            return Err(format!(
                "{len} bytes needed at offset {} but {} are left",
                self.pos,
                self.remaining()
            ));
        }
        let bytes = &self.body[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// CDR aligns primitives on their size, counted from the end of the header.
    fn align(&mut self, size: usize) -> Result<(), String> {
        if self.format == WireFormat::Cdr {
            let padding = (size - self.pos % size) % size;
            self.take(padding)?;
        }
        Ok(())
    }

    fn fixed<const N: usize>(&mut self) -> Result<[u8; N], String> {
        self.align(N)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(self.take(N)?);
        Ok(raw)
    }

    fn integer<const N: usize>(&mut self) -> Result<(), String> {
        match self.format {
            WireFormat::Bincode => self.varint().map(drop),
            WireFormat::Cdr | WireFormat::Ros1 => self.fixed::<N>().map(drop),
        }
    }

    /// Element or byte count. Every element takes at least one byte, so a
    /// count above the bytes left cannot be honest.
    fn length(&mut self) -> Result<usize, String> {
        let len = match self.format {
            WireFormat::Bincode => self.varint()?,
            WireFormat::Cdr | WireFormat::Ros1 => {
                let raw = self.fixed::<4>()?;
                u64::from(match self.byte_order {
                    ByteOrder::Little => u32::from_le_bytes(raw),
                    ByteOrder::Big => u32::from_be_bytes(raw),
                })
            }
        };
        if len > self.remaining() as u64 {
            return Err(format!(
                "length prefix {len} at offset {} exceeds the {} bytes left",
                self.pos,
                self.remaining()
            ));
        }
        Ok(len as usize)
    }

    // bincode varint: one byte below 251, otherwise a tag and a fixed width integer
    fn varint(&mut self) -> Result<u64, String> {
        let [tag] = self.fixed::<1>()?;
        Ok(match (tag, self.byte_order) {
            (0..=250, _) => u64::from(tag),
            (251, ByteOrder::Little) => u64::from(u16::from_le_bytes(self.fixed()?)),
            (251, ByteOrder::Big) => u64::from(u16::from_be_bytes(self.fixed()?)),
            (252, ByteOrder::Little) => u64::from(u32::from_le_bytes(self.fixed()?)),
            (252, ByteOrder::Big) => u64::from(u32::from_be_bytes(self.fixed()?)),
            (253, ByteOrder::Little) => u64::from_le_bytes(self.fixed()?),
            (253, ByteOrder::Big) => u64::from_be_bytes(self.fixed()?),
            (other, _) => return Err(format!("unsupported integer tag {other}")),
        })
    }
}

fn split_prefix<'a>(bytes: &'a [u8], what: &str) -> Result<([u8; 4], &'a [u8]), String> {
    bytes
        .split_first_chunk::<4>()
        .map(|(prefix, body)| (*prefix, body))
        .ok_or_else(|| format!("input too short for the {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdr_alignment_counts_from_the_header() {
        // u8, 3 bytes of padding, then a u32
        let bytes = [0, 1, 0, 0, 7, 0xAA, 0xAA, 0xAA, 1, 0, 0, 0];
        let mut scanner = Scanner::new(WireFormat::Cdr, ByteOrder::Little, &bytes).unwrap();
        scanner.code().unwrap();
        scanner.u32().unwrap();
        scanner.finish().unwrap();
    }

    #[test]
    fn test_cdr_header_is_required() {
        assert!(Scanner::new(WireFormat::Cdr, ByteOrder::Little, &[0, 1]).is_err());
        assert!(Scanner::new(WireFormat::Cdr, ByteOrder::Little, &[9, 9, 0, 0]).is_err());
    }

    #[test]
    fn test_cdr_length_follows_header_byte_order() {
        // big endian string of 2 bytes, "a\0"
        let bytes = [0, 0, 0, 0, 0, 0, 0, 2, b'a', 0];
        let mut scanner = Scanner::new(WireFormat::Cdr, ByteOrder::Little, &bytes).unwrap();
        scanner.string().unwrap();
        scanner.finish().unwrap();
    }

    #[test]
    fn test_ros1_length_prefix_must_match() {
        assert!(Scanner::new(WireFormat::Ros1, ByteOrder::Little, &[2, 0, 0, 0, 1]).is_err());
        let scanner = Scanner::new(WireFormat::Ros1, ByteOrder::Little, &[1, 0, 0, 0, 1]).unwrap();
        assert!(scanner.finish().is_err());
    }

    #[test]
    fn test_bincode_varint_lengths() {
        // 251 tag, u16 length of 300, then only 2 bytes
        let bytes = [251, 0x2C, 0x01, b'a', b'b'];
        let mut scanner = Scanner::new(WireFormat::Bincode, ByteOrder::Little, &bytes).unwrap();
        assert!(scanner.string().is_err());

        let bytes = [2, b'a', b'b'];
        let mut scanner = Scanner::new(WireFormat::Bincode, ByteOrder::Little, &bytes).unwrap();
        scanner.string().unwrap();
        scanner.finish().unwrap();
    }

    #[test]
    fn test_bool_values() {
        let mut scanner = Scanner::new(WireFormat::Bincode, ByteOrder::Little, &[1, 2]).unwrap();
        scanner.bool().unwrap();
        assert!(scanner.bool().is_err());
    }
}
