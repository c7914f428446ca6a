// src/common/frame.rs

//! Frame encoding and response-line parsing.
//!
//! Outgoing frames are `STX + payload + ETX + BCC + CRLF`. Incoming lines use
//! fixed offsets counted from the raw line, STX at offset 0, matching the
//! device manual's addressing.

use arrayvec::ArrayString;

use super::bcc;
use super::command::Command;
use super::error::ParseError;

/// Start-of-text byte opening every frame.
pub const STX: u8 = 0x02;
/// End-of-text byte closing the frame body.
pub const ETX: u8 = 0x03;
/// Line terminator.
pub const CRLF: &str = "\r\n";

/// Longest encoded frame: STX + 8-byte payload + ETX + 3-digit BCC + CRLF.
pub const MAX_FRAME_LEN: usize = 15;

/// Fixed offsets into a received response line.
pub mod offset {
    use std::ops::Range;

    /// Status / error byte.
    pub const STATUS: usize = 6;
    /// Low-battery flag.
    pub const BATTERY: usize = 8;
    /// Sign of the first data block.
    pub const SIGN: usize = 9;
    /// The four mantissa digits of the first data block.
    pub const MANTISSA: Range<usize> = 10..14;
    /// Exponent digit of the first data block (biased by 4).
    pub const EXPONENT: usize = 14;
}

/// The exact bytes of one outgoing frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame(ArrayString<MAX_FRAME_LEN>);

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `line` contains this frame. The meter embeds the acknowledge
    /// frame somewhere in its PC-connect reply, so an exact-equality check is
    /// too strict.
    pub fn matched_by(&self, line: &[u8]) -> bool {
        let needle = self.as_bytes();
        if needle.is_empty() {
            return true;
        }
        line.windows(needle.len()).any(|w| w == needle)
    }
}

/// Encodes a command into the exact bytes sent on the wire.
///
/// Deterministic and infallible: payloads are compile-time constants of
/// protocol-correct width, and encoding the same command twice yields
/// byte-identical frames.
pub fn encode(command: Command) -> Frame {
    let payload = command.payload();
    let mut out = ArrayString::new();
    out.push(STX as char);
    out.push_str(payload);
    out.push(ETX as char);
    out.push_str(&bcc::render(bcc::fold(payload.as_bytes())));
    out.push_str(CRLF);
    Frame(out)
}

/// Sign, mantissa, and exponent characters of a data block, as received.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValueFields<'a> {
    /// `'+'` for positive; anything else reads as negative.
    pub sign: char,
    /// Four mantissa characters.
    pub mantissa: &'a [u8],
    /// Exponent digit, biased by 4.
    pub exponent: char,
}

/// A received response line.
///
/// Construction checks only that the line is non-empty and opens with STX;
/// every accessor validates the length it needs before indexing, so a
/// truncated line surfaces as [`ParseError::TooShort`] rather than an
/// out-of-bounds fault.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResponseLine<'a> {
    raw: &'a [u8],
}

impl<'a> ResponseLine<'a> {
    pub fn new(raw: &'a [u8]) -> Result<Self, ParseError> {
        match raw.first() {
            None => Err(ParseError::Empty),
            Some(&STX) => Ok(ResponseLine { raw }),
            Some(&found) => Err(ParseError::MissingStx { found }),
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    fn byte_at(&self, offset: usize) -> Result<u8, ParseError> {
        self.raw.get(offset).copied().ok_or(ParseError::TooShort {
            needed: offset + 1,
            got: self.raw.len(),
        })
    }

    /// The status byte at [`offset::STATUS`].
    pub fn status(&self) -> Result<char, ParseError> {
        Ok(self.byte_at(offset::STATUS)? as char)
    }

    /// Whether the low-battery flag at [`offset::BATTERY`] is set.
    pub fn battery_low(&self) -> Result<bool, ParseError> {
        Ok(self.byte_at(offset::BATTERY)? == b'1')
    }

    /// The named numeric fields of the first data block.
    pub fn value_fields(&self) -> Result<ValueFields<'a>, ParseError> {
        let needed = offset::EXPONENT + 1;
        if self.raw.len() < needed {
            return Err(ParseError::TooShort {
                needed,
                got: self.raw.len(),
            });
        }
        Ok(ValueFields {
            sign: self.raw[offset::SIGN] as char,
            mantissa: &self.raw[offset::MANTISSA],
            exponent: self.raw[offset::EXPONENT] as char,
        })
    }
}
