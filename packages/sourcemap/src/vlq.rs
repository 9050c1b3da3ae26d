//! Base64 VLQ Decoder
//!
//! Each base64 digit carries 5 payload bits and a continuation bit (0x20).
//! Payload groups are little-endian; the lowest bit of the assembled value is
//! the sign.

use crate::error::VlqError;
use once_cell::sync::Lazy;

const B64_DIGITS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u8 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u8 = 1 << VLQ_BASE_SHIFT;

/// Reverse lookup from ASCII byte to digit value.
static B64_VALUES: Lazy<[Option<u8>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (value, &digit) in B64_DIGITS.iter().enumerate() {
        table[digit as usize] = Some(value as u8);
    }
    table
});

fn from_base64_digit(byte: u8) -> Option<u8> {
    B64_VALUES.get(byte as usize).copied().flatten()
}

/// Cursor over a VLQ encoded byte stream.
///
/// The mapping parser drives the cursor directly: it peeks for `,` and `;`
/// separators and calls [`VlqDecoder::decode`] for everything else.
#[derive(Debug, Clone)]
pub struct VlqDecoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> VlqDecoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Byte offset of the next unread digit.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    pub fn bump(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Decode one signed value.
    pub fn decode(&mut self) -> Result<i64, VlqError> {
        let start = self.pos;
        let mut accum: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let byte = self
                .peek()
                .ok_or(VlqError::UnexpectedEof { offset: self.pos })?;
            let digit = from_base64_digit(byte).ok_or_else(|| VlqError::InvalidDigit {
                digit: self.char_at(self.pos),
                offset: self.pos,
            })?;
            self.pos += 1;

            let chunk = u64::from(digit & VLQ_BASE_MASK);
            let overflows = shift >= u64::BITS
                || (shift > u64::BITS - VLQ_BASE_SHIFT && chunk >> (u64::BITS - shift) != 0);
            if overflows {
                return Err(VlqError::Overflow { offset: start });
            }
            accum |= chunk << shift;
            shift += VLQ_BASE_SHIFT;

            if digit & VLQ_CONTINUATION_BIT == 0 {
                break;
            }
        }

        let magnitude = (accum >> 1) as i64;
        Ok(if accum & 1 == 1 { -magnitude } else { magnitude })
    }

    // Multi-byte UTF-8 sequences are reported by their full character.
    fn char_at(&self, offset: usize) -> char {
        let rest = &self.input[offset..];
        let len = rest.len().min(4);
        (1..=len)
            .find_map(|n| std::str::from_utf8(&rest[..n]).ok())
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// Decode the first VLQ value of `input`.
pub fn decode_vlq(input: &str) -> Result<i64, VlqError> {
    VlqDecoder::new(input).decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_zero() {
        assert_eq!(decode_vlq("A"), Ok(0));
    }

    #[test]
    fn should_decode_small_values() {
        assert_eq!(decode_vlq("C"), Ok(1));
        assert_eq!(decode_vlq("D"), Ok(-1));
        assert_eq!(decode_vlq("E"), Ok(2));
        assert_eq!(decode_vlq("f"), Ok(-15));
    }

    #[test]
    fn should_decode_negative_zero_as_zero() {
        assert_eq!(decode_vlq("B"), Ok(0));
    }

    #[test]
    fn should_decode_multi_digit_values() {
        // 16 -> 32 -> [0 | cont, 1]
        assert_eq!(decode_vlq("gB"), Ok(16));
        assert_eq!(decode_vlq("hB"), Ok(-16));
        assert_eq!(decode_vlq("2H"), Ok(123));
    }

    #[test]
    fn should_consume_exactly_one_value() {
        let mut decoder = VlqDecoder::new("gBC");
        assert_eq!(decoder.decode(), Ok(16));
        assert_eq!(decoder.position(), 2);
        assert_eq!(decoder.decode(), Ok(1));
        assert!(decoder.is_at_end());
    }

    #[test]
    fn should_fail_on_unterminated_sequence() {
        assert_eq!(decode_vlq("g"), Err(VlqError::UnexpectedEof { offset: 1 }));
        assert_eq!(decode_vlq(""), Err(VlqError::UnexpectedEof { offset: 0 }));
    }

    #[test]
    fn should_fail_on_invalid_digit() {
        assert_eq!(
            decode_vlq("!"),
            Err(VlqError::InvalidDigit {
                digit: '!',
                offset: 0
            })
        );
        assert_eq!(
            decode_vlq("gé"),
            Err(VlqError::InvalidDigit {
                digit: 'é',
                offset: 1
            })
        );
    }

    #[test]
    fn should_fail_on_overflow() {
        let digits = "g".repeat(13) + "B";
        assert_eq!(decode_vlq(&digits), Err(VlqError::Overflow { offset: 0 }));
    }
}
