use tracing::debug;

use crate::error::{PairsError, Result};
use crate::program::Program;

/// Bytes per token: eight character pairs, one per bit.
pub const TOKEN_LEN: usize = 16;

fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n')
}

/// Decode one 16-byte token into a byte.
///
/// Pair `i` (bytes `2i` and `2i+1`) sets bit `i` when both bytes are equal.
/// Which bytes are used does not matter, only whether they match.
/// Returns `None` unless the token is exactly 16 bytes.
pub fn decode_token(token: &[u8]) -> Option<u8> {
    if token.len() != TOKEN_LEN {
        return None;
    }
    let byte = token
        .chunks_exact(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] == pair[1])
        .fold(0u8, |acc, (bit, _)| acc | (1u8 << bit));
    Some(byte)
}

/// Split source text on spaces and newlines and decode every token.
///
/// Any malformed token fails the whole source, so nothing runs unless the
/// entire program decoded.
pub fn tokenize(source: &[u8]) -> Result<Program> {
    let mut program = Program::new();
    for (index, token) in source
        .split(|&b| is_delimiter(b))
        .filter(|t| !t.is_empty())
        .enumerate()
    {
        let byte = decode_token(token).ok_or(PairsError::Format {
            index,
            len: token.len(),
        })?;
        program.try_push(byte)?;
    }
    debug!(tokens = program.len(), "tokenized source");
    Ok(program)
}

/// Encode a byte as a token: `11` for a set bit, `10` for a clear one.
pub fn encode_byte(byte: u8) -> [u8; TOKEN_LEN] {
    let mut token = [0u8; TOKEN_LEN];
    for bit in 0..8 {
        token[2 * bit] = b'1';
        token[2 * bit + 1] = if byte & (1u8 << bit) != 0 { b'1' } else { b'0' };
    }
    token
}

/// Encode a sequence of bytes as space-separated source text.
pub fn encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| String::from_utf8_lossy(&encode_byte(b)).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_pairs_are_ones() {
        assert_eq!(decode_token(b"gg99$$aaZZ..xx!!").unwrap(), 0xFF);
    }

    #[test]
    fn test_unequal_pairs_are_zeros() {
        assert_eq!(decode_token(b"gz91abAbxyz0-+()").unwrap(), 0);
    }

    #[test]
    fn test_least_significant_bit_first() {
        // Only the first pair matches.
        assert_eq!(decode_token(b"ggababababababab").unwrap(), 1);
        // Only the last pair matches.
        assert_eq!(decode_token(b"ab12ab12ab12abqq").unwrap(), 0x80);
        // 5 = bits 0 and 2.
        assert_eq!(decode_token(b"aaxyaaxyxyxyxyxy").unwrap(), 5);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(decode_token(b"aAaAaAaAaAaAaAaA").unwrap(), 0);
    }

    #[test]
    fn test_tokenize_preserves_order() {
        let source = "aaxyaaxyxyxyxyxy xyxyxyxyxyxyxyxy aaxyxyxyxyxyxyxy";
        let program = tokenize(source.as_bytes()).unwrap();
        assert_eq!(program.as_bytes(), &[5, 0, 1]);
    }

    #[test]
    fn test_tokenize_accepts_newlines_and_runs_of_spaces() {
        let source = "aaxyaaxyxyxyxyxy  xyxyxyxyxyxyxyxy\naaxyxyxyxyxyxyxy\n";
        let program = tokenize(source.as_bytes()).unwrap();
        assert_eq!(program.as_bytes(), &[5, 0, 1]);
    }

    #[test]
    fn test_carriage_return_is_token_data() {
        let program = tokenize(b"a\rbbccddeeffgghh").unwrap();
        assert_eq!(program.as_bytes(), &[0xFE]);
        assert_eq!(decode_token(b"\r\rbbccddeeffggh\r").unwrap(), 0x7F);
    }

    #[test]
    fn test_crlf_line_endings_are_rejected() {
        // The carriage return stays attached to the token before the newline.
        match tokenize(b"aaxyaaxyxyxyxyxy\r\naaxyaaxyxyxyxyxy") {
            Err(PairsError::Format { index, len }) => {
                assert_eq!(index, 0);
                assert_eq!(len, 17);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_token_rejects_wrong_length() {
        assert_eq!(decode_token(b"aaxyaaxyxyxyxyx"), None);
        assert_eq!(decode_token(b"aaxyaaxyxyxyxyxyx"), None);
        assert_eq!(decode_token(b""), None);
    }

    #[test]
    fn test_format_error_reports_token_position() {
        let source = "aaxyaaxyxyxyxyxy xyxyxyxyxyxyxyxy\naaxy";
        match tokenize(source.as_bytes()) {
            Err(PairsError::Format { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 4);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_tokenize_empty_source() {
        let program = tokenize(b"").unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn test_short_token_is_format_error() {
        let source = "aaxyaaxyxyxyxyxy aaxyaaxyxyxyxyx";
        match tokenize(source.as_bytes()) {
            Err(PairsError::Format { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 15);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_long_token_is_format_error() {
        let source = "aaxyaaxyxyxyxyxyx";
        match tokenize(source.as_bytes()) {
            Err(PairsError::Format { index, len }) => {
                assert_eq!(index, 0);
                assert_eq!(len, 17);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_ascii_bytes_allowed() {
        let mut token = [0xE9u8; TOKEN_LEN];
        token[1] = 0x00;
        assert_eq!(decode_token(&token).unwrap(), 0xFE);
    }

    #[test]
    fn test_encode_round_trips_every_byte() {
        for byte in 0..=255u8 {
            assert_eq!(decode_token(&encode_byte(byte)).unwrap(), byte);
        }
    }

    #[test]
    fn test_encode_produces_valid_source() {
        let source = encode(&[1, 5, 0, 20, 0, 0]);
        assert_eq!(source.split(' ').count(), 6);
        assert!(source.split(' ').all(|t| t.len() == TOKEN_LEN));
        let program = tokenize(source.as_bytes()).unwrap();
        assert_eq!(program.as_bytes(), &[1, 5, 0, 20, 0, 0]);
    }
}
