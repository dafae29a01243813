//! Conversions between host strings and the engine's 16-bit code units.
//!
//! Code units are moved as-is: nothing is normalised and nothing goes through an
//! 8-bit form. Hosts that already hold UTF-16 (the JVM) should skip these helpers
//! and pass their units straight to the translator.

use api::CodeUnit;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("Unpaired surrogate 0x{unit:04X} at offset {offset}")]
    UnpairedSurrogate { unit: CodeUnit, offset: usize },
}

/// Encode host text as code units. Absent text yields an empty sequence.
pub fn to_wide(text: Option<&str>) -> Vec<CodeUnit> {
    match text {
        Some(text) => text.encode_utf16().collect(),
        None => Vec::new(),
    }
}

/// Decode the first `length` units of `units`.
///
/// `length` is clamped to the buffer so an over-reported engine length cannot read
/// past what was allocated.
pub fn from_wide(units: &[CodeUnit], length: usize) -> Result<String, EncodingError> {
    let units = &units[..length.min(units.len())];
    let mut out = String::with_capacity(units.len());
    let mut offset = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                out.push(c);
                offset += c.len_utf16();
            }
            Err(e) => {
                return Err(EncodingError::UnpairedSurrogate {
                    unit: e.unpaired_surrogate(),
                    offset,
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_both_give_no_units() {
        assert!(to_wide(None).is_empty());
        assert!(to_wide(Some("")).is_empty());
    }

    #[test]
    fn astral_characters_keep_their_surrogate_pair() {
        let units = to_wide(Some("a\u{1F600}"));
        assert_eq!(units, vec![0x0061, 0xD83D, 0xDE00]);
        assert_eq!(from_wide(&units, units.len()).unwrap(), "a\u{1F600}");
    }

    #[test]
    fn braille_cells_are_not_normalised() {
        let text = "\u{2813}\u{2811}\u{2807}\u{2807}\u{2815}";
        let units = to_wide(Some(text));
        assert_eq!(units.len(), 5);
        assert_eq!(units[0], 0x2813);
        assert_eq!(from_wide(&units, 5).unwrap(), text);
    }

    #[test]
    fn length_is_clamped_to_buffer() {
        let units = to_wide(Some("abc"));
        assert_eq!(from_wide(&units, 2).unwrap(), "ab");
        assert_eq!(from_wide(&units, 99).unwrap(), "abc");
        assert_eq!(from_wide(&units, 0).unwrap(), "");
    }

    #[test]
    fn lone_surrogate_is_an_error() {
        let err = from_wide(&[0x0061, 0xD800, 0x0062], 3).unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnpairedSurrogate {
                unit: 0xD800,
                offset: 1
            }
        );
    }
}
