use crate::base62::{Base62Error, Base62Int};

/// Digits, then lowercase, then uppercase. Part of the wire format: tokens
/// minted with one order cannot be decoded with another.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NO_VALUE: u8 = 255;

/// Lookup table for Base62 decoding. Case-sensitive; no aliases.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 62 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Encodes `n` into `buf` and returns the encoded slice.
///
/// The digits are written right-aligned, least significant first, so the
/// returned `&str` is a suffix of `buf`. `0` encodes as `"0"`.
///
/// ```
/// use snowlink::{Base62Int, encode_to_buf};
///
/// let mut buf = <u64 as Base62Int>::Buf::default();
/// assert_eq!(encode_to_buf(3_843_u64, &mut buf), "ZZ");
/// ```
pub fn encode_to_buf<N: Base62Int>(n: N, buf: &mut N::Buf) -> &str {
    let bytes = buf.as_mut();
    let mut pos = bytes.len();
    let mut n = n;
    loop {
        let (q, r) = n.div_rem_62();
        pos -= 1;
        bytes[pos] = ALPHABET[r as usize];
        n = q;
        if n.is_zero() {
            break;
        }
    }
    // SAFETY: every byte in `bytes[pos..]` was copied from `ALPHABET`, which
    // is ASCII.
    unsafe { core::str::from_utf8_unchecked(&bytes[pos..]) }
}

/// Encodes `n` as a Base62 string.
///
/// Runs in O(log₆₂ n). Distinct integers always yield distinct strings, and
/// the output never has a leading `'0'` except for `encode(0) == "0"`.
///
/// ```
/// use snowlink::encode;
///
/// assert_eq!(encode(0_u64), "0");
/// assert_eq!(encode(61_u64), "Z");
/// assert_eq!(encode(62_u64), "10");
/// assert_eq!(encode(u64::MAX), "lYGhA16ahyf");
/// ```
pub fn encode<N: Base62Int>(n: N) -> String {
    let mut buf = N::Buf::default();
    encode_to_buf(n, &mut buf).to_owned()
}

/// Decodes a Base62 string.
///
/// Accumulates left to right (`acc = acc * 62 + digit`) with checked
/// arithmetic, so values past `N::MAX` are an error rather than a wrap.
/// Leading `'0'`s are accepted and do not change the value.
///
/// # Errors
///
/// - [`Base62Error::Empty`] for `""`.
/// - [`Base62Error::InvalidCharacter`] for the first character outside the
///   alphabet, with its position.
/// - [`Base62Error::Overflow`] if the value does not fit `N`.
///
/// ```
/// use snowlink::{Base62Error, decode};
///
/// assert_eq!(decode::<u64>("10"), Ok(62));
/// assert_eq!(
///     decode::<u64>("abc!def"),
///     Err(Base62Error::InvalidCharacter { ch: '!', index: 3 })
/// );
/// ```
pub fn decode<N: Base62Int>(s: &str) -> Result<N, Base62Error> {
    if s.is_empty() {
        return Err(Base62Error::Empty);
    }
    // Overflow is only reported once every character has been checked, so a
    // long corrupt token still names its bad character.
    let mut acc = Some(N::ZERO);
    for (index, ch) in s.chars().enumerate() {
        let val = if ch.is_ascii() {
            LOOKUP[ch as usize]
        } else {
            NO_VALUE
        };
        if val == NO_VALUE {
            return Err(Base62Error::InvalidCharacter { ch, index });
        }
        acc = acc.and_then(|acc| acc.checked_shift_in(val));
    }
    acc.ok_or(Base62Error::Overflow { len: s.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    #[test]
    fn alphabet_is_62_distinct_ascii_chars() {
        let distinct: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(distinct.len(), 62);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphanumeric));
    }

    #[test]
    fn zero_encodes_to_first_character() {
        assert_eq!(encode(0_u32), "0");
        assert_eq!(encode(0_u64), "0");
        assert_eq!(encode(0_u128), "0");
    }

    #[test]
    fn known_values() {
        assert_eq!(encode(1_u64), "1");
        assert_eq!(encode(10_u64), "a");
        assert_eq!(encode(36_u64), "A");
        assert_eq!(encode(61_u64), "Z");
        assert_eq!(encode(62_u64), "10");
        assert_eq!(encode(3_844_u64), "100");
    }

    #[test]
    fn round_trips_boundary_values() {
        for n in [0_u64, 1, 61, 62, u64::from(u32::MAX), u64::MAX] {
            assert_eq!(decode::<u64>(&encode(n)), Ok(n), "n = {n}");
        }
        for n in [0_u32, 1, 61, 62, u32::MAX] {
            assert_eq!(decode::<u32>(&encode(n)), Ok(n), "n = {n}");
        }
        for n in [0_u128, 62, u128::from(u64::MAX) + 1, u128::MAX] {
            assert_eq!(decode::<u128>(&encode(n)), Ok(n), "n = {n}");
        }
    }

    #[test]
    fn max_values_fill_the_buffer() {
        assert_eq!(encode(u32::MAX).len(), <u32 as Base62Int>::MAX_LEN);
        assert_eq!(encode(u64::MAX).len(), <u64 as Base62Int>::MAX_LEN);
        assert_eq!(encode(u128::MAX).len(), <u128 as Base62Int>::MAX_LEN);
    }

    #[test]
    fn equal_length_encodings_keep_numeric_order_by_digit_value() {
        // Uppercase sorts before lowercase in ASCII, so compare digit values.
        let digits = |s: &str| -> Vec<u8> { s.bytes().map(|b| LOOKUP[b as usize]).collect() };
        for (lo, hi) in [(1_000_000_u64, 1_000_001_u64), (62, 3_843), (35, 36)] {
            let (a, b) = (encode(lo), encode(hi));
            assert_eq!(a.len(), b.len());
            assert!(digits(&a) < digits(&b), "{a} !< {b}");
        }
    }

    #[test]
    fn encode_is_injective_on_random_ids() {
        const TOTAL: usize = 100_000;
        let mut rng = rand::rng();
        let mut values = HashSet::with_capacity(TOTAL);
        while values.len() < TOTAL {
            values.insert(rng.random::<u64>() >> 1);
        }
        let encoded: HashSet<String> = values.iter().map(|&n| encode(n)).collect();
        assert_eq!(encoded.len(), TOTAL);
    }

    #[test]
    fn decode_single_zero() {
        assert_eq!(decode::<u64>("0"), Ok(0));
    }

    #[test]
    fn decode_accepts_leading_zeros() {
        assert_eq!(decode::<u64>("00010"), Ok(62));
    }

    #[test]
    fn decode_is_case_sensitive() {
        assert_eq!(decode::<u64>("a"), Ok(10));
        assert_eq!(decode::<u64>("A"), Ok(36));
    }

    #[test]
    fn decode_rejects_invalid_character() {
        assert_eq!(
            decode::<u64>("abc!def"),
            Err(Base62Error::InvalidCharacter { ch: '!', index: 3 })
        );
        assert_eq!(
            decode::<u64>("ab-c"),
            Err(Base62Error::InvalidCharacter { ch: '-', index: 2 })
        );
        assert_eq!(
            decode::<u64>(" 1"),
            Err(Base62Error::InvalidCharacter { ch: ' ', index: 0 })
        );
    }

    #[test]
    fn invalid_character_wins_over_overflow() {
        assert_eq!(
            decode::<u64>("ZZZZZZZZZZZZ!"),
            Err(Base62Error::InvalidCharacter { ch: '!', index: 12 })
        );
        assert_eq!(
            decode::<u32>("ZZZZZZZ-ZZ"),
            Err(Base62Error::InvalidCharacter { ch: '-', index: 7 })
        );
        assert_eq!(
            decode::<u64>("ZZZZZZZZZZZZ"),
            Err(Base62Error::Overflow { len: 12 })
        );
    }

    #[test]
    fn decode_reports_char_position_for_non_ascii() {
        assert_eq!(
            decode::<u64>("ab\u{e9}c"),
            Err(Base62Error::InvalidCharacter {
                ch: '\u{e9}',
                index: 2
            })
        );
    }

    #[test]
    fn decode_rejects_empty() {
        assert_eq!(decode::<u64>(""), Err(Base62Error::Empty));
    }

    #[test]
    fn decode_rejects_overflow() {
        // u64::MAX + 1
        let too_big = encode(u128::from(u64::MAX) + 1);
        assert_eq!(
            decode::<u64>(&too_big),
            Err(Base62Error::Overflow { len: too_big.len() })
        );
        assert!(matches!(
            decode::<u32>("zzzzzzzzzz"),
            Err(Base62Error::Overflow { .. })
        ));
    }

    #[test]
    fn encode_to_buf_reuses_buffer() {
        let mut buf = <u64 as Base62Int>::Buf::default();
        assert_eq!(encode_to_buf(62_u64, &mut buf), "10");
        assert_eq!(encode_to_buf(5_u64, &mut buf), "5");
    }
}
