//! Canonical numeric encodings shared by the EVM and Starknet sides.
//!
//! A 256-bit EVM word does not fit in a Starknet felt (< 2^251 + 17 * 2^192 + 1), so values
//! crossing ledgers are split into two 128-bit halves (`SplitUint256`) or four 64-bit words.
//! Hex inputs are accepted with or without a `0x` prefix and normalize identically.

use alloy_primitives::U256;
use starknet_types_core::felt::Felt;

use crate::errors::EncodingError;

/// The Starknet field prime `2^251 + 17 * 2^192 + 1`.
pub const FIELD_PRIME: U256 = U256::from_limbs([1, 0, 0, 0x0800_0000_0000_0011]);

/// Maximum number of hex digits in a 32-byte word.
pub const WORD_HEX_DIGITS: usize = 64;

/// Longest string that fits in a single felt.
pub const SHORT_STRING_MAX_LEN: usize = 31;

fn strip_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Validate a hex string and return its digits (lowercase, prefix removed).
fn hex_digits(s: &str) -> Result<String, EncodingError> {
    let digits = strip_prefix(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EncodingError::InvalidHex(s.to_string()));
    }
    Ok(digits.to_ascii_lowercase())
}

/// Normalize a hex string: lowercase, `0x` prefix, no leading zeros (`0x0` for zero).
pub fn normalize_hex(s: &str) -> Result<String, EncodingError> {
    let digits = hex_digits(s)?;
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        Ok("0x0".to_string())
    } else {
        Ok(format!("0x{trimmed}"))
    }
}

/// Parse a hex string into a 256-bit integer.
pub fn u256_from_hex(s: &str) -> Result<U256, EncodingError> {
    let digits = hex_digits(s)?;
    let trimmed = digits.trim_start_matches('0');
    if trimmed.len() > WORD_HEX_DIGITS {
        return Err(EncodingError::Range(format!("{s} exceeds 256 bits")));
    }
    if trimmed.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(trimmed, 16)
        .map_err(|_| EncodingError::Range(format!("{s} exceeds 256 bits")))
}

/// Parse a decimal or `0x`-hex string into a 256-bit integer.
///
/// Negative values and values `>= 2^256` fail with [`EncodingError::Range`].
pub fn parse_u256(s: &str) -> Result<U256, EncodingError> {
    let t = s.trim();
    if t.starts_with('-') {
        return Err(EncodingError::Range(format!("{s} is negative")));
    }
    if t.starts_with("0x") || t.starts_with("0X") {
        return u256_from_hex(t);
    }
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidInteger(s.to_string()));
    }
    U256::from_str_radix(t, 10)
        .map_err(|_| EncodingError::Range(format!("{s} exceeds 256 bits")))
}

pub fn u256_to_hex(value: U256) -> String {
    format!("{value:#x}")
}

/// Left-pad a hex value to a 32-byte word (`0x` + 64 digits).
pub fn hex_pad_left(s: &str) -> Result<String, EncodingError> {
    let digits = hex_digits(s)?;
    if digits.len() > WORD_HEX_DIGITS {
        return Err(EncodingError::Range(format!("{s} is longer than 32 bytes")));
    }
    Ok(format!("0x{digits:0>64}"))
}

/// Right-pad a hex byte string to 32 bytes.
pub fn hex_pad_right(s: &str) -> Result<String, EncodingError> {
    let digits = hex_digits(s)?;
    if digits.len() > WORD_HEX_DIGITS {
        return Err(EncodingError::Range(format!("{s} is longer than 32 bytes")));
    }
    Ok(format!("0x{digits:0<64}"))
}

/// A 256-bit integer as two 128-bit halves, the layout Cairo uses for `u256`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SplitUint256 {
    pub low: u128,
    pub high: u128,
}

impl SplitUint256 {
    pub fn new(low: u128, high: u128) -> Self {
        Self { low, high }
    }

    pub fn from_uint(value: U256) -> Self {
        let low = (value & U256::from(u128::MAX)).to::<u128>();
        let high = (value >> 128usize).to::<u128>();
        Self { low, high }
    }

    pub fn to_uint(&self) -> U256 {
        (U256::from(self.high) << 128) | U256::from(self.low)
    }

    pub fn from_hex(s: &str) -> Result<Self, EncodingError> {
        Ok(Self::from_uint(u256_from_hex(s)?))
    }

    /// Normalized hex of the recombined value.
    pub fn to_hex(&self) -> String {
        u256_to_hex(self.to_uint())
    }

    pub fn low_hex(&self) -> String {
        format!("{:#x}", self.low)
    }

    pub fn high_hex(&self) -> String {
        format!("{:#x}", self.high)
    }

    /// `[low, high]`, the Cairo serialization order.
    pub fn to_felts(&self) -> [Felt; 2] {
        [Felt::from(self.low), Felt::from(self.high)]
    }

    /// Rebuild from felts, each of which must fit in 128 bits.
    pub fn from_felts(low: &Felt, high: &Felt) -> Result<Self, EncodingError> {
        let half = |f: &Felt, name: &str| -> Result<u128, EncodingError> {
            let v = felt_to_u256(f);
            if v > U256::from(u128::MAX) {
                return Err(EncodingError::Range(format!(
                    "{name} half {} exceeds 128 bits",
                    felt_to_hex(f)
                )));
            }
            Ok(v.to::<u128>())
        };
        Ok(Self {
            low: half(low, "low")?,
            high: half(high, "high")?,
        })
    }
}

impl From<U256> for SplitUint256 {
    fn from(value: U256) -> Self {
        Self::from_uint(value)
    }
}

impl From<SplitUint256> for U256 {
    fn from(value: SplitUint256) -> Self {
        value.to_uint()
    }
}

/// Split into four 64-bit words, most significant first.
pub fn u256_to_u64_words(value: U256) -> [u64; 4] {
    let limbs = value.as_limbs();
    [limbs[3], limbs[2], limbs[1], limbs[0]]
}

/// Inverse of [`u256_to_u64_words`].
pub fn u64_words_to_u256(words: [u64; 4]) -> U256 {
    U256::from_limbs([words[3], words[2], words[1], words[0]])
}

pub fn felt_to_u256(felt: &Felt) -> U256 {
    U256::from_be_bytes(felt.to_bytes_be())
}

/// Convert to a felt, rejecting values at or above the field prime.
pub fn u256_to_felt(value: U256) -> Result<Felt, EncodingError> {
    if value >= FIELD_PRIME {
        return Err(EncodingError::Range(format!("{value:#x} is not below the field prime")));
    }
    Ok(Felt::from_bytes_be(&value.to_be_bytes::<32>()))
}

/// Parse a decimal or hex string into a felt.
pub fn parse_felt(s: &str) -> Result<Felt, EncodingError> {
    u256_to_felt(parse_u256(s)?)
}

/// Parse a hex string (prefix optional) into a felt.
pub fn felt_from_hex(s: &str) -> Result<Felt, EncodingError> {
    u256_to_felt(u256_from_hex(s)?)
}

pub fn felt_to_hex(felt: &Felt) -> String {
    u256_to_hex(felt_to_u256(felt))
}

/// Encode an ASCII string of at most 31 bytes as a felt (big-endian bytes).
pub fn short_string_to_felt(s: &str) -> Result<Felt, EncodingError> {
    if !s.is_ascii() || s.len() > SHORT_STRING_MAX_LEN {
        return Err(EncodingError::InvalidShortString(s.to_string()));
    }
    let mut buf = [0u8; 32];
    buf[32 - s.len()..].copy_from_slice(s.as_bytes());
    Ok(Felt::from_bytes_be(&buf))
}

/// Split an arbitrary UTF-8 string into 31-byte big-endian felt chunks.
///
/// The empty string encodes as an empty array.
pub fn long_string_to_felts(s: &str) -> Vec<Felt> {
    s.as_bytes()
        .chunks(SHORT_STRING_MAX_LEN)
        .map(|chunk| {
            let mut buf = [0u8; 32];
            buf[32 - chunk.len()..].copy_from_slice(chunk);
            Felt::from_bytes_be(&buf)
        })
        .collect()
}

/// Components of a 65-byte `r || s || v` EVM signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rsv {
    pub r: U256,
    pub s: U256,
    pub v: u8,
}

impl Rsv {
    pub fn from_signature(sig: &[u8]) -> Result<Self, EncodingError> {
        if sig.len() != 65 {
            return Err(EncodingError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                sig.len()
            )));
        }
        Ok(Self {
            r: U256::from_be_slice(&sig[0..32]),
            s: U256::from_be_slice(&sig[32..64]),
            v: sig[64],
        })
    }

    pub fn from_hex(sig: &str) -> Result<Self, EncodingError> {
        let digits = hex_digits(sig)?;
        let bytes = hex::decode(&digits).map_err(|_| EncodingError::InvalidHex(sig.to_string()))?;
        Self::from_signature(&bytes)
    }

    /// `v` as a recovery parity bit; accepts {0, 1} and {27, 28}.
    pub fn y_parity(&self) -> Result<u8, EncodingError> {
        match self.v {
            0 | 1 => Ok(self.v),
            27 | 28 => Ok(self.v - 27),
            other => Err(EncodingError::InvalidSignature(format!(
                "unsupported v value {other}"
            ))),
        }
    }

    /// `r || s` as 64 bytes.
    pub fn rs_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..].copy_from_slice(&self.s.to_be_bytes::<32>());
        out
    }

    /// `r` and `s` as padded 32-byte hex words.
    pub fn r_hex(&self) -> String {
        format!("0x{}", hex::encode(self.r.to_be_bytes::<32>()))
    }

    pub fn s_hex(&self) -> String {
        format!("0x{}", hex::encode(self.s.to_be_bytes::<32>()))
    }

    /// `[r.low, r.high, s.low, s.high, v]` as felts, the layout Starknet verifiers take.
    pub fn to_felts(&self) -> [Felt; 5] {
        let r = SplitUint256::from_uint(self.r).to_felts();
        let s = SplitUint256::from_uint(self.s).to_felts();
        [r[0], r[1], s[0], s[1], Felt::from(self.v)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_round_trip_edges() {
        let edges = [
            U256::ZERO,
            U256::from(1u64),
            U256::from(u128::MAX),
            U256::from(u128::MAX) + U256::from(1u64),
            U256::MAX,
        ];
        for value in edges {
            let split = SplitUint256::from_uint(value);
            assert_eq!(split.to_uint(), value);
            assert_eq!(SplitUint256::from_hex(&split.to_hex()).unwrap(), split);
        }
        let max = SplitUint256::from_uint(U256::MAX);
        assert_eq!(max.low, u128::MAX);
        assert_eq!(max.high, u128::MAX);
    }

    #[test]
    fn test_split_halves() {
        let split = SplitUint256::from_hex(
            "0x00000000000000000000000000000002000000000000000000000000000000ff",
        )
        .unwrap();
        assert_eq!(split.low, 0xff);
        assert_eq!(split.high, 2);
        assert_eq!(split.low_hex(), "0xff");
        assert_eq!(split.high_hex(), "0x2");
    }

    #[test]
    fn test_prefix_optional() {
        assert_eq!(u256_from_hex("0xABC").unwrap(), u256_from_hex("abc").unwrap());
        assert_eq!(normalize_hex("0X000abc").unwrap(), "0xabc");
        assert_eq!(normalize_hex("000").unwrap(), "0x0");
        assert_eq!(
            SplitUint256::from_hex("ff").unwrap(),
            SplitUint256::from_hex("0xff").unwrap()
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let too_big = format!("0x1{}", "0".repeat(64));
        assert!(matches!(u256_from_hex(&too_big), Err(EncodingError::Range(_))));
        assert!(matches!(parse_u256("-1"), Err(EncodingError::Range(_))));
        let two_pow_256 =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(parse_u256(two_pow_256), Err(EncodingError::Range(_))));
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(parse_u256(max).unwrap(), U256::MAX);
        assert!(matches!(parse_u256("12a"), Err(EncodingError::InvalidInteger(_))));
        assert!(matches!(u256_from_hex("0xzz"), Err(EncodingError::InvalidHex(_))));
    }

    #[test]
    fn test_leading_zeros_within_range() {
        let padded = format!("0x{}{}", "0".repeat(10), "f".repeat(64));
        assert_eq!(u256_from_hex(&padded).unwrap(), U256::MAX);
    }

    #[test]
    fn test_u64_words() {
        let value = u256_from_hex(
            "0x0000000000000001000000000000000200000000000000030000000000000004",
        )
        .unwrap();
        assert_eq!(u256_to_u64_words(value), [1, 2, 3, 4]);
        assert_eq!(u64_words_to_u256([1, 2, 3, 4]), value);
        assert_eq!(u64_words_to_u256(u256_to_u64_words(U256::MAX)), U256::MAX);
    }

    #[test]
    fn test_padding() {
        assert_eq!(hex_pad_left("0x1").unwrap(), format!("0x{}1", "0".repeat(63)));
        assert_eq!(hex_pad_right("0x1").unwrap(), format!("0x1{}", "0".repeat(63)));
        assert!(hex_pad_left(&format!("0x{}", "1".repeat(65))).is_err());
    }

    #[test]
    fn test_felt_bridge() {
        assert!(u256_to_felt(FIELD_PRIME).is_err());
        let max_felt = u256_to_felt(FIELD_PRIME - U256::from(1u64)).unwrap();
        assert_eq!(felt_to_u256(&max_felt), FIELD_PRIME - U256::from(1u64));
        assert_eq!(parse_felt("255").unwrap(), Felt::from(255u64));
        assert_eq!(felt_to_hex(&Felt::from(255u64)), "0xff");
    }

    #[test]
    fn test_short_strings() {
        // "SN_MAIN"
        assert_eq!(
            short_string_to_felt("SN_MAIN").unwrap(),
            felt_from_hex("0x534e5f4d41494e").unwrap()
        );
        assert!(short_string_to_felt(&"a".repeat(32)).is_err());
        let chunks = long_string_to_felts(&"a".repeat(40));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], short_string_to_felt(&"a".repeat(9)).unwrap());
        assert!(long_string_to_felts("").is_empty());
    }

    #[test]
    fn test_rsv_split() {
        let mut sig = vec![0u8; 65];
        sig[31] = 1;
        sig[63] = 2;
        sig[64] = 28;
        let rsv = Rsv::from_signature(&sig).unwrap();
        assert_eq!(rsv.r, U256::from(1u64));
        assert_eq!(rsv.s, U256::from(2u64));
        assert_eq!(rsv.v, 28);
        assert_eq!(rsv.to_felts()[4], Felt::from(28u64));
        assert_eq!(rsv.y_parity().unwrap(), 1);
        assert_eq!(rsv.rs_bytes()[..], sig[..64]);
        assert!(Rsv::from_signature(&sig[..64]).is_err());

        sig[64] = 5;
        assert!(Rsv::from_signature(&sig).unwrap().y_parity().is_err());
    }
}
