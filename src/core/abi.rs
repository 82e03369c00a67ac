use sha3::{Digest, Keccak256};
use std::fmt;

/// Minimal Solidity ABI helpers for the handful of contract methods this
/// app touches. Selectors are derived from the canonical signature at first
/// use instead of being hardcoded.

#[derive(Debug, Clone, PartialEq)]
pub enum AbiError {
    InvalidHex(String),
    ShortData(usize),
    Overflow,
    InvalidUtf8,
}

impl fmt::Display for AbiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiError::InvalidHex(msg) => write!(f, "Invalid hex data: {}", msg),
            AbiError::ShortData(len) => write!(f, "Return data too short: {} bytes", len),
            AbiError::Overflow => write!(f, "Value does not fit in u64"),
            AbiError::InvalidUtf8 => write!(f, "String return data is not valid UTF-8"),
        }
    }
}

/// 4-byte function selector for a canonical signature like `"mint()"`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Calldata for a zero-argument call, `0x`-prefixed hex.
pub fn encode_call(signature: &str) -> String {
    format!("0x{}", hex::encode(selector(signature)))
}

/// Calldata for a single-address call. The address may carry a `0x` prefix.
pub fn encode_call_address(signature: &str, address: &str) -> Result<String, AbiError> {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    let addr_bytes = hex::decode(stripped).map_err(|e| AbiError::InvalidHex(e.to_string()))?;
    if addr_bytes.len() != 20 {
        return Err(AbiError::InvalidHex(format!(
            "address must be 20 bytes, got {}",
            addr_bytes.len()
        )));
    }

    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(&addr_bytes);
    Ok(format!("0x{}", hex::encode(data)))
}

/// Calldata for a single-uint256 call.
pub fn encode_call_u64(signature: &str, value: u64) -> String {
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&[0u8; 24]);
    data.extend_from_slice(&value.to_be_bytes());
    format!("0x{}", hex::encode(data))
}

fn decode_words(data: &str) -> Result<Vec<u8>, AbiError> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

/// Decode a single bool return value (one 32-byte word).
pub fn decode_bool(data: &str) -> Result<bool, AbiError> {
    let bytes = decode_words(data)?;
    if bytes.len() < 32 {
        return Err(AbiError::ShortData(bytes.len()));
    }
    Ok(bytes[31] != 0)
}

/// Decode a single uint256 return value into u64. Values beyond u64 are an
/// error rather than a silent truncation.
pub fn decode_u64(data: &str) -> Result<u64, AbiError> {
    let bytes = decode_words(data)?;
    if bytes.len() < 32 {
        return Err(AbiError::ShortData(bytes.len()));
    }
    if bytes[..24].iter().any(|&b| b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[24..32]);
    Ok(u64::from_be_bytes(word))
}

/// Decode a single dynamic string return value (offset word, length word,
/// then the UTF-8 bytes).
pub fn decode_string(data: &str) -> Result<String, AbiError> {
    let bytes = decode_words(data)?;
    if bytes.len() < 64 {
        return Err(AbiError::ShortData(bytes.len()));
    }

    let offset = read_usize_word(&bytes, 0)?;
    let len = read_usize_word(&bytes, offset)?;
    let start = offset + 32;
    if bytes.len() < start + len {
        return Err(AbiError::ShortData(bytes.len()));
    }

    String::from_utf8(bytes[start..start + len].to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

fn read_usize_word(bytes: &[u8], at: usize) -> Result<usize, AbiError> {
    if bytes.len() < at + 32 {
        return Err(AbiError::ShortData(bytes.len()));
    }
    if bytes[at..at + 24].iter().any(|&b| b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[at + 24..at + 32]);
    let value = u64::from_be_bytes(word);
    usize::try_from(value).map_err(|_| AbiError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_known_values() {
        // well-known ERC-721 / Pausable selectors
        assert_eq!(hex::encode(selector("totalSupply()")), "18160ddd");
        assert_eq!(hex::encode(selector("paused()")), "5c975abb");
        assert_eq!(hex::encode(selector("tokenURI(uint256)")), "c87b56dd");
        assert_eq!(hex::encode(selector("mint()")), "1249c58b");
    }

    #[test]
    fn encode_zero_arg_call() {
        assert_eq!(encode_call("totalSupply()"), "0x18160ddd");
    }

    #[test]
    fn encode_address_call_pads_left() {
        let calldata =
            encode_call_address("balanceOf(address)", "0x1111111111111111111111111111111111111111")
                .unwrap();
        assert_eq!(
            calldata,
            "0x70a082310000000000000000000000001111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn encode_address_rejects_bad_input() {
        assert!(encode_call_address("balanceOf(address)", "0x1234").is_err());
        assert!(encode_call_address("balanceOf(address)", "not hex").is_err());
    }

    #[test]
    fn encode_u64_call_pads_left() {
        let calldata = encode_call_u64("tokenURI(uint256)", 1);
        assert_eq!(
            calldata,
            "0xc87b56dd0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn decode_bool_reads_last_byte() {
        let truthy = format!("0x{}{}", "00".repeat(31), "01");
        let falsy = format!("0x{}", "00".repeat(32));
        assert_eq!(decode_bool(&truthy), Ok(true));
        assert_eq!(decode_bool(&falsy), Ok(false));
        assert!(decode_bool("0x00").is_err());
    }

    #[test]
    fn decode_u64_value() {
        let word = format!("0x{}{:016x}", "00".repeat(24), 12345u64);
        assert_eq!(decode_u64(&word), Ok(12345));

        // a value above u64::MAX must error, not truncate
        let big = format!("0x{}{}", "00".repeat(23), "01".repeat(9));
        assert_eq!(decode_u64(&big), Err(AbiError::Overflow));
    }

    #[test]
    fn decode_string_round_trip() {
        // offset 0x20, length 5, "hello" padded to a word
        let mut data = String::from("0x");
        data.push_str(&format!("{:064x}", 0x20));
        data.push_str(&format!("{:064x}", 5));
        data.push_str(&hex::encode(b"hello"));
        data.push_str(&"00".repeat(27));
        assert_eq!(decode_string(&data).unwrap(), "hello");
    }

    #[test]
    fn decode_string_rejects_truncated_data() {
        let mut data = String::from("0x");
        data.push_str(&format!("{:064x}", 0x20));
        data.push_str(&format!("{:064x}", 500));
        data.push_str(&hex::encode(b"hello"));
        assert!(decode_string(&data).is_err());
    }
}
