use serde::{de::DeserializeOwned, Deserialize, Serialize};
use web_sys::{window, Storage};

use super::metadata::NftPreview;

/// Lazy TTL cache over localStorage.
///
/// Two records live here: the wallet session (so a return visit shows the
/// address instantly while the wallet reconnects in the background) and the
/// resolved NFT preview (soul-bound metadata never changes, so a long TTL
/// is safe). Entries are only ever invalidated on read; there is no sweep.
///
/// The wallet record is XOR-salted and base64 encoded at rest. That is
/// casual-inspection deterrence for DevTools, not a security boundary; the
/// cached value is a public address.

pub const WALLET_SESSION_KEY: &str = "uw_session";
pub const NFT_PREVIEW_KEY: &str = "uw_nft";

pub const WALLET_SESSION_TTL_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
pub const NFT_PREVIEW_TTL_MS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

const OBFUSCATION_SALT: u8 = 0x55;

/// A cached payload plus its write timestamp (milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedRecord<T> {
    pub payload: T,
    pub written_at: f64,
}

fn xor_bytes(data: &[u8], salt: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ salt).collect()
}

/// Serialize a record for storage. Returns `None` on serialization failure
/// (degrades to "nothing cached").
pub(crate) fn encode_record<T: Serialize>(
    payload: &T,
    written_at: f64,
    obfuscate: bool,
) -> Option<String> {
    let record = CachedRecord {
        payload,
        written_at,
    };
    let json = serde_json::to_string(&record).ok()?;
    if obfuscate {
        Some(base64::encode(xor_bytes(json.as_bytes(), OBFUSCATION_SALT)))
    } else {
        Some(json)
    }
}

/// Parse a stored record. Any decode failure degrades to `None`.
pub(crate) fn decode_record<T: DeserializeOwned>(
    raw: &str,
    obfuscated: bool,
) -> Option<CachedRecord<T>> {
    let json = if obfuscated {
        let bytes = base64::decode(raw).ok()?;
        String::from_utf8(xor_bytes(&bytes, OBFUSCATION_SALT)).ok()?
    } else {
        raw.to_string()
    };
    serde_json::from_str(&json).ok()
}

/// TTL and validator check, pure so it can be tested without a browser.
pub(crate) fn check_record<T>(
    record: CachedRecord<T>,
    ttl_ms: f64,
    now_ms: f64,
    validate: impl Fn(&T) -> bool,
) -> Option<T> {
    if now_ms - record.written_at > ttl_ms {
        return None;
    }
    if !validate(&record.payload) {
        return None;
    }
    Some(record.payload)
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

// Storage writes are wrapped so quota or availability failures stay silent.
fn put_raw(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("Failed to write cache entry {}: {:?}", key, e);
        }
    }
}

fn get_raw(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Generic read: missing, malformed, expired, or invalid entries are
/// removed and reported as absent. Never panics past this boundary.
fn get<T: DeserializeOwned>(
    key: &str,
    ttl_ms: f64,
    obfuscated: bool,
    now_ms: f64,
    validate: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = get_raw(key)?;
    match decode_record(&raw, obfuscated).and_then(|r| check_record(r, ttl_ms, now_ms, validate)) {
        Some(payload) => Some(payload),
        None => {
            log::debug!("Cache entry {} is stale or invalid, removing", key);
            remove(key);
            None
        }
    }
}

/// Minimal address sanity check: `0x` plus 40 hex chars.
pub fn is_valid_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn put_wallet_session(address: &str, now_ms: f64) {
    if !is_valid_address(address) {
        return;
    }
    if let Some(encoded) = encode_record(&address.to_string(), now_ms, true) {
        put_raw(WALLET_SESSION_KEY, &encoded);
    }
}

pub fn get_wallet_session(now_ms: f64) -> Option<String> {
    get(
        WALLET_SESSION_KEY,
        WALLET_SESSION_TTL_MS,
        true,
        now_ms,
        |address: &String| is_valid_address(address),
    )
}

pub fn clear_wallet_session() {
    remove(WALLET_SESSION_KEY);
}

pub fn put_nft_preview(preview: &NftPreview, now_ms: f64) {
    if preview.image_url.is_empty() {
        return;
    }
    if let Some(encoded) = encode_record(preview, now_ms, false) {
        put_raw(NFT_PREVIEW_KEY, &encoded);
    }
}

pub fn get_nft_preview(now_ms: f64) -> Option<NftPreview> {
    get(
        NFT_PREVIEW_KEY,
        NFT_PREVIEW_TTL_MS,
        false,
        now_ms,
        |preview: &NftPreview| !preview.image_url.is_empty(),
    )
}
