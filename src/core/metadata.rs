use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use gloo_utils::format::JsValueSerdeExt;

/// Resolved NFT preview data: where the artwork lives and how to render it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftPreview {
    pub image_url: String,
    pub is_video: bool,
}

const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const BASE64_JSON_PREFIX: &str = "data:application/json;base64,";
const PLAIN_JSON_PREFIX: &str = "data:application/json,";
const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".mov"];

/// Rewrite an `ipfs://` URI to its HTTP gateway form; other URIs pass
/// through untouched.
pub fn rewrite_ipfs(uri: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(path) => format!("{}{}", IPFS_GATEWAY, path),
        None => uri.to_string(),
    }
}

fn is_video_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

/// Minimal percent-decoding for URL-encoded inline JSON metadata.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3)?;
                let value = u8::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?;
                out.push(value);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

/// Decode metadata embedded directly in the token URI (base64 or
/// URL-encoded inline JSON). Returns `None` for remote URIs.
pub fn parse_inline_metadata(token_uri: &str) -> Option<serde_json::Value> {
    if let Some(encoded) = token_uri.strip_prefix(BASE64_JSON_PREFIX) {
        let bytes = base64::decode(encoded).ok()?;
        return serde_json::from_slice(&bytes).ok();
    }
    if let Some(encoded) = token_uri.strip_prefix(PLAIN_JSON_PREFIX) {
        let decoded = percent_decode(encoded)?;
        return serde_json::from_str(&decoded).ok();
    }
    None
}

/// Pull the preview out of a metadata document: `image`, `image_url` or
/// `animation_url`, video detected by file extension or the presence of
/// `animation_url`.
pub fn extract_preview(metadata: &serde_json::Value) -> Option<NftPreview> {
    let has_animation = metadata
        .get("animation_url")
        .and_then(|v| v.as_str())
        .map_or(false, |s| !s.is_empty());

    let image_url = ["image", "image_url", "animation_url"]
        .iter()
        .find_map(|key| metadata.get(*key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())?;

    let image_url = rewrite_ipfs(image_url);
    let is_video = is_video_url(&image_url) || has_animation;

    Some(NftPreview {
        image_url,
        is_video,
    })
}

async fn fetch_json(url: &str) -> Result<serde_json::Value, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    let json = JsFuture::from(resp.json()?).await?;
    json.into_serde()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resolve a token URI to preview data. Inline JSON is decoded locally;
/// anything else is fetched over HTTP (after an ipfs gateway rewrite).
/// Every failure degrades to `None`; a missing preview is not an error.
pub async fn resolve_preview(token_uri: &str) -> Option<NftPreview> {
    if let Some(metadata) = parse_inline_metadata(token_uri) {
        return extract_preview(&metadata);
    }

    let metadata_url = rewrite_ipfs(token_uri);
    match fetch_json(&metadata_url).await {
        Ok(metadata) => extract_preview(&metadata),
        Err(e) => {
            log::warn!("Failed to fetch NFT metadata from {}: {:?}", metadata_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ipfs_uris_are_rewritten_to_the_gateway() {
        assert_eq!(
            rewrite_ipfs("ipfs://QmHash/metadata.json"),
            "https://ipfs.io/ipfs/QmHash/metadata.json"
        );
        assert_eq!(
            rewrite_ipfs("https://example.com/1.json"),
            "https://example.com/1.json"
        );
    }

    #[test]
    fn extract_prefers_image_field() {
        let metadata = json!({
            "image": "ipfs://QmHash/art.png",
            "image_url": "https://example.com/other.png",
        });
        let preview = extract_preview(&metadata).unwrap();
        assert_eq!(preview.image_url, "https://ipfs.io/ipfs/QmHash/art.png");
        assert!(!preview.is_video);
    }

    #[test]
    fn extract_falls_back_to_image_url_then_animation_url() {
        let metadata = json!({ "image_url": "https://example.com/art.jpg" });
        assert_eq!(
            extract_preview(&metadata).unwrap().image_url,
            "https://example.com/art.jpg"
        );

        let metadata = json!({ "animation_url": "https://example.com/clip" });
        let preview = extract_preview(&metadata).unwrap();
        assert_eq!(preview.image_url, "https://example.com/clip");
        // animation_url implies video even without a known extension
        assert!(preview.is_video);
    }

    #[test]
    fn video_detected_by_extension() {
        for url in [
            "https://example.com/a.mp4",
            "https://example.com/a.WEBM",
            "ipfs://QmHash/clip.mov",
        ] {
            let metadata = json!({ "image": url });
            assert!(extract_preview(&metadata).unwrap().is_video, "{}", url);
        }

        let metadata = json!({ "image": "https://example.com/a.png" });
        assert!(!extract_preview(&metadata).unwrap().is_video);
    }

    #[test]
    fn missing_or_empty_fields_give_no_preview() {
        assert_eq!(extract_preview(&json!({})), None);
        assert_eq!(extract_preview(&json!({ "image": "" })), None);
        assert_eq!(extract_preview(&json!({ "name": "Prize" })), None);
    }

    #[test]
    fn base64_inline_metadata_is_decoded() {
        let doc = json!({ "image": "https://example.com/art.png" }).to_string();
        let uri = format!("data:application/json;base64,{}", base64::encode(doc));
        let metadata = parse_inline_metadata(&uri).unwrap();
        assert_eq!(
            extract_preview(&metadata).unwrap().image_url,
            "https://example.com/art.png"
        );
    }

    #[test]
    fn url_encoded_inline_metadata_is_decoded() {
        let uri = "data:application/json,%7B%22image%22%3A%22https%3A%2F%2Fexample.com%2Fart.png%22%7D";
        let metadata = parse_inline_metadata(uri).unwrap();
        assert_eq!(
            extract_preview(&metadata).unwrap().image_url,
            "https://example.com/art.png"
        );
    }

    #[test]
    fn malformed_inline_metadata_degrades_to_none() {
        assert!(parse_inline_metadata("data:application/json;base64,!!!").is_none());
        assert!(parse_inline_metadata("data:application/json,%zz").is_none());
        assert!(parse_inline_metadata("https://example.com/1.json").is_none());
    }
}
