#[cfg(test)]
mod tests {
    use crate::core::cache;
    use crate::core::metadata::NftPreview;
    use wasm_bindgen_test::*;
    use web_sys::window;

    wasm_bindgen_test_configure!(run_in_browser);

    const ADDRESS: &str = "0x2222222222222222222222222222222222222222";

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    fn clear_storage() {
        if let Ok(Some(storage)) = window().unwrap().local_storage() {
            let _ = storage.remove_item(cache::WALLET_SESSION_KEY);
            let _ = storage.remove_item(cache::NFT_PREVIEW_KEY);
        }
    }

    #[wasm_bindgen_test]
    fn wallet_session_round_trip_through_local_storage() {
        clear_storage();

        let now = now_ms();
        cache::put_wallet_session(ADDRESS, now);
        assert_eq!(cache::get_wallet_session(now + 1_000.0).as_deref(), Some(ADDRESS));

        // stored form must not be plaintext
        let stored = window()
            .unwrap()
            .local_storage()
            .unwrap()
            .unwrap()
            .get_item(cache::WALLET_SESSION_KEY)
            .unwrap()
            .unwrap();
        assert!(!stored.contains(ADDRESS));

        clear_storage();
    }

    #[wasm_bindgen_test]
    fn expired_wallet_session_is_removed_on_read() {
        clear_storage();

        let now = now_ms();
        cache::put_wallet_session(ADDRESS, now);

        let after_ttl = now + cache::WALLET_SESSION_TTL_MS + 1.0;
        assert_eq!(cache::get_wallet_session(after_ttl), None);

        // lazy invalidation removed the entry
        let stored = window()
            .unwrap()
            .local_storage()
            .unwrap()
            .unwrap()
            .get_item(cache::WALLET_SESSION_KEY)
            .unwrap();
        assert!(stored.is_none());
    }

    #[wasm_bindgen_test]
    fn disconnect_clears_the_stored_session() {
        clear_storage();

        let now = now_ms();
        cache::put_wallet_session(ADDRESS, now);
        assert!(cache::get_wallet_session(now).is_some());

        cache::clear_wallet_session();
        assert_eq!(cache::get_wallet_session(now), None);
    }

    #[wasm_bindgen_test]
    fn invalid_address_is_never_written() {
        clear_storage();

        cache::put_wallet_session("0xnope", now_ms());
        assert_eq!(cache::get_wallet_session(now_ms()), None);
    }

    #[wasm_bindgen_test]
    fn corrupted_entry_degrades_to_cache_miss() {
        clear_storage();

        let storage = window().unwrap().local_storage().unwrap().unwrap();
        storage
            .set_item(cache::WALLET_SESSION_KEY, "not base64 at all!!")
            .unwrap();
        assert_eq!(cache::get_wallet_session(now_ms()), None);

        clear_storage();
    }

    #[wasm_bindgen_test]
    fn nft_preview_round_trip_through_local_storage() {
        clear_storage();

        let preview = NftPreview {
            image_url: "https://ipfs.io/ipfs/QmHash/art.png".to_string(),
            is_video: false,
        };
        let now = now_ms();
        cache::put_nft_preview(&preview, now);
        assert_eq!(cache::get_nft_preview(now + 1_000.0), Some(preview));

        clear_storage();
    }
}
