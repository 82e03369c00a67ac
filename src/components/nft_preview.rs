use leptos::*;
use std::rc::Rc;

use crate::core::cache;
use crate::core::config::AppConfig;
use crate::core::contract::ContractClient;
use crate::core::metadata;

/// Preview of the token artwork, cache-first: the cached copy renders
/// immediately while the tokenURI read and metadata fetch refresh it in the
/// background.
#[component]
pub fn NftPreview() -> impl IntoView {
    let config = expect_context::<AppConfig>();

    let initial = cache::get_nft_preview(js_sys::Date::now());
    let (preview, set_preview) = create_signal(initial.clone());
    let (loading, set_loading) = create_signal(initial.is_none());

    let client = Rc::new(ContractClient::new(&config));
    let token_id = config.preview_token_id;

    spawn_local(async move {
        match client.token_uri(token_id).await {
            Ok(token_uri) => {
                if let Some(resolved) = metadata::resolve_preview(&token_uri).await {
                    cache::put_nft_preview(&resolved, js_sys::Date::now());
                    set_preview.set(Some(resolved));
                }
            }
            Err(e) => {
                // a missing preview is cosmetic, not an app error
                log::warn!("Failed to read tokenURI: {}", e);
            }
        }
        set_loading.set(false);
    });

    view! {
        <div class="nft-preview">
            {move || match preview.get() {
                Some(preview) if preview.is_video => view! {
                    <video
                        class="nft-media"
                        src=preview.image_url
                        autoplay=true
                        loop=true
                        muted=true
                        playsinline=true
                    />
                }.into_view(),
                Some(preview) => view! {
                    <img class="nft-media" src=preview.image_url alt="NFT Preview"/>
                }.into_view(),
                None if loading.get() => view! {
                    <div class="nft-placeholder">"Loading NFT..."</div>
                }.into_view(),
                None => view! { <div></div> }.into_view(),
            }}
        </div>
    }
}
