use leptos::*;

/// Opens a share intent in a new tab. The URLs are static intents; nothing
/// about the session leaves the page.
#[component]
pub fn SocialShareButton(
    platform: &'static str,
    url: &'static str,
    text: &'static str,
) -> impl IntoView {
    let icon = match platform {
        "LinkedIn" => "💼",
        "Twitter" => "🐦",
        "Farcaster" => "🟣",
        "Bluesky" => "🦋",
        _ => "🔗",
    };

    let handle_share = move |_| {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer") {
                log::warn!("Failed to open share window: {:?}", e);
            }
        }
    };

    view! {
        <button class="share-btn" on:click=handle_share title=format!("Share on {}: {}", platform, text)>
            <span class="share-icon">{icon}</span>
            {platform}
        </button>
    }
}
