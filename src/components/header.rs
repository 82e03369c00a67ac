use leptos::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <div class="header">
            <h1 class="app-title">"🦄 Claim your PolyPrize"</h1>
            <p class="subtitle">
                "Click \"Claim\" below to receive your PolyPrize NFT and be entered to win the raffle."
            </p>
            <p class="subtitle-note">"🔐 Existing members only • Claim for free"</p>
        </div>
    }
}
