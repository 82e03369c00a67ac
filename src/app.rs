use leptos::*;

use crate::components::{ClaimPage, Header, NftPreview};
use crate::core::config::AppConfig;
use crate::core::connect::AutoConnectParams;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    log::info!(
        "Starting claim app on {} (contract {})",
        config.wallet.chain.as_str(),
        config.contract_address
    );
    if !config.wallet.chain.is_production() {
        log::warn!("Running against test network {}", config.wallet.chain.as_str());
    }
    let footer_note = if config.wallet.sponsor_gas {
        format!("Powered by {} • Gas sponsored", config.wallet.chain.as_str())
    } else {
        format!("Powered by {}", config.wallet.chain.as_str())
    };
    provide_context(config);

    let params = AutoConnectParams::from_window();

    view! {
        <div class="app-container">
            <Header/>
            <main class="app-main">
                <NftPreview/>
                <ClaimPage params=params/>
            </main>
            <footer class="app-footer">
                <p>{footer_note}</p>
            </footer>
        </div>
    }
}
