use leptos::*;
use crate::core::cache;

/// Truncated display form of an address, `0x1234...abcd`. Providers are
/// trusted to hand back hex addresses, but anything that is not sliceable
/// at the byte offsets is shown as-is rather than panicking.
fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    match (address.get(..6), address.get(address.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}

/// Connection footer. While the wallet is still reconnecting, the cached
/// session address (if any) is shown so return visits feel instant.
#[component]
pub fn ConnectionStatus(account: ReadSignal<Option<String>>) -> impl IntoView {
    let cached_address = cache::get_wallet_session(js_sys::Date::now());

    view! {
        <div class="connection-status-box">
            {move || match account.get() {
                Some(address) => view! {
                    <div class="connected">
                        <p class="status-label">"✅ Connected"</p>
                        <p class="status-address">{short_address(&address)}</p>
                    </div>
                }.into_view(),
                None => {
                    let hint = cached_address
                        .as_deref()
                        .map(short_address)
                        .map(|a| format!("Last session: {}", a))
                        .unwrap_or_else(|| "AutoConnect in progress".to_string());
                    view! {
                        <div class="connecting">
                            <p class="status-label">"🔄 Connecting..."</p>
                            <p class="status-address">{hint}</p>
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_truncates_long_addresses() {
        assert_eq!(
            short_address("0x1111111111111111111111111111111111111111"),
            "0x1111...1111"
        );
        assert_eq!(short_address("0x1234"), "0x1234");
    }

    #[test]
    fn short_address_survives_multibyte_input() {
        // char boundary falls inside the head slice; shown unshortened
        let odd = "0xaaañ\u{00f1}\u{00f1}\u{00f1}\u{00f1}\u{00f1}";
        assert_eq!(short_address(odd), odd);

        // multibyte only in the tail slice positions, still boundary-aligned
        assert_eq!(short_address("0xbbbbbb\u{00f1}\u{00f1}"), "0xbbbb...ññ");
    }
}
