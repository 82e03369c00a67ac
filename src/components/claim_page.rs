use leptos::*;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use js_sys::Date;
use wasm_bindgen::JsValue;

use crate::components::{ConnectionStatus, SocialShareButton};
use crate::core::cache;
use crate::core::claim::{derive_verdict, ContractSnapshot, EligibilityVerdict};
use crate::core::config::AppConfig;
use crate::core::connect::{AutoConnectParams, ConnectionState};
use crate::core::contract::ContractClient;
use crate::core::countdown::Countdown;
use crate::core::mint::{check_preconditions, MintGate, MintStatus};
use crate::core::wallet::{classify_provider_error, WalletBridge};

fn format_drawing_date(deadline_secs: u64) -> String {
    let date = Date::new(&JsValue::from_f64(deadline_secs as f64 * 1000.0));
    String::from(date.to_locale_string("en-US", &JsValue::UNDEFINED))
}

/// The claim section: resolves the auto-connect handshake, aggregates the
/// contract state, and renders exactly one of the mutually exclusive claim
/// states at a time.
#[component]
pub fn ClaimPage(params: AutoConnectParams) -> impl IntoView {
    let config = store_value(expect_context::<AppConfig>());

    let (connection_state, set_connection_state) =
        create_signal(ConnectionState::initial(params.eligible()));
    let (account, set_account) = create_signal(None::<String>);
    let snapshot = create_rw_signal(ContractSnapshot::default());
    let (mint_status, set_mint_status) = create_signal(MintStatus::Idle);
    let (status_note, set_status_note) = create_signal(String::new());
    let (countdown, set_countdown) = create_signal(None::<Countdown>);

    let gate = store_value(MintGate::new(config.with_value(|c| c.mint_cooldown_ms)));
    let countdown_handle = store_value(None::<leptos::leptos_dom::helpers::IntervalHandle>);
    let timeout_handle = store_value(None::<leptos::leptos_dom::helpers::TimeoutHandle>);
    let poll_handle = store_value(None::<leptos::leptos_dom::helpers::IntervalHandle>);

    // ----- auto-connect handshake -----

    if params.eligible() {
        let timeout_ms = config.with_value(|c| c.autoconnect_timeout_ms);

        // bounded wait: no account before the deadline means unauthorized
        match set_timeout_with_handle(
            move || {
                timeout_handle.set_value(None);
                set_connection_state
                    .update(|s| *s = s.on_timeout(account.get_untracked().is_some()));
            },
            Duration::from_millis(timeout_ms as u64),
        ) {
            Ok(handle) => timeout_handle.set_value(Some(handle)),
            Err(e) => log::error!("Failed to start auto-connect timer: {:?}", e),
        }

        spawn_local(async move {
            if !WalletBridge::is_available() {
                log::warn!("No wallet provider injected; waiting out the timer");
                return;
            }
            let wallet = config.with_value(|c| c.wallet.clone());
            match WalletBridge::auto_connect(&wallet, timeout_ms).await {
                Ok(Some(address)) => {
                    log::info!("Auto-connect successful");
                    set_account.set(Some(address));
                }
                Ok(None) => log::info!("Auto-connect resolved without an account"),
                Err(e) => log::error!("Auto-connect failed: {}", e),
            }
        });

        // keep following the provider after the handshake: an address switch
        // or disconnect must drive the connection state, not just the first
        // account
        if WalletBridge::is_available() {
            let apply_account = move |next: Option<String>| {
                if next != account.get_untracked() {
                    set_account.set(next);
                }
            };
            if let Err(e) = WalletBridge::on_accounts_changed(apply_account) {
                log::warn!("accountsChanged unsupported ({}), polling instead", e);
                match set_interval_with_handle(
                    move || {
                        spawn_local(async move {
                            match WalletBridge::active_account().await {
                                Ok(next) => apply_account(next),
                                Err(e) => log::debug!("Account poll failed: {}", e),
                            }
                        });
                    },
                    Duration::from_secs(5),
                ) {
                    Ok(handle) => poll_handle.set_value(Some(handle)),
                    Err(e) => log::error!("Failed to start account poll: {:?}", e),
                }
            }
        }
    } else {
        log::info!("No auto-connect parameters; wallet handshake skipped");
    }

    // ----- contract state aggregation -----

    // Six independent reads; the verdict recomputes as each one lands.
    let load_contract_state = move |address: Option<String>| {
        snapshot.set(ContractSnapshot::default());
        let client = Rc::new(config.with_value(|c| ContractClient::new(c)));

        {
            let client = client.clone();
            spawn_local(async move {
                match client.paused().await {
                    Ok(value) => snapshot.update(|s| s.paused = Some(value)),
                    Err(e) => log::warn!("paused() read failed: {}", e),
                }
            });
        }
        {
            let client = client.clone();
            spawn_local(async move {
                match client.is_minting_active().await {
                    Ok(value) => snapshot.update(|s| s.minting_active = Some(value)),
                    Err(e) => log::warn!("isMintingActive() read failed: {}", e),
                }
            });
        }
        {
            let client = client.clone();
            spawn_local(async move {
                match client.total_supply().await {
                    Ok(value) => snapshot.update(|s| s.total_supply = Some(value)),
                    Err(e) => log::warn!("totalSupply() read failed: {}", e),
                }
            });
        }
        {
            let client = client.clone();
            spawn_local(async move {
                match client.max_supply().await {
                    Ok(value) => snapshot.update(|s| s.max_supply = Some(value)),
                    Err(e) => log::warn!("MAX_SUPPLY() read failed: {}", e),
                }
            });
        }
        {
            let client = client.clone();
            spawn_local(async move {
                match client.drawing_deadline().await {
                    Ok(value) => snapshot.update(|s| s.drawing_deadline = Some(value)),
                    Err(e) => log::warn!("drawingDate() read failed: {}", e),
                }
            });
        }
        if let Some(address) = address {
            spawn_local(async move {
                match client.has_claimed(&address).await {
                    Ok(value) => snapshot.update(|s| s.has_claimed = Some(value)),
                    Err(e) => log::warn!("hasMinted() read failed: {}", e),
                }
            });
        }
    };

    // refetch only the claimed flag after a successful claim
    let refresh_claimed = move |address: String| {
        snapshot.update(|s| s.has_claimed = None);
        let client = config.with_value(|c| ContractClient::new(c));
        spawn_local(async move {
            match client.has_claimed(&address).await {
                Ok(value) => snapshot.update(|s| s.has_claimed = Some(value)),
                Err(e) => log::warn!("hasMinted() refetch failed: {}", e),
            }
        });
    };

    // account changes drive both the connection state and a fresh read set
    create_effect(move |prev: Option<Option<String>>| {
        let current = account.get();
        let has_account = current.is_some();

        set_connection_state.update(|s| *s = s.with_account(has_account));

        if let Some(address) = &current {
            // handshake settled; the bounded-wait timer must not fire later
            timeout_handle.update_value(|h| {
                if let Some(handle) = h.take() {
                    handle.clear();
                }
            });
            cache::put_wallet_session(address, Date::now());
        } else if matches!(prev.as_ref(), Some(Some(_))) {
            log::info!("Wallet account disconnected");
            cache::clear_wallet_session();
        }

        if prev.as_ref() != Some(&current) {
            load_contract_state(current.clone());
        }
        current
    });

    // ----- countdown -----

    let deadline = create_memo(move |_| snapshot.with(|s| s.drawing_deadline));
    create_effect(move |_| {
        let target = deadline.get();

        // restart cleanly whenever the target changes
        countdown_handle.update_value(|h| {
            if let Some(handle) = h.take() {
                handle.clear();
            }
        });

        let Some(target) = target else {
            set_countdown.set(None);
            return;
        };

        set_countdown.set(Some(Countdown::at(target, Date::now())));
        if Countdown::at(target, Date::now()).is_ended() {
            return;
        }

        match set_interval_with_handle(
            move || {
                let next = Countdown::at(target, Date::now());
                set_countdown.set(Some(next));
                if next.is_ended() {
                    // the tick source stops itself once the drawing is over
                    countdown_handle.update_value(|h| {
                        if let Some(handle) = h.take() {
                            handle.clear();
                        }
                    });
                }
            },
            Duration::from_secs(1),
        ) {
            Ok(handle) => countdown_handle.set_value(Some(handle)),
            Err(e) => log::error!("Failed to start countdown timer: {:?}", e),
        }
    });

    on_cleanup(move || {
        countdown_handle.update_value(|h| {
            if let Some(handle) = h.take() {
                handle.clear();
            }
        });
        timeout_handle.update_value(|h| {
            if let Some(handle) = h.take() {
                handle.clear();
            }
        });
        poll_handle.update_value(|h| {
            if let Some(handle) = h.take() {
                handle.clear();
            }
        });
    });

    // ----- eligibility + claim trigger -----

    let verdict = create_memo(move |_| {
        let authorized = connection_state.get() == ConnectionState::Authorized;
        snapshot.with(|s| derive_verdict(s, authorized))
    });

    let handle_mint = move |_| {
        if mint_status.get_untracked().is_submitting() {
            // at most one claim transaction in flight per session
            return;
        }

        let now = Date::now();
        let is_eligible = verdict.get_untracked() == EligibilityVerdict::Eligible;
        let from = account.get_untracked();

        if let Err(rejection) =
            check_preconditions(&gate.get_value(), now, is_eligible, from.is_some())
        {
            log::info!("Claim rejected: {:?}", rejection);
            set_status_note.set(rejection.user_message().to_string());
            return;
        }
        let Some(from) = from else {
            return;
        };

        gate.update_value(|g| g.record_attempt(now));
        set_status_note.set(String::new());
        set_mint_status.set(MintStatus::Submitting);
        log::info!("Submitting claim transaction");

        let (contract_address, success_ms, failure_ms) = config.with_value(|c| {
            (
                c.contract_address.clone(),
                c.success_display_ms,
                c.failure_display_ms,
            )
        });

        spawn_local(async move {
            let calldata = ContractClient::claim_calldata();
            match WalletBridge::send_transaction(&from, &contract_address, &calldata).await {
                Ok(tx_hash) => {
                    log::info!("Claim transaction submitted: {}", tx_hash);
                    set_mint_status.set(MintStatus::Success);
                    refresh_claimed(from.clone());
                    TimeoutFuture::new(success_ms).await;
                    set_mint_status.update(|s| {
                        if *s == MintStatus::Success {
                            *s = MintStatus::Idle;
                        }
                    });
                }
                Err(e) => {
                    let failure = classify_provider_error(&e);
                    set_mint_status.set(MintStatus::Failed(failure));
                    TimeoutFuture::new(failure_ms).await;
                    set_mint_status.update(|s| {
                        if *s == MintStatus::Failed(failure) {
                            *s = MintStatus::Idle;
                        }
                    });
                }
            }
        });
    };

    let status_message = create_memo(move |_| match mint_status.get() {
        MintStatus::Submitting => Some("Claiming your PolyPrize...".to_string()),
        MintStatus::Success => Some("Successfully claimed! 🎉".to_string()),
        MintStatus::Failed(failure) => Some(failure.user_message().to_string()),
        MintStatus::Idle => {
            let note = status_note.get();
            (!note.is_empty()).then_some(note)
        }
    });

    // ----- view -----

    view! {
        <div class="claim-page">
            <div class="claim-section">
                {move || match connection_state.get() {
                    ConnectionState::Checking => view! {
                        <div class="state-box checking">
                            <h2>"🔄 Looking for Existing Wallet..."</h2>
                            <p>"Connecting to your wallet"</p>
                            <p class="note">"Only existing smart wallets from the portal can access this raffle"</p>
                            <div class="spinner"></div>
                        </div>
                    }.into_view(),
                    ConnectionState::NoAutoConnectParams => view! {
                        <div class="state-box access-required">
                            <h2>"🔐 Access Required"</h2>
                            <p>"This raffle is only accessible through the official portal."</p>
                            <p class="note">
                                "Open this page from your account dashboard to participate."
                            </p>
                        </div>
                    }.into_view(),
                    _ => match verdict.get() {
                        EligibilityVerdict::Unauthorized => view! {
                            <div class="state-box unauthorized">
                                <h2>"🚫 No Existing Wallet Found"</h2>
                                <p>"This raffle is only available to members with a valid account."</p>
                                <p class="note">"You must have received a smart wallet from our system to participate."</p>
                            </div>
                        }.into_view(),
                        EligibilityVerdict::Pending => view! {
                            <div class="state-box pending">"Checking claim status..."</div>
                        }.into_view(),
                        EligibilityVerdict::Paused => view! {
                            <div class="state-box paused">
                                <h2>"⏸️ Claiming Paused"</h2>
                                <p>"Claiming has been temporarily paused by the contract owner."</p>
                            </div>
                        }.into_view(),
                        EligibilityVerdict::DrawingEnded => view! {
                            <div class="state-box ended">
                                <h2>"🚫 Claiming Period Ended"</h2>
                                <p>"The drawing date has passed and claiming is no longer available."</p>
                                <p class="note">
                                    {move || snapshot.with(|s| s.drawing_deadline)
                                        .map(|d| format!("Drawing Date: {}", format_drawing_date(d)))
                                        .unwrap_or_else(|| "Drawing Date: Loading...".to_string())}
                                </p>
                            </div>
                        }.into_view(),
                        EligibilityVerdict::SupplyExhausted => view! {
                            <div class="state-box exhausted">
                                <h2>"🎯 Max Supply Reached"</h2>
                                <p>
                                    {move || snapshot.with(|s| s.max_supply)
                                        .map(|max| format!("All {} prizes have been claimed!", max))
                                        .unwrap_or_else(|| "All prizes have been claimed!".to_string())}
                                </p>
                            </div>
                        }.into_view(),
                        EligibilityVerdict::AlreadyClaimed => view! {
                            <div class="state-box claimed">
                                <p>"You have claimed your PolyPrize! 🎉"</p>
                            </div>
                        }.into_view(),
                        EligibilityVerdict::Eligible => view! {
                            <div class="state-box eligible">
                                {move || snapshot.with(|s| s.supply_percentage())
                                    .map(|pct| view! {
                                        <p class="supply-progress">{format!("{}% of prizes claimed", pct)}</p>
                                    })}
                                <button
                                    class="claim-btn"
                                    on:click=handle_mint
                                    disabled=move || mint_status.get().is_submitting()
                                >
                                    {move || if mint_status.get().is_submitting() {
                                        "Claiming..."
                                    } else {
                                        "🦄 Claim NFT"
                                    }}
                                </button>
                                {move || status_message.get().map(|msg| view! {
                                    <div class="mint-status"><p>{msg}</p></div>
                                })}
                            </div>
                        }.into_view(),
                    },
                }}
            </div>

            {move || snapshot.with(|s| s.drawing_deadline).map(|deadline| view! {
                <div class="drawing-info">
                    <h3>"⏰ Raffle Details"</h3>
                    <div class="drawing-grid">
                        <div>
                            <p class="label">"Drawing Date:"</p>
                            <p class="value">{format_drawing_date(deadline)}</p>
                        </div>
                        <div>
                            <p class="label">"Status:"</p>
                            <p class="value">
                                {move || match snapshot.with(|s| s.minting_active) {
                                    Some(true) => "🟢 Claiming Active",
                                    Some(false) => "🔴 Claiming Ended",
                                    None => "Loading...",
                                }}
                            </p>
                        </div>
                        <div>
                            <p class="label">"Time Remaining:"</p>
                            <p class="value">
                                {move || countdown.get()
                                    .map(|c| c.to_string())
                                    .unwrap_or_else(|| "Loading...".to_string())}
                            </p>
                        </div>
                    </div>
                </div>
            })}

            <div class="share-row">
                <p class="share-label">"Share your claim:"</p>
                <SocialShareButton
                    platform="LinkedIn"
                    url="https://www.linkedin.com/sharing/share-offsite/?url=https://app.polygon.ac"
                    text="I claimed my free PolyPrize Collectible"
                />
                <SocialShareButton
                    platform="Twitter"
                    url="https://twitter.com/intent/tweet?text=I%20claimed%20my%20free%20PolyPrize%20Collectible"
                    text="I claimed my free PolyPrize Collectible"
                />
                <SocialShareButton
                    platform="Farcaster"
                    url="https://warpcast.com/~/compose?text=I%20claimed%20my%20free%20PolyPrize%20Collectible"
                    text="I claimed my free PolyPrize Collectible"
                />
                <SocialShareButton
                    platform="Bluesky"
                    url="https://bsky.app/intent/compose?text=I%20claimed%20my%20free%20PolyPrize%20Collectible"
                    text="I claimed my free PolyPrize Collectible"
                />
            </div>

            <ConnectionStatus account=account/>
        </div>
    }
}
