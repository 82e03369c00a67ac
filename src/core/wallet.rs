use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use js_sys::{Array, Promise, Reflect};
use web_sys::window;
use gloo_utils::format::JsValueSerdeExt;
use serde_json::json;
use std::fmt;

use super::config::WalletConfig;
use super::mint::MintFailure;

#[derive(Debug, Clone)]
pub enum WalletError {
    NotAvailable,
    ConnectionFailed(String),
    RequestFailed(String),
    JavaScriptError(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::NotAvailable => write!(f, "No wallet provider injected"),
            WalletError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            WalletError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            WalletError::JavaScriptError(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}

/// Bridge to the injected EIP-1193 wallet provider (`window.ethereum`).
///
/// The provider is an external collaborator: it owns key material and the
/// signing context. This bridge only issues requests and reports results;
/// it performs no verification of its own.
pub struct WalletBridge;

impl WalletBridge {
    const PROVIDER_KEY: &'static str = "ethereum";

    /// Check if a wallet provider is injected into the page.
    pub fn is_available() -> bool {
        window()
            .and_then(|win| Reflect::get(&win, &JsValue::from_str(Self::PROVIDER_KEY)).ok())
            .map(|provider| provider.is_object())
            .unwrap_or(false)
    }

    fn provider() -> Result<JsValue, WalletError> {
        let window = window().ok_or(WalletError::JavaScriptError("No window object".to_string()))?;
        let provider = Reflect::get(&window, &JsValue::from_str(Self::PROVIDER_KEY))
            .map_err(|e| WalletError::JavaScriptError(format!("{:?}", e)))?;
        if provider.is_object() {
            Ok(provider)
        } else {
            Err(WalletError::NotAvailable)
        }
    }

    /// Issue a `request({ method, params })` call and return its promise.
    fn request_promise(method: &str, params: serde_json::Value) -> Result<Promise, WalletError> {
        let provider = Self::provider()?;
        let request_fn = Reflect::get(&provider, &JsValue::from_str("request"))
            .map_err(|e| WalletError::JavaScriptError(format!("{:?}", e)))?;
        if !request_fn.is_function() {
            return Err(WalletError::JavaScriptError(
                "provider.request is not a function".to_string(),
            ));
        }

        let args = JsValue::from_serde(&json!({ "method": method, "params": params }))
            .map_err(|e| WalletError::JavaScriptError(e.to_string()))?;

        let func = js_sys::Function::from(request_fn);
        let promise = func
            .call1(&provider, &args)
            .map_err(|e| WalletError::RequestFailed(format!("{:?}", e)))?;
        Ok(Promise::from(promise))
    }

    async fn request(method: &str, params: serde_json::Value) -> Result<JsValue, WalletError> {
        let promise = Self::request_promise(method, params)?;
        JsFuture::from(promise)
            .await
            .map_err(|e| WalletError::RequestFailed(format!("{:?}", e)))
    }

    fn first_account(value: &JsValue) -> Option<String> {
        let accounts = Array::from(value);
        if accounts.length() == 0 {
            return None;
        }
        accounts.get(0).as_string().filter(|a| !a.is_empty())
    }

    /// Currently active account, without prompting the user.
    pub async fn active_account() -> Result<Option<String>, WalletError> {
        let result = Self::request("eth_accounts", json!([])).await?;
        Ok(Self::first_account(&result))
    }

    /// Ask the provider to switch to the given chain. Best effort: a wallet
    /// already on the chain resolves immediately, one that refuses is logged
    /// by the caller.
    pub async fn ensure_chain(chain_id: u64) -> Result<(), WalletError> {
        let params = json!([{ "chainId": format!("0x{:x}", chain_id) }]);
        Self::request("wallet_switchEthereumChain", params).await?;
        Ok(())
    }

    /// Run the auto-connect handshake, bounded by `timeout_ms`.
    /// Resolves to `None` when the deadline passes first; the pending
    /// provider promise is ignored after that.
    pub async fn auto_connect(
        wallet: &WalletConfig,
        timeout_ms: u32,
    ) -> Result<Option<String>, WalletError> {
        log::debug!(
            "Auto-connect handshake on {} (factory {})",
            wallet.chain.as_str(),
            wallet.factory_address
        );
        let connect = Self::request_promise("eth_requestAccounts", json!([]))?;
        let timeout = Promise::new(&mut |resolve, _reject| {
            if let Some(win) = window() {
                let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                    &resolve,
                    timeout_ms as i32,
                );
            }
        });

        let winner = JsFuture::from(Promise::race(&Array::of2(&connect, &timeout)))
            .await
            .map_err(|e| {
                log::error!("Auto-connect failed: {:?}", e);
                WalletError::ConnectionFailed(format!("{:?}", e))
            })?;

        if winner.is_undefined() {
            log::info!("Auto-connect timed out after {}ms", timeout_ms);
            return Ok(None);
        }

        let account = Self::first_account(&winner);
        if account.is_some() {
            if let Err(e) = Self::ensure_chain(wallet.chain.chain_id()).await {
                log::warn!("Chain switch declined: {}", e);
            }
        }
        Ok(account)
    }

    /// Subscribe to the provider's `accountsChanged` event. The callback
    /// receives the first account of each change, or `None` when the wallet
    /// disconnects. The subscription lives for the page lifetime.
    pub fn on_accounts_changed(
        callback: impl Fn(Option<String>) + 'static,
    ) -> Result<(), WalletError> {
        let provider = Self::provider()?;
        let on_fn = Reflect::get(&provider, &JsValue::from_str("on"))
            .map_err(|e| WalletError::JavaScriptError(format!("{:?}", e)))?;
        if !on_fn.is_function() {
            return Err(WalletError::JavaScriptError(
                "provider.on is not a function".to_string(),
            ));
        }

        let handler = Closure::wrap(Box::new(move |accounts: JsValue| {
            callback(Self::first_account(&accounts));
        }) as Box<dyn FnMut(JsValue)>);

        js_sys::Function::from(on_fn)
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                handler.as_ref(),
            )
            .map_err(|e| WalletError::RequestFailed(format!("{:?}", e)))?;
        handler.forget();
        Ok(())
    }

    /// Submit the claim write transaction. Fee handling belongs to the smart
    /// account provider; this bridge just sends.
    pub async fn send_transaction(
        from: &str,
        to: &str,
        data: &str,
    ) -> Result<String, JsValue> {
        let params = json!([{ "from": from, "to": to, "data": data }]);
        let promise = Self::request_promise("eth_sendTransaction", params)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let result = JsFuture::from(promise).await?;
        result
            .as_string()
            .ok_or_else(|| JsValue::from_str("Transaction hash is not a string"))
    }
}

/// Map a raw provider error onto the small set of user-facing categories.
/// The raw detail goes to the log only.
pub fn classify_provider_error(error: &JsValue) -> MintFailure {
    let code = Reflect::get(error, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default();

    log::error!("Claim transaction error: code={:?} message={}", code, message);
    classify_error_parts(code, &message)
}

/// Pure classification over the EIP-1193 error code and message text.
pub fn classify_error_parts(code: Option<f64>, message: &str) -> MintFailure {
    // 4001 is the EIP-1193 user-rejected-request code
    if code == Some(4001.0) {
        return MintFailure::UserRejected;
    }

    let lower = message.to_lowercase();
    if lower.contains("revert") || lower.contains("execution reverted") {
        return MintFailure::Reverted;
    }
    if lower.contains("network")
        || lower.contains("timeout")
        || lower.contains("connection")
        || lower.contains("fetch")
    {
        return MintFailure::Network;
    }
    MintFailure::Unknown
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const ADDRESS: &str = "0x3333333333333333333333333333333333333333";

    fn install_provider(provider: &js_sys::Object) {
        let win = web_sys::window().unwrap();
        Reflect::set(&win, &JsValue::from_str("ethereum"), provider).unwrap();
    }

    fn remove_provider() {
        let win = web_sys::window().unwrap();
        let _ = Reflect::delete_property(&win, &JsValue::from_str("ethereum"));
    }

    #[wasm_bindgen_test]
    fn accounts_changed_subscription_feeds_account_updates() {
        let provider = js_sys::Object::new();

        // fake provider.on: remember the registered handler
        let registered: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
        let slot = registered.clone();
        let on = Closure::wrap(Box::new(move |_event: JsValue, handler: JsValue| {
            *slot.borrow_mut() = Some(js_sys::Function::from(handler));
        }) as Box<dyn FnMut(JsValue, JsValue)>);
        Reflect::set(&provider, &JsValue::from_str("on"), on.as_ref()).unwrap();
        on.forget();
        install_provider(&provider);

        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        WalletBridge::on_accounts_changed(move |account| sink.borrow_mut().push(account))
            .unwrap();

        let handler = registered.borrow().clone().expect("handler registered");

        // address switch, then a disconnect (empty accounts array)
        let switched = js_sys::Array::of1(&JsValue::from_str(ADDRESS));
        handler.call1(&JsValue::UNDEFINED, &switched).unwrap();
        let disconnected = js_sys::Array::new();
        handler.call1(&JsValue::UNDEFINED, &disconnected).unwrap();

        assert_eq!(
            seen.borrow().as_slice(),
            &[Some(ADDRESS.to_string()), None]
        );

        remove_provider();
    }

    #[wasm_bindgen_test]
    fn subscription_fails_without_an_on_method() {
        let provider = js_sys::Object::new();
        install_provider(&provider);

        assert!(WalletBridge::on_accounts_changed(|_| {}).is_err());

        remove_provider();
    }

    #[wasm_bindgen_test]
    async fn active_account_reads_eth_accounts() {
        let provider = js_sys::Object::new();
        let request = Closure::wrap(Box::new(move |_args: JsValue| {
            let accounts = js_sys::Array::of1(&JsValue::from_str(ADDRESS));
            Promise::resolve(&accounts)
        }) as Box<dyn FnMut(JsValue) -> Promise>);
        Reflect::set(&provider, &JsValue::from_str("request"), request.as_ref()).unwrap();
        request.forget();
        install_provider(&provider);

        let account = WalletBridge::active_account().await.unwrap();
        assert_eq!(account.as_deref(), Some(ADDRESS));

        remove_provider();
    }
}
