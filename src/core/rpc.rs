use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Date, Math};
use std::fmt;

use super::config::ChainKind;

// error type
#[derive(Debug, Clone)]
pub enum RpcError {
    ConnectionFailed(String),
    NodeError(String),
    Other(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RpcError::NodeError(msg) => write!(f, "RPC node error: {}", msg),
            RpcError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<T> {
    jsonrpc: String,
    id: u64,
    method: String,
    params: T,
}

#[derive(Serialize)]
struct CallParams {
    to: String,
    data: String,
}

/// Read-only JSON-RPC connection to a public node of the configured chain.
/// Used for the six eligibility reads and the tokenURI preview read; the
/// claim write goes through the wallet provider instead.
pub struct RpcConnection {
    endpoint: String,
    client_id: Option<String>,
}

impl RpcConnection {
    pub fn new(chain: ChainKind) -> Self {
        let endpoint = Self::select_random_endpoint(chain);
        log::debug!("Selected RPC endpoint: {}", endpoint);
        Self::with_endpoint(&endpoint)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client_id: None,
        }
    }

    /// Attach the app's client id, sent as a header with every request so
    /// nodes that meter by client can attribute the traffic.
    pub fn with_client_id(mut self, client_id: &str) -> Self {
        if !client_id.is_empty() {
            self.client_id = Some(client_id.to_string());
        }
        self
    }

    /// select a random endpoint from the chain's endpoint list
    fn select_random_endpoint(chain: ChainKind) -> String {
        let endpoints = chain.rpc_endpoints();
        if endpoints.len() == 1 {
            return endpoints[0].to_string();
        }

        if let Some(random_value) = Self::try_crypto_random() {
            let index = (random_value as usize) % endpoints.len();
            endpoints[index].to_string()
        } else {
            // fallback scheme: use Math.random()
            let random_value = Math::random();
            let index = (random_value * endpoints.len() as f64) as usize;
            endpoints[index.min(endpoints.len() - 1)].to_string()
        }
    }

    /// generate unique request id, crypto random first, timestamp as fallback
    fn generate_request_id() -> u64 {
        if let Some(crypto_id) = Self::try_crypto_random() {
            crypto_id
        } else {
            Self::fallback_timestamp_random()
        }
    }

    /// use crypto.getRandomValues to generate a high quality random number
    fn try_crypto_random() -> Option<u64> {
        let window = web_sys::window()?;
        let crypto = window.crypto().ok()?;

        let mut buffer = [0u8; 8];
        if crypto.get_random_values_with_u8_array(&mut buffer).is_ok() {
            let mut result = 0u64;
            for &byte in buffer.iter() {
                result = (result << 8) | (byte as u64);
            }
            // keep it positive
            Some(result & 0x7FFFFFFFFFFFFFFF)
        } else {
            None
        }
    }

    fn fallback_timestamp_random() -> u64 {
        let timestamp = Date::now() as u64;
        let random_part = (Math::random() * 10000.0) as u64;
        let timestamp_part = timestamp % 10_000_000_000;
        timestamp_part * 10000 + random_part
    }

    /// `eth_call` against `to` with raw calldata; returns the hex-encoded
    /// return data.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String, RpcError> {
        let params = (
            CallParams {
                to: to.to_string(),
                data: data.to_string(),
            },
            "latest".to_string(),
        );
        let result = self.send_request("eth_call", params).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RpcError::Other("eth_call result is not a string".to_string()))
    }

    async fn send_request<T: Serialize>(
        &self,
        method: &str,
        params: T,
    ) -> Result<serde_json::Value, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Self::generate_request_id(),
            method: method.to_string(),
            params,
        };

        let request_body = serde_json::to_string(&request).map_err(|e| {
            log::error!("Failed to serialize request: {}", e);
            RpcError::Other(e.to_string())
        })?;
        log::debug!("RPC request body: {}", request_body);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&request_body));

        let request = Request::new_with_str_and_init(&self.endpoint, &opts).map_err(|e| {
            log::error!("Failed to create HTTP request: {:?}", e);
            RpcError::ConnectionFailed(format!("Failed to create request: {:?}", e))
        })?;

        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| RpcError::ConnectionFailed(format!("Failed to set headers: {:?}", e)))?;
        if let Some(client_id) = &self.client_id {
            request
                .headers()
                .set("x-client-id", client_id)
                .map_err(|e| {
                    RpcError::ConnectionFailed(format!("Failed to set headers: {:?}", e))
                })?;
        }

        let window =
            web_sys::window().ok_or_else(|| RpcError::Other("No window object".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                log::error!("HTTP request failed: {:?}", e);
                RpcError::ConnectionFailed(format!("Failed to send request: {:?}", e))
            })?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|e| RpcError::Other(format!("Failed to convert response: {:?}", e)))?;

        if !resp.ok() {
            log::error!("HTTP error: status={} {}", resp.status(), resp.status_text());
            return Err(RpcError::ConnectionFailed(format!(
                "HTTP {} {}",
                resp.status(),
                resp.status_text()
            )));
        }

        let json = JsFuture::from(
            resp.json()
                .map_err(|e| RpcError::Other(format!("Failed to get JSON: {:?}", e)))?,
        )
        .await
        .map_err(|e| RpcError::Other(format!("Failed to parse JSON: {:?}", e)))?;

        let value: serde_json::Value = json
            .into_serde()
            .map_err(|e| RpcError::Other(format!("Failed to parse response as JSON: {:?}", e)))?;

        if let Some(error) = value.get("error") {
            log::error!("RPC error for {}: {}", method, error);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(RpcError::NodeError(message.to_string()));
        }

        value
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::Other("Response has no result field".to_string()))
    }
}
