use once_cell::sync::Lazy;
use std::fmt;

use super::abi;
use super::config::AppConfig;
use super::rpc::{RpcConnection, RpcError};

// Zero-argument calldata is fixed, hash the signatures once.
static TOTAL_SUPPLY_CALL: Lazy<String> = Lazy::new(|| abi::encode_call("totalSupply()"));
static MAX_SUPPLY_CALL: Lazy<String> = Lazy::new(|| abi::encode_call("MAX_SUPPLY()"));
static DRAWING_DATE_CALL: Lazy<String> = Lazy::new(|| abi::encode_call("drawingDate()"));
static MINTING_ACTIVE_CALL: Lazy<String> = Lazy::new(|| abi::encode_call("isMintingActive()"));
static PAUSED_CALL: Lazy<String> = Lazy::new(|| abi::encode_call("paused()"));
static MINT_CALL: Lazy<String> = Lazy::new(|| abi::encode_call("mint()"));

#[derive(Debug, Clone)]
pub enum ContractError {
    Rpc(RpcError),
    Decode(abi::AbiError),
    NotConfigured,
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractError::Rpc(e) => write!(f, "{}", e),
            ContractError::Decode(e) => write!(f, "{}", e),
            ContractError::NotConfigured => write!(f, "Contract address is not configured"),
        }
    }
}

impl From<RpcError> for ContractError {
    fn from(e: RpcError) -> Self {
        ContractError::Rpc(e)
    }
}

impl From<abi::AbiError> for ContractError {
    fn from(e: abi::AbiError) -> Self {
        ContractError::Decode(e)
    }
}

/// Read-only client for the claim contract. The contract is a black box
/// behind six view methods plus `tokenURI`; the `mint()` write goes through
/// the wallet provider, never through this client.
pub struct ContractClient {
    address: String,
    rpc: RpcConnection,
}

impl ContractClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            address: config.contract_address.clone(),
            rpc: RpcConnection::new(config.wallet.chain).with_client_id(&config.client_id),
        }
    }

    async fn call(&self, calldata: String) -> Result<String, ContractError> {
        if self.address.is_empty() {
            return Err(ContractError::NotConfigured);
        }
        Ok(self.rpc.eth_call(&self.address, &calldata).await?)
    }

    /// Whether `address` already claimed its token.
    pub async fn has_claimed(&self, address: &str) -> Result<bool, ContractError> {
        let calldata = abi::encode_call_address("hasMinted(address)", address)?;
        Ok(abi::decode_bool(&self.call(calldata).await?)?)
    }

    pub async fn total_supply(&self) -> Result<u64, ContractError> {
        let data = self.call(TOTAL_SUPPLY_CALL.clone()).await?;
        Ok(abi::decode_u64(&data)?)
    }

    pub async fn max_supply(&self) -> Result<u64, ContractError> {
        let data = self.call(MAX_SUPPLY_CALL.clone()).await?;
        Ok(abi::decode_u64(&data)?)
    }

    /// Drawing deadline as a unix timestamp in seconds.
    pub async fn drawing_deadline(&self) -> Result<u64, ContractError> {
        let data = self.call(DRAWING_DATE_CALL.clone()).await?;
        Ok(abi::decode_u64(&data)?)
    }

    pub async fn is_minting_active(&self) -> Result<bool, ContractError> {
        let data = self.call(MINTING_ACTIVE_CALL.clone()).await?;
        Ok(abi::decode_bool(&data)?)
    }

    pub async fn paused(&self) -> Result<bool, ContractError> {
        let data = self.call(PAUSED_CALL.clone()).await?;
        Ok(abi::decode_bool(&data)?)
    }

    /// Metadata URI for the preview token.
    pub async fn token_uri(&self, token_id: u64) -> Result<String, ContractError> {
        let data = self
            .call(abi::encode_call_u64("tokenURI(uint256)", token_id))
            .await?;
        Ok(abi::decode_string(&data)?)
    }

    /// Calldata for the zero-argument claim write, to be signed and sent by
    /// the wallet provider.
    pub fn claim_calldata() -> String {
        MINT_CALL.clone()
    }
}
