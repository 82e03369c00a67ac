use serde::{Serialize, Deserialize};

/// Supported chain enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainKind {
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Sepolia,
}

impl ChainKind {
    /// Parse a chain name as supplied via build-time environment
    pub fn from_name(name: &str) -> Option<ChainKind> {
        match name {
            "polygon" => Some(ChainKind::Polygon),
            "arbitrum" => Some(ChainKind::Arbitrum),
            "optimism" => Some(ChainKind::Optimism),
            "base" => Some(ChainKind::Base),
            "sepolia" => Some(ChainKind::Sepolia),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKind::Polygon => "polygon",
            ChainKind::Arbitrum => "arbitrum",
            ChainKind::Optimism => "optimism",
            ChainKind::Base => "base",
            ChainKind::Sepolia => "sepolia",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            ChainKind::Polygon => 137,
            ChainKind::Arbitrum => 42161,
            ChainKind::Optimism => 10,
            ChainKind::Base => 8453,
            ChainKind::Sepolia => 11155111,
        }
    }

    /// Public JSON-RPC endpoints for read-only contract calls
    pub fn rpc_endpoints(&self) -> &'static [&'static str] {
        match self {
            ChainKind::Polygon => &[
                "https://polygon-rpc.com",
                "https://polygon-bor-rpc.publicnode.com",
            ],
            ChainKind::Arbitrum => &["https://arb1.arbitrum.io/rpc"],
            ChainKind::Optimism => &["https://mainnet.optimism.io"],
            ChainKind::Base => &["https://mainnet.base.org"],
            ChainKind::Sepolia => &["https://rpc.sepolia.org"],
        }
    }

    /// Check if this is a production chain (real assets)
    pub fn is_production(&self) -> bool {
        !matches!(self, ChainKind::Sepolia)
    }
}

/// Wallet/session provider configuration: which chain the in-app smart
/// wallet lives on, which account factory issued it, and whether gas is
/// sponsored for the claim transaction.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub chain: ChainKind,
    pub factory_address: String,
    pub sponsor_gas: bool,
}

/// Application configuration, constructed once at startup and read-only
/// thereafter. Components receive it through Leptos context instead of
/// reaching for module-level globals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub contract_address: String,
    pub client_id: String,
    pub wallet: WalletConfig,
    /// Bounded wait for the wallet auto-connect handshake
    pub autoconnect_timeout_ms: u32,
    /// Minimum spacing between claim attempts
    pub mint_cooldown_ms: f64,
    /// How long the success status stays on screen
    pub success_display_ms: u32,
    /// How long a failure status stays on screen
    pub failure_display_ms: u32,
    /// Token id used for the metadata preview
    pub preview_token_id: u64,
}

impl AppConfig {
    /// Build the configuration from compile-time environment variables.
    /// Missing values are logged and defaulted so the page still renders
    /// (the claim section will sit in a non-eligible state).
    pub fn from_env() -> Self {
        let contract_address = option_env!("CLAIM_CONTRACT_ADDRESS").unwrap_or("");
        let client_id = option_env!("CLAIM_CLIENT_ID").unwrap_or("");
        let factory_address = option_env!("CLAIM_FACTORY_ADDRESS").unwrap_or("");
        let chain_name = option_env!("CLAIM_CHAIN").unwrap_or("polygon");

        if contract_address.is_empty() {
            log::error!("CLAIM_CONTRACT_ADDRESS is not set");
        }
        if client_id.is_empty() {
            log::error!("CLAIM_CLIENT_ID is not set");
        }
        if factory_address.is_empty() {
            log::error!("CLAIM_FACTORY_ADDRESS is not set");
        }

        let chain = match ChainKind::from_name(chain_name) {
            Some(chain) => chain,
            None => {
                log::warn!("Unknown chain '{}', falling back to polygon", chain_name);
                ChainKind::Polygon
            }
        };

        Self {
            contract_address: contract_address.to_string(),
            client_id: client_id.to_string(),
            wallet: WalletConfig {
                chain,
                factory_address: factory_address.to_string(),
                sponsor_gas: true,
            },
            autoconnect_timeout_ms: 15_000,
            mint_cooldown_ms: 8_000.0,
            success_display_ms: 3_000,
            failure_display_ms: 5_000,
            preview_token_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_names_round_trip() {
        for chain in [
            ChainKind::Polygon,
            ChainKind::Arbitrum,
            ChainKind::Optimism,
            ChainKind::Base,
            ChainKind::Sepolia,
        ] {
            assert_eq!(ChainKind::from_name(chain.as_str()), Some(chain));
        }
        assert_eq!(ChainKind::from_name("mainnet"), None);
    }

    #[test]
    fn chain_ids_match_the_networks() {
        assert_eq!(ChainKind::Polygon.chain_id(), 137);
        assert_eq!(ChainKind::Sepolia.chain_id(), 11155111);
    }

    #[test]
    fn only_sepolia_is_a_test_network() {
        assert!(ChainKind::Polygon.is_production());
        assert!(ChainKind::Base.is_production());
        assert!(!ChainKind::Sepolia.is_production());
    }

    #[test]
    fn every_chain_has_an_endpoint() {
        for chain in [
            ChainKind::Polygon,
            ChainKind::Arbitrum,
            ChainKind::Optimism,
            ChainKind::Base,
            ChainKind::Sepolia,
        ] {
            assert!(!chain.rpc_endpoints().is_empty());
        }
    }
}
