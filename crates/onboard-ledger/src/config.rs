//! # Chain Profiles and Registry Configuration
//!
//! The workflow carries exactly one externally-supplied setting: the
//! address of the pre-deployed registry contract, read from
//! `ONBOARD_CONTRACT_ADDRESS`. Everything else is a typed default that
//! deployments can override through the builder methods.
//!
//! [`ChainProfile`] carries the data a wallet needs to add an unknown
//! network (chain ID, currency, RPC and explorer URLs); the
//! [`ChainProfile::sepolia`] preset matches the default deployment
//! target.

use serde::{Deserialize, Serialize};

/// Environment variable holding the registry contract address.
pub const CONTRACT_ADDRESS_ENV: &str = "ONBOARD_CONTRACT_ADDRESS";

/// Errors constructing configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The contract address is not set. The contract must be deployed and
    /// its address supplied before the workflow can run.
    #[error("{CONTRACT_ADDRESS_ENV} is not set; deploy the registry contract and supply its address")]
    MissingContractAddress,

    /// An address is not `0x` + 40 hex characters.
    #[error("invalid EVM address: {value}")]
    InvalidAddress {
        /// The offending value.
        value: String,
    },

    /// The RPC URL failed to parse.
    #[error("invalid RPC URL: {value}")]
    InvalidRpcUrl {
        /// The offending value.
        value: String,
    },
}

/// Description of an EVM network, in the shape wallets expect when asked
/// to add an unknown chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// Numeric chain ID (e.g. 11155111 for Sepolia).
    pub chain_id: u64,
    /// Human-readable network name.
    pub chain_name: String,
    /// Native currency symbol (e.g. "ETH").
    pub currency_symbol: String,
    /// Native currency decimals (18 for ether).
    pub currency_decimals: u8,
    /// Public RPC URLs for the network.
    pub rpc_urls: Vec<String>,
    /// Block explorer URLs.
    pub block_explorer_urls: Vec<String>,
}

impl ChainProfile {
    /// The Sepolia test network, the workflow's default deployment target.
    pub fn sepolia() -> Self {
        Self {
            chain_id: 11_155_111,
            chain_name: "Sepolia".to_string(),
            currency_symbol: "ETH".to_string(),
            currency_decimals: 18,
            rpc_urls: vec!["https://rpc.sepolia.org".to_string()],
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        }
    }
}

/// Configuration for the EVM registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Address of the deployed registry contract (0x + 40 hex chars).
    pub contract_address: String,
    /// Sender address whose transactions are signed by the RPC provider's
    /// key management (0x-prefixed). The client holds no private keys.
    pub from_address: String,
    /// The network the contract is deployed on.
    pub chain: ChainProfile,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Create a configuration with Sepolia defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if either address is not
    /// `0x` + 40 hex characters, or [`ConfigError::InvalidRpcUrl`] if the
    /// RPC URL does not parse.
    pub fn new(
        rpc_url: impl Into<String>,
        contract_address: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let rpc_url = rpc_url.into();
        url::Url::parse(&rpc_url).map_err(|_| ConfigError::InvalidRpcUrl {
            value: rpc_url.clone(),
        })?;
        let contract_address = validate_address(contract_address.into())?;
        let from_address = validate_address(from_address.into())?;
        Ok(Self {
            rpc_url,
            contract_address,
            from_address,
            chain: ChainProfile::sepolia(),
            timeout_secs: 30,
        })
    }

    /// Read the contract address from `ONBOARD_CONTRACT_ADDRESS`.
    ///
    /// The RPC endpoint and sender address are deployment concerns and are
    /// passed explicitly; the contract address is the single setting the
    /// environment supplies.
    pub fn from_env(
        rpc_url: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let contract_address = std::env::var(CONTRACT_ADDRESS_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingContractAddress)?;
        Self::new(rpc_url, contract_address.trim(), from_address)
    }

    /// Override the target network.
    pub fn with_chain(mut self, chain: ChainProfile) -> Self {
        self.chain = chain;
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Validate that a string is a well-formed EVM address (0x + 40 hex chars).
pub fn validate_address(addr: String) -> Result<String, ConfigError> {
    let well_formed = addr.len() == 42
        && addr.starts_with("0x")
        && addr[2..].chars().all(|c| c.is_ascii_hexdigit());
    if well_formed {
        Ok(addr)
    } else {
        Err(ConfigError::InvalidAddress { value: addr })
    }
}
