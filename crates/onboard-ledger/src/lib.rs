//! # onboard-ledger — External Collaborators for Customer Onboarding
//!
//! Everything the onboarding session talks to across a trust boundary
//! lives here, behind object-safe traits with deterministic mocks:
//!
//! - **Customer registry** ([`registry`]): the pre-deployed smart contract
//!   that owns duplicate detection and durable storage. Two operations are
//!   consumed: a read-only duplicate probe and a state-changing
//!   registration write whose confirmation is awaited separately.
//! - **EVM client** ([`evm`]): JSON-RPC implementation of the registry
//!   trait. Transaction signing is delegated to the RPC endpoint's key
//!   management — this client holds no private keys.
//! - **Calldata encoding** ([`abi`]): strict ABI head/tail encoding for
//!   the two contract calls, and decoding of the boolean probe result.
//! - **Wallet bridge** ([`wallet`]): account connection and network
//!   identity/switching, consumed as capability calls.
//! - **Configuration** ([`config`]): chain profiles and the single
//!   externally-supplied contract address.
//!
//! ## Blocking Model
//!
//! Trait surfaces are synchronous. HTTP implementations block on the
//! ambient tokio runtime (`Handle::try_current().block_on`), so callers
//! inside a runtime must wrap calls in `spawn_blocking`.

pub mod abi;
pub mod config;
pub mod error;
pub mod evm;
pub mod registry;
pub mod wallet;

pub use config::{ChainProfile, ConfigError, RegistryConfig};
pub use error::{LedgerError, WalletError};
pub use evm::EvmCustomerRegistry;
pub use registry::{CustomerRegistry, MockCustomerRegistry, TxHash, TxStatus};
pub use wallet::{ensure_network, MockWalletBridge, WalletBridge};
