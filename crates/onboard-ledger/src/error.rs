//! Error types for the registry and wallet collaborators.
//!
//! Reasons are human-readable and surfaced verbatim to the user — the
//! session layer never rewrites or swallows them.

use crate::config::ConfigError;

/// Errors from customer-registry operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The RPC endpoint is unreachable, timed out, or returned a 5xx.
    #[error("registry unavailable: {reason}")]
    ServiceUnavailable {
        /// Human-readable description of the outage or transport error.
        reason: String,
    },

    /// The call was rejected before inclusion: the user declined the
    /// signature request, or the node refused the transaction.
    #[error("registration rejected: {reason}")]
    CallRejected {
        /// Rejection message from the wallet or node.
        reason: String,
    },

    /// The registration transaction was included but reverted on-chain.
    #[error("registration reverted on-chain: {reason}")]
    Reverted {
        /// Revert reason, when the node reports one.
        reason: String,
    },

    /// No transaction with the given hash is known to the node.
    #[error("transaction not found: {tx_hash}")]
    TransactionNotFound {
        /// The hash that was queried.
        tx_hash: String,
    },

    /// A transaction hash or address failed format validation.
    #[error("invalid address or hash: {value}")]
    InvalidAddress {
        /// The offending value.
        value: String,
    },

    /// The node answered with something the client cannot interpret.
    #[error("invalid registry response: {reason}")]
    InvalidResponse {
        /// What was wrong with the response.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the wallet collaborator.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No wallet is available in this environment.
    #[error("wallet not detected")]
    NotDetected,

    /// The user declined the connection or signature request.
    #[error("request rejected by the user")]
    UserRejected,

    /// The wallet does not know the requested chain (analogous to EIP-1193
    /// error 4902); callers may add the chain and retry the switch.
    #[error("chain {chain_id} is not known to the wallet")]
    UnknownChain {
        /// The chain ID that was requested.
        chain_id: u64,
    },

    /// The wallet is connected to a different network than required.
    #[error("wallet is on chain {actual}, expected chain {expected}")]
    WrongNetwork {
        /// The chain the wallet is currently on.
        actual: u64,
        /// The chain the workflow requires.
        expected: u64,
    },

    /// Transport failure talking to the wallet.
    #[error("wallet transport error: {reason}")]
    Transport {
        /// Human-readable description of the failure.
        reason: String,
    },
}
