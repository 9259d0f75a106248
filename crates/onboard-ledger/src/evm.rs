//! # EVM JSON-RPC Customer Registry
//!
//! Live [`CustomerRegistry`] implementation backed by the pre-deployed
//! registry contract on an EVM chain, via JSON-RPC.
//!
//! ## How It Works
//!
//! 1. The duplicate probe calls the contract's `isRegistered` view via
//!    `eth_call` and decodes the single boolean word.
//! 2. The registration write calls `registerCustomer` via
//!    `eth_sendTransaction`. The JSON-RPC endpoint handles transaction
//!    signing; the `from` address must be unlocked or managed by the RPC
//!    provider's signing service.
//! 3. Status checks use `eth_getTransactionReceipt`: a null receipt is
//!    `Pending`, status `0x0` is `Reverted`, otherwise `Confirmed` with
//!    the inclusion block.
//!
//! ## Security
//!
//! - The client does NOT hold private keys. Transaction signing is
//!   delegated to the RPC endpoint's key management (HSM, KMS, or
//!   unlocked account).
//! - The `from` address must be funded with sufficient native token for
//!   gas.
//! - All RPC calls use HTTPS in production.

use onboard_core::{CustomerId, CustomerRecord, EddAnswers, NormalizedName};

use crate::abi;
use crate::config::RegistryConfig;
use crate::error::LedgerError;
use crate::registry::{CustomerRegistry, TxHash, TxStatus};

/// EVM JSON-RPC customer registry.
///
/// The trait surface is synchronous; each call blocks on the ambient
/// tokio runtime. Callers already inside a runtime must wrap calls in
/// `spawn_blocking`.
#[derive(Debug)]
pub struct EvmCustomerRegistry {
    client: reqwest::Client,
    config: RegistryConfig,
}

impl EvmCustomerRegistry {
    /// Create a registry client from configuration.
    ///
    /// Addresses and the RPC URL are validated when the
    /// [`RegistryConfig`] is constructed; this only builds the HTTP
    /// client.
    pub fn new(config: RegistryConfig) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LedgerError::ServiceUnavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    /// Send a JSON-RPC request and return the result field.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, LedgerError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        tracing::debug!(method, rpc_url = %self.config.rpc_url, "JSON-RPC request");

        let resp = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LedgerError::ServiceUnavailable {
                        reason: format!("{method}: request timed out"),
                    }
                } else {
                    LedgerError::ServiceUnavailable {
                        reason: format!("{method}: {e}"),
                    }
                }
            })?;

        if !resp.status().is_success() {
            return Err(LedgerError::ServiceUnavailable {
                reason: format!("{method}: HTTP {}", resp.status()),
            });
        }

        let json: serde_json::Value =
            resp.json().await.map_err(|e| LedgerError::InvalidResponse {
                reason: format!("{method}: invalid JSON response: {e}"),
            })?;

        // Check for JSON-RPC error.
        if let Some(error) = json.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error");
            return Err(LedgerError::CallRejected {
                reason: msg.to_string(),
            });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| LedgerError::InvalidResponse {
                reason: format!("{method}: JSON-RPC response missing 'result' field"),
            })
    }

    async fn probe_duplicate(
        &self,
        customer_id: &CustomerId,
        full_name: &NormalizedName,
    ) -> Result<bool, LedgerError> {
        let call = serde_json::json!({
            "to": self.config.contract_address,
            "data": abi::encode_is_registered(customer_id, full_name),
        });
        let result = self
            .rpc_call("eth_call", serde_json::json!([call, "latest"]))
            .await?;
        let hex_word = result.as_str().ok_or_else(|| LedgerError::InvalidResponse {
            reason: "eth_call returned non-string result".to_string(),
        })?;
        abi::decode_bool_word(hex_word)
    }

    async fn send_registration_tx(
        &self,
        record: &CustomerRecord,
        edd: &EddAnswers,
    ) -> Result<TxHash, LedgerError> {
        let tx = serde_json::json!({
            "from": self.config.from_address,
            "to": self.config.contract_address,
            "data": abi::encode_register_customer(record, edd),
        });

        let result = self
            .rpc_call("eth_sendTransaction", serde_json::json!([tx]))
            .await?;

        let hash = result.as_str().ok_or_else(|| LedgerError::InvalidResponse {
            reason: "eth_sendTransaction returned non-string result".to_string(),
        })?;
        TxHash::new(hash)
    }

    async fn receipt_status(&self, tx_hash: &TxHash) -> Result<TxStatus, LedgerError> {
        let receipt = self
            .rpc_call(
                "eth_getTransactionReceipt",
                serde_json::json!([tx_hash.as_str()]),
            )
            .await?;

        // Null receipt means the transaction is still pending.
        if receipt.is_null() {
            return Ok(TxStatus::Pending);
        }

        let status_hex = receipt
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("0x0");
        if status_hex == "0x0" {
            return Ok(TxStatus::Reverted);
        }

        let block_number = receipt
            .get("blockNumber")
            .and_then(|b| b.as_str())
            .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
            .unwrap_or(0);

        Ok(TxStatus::Confirmed { block_number })
    }

    fn runtime_handle(&self) -> Result<tokio::runtime::Handle, LedgerError> {
        tokio::runtime::Handle::try_current().map_err(|_| LedgerError::ServiceUnavailable {
            reason: "no async runtime available".to_string(),
        })
    }
}

impl CustomerRegistry for EvmCustomerRegistry {
    fn is_registered(
        &self,
        customer_id: &CustomerId,
        full_name: &NormalizedName,
    ) -> Result<bool, LedgerError> {
        let rt = self.runtime_handle()?;
        rt.block_on(self.probe_duplicate(customer_id, full_name))
    }

    fn register_customer(
        &self,
        record: &CustomerRecord,
        edd: &EddAnswers,
    ) -> Result<TxHash, LedgerError> {
        let rt = self.runtime_handle()?;
        let tx_hash = rt.block_on(self.send_registration_tx(record, edd))?;
        tracing::info!(
            tx_hash = %tx_hash,
            customer_id = %record.customer_id,
            "registration transaction broadcast"
        );
        Ok(tx_hash)
    }

    fn transaction_status(&self, tx_hash: &TxHash) -> Result<TxStatus, LedgerError> {
        let rt = self.runtime_handle()?;
        rt.block_on(self.receipt_status(tx_hash))
    }

    fn registry_name(&self) -> &str {
        &self.config.chain.chain_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x0000000000000000000000000000000000000001";
    const SENDER: &str = "0x0000000000000000000000000000000000000002";

    #[test]
    fn registry_builds_with_valid_config() {
        let config = RegistryConfig::new("https://rpc.example.com", CONTRACT, SENDER)
            .expect("valid config");
        let registry = EvmCustomerRegistry::new(config).expect("should build");
        assert_eq!(registry.registry_name(), "Sepolia");
    }

    #[test]
    fn registry_is_debug() {
        let config = RegistryConfig::new("https://rpc.example.com", CONTRACT, SENDER)
            .expect("valid config");
        let registry = EvmCustomerRegistry::new(config).expect("should build");
        let debug = format!("{registry:?}");
        assert!(debug.contains("EvmCustomerRegistry"));
    }

    #[test]
    fn calls_outside_a_runtime_fail_cleanly() {
        let config = RegistryConfig::new("https://rpc.example.com", CONTRACT, SENDER)
            .expect("valid config");
        let registry = EvmCustomerRegistry::new(config).expect("should build");
        let id = CustomerId::new("CUST-1").unwrap();
        let name = NormalizedName::new("a b").unwrap();
        assert!(matches!(
            registry.is_registered(&id, &name),
            Err(LedgerError::ServiceUnavailable { .. })
        ));
    }
}
