//! # Integration Tests for the EVM Customer Registry
//!
//! Tests the JSON-RPC registry client against wiremock servers to verify
//! request construction, response parsing, and error handling without a
//! live node.
//!
//! ## Note on `spawn_blocking`
//!
//! The registry trait methods are synchronous and use `Handle::block_on`
//! internally. This cannot be called from within a Tokio runtime context.
//! All sync registry calls are wrapped in `tokio::task::spawn_blocking`
//! to run them on a dedicated blocking thread pool.

use std::sync::Arc;

use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use onboard_core::{CustomerForm, CustomerId, CustomerRecord, EddAnswers, NormalizedName};
use onboard_ledger::{
    CustomerRegistry, EvmCustomerRegistry, LedgerError, RegistryConfig, TxHash, TxStatus,
};

const CONTRACT: &str = "0x00000000000000000000000000000000000000c1";
const SENDER: &str = "0x00000000000000000000000000000000000000aa";

fn registry(server: &MockServer) -> Arc<EvmCustomerRegistry> {
    let config = RegistryConfig::new(server.uri(), CONTRACT, SENDER).expect("valid config");
    Arc::new(EvmCustomerRegistry::new(config).expect("registry build"))
}

fn sample_record() -> CustomerRecord {
    let form = CustomerForm {
        customer_id: "CUST-0001".into(),
        full_name: "  John   Smith ".into(),
        home_address: "1 Main St".into(),
        identification_number: "P-12345".into(),
        occupation: "Engineer".into(),
        is_pep: false,
        expected_monthly_usd: "5000".into(),
        expected_activity: "savings and remittances".into(),
        photo: Some(vec![0xAB; 64]),
    };
    form.to_record().expect("valid form")
}

fn bool_result_word(value: bool) -> String {
    let mut word = "0".repeat(63);
    word.push(if value { '1' } else { '0' });
    format!("0x{word}")
}

// ── Duplicate probe (eth_call) ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn probe_decodes_true_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({"method": "eth_call"})))
        // Calldata must carry the isRegistered selector.
        .and(body_string_contains("0x19a0967d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": bool_result_word(true),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let duplicate = tokio::task::spawn_blocking(move || {
        let id = CustomerId::new("CUST-0001").expect("valid id");
        let name = NormalizedName::new("john smith").expect("valid name");
        registry.is_registered(&id, &name)
    })
    .await
    .expect("task")
    .expect("probe");

    assert!(duplicate);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn probe_decodes_false_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"method": "eth_call"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": bool_result_word(false),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let duplicate = tokio::task::spawn_blocking(move || {
        let id = CustomerId::new("CUST-0002").expect("valid id");
        let name = NormalizedName::new("jane doe").expect("valid name");
        registry.is_registered(&id, &name)
    })
    .await
    .expect("task")
    .expect("probe");

    assert!(!duplicate);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn probe_outage_is_an_error_not_false() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let result = tokio::task::spawn_blocking(move || {
        let id = CustomerId::new("CUST-0003").expect("valid id");
        let name = NormalizedName::new("a b").expect("valid name");
        registry.is_registered(&id, &name)
    })
    .await
    .expect("task");

    assert!(matches!(
        result,
        Err(LedgerError::ServiceUnavailable { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn probe_rpc_error_carries_node_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "execution reverted"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let result = tokio::task::spawn_blocking(move || {
        let id = CustomerId::new("CUST-0004").expect("valid id");
        let name = NormalizedName::new("a b").expect("valid name");
        registry.is_registered(&id, &name)
    })
    .await
    .expect("task");

    match result {
        Err(LedgerError::CallRejected { reason }) => {
            assert_eq!(reason, "execution reverted");
        }
        other => panic!("expected CallRejected, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn probe_rejects_malformed_result_word() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "0x1234"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let result = tokio::task::spawn_blocking(move || {
        let id = CustomerId::new("CUST-0005").expect("valid id");
        let name = NormalizedName::new("a b").expect("valid name");
        registry.is_registered(&id, &name)
    })
    .await
    .expect("task");

    assert!(matches!(result, Err(LedgerError::InvalidResponse { .. })));
}

// ── Registration write (eth_sendTransaction) ─────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_write_returns_tx_hash() {
    let server = MockServer::start().await;
    let tx_hash = format!("0x{}", "ef".repeat(32));

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({"method": "eth_sendTransaction"}),
        ))
        // Calldata must carry the registerCustomer selector and the sender.
        .and(body_string_contains("0xb81b95a7"))
        .and(body_string_contains(SENDER))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": tx_hash,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let returned = tokio::task::spawn_blocking(move || {
        registry.register_customer(&sample_record(), &EddAnswers::default())
    })
    .await
    .expect("task")
    .expect("write");

    assert_eq!(returned.as_str(), format!("0x{}", "ef".repeat(32)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_write_rejection_surfaces_wallet_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4001, "message": "user denied transaction signature"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let result = tokio::task::spawn_blocking(move || {
        registry.register_customer(&sample_record(), &EddAnswers::default())
    })
    .await
    .expect("task");

    match result {
        Err(LedgerError::CallRejected { reason }) => {
            assert_eq!(reason, "user denied transaction signature");
        }
        other => panic!("expected CallRejected, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_write_rejects_malformed_hash() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "not-a-hash"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let result = tokio::task::spawn_blocking(move || {
        registry.register_customer(&sample_record(), &EddAnswers::default())
    })
    .await
    .expect("task");

    assert!(matches!(result, Err(LedgerError::InvalidAddress { .. })));
}

// ── Confirmation polling (eth_getTransactionReceipt) ─────────────────────

fn well_formed_hash() -> TxHash {
    TxHash::new(format!("0x{}", "ab".repeat(32))).expect("valid hash")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn null_receipt_is_pending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({"method": "eth_getTransactionReceipt"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let status =
        tokio::task::spawn_blocking(move || registry.transaction_status(&well_formed_hash()))
            .await
            .expect("task")
            .expect("status");

    assert_eq!(status, TxStatus::Pending);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn successful_receipt_is_confirmed_with_block() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"status": "0x1", "blockNumber": "0x10"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let status =
        tokio::task::spawn_blocking(move || registry.transaction_status(&well_formed_hash()))
            .await
            .expect("task")
            .expect("status");

    assert_eq!(status, TxStatus::Confirmed { block_number: 16 });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_receipt_is_reverted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"status": "0x0", "blockNumber": "0x10"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry(&server);
    let status =
        tokio::task::spawn_blocking(move || registry.transaction_status(&well_formed_hash()))
            .await
            .expect("task")
            .expect("status");

    assert_eq!(status, TxStatus::Reverted);
}
