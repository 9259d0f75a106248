//! # Customer Registry — Trait Interface and Mock
//!
//! The registry is the external ledger collaborator that owns duplicate
//! detection, durable storage, and authorization. This module defines the
//! trait the session layer programs against and a deterministic in-memory
//! mock for tests and development.
//!
//! ## Operations Consumed
//!
//! - **is_registered**: read-only duplicate probe keyed on the
//!   `(customer_id, normalized_full_name)` pair. Authoritative; a `true`
//!   result aborts the registration attempt.
//! - **register_customer**: state-changing write. Returns a transaction
//!   handle; the caller awaits confirmation separately via
//!   **transaction_status**.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use onboard_core::{CustomerId, CustomerRecord, EddAnswers, NormalizedName};

use crate::error::LedgerError;

/// An EVM transaction hash (0x + 64 hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TxHash(String);

impl TxHash {
    /// Create a transaction hash, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAddress`] if the value is not
    /// `0x` + 64 hex characters.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerError> {
        let s = value.into();
        let well_formed = s.len() == 66
            && s.starts_with("0x")
            && s[2..].chars().all(|c| c.is_ascii_hexdigit());
        if well_formed {
            Ok(Self(s))
        } else {
            Err(LedgerError::InvalidAddress { value: s })
        }
    }

    /// Access the hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Status of a registration transaction as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Accepted by the network, not yet included in a block.
    Pending,
    /// Included in a block and executed successfully.
    Confirmed {
        /// The block the transaction was included in.
        block_number: u64,
    },
    /// Included in a block but reverted by the contract.
    Reverted,
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Confirmed { block_number } => write!(f, "Confirmed in block {block_number}"),
            Self::Reverted => write!(f, "Reverted"),
        }
    }
}

/// Trait interface for the on-chain customer registry.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// threads behind an `Arc`. The trait is object-safe to support runtime
/// selection (mock vs. live JSON-RPC).
///
/// Failures are never swallowed: a duplicate probe that cannot reach the
/// ledger is an error, not a `false`.
pub trait CustomerRegistry: Send + Sync {
    /// Read-only duplicate probe for the `(customer_id, full_name)` pair.
    fn is_registered(
        &self,
        customer_id: &CustomerId,
        full_name: &NormalizedName,
    ) -> Result<bool, LedgerError>;

    /// Submit the registration write. Returns the transaction handle;
    /// confirmation must be awaited separately via
    /// [`transaction_status`](Self::transaction_status).
    fn register_customer(
        &self,
        record: &CustomerRecord,
        edd: &EddAnswers,
    ) -> Result<TxHash, LedgerError>;

    /// Query the current status of a previously submitted registration.
    fn transaction_status(&self, tx_hash: &TxHash) -> Result<TxStatus, LedgerError>;

    /// Human-readable name of this registry implementation.
    fn registry_name(&self) -> &str;
}

/// Deterministic in-memory registry for tests and development.
///
/// Behavior is configured through builder methods:
/// - [`with_registered`](Self::with_registered) seeds the duplicate set;
/// - [`reject_writes`](Self::reject_writes) makes every write fail before
///   broadcast (the wallet-rejection path);
/// - [`revert_on_chain`](Self::revert_on_chain) confirms inclusion but
///   reports the transaction as reverted;
/// - [`fail_reads`](Self::fail_reads) makes the duplicate probe
///   unreachable;
/// - [`confirm_after_polls`](Self::confirm_after_polls) keeps a
///   transaction `Pending` for the first N status queries.
///
/// Successful writes are recorded in the duplicate set, so a second
/// registration of the same pair probes as a duplicate.
#[derive(Debug, Default)]
pub struct MockCustomerRegistry {
    state: Mutex<MockState>,
    reject_writes: Option<String>,
    revert_on_chain: bool,
    fail_reads: bool,
    confirm_after_polls: u64,
}

#[derive(Debug, Default)]
struct MockState {
    registered: HashSet<(String, String)>,
    write_calls: u64,
    last_submitted_answers: Option<EddAnswers>,
    polls: HashMap<String, u64>,
}

impl MockCustomerRegistry {
    /// Empty registry: no duplicates, instant confirmation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a `(customer_id, normalized_full_name)` pair as registered.
    pub fn with_registered(self, customer_id: &str, full_name: &str) -> Self {
        self.state
            .lock()
            .registered
            .insert((customer_id.to_string(), full_name.to_string()));
        self
    }

    /// Reject every write with the given reason before broadcast.
    pub fn reject_writes(mut self, reason: impl Into<String>) -> Self {
        self.reject_writes = Some(reason.into());
        self
    }

    /// Confirm inclusion, but report the transaction as reverted.
    pub fn revert_on_chain(mut self) -> Self {
        self.revert_on_chain = true;
        self
    }

    /// Make the duplicate probe fail as unreachable.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Report `Pending` for the first `polls` status queries per
    /// transaction.
    pub fn confirm_after_polls(mut self, polls: u64) -> Self {
        self.confirm_after_polls = polls;
        self
    }

    /// Number of write calls that reached this registry. Lets tests assert
    /// that gated registrations never produced a ledger write.
    pub fn write_calls(&self) -> u64 {
        self.state.lock().write_calls
    }

    /// The diligence answers carried by the most recent write, rejected
    /// or not. Lets tests assert exactly what reached the ledger.
    pub fn last_submitted_answers(&self) -> Option<EddAnswers> {
        self.state.lock().last_submitted_answers
    }

    /// Whether a pair has been registered (seeded or written).
    pub fn contains(&self, customer_id: &str, full_name: &str) -> bool {
        self.state
            .lock()
            .registered
            .contains(&(customer_id.to_string(), full_name.to_string()))
    }

    fn tx_hash_for(write_index: u64) -> TxHash {
        // Deterministic, well-formed hash derived from the write counter.
        TxHash(format!("0x{:064x}", 0xabc0_0000_u64 + write_index))
    }
}

impl CustomerRegistry for MockCustomerRegistry {
    fn is_registered(
        &self,
        customer_id: &CustomerId,
        full_name: &NormalizedName,
    ) -> Result<bool, LedgerError> {
        if self.fail_reads {
            return Err(LedgerError::ServiceUnavailable {
                reason: "mock registry: reads disabled".to_string(),
            });
        }
        Ok(self.contains(customer_id.as_str(), full_name.as_str()))
    }

    fn register_customer(
        &self,
        record: &CustomerRecord,
        edd: &EddAnswers,
    ) -> Result<TxHash, LedgerError> {
        let mut state = self.state.lock();
        state.write_calls += 1;
        state.last_submitted_answers = Some(*edd);

        if let Some(reason) = &self.reject_writes {
            return Err(LedgerError::CallRejected {
                reason: reason.clone(),
            });
        }

        state.registered.insert((
            record.customer_id.as_str().to_string(),
            record.full_name.as_str().to_string(),
        ));
        Ok(Self::tx_hash_for(state.write_calls))
    }

    fn transaction_status(&self, tx_hash: &TxHash) -> Result<TxStatus, LedgerError> {
        let mut state = self.state.lock();
        let polls = state.polls.entry(tx_hash.as_str().to_string()).or_insert(0);
        *polls += 1;
        if *polls <= self.confirm_after_polls {
            return Ok(TxStatus::Pending);
        }
        if self.revert_on_chain {
            return Ok(TxStatus::Reverted);
        }
        Ok(TxStatus::Confirmed {
            block_number: 100 + state.write_calls,
        })
    }

    fn registry_name(&self) -> &str {
        "MockCustomerRegistry"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::{CustomerForm, PhotoDigest};

    fn record(id: &str, name: &str) -> CustomerRecord {
        CustomerRecord {
            customer_id: CustomerId::new(id).unwrap(),
            full_name: NormalizedName::new(name).unwrap(),
            home_address: "1 Main St".into(),
            identification_number: "P1".into(),
            occupation: "Engineer".into(),
            is_pep: false,
            expected_monthly_usd: 5000,
            expected_activity: "savings".into(),
            photo_digest: PhotoDigest::from_image_bytes(b"photo"),
        }
    }

    // -- TxHash --

    #[test]
    fn tx_hash_accepts_well_formed_values() {
        let hash = TxHash::new(format!("0x{}", "ab".repeat(32))).unwrap();
        assert_eq!(hash.as_str().len(), 66);
    }

    #[test]
    fn tx_hash_rejects_malformed_values() {
        assert!(TxHash::new("").is_err());
        assert!(TxHash::new("0x1234").is_err());
        assert!(TxHash::new(format!("0x{}", "zz".repeat(32))).is_err());
        assert!(TxHash::new("ab".repeat(33)).is_err());
    }

    #[test]
    fn tx_hash_deserialize_validates() {
        let good = format!("\"0x{}\"", "0".repeat(64));
        assert!(serde_json::from_str::<TxHash>(&good).is_ok());
        assert!(serde_json::from_str::<TxHash>("\"0xnope\"").is_err());
    }

    // -- TxStatus --

    #[test]
    fn tx_status_display() {
        assert_eq!(TxStatus::Pending.to_string(), "Pending");
        assert_eq!(
            TxStatus::Confirmed { block_number: 42 }.to_string(),
            "Confirmed in block 42"
        );
        assert_eq!(TxStatus::Reverted.to_string(), "Reverted");
    }

    // -- MockCustomerRegistry --

    #[test]
    fn mock_probe_reflects_seeded_duplicates() {
        let registry = MockCustomerRegistry::new().with_registered("CUST-1", "john smith");
        let id = CustomerId::new("CUST-1").unwrap();
        let name = NormalizedName::new("John   SMITH").unwrap();
        assert!(registry.is_registered(&id, &name).unwrap());

        let other = CustomerId::new("CUST-2").unwrap();
        assert!(!registry.is_registered(&other, &name).unwrap());
    }

    #[test]
    fn mock_write_then_probe_is_duplicate() {
        let registry = MockCustomerRegistry::new();
        let rec = record("CUST-9", "jane doe");
        registry
            .register_customer(&rec, &EddAnswers::default())
            .unwrap();
        assert!(registry
            .is_registered(&rec.customer_id, &rec.full_name)
            .unwrap());
        assert_eq!(registry.write_calls(), 1);
    }

    #[test]
    fn mock_records_the_answers_each_write_carried() {
        let registry = MockCustomerRegistry::new();
        assert_eq!(registry.last_submitted_answers(), None);

        let confirmed = EddAnswers {
            source_of_income_collected: true,
            site_visit_completed: true,
            family_and_associates_screened: true,
        };
        registry
            .register_customer(&record("CUST-7", "a b"), &confirmed)
            .unwrap();
        assert_eq!(registry.last_submitted_answers(), Some(confirmed));

        registry
            .register_customer(&record("CUST-8", "c d"), &EddAnswers::default())
            .unwrap();
        assert_eq!(
            registry.last_submitted_answers(),
            Some(EddAnswers::default())
        );
    }

    #[test]
    fn mock_write_confirms_with_block_reference() {
        let registry = MockCustomerRegistry::new();
        let tx = registry
            .register_customer(&record("CUST-1", "a b"), &EddAnswers::default())
            .unwrap();
        match registry.transaction_status(&tx).unwrap() {
            TxStatus::Confirmed { block_number } => assert!(block_number > 0),
            other => panic!("expected Confirmed, got {other:?}"),
        }
    }

    #[test]
    fn mock_confirm_after_polls_reports_pending_first() {
        let registry = MockCustomerRegistry::new().confirm_after_polls(2);
        let tx = registry
            .register_customer(&record("CUST-1", "a b"), &EddAnswers::default())
            .unwrap();
        assert_eq!(registry.transaction_status(&tx).unwrap(), TxStatus::Pending);
        assert_eq!(registry.transaction_status(&tx).unwrap(), TxStatus::Pending);
        assert!(matches!(
            registry.transaction_status(&tx).unwrap(),
            TxStatus::Confirmed { .. }
        ));
    }

    #[test]
    fn mock_reject_writes_surfaces_reason() {
        let registry = MockCustomerRegistry::new().reject_writes("user denied signature");
        let result = registry.register_customer(&record("CUST-1", "a b"), &EddAnswers::default());
        match result {
            Err(LedgerError::CallRejected { reason }) => {
                assert_eq!(reason, "user denied signature");
            }
            other => panic!("expected CallRejected, got {other:?}"),
        }
    }

    #[test]
    fn mock_revert_on_chain() {
        let registry = MockCustomerRegistry::new().revert_on_chain();
        let tx = registry
            .register_customer(&record("CUST-1", "a b"), &EddAnswers::default())
            .unwrap();
        assert_eq!(
            registry.transaction_status(&tx).unwrap(),
            TxStatus::Reverted
        );
    }

    #[test]
    fn mock_fail_reads_propagates_not_swallows() {
        let registry = MockCustomerRegistry::new().fail_reads();
        let id = CustomerId::new("CUST-1").unwrap();
        let name = NormalizedName::new("a b").unwrap();
        assert!(matches!(
            registry.is_registered(&id, &name),
            Err(LedgerError::ServiceUnavailable { .. })
        ));
    }

    #[test]
    fn trait_is_object_safe() {
        let registry: Box<dyn CustomerRegistry> = Box::new(MockCustomerRegistry::new());
        assert_eq!(registry.registry_name(), "MockCustomerRegistry");
    }

    #[test]
    fn normalized_form_input_probes_against_mock() {
        // End-to-end shape check: a validated form record probes the mock
        // with the normalized name key.
        let form = CustomerForm {
            customer_id: "CUST-0001".into(),
            full_name: "  John   Smith ".into(),
            home_address: "1 Main St".into(),
            identification_number: "P1".into(),
            occupation: "Engineer".into(),
            is_pep: false,
            expected_monthly_usd: "5000".into(),
            expected_activity: "savings".into(),
            photo: Some(vec![1]),
        };
        let rec = form.to_record().unwrap();
        let registry = MockCustomerRegistry::new().with_registered("CUST-0001", "john smith");
        assert!(registry
            .is_registered(&rec.customer_id, &rec.full_name)
            .unwrap());
    }
}
