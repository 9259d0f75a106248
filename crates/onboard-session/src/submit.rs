//! # Registration Submission Lifecycle
//!
//! Drives a validated record through broadcast and confirmation, reporting
//! each phase to an observer as it happens. The submitter is the last line
//! of defense for the diligence gate: a high-risk record with unchecked
//! items is refused here even if a caller bypassed the gate.
//!
//! ## Phases
//!
//! ```text
//! Submitting ──▶ Pending(tx) ──▶ Confirmed(tx, block)
//!      │              │
//!      └──────────────┴──▶ Failed(reason)
//! ```
//!
//! Confirmation is polled at a configurable interval with no timeout; a
//! transaction that is never mined keeps the submission in `Pending`, the
//! same open-ended wait a block explorer shows.

use std::time::Duration;

use onboard_core::{classify, CustomerRecord, EddAnswers, RiskTier};
use onboard_ledger::{CustomerRegistry, LedgerError, TxHash, TxStatus};

use crate::error::OnboardingError;

/// Phase of an in-flight registration, reported to observers in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// The write is being handed to the registry for signing.
    Submitting,
    /// Broadcast accepted; waiting for inclusion in a block.
    Pending {
        /// The transaction being awaited.
        tx_hash: TxHash,
    },
    /// Included and executed successfully.
    Confirmed {
        /// The confirmed transaction.
        tx_hash: TxHash,
        /// The block it was included in.
        block_number: u64,
    },
    /// The submission failed; the reason is surfaced verbatim.
    Failed {
        /// Rejection or revert reason.
        reason: String,
    },
}

impl std::fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitting => write!(f, "Submitting registration..."),
            Self::Pending { tx_hash } => {
                write!(f, "Transaction {tx_hash} pending confirmation...")
            }
            Self::Confirmed {
                tx_hash,
                block_number,
            } => write!(f, "Transaction {tx_hash} confirmed in block {block_number}."),
            Self::Failed { reason } => write!(f, "Registration failed: {reason}"),
        }
    }
}

/// Observer notified of each phase change during submission.
///
/// Implemented for any `FnMut(&SubmissionPhase)`, so a closure works:
///
/// ```
/// # use onboard_session::SubmissionPhase;
/// let mut phases = Vec::new();
/// let mut observer = |phase: &SubmissionPhase| phases.push(phase.clone());
/// # let _ = &mut observer;
/// ```
pub trait PhaseObserver {
    /// Called once per phase change, in lifecycle order.
    fn phase(&mut self, phase: &SubmissionPhase);
}

impl<F: FnMut(&SubmissionPhase)> PhaseObserver for F {
    fn phase(&mut self, phase: &SubmissionPhase) {
        self(phase)
    }
}

/// Proof of a confirmed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// The confirmed transaction.
    pub tx_hash: TxHash,
    /// The block the transaction was included in.
    pub block_number: u64,
    /// The tier the customer was registered under.
    pub tier: RiskTier,
}

/// Drives one registration write through broadcast and confirmation.
pub struct Submitter<'a> {
    registry: &'a dyn CustomerRegistry,
    poll_interval: Duration,
}

impl<'a> Submitter<'a> {
    /// Create a submitter polling confirmation at `poll_interval`.
    pub fn new(registry: &'a dyn CustomerRegistry, poll_interval: Duration) -> Self {
        Self {
            registry,
            poll_interval,
        }
    }

    /// Submit the record and block until it confirms or fails.
    ///
    /// Refuses high-risk records whose checklist is not fully confirmed,
    /// before anything reaches the registry. This duplicates the gate in
    /// the session so no call path can skip it.
    ///
    /// # Errors
    ///
    /// [`OnboardingError::ChecklistIncomplete`] for an ungated high-risk
    /// record; otherwise the registry error that ended the submission.
    /// Every failure is also reported to the observer as a
    /// [`SubmissionPhase::Failed`].
    pub fn submit(
        &self,
        record: &CustomerRecord,
        edd: &EddAnswers,
        observer: &mut dyn PhaseObserver,
    ) -> Result<RegistrationReceipt, OnboardingError> {
        let tier = classify(record.is_pep, record.expected_monthly_usd);
        if tier == RiskTier::High && !edd.all_confirmed() {
            return Err(OnboardingError::ChecklistIncomplete);
        }

        observer.phase(&SubmissionPhase::Submitting);
        tracing::info!(
            customer_id = %record.customer_id,
            %tier,
            registry = self.registry.registry_name(),
            "submitting registration"
        );

        let tx_hash = match self.registry.register_customer(record, edd) {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                observer.phase(&SubmissionPhase::Failed {
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };

        self.await_confirmation(tx_hash, tier, observer)
    }

    fn await_confirmation(
        &self,
        tx_hash: TxHash,
        tier: RiskTier,
        observer: &mut dyn PhaseObserver,
    ) -> Result<RegistrationReceipt, OnboardingError> {
        let mut reported_pending = false;
        loop {
            match self.registry.transaction_status(&tx_hash) {
                Ok(TxStatus::Pending) => {
                    if !reported_pending {
                        observer.phase(&SubmissionPhase::Pending {
                            tx_hash: tx_hash.clone(),
                        });
                        reported_pending = true;
                    }
                    std::thread::sleep(self.poll_interval);
                }
                Ok(TxStatus::Confirmed { block_number }) => {
                    observer.phase(&SubmissionPhase::Confirmed {
                        tx_hash: tx_hash.clone(),
                        block_number,
                    });
                    tracing::info!(%tx_hash, block_number, "registration confirmed");
                    return Ok(RegistrationReceipt {
                        tx_hash,
                        block_number,
                        tier,
                    });
                }
                Ok(TxStatus::Reverted) => {
                    // The receipt carries no revert reason; report only
                    // what the node told us.
                    let err = LedgerError::Reverted {
                        reason: "no reason reported by the node".to_string(),
                    };
                    observer.phase(&SubmissionPhase::Failed {
                        reason: err.to_string(),
                    });
                    return Err(err.into());
                }
                Err(err) => {
                    observer.phase(&SubmissionPhase::Failed {
                        reason: err.to_string(),
                    });
                    return Err(err.into());
                }
            }
        }
    }
}
