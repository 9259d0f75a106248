//! Errors surfaced by the onboarding workflow.
//!
//! Collaborator errors pass through transparently so their reasons reach
//! the user verbatim; the variants added here cover workflow rules the
//! session itself enforces.

use onboard_core::ValidationError;
use onboard_ledger::{LedgerError, WalletError};

/// Errors from the onboarding session.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    /// The form failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The ledger already holds this `(customer_id, full_name)` pair.
    #[error("Customer is already registered on the ledger.")]
    DuplicateCustomer,

    /// A wallet operation failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// A registry operation failed. Includes the duplicate probe: an
    /// unreachable ledger aborts the attempt, it is never treated as
    /// "not a duplicate".
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A high-risk registration was confirmed with unchecked checklist
    /// items.
    #[error("Complete all enhanced due diligence items before confirming.")]
    ChecklistIncomplete,

    /// A checklist operation was attempted with no registration awaiting
    /// one.
    #[error("No registration is awaiting the due diligence checklist.")]
    NoPendingChecklist,

    /// A second submission was attempted while one is in flight.
    #[error("A registration is already in progress.")]
    SubmissionInFlight,
}
