//! # Enhanced Due Diligence Checklist Gate
//!
//! High-risk registrations must pass a three-item due diligence checklist
//! before the ledger write. The gate is a typestate machine: the states
//! are distinct types, so confirming a checklist that was never opened is
//! a compile error, not a runtime check.
//!
//! ## States
//!
//! - `Idle` → no registration is awaiting diligence.
//! - `AwaitingChecklist` → a validated registration is parked, holding
//!   the record and the current checklist answers.
//!
//! ## Transitions
//!
//! ```text
//! Idle ──open(pending)──▶ AwaitingChecklist ──confirm()──▶ Ready
//!                               │    ▲                       │
//!                               │    └──(incomplete)─────────┘
//!                               └──cancel()──▶ Idle
//! ```
//!
//! `confirm` re-reads the answers at the moment of confirmation — the
//! gate releases only if every item is checked right then, regardless of
//! what was recorded earlier.

use std::marker::PhantomData;

use onboard_core::{CustomerRecord, EddAnswers, RiskTier};

// ─── State Types ─────────────────────────────────────────────────────

/// Gate state: no registration awaiting diligence.
#[derive(Debug, Clone, Copy)]
pub struct Idle;

/// Gate state: a registration is parked behind the checklist.
#[derive(Debug, Clone, Copy)]
pub struct AwaitingChecklist;

mod private {
    pub trait Sealed {}
    impl Sealed for super::Idle {}
    impl Sealed for super::AwaitingChecklist {}
}

/// Marker trait for valid gate states. Sealed — only the two states
/// defined in this module implement it.
pub trait GateState: private::Sealed + std::fmt::Debug {
    /// Canonical state name.
    fn name() -> &'static str;
}

impl GateState for Idle {
    fn name() -> &'static str {
        "IDLE"
    }
}
impl GateState for AwaitingChecklist {
    fn name() -> &'static str {
        "AWAITING_CHECKLIST"
    }
}

// ─── Pending Registration ────────────────────────────────────────────

/// A validated registration parked behind the checklist: the normalized
/// record plus the tier that sent it here.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRegistration {
    /// The validated, normalized customer record.
    pub record: CustomerRecord,
    /// The tier assigned at classification time.
    pub tier: RiskTier,
}

// ─── The Gate ────────────────────────────────────────────────────────

/// The due diligence gate, parameterized by its state.
///
/// `EddGate<Idle>` has `.open()`; `EddGate<AwaitingChecklist>` has
/// `.record()`, `.confirm()`, and `.cancel()`.
#[derive(Debug)]
pub struct EddGate<S: GateState> {
    pending: Option<PendingRegistration>,
    answers: EddAnswers,
    _state: PhantomData<S>,
}

impl<S: GateState> EddGate<S> {
    /// Canonical name of the current state.
    pub fn state_name(&self) -> &'static str {
        S::name()
    }
}

impl Default for EddGate<Idle> {
    fn default() -> Self {
        Self::new()
    }
}

impl EddGate<Idle> {
    /// A closed gate with nothing pending.
    pub fn new() -> Self {
        Self {
            pending: None,
            answers: EddAnswers::default(),
            _state: PhantomData,
        }
    }

    /// Park a registration behind the checklist. All items start
    /// unchecked, even if a previous gate on this session had answers
    /// recorded.
    pub fn open(self, pending: PendingRegistration) -> EddGate<AwaitingChecklist> {
        EddGate {
            pending: Some(pending),
            answers: EddAnswers::default(),
            _state: PhantomData,
        }
    }
}

/// Outcome of confirming the checklist.
#[derive(Debug)]
pub enum ChecklistOutcome {
    /// Every item is checked; the registration may proceed with these
    /// answers.
    Ready {
        /// The parked registration, released.
        pending: PendingRegistration,
        /// The confirmed answers, all true.
        answers: EddAnswers,
    },
    /// At least one item is unchecked; the gate stays closed.
    Incomplete(EddGate<AwaitingChecklist>),
}

impl EddGate<AwaitingChecklist> {
    /// Replace the recorded answers with the current checklist state.
    pub fn record(&mut self, answers: EddAnswers) {
        self.answers = answers;
    }

    /// The currently recorded answers.
    pub fn answers(&self) -> EddAnswers {
        self.answers
    }

    /// The parked registration.
    pub fn pending(&self) -> &PendingRegistration {
        // The only constructor for this state sets `pending`.
        self.pending
            .as_ref()
            .unwrap_or_else(|| unreachable!("AwaitingChecklist always holds a registration"))
    }

    /// Confirm the checklist, re-reading the answers at this moment.
    pub fn confirm(self) -> ChecklistOutcome {
        if self.answers.all_confirmed() {
            ChecklistOutcome::Ready {
                // Same invariant as `pending()`.
                pending: self
                    .pending
                    .unwrap_or_else(|| unreachable!("AwaitingChecklist always holds a registration")),
                answers: self.answers,
            }
        } else {
            ChecklistOutcome::Incomplete(self)
        }
    }

    /// Abandon the parked registration.
    pub fn cancel(self) -> EddGate<Idle> {
        EddGate::new()
    }
}
