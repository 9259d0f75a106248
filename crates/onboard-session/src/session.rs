//! # Onboarding Session
//!
//! Orchestrates one customer's journey: form validation, network and
//! account checks, the authoritative duplicate probe, risk classification,
//! the diligence gate for high-risk customers, and the registration write.
//!
//! One session serves one compliance officer working one form at a time;
//! the in-flight guard mirrors a disabled submit button, not a concurrency
//! primitive.

use std::time::Duration;

use onboard_core::{classify, CustomerForm, EddAnswers, RiskTier};
use onboard_ledger::{ensure_network, ChainProfile, CustomerRegistry, WalletBridge};

use crate::edd::{AwaitingChecklist, ChecklistOutcome, EddGate, PendingRegistration};
use crate::error::OnboardingError;
use crate::submit::{PhaseObserver, RegistrationReceipt, Submitter};

/// Result of a submission attempt that did not fail.
#[derive(Debug)]
pub enum RegistrationOutcome {
    /// The customer classified as high risk; the registration is parked
    /// behind the diligence checklist. Record answers and confirm to
    /// proceed.
    ChecklistRequired,
    /// The registration confirmed on the ledger.
    Registered(RegistrationReceipt),
}

/// One customer onboarding session.
///
/// Borrows its collaborators: the registry and wallet outlive the session
/// and may serve several of them.
pub struct OnboardingSession<'a> {
    registry: &'a dyn CustomerRegistry,
    wallet: &'a dyn WalletBridge,
    chain: ChainProfile,
    poll_interval: Duration,
    form: CustomerForm,
    gate: Option<EddGate<AwaitingChecklist>>,
    in_flight: bool,
}

impl<'a> OnboardingSession<'a> {
    /// Create a session with an empty form.
    pub fn new(
        registry: &'a dyn CustomerRegistry,
        wallet: &'a dyn WalletBridge,
        chain: ChainProfile,
    ) -> Self {
        Self {
            registry,
            wallet,
            chain,
            poll_interval: Duration::from_secs(1),
            form: CustomerForm::default(),
            gate: None,
            in_flight: false,
        }
    }

    /// Override the confirmation poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The form being edited.
    pub fn form(&self) -> &CustomerForm {
        &self.form
    }

    /// Mutable access to the form being edited.
    pub fn form_mut(&mut self) -> &mut CustomerForm {
        &mut self.form
    }

    /// Replace the form wholesale.
    pub fn set_form(&mut self, form: CustomerForm) {
        self.form = form;
    }

    /// Whether a registration is awaiting the diligence checklist.
    pub fn awaiting_checklist(&self) -> bool {
        self.gate.is_some()
    }

    /// Whether a submission is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submit the current form.
    ///
    /// Validates, puts the wallet on the registry's chain, connects an
    /// account if none is active, runs the duplicate probe, classifies,
    /// and either registers directly (standard risk) or parks the
    /// registration behind the checklist (high risk).
    ///
    /// Any checklist left over from a previous attempt is discarded
    /// before this one proceeds.
    pub fn submit(
        &mut self,
        observer: &mut dyn PhaseObserver,
    ) -> Result<RegistrationOutcome, OnboardingError> {
        if self.in_flight {
            return Err(OnboardingError::SubmissionInFlight);
        }
        self.in_flight = true;
        let result = self.submit_inner(observer);
        self.in_flight = false;
        result
    }

    fn submit_inner(
        &mut self,
        observer: &mut dyn PhaseObserver,
    ) -> Result<RegistrationOutcome, OnboardingError> {
        let record = self.form.to_record()?;

        ensure_network(self.wallet, &self.chain)?;
        if self.wallet.active_account()?.is_none() {
            self.wallet.request_account()?;
        }

        // Authoritative duplicate check. An unreachable ledger is an
        // error, never a green light.
        if self
            .registry
            .is_registered(&record.customer_id, &record.full_name)?
        {
            tracing::warn!(customer_id = %record.customer_id, "duplicate registration refused");
            return Err(OnboardingError::DuplicateCustomer);
        }

        // A checklist from an earlier attempt belongs to stale form data.
        self.gate = None;

        let tier = classify(record.is_pep, record.expected_monthly_usd);
        match tier {
            RiskTier::High => {
                tracing::info!(customer_id = %record.customer_id, %tier, "diligence checklist required");
                self.gate = Some(EddGate::new().open(PendingRegistration { record, tier }));
                Ok(RegistrationOutcome::ChecklistRequired)
            }
            RiskTier::Standard => {
                let submitter = Submitter::new(self.registry, self.poll_interval);
                let receipt = submitter.submit(&record, &EddAnswers::default(), observer)?;
                self.form = CustomerForm::default();
                Ok(RegistrationOutcome::Registered(receipt))
            }
        }
    }

    /// Record the current checklist answers for the parked registration.
    ///
    /// # Errors
    ///
    /// [`OnboardingError::NoPendingChecklist`] if nothing is parked.
    pub fn record_checklist(&mut self, answers: EddAnswers) -> Result<(), OnboardingError> {
        match self.gate.as_mut() {
            Some(gate) => {
                gate.record(answers);
                Ok(())
            }
            None => Err(OnboardingError::NoPendingChecklist),
        }
    }

    /// The answers recorded on the open checklist, if one is open.
    pub fn checklist_answers(&self) -> Option<EddAnswers> {
        self.gate.as_ref().map(|gate| gate.answers())
    }

    /// Confirm the checklist and submit the parked registration.
    ///
    /// The answers are re-read at this moment; if any item is unchecked
    /// the gate stays closed and the registration stays parked.
    ///
    /// # Errors
    ///
    /// [`OnboardingError::NoPendingChecklist`] if nothing is parked;
    /// [`OnboardingError::ChecklistIncomplete`] if an item is unchecked.
    /// A submission failure after a successful confirm discards the
    /// checklist; the form is untouched, so the officer can resubmit.
    pub fn confirm_checklist(
        &mut self,
        observer: &mut dyn PhaseObserver,
    ) -> Result<RegistrationReceipt, OnboardingError> {
        if self.in_flight {
            return Err(OnboardingError::SubmissionInFlight);
        }
        let gate = self.gate.take().ok_or(OnboardingError::NoPendingChecklist)?;

        let (pending, answers) = match gate.confirm() {
            ChecklistOutcome::Ready { pending, answers } => (pending, answers),
            ChecklistOutcome::Incomplete(gate) => {
                self.gate = Some(gate);
                return Err(OnboardingError::ChecklistIncomplete);
            }
        };

        self.in_flight = true;
        let submitter = Submitter::new(self.registry, self.poll_interval);
        let result = submitter.submit(&pending.record, &answers, observer);
        self.in_flight = false;

        let receipt = result?;
        self.form = CustomerForm::default();
        Ok(receipt)
    }

    /// Abandon the parked registration and its checklist.
    ///
    /// # Errors
    ///
    /// [`OnboardingError::NoPendingChecklist`] if nothing is parked.
    pub fn cancel_checklist(&mut self) -> Result<(), OnboardingError> {
        match self.gate.take() {
            Some(gate) => {
                gate.cancel();
                Ok(())
            }
            None => Err(OnboardingError::NoPendingChecklist),
        }
    }
}
