//! # onboard-session — The Customer Onboarding Workflow
//!
//! Orchestration layer tying the pieces together: the
//! [`OnboardingSession`] walks one customer from form to confirmed
//! on-chain registration.
//!
//! - **Session** ([`session`]): validation, wallet checks, the
//!   authoritative duplicate probe, and risk routing.
//! - **Diligence gate** ([`edd`]): high-risk registrations park behind a
//!   three-item checklist, modeled as a typestate machine.
//! - **Submission** ([`submit`]): the write lifecycle with phase
//!   reporting — `Submitting`, `Pending`, `Confirmed`, `Failed`.
//!
//! The session blocks while a submission confirms; callers on an async
//! runtime should drive it from a blocking thread, the same way the
//! registry clients are consumed.

pub mod edd;
pub mod error;
pub mod session;
pub mod submit;

pub use edd::{ChecklistOutcome, EddGate, PendingRegistration};
pub use error::OnboardingError;
pub use session::{OnboardingSession, RegistrationOutcome};
pub use submit::{PhaseObserver, RegistrationReceipt, SubmissionPhase, Submitter};
