//! # onboard-core — Domain Types for Risk-Gated Customer Onboarding
//!
//! Pure domain layer for the onboarding stack: no I/O, no clocks, no
//! network. Everything here is a total function of its inputs.
//!
//! ## Contents
//!
//! - **Identifiers** ([`customer`]): [`CustomerId`] and [`NormalizedName`]
//!   validate at construction time — an empty customer ID or a name that
//!   normalizes to nothing cannot exist in the system.
//! - **Customer record** ([`customer`]): the validated, normalized payload
//!   that is handed to the on-chain registry, including the [`PhotoDigest`]
//!   (only a digest of the uploaded image ever leaves this process).
//! - **Form validation** ([`form`]): fail-fast, fixed-order constraint
//!   checking over raw field inputs.
//! - **Risk classification** ([`risk`]): the PEP / expected-volume rule
//!   that decides whether a registration must pass the Enhanced Due
//!   Diligence checklist first.

pub mod customer;
pub mod error;
pub mod form;
pub mod risk;

pub use customer::{CustomerId, CustomerRecord, NormalizedName, PhotoDigest};
pub use error::ValidationError;
pub use form::CustomerForm;
pub use risk::{classify, EddAnswers, RiskTier, HIGH_RISK_USD_THRESHOLD};
