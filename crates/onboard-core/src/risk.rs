//! # Risk Classification and the EDD Checklist
//!
//! The classification rule is deliberately small and fixed: a customer is
//! high risk when they are a Politically Exposed Person or when their
//! expected monthly volume strictly exceeds [`HIGH_RISK_USD_THRESHOLD`].
//! There is no hysteresis and no rounding ambiguity — the amount is
//! already an integer by the time it reaches [`classify`].
//!
//! High-risk registrations must pass the Enhanced Due Diligence checklist
//! ([`EddAnswers`]) before they may be submitted; standard-risk
//! registrations are always submitted with all three flags false.

use serde::{Deserialize, Serialize};

/// Expected monthly USD volume above which a customer is high risk.
/// The comparison is strictly greater-than: exactly 10,000 is standard.
pub const HIGH_RISK_USD_THRESHOLD: u64 = 10_000;

/// Derived risk tier. Never stored — recomputed from the record wherever
/// it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Default tier; registration submits directly.
    Standard,
    /// PEP and/or expected volume above the threshold; registration is
    /// gated behind the EDD checklist.
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard Risk"),
            Self::High => write!(f, "High Risk (PEP and/or > 10,000 USD)"),
        }
    }
}

/// Classify a customer from the two risk-relevant fields.
pub fn classify(is_pep: bool, expected_monthly_usd: u64) -> RiskTier {
    if is_pep || expected_monthly_usd > HIGH_RISK_USD_THRESHOLD {
        RiskTier::High
    } else {
        RiskTier::Standard
    }
}

/// The three Enhanced Due Diligence checklist answers.
///
/// All three must be true before a high-risk registration may be
/// submitted. Defaults to all false; standard-risk submissions always
/// carry the default regardless of any stale checklist state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EddAnswers {
    /// Supporting evidence for the customer's source of income has been
    /// collected (salary certificate, payslips, bank statement, invoices).
    pub source_of_income_collected: bool,
    /// A site visit to the customer's premises has been completed.
    pub site_visit_completed: bool,
    /// Name screening of family members and close associates has been
    /// completed against sanctions/PEP/adverse-media lists.
    pub family_and_associates_screened: bool,
}

impl EddAnswers {
    /// All three checklist items answered yes.
    pub fn all_confirmed(&self) -> bool {
        self.source_of_income_collected
            && self.site_visit_completed
            && self.family_and_associates_screened
    }

    /// The fully confirmed triple.
    pub fn confirmed() -> Self {
        Self {
            source_of_income_collected: true,
            site_visit_completed: true,
            family_and_associates_screened: true,
        }
    }
}
