//! Validation errors for form input and domain-type construction.
//!
//! Every variant renders as the exact text shown to the user next to the
//! offending field. Validation is fail-fast: callers report the first
//! failing constraint, never a cumulative list.

/// A form field failed its constraint, or a domain newtype rejected its
/// input at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Customer ID is empty after trimming.
    #[error("Customer ID is required.")]
    MissingCustomerId,

    /// Full name is empty, or normalizes to the empty string.
    #[error("Full name is required.")]
    MissingFullName,

    /// Home address is empty after trimming.
    #[error("Address is required.")]
    MissingHomeAddress,

    /// Identification number is empty after trimming.
    #[error("Identification number is required.")]
    MissingIdentificationNumber,

    /// Occupation is empty after trimming.
    #[error("Occupation is required.")]
    MissingOccupation,

    /// Expected monthly USD volume is empty after trimming.
    #[error("Expected transaction activity (USD) is required.")]
    MissingExpectedMonthlyUsd,

    /// Expected monthly USD volume is not a non-negative number.
    #[error("Expected transaction activity must be a number.")]
    InvalidExpectedMonthlyUsd {
        /// The raw input that failed to parse.
        input: String,
    },

    /// Expected activity description is empty after trimming.
    #[error("Expected transaction activity description is required.")]
    MissingExpectedActivity,

    /// No customer photo was supplied.
    #[error("Customer photo is required (only the photo hash is stored on-chain).")]
    MissingPhoto,
}
