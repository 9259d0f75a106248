//! # Raw Form Input and Fail-Fast Validation
//!
//! [`CustomerForm`] holds the field inputs exactly as the user typed them,
//! plus the uploaded photo bytes. Validation checks the constraints in a
//! fixed order and stops at the first failure; it has no side effects.
//! [`CustomerForm::to_record`] performs the same validation and then
//! builds the normalized [`CustomerRecord`].
//!
//! ## Check Order
//!
//! 1. customer ID non-empty
//! 2. full name non-empty
//! 3. home address non-empty
//! 4. identification number non-empty
//! 5. occupation non-empty
//! 6. expected monthly USD non-empty and numeric (non-negative)
//! 7. expected activity description non-empty
//! 8. photo present

use serde::{Deserialize, Serialize};

use crate::customer::{CustomerId, CustomerRecord, NormalizedName, PhotoDigest};
use crate::error::ValidationError;

/// Raw onboarding form state, owned by the active session.
///
/// Free-text fields are kept untrimmed until record construction so the
/// user sees exactly what they typed. `Default` is the cleared form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerForm {
    /// Customer ID field (e.g. `"CUST-0001"`).
    pub customer_id: String,
    /// Full name field, as typed.
    pub full_name: String,
    /// Home address field.
    pub home_address: String,
    /// Identification number field (passport / national ID / other).
    pub identification_number: String,
    /// Occupation field.
    pub occupation: String,
    /// PEP declaration.
    pub is_pep: bool,
    /// Expected monthly transaction volume in USD, as typed.
    pub expected_monthly_usd: String,
    /// Expected account activity description.
    pub expected_activity: String,
    /// Uploaded photo bytes. Only the digest is ever submitted.
    #[serde(skip)]
    pub photo: Option<Vec<u8>>,
}

impl CustomerForm {
    /// Check every constraint in fixed order, returning the first failure.
    ///
    /// No side effects; the form is left untouched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_id.trim().is_empty() {
            return Err(ValidationError::MissingCustomerId);
        }
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingFullName);
        }
        if self.home_address.trim().is_empty() {
            return Err(ValidationError::MissingHomeAddress);
        }
        if self.identification_number.trim().is_empty() {
            return Err(ValidationError::MissingIdentificationNumber);
        }
        if self.occupation.trim().is_empty() {
            return Err(ValidationError::MissingOccupation);
        }
        if self.expected_monthly_usd.trim().is_empty() {
            return Err(ValidationError::MissingExpectedMonthlyUsd);
        }
        parse_usd_amount(&self.expected_monthly_usd)?;
        if self.expected_activity.trim().is_empty() {
            return Err(ValidationError::MissingExpectedActivity);
        }
        if self.photo.is_none() {
            return Err(ValidationError::MissingPhoto);
        }
        Ok(())
    }

    /// Validate and build the normalized registry record.
    ///
    /// Trims free-text fields, normalizes the full name, truncates the USD
    /// amount to a whole integer, and digests the photo bytes.
    ///
    /// # Errors
    ///
    /// The first failing constraint, in the same order as
    /// [`validate`](Self::validate).
    pub fn to_record(&self) -> Result<CustomerRecord, ValidationError> {
        self.validate()?;

        // Validation guarantees photo presence; an empty photo slice still
        // digests to a well-defined value.
        let photo_bytes = self.photo.as_deref().unwrap_or_default();

        Ok(CustomerRecord {
            customer_id: CustomerId::new(&*self.customer_id)?,
            full_name: NormalizedName::new(&self.full_name)?,
            home_address: self.home_address.trim().to_string(),
            identification_number: self.identification_number.trim().to_string(),
            occupation: self.occupation.trim().to_string(),
            is_pep: self.is_pep,
            expected_monthly_usd: parse_usd_amount(&self.expected_monthly_usd)?,
            expected_activity: self.expected_activity.trim().to_string(),
            photo_digest: PhotoDigest::from_image_bytes(photo_bytes),
        })
    }
}

/// Parse the expected-monthly-USD field: non-negative number, truncated
/// toward zero to whole dollars. Decimal input is accepted.
fn parse_usd_amount(raw: &str) -> Result<u64, ValidationError> {
    let trimmed = raw.trim();
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidExpectedMonthlyUsd {
            input: trimmed.to_string(),
        })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(ValidationError::InvalidExpectedMonthlyUsd {
            input: trimmed.to_string(),
        });
    }
    // `as` saturates at u64::MAX for out-of-range values.
    Ok(parsed.trunc() as u64)
}
