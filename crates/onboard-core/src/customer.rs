//! # Customer Identity Newtypes and the Registry Record
//!
//! Domain-primitive newtypes for the onboarding workflow. Each identifier
//! is a distinct type — you cannot pass a raw string where a
//! [`NormalizedName`] is expected, and an invalid value cannot be
//! constructed.
//!
//! ## Normalization
//!
//! The registry keys duplicate detection on the pair
//! `(customer_id, normalized_full_name)`. Name normalization is: trim,
//! collapse every internal whitespace run to a single space, lowercase.
//! The operation is idempotent — normalizing an already-normalized name
//! is a no-op — so `"  John   Smith "` and `"john smith"` produce the
//! same duplicate-detection key.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Externally assigned customer identifier (e.g. `"CUST-0001"`).
///
/// Stored trimmed. Uniqueness is enforced by the on-chain registry per
/// `(customer_id, normalized_full_name)` pair, not by this type.
///
/// # Validation
///
/// - Must be non-empty after trimming leading/trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CustomerId(String);

impl_validating_deserialize!(CustomerId);

impl CustomerId {
    /// Create a customer ID from a raw string, trimming surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCustomerId`] if the input is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingCustomerId);
        }
        Ok(Self(trimmed))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer full name in canonical duplicate-detection form.
///
/// Canonical form: trimmed, internal whitespace runs collapsed to a single
/// ASCII space, lowercased. Construction normalizes any raw input;
/// normalizing twice yields the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName(String);

impl_validating_deserialize!(NormalizedName);

impl NormalizedName {
    /// Normalize a raw full name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFullName`] if the input contains
    /// no non-whitespace characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized = value
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::MissingFullName);
        }
        Ok(Self(normalized))
    }

    /// Access the canonical name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA-256 digest of an uploaded customer photo.
///
/// Only this 32-byte digest is ever transmitted or stored — the image
/// itself never leaves the session. Serialized as a 0x-prefixed 64-hex
/// string, the form the registry contract stores as `bytes32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoDigest([u8; 32]);

impl PhotoDigest {
    /// Digest raw image bytes.
    pub fn from_image_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Construct from an existing 32-byte digest.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex (66 characters).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for PhotoDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for PhotoDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PhotoDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let stripped = raw.strip_prefix("0x").unwrap_or(&raw);
        let bytes = hex::decode(stripped).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("photo digest must be 32 bytes"))?;
        Ok(Self(arr))
    }
}

/// The validated, normalized customer payload submitted to the registry.
///
/// Built from a [`crate::form::CustomerForm`] after fail-fast validation.
/// All free-text fields are stored trimmed; the full name is stored in its
/// normalized duplicate-detection form; the USD amount is the
/// integer-truncated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Externally assigned customer identifier.
    pub customer_id: CustomerId,
    /// Full name in normalized form.
    pub full_name: NormalizedName,
    /// Residential address (street, city, country).
    pub home_address: String,
    /// Passport / national ID / other identification number.
    pub identification_number: String,
    /// Declared occupation.
    pub occupation: String,
    /// Whether the customer is a Politically Exposed Person.
    pub is_pep: bool,
    /// Expected monthly transaction volume in whole USD.
    pub expected_monthly_usd: u64,
    /// Free-text description of the expected account activity.
    pub expected_activity: String,
    /// Digest of the uploaded customer photo.
    pub photo_digest: PhotoDigest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -- CustomerId --

    #[test]
    fn customer_id_trims_whitespace() {
        let id = CustomerId::new("  CUST-0001  ").unwrap();
        assert_eq!(id.as_str(), "CUST-0001");
    }

    #[test]
    fn customer_id_rejects_empty() {
        assert!(CustomerId::new("").is_err());
        assert!(CustomerId::new("   ").is_err());
    }

    #[test]
    fn customer_id_display() {
        let id = CustomerId::new("CUST-42").unwrap();
        assert_eq!(format!("{id}"), "CUST-42");
    }

    #[test]
    fn customer_id_deserialize_validates() {
        let ok: Result<CustomerId, _> = serde_json::from_str("\"CUST-0001\"");
        assert!(ok.is_ok());
        let bad: Result<CustomerId, _> = serde_json::from_str("\"   \"");
        assert!(bad.is_err());
    }

    // -- NormalizedName --

    #[test]
    fn name_normalization_collapses_whitespace_and_case() {
        let name = NormalizedName::new("  John   Smith ").unwrap();
        assert_eq!(name.as_str(), "john smith");
    }

    #[test]
    fn name_normalization_handles_tabs_and_newlines() {
        let name = NormalizedName::new("John\t\nSmith").unwrap();
        assert_eq!(name.as_str(), "john smith");
    }

    #[test]
    fn name_case_variants_collapse_to_same_key() {
        let a = NormalizedName::new("JOHN SMITH").unwrap();
        let b = NormalizedName::new("john    smith").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn name_rejects_whitespace_only() {
        assert!(NormalizedName::new("   \t ").is_err());
        assert!(NormalizedName::new("").is_err());
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "\\PC{0,60}") {
            if let Ok(once) = NormalizedName::new(&raw) {
                let twice = NormalizedName::new(once.as_str()).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn normalized_names_have_no_double_spaces(raw in "\\PC{1,60}") {
            if let Ok(name) = NormalizedName::new(&raw) {
                prop_assert!(!name.as_str().contains("  "));
                prop_assert_eq!(name.as_str().trim(), name.as_str());
            }
        }
    }

    // -- PhotoDigest --

    #[test]
    fn photo_digest_is_deterministic() {
        let a = PhotoDigest::from_image_bytes(b"image-bytes");
        let b = PhotoDigest::from_image_bytes(b"image-bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn photo_digest_differs_for_different_images() {
        let a = PhotoDigest::from_image_bytes(b"photo-a");
        let b = PhotoDigest::from_image_bytes(b"photo-b");
        assert_ne!(a, b);
    }

    #[test]
    fn photo_digest_hex_format() {
        let digest = PhotoDigest::from_image_bytes(b"x");
        let hex_str = digest.to_hex();
        assert_eq!(hex_str.len(), 66);
        assert!(hex_str.starts_with("0x"));
        assert!(hex_str[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn photo_digest_serde_roundtrip() {
        let digest = PhotoDigest::from_image_bytes(b"roundtrip");
        let json = serde_json::to_string(&digest).unwrap();
        let back: PhotoDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, back);
    }

    #[test]
    fn photo_digest_deserialize_rejects_wrong_length() {
        let bad: Result<PhotoDigest, _> = serde_json::from_str("\"0xdeadbeef\"");
        assert!(bad.is_err());
    }

    // -- CustomerRecord --

    #[test]
    fn customer_record_serde_roundtrip() {
        let record = CustomerRecord {
            customer_id: CustomerId::new("CUST-0001").unwrap(),
            full_name: NormalizedName::new("John Smith").unwrap(),
            home_address: "1 Main St, Springfield".into(),
            identification_number: "P1234567".into(),
            occupation: "Engineer".into(),
            is_pep: false,
            expected_monthly_usd: 5000,
            expected_activity: "savings transfers".into(),
            photo_digest: PhotoDigest::from_image_bytes(b"photo"),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: CustomerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
