//! # Contract Calldata Encoding
//!
//! Strict ABI encoding for the two registry calls the workflow consumes:
//!
//! ```solidity
//! function isRegistered(string customerId, string fullName)
//!     external view returns (bool);
//! function registerCustomer(
//!     (string,string,string,string,string,bool,uint256,string,bytes32) record,
//!     (bool,bool,bool) edd
//! ) external;
//! ```
//!
//! ## Encoding Rules
//!
//! Standard head/tail layout: static values occupy one 32-byte word in the
//! head; each dynamic value contributes an offset word to the head and its
//! length-prefixed, zero-padded payload to the tail. Offsets are relative
//! to the start of the enclosing tuple's encoding. The customer record is
//! a dynamic tuple (it contains strings), so the outer call encodes it
//! behind an offset; the EDD triple is static and sits inline as three
//! bool words.

use onboard_core::{CustomerId, CustomerRecord, EddAnswers, NormalizedName};

use crate::error::LedgerError;

/// ABI word size in bytes.
const WORD: usize = 32;

/// 4-byte function selector for `isRegistered(string,string)`.
/// keccak256("isRegistered(string,string)") = 0x19a0967d...
pub const IS_REGISTERED_SELECTOR: [u8; 4] = [0x19, 0xa0, 0x96, 0x7d];

/// 4-byte function selector for
/// `registerCustomer((string,string,string,string,string,bool,uint256,string,bytes32),(bool,bool,bool))`.
/// keccak256 of that signature = 0xb81b95a7...
pub const REGISTER_CUSTOMER_SELECTOR: [u8; 4] = [0xb8, 0x1b, 0x95, 0xa7];

/// Encode the `isRegistered` duplicate probe calldata as 0x-prefixed hex.
pub fn encode_is_registered(customer_id: &CustomerId, full_name: &NormalizedName) -> String {
    let mut args = TupleEncoder::with_head_words(2);
    args.push_dynamic(encode_string(customer_id.as_str()));
    args.push_dynamic(encode_string(full_name.as_str()));
    to_calldata(IS_REGISTERED_SELECTOR, args.finish())
}

/// Encode the `registerCustomer` write calldata as 0x-prefixed hex.
pub fn encode_register_customer(record: &CustomerRecord, edd: &EddAnswers) -> String {
    // Inner dynamic tuple: nine fields, offsets relative to its own start.
    let mut fields = TupleEncoder::with_head_words(9);
    fields.push_dynamic(encode_string(record.customer_id.as_str()));
    fields.push_dynamic(encode_string(record.full_name.as_str()));
    fields.push_dynamic(encode_string(&record.home_address));
    fields.push_dynamic(encode_string(&record.identification_number));
    fields.push_dynamic(encode_string(&record.occupation));
    fields.push_word(bool_word(record.is_pep));
    fields.push_word(u256_word(record.expected_monthly_usd));
    fields.push_dynamic(encode_string(&record.expected_activity));
    fields.push_word(*record.photo_digest.as_bytes());
    let record_blob = fields.finish();

    // Outer args: the record tuple behind an offset, then the static
    // three-bool EDD tuple inline.
    let mut args = TupleEncoder::with_head_words(4);
    args.push_dynamic(record_blob);
    args.push_word(bool_word(edd.source_of_income_collected));
    args.push_word(bool_word(edd.site_visit_completed));
    args.push_word(bool_word(edd.family_and_associates_screened));
    to_calldata(REGISTER_CUSTOMER_SELECTOR, args.finish())
}

/// Decode a single ABI bool word returned by `eth_call`.
pub fn decode_bool_word(result_hex: &str) -> Result<bool, LedgerError> {
    let stripped = result_hex.strip_prefix("0x").unwrap_or(result_hex);
    let bytes = hex::decode(stripped).map_err(|_| LedgerError::InvalidResponse {
        reason: format!("eth_call returned non-hex data: {result_hex}"),
    })?;
    if bytes.len() != WORD {
        return Err(LedgerError::InvalidResponse {
            reason: format!(
                "eth_call returned {} bytes, expected a single 32-byte word",
                bytes.len()
            ),
        });
    }
    Ok(bytes.iter().any(|b| *b != 0))
}

/// Head/tail encoder for one tuple (or the top-level argument list).
///
/// The head size must be declared up front so dynamic offsets can be
/// computed in a single pass; values must then be pushed in field order.
struct TupleEncoder {
    head_len: usize,
    head: Vec<u8>,
    tail: Vec<u8>,
}

impl TupleEncoder {
    fn with_head_words(words: usize) -> Self {
        Self {
            head_len: words * WORD,
            head: Vec::with_capacity(words * WORD),
            tail: Vec::new(),
        }
    }

    /// Append one static word to the head.
    fn push_word(&mut self, word: [u8; WORD]) {
        self.head.extend_from_slice(&word);
    }

    /// Append a dynamic value: offset word in the head, payload in the tail.
    fn push_dynamic(&mut self, encoded: Vec<u8>) {
        let offset = self.head_len + self.tail.len();
        self.head.extend_from_slice(&u256_word(offset as u64));
        self.tail.extend_from_slice(&encoded);
    }

    fn finish(mut self) -> Vec<u8> {
        debug_assert_eq!(self.head.len(), self.head_len, "head word count mismatch");
        self.head.append(&mut self.tail);
        self.head
    }
}

/// Length-prefixed, zero-padded string payload.
fn encode_string(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let padded_len = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded_len);
    out.extend_from_slice(&u256_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded_len, 0);
    out
}

/// A `uint256` word: big-endian value right-aligned in 32 bytes.
fn u256_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// A `bool` word: 0 or 1 in the last byte.
fn bool_word(value: bool) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 1] = u8::from(value);
    word
}

fn to_calldata(selector: [u8; 4], args: Vec<u8>) -> String {
    let mut data = Vec::with_capacity(4 + args.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&args);
    format!("0x{}", hex::encode(data))
}
