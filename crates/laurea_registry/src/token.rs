//! Verification code and certificate number generation.
//!
//! Codes must resist enumeration: they are drawn from OS entropy, never
//! derived from record fields or sequence counters. Uniqueness is NOT
//! guaranteed here; the store's indexed insert is the authority and the
//! registry regenerates on a detected collision.

use rand_core::{OsRng, RngCore};

/// Byte length of a verification code before hex encoding
const CODE_BYTES: usize = 16;

/// Characters allowed in a certificate number suffix.
///
/// Uppercase letters and digits with 0/O/1/I excluded, so the number
/// survives being read out loud or retyped from a printed document.
const NUMBER_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a certificate number suffix
const NUMBER_SUFFIX_LEN: usize = 6;

/// Source of fresh verification codes and certificate numbers
pub trait TokenSource {
    /// Produce a candidate verification code (32 lowercase hex characters)
    fn verification_code(&self) -> String;

    /// Produce a candidate certificate number for the given issue year
    fn certificate_number(&self, year: i32) -> String;
}

/// Production token source backed by the operating system RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl RandomTokenSource {
    /// Create a new random token source
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TokenSource for RandomTokenSource {
    fn verification_code(&self) -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; CODE_BYTES];
        rng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn certificate_number(&self, year: i32) -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; NUMBER_SUFFIX_LEN];
        rng.fill_bytes(&mut bytes);
        let suffix: String = bytes
            .iter()
            .map(|b| NUMBER_CHARSET[*b as usize % NUMBER_CHARSET.len()] as char)
            .collect();
        format!("CERT-{}-{}", year, suffix)
    }
}
