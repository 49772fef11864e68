//! The public verification lookup.

use crate::view::PublicCertificate;
use chrono::{NaiveDate, Utc};
use laurea_core::CertificateStatus;
use laurea_registry::Registry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why a verification came back the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationReason {
    /// The certificate is valid
    Valid,
    /// No certificate carries this code
    Unknown,
    /// The certificate was revoked
    Revoked,
    /// The certificate's validity window has passed
    Expired,
    /// The certificate has not been activated yet
    NotYetActive,
}

/// Total result of a verification lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Whether the code identifies a currently valid certificate
    pub valid: bool,
    /// Why
    pub reason: VerificationReason,
    /// Public view of the record, present only when valid
    pub certificate: Option<PublicCertificate>,
}

impl VerificationOutcome {
    fn valid(certificate: PublicCertificate) -> Self {
        Self {
            valid: true,
            reason: VerificationReason::Valid,
            certificate: Some(certificate),
        }
    }

    fn invalid(reason: VerificationReason) -> Self {
        Self {
            valid: false,
            reason,
            certificate: None,
        }
    }
}

/// Read-only lookup service safe for unauthenticated callers.
///
/// Validity is recomputed from dates at call time; a stale persisted
/// status can never make an out-of-date certificate verify as valid.
pub struct VerificationService {
    registry: Arc<Registry>,
}

impl VerificationService {
    /// Create a service over a shared registry
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Verify a code against today's date
    #[must_use]
    pub fn verify(&self, code: &str) -> VerificationOutcome {
        self.verify_at(code, Utc::now().date_naive())
    }

    /// Verify a code against an explicit date
    #[must_use]
    pub fn verify_at(&self, code: &str, today: NaiveDate) -> VerificationOutcome {
        let Some(certificate) = self.registry.find_by_code(code.trim()) else {
            tracing::debug!("verification lookup for unknown code");
            return VerificationOutcome::invalid(VerificationReason::Unknown);
        };

        match certificate.effective_status(today) {
            CertificateStatus::Active => {
                VerificationOutcome::valid(PublicCertificate::from_certificate(&certificate))
            }
            CertificateStatus::Revoked => {
                VerificationOutcome::invalid(VerificationReason::Revoked)
            }
            CertificateStatus::Expired => {
                VerificationOutcome::invalid(VerificationReason::Expired)
            }
            CertificateStatus::Pending => {
                VerificationOutcome::invalid(VerificationReason::NotYetActive)
            }
        }
    }
}
