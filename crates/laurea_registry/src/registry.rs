//! The certificate registry and its lifecycle operations.

use crate::filter::CertificateFilter;
use crate::store::{CertificateStore, StoreError};
use crate::token::{RandomTokenSource, TokenSource};
use chrono::{Datelike, NaiveDate, Utc};
use laurea_core::{
    Certificate, CertificateId, CertificateStatus, IssueRequest, ValidationError, ValidityPolicy,
};
use serde::{Deserialize, Serialize};

/// Configuration for the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Issuing institution name, printed on every certificate
    pub issued_by: String,
    /// Validity window applied at issuance and renewal
    pub validity: ValidityPolicy,
    /// How many times to regenerate codes on a storage collision
    pub max_code_attempts: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            issued_by: "Laurea Academy".to_string(),
            validity: ValidityPolicy::default(),
            max_code_attempts: 5,
        }
    }
}

/// Registry-level errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Issuance input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No certificate with the given identifier
    #[error("certificate not found: {id}")]
    NotFound {
        /// The identifier that was looked up
        id: String,
    },
    /// The requested status change is not permitted
    #[error("invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        /// The certificate the transition was attempted on
        id: String,
        /// Current status
        from: CertificateStatus,
        /// Requested status
        to: CertificateStatus,
    },
    /// Exhausted the retry budget generating a unique code
    #[error("could not allocate a unique verification code after {attempts} attempts")]
    CodeCollision {
        /// Attempts made before giving up
        attempts: u32,
    },
    /// The record is already registered
    #[error("certificate already registered: {reason}")]
    AlreadyExists {
        /// Which uniqueness constraint fired
        reason: String,
    },
    /// Record could not be serialized or parsed
    #[error("serialization error: {reason}")]
    Serialization {
        /// Underlying cause
        reason: String,
    },
    /// Internal error (for unexpected errors)
    #[error("internal error: {reason}")]
    Internal {
        /// Error message
        reason: String,
    },
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::NotFound { id },
            StoreError::DuplicateId { .. }
            | StoreError::DuplicateCode
            | StoreError::DuplicateNumber { .. } => Self::AlreadyExists {
                reason: err.to_string(),
            },
            StoreError::ImmutableFieldChanged { .. } => Self::Internal {
                reason: err.to_string(),
            },
        }
    }
}

/// Counts of registered certificates per effective status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// All registered certificates
    pub total: usize,
    /// Awaiting confirmation
    pub pending: usize,
    /// Currently valid
    pub active: usize,
    /// Past validity (persisted or by date)
    pub expired: usize,
    /// Permanently withdrawn
    pub revoked: usize,
}

/// Owner of certificate records and their lifecycle.
///
/// Stateless per call; safe to share behind an `Arc` across request
/// handlers. The only write race, concurrent issuance colliding on a
/// token, is closed by the store's indexed insert plus bounded retry.
pub struct Registry {
    config: RegistryConfig,
    store: CertificateStore,
    tokens: Box<dyn TokenSource + Send + Sync>,
}

impl Registry {
    /// Create a registry with the given configuration
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_tokens(config, Box::new(RandomTokenSource::new()))
    }

    /// Create a registry with a specific token source
    #[must_use]
    pub fn with_tokens(config: RegistryConfig, tokens: Box<dyn TokenSource + Send + Sync>) -> Self {
        Self {
            config,
            store: CertificateStore::new(),
            tokens,
        }
    }

    /// The configuration this registry was built with
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Issue a certificate in state `Active`.
    ///
    /// Validates the request, computes the expiry date from the validity
    /// policy and allocates a unique verification code and certificate
    /// number, retrying on collision up to the configured budget.
    ///
    /// # Errors
    ///
    /// Returns error if the request is invalid or the retry budget is
    /// exhausted
    pub fn issue(&self, request: IssueRequest) -> Result<Certificate, RegistryError> {
        self.issue_with_status(request, CertificateStatus::Active)
    }

    /// Issue a certificate in state `Pending`, for flows where completion
    /// still awaits administrative confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if the request is invalid or the retry budget is
    /// exhausted
    pub fn issue_pending(&self, request: IssueRequest) -> Result<Certificate, RegistryError> {
        self.issue_with_status(request, CertificateStatus::Pending)
    }

    fn issue_with_status(
        &self,
        request: IssueRequest,
        status: CertificateStatus,
    ) -> Result<Certificate, RegistryError> {
        request.validate()?;
        let expiry_date = self.config.validity.expiry_for(request.issue_date);
        let year = request.issue_date.year();

        for attempt in 1..=self.config.max_code_attempts {
            let certificate = Certificate {
                id: CertificateId::new(),
                certificate_number: self.tokens.certificate_number(year),
                verification_code: self.tokens.verification_code(),
                status,
                verified: false,
                holder: request.holder.clone(),
                course: request.course.clone(),
                instructor: request.instructor.clone(),
                issue_date: request.issue_date,
                expiry_date,
                grade: request.grade.clone(),
                certificate_type: request.certificate_type,
                certificate_level: request.certificate_level,
                score: request.score.clone(),
                issued_by: self.config.issued_by.clone(),
            };

            match self.store.insert(certificate.clone()) {
                Ok(()) => {
                    tracing::info!(
                        id = %certificate.id,
                        number = %certificate.certificate_number,
                        "certificate issued"
                    );
                    return Ok(certificate);
                }
                Err(
                    StoreError::DuplicateId { .. }
                    | StoreError::DuplicateCode
                    | StoreError::DuplicateNumber { .. },
                ) => {
                    tracing::warn!(attempt, "token collision on insert, regenerating");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(RegistryError::CodeCollision {
            attempts: self.config.max_code_attempts,
        })
    }

    /// Promote a pending certificate to `Active`
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown or not `Pending`
    pub fn activate(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        let mut certificate = self.load(id)?;
        self.check_transition(&certificate, CertificateStatus::Pending, CertificateStatus::Active)?;
        certificate.status = CertificateStatus::Active;
        let updated = self.store.update(certificate)?;
        tracing::info!(id = %updated.id, "certificate activated");
        Ok(updated)
    }

    /// Mark an active certificate `Expired` (explicit admin action)
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown or not `Active`
    pub fn expire(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        let mut certificate = self.load(id)?;
        self.check_transition(&certificate, CertificateStatus::Active, CertificateStatus::Expired)?;
        certificate.status = CertificateStatus::Expired;
        let updated = self.store.update(certificate)?;
        tracing::info!(id = %updated.id, "certificate expired");
        Ok(updated)
    }

    /// Permanently revoke a certificate.
    ///
    /// Idempotent: revoking an already revoked certificate returns the
    /// current record. The record is never deleted, so "was this ever
    /// valid" stays answerable for audit.
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown
    pub fn revoke(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        let mut certificate = self.load(id)?;
        if certificate.status == CertificateStatus::Revoked {
            return Ok(certificate);
        }
        certificate.status = CertificateStatus::Revoked;
        let updated = self.store.update(certificate)?;
        tracing::info!(id = %updated.id, "certificate revoked");
        Ok(updated)
    }

    /// Renew an expired certificate: back to `Active` with an expiry
    /// strictly later than the previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown or not `Expired`
    pub fn renew(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        let mut certificate = self.load(id)?;
        self.check_transition(&certificate, CertificateStatus::Expired, CertificateStatus::Active)?;
        certificate.status = CertificateStatus::Active;
        certificate.expiry_date = self.config.validity.renewed_expiry(certificate.expiry_date);
        let updated = self.store.update(certificate)?;
        tracing::info!(id = %updated.id, expiry = %updated.expiry_date, "certificate renewed");
        Ok(updated)
    }

    /// Set the administrative confirmation flag. Idempotent, independent
    /// of lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown
    pub fn confirm(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        let mut certificate = self.load(id)?;
        if certificate.verified {
            return Ok(certificate);
        }
        certificate.verified = true;
        Ok(self.store.update(certificate)?)
    }

    /// Fetch a certificate by internal id
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown
    pub fn get(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        self.load(id)
    }

    /// Fetch a certificate by its human-readable number
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown
    pub fn get_by_number(&self, number: &str) -> Result<Certificate, RegistryError> {
        self.store
            .find_by_number(number)
            .ok_or_else(|| RegistryError::NotFound {
                id: number.to_string(),
            })
    }

    /// Look up a certificate by verification code.
    ///
    /// Absence is a normal negative result, not an error; this is the
    /// read the public verification service is built on.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<Certificate> {
        self.store.find_by_code(code)
    }

    /// List certificates matching `filter`, newest first
    #[must_use]
    pub fn list(&self, filter: &CertificateFilter) -> Vec<Certificate> {
        self.list_at(filter, Utc::now().date_naive())
    }

    /// Date-injected variant of [`Registry::list`]
    #[must_use]
    pub fn list_at(&self, filter: &CertificateFilter, today: NaiveDate) -> Vec<Certificate> {
        let mut certificates: Vec<Certificate> = self
            .store
            .list_all()
            .into_iter()
            .filter(|certificate| filter.matches(certificate, today))
            .collect();
        certificates.sort_by(|a, b| {
            b.issue_date
                .cmp(&a.issue_date)
                .then_with(|| a.certificate_number.cmp(&b.certificate_number))
        });
        certificates
    }

    /// Counts per effective status
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.stats_at(Utc::now().date_naive())
    }

    /// Date-injected variant of [`Registry::stats`]
    #[must_use]
    pub fn stats_at(&self, today: NaiveDate) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for certificate in self.store.list_all() {
            stats.total += 1;
            match certificate.effective_status(today) {
                CertificateStatus::Pending => stats.pending += 1,
                CertificateStatus::Active => stats.active += 1,
                CertificateStatus::Expired => stats.expired += 1,
                CertificateStatus::Revoked => stats.revoked += 1,
            }
        }
        stats
    }

    /// Export one record as JSON for archival hand-off
    ///
    /// # Errors
    ///
    /// Returns error if the certificate is unknown or serialization fails
    pub fn export_json(&self, id: &CertificateId) -> Result<String, RegistryError> {
        let certificate = self.load(id)?;
        serde_json::to_string_pretty(&certificate).map_err(|err| RegistryError::Serialization {
            reason: err.to_string(),
        })
    }

    /// Import a previously exported record, subject to the same
    /// uniqueness constraints as issuance
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed, the record violates the
    /// date invariant, or it is already registered
    pub fn import_json(&self, json: &str) -> Result<Certificate, RegistryError> {
        let certificate: Certificate =
            serde_json::from_str(json).map_err(|err| RegistryError::Serialization {
                reason: err.to_string(),
            })?;
        if certificate.expiry_date <= certificate.issue_date {
            return Err(ValidationError::DateOrder {
                issue: certificate.issue_date,
                expiry: certificate.expiry_date,
            }
            .into());
        }
        self.store.insert(certificate.clone())?;
        tracing::info!(id = %certificate.id, "certificate imported");
        Ok(certificate)
    }

    fn load(&self, id: &CertificateId) -> Result<Certificate, RegistryError> {
        self.store.get(id).ok_or_else(|| RegistryError::NotFound {
            id: id.to_string(),
        })
    }

    fn check_transition(
        &self,
        certificate: &Certificate,
        expected_from: CertificateStatus,
        to: CertificateStatus,
    ) -> Result<(), RegistryError> {
        if certificate.status != expected_from || !certificate.status.can_transition_to(to) {
            return Err(RegistryError::InvalidTransition {
                id: certificate.id.to_string(),
                from: certificate.status,
                to,
            });
        }
        Ok(())
    }
}
