//! In-memory certificate store with unique secondary indexes.
//!
//! The indexed insert is the storage-level uniqueness constraint for
//! verification codes and certificate numbers. Records are never removed;
//! revocation only flips status, so uniqueness holds for all time.

use laurea_core::{Certificate, CertificateId, CertificateStatus};
use std::collections::HashMap;
use std::sync::RwLock;

/// Store error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Record not found
    #[error("certificate not found: {id}")]
    NotFound {
        /// The id that was looked up
        id: String,
    },
    /// A record with this id already exists
    #[error("duplicate certificate id: {id}")]
    DuplicateId {
        /// The colliding id
        id: String,
    },
    /// A record with this verification code already exists
    #[error("duplicate verification code")]
    DuplicateCode,
    /// A record with this certificate number already exists
    #[error("duplicate certificate number: {number}")]
    DuplicateNumber {
        /// The colliding number
        number: String,
    },
    /// An update attempted to change an immutable field
    #[error("immutable field changed: {field}")]
    ImmutableFieldChanged {
        /// The field the update tried to change
        field: String,
    },
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<CertificateId, Certificate>,
    by_code: HashMap<String, CertificateId>,
    by_number: HashMap<String, CertificateId>,
}

/// Thread-safe certificate store
#[derive(Debug, Default)]
pub struct CertificateStore {
    inner: RwLock<Inner>,
}

impl CertificateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record, enforcing id/code/number uniqueness atomically
    ///
    /// # Errors
    ///
    /// Returns error if the id, verification code or certificate number is
    /// already registered
    pub fn insert(&self, certificate: Certificate) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if inner.records.contains_key(&certificate.id) {
            return Err(StoreError::DuplicateId {
                id: certificate.id.to_string(),
            });
        }
        if inner.by_code.contains_key(&certificate.verification_code) {
            return Err(StoreError::DuplicateCode);
        }
        if inner.by_number.contains_key(&certificate.certificate_number) {
            return Err(StoreError::DuplicateNumber {
                number: certificate.certificate_number.clone(),
            });
        }

        inner
            .by_code
            .insert(certificate.verification_code.clone(), certificate.id);
        inner
            .by_number
            .insert(certificate.certificate_number.clone(), certificate.id);
        inner.records.insert(certificate.id, certificate);
        Ok(())
    }

    /// Replace an existing record.
    ///
    /// The id, verification code and certificate number are immutable; an
    /// update that changes either is refused.
    ///
    /// # Errors
    ///
    /// Returns error if the record does not exist or an immutable field
    /// was changed
    pub fn update(&self, certificate: Certificate) -> Result<Certificate, StoreError> {
        let mut inner = self.inner.write().unwrap();
        let existing = inner
            .records
            .get(&certificate.id)
            .ok_or_else(|| StoreError::NotFound {
                id: certificate.id.to_string(),
            })?;
        if existing.verification_code != certificate.verification_code {
            return Err(StoreError::ImmutableFieldChanged {
                field: "verification_code".to_string(),
            });
        }
        if existing.certificate_number != certificate.certificate_number {
            return Err(StoreError::ImmutableFieldChanged {
                field: "certificate_number".to_string(),
            });
        }
        inner.records.insert(certificate.id, certificate.clone());
        Ok(certificate)
    }

    /// Fetch a record by internal id
    #[must_use]
    pub fn get(&self, id: &CertificateId) -> Option<Certificate> {
        self.inner.read().unwrap().records.get(id).cloned()
    }

    /// Fetch a record by verification code
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<Certificate> {
        let inner = self.inner.read().unwrap();
        inner
            .by_code
            .get(code)
            .and_then(|id| inner.records.get(id))
            .cloned()
    }

    /// Fetch a record by certificate number
    #[must_use]
    pub fn find_by_number(&self, number: &str) -> Option<Certificate> {
        let inner = self.inner.read().unwrap();
        inner
            .by_number
            .get(number)
            .and_then(|id| inner.records.get(id))
            .cloned()
    }

    /// Snapshot of all records
    #[must_use]
    pub fn list_all(&self) -> Vec<Certificate> {
        self.inner.read().unwrap().records.values().cloned().collect()
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count records per persisted status
    #[must_use]
    pub fn counts_by_status(&self) -> HashMap<CertificateStatus, usize> {
        let inner = self.inner.read().unwrap();
        let mut counts = HashMap::new();
        for record in inner.records.values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use laurea_core::{
        CertificateLevel, CertificateType, CourseRef, InstructorRef, Participant,
    };

    fn sample(code: &str, number: &str) -> Certificate {
        Certificate {
            id: CertificateId::new(),
            certificate_number: number.to_string(),
            verification_code: code.to_string(),
            status: CertificateStatus::Active,
            verified: false,
            holder: Participant::new("u-1", "Jane Doe", "jane@example.com"),
            course: CourseRef::new("c-1", "Advanced Pastry"),
            instructor: InstructorRef::new("u-2", "Pierre Blanc", "Head Chef"),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 10).unwrap(),
            grade: "A".to_string(),
            certificate_type: CertificateType::Completion,
            certificate_level: CertificateLevel::Advanced,
            score: None,
            issued_by: "Laurea Academy".to_string(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = CertificateStore::new();
        let cert = sample("code-1", "CERT-2024-AAAAAA");
        let id = cert.id;
        store.insert(cert).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let store = CertificateStore::new();
        store.insert(sample("code-1", "CERT-2024-AAAAAA")).unwrap();
        let result = store.insert(sample("code-1", "CERT-2024-BBBBBB"));
        assert_eq!(result, Err(StoreError::DuplicateCode));
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let store = CertificateStore::new();
        store.insert(sample("code-1", "CERT-2024-AAAAAA")).unwrap();
        let result = store.insert(sample("code-2", "CERT-2024-AAAAAA"));
        assert!(matches!(result, Err(StoreError::DuplicateNumber { .. })));
    }

    #[test]
    fn test_find_by_code() {
        let store = CertificateStore::new();
        store.insert(sample("code-1", "CERT-2024-AAAAAA")).unwrap();
        let found = store.find_by_code("code-1").unwrap();
        assert_eq!(found.certificate_number, "CERT-2024-AAAAAA");
        assert!(store.find_by_code("unknown").is_none());
    }

    #[test]
    fn test_find_by_number() {
        let store = CertificateStore::new();
        store.insert(sample("code-1", "CERT-2024-AAAAAA")).unwrap();
        assert!(store.find_by_number("CERT-2024-AAAAAA").is_some());
        assert!(store.find_by_number("CERT-2024-ZZZZZZ").is_none());
    }

    #[test]
    fn test_update_status() {
        let store = CertificateStore::new();
        let mut cert = sample("code-1", "CERT-2024-AAAAAA");
        let id = cert.id;
        store.insert(cert.clone()).unwrap();

        cert.status = CertificateStatus::Revoked;
        store.update(cert).unwrap();
        assert_eq!(store.get(&id).unwrap().status, CertificateStatus::Revoked);
    }

    #[test]
    fn test_update_refuses_code_change() {
        let store = CertificateStore::new();
        let mut cert = sample("code-1", "CERT-2024-AAAAAA");
        store.insert(cert.clone()).unwrap();

        cert.verification_code = "code-2".to_string();
        let result = store.update(cert);
        assert!(matches!(
            result,
            Err(StoreError::ImmutableFieldChanged { .. })
        ));
    }

    #[test]
    fn test_update_unknown_record() {
        let store = CertificateStore::new();
        let result = store.update(sample("code-1", "CERT-2024-AAAAAA"));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_revoked_record_stays_findable() {
        let store = CertificateStore::new();
        let mut cert = sample("code-1", "CERT-2024-AAAAAA");
        store.insert(cert.clone()).unwrap();
        cert.status = CertificateStatus::Revoked;
        store.update(cert).unwrap();

        // Soft revocation: the record and its code index survive for audit
        assert!(store.find_by_code("code-1").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_counts_by_status() {
        let store = CertificateStore::new();
        store.insert(sample("code-1", "CERT-2024-AAAAAA")).unwrap();
        store.insert(sample("code-2", "CERT-2024-BBBBBB")).unwrap();
        let counts = store.counts_by_status();
        assert_eq!(counts.get(&CertificateStatus::Active), Some(&2));
    }
}
